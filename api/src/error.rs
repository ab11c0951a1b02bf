use thiserror::Error;

use crate::model::{FeasibleRange, ParseMonthError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{context} failed: {status_text}")]
    Status {
        context: &'static str,
        status: u16,
        status_text: String,
    },
    #[error("{context} failed: {source}")]
    Network {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{context} returned an unreadable body: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),
}

impl ApiError {
    pub fn contract(&self) -> Option<&ContractViolation> {
        match self {
            ApiError::Contract(violation) => Some(violation),
            _ => None,
        }
    }

    pub(crate) fn network(context: &'static str, err: isahc::Error) -> ApiError {
        ApiError::Network {
            context,
            source: err.into(),
        }
    }
}

/// A response that decoded but does not satisfy the endpoint's schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("{}", missing_allocation_message(.message, .feasible))]
    MissingAllocation {
        message: Option<String>,
        feasible: Option<FeasibleRange>,
    },
    #[error("negative share count {shares} for {ticker}")]
    NegativeShares { ticker: String, shares: f64 },
    #[error("series lengths differ: {dates} dates, {actual} actual, {optimized} optimized")]
    ShapeMismatch {
        dates: usize,
        actual: usize,
        optimized: usize,
    },
    #[error("backend reported: {0}")]
    Rejected(String),
    #[error(transparent)]
    InvalidMonth(#[from] ParseMonthError),
}

fn missing_allocation_message(message: &Option<String>, feasible: &Option<FeasibleRange>) -> String {
    let mut out = String::from("allocation is missing");

    if let Some(message) = message {
        out.push_str(": ");
        out.push_str(message);
    }

    if let Some(range) = feasible {
        out.push_str(&format!(
            " (feasible target return {:.2}% to {:.2}%)",
            range.min * 100.0,
            range.max * 100.0
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_allocation_mentions_backend_message_and_range() {
        let violation = ContractViolation::MissingAllocation {
            message: Some("Target return not feasible with current assets.".into()),
            feasible: Some(FeasibleRange {
                min: 0.05,
                max: 0.21,
            }),
        };

        assert_eq!(
            violation.to_string(),
            "allocation is missing: Target return not feasible with current assets. \
             (feasible target return 5.00% to 21.00%)"
        );
    }

    #[test]
    fn status_error_carries_status_text() {
        let err = ApiError::Status {
            context: "upload",
            status: 400,
            status_text: "Bad Request".into(),
        };

        assert_eq!(err.to_string(), "upload failed: Bad Request");
        assert!(err.contract().is_none());
    }
}
