use std::str::FromStr;

use anyhow::{bail, Error};
use api::model::{DcaParams, TargetReturn};
use serde::Deserialize;

/// The two dashboard layouts. They disagree on the default target CAGR and
/// on whether opening the optimisation view runs an optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Single page, 10% default target, optimize on request only
    Classic,
    /// Overview and optimisation tabs, 30% default target, optimizes when the
    /// optimisation tab opens
    Tabbed,
}

impl Variant {
    pub const fn names() -> [&'static str; 2] {
        ["classic", "tabbed"]
    }

    /// Percent
    pub fn default_target_cagr(self) -> f64 {
        match self {
            Variant::Classic => 10.0,
            Variant::Tabbed => 30.0,
        }
    }

    pub fn auto_optimize(self) -> bool {
        match self {
            Variant::Classic => false,
            Variant::Tabbed => true,
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Tabbed
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Variant::Classic),
            "tabbed" => Ok(Variant::Tabbed),
            other => bail!(
                "Unknown dashboard variant `{}`, expected one of {}",
                other,
                Variant::names().join(", ")
            ),
        }
    }
}

/// User editable optimization parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationInputs {
    /// Percent, `30.0` for 30%
    pub target_cagr: f64,
    pub monthly_contribution: f64,
    pub years: u32,
}

impl OptimizationInputs {
    pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 500.0;
    pub const DEFAULT_YEARS: u32 = 10;

    pub fn for_variant(variant: Variant) -> OptimizationInputs {
        OptimizationInputs {
            target_cagr: variant.default_target_cagr(),
            monthly_contribution: Self::DEFAULT_MONTHLY_CONTRIBUTION,
            years: Self::DEFAULT_YEARS,
        }
    }

    /// The only place the percentage becomes a fraction
    pub fn target_return(&self) -> TargetReturn {
        TargetReturn::from_percent(self.target_cagr)
    }

    pub fn dca_params(&self, initial_investment: f64) -> DcaParams {
        DcaParams {
            initial_investment,
            monthly_contribution: self.monthly_contribution,
            years: self.years,
            target_return: self.target_return(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_carry_their_defaults() {
        let classic = OptimizationInputs::for_variant(Variant::Classic);
        let tabbed = OptimizationInputs::for_variant(Variant::Tabbed);

        assert_eq!(classic.target_cagr, 10.0);
        assert_eq!(tabbed.target_cagr, 30.0);
        assert!(!Variant::Classic.auto_optimize());
        assert!(Variant::Tabbed.auto_optimize());
        assert_eq!(tabbed.years, 10);
        assert_eq!(tabbed.monthly_contribution, 500.0);
    }

    #[test]
    fn dca_params_use_fraction() {
        let inputs = OptimizationInputs {
            target_cagr: 30.0,
            monthly_contribution: 250.0,
            years: 5,
        };

        let params = inputs.dca_params(1200.0);

        assert_eq!(params.target_return.fraction(), 0.3);
        assert_eq!(params.initial_investment, 1200.0);
        assert_eq!(params.monthly_contribution, 250.0);
        assert_eq!(params.years, 5);
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Classic".parse::<Variant>().unwrap(), Variant::Classic);
        assert_eq!("tabbed".parse::<Variant>().unwrap(), Variant::Tabbed);
        assert!("grid".parse::<Variant>().is_err());
    }
}
