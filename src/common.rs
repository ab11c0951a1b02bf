use api::model::{DcaSeries, Holdings, MonthKey, ParseMonthError, TimeSeries};
use itertools::izip;

/// One segment of an allocation chart
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DcaPoint {
    pub label: String,
    pub actual: f64,
    pub optimized: f64,
}

/// Slices in the holdings' own order, never sorted
pub fn pie_series(holdings: &Holdings) -> Vec<Slice> {
    holdings
        .iter()
        .map(|(ticker, shares)| Slice {
            label: ticker.to_string(),
            value: shares,
        })
        .collect()
}

/// Percentage of the total each slice represents
pub fn share_percentages(slices: &[Slice]) -> Vec<f64> {
    let total: f64 = slices.iter().map(|s| s.value).sum();

    slices
        .iter()
        .map(|s| {
            if total > 0.0 {
                s.value / total * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

pub fn month_label(key: &str) -> Result<String, ParseMonthError> {
    key.parse::<MonthKey>().map(MonthKey::label)
}

pub fn value_series(series: &TimeSeries) -> Vec<ValuePoint> {
    series
        .points()
        .iter()
        .map(|(month, value)| ValuePoint {
            label: month.label(),
            value: *value,
        })
        .collect()
}

/// One record per simulated month
pub fn zip_dca(series: &DcaSeries) -> Vec<DcaPoint> {
    izip!(series.dates(), series.actual(), series.optimized())
        .map(|(date, actual, optimized)| DcaPoint {
            label: date.label(),
            actual: *actual,
            optimized: *optimized,
        })
        .collect()
}

/// Year part of a `Mon YYYY` label, used for sparse axis ticks
pub fn year_tick(label: &str) -> &str {
    match label.split_once(' ') {
        Some((_, year)) if !year.contains(' ') => year,
        _ => "",
    }
}

pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return String::from("$0.00");
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Whole-dollar amount for axis labels, e.g. `$12,346`
pub fn format_rounded_currency(value: f64) -> String {
    if !value.is_finite() {
        return String::from("$0");
    }

    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };

    format!("{}${}", sign, group_thousands(dollars))
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return String::from("0.00%");
    }

    format!("{:.2}%", value)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

pub fn cast_as_dataset(input: (usize, &f64)) -> (f64, f64) {
    ((input.0 + 1) as f64, *input.1)
}

/// Bounds for a chart axis, padded so a flat line isn't drawn on the border
pub fn min_max(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let pad = ((max - min) * 0.05).max(1.0);

    ((min - pad).max(0.0).min(min), max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_series_keeps_mapping_order() {
        let holdings: Holdings = vec![("AAPL", 3.0), ("MSFT", 2.0)].into_iter().collect();

        assert_eq!(
            pie_series(&holdings),
            vec![
                Slice {
                    label: "AAPL".into(),
                    value: 3.0
                },
                Slice {
                    label: "MSFT".into(),
                    value: 2.0
                },
            ]
        );

        let reversed: Holdings = vec![("MSFT", 2.0), ("AAPL", 3.0)].into_iter().collect();
        assert_eq!(pie_series(&reversed)[0].label, "MSFT");
    }

    #[test]
    fn share_percentages_of_total() {
        let holdings: Holdings = vec![("AAPL", 3.0), ("MSFT", 2.0)].into_iter().collect();

        assert_eq!(share_percentages(&pie_series(&holdings)), vec![60.0, 40.0]);
        assert_eq!(
            share_percentages(&pie_series(&vec![("X", 0.0)].into_iter().collect())),
            vec![0.0]
        );
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label("2024-05").unwrap(), "May 2024");
        assert_eq!(month_label("2023-12").unwrap(), "Dec 2023");
        assert!(month_label("May 2024").is_err());
        assert!(month_label("2024-13").is_err());
    }

    #[test]
    fn value_series_labels_each_month() {
        let series = TimeSeries::new(vec![
            (MonthKey::new(2023, 1).unwrap(), 1500.0),
            (MonthKey::new(2023, 2).unwrap(), 2000.0),
        ]);

        assert_eq!(
            value_series(&series),
            vec![
                ValuePoint {
                    label: "Jan 2023".into(),
                    value: 1500.0
                },
                ValuePoint {
                    label: "Feb 2023".into(),
                    value: 2000.0
                },
            ]
        );
    }

    #[test]
    fn zip_dca_aligns_by_index() {
        let dates = vec![MonthKey::new(2025, 5).unwrap(), MonthKey::new(2025, 6).unwrap()];
        let series = DcaSeries::new(dates, vec![100.0, 210.0], vec![110.0, 230.0]).unwrap();

        let points = zip_dca(&series);

        assert_eq!(
            points,
            vec![
                DcaPoint {
                    label: "May 2025".into(),
                    actual: 100.0,
                    optimized: 110.0
                },
                DcaPoint {
                    label: "Jun 2025".into(),
                    actual: 210.0,
                    optimized: 230.0
                },
            ]
        );
    }

    #[test]
    fn year_ticks() {
        assert_eq!(year_tick("May 2025"), "2025");
        assert_eq!(year_tick("2025"), "");
        assert_eq!(year_tick("a b c"), "");
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(f64::NAN), "$0.00");
        assert_eq!(format_rounded_currency(12345.6), "$12,346");
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(12.3456), "12.35%");
        assert_eq!(format_percent(-3.0), "-3.00%");
        assert_eq!(format_percent(f64::INFINITY), "0.00%");
    }

    #[test]
    fn min_max_pads_bounds() {
        assert_eq!(min_max(vec![]), (0.0, 1.0));

        let (min, max) = min_max(vec![100.0, 300.0]);
        assert!(min < 100.0 && min >= 0.0);
        assert!(max > 300.0);
    }
}
