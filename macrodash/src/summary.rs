use serde::{Deserialize, Serialize};

use crate::observation::Observation;

/// A value together with the year it was observed in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Descriptive statistics of one entity's non-missing series.
///
/// `change_pct` is `None` when the earliest value is zero and `std_dev` is `None` for a
/// single point; neither is ever reported as an infinity or a zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub latest: YearValue,
    pub earliest: YearValue,
    pub change_abs: f64,
    pub change_pct: Option<f64>,
    pub mean: f64,
    pub median: f64,
    pub std_dev: Option<f64>,
    pub min: YearValue,
    pub max: YearValue,
}

impl SummaryStatistics {
    /// Fewer than two points, or a percent change that cannot be computed.
    pub fn is_degenerate(&self) -> bool {
        self.std_dev.is_none() || self.change_pct.is_none()
    }
}

/// Summarise a series. Returns `None` when there are no non-missing points.
pub fn compute_summary(series: &[Observation]) -> Option<SummaryStatistics> {
    let mut points: Vec<YearValue> = series
        .iter()
        .filter_map(|obs| obs.value.map(|value| YearValue { year: obs.year, value }))
        .collect();
    points.sort_by_key(|point| point.year);

    let earliest = *points.first()?;
    let latest = *points.last()?;
    let n = points.len();

    let change_abs = latest.value - earliest.value;
    let change_pct = (earliest.value != 0.0).then(|| change_abs / earliest.value * 100.0);

    let mean = points.iter().map(|p| p.value).sum::<f64>() / n as f64;
    let std_dev = (n > 1).then(|| {
        let squares = points
            .iter()
            .map(|p| (p.value - mean).powi(2))
            .sum::<f64>();
        (squares / (n - 1) as f64).sqrt()
    });

    let mut sorted: Vec<f64> = points.iter().map(|p| p.value).collect();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    // Strict comparisons keep the earliest year on ties
    let min = points
        .iter()
        .skip(1)
        .fold(earliest, |best, p| if p.value < best.value { *p } else { best });
    let max = points
        .iter()
        .skip(1)
        .fold(earliest, |best, p| if p.value > best.value { *p } else { best });

    Some(SummaryStatistics {
        count: n,
        latest,
        earliest,
        change_abs,
        change_pct,
        mean,
        median,
        std_dev,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[(i32, Option<f64>)]) -> Vec<Observation> {
        points
            .iter()
            .map(|(year, value)| Observation::new("AT", *year, *value))
            .collect()
    }

    #[test]
    fn three_point_summary() {
        let stats = compute_summary(&series(&[
            (2019, Some(5.0)),
            (2020, Some(7.0)),
            (2021, Some(6.0)),
        ]))
        .unwrap();
        assert_eq!(stats.latest, YearValue { year: 2021, value: 6.0 });
        assert_eq!(stats.earliest, YearValue { year: 2019, value: 5.0 });
        assert_eq!(stats.change_abs, 1.0);
        assert!((stats.change_pct.unwrap() - 20.0).abs() < 1e-12);
        assert_eq!(stats.mean, 6.0);
        assert_eq!(stats.median, 6.0);
        assert_eq!(stats.std_dev, Some(1.0));
        assert_eq!(stats.min, YearValue { year: 2019, value: 5.0 });
        assert_eq!(stats.max, YearValue { year: 2020, value: 7.0 });
        assert!(!stats.is_degenerate());
    }

    #[test]
    fn summary_is_idempotent() {
        let input = series(&[(2001, Some(7.3)), (2000, Some(8.1)), (2002, Some(6.9))]);
        let first = compute_summary(&input).unwrap();
        let second = compute_summary(&input).unwrap();
        assert_eq!(first.mean.to_bits(), second.mean.to_bits());
        assert_eq!(
            first.std_dev.map(f64::to_bits),
            second.std_dev.map(f64::to_bits)
        );
        assert_eq!(first, second);
    }

    #[test]
    fn missing_points_are_ignored_and_unsorted_input_is_ordered() {
        let stats = compute_summary(&series(&[
            (2021, Some(4.0)),
            (2018, None),
            (2019, Some(2.0)),
            (2022, None),
        ]))
        .unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.earliest.year, 2019);
        assert_eq!(stats.latest.year, 2021);
        assert_eq!(stats.median, 3.0);
    }

    #[test]
    fn single_point_has_no_std_dev() {
        let stats = compute_summary(&series(&[(2020, Some(5.0))])).unwrap();
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.change_abs, 0.0);
        assert_eq!(stats.change_pct, Some(0.0));
        assert!(stats.is_degenerate());
    }

    #[test]
    fn zero_earliest_value_leaves_percent_change_undefined() {
        let stats = compute_summary(&series(&[(2019, Some(0.0)), (2020, Some(3.0))])).unwrap();
        assert_eq!(stats.change_abs, 3.0);
        assert_eq!(stats.change_pct, None);
    }

    #[test]
    fn ties_resolve_to_the_earliest_year() {
        let stats = compute_summary(&series(&[
            (2019, Some(3.0)),
            (2020, Some(9.0)),
            (2021, Some(3.0)),
            (2022, Some(9.0)),
        ]))
        .unwrap();
        assert_eq!(stats.min.year, 2019);
        assert_eq!(stats.max.year, 2020);
    }

    #[test]
    fn no_points_means_no_data() {
        assert_eq!(compute_summary(&[]), None);
        assert_eq!(compute_summary(&series(&[(2020, None)])), None);
    }
}
