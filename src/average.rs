use crate::models::Stat;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Result of applying a [`Stat`] to a sample multiset.
///
/// Mean and median are scalar; mode is list-valued because every value tied
/// for the highest frequency is reported. Callers must handle the two shapes
/// distinctly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Scalar(f64),
    Multi(Vec<f64>),
}

impl Stat {
    pub fn apply(self, samples: &[f64]) -> StatValue {
        match self {
            Stat::Mean => StatValue::Scalar(mean(samples)),
            Stat::Median => StatValue::Scalar(median(samples)),
            Stat::Mode => StatValue::Multi(mode(samples)),
        }
    }
}

/// Arithmetic mean. An empty sample yields 0.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Midpoint of the sorted sample; the average of the two middle values for
/// even sizes. An empty sample yields 0.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// All values tied for the highest frequency, ascending. An empty sample
/// yields an empty list.
pub fn mode(samples: &[f64]) -> Vec<f64> {
    let mut freq: FxHashMap<u64, usize> = FxHashMap::default();
    for &x in samples {
        *freq.entry(x.to_bits()).or_insert(0) += 1;
    }
    let Some(best) = freq.values().copied().max() else {
        return Vec::new();
    };
    let mut values: Vec<f64> = freq
        .iter()
        .filter(|&(_, &count)| count == best)
        .map(|(&bits, _)| f64::from_bits(bits))
        .collect();
    values.sort_by(f64::total_cmp);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[2.0, 3.0, 4.0]), 3.0);
        assert!((mean(&[1.0, 2.0]) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn median_odd() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn median_even_averages_middle_pair() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn median_empty_is_zero() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn mode_single_winner() {
        assert_eq!(mode(&[2.0, 2.0, 3.0]), vec![2.0]);
    }

    #[test]
    fn mode_tie_reports_all_values() {
        assert_eq!(mode(&[1.0, 2.0, 1.0, 2.0]), vec![1.0, 2.0]);
    }

    #[test]
    fn mode_all_distinct_reports_everything_sorted() {
        assert_eq!(mode(&[3.0, 0.0, 1.0, 2.0]), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn mode_empty_is_empty() {
        assert!(mode(&[]).is_empty());
    }

    #[test]
    fn stat_dispatch() {
        let samples = [1.0, 1.0, 2.0];
        assert_eq!(Stat::Mean.apply(&samples), StatValue::Scalar(4.0 / 3.0));
        assert_eq!(Stat::Median.apply(&samples), StatValue::Scalar(1.0));
        assert_eq!(Stat::Mode.apply(&samples), StatValue::Multi(vec![1.0]));
    }
}
