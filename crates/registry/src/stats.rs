//! Statistics derived from a sample series

use serde::{Deserialize, Serialize};

/// Statistical summary of one method's call durations, in seconds.
///
/// Recomputed from the series on every query, never stored. A series with
/// no samples yields all-zero fields; use [`Statistics::has_data`] to tell
/// "no calls" apart from "calls that took no measurable time".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median (average of the two middle values for even counts)
    pub median: f64,
    /// Population standard deviation (divides by `count`, not `count - 1`)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Sum of all samples
    pub total: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

impl Statistics {
    /// Summarize `samples`, given in recording order.
    pub fn from_samples(samples: &[f64]) -> Self {
        let Some(ordered) = Ordered::new(samples) else {
            return Self::default();
        };

        let count = samples.len();
        let total: f64 = samples.iter().sum();
        let mean = total / count as f64;
        let squared_deviations: f64 = samples
            .iter()
            .map(|x| {
                let d = x - mean;
                d * d
            })
            .sum();

        Self {
            count,
            mean,
            median: ordered.quantile(0.5),
            std_dev: (squared_deviations / count as f64).sqrt(),
            min: ordered.min(),
            max: ordered.max(),
            total,
            p95: ordered.quantile(0.95),
            p99: ordered.quantile(0.99),
        }
    }

    /// Whether at least one sample backs these numbers.
    pub fn has_data(&self) -> bool {
        self.count > 0
    }
}

/// A non-empty series sorted once and shared by every order statistic.
struct Ordered(Vec<f64>);

impl Ordered {
    fn new(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self(sorted))
    }

    fn min(&self) -> f64 {
        self.0[0]
    }

    fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Value at fraction `q` of the way from min to max rank, interpolating
    /// between neighbours. `0.5` is the median, and for an even count it lands
    /// halfway between the two middle samples.
    fn quantile(&self, q: f64) -> f64 {
        let position = q.clamp(0.0, 1.0) * (self.0.len() - 1) as f64;
        let below = position.floor() as usize;
        let Some(&above) = self.0.get(below + 1) else {
            return self.max();
        };
        let low = self.0[below];
        let weight = position - below as f64;
        // Keep rounding from stepping outside the neighbouring samples.
        (low + weight * (above - low)).min(above).max(low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_statistics_from_samples() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = Statistics::from_samples(&samples);

        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.total, 15.0);
    }

    #[test]
    fn test_statistics_empty_is_all_zero() {
        let stats = Statistics::from_samples(&[]);

        assert_eq!(stats, Statistics::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.total, 0.0);
        assert!(!stats.has_data());
    }

    #[test]
    fn test_std_dev_is_population() {
        // Population variance of [2,4,4,4,5,5,7,9] is exactly 4; sample variance would be 32/7.
        let samples = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = Statistics::from_samples(&samples);

        assert_eq!(stats.mean, 5.0);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_median_even_count_averages_middle() {
        let stats = Statistics::from_samples(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_median_ignores_insertion_order() {
        let stats = Statistics::from_samples(&[0.5, 0.1, 0.3]);
        assert_eq!(stats.median, 0.3);
        assert_eq!(stats.min, 0.1);
        assert_eq!(stats.max, 0.5);
    }

    #[test]
    fn test_single_sample() {
        let stats = Statistics::from_samples(&[0.25]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 0.25);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.p99, 0.25);
    }

    #[test]
    fn test_tail_latencies_on_spread_series() {
        // 1..=100 ms recorded out of order; 0.95 of 99 ranks lands at 95.05 ms.
        let samples: Vec<f64> = (1..=100).rev().map(|ms| ms as f64 / 1000.0).collect();
        let stats = Statistics::from_samples(&samples);

        assert!((stats.median - 0.0505).abs() < 1e-12);
        assert!((stats.p95 - 0.09505).abs() < 1e-12);
        assert!((stats.p99 - 0.09901).abs() < 1e-12);
    }

    #[test]
    fn test_one_slow_call_shows_in_p99_only() {
        let mut samples = vec![0.002; 99];
        samples.push(1.5);
        let stats = Statistics::from_samples(&samples);

        assert_eq!(stats.median, 0.002);
        assert_eq!(stats.p95, 0.002);
        assert!(stats.p99 > 0.002 && stats.p99 < 1.5);
        assert_eq!(stats.max, 1.5);
    }

    #[test]
    fn test_quantile_endpoints() {
        let ordered = Ordered::new(&[0.3, 0.1, 0.2]).unwrap();
        assert_eq!(ordered.quantile(0.0), 0.1);
        assert_eq!(ordered.quantile(1.0), 0.3);
        assert_eq!(ordered.quantile(0.5), 0.2);
        assert!(Ordered::new(&[]).is_none());
    }

    #[test]
    fn test_serialize_camel_case() {
        let stats = Statistics::from_samples(&[1.0, 3.0]);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["stdDev"], 1.0);
    }

    proptest! {
        #[test]
        fn prop_count_total_mean_consistent(samples in prop::collection::vec(0.0f64..10.0, 1..200)) {
            let stats = Statistics::from_samples(&samples);
            let total: f64 = samples.iter().sum();

            prop_assert_eq!(stats.count, samples.len());
            prop_assert!((stats.total - total).abs() < 1e-9);
            prop_assert!((stats.mean - total / samples.len() as f64).abs() < 1e-9);
        }

        #[test]
        fn prop_order_bounds(samples in prop::collection::vec(0.0f64..10.0, 1..200)) {
            let stats = Statistics::from_samples(&samples);

            prop_assert!(stats.min <= stats.median);
            prop_assert!(stats.median <= stats.max);
            prop_assert!(stats.min <= stats.mean + 1e-9);
            prop_assert!(stats.mean <= stats.max + 1e-9);
            prop_assert!(stats.p95 <= stats.p99 + 1e-12);
            prop_assert!(stats.std_dev >= 0.0);
        }

        #[test]
        fn prop_population_variance(samples in prop::collection::vec(0.0f64..10.0, 2..100)) {
            let stats = Statistics::from_samples(&samples);
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();

            prop_assert!((stats.std_dev.powi(2) - ss / n).abs() < 1e-9);
        }
    }
}
