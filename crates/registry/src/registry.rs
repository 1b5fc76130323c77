//! Shared sample store

use crate::key::MethodKey;
use crate::stats::Statistics;
use crate::Sample;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

/// Global registry instance
static GLOBAL_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// Get the process-wide registry.
///
/// Created empty on first use and kept for the lifetime of the process.
/// Every proxy built without an explicit registry records here.
pub fn global_registry() -> &'static Arc<Registry> {
    GLOBAL_REGISTRY.get_or_init(|| Arc::new(Registry::new()))
}

/// Record a sample into the global registry.
pub fn record(key: impl Into<MethodKey>, duration: Sample) {
    global_registry().record(key, duration);
}

/// Full ordered series for `key` from the global registry.
pub fn series(key: &str) -> Vec<Sample> {
    global_registry().series(key)
}

/// Statistics for `key` from the global registry.
pub fn statistics(key: &str) -> Statistics {
    global_registry().statistics(key)
}

/// Snapshot of every series in the global registry.
pub fn all() -> Snapshot {
    global_registry().all()
}

/// Clear one key, or every key when `key` is `None`, in the global registry.
pub fn clear(key: Option<&str>) {
    global_registry().clear(key);
}

/// Point-in-time copy of every key's series.
///
/// Owned data: later recording or clearing does not change it.
pub type Snapshot = BTreeMap<MethodKey, Vec<Sample>>;

/// Keyed store of call-duration samples.
///
/// A single lock guards the whole map, so recording, clearing and every read
/// are serialized against each other. Samples are appended in the order the
/// lock is acquired, which for one thread is the order its calls completed.
#[derive(Debug, Default)]
pub struct Registry {
    series: Mutex<HashMap<MethodKey, Vec<Sample>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind an `Arc`, ready to hand to proxies.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // A panic in another thread while holding the lock leaves the map intact
    // (every mutation is a single push, take or clear), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<MethodKey, Vec<Sample>>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a duration in seconds to the series for `key`.
    ///
    /// Creates the series if the key is unseen. Negative and non-finite
    /// durations are stored as `0.0`.
    pub fn record(&self, key: impl Into<MethodKey>, duration: Sample) {
        let key = key.into();
        let duration = if duration.is_finite() && duration >= 0.0 {
            duration
        } else {
            tracing::warn!(
                target: "registry",
                key = %key,
                duration,
                "invalid duration clamped to zero"
            );
            0.0
        };

        tracing::trace!(
            target: "registry",
            key = %key,
            duration_secs = duration,
            "sample recorded"
        );

        self.lock().entry(key).or_default().push(duration);
    }

    /// Append a [`Duration`] to the series for `key`.
    pub fn record_duration(&self, key: impl Into<MethodKey>, duration: Duration) {
        self.record(key, duration.as_secs_f64());
    }

    /// Full ordered series for `key`.
    ///
    /// An unknown key and a key with no samples both yield an empty vector.
    pub fn series(&self, key: &str) -> Vec<Sample> {
        self.lock().get(key).cloned().unwrap_or_default()
    }

    /// Number of samples recorded for `key`.
    pub fn sample_count(&self, key: &str) -> usize {
        self.lock().get(key).map_or(0, Vec::len)
    }

    /// Statistics computed from the current series for `key`.
    ///
    /// See [`Statistics`] for the zero-sample convention.
    pub fn statistics(&self, key: &str) -> Statistics {
        // Copy out so sorting happens without the lock held.
        let samples = self.series(key);
        Statistics::from_samples(&samples)
    }

    /// Statistics for every key, computed from one consistent snapshot.
    pub fn statistics_all(&self) -> BTreeMap<MethodKey, Statistics> {
        self.all()
            .into_iter()
            .map(|(key, samples)| {
                let stats = Statistics::from_samples(&samples);
                (key, stats)
            })
            .collect()
    }

    /// Snapshot of every key's series.
    pub fn all(&self) -> Snapshot {
        self.lock()
            .iter()
            .map(|(key, samples)| (key.clone(), samples.clone()))
            .collect()
    }

    /// Keys known to the registry, sorted. A key emptied by
    /// [`clear_key`](Self::clear_key) stays listed.
    pub fn keys(&self) -> Vec<MethodKey> {
        let mut keys: Vec<MethodKey> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Empty the series for `key`, or drop every key when `key` is `None`.
    ///
    /// Clearing an unknown key is a no-op.
    pub fn clear(&self, key: Option<&str>) {
        match key {
            Some(key) => self.clear_key(key),
            None => self.clear_all(),
        }
    }

    /// Empty the series for one key, leaving all others untouched.
    ///
    /// The key itself is kept, so [`all`](Self::all) still lists it with no
    /// samples. An unknown key is not created.
    pub fn clear_key(&self, key: &str) {
        let samples = match self.lock().get_mut(key) {
            Some(series) => std::mem::take(series).len(),
            None => 0,
        };
        tracing::debug!(target: "registry", key, samples, "series cleared");
    }

    /// Drop every key and its series.
    pub fn clear_all(&self) {
        let mut series = self.lock();
        let keys = series.len();
        series.clear();
        drop(series);
        tracing::debug!(target: "registry", keys, "registry cleared");
    }

    /// Number of known keys, emptied ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry knows no keys at all.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_creates_series() {
        let registry = Registry::new();
        registry.record("Calculator.add", 0.5);
        registry.record("Calculator.add", 0.25);
        registry.record("Calculator.multiply", 1.0);

        assert_eq!(registry.series("Calculator.add"), vec![0.5, 0.25]);
        assert_eq!(registry.series("Calculator.multiply"), vec![1.0]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_key_is_empty() {
        let registry = Registry::new();
        assert!(registry.series("NonExistent.method").is_empty());
        assert_eq!(registry.sample_count("NonExistent.method"), 0);
        assert_eq!(registry.statistics("NonExistent.method"), Statistics::default());
    }

    #[test]
    fn test_record_duration() {
        let registry = Registry::new();
        registry.record_duration(MethodKey::new("Timer", "tick"), Duration::from_millis(250));
        assert_eq!(registry.series("Timer.tick"), vec![0.25]);
    }

    #[test]
    fn test_invalid_durations_clamped() {
        let registry = Registry::new();
        registry.record("Clock.skew", -0.1);
        registry.record("Clock.skew", f64::NAN);
        registry.record("Clock.skew", f64::INFINITY);

        assert_eq!(registry.series("Clock.skew"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_statistics_consistency() {
        let registry = Registry::new();
        for d in [0.1, 0.2, 0.3, 0.4] {
            registry.record("Worker.run", d);
        }

        let series = registry.series("Worker.run");
        let stats = registry.statistics("Worker.run");
        assert_eq!(stats.count, series.len());
        assert!((stats.total - series.iter().sum::<f64>()).abs() < 1e-12);
        assert!((stats.mean - stats.total / stats.count as f64).abs() < 1e-12);
    }

    #[test]
    fn test_clear_key_leaves_others() {
        let registry = Registry::new();
        registry.record("A.one", 1.0);
        registry.record("B.two", 2.0);

        registry.clear(Some("A.one"));

        assert!(registry.series("A.one").is_empty());
        assert_eq!(registry.series("B.two"), vec![2.0]);
        assert_eq!(registry.sample_count("B.two"), 1);
    }

    #[test]
    fn test_cleared_key_stays_listed_empty() {
        let registry = Registry::new();
        registry.record("A.one", 1.0);
        registry.record("B.two", 2.0);

        registry.clear(Some("A.one"));

        let all = registry.all();
        assert_eq!(all.get("A.one"), Some(&Vec::new()));
        assert_eq!(all.get("B.two"), Some(&vec![2.0]));
        assert_eq!(registry.keys(), vec![MethodKey::from("A.one"), MethodKey::from("B.two")]);
        assert_eq!(registry.statistics("A.one"), Statistics::default());

        registry.record("A.one", 0.5);
        assert_eq!(registry.series("A.one"), vec![0.5]);
    }

    #[test]
    fn test_clear_unknown_key_creates_nothing() {
        let registry = Registry::new();
        registry.record("A.one", 1.0);

        registry.clear(Some("Missing.key"));

        assert_eq!(registry.keys(), vec![MethodKey::from("A.one")]);
        assert!(!registry.all().contains_key("Missing.key"));
    }

    #[test]
    fn test_clear_all() {
        let registry = Registry::new();
        registry.record("A.one", 1.0);
        registry.record("B.two", 2.0);

        registry.clear(None);

        assert!(registry.is_empty());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let registry = Registry::new();
        registry.clear(Some("Missing.key"));
        registry.clear(None);
        registry.clear(None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_isolated_from_later_mutation() {
        let registry = Registry::new();
        registry.record("Calculator.add", 0.1);
        registry.record("Calculator.add", 0.2);

        let snapshot = registry.all();
        registry.clear(Some("Calculator.add"));
        registry.record("Calculator.sub", 0.3);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(snapshot.get("Calculator.add").map(Vec::len), Some(2));
        assert!(registry.series("Calculator.add").is_empty());
    }

    #[test]
    fn test_statistics_all() {
        let registry = Registry::new();
        registry.record("A.one", 1.0);
        registry.record("A.one", 3.0);
        registry.record("B.two", 2.0);

        let stats = registry.statistics_all();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.get("A.one").unwrap().mean, 2.0);
        assert_eq!(stats.get("B.two").unwrap().count, 1);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let registry = Registry::new();
        let threads = 8;
        let per_thread = 500;

        thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    for i in 0..per_thread {
                        registry.record("Shared.hot", i as f64);
                    }
                });
            }
        });

        assert_eq!(registry.sample_count("Shared.hot"), threads * per_thread);
    }

    #[test]
    fn test_single_thread_order_preserved() {
        let registry = Registry::new();
        for i in 0..100 {
            registry.record("Seq.step", i as f64);
        }
        let expected: Vec<f64> = (0..100).map(|i| i as f64).collect();
        assert_eq!(registry.series("Seq.step"), expected);
    }

    #[test]
    fn test_global_registry_free_functions() {
        let key = "GlobalRegistryCheck.touch";
        clear(Some(key));

        record(key, 0.5);
        record(MethodKey::from(key), 0.5);

        assert_eq!(series(key).len(), 2);
        assert_eq!(statistics(key).total, 1.0);
        assert!(all().contains_key(key));

        clear(Some(key));
        assert!(series(key).is_empty());
        assert_eq!(all().get(key), Some(&Vec::new()));
        assert!(Arc::ptr_eq(global_registry(), global_registry()));
    }
}
