//! Percentage allocation of spend across entities.

use std::collections::BTreeMap;

/// Clamps a percentage into `[0, 100]`.
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Mapping from entity id to a percentage of spend.
///
/// Keys iterate in id order, which keeps every tie-break in the engine
/// deterministic. The sum is not forced to 100.
///
/// # Examples
///
/// ```
/// use u_allocate::model::Allocation;
///
/// let alloc = Allocation::from([("A", 80.0), ("B", 20.0)]);
/// assert_eq!(alloc.get("A"), 80.0);
/// assert_eq!(alloc.get("missing"), 0.0);
/// assert_eq!(alloc.active_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Allocation(BTreeMap<String, f64>);

impl Allocation {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Percentage for `id`; missing ids read as 0.
    pub fn get(&self, id: &str) -> f64 {
        self.0.get(id).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Inserts `value` as given, without clamping.
    pub fn insert(&mut self, id: impl Into<String>, value: f64) {
        self.0.insert(id.into(), value);
    }

    /// Sets `id` to `value` clamped into `[0, 100]`.
    pub fn set(&mut self, id: impl Into<String>, value: f64) {
        self.0.insert(id.into(), clamp_percent(value));
    }

    /// Adds `delta` to `id` (missing ids start at 0), clamping the result.
    pub fn adjust(&mut self, id: &str, delta: f64) {
        let next = self.get(id) + delta;
        self.set(id, next);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all percentages.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Number of entries with a strictly positive share.
    pub fn active_count(&self) -> usize {
        self.0.values().filter(|&&v| v > 0.0).count()
    }

    /// Entries ordered largest share first, ties by id.
    pub fn ranked_desc(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        // BTreeMap order already sorts ids; a stable sort keeps it for ties.
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Allocation {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Allocation {
    fn from(entries: [(K, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}
