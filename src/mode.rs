//! Mode finding on top of [`ChainingMap`].

use crate::ChainingMap;

/// Returns every most frequent value and how often it occurs.
///
/// The modes come back in the map's bucket order, not input order. An empty
/// input gives `(vec![], 0)`.
///
/// ```rust
/// use probe_chain::find_mode;
///
/// let (modes, frequency) = find_mode(["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(modes, vec!["apple".to_string()]);
/// assert_eq!(frequency, 2);
/// ```
pub fn find_mode<I>(values: I) -> (Vec<String>, usize)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: ChainingMap<usize> = ChainingMap::new();
    for value in values {
        let value = value.as_ref();
        if let Some(count) = counts.get_mut(value) {
            *count = count.saturating_add(1);
        } else {
            counts.put(value, 1);
        }
    }

    let frequency = counts.iter().map(|(_, &count)| count).max().unwrap_or(0);
    let modes = counts
        .iter()
        .filter(|&(_, &count)| count == frequency)
        .map(|(value, _)| value.to_string())
        .collect();

    (modes, frequency)
}
