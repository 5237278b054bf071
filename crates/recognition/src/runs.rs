//! Grouping of a sequence into maximal runs of equal keys.

/// A maximal run of consecutive items sharing the same key.
#[derive(Debug, Clone, PartialEq)]
pub struct Run<K, T> {
    pub key: K,
    pub items: Vec<T>,
}

/// Splits `items` into maximal runs of consecutive elements whose keys are
/// equal. Input order is preserved; a key reappearing later starts a new run.
pub fn group_by_key<T, K, F>(items: impl IntoIterator<Item = T>, mut key_of: F) -> Vec<Run<K, T>>
where
    K: PartialEq,
    F: FnMut(&T) -> K,
{
    let mut runs: Vec<Run<K, T>> = Vec::new();
    for item in items {
        let key = key_of(&item);
        match runs.last_mut() {
            Some(run) if run.key == key => run.items.push(item),
            _ => runs.push(Run {
                key,
                items: vec![item],
            }),
        }
    }
    runs
}
