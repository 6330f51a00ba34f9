//! Case-insensitive stable ordering shared by every sorter.

/// Sort key used everywhere: Unicode lowercase of the name.
#[inline]
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Stable sort by the folded key. Items with equal keys keep input order.
///
/// Returns whether the order changed.
pub fn sort_folded<T, F>(items: &mut [T], key: F) -> bool
where
    F: Fn(&T) -> &str,
{
    if items.len() < 2 {
        return false;
    }
    let sorted = items
        .windows(2)
        .all(|w| fold(key(&w[0])) <= fold(key(&w[1])));
    if sorted {
        return false;
    }
    items.sort_by_cached_key(|item| fold(key(item)));
    true
}
