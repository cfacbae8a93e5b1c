use rand::Rng;

/// Weighted random choice over `(item, weight)` pairs, independent of the
/// item's shape.
///
/// Negative weights are treated as zero. A degenerate total weight (zero or
/// non-finite) falls back to the first item so callers with static catalogs
/// never lose a draw; an empty slice returns `None`.
pub fn pick_weighted<'a, T, W>(items: &'a [T], weight: W, rng: &mut impl Rng) -> Option<&'a T>
where
    W: Fn(&T) -> f64,
{
    if items.is_empty() {
        return None;
    }

    let total: f64 = items.iter().map(|item| weight(item).max(0.0)).sum();
    if !(total > 0.0) || !total.is_finite() {
        return items.first();
    }

    let mut remaining = rng.random_range(0.0..total);
    for item in items {
        remaining -= weight(item).max(0.0);
        if remaining < 0.0 {
            return Some(item);
        }
    }

    // Floating point accumulation can leave a sliver; the last item wins.
    items.last()
}
