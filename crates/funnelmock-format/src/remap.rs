//! Deterministic identifier remapping into platform-specific ranges.
//!
//! Target platforms use numeric ids in platform-shaped ranges; simulation
//! ids are opaque strings. The mapping must be a pure function of the input
//! id so repeated formatting of the same result is byte-identical.

/// FNV-1a over the id bytes.
pub fn stable_hash(id: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for byte in id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Map an id into the inclusive range `lo..=hi`.
pub fn remap_to_range(id: &str, lo: i64, hi: i64) -> i64 {
    debug_assert!(lo <= hi);
    let span = (hi - lo + 1) as u64;
    lo + (stable_hash(id) % span) as i64
}

/// Stable choice from a fixed list, keyed by the id.
pub fn pick_stable<'a>(id: &str, choices: &[&'a str]) -> &'a str {
    choices[(stable_hash(id) % choices.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_across_calls() {
        assert_eq!(stable_hash("u_abc123"), stable_hash("u_abc123"));
        assert_ne!(stable_hash("u_abc123"), stable_hash("u_abc124"));
    }

    #[test]
    fn remap_stays_in_range() {
        for index in 0..1_000 {
            let id = format!("prod_{index}");
            let mapped = remap_to_range(&id, 100_000, 999_999);
            assert!((100_000..=999_999).contains(&mapped));
        }
    }

    #[test]
    fn remap_is_deterministic() {
        assert_eq!(
            remap_to_range("s_0011223344556677", 1_000, 9_999),
            remap_to_range("s_0011223344556677", 1_000, 9_999)
        );
    }

    #[test]
    fn stable_pick_is_keyed_by_id() {
        let browsers = ["Chrome", "Safari", "Firefox", "Edge"];
        let picked = pick_stable("e_1", &browsers);
        assert_eq!(picked, pick_stable("e_1", &browsers));
        assert!(browsers.contains(&picked));
    }
}
