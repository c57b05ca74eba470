//! The DJB2-mod selection helper shared by the random-string store, the
//! enter-chat template pick, and the reply-chat template/response pick.

/// Deterministically reduces `seed` to an index in `0..count` via DJB2.
///
/// Returns `0` when `count == 0`. Every caller in this crate selects by
/// hashing a piece of input that is fully known ahead of time (a chat
/// name, a received message), so the same seed always yields the same
/// index, which callers rely on for reproducible template/response
/// selection; do not substitute a different hash without checking every
/// scenario that depends on a specific selection outcome.
pub fn select_index(seed: &str, count: usize) -> usize {
    if count == 0 {
        return 0;
    }

    let mut hash: u64 = 5381;
    for byte in seed.bytes() {
        hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(byte as u64);
    }

    (hash % count as u64) as usize
}
