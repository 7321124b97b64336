//! Host-side copy of the firmware's value generator.

const MULTIPLIER: u64 = 6364136223846793005;
const INCREMENT: u64 = 1;
const OPERATIONAL_SEED: u64 = 34449;

/// First `count` readings the firmware publishes after boot.
pub fn expected_readings(count: usize) -> Vec<u32> {
    let mut seed = OPERATIONAL_SEED;
    (0..count)
        .map(|_| {
            seed = MULTIPLIER.wrapping_mul(seed).wrapping_add(INCREMENT) & 0xFFFF_FFFF;
            (seed >> 16) as u32
        })
        .collect()
}

/// Position of `reading` in `sequence` at or after `from`.
pub fn position_of(sequence: &[u32], reading: u32, from: usize) -> Option<usize> {
    sequence[from.min(sequence.len())..]
        .iter()
        .position(|&r| r == reading)
        .map(|p| p + from)
}
