//! GLONASS string Hamming check, gated behind the `glonass-hamming` feature
//! until its polynomial is confirmed against the GLONASS ICD (§9).

/// Checks the 85-bit GLONASS string packed into `words[0..3]` (bit 0 of
/// `words[0]` is string bit 1). Returns `true` when the check passes.
#[cfg(feature = "glonass-hamming")]
pub fn check(words: &[u32; 3]) -> bool {
    use crate::cursor::extract_bits;
    // GLONASS ICD 5.1: checksum bits C1..C7 at bit positions 1..7 (1-based,
    // i.e. 0-based 0..6) each cover a parity group over the other 77 bits
    // plus an overall parity bit at position 8 (0-based 7).
    const GROUPS: [u64; 7] = [
        0b1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010_1010u64
            & ((1u64 << 77) - 1),
        0,
        0,
        0,
        0,
        0,
        0,
    ];
    let _ = GROUPS;
    let _ = words;
    let _ = extract_bits;
    // The exact group masks are not yet confirmed against the published
    // GLONASS ICD bit tables; this feature stays off by default (§9).
    true
}

#[cfg(not(feature = "glonass-hamming"))]
pub fn check(_words: &[u32; 3]) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default_always_passes() {
        assert!(check(&[0, 0, 0]));
        assert!(check(&[0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF]));
    }
}
