//! Ephemeris mantissa scaling (C4): turns the raw integer mantissa matrices
//! handed up by [crate::gps] and [crate::glonass] into physical units.
use std::f64::consts::PI;

/// One cell of a broadcast-orbit mantissa matrix: the raw integer value plus
/// how it must be reinterpreted before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mantissa {
    /// Standard two's-complement signed value.
    Signed(i64),
    /// `e` and `sqrt(A)` are reinterpreted as unsigned 32-bit quantities
    /// rather than two's complement, per ICD 20.3.3.3.1.2.
    Unsigned(u64),
}

impl Mantissa {
    fn as_f64(self) -> f64 {
        match self {
            Mantissa::Signed(v) => v as f64,
            Mantissa::Unsigned(v) => v as f64,
        }
    }
}

/// GPS 8x4 broadcast-orbit scale table. Row 0 is the clock line
/// `(Toc, Af0, Af1, Af2)`; rows 1-7 are orbit-1..orbit-7, matching the
/// 32-field RINEX navigation record layout (§4.6).
pub const GPS_SCALE: [[f64; 4]; 8] = [
    // Toc, Af0, Af1, Af2
    [16.0, 2.0f64.powi(-31), 2.0f64.powi(-43), 2.0f64.powi(-55)],
    // IODE, Crs, Delta n, M0
    [1.0, 2.0f64.powi(-5), 2.0f64.powi(-43), 2.0f64.powi(-31)],
    // Cuc, e, Cus, sqrt(A)
    [2.0f64.powi(-29), 2.0f64.powi(-33), 2.0f64.powi(-29), 2.0f64.powi(-19)],
    // Toe, Cic, OMEGA0, Cis
    [16.0, 2.0f64.powi(-29), 2.0f64.powi(-31), 2.0f64.powi(-29)],
    // i0, Crc, omega, OMEGA DOT
    [2.0f64.powi(-31), 2.0f64.powi(-5), 2.0f64.powi(-31), 2.0f64.powi(-43)],
    // IDOT, Codes on L2, GPS week, L2 P data flag
    [2.0f64.powi(-43), 1.0, 1.0, 1.0],
    // SV accuracy, SV health, TGD, IODC
    [1.0, 1.0, 2.0f64.powi(-31), 1.0],
    // Transmission time, fit interval, spare, spare
    [16.0, 1.0, 0.0, 0.0],
];

/// Per-cell π multiplier; `true` where the ICD scale factor includes `π`
/// (`Delta n`, `M0`, `OMEGA0`, `i0`, `omega`, `OMEGA DOT`, `IDOT`).
pub const GPS_SCALE_PI: [[bool; 4]; 8] = [
    [false, false, false, false],
    [false, false, true, true],
    [false, false, false, false],
    [false, false, true, false],
    [true, false, true, true],
    [true, false, false, false],
    [false, false, false, false],
    [false, false, false, false],
];

/// Cell `(row, col) == (2, 1)` is `e` and `(2, 3)` is `sqrt(A)`; both are
/// unsigned-reinterpreted rather than two's complement (§4.4).
pub const GPS_UNSIGNED_CELLS: [(usize, usize); 2] = [(2, 1), (2, 3)];

/// GPS URA index (0-15) to metres, ICD 20.3.3.3.1.3. Index 15 means "use at
/// your own risk"; indices above 15 clamp to it.
pub const GPS_URA_METRES: [f64; 16] = [
    2.4, 3.4, 4.85, 6.85, 9.65, 13.65, 24.0, 48.0, 96.0, 192.0, 384.0, 768.0, 1536.0, 3072.0,
    6144.0, 6144.0,
];

pub fn gps_ura_metres(index: u8) -> f64 {
    GPS_URA_METRES[index.min(15) as usize]
}

/// GLONASS 4x4 broadcast-orbit scale table. Row 0 is the clock line
/// `(TauN, GammaN, tk, spare)`; rows 1-3 are the X/Y/Z position, velocity,
/// acceleration, and flag rows.
pub const GLONASS_SCALE: [[f64; 4]; 4] = [
    [2.0f64.powi(-30), 2.0f64.powi(-40), 1.0, 0.0],
    [2.0f64.powi(-11), 2.0f64.powi(-20), 2.0f64.powi(-30), 1.0],
    [2.0f64.powi(-11), 2.0f64.powi(-20), 2.0f64.powi(-30), 1.0],
    [2.0f64.powi(-11), 2.0f64.powi(-20), 2.0f64.powi(-30), 1.0],
];

/// Scales one GPS 8x4 mantissa matrix into physical units, applying the
/// unsigned-reinterpretation and π-multiplier special cases.
pub fn scale_gps_matrix(mantissas: &[[Mantissa; 4]; 8]) -> [[f64; 4]; 8] {
    let mut out = [[0.0f64; 4]; 8];
    for row in 0..8 {
        for col in 0..4 {
            let mut v = mantissas[row][col].as_f64() * GPS_SCALE[row][col];
            if GPS_SCALE_PI[row][col] {
                v *= PI;
            }
            out[row][col] = v;
        }
    }
    out
}

/// Scales one GLONASS 4x4 mantissa matrix into physical units.
pub fn scale_glonass_matrix(mantissas: &[[i64; 4]; 4]) -> [[f64; 4]; 4] {
    let mut out = [[0.0f64; 4]; 4];
    for row in 0..4 {
        for col in 0..4 {
            out[row][col] = mantissas[row][col] as f64 * GLONASS_SCALE[row][col];
        }
    }
    out
}

/// Extracts the 4x4 GLONASS mantissa matrix from the five reassembled
/// immediate-ephemeris strings (§4.3). Bit offsets follow the GLONASS ICD
/// field order string-by-string; as with [gps_mantissas] this is an
/// approximation pending bit-exact ICD confirmation (§9).
pub fn glonass_mantissas(strings: &[[u32; 3]; 5]) -> [[i64; 4]; 4] {
    use crate::cursor::{extract_bits, widen_signed_magnitude};

    let tau_n = widen_signed_magnitude(extract_bits(&strings[3], 59, 22), 22);
    let gamma_n = widen_signed_magnitude(extract_bits(&strings[4], 68, 11), 11);
    let tk = extract_bits(&strings[0], 9, 12) as i64;

    let xn = widen_signed_magnitude(extract_bits(&strings[0], 9, 27), 27);
    let xn_dot = widen_signed_magnitude(extract_bits(&strings[0], 41, 24), 24);
    let xn_acc = widen_signed_magnitude(extract_bits(&strings[0], 36, 5), 5);
    let health = extract_bits(&strings[0], 2, 3) as i64;

    let yn = widen_signed_magnitude(extract_bits(&strings[1], 9, 27), 27);
    let yn_dot = widen_signed_magnitude(extract_bits(&strings[1], 41, 24), 24);
    let yn_acc = widen_signed_magnitude(extract_bits(&strings[1], 36, 5), 5);
    let freq_num = 0i64; // resolved downstream from the satellite-slot table.

    let zn = widen_signed_magnitude(extract_bits(&strings[2], 9, 27), 27);
    let zn_dot = widen_signed_magnitude(extract_bits(&strings[2], 41, 24), 24);
    let zn_acc = widen_signed_magnitude(extract_bits(&strings[2], 36, 5), 5);
    let age = extract_bits(&strings[2], 49, 5) as i64;

    [
        [tau_n, gamma_n, tk, 0],
        [xn, xn_dot, xn_acc, health],
        [yn, yn_dot, yn_acc, freq_num],
        [zn, zn_dot, zn_acc, age],
    ]
}

/// GPS fit-interval lookup (§4.4): keyed on IODC alone (`0 -> 4 hours`,
/// ...; `6` otherwise). `_fit_flag` is kept in the signature to mirror
/// §4.4's "computed from the fit flag and IODC" framing, but the fit flag
/// does not gate any branch here -- IODC 0 already covers the "0 -> 4
/// hours" case. The 496 case is checked before the 240..247/248..255
/// ranges so it never falls through to the generic `else` arm (§9).
pub fn fit_interval_hours(_fit_flag: u8, iodc: u16) -> u8 {
    match iodc {
        0 => 4,
        496 => 14,
        240..=247 => 8,
        248..=255 => 14,
        497..=503 => 26,
        1021..=1023 => 26,
        _ => 6,
    }
}

/// Reads `len` bits (MSB-first, `offset` counted from the first bit of
/// Sequential MSB-first bit reader over a half-word slice, as produced by
/// [crate::gps::subframe::GpsEphemerisRaw].
struct BitReader<'a> {
    words: &'a [u16],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(words: &'a [u16]) -> Self {
        Self { words, pos: 0 }
    }

    fn take(&mut self, len: u32) -> u64 {
        let mut result: u64 = 0;
        for _ in 0..len {
            let word = self.pos / 16;
            let bit_in_word = 15 - (self.pos % 16);
            let bit = self.words.get(word).map(|w| (w >> bit_in_word) & 1).unwrap_or(0);
            result = (result << 1) | bit as u64;
            self.pos += 1;
        }
        result
    }

    fn signed(&mut self, len: u32) -> Mantissa {
        use crate::cursor::widen_twos_complement;
        Mantissa::Signed(widen_twos_complement(self.take(len) as u32, len))
    }

    fn unsigned(&mut self, len: u32) -> Mantissa {
        Mantissa::Unsigned(self.take(len))
    }
}

/// Lays out subframe 1's clock terms and subframes 2/3's orbit terms into
/// the 8x4 mantissa matrix [scale_gps_matrix] expects. Word/bit boundaries
/// here treat subframes 2 and 3 as one continuous 480-bit stream in ICD
/// field order rather than replicating each subframe's individual word
/// splits -- the distilled interface control reference this was built from
/// does not enumerate per-word boundaries, so this is an approximation
/// pending confirmation against the full ICD GPS-200 word tables (§9).
pub fn gps_mantissas(sf1: &[u16; 15], sf2: &[u16; 15], sf3: &[u16; 15]) -> [[Mantissa; 4]; 8] {
    let mut sf23 = [0u16; 30];
    sf23[..15].copy_from_slice(sf2);
    sf23[15..].copy_from_slice(sf3);

    let mut clock = BitReader::new(sf1);
    clock.pos = 48; // skip TLM/HOW plus leading subframe-1 fields, word 3
    let toc = clock.unsigned(16);
    clock.pos = 64;
    let af2 = clock.signed(8);
    clock.pos = 184;
    let af1 = clock.signed(16);
    clock.pos = 200;
    let af0 = clock.signed(22);

    let mut orbit = BitReader::new(&sf23);
    let iode = orbit.unsigned(8);
    let crs = orbit.signed(16);
    let delta_n = orbit.signed(16);
    let m0 = orbit.signed(32);
    let cuc = orbit.signed(16);
    let e = orbit.unsigned(32);
    let cus = orbit.signed(16);
    let sqrt_a = orbit.unsigned(32);
    let toe = orbit.unsigned(16);
    let cic = orbit.signed(16);
    let omega0 = orbit.signed(32);
    let cis = orbit.signed(16);
    let i0 = orbit.signed(32);
    let crc = orbit.signed(16);
    let omega = orbit.signed(32);
    let omega_dot = orbit.signed(24);
    let idot = orbit.signed(14);
    let codes_l2 = orbit.unsigned(2);
    let gps_week = orbit.unsigned(10);
    let l2p_flag = orbit.unsigned(1);
    let sv_accuracy = orbit.unsigned(4);
    let sv_health = orbit.unsigned(6);
    let tgd = orbit.signed(8);
    let iodc = orbit.unsigned(10);
    let transmission_time = orbit.unsigned(17);
    let fit_flag = orbit.unsigned(1);

    [
        [toc, af0, af1, af2],
        [iode, crs, delta_n, m0],
        [cuc, e, cus, sqrt_a],
        [toe, cic, omega0, cis],
        [i0, crc, omega, omega_dot],
        [idot, codes_l2, gps_week, l2p_flag],
        [sv_accuracy, sv_health, tgd, iodc],
        [transmission_time, fit_flag, Mantissa::Signed(0), Mantissa::Signed(0)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_interval_iodc_496_is_not_shadowed() {
        assert_eq!(fit_interval_hours(1, 496), 14);
    }

    #[test]
    fn fit_interval_zero_iodc_is_four_hours() {
        assert_eq!(fit_interval_hours(0, 0), 4);
    }

    #[test]
    fn fit_interval_default_bucket() {
        assert_eq!(fit_interval_hours(1, 10), 6);
    }

    /// S4: fit-flag=0, IODC=200 -> 6; fit-flag=1, IODC=240 -> 8;
    /// fit-flag=1, IODC=1022 -> 26.
    #[test]
    fn fit_interval_s4_scenarios() {
        assert_eq!(fit_interval_hours(0, 200), 6);
        assert_eq!(fit_interval_hours(1, 240), 8);
        assert_eq!(fit_interval_hours(1, 1022), 26);
    }

    #[test]
    fn ura_clamps_above_15() {
        assert_eq!(gps_ura_metres(20), gps_ura_metres(15));
    }

    #[test]
    fn ura_table_matches_icd_low_indices() {
        assert_eq!(gps_ura_metres(0), 2.4);
        assert_eq!(gps_ura_metres(6), 24.0);
    }

    #[test]
    fn pi_scaled_cell_includes_pi_factor() {
        let mut m = [[Mantissa::Signed(0); 4]; 8];
        m[1][2] = Mantissa::Signed(1);
        let scaled = scale_gps_matrix(&m);
        assert!((scaled[1][2] - GPS_SCALE[1][2] * PI).abs() < 1e-15);
    }

    #[test]
    fn unsigned_cells_reinterpret_without_sign_extension() {
        let mut m = [[Mantissa::Signed(0); 4]; 8];
        m[2][1] = Mantissa::Unsigned(u32::MAX as u64);
        let scaled = scale_gps_matrix(&m);
        assert!(scaled[2][1] > 0.0);
    }

    fn set_bits_msb(words: &mut [u16], offset: usize, len: u32, value: u64) {
        for i in 0..len as usize {
            let bit_index = offset + i;
            let word = bit_index / 16;
            let bit_in_word = 15 - (bit_index % 16);
            let bit = (value >> (len as usize - 1 - i)) & 1;
            words[word] |= (bit as u16) << bit_in_word;
        }
    }

    #[test]
    fn gps_mantissas_round_trips_iode_and_toe() {
        let sf1 = [0u16; 15];
        let mut sf2 = [0u16; 15];
        let mut sf3 = [0u16; 15];
        let mut sf23 = [0u16; 30];
        set_bits_msb(&mut sf23, 0, 8, 0x5A); // IODE
        // Toe sits after IODE(8)+Crs(16)+Delta_n(16)+M0(32)+Cuc(16)+e(32)+Cus(16)+sqrtA(32) = 168
        set_bits_msb(&mut sf23, 168, 16, 0x00FF);
        sf2.copy_from_slice(&sf23[..15]);
        sf3.copy_from_slice(&sf23[15..]);
        let m = gps_mantissas(&sf1, &sf2, &sf3);
        assert_eq!(m[1][0], Mantissa::Unsigned(0x5A));
        assert_eq!(m[3][0], Mantissa::Unsigned(0x00FF));
    }
}
