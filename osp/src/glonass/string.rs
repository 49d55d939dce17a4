//! GLONASS string reassembly, slot table, and carrier-frequency table (C3).
use std::collections::HashMap;

use crate::cursor::extract_bits;
use crate::error::SubframeError;
use crate::glonass::hamming;

/// Receiver channel cap, mirroring [crate::gps::subframe::MAX_CHANNELS].
pub const MAX_CHANNELS: usize = 32;
/// GLONASS navigation strings 1-5 carry one satellite's immediate ephemeris.
const STRINGS_PER_FRAME: usize = 5;
/// Bits making up one GLONASS navigation string once unpacked (§GLOSSARY).
const STRING_BITS: usize = 85;

#[derive(Debug, Clone, Copy)]
struct Slot {
    sat_id: u8,
    words: [u32; 3],
}

/// Per-(receiver satellite id) slot/carrier-frequency assignment built from
/// strings 4 and the paired almanac strings 6..15.
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    slot_of_sat: HashMap<u8, u8>,
    freq_of_slot: HashMap<u8, i8>,
    pending_next_slot: Option<u8>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot_for(&self, sat_id: u8) -> Option<u8> {
        self.slot_of_sat.get(&sat_id).copied()
    }

    pub fn carrier_frequency_number(&self, slot: u8) -> Option<i8> {
        self.freq_of_slot.get(&slot).copied()
    }

    fn install_slot(&mut self, sat_id: u8, slot: u8) {
        self.slot_of_sat.insert(sat_id, slot);
    }

    fn note_next_slot(&mut self, n_a: u8) {
        self.pending_next_slot = Some(n_a);
    }

    fn note_carrier_frequency(&mut self, h_n_a: u8) {
        if let Some(slot) = self.pending_next_slot.take() {
            let signed = if h_n_a >= 25 {
                h_n_a as i16 - 32
            } else {
                h_n_a as i16
            };
            self.freq_of_slot.insert(slot, signed as i8);
        }
    }
}

/// The raw immediate ephemeris mantissas for one GLONASS satellite: strings
/// 1-5, each the unpacked 85-bit payload kept as three `u32` words.
#[derive(Debug, Clone, Copy)]
pub struct GlonassEphemerisRaw {
    pub sat_id: u8,
    pub slot: Option<u8>,
    pub strings: [[u32; 3]; STRINGS_PER_FRAME],
}

/// Packs ten raw 32-bit receiver words into three 32-bit words holding the
/// 85-bit string payload: each receiver word's low byte is dropped (assumed
/// framing/time-mark padding) and the remaining 24 bits are concatenated
/// big-endian-first, truncated to 85 bits.
fn pack_string(words: &[u32; 10]) -> [u32; 3] {
    let mut bits = Vec::with_capacity(240);
    for w in words {
        for shift in (0..24).rev() {
            bits.push((w >> shift) & 1);
        }
    }
    bits.truncate(STRING_BITS);
    let mut out = [0u32; 3];
    for (i, bit) in bits.iter().enumerate() {
        let word = i / 32;
        out[word] |= bit << (i % 32);
    }
    out
}

fn string_number(words: &[u32; 3]) -> u8 {
    extract_bits(words, 80, 4) as u8
}

fn slot_number_bits(words: &[u32; 3]) -> u8 {
    extract_bits(words, 10, 5) as u8
}

fn next_slot_bits(words: &[u32; 3]) -> u8 {
    extract_bits(words, 72, 5) as u8
}

fn carrier_frequency_bits(words: &[u32; 3]) -> u8 {
    extract_bits(words, 9, 5) as u8
}

/// Per-channel GLONASS string store plus the shared slot/frequency tables.
#[derive(Debug, Clone, Default)]
pub struct GlonassAssembler {
    slots: Vec<[Option<Slot>; STRINGS_PER_FRAME]>,
    pub table: SlotTable,
}

impl GlonassAssembler {
    pub fn new() -> Self {
        Self {
            slots: vec![[None; STRINGS_PER_FRAME]; MAX_CHANNELS],
            table: SlotTable::new(),
        }
    }

    /// Ingests ten raw receiver words for `channel`/`sat_id`. Returns
    /// `Ok(Some(ephemeris))` once strings 1-5 complete for the same
    /// satellite, `Ok(None)` otherwise.
    pub fn ingest(
        &mut self,
        channel: u8,
        sat_id: u8,
        words: [u32; 10],
    ) -> Result<Option<GlonassEphemerisRaw>, SubframeError> {
        let channel = channel as usize;
        if channel >= MAX_CHANNELS {
            return Err(SubframeError::Truncated);
        }
        let packed = pack_string(&words);
        if !hamming::check(&packed) {
            return Err(SubframeError::BadParity);
        }
        let n = string_number(&packed);

        if (1..=5).contains(&n) {
            self.slots[channel][(n - 1) as usize] = Some(Slot { sat_id, words: packed });
        }
        if n == 4 {
            let slot = slot_number_bits(&packed);
            self.table.install_slot(sat_id, slot);
        }
        if matches!(n, 6 | 8 | 10 | 12 | 14) {
            self.table.note_next_slot(next_slot_bits(&packed));
        }
        if matches!(n, 7 | 9 | 11 | 13 | 15) {
            self.table.note_carrier_frequency(carrier_frequency_bits(&packed));
        }

        Ok(self.try_complete(channel))
    }

    fn try_complete(&mut self, channel: usize) -> Option<GlonassEphemerisRaw> {
        let mut strings = [[0u32; 3]; STRINGS_PER_FRAME];
        let mut sat_id = None;
        for (i, slot) in self.slots[channel].iter().enumerate() {
            let s = (*slot)?;
            match sat_id {
                None => sat_id = Some(s.sat_id),
                Some(existing) if existing != s.sat_id => return None,
                _ => {}
            }
            strings[i] = s.words;
        }
        let sat_id = sat_id?;
        let slot = self.table.slot_for(sat_id);
        for s in self.slots[channel].iter_mut() {
            *s = None;
        }
        Some(GlonassEphemerisRaw { sat_id, slot, strings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_words(n: u8, extra_bits: &[(usize, u32, u32)]) -> [u32; 10] {
        let mut bits = vec![0u32; 240];
        for (i, b) in (0..4).rev().enumerate() {
            bits[80 + i] = ((n >> b) & 1) as u32;
        }
        for (lo, value, len) in extra_bits {
            for i in 0..*len {
                bits[lo + i as usize] = (value >> i) & 1;
            }
        }
        let mut words = [0u32; 10];
        for (i, word) in words.iter_mut().enumerate() {
            let mut w = 0u32;
            for b in 0..24u32 {
                w |= bits[i * 24 + b as usize] << (23 - b);
            }
            *word = w;
        }
        words
    }

    #[test]
    fn completes_on_five_strings_same_satellite() {
        let mut asm = GlonassAssembler::new();
        for n in 1..=4u8 {
            assert!(asm.ingest(0, 3, string_words(n, &[])).unwrap().is_none());
        }
        let eph = asm.ingest(0, 3, string_words(5, &[])).unwrap();
        assert!(eph.is_some());
        assert_eq!(eph.unwrap().sat_id, 3);
    }

    #[test]
    fn different_satellites_do_not_complete() {
        let mut asm = GlonassAssembler::new();
        asm.ingest(0, 3, string_words(1, &[])).unwrap();
        asm.ingest(0, 5, string_words(2, &[])).unwrap();
        asm.ingest(0, 3, string_words(3, &[])).unwrap();
        asm.ingest(0, 3, string_words(4, &[])).unwrap();
        let eph = asm.ingest(0, 3, string_words(5, &[])).unwrap();
        assert!(eph.is_none());
    }

    #[test]
    fn string4_installs_slot_number() {
        let mut asm = GlonassAssembler::new();
        asm.ingest(0, 3, string_words(4, &[(10, 7, 5)])).unwrap();
        assert_eq!(asm.table.slot_for(3), Some(7));
    }

    #[test]
    fn carrier_frequency_maps_high_values_negative() {
        let mut table = SlotTable::new();
        table.note_next_slot(12);
        table.note_carrier_frequency(30);
        assert_eq!(table.carrier_frequency_number(12), Some(30 - 32));
    }

    #[test]
    fn carrier_frequency_keeps_low_values_positive() {
        let mut table = SlotTable::new();
        table.note_next_slot(1);
        table.note_carrier_frequency(5);
        assert_eq!(table.carrier_frequency_number(1), Some(5));
    }
}
