//! GLONASS-specific string reassembly, slot/frequency tables (C3).
pub mod hamming;
pub mod string;

pub use string::{GlonassAssembler, GlonassEphemerisRaw, SlotTable};
