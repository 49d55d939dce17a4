//! GPS-specific parity checking and subframe reassembly (C3).
pub mod parity;
pub mod subframe;

pub use subframe::{GpsAssembler, GpsEphemerisRaw};
