//! MID payload decoders (§6): one module per message this crate routes.
pub mod mid2;
pub mod mid6;
pub mod mid7;
pub mod mid15;
pub mod mid19;
pub mod mid28;
pub mod mid70;

pub use mid2::PositionFix;
pub use mid6::SoftwareVersion;
pub use mid7::ClockStatus;
pub use mid15::PackedEphemeris;
pub use mid19::ReceiverMasks;
pub use mid28::Measurement;
pub use mid70::GlonassEphemerisResponse;
