//! SiRF One Socket Protocol frame reader and navigation-message decoder.
//!
//! Reads framed or stripped OSP byte streams ([frame]), decodes mixed-endian
//! fields ([cursor]), reassembles GPS/GLONASS navigation messages
//! ([gps], [glonass]), scales ephemeris mantissas to physical units
//! ([ephemeris]), and routes decoded messages through a stateful dispatcher
//! ([dispatcher]) that emits observation epochs and ephemeris events.
pub mod cursor;
pub mod dispatcher;
pub mod ephemeris;
pub mod error;
pub mod frame;
pub mod glonass;
pub mod gps;
pub mod message;

pub mod prelude {
    pub use crate::{
        cursor::Cursor,
        dispatcher::{Config, Dispatcher, Ephemeris, Event, Observation},
        error::{CursorError, DispatchError, FrameError, SubframeError},
        frame::{FramedReader, StrippedReader},
    };
}
