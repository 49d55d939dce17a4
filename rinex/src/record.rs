//! Top-level record aggregate
use std::collections::BTreeMap;

use hifitime::Epoch;

use crate::{navigation::NavigationStore, observation::ObservationStore};

/// Comments keyed by the epoch/position they were authored at, so the
/// writer can re-insert them at the position they preceded (§3).
pub type Comments = BTreeMap<Epoch, Vec<String>>;

/// Either of the two record bodies this codec understands.
#[derive(Debug, Clone)]
pub enum Record {
    Observation(ObservationStore),
    Navigation(NavigationStore),
}

impl Record {
    pub fn as_obs(&self) -> Option<&ObservationStore> {
        match self {
            Self::Observation(store) => Some(store),
            _ => None,
        }
    }

    pub fn as_mut_obs(&mut self) -> Option<&mut ObservationStore> {
        match self {
            Self::Observation(store) => Some(store),
            _ => None,
        }
    }

    pub fn as_nav(&self) -> Option<&NavigationStore> {
        match self {
            Self::Navigation(store) => Some(store),
            _ => None,
        }
    }

    pub fn as_mut_nav(&mut self) -> Option<&mut NavigationStore> {
        match self {
            Self::Navigation(store) => Some(store),
            _ => None,
        }
    }
}
