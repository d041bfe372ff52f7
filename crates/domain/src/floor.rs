//! Floor numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A floor number. Floors are numbered from 1 (the ground floor) upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Floor(u32);

impl Floor {
    /// The lowest floor of every building.
    pub const GROUND: Self = Self(1);

    /// Wrap a floor number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFloor`] for `0`.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::InvalidFloor);
        }
        Ok(Self(value))
    }

    /// The raw floor number.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Number of floors between `self` and `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }
}

impl TryFrom<u32> for Floor {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Floor> for u32 {
    fn from(floor: Floor) -> Self {
        floor.0
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
