//! Station: the landing at one floor of a system.

use serde::{Deserialize, Serialize};

use crate::floor::Floor;
use crate::id::{StationId, SystemId};
use crate::time::Timestamp;

/// One landing per floor. A station under maintenance accepts no calls
/// and is never chosen as a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub system_id: SystemId,
    pub floor: Floor,
    pub under_maintenance_since: Option<Timestamp>,
}

impl Station {
    /// Create an in-service station at `floor`.
    #[must_use]
    pub fn new(system_id: SystemId, floor: Floor) -> Self {
        Self {
            id: StationId::new(),
            system_id,
            floor,
            under_maintenance_since: None,
        }
    }

    #[must_use]
    pub fn is_under_maintenance(&self) -> bool {
        self.under_maintenance_since.is_some()
    }

    /// Mark or unmark the station as under maintenance.
    ///
    /// Marking an already marked station keeps the first timestamp.
    pub fn set_maintenance(&mut self, under_maintenance: bool, at: Timestamp) {
        if !under_maintenance {
            self.under_maintenance_since = None;
        } else if self.under_maintenance_since.is_none() {
            self.under_maintenance_since = Some(at);
        }
    }
}
