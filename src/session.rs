use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::division::{allocate, AllocationResult, Participant, ResourcePool};
use crate::form::RawCount;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No pirate at position {index} (crew size {len})")]
    NoSuchPirate { index: usize, len: usize },
}

/// Everything one user is editing: the vault, the crew, and the last
/// distribution. Lives only as long as the browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewSession {
    pub treasure: ResourcePool,
    pub crew: Vec<Participant>,
    pub results: Vec<AllocationResult>,
    #[serde(default)]
    last_stamp: i64,
}

impl CrewSession {
    pub fn set_gems(&mut self, raw: &RawCount) {
        self.treasure.gems = raw.to_count();
    }

    pub fn set_gold(&mut self, raw: &RawCount) {
        self.treasure.gold = raw.to_count();
    }

    pub fn set_diamonds(&mut self, raw: &RawCount) {
        self.treasure.diamonds = raw.to_count();
    }

    /// Appends a crew member with priority 1 and a generated name
    pub fn add_pirate(&mut self) -> &Participant {
        self.add_pirate_at(chrono::Utc::now().timestamp_millis())
    }

    /// Names are `Pirate-<millis>`; two additions within the same
    /// millisecond (or a clock that went backwards) still get distinct names.
    fn add_pirate_at(&mut self, now_millis: i64) -> &Participant {
        let stamp = now_millis.max(self.last_stamp.saturating_add(1));
        self.last_stamp = stamp;

        let pirate = Participant::new(format!("Pirate-{}", stamp), 1);
        debug!(name = %pirate.name, "crew member added");
        self.crew.push(pirate);
        &self.crew[self.crew.len() - 1]
    }

    fn pirate_mut(&mut self, index: usize) -> Result<&mut Participant, SessionError> {
        let len = self.crew.len();
        self.crew
            .get_mut(index)
            .ok_or(SessionError::NoSuchPirate { index, len })
    }

    pub fn rename_pirate(&mut self, index: usize, name: &str) -> Result<(), SessionError> {
        self.pirate_mut(index)?.name = name.to_string();
        Ok(())
    }

    pub fn set_priority(&mut self, index: usize, raw: &RawCount) -> Result<(), SessionError> {
        self.pirate_mut(index)?.priority = raw.to_priority();
        Ok(())
    }

    pub fn remove_pirate(&mut self, index: usize) -> Result<Participant, SessionError> {
        if index >= self.crew.len() {
            return Err(SessionError::NoSuchPirate { index, len: self.crew.len() });
        }
        let removed = self.crew.remove(index);
        debug!(name = %removed.name, index, "crew member removed");
        Ok(removed)
    }

    /// Divides the current vault across the current crew. The previous
    /// distribution is discarded, never merged.
    pub fn divide(&mut self) -> &[AllocationResult] {
        self.results = allocate(&self.treasure, &self.crew);
        debug!(
            crew = self.crew.len(),
            shares = self.results.len(),
            "treasure divided"
        );
        &self.results
    }
}
