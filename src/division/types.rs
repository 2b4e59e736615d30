use serde::{Serialize, Deserialize};

/// The three countable quantities being divided
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub gems: u64,
    pub gold: u64,
    pub diamonds: u64,
}

impl ResourcePool {
    pub fn new(gems: u64, gold: u64, diamonds: u64) -> Self {
        Self { gems, gold, diamonds }
    }
}

/// A named crew member competing for a share of the pool.
/// Priority 1 outranks priority 2; priority 0 takes no share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub priority: u32,
}

impl Participant {
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self { name: name.into(), priority }
    }

    pub fn is_eligible(&self) -> bool {
        self.priority > 0
    }
}

/// What one participant walks away with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub pirate_name: String,
    pub gems_received: u64,
    pub gold_received: u64,
    pub diamonds_received: u64,
}

impl AllocationResult {
    pub fn empty_handed(name: &str) -> Self {
        Self {
            pirate_name: name.to_string(),
            gems_received: 0,
            gold_received: 0,
            diamonds_received: 0,
        }
    }
}
