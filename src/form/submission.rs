use serde::{Deserialize, Serialize};
use crate::division::{Participant, ResourcePool};

/// A value as it arrives from a number input: either already a JSON number
/// or the raw text the user typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCount {
    Number(f64),
    Text(String),
}

impl Default for RawCount {
    fn default() -> Self {
        RawCount::Number(0.0)
    }
}

impl RawCount {
    /// Clamps to a non-negative integer; anything unusable becomes 0
    pub fn to_count(&self) -> u64 {
        match self {
            RawCount::Number(n) if n.is_finite() && *n > 0.0 => n.trunc() as u64,
            RawCount::Number(_) => 0,
            RawCount::Text(s) => parse_count(s),
        }
    }

    pub fn to_priority(&self) -> u32 {
        u32::try_from(self.to_count()).unwrap_or(u32::MAX)
    }
}

/// Parses the leading integer of a text input the way a browser number field
/// hands it over: "12abc" => 12, "3.7" => 3. Empty, non-numeric and negative
/// input all become 0; values too large for u64 saturate.
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let leading: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };

    if leading.is_empty() || negative {
        return 0;
    }

    leading.parse().unwrap_or(u64::MAX)
}

/// Priority field of the crew editor, saturated to the priority range
pub fn parse_priority(raw: &str) -> u32 {
    u32::try_from(parse_count(raw)).unwrap_or(u32::MAX)
}

/// Treasure vault edit from the frontend. Each input is sent on its own, so
/// any of the three may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct TreasureForm {
    pub gems: Option<RawCount>,
    pub gold: Option<RawCount>,
    pub diamonds: Option<RawCount>,
}

impl TreasureForm {
    /// The vault this form describes, missing inputs counting as 0
    pub fn to_pool(&self) -> ResourcePool {
        let count = |raw: &Option<RawCount>| raw.as_ref().map(RawCount::to_count).unwrap_or(0);
        ResourcePool {
            gems: count(&self.gems),
            gold: count(&self.gold),
            diamonds: count(&self.diamonds),
        }
    }
}

/// In-place edit of one crew card; absent fields stay as they were
#[derive(Debug, Default, Deserialize)]
pub struct PirateEdit {
    pub name: Option<String>,
    pub priority: Option<RawCount>,
}

/// Crew member as submitted to the stateless endpoint
#[derive(Debug, Deserialize)]
pub struct PirateForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: RawCount,
}

impl PirateForm {
    pub fn to_participant(&self) -> Participant {
        Participant::new(self.name.clone(), self.priority.to_priority())
    }
}

/// Full division request: vault plus crew, sanitized before division
#[derive(Debug, Default, Deserialize)]
pub struct DivisionRequest {
    #[serde(default)]
    pub treasure: TreasureForm,
    #[serde(default)]
    pub crew: Vec<PirateForm>,
}

impl DivisionRequest {
    pub fn sanitize(&self) -> (ResourcePool, Vec<Participant>) {
        (
            self.treasure.to_pool(),
            self.crew.iter().map(PirateForm::to_participant).collect(),
        )
    }
}
