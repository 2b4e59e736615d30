use super::types::{AllocationResult, Participant, ResourcePool};

/// Claim strength of an eligible participant: priority 1 => 1.0, priority 2 => 0.5, ...
fn weight(priority: u32) -> f64 {
    1.0 / priority as f64
}

/// Rounds half away from zero. Quantities are never negative, so this is
/// the same as rounding ties up.
fn share(quantity: u64, fraction: f64) -> u64 {
    (quantity as f64 * fraction).round() as u64
}

/// Normalized share of every participant, in input order.
///
/// Ineligible participants (priority 0) get a fraction of 0.0. Returns
/// `None` when nobody is eligible, since there is nothing to normalize by.
pub fn fractions(participants: &[Participant]) -> Option<Vec<f64>> {
    if !participants.iter().any(Participant::is_eligible) {
        return None;
    }

    let total_weight: f64 = participants
        .iter()
        .filter(|p| p.is_eligible())
        .map(|p| weight(p.priority))
        .sum();

    Some(
        participants
            .iter()
            .map(|p| {
                if p.is_eligible() {
                    weight(p.priority) / total_weight
                } else {
                    0.0
                }
            })
            .collect(),
    )
}

/// Splits the pool across the crew using inverse-priority weights.
///
/// Each resource is rounded independently, so the allocated sum of a
/// resource may differ from the pool by a few units (see [`super::drift`]).
/// If no participant has a priority above zero the result is empty, not a
/// list of zero entries.
///
/// Precision: quantities are multiplied as `f64`, so pools above 2^53 of a
/// single resource lose exactness in the low digits.
pub fn allocate(pool: &ResourcePool, participants: &[Participant]) -> Vec<AllocationResult> {
    let Some(fractions) = fractions(participants) else {
        return Vec::new();
    };

    participants
        .iter()
        .zip(fractions)
        .map(|(p, fraction)| {
            if !p.is_eligible() {
                return AllocationResult::empty_handed(&p.name);
            }
            AllocationResult {
                pirate_name: p.name.clone(),
                gems_received: share(pool.gems, fraction),
                gold_received: share(pool.gold, fraction),
                diamonds_received: share(pool.diamonds, fraction),
            }
        })
        .collect()
}
