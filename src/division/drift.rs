use serde::{Serialize, Deserialize};
use super::types::{AllocationResult, ResourcePool};

/// Signed difference between what was handed out and what was in the pool.
/// Positive means rounding gave away more than existed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDrift {
    pub gems: i64,
    pub gold: i64,
    pub diamonds: i64,
}

impl ResourceDrift {
    pub fn is_exact(&self) -> bool {
        self.gems == 0 && self.gold == 0 && self.diamonds == 0
    }
}

fn signed_diff(a: u64, b: u64) -> i64 {
    (a as i128 - b as i128).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Sums each resource over an allocation
pub fn allocated_totals(results: &[AllocationResult]) -> ResourcePool {
    results.iter().fold(ResourcePool::default(), |acc, r| ResourcePool {
        gems: acc.gems.saturating_add(r.gems_received),
        gold: acc.gold.saturating_add(r.gold_received),
        diamonds: acc.diamonds.saturating_add(r.diamonds_received),
    })
}

/// Reports rounding drift. An empty allocation hands out nothing, so its
/// drift is minus the whole pool.
pub fn drift(pool: &ResourcePool, results: &[AllocationResult]) -> ResourceDrift {
    let allocated = allocated_totals(results);
    ResourceDrift {
        gems: signed_diff(allocated.gems, pool.gems),
        gold: signed_diff(allocated.gold, pool.gold),
        diamonds: signed_diff(allocated.diamonds, pool.diamonds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::{allocate, Participant};

    #[test]
    fn thirds_of_ten_drift_by_one() {
        let pool = ResourcePool::new(10, 9, 0);
        let crew = vec![
            Participant::new("A", 1),
            Participant::new("B", 1),
            Participant::new("C", 1),
        ];
        let results = allocate(&pool, &crew);

        let d = drift(&pool, &results);
        assert_eq!(d.gems, -1);
        assert_eq!(d.gold, 0);
        assert_eq!(d.diamonds, 0);
        assert!(!d.is_exact());
    }

    #[test]
    fn halves_of_five_overshoot() {
        let pool = ResourcePool::new(5, 0, 0);
        let crew = vec![Participant::new("A", 1), Participant::new("B", 1)];
        let d = drift(&pool, &allocate(&pool, &crew));
        assert_eq!(d.gems, 1);
    }

    #[test]
    fn totals_of_empty_allocation() {
        assert_eq!(allocated_totals(&[]), ResourcePool::default());
        let pool = ResourcePool::new(3, 2, 1);
        let d = drift(&pool, &[]);
        assert_eq!((d.gems, d.gold, d.diamonds), (-3, -2, -1));
    }
}
