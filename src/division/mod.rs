pub mod types;
pub mod allocator;
pub mod drift;

pub use types::{AllocationResult, Participant, ResourcePool};
pub use allocator::allocate;
pub use drift::{drift, ResourceDrift};
