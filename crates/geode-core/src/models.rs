pub mod change;
pub mod observation;
pub mod point;

pub use change::{ChangeRecord, ChangeSummary, DirectionCount, SIGNIFICANCE_THRESHOLD};
pub use observation::{Observation, ObservationMiss};
pub use point::{BoundingBox, SamplePoint};
