pub mod forecast;
pub mod group;
pub mod observation;

pub use forecast::{Flags, Forecast};
pub use group::ObservationGroup;
pub use observation::Observation;
