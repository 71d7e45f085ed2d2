pub mod aggregator;
pub mod estimator;
pub mod profile;
pub mod sampler;

pub use aggregator::{aggregate, AggregateError};
pub use profile::DeviceProfile;
pub use sampler::sample;
