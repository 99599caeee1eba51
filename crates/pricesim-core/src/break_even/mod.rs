pub mod analysis;
pub mod period;
pub mod trend;
