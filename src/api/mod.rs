pub mod chart;
pub mod shared_options;

pub use chart::{Chart, ChartConstructor};
pub use shared_options::SharedOptions;
