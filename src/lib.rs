pub mod chart;
pub mod dataset;
pub mod error;
pub mod report;

pub use chart::{render, ChartSpec, ChartStyle};
pub use dataset::{Dataset, Series};
pub use error::ChartError;
