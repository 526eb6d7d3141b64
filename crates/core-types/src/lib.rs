pub mod error;
pub mod series;
pub mod weights;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use series::{PriceMatrix, PriceSeries, ReturnSeries, ValueSeries};
pub use weights::WeightVector;
