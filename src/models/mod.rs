pub mod prediction;
pub mod table;

pub use prediction::{Prediction, Verdict};
pub use table::Table;
