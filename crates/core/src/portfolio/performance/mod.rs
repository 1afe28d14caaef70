pub mod performance_calculator;
pub mod performance_model;

pub use performance_calculator::summarize;
pub use performance_model::*;
