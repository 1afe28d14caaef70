//! Unitized fund accounting: units outstanding and NAV per unit.

mod nav_model;
pub mod nav_sequencer;

pub use nav_model::*;
pub use nav_sequencer::sequence_nav;
