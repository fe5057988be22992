mod summary;
pub mod views;

pub use summary::{segment_options, ProspectingReport};
