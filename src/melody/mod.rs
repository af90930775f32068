pub mod classify;
pub mod contour;
pub mod error;
pub mod interval;
pub mod note;
pub mod params;
pub mod segment;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::classify;
pub use params::{ClassifierParams, FrameTiming};
pub use types::{Classification, Label};
