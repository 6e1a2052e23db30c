//! Configuration section definitions.

mod combine;

pub use combine::CombineSectionConfig;
