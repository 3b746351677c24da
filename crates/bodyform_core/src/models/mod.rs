pub mod profile;

pub use profile::{sliders, Gender, MeasurementProfile, WeightClass};
