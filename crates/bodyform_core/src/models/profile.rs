//! Measurement profile, gender and weight class
//!
//! A profile maps slider names to quantized values. Continuous sliders live
//! in `[0, 1]`, discrete ones (stomach shape, head shape, trimester, ...)
//! take integral tick values. Body height is carried separately in inches
//! because it is not a slider and is never normalized.

use crate::error::BodyError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Slider names understood by the rule engine and the encoder.
pub mod sliders {
    pub const HEAD_SIZE: &str = "headSize";
    pub const HEAD_SHAPE: &str = "headShape";
    pub const CHIN_SHAPE: &str = "chinShape";
    pub const NECK_HEIGHT: &str = "neckHeight";
    pub const NECK_WIDTH: &str = "neckWidth";
    /// Gate for mirroring stomach width onto the neck shape key (0 or 1)
    pub const NECK_SHAPE: &str = "neckShape";
    pub const SHOULDER_WIDTH: &str = "shoulderWidth";
    pub const SHOULDER_HEIGHT: &str = "shoulderHeight";
    pub const STOMACH_SHAPE: &str = "stomachShape";
    pub const STOMACH_WIDTH: &str = "stomachWidth";
    pub const TORSO_DISTENTION: &str = "torsoDistention";
    pub const BREAST_SIZE: &str = "breastSize";
    pub const TRIMESTER: &str = "trimester";
    pub const ARM_SIZE: &str = "armSize";
    pub const ARM_DISTENTION: &str = "armDistention";
    pub const LEG_SIZE: &str = "legSize";
    pub const LEG_HEIGHT: &str = "legHeight";
    pub const CROTCH_HEIGHT: &str = "crotchHeight";
    pub const HIPS_SIZE: &str = "hipsSize";
    pub const BOTTOM_WIDTH: &str = "bottomWidth";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = BodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Gender::Female),
            "male" | "m" => Ok(Gender::Male),
            _ => Err(BodyError::UnknownGender(s.to_string())),
        }
    }
}

/// Coarse body-mass category. Selects the weight-class rule set and the
/// first segment of the body shape code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WeightClass {
    Lean,
    Average,
    Heavy,
    VeryHeavy,
}

impl WeightClass {
    pub const ALL: [WeightClass; 4] =
        [WeightClass::Lean, WeightClass::Average, WeightClass::Heavy, WeightClass::VeryHeavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightClass::Lean => "lean",
            WeightClass::Average => "average",
            WeightClass::Heavy => "heavy",
            WeightClass::VeryHeavy => "very-heavy",
        }
    }

    /// Lenient parse used where an unknown class must degrade instead of fail.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "lean" => Some(WeightClass::Lean),
            "average" => Some(WeightClass::Average),
            "heavy" => Some(WeightClass::Heavy),
            "very-heavy" | "veryheavy" => Some(WeightClass::VeryHeavy),
            _ => None,
        }
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightClass {
    type Err = BodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeightClass::parse(s).ok_or_else(|| BodyError::UnknownWeightClass(s.to_string()))
    }
}

/// Slider name -> quantized value, plus raw body height in inches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MeasurementProfile {
    #[serde(default)]
    pub sliders: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_in: Option<f32>,
}

impl MeasurementProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sliders(sliders: BTreeMap<String, f32>) -> Self {
        Self { sliders, height_in: None }
    }

    /// Builder-style setter
    pub fn with(mut self, slider: &str, value: f32) -> Self {
        self.set(slider, value);
        self
    }

    pub fn with_height(mut self, height_in: f32) -> Self {
        self.height_in = Some(height_in);
        self
    }

    pub fn set(&mut self, slider: &str, value: f32) {
        self.sliders.insert(slider.to_string(), value);
    }

    /// Value as measured, `None` when the slider was never set.
    pub fn measured(&self, slider: &str) -> Option<f32> {
        self.sliders.get(slider).copied()
    }

    /// Value read by the morph rules and the encoder: unset sliders rest at 0.
    pub fn slider(&self, slider: &str) -> f32 {
        self.measured(slider).unwrap_or(0.0)
    }

    /// Discrete slider rounded to its tick index.
    pub fn index(&self, slider: &str) -> Option<i64> {
        self.measured(slider).filter(|v| v.is_finite()).map(|v| v.round() as i64)
    }

    /// Raw height in inches, NaN when unknown so that every height tier
    /// comparison fails and the middle tier is selected.
    pub fn height(&self) -> f32 {
        self.height_in.unwrap_or(f32::NAN)
    }
}
