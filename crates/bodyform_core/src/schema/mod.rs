//! Measurement schema
//!
//! Per-gender catalogue of sliders grouped by body region. The catalogue is
//! embedded as YAML, parsed once on first use and shared as `&'static` data,
//! so schemas are immutable for the life of the process.
//!
//! Callers quantize raw UI input with [`SliderDefinition::quantize`] and
//! check a profile with [`GenderSchema::validate`] before handing it to the
//! rule engine; the rules themselves never validate.

use crate::error::{BodyError, Result};
use crate::models::{Gender, MeasurementProfile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

const SLIDERS_YAML: &str = include_str!("sliders_v1.yaml");
static CATALOGUE: OnceLock<SchemaCatalogue> = OnceLock::new();

/// Slack allowed when matching a value against a tick or range bound.
pub const TICK_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRegion {
    Head,
    Neck,
    Shoulders,
    Torso,
    Arms,
    Legs,
}

/// One slider range shared by every name in `keys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderDefinition {
    pub keys: Vec<String>,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub ticks: u32,
}

impl SliderDefinition {
    /// Tick position `min + index * step`, computed in f64 so that decimal
    /// steps land on the same f32 as the literal (0.7, not 0.70000005).
    pub fn tick_value(&self, index: u32) -> f32 {
        (self.min as f64 + index as f64 * self.step as f64) as f32
    }

    pub fn tick_values(&self) -> Vec<f32> {
        (0..self.ticks).map(|i| self.tick_value(i)).collect()
    }

    /// Index of the tick `value` sits on, if any.
    pub fn tick_index(&self, value: f32) -> Option<u32> {
        if !value.is_finite() {
            return None;
        }
        let step = self.step as f64;
        let offset = (value as f64 - self.min as f64) / step;
        let index = offset.round();
        if index < 0.0 || index >= self.ticks as f64 {
            return None;
        }
        if (offset - index).abs() * step > TICK_TOLERANCE {
            return None;
        }
        Some(index as u32)
    }

    /// Snap raw UI input to the nearest tick, clamping to the range.
    pub fn quantize(&self, raw: f32) -> f32 {
        if raw.is_nan() {
            return self.min;
        }
        let clamped = (raw as f64).clamp(self.min as f64, self.max as f64);
        let index = ((clamped - self.min as f64) / self.step as f64).round() as u32;
        self.tick_value(index.min(self.ticks.saturating_sub(1)))
    }

    /// Range and tick check for one slider value.
    pub fn check(&self, slider: &str, value: f32) -> Result<()> {
        let below = (value as f64) < self.min as f64 - TICK_TOLERANCE;
        let above = (value as f64) > self.max as f64 + TICK_TOLERANCE;
        if !value.is_finite() || below || above {
            return Err(BodyError::MeasurementOutOfRange {
                slider: slider.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        if self.tick_index(value).is_none() {
            return Err(BodyError::OffTick {
                slider: slider.to_string(),
                value,
                min: self.min,
                step: self.step,
            });
        }
        Ok(())
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.keys.is_empty() {
            return Err("slider definition without keys".to_string());
        }
        if !(self.step > 0.0) || !(self.max > self.min) {
            return Err(format!("sliders {:?} have an empty range or step", self.keys));
        }
        let spans = (self.max as f64 - self.min as f64) / self.step as f64;
        if (spans - spans.round()).abs() > TICK_TOLERANCE
            || spans.round() as u32 + 1 != self.ticks
        {
            return Err(format!(
                "sliders {:?} declare {} ticks but range/step gives {:.3}",
                self.keys,
                self.ticks,
                spans + 1.0
            ));
        }
        Ok(())
    }
}

/// Immutable slider catalogue for one gender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderSchema {
    pub gender: Gender,
    pub regions: BTreeMap<BodyRegion, Vec<SliderDefinition>>,
}

impl GenderSchema {
    pub fn slider(&self, name: &str) -> Option<&SliderDefinition> {
        self.regions.values().flatten().find(|def| def.keys.iter().any(|k| k == name))
    }

    pub fn region_of(&self, name: &str) -> Option<BodyRegion> {
        self.regions
            .iter()
            .find(|(_, defs)| defs.iter().any(|def| def.keys.iter().any(|k| k == name)))
            .map(|(region, _)| *region)
    }

    pub fn slider_names(&self) -> impl Iterator<Item = &str> {
        self.regions.values().flatten().flat_map(|def| def.keys.iter().map(String::as_str))
    }

    /// Reject unknown sliders, out-of-range values and values off the tick grid.
    /// Sliders absent from the profile are allowed; see [`GenderSchema::complete`].
    pub fn validate(&self, profile: &MeasurementProfile) -> Result<()> {
        for (name, value) in &profile.sliders {
            let def = self.slider(name).ok_or_else(|| BodyError::UnknownSlider(name.clone()))?;
            def.check(name, *value)?;
        }
        Ok(())
    }

    /// Copy of `profile` with every slider snapped to its nearest tick.
    pub fn quantize(&self, profile: &MeasurementProfile) -> Result<MeasurementProfile> {
        let mut quantized = MeasurementProfile { sliders: BTreeMap::new(), height_in: profile.height_in };
        for (name, value) in &profile.sliders {
            let def = self.slider(name).ok_or_else(|| BodyError::UnknownSlider(name.clone()))?;
            quantized.set(name, def.quantize(*value));
        }
        Ok(quantized)
    }

    /// Copy of `profile` with every schema slider it omits set to that
    /// slider's minimum tick, so stored profiles list every value evaluated.
    pub fn complete(&self, profile: &MeasurementProfile) -> MeasurementProfile {
        let mut completed = profile.clone();
        for def in self.regions.values().flatten() {
            for key in &def.keys {
                completed.sliders.entry(key.clone()).or_insert(def.min);
            }
        }
        completed
    }

    fn validate_definitions(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for def in self.regions.values().flatten() {
            def.validate()?;
            for key in &def.keys {
                if !seen.insert(key.as_str()) {
                    return Err(format!("{} schema defines slider {} twice", self.gender, key));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaFile {
    version: u8,
    genders: BTreeMap<Gender, BTreeMap<BodyRegion, Vec<SliderDefinition>>>,
}

/// Both gender schemas loaded from one catalogue document.
#[derive(Debug, Clone)]
pub struct SchemaCatalogue {
    pub version: u8,
    female: GenderSchema,
    male: GenderSchema,
}

impl SchemaCatalogue {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: SchemaFile =
            serde_yaml::from_str(yaml).map_err(|e| BodyError::Schema(e.to_string()))?;
        SchemaCatalogue::try_from(file).map_err(BodyError::Schema)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            BodyError::Schema(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn schema(&self, gender: Gender) -> &GenderSchema {
        match gender {
            Gender::Female => &self.female,
            Gender::Male => &self.male,
        }
    }
}

impl TryFrom<SchemaFile> for SchemaCatalogue {
    type Error = String;

    fn try_from(mut file: SchemaFile) -> std::result::Result<Self, Self::Error> {
        let mut take = |gender: Gender| -> std::result::Result<GenderSchema, String> {
            let regions = file
                .genders
                .remove(&gender)
                .ok_or_else(|| format!("catalogue has no {} schema", gender))?;
            let schema = GenderSchema { gender, regions };
            schema.validate_definitions()?;
            Ok(schema)
        };
        let female = take(Gender::Female)?;
        let male = take(Gender::Male)?;
        Ok(Self { version: file.version, female, male })
    }
}

/// Embedded catalogue, parsed on first use.
pub fn catalogue() -> &'static SchemaCatalogue {
    CATALOGUE.get_or_init(|| {
        SchemaCatalogue::from_yaml(SLIDERS_YAML).expect("embedded slider catalogue invalid")
    })
}

pub fn define_schema(gender: Gender) -> &'static GenderSchema {
    catalogue().schema(gender)
}
