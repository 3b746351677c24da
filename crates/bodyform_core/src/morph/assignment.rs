//! Morph weight assignments and the adapter that applies them
//!
//! Rules never touch a mesh. They return a [`MorphAssignment`], an ordered
//! `{shape key: weight}` map, and an adapter implementing [`MorphTarget`]
//! writes it into whatever the renderer owns. [`InfluenceVector`] covers
//! the common case of a name -> index dictionary over a flat `f32` array.

use crate::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Shape-key name -> index into the renderer's influence array.
pub type MorphTargetDictionary = HashMap<String, usize>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MorphAssignment {
    weights: BTreeMap<String, f32>,
}

impl MorphAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, weight: f32) {
        self.weights.insert(key.to_string(), weight);
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.weights.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(key, weight)| (key.as_str(), *weight))
    }

    /// Layer `later` on top of `self`; keys written by both take the later weight.
    pub fn merge(&mut self, later: MorphAssignment) {
        self.weights.extend(later.weights);
    }

    pub fn as_map(&self) -> &BTreeMap<String, f32> {
        &self.weights
    }

    pub fn into_map(self) -> BTreeMap<String, f32> {
        self.weights
    }

    /// Write every weight into `target`. Keys the target does not know are
    /// skipped; returns how many weights landed.
    pub fn apply_to<T: MorphTarget + ?Sized>(&self, target: &mut T, config: &EngineConfig) -> usize {
        let mut applied = 0;
        for (key, weight) in self.iter() {
            if target.set_influence(key, weight) {
                applied += 1;
            } else if config.debug_missing_targets {
                debug!(shape_key = key, "morph target missing; weight skipped");
            }
        }
        applied
    }
}

impl From<BTreeMap<String, f32>> for MorphAssignment {
    fn from(weights: BTreeMap<String, f32>) -> Self {
        Self { weights }
    }
}

/// Anything that can receive a named shape-key weight.
pub trait MorphTarget {
    /// Returns `false` when the target has no channel for `key`.
    fn set_influence(&mut self, key: &str, weight: f32) -> bool;
}

/// Renderer-owned influence array addressed through its dictionary.
pub struct InfluenceVector<'a> {
    dictionary: &'a MorphTargetDictionary,
    influences: &'a mut [f32],
}

impl<'a> InfluenceVector<'a> {
    pub fn new(dictionary: &'a MorphTargetDictionary, influences: &'a mut [f32]) -> Self {
        Self { dictionary, influences }
    }
}

impl MorphTarget for InfluenceVector<'_> {
    fn set_influence(&mut self, key: &str, weight: f32) -> bool {
        let Some(&index) = self.dictionary.get(key) else {
            return false;
        };
        match self.influences.get_mut(index) {
            Some(slot) => {
                *slot = weight;
                true
            }
            None => false,
        }
    }
}

/// Object form used by persistence (`shape_keys`).
impl MorphTarget for BTreeMap<String, f32> {
    fn set_influence(&mut self, key: &str, weight: f32) -> bool {
        self.insert(key.to_string(), weight);
        true
    }
}
