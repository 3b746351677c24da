//! Region rules
//!
//! Stomach shape is a one-hot group. Shoulder width broadcasts onto its
//! family and onto the stomach-width member chosen by the stomach shape.
//! Stomach width writes its own group, then mirrors onto the generic
//! shoulder key and, when the neck gate is exactly 1, onto the neck shape.
//! The cross-coupling is intentional and stored shapes depend on it.

use super::assignment::MorphAssignment;
use super::keys::{
    active_stomach_width_key, NECK_SHAPE, PREGNANT_STOMACH_INDEX, SHOULDER_WIDTH,
    SHOULDER_WIDTH_FAMILY, STOMACH_SHAPE_GROUP, STOMACH_WIDTH_GROUP, TRIMESTER_GROUP,
};
use crate::models::{sliders, MeasurementProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct StomachShapeUpdate {
    pub assignment: MorphAssignment,
    /// Raised when the pregnant stomach variant is selected.
    pub pregnancy_extras_enabled: bool,
}

pub fn stomach_shape(profile: &MeasurementProfile) -> StomachShapeUpdate {
    let index = profile.index(sliders::STOMACH_SHAPE).unwrap_or(0);
    let mut assignment = MorphAssignment::new();
    STOMACH_SHAPE_GROUP.reset(&mut assignment);
    if let Some(key) = STOMACH_SHAPE_GROUP.member(index) {
        assignment.set(key, 1.0);
    }
    StomachShapeUpdate { assignment, pregnancy_extras_enabled: index == PREGNANT_STOMACH_INDEX }
}

pub fn shoulder_width(profile: &MeasurementProfile) -> MorphAssignment {
    let value = profile.slider(sliders::SHOULDER_WIDTH);
    let mut assignment = MorphAssignment::new();
    for key in SHOULDER_WIDTH_FAMILY {
        assignment.set(key, value);
    }
    let active = active_stomach_width_key(profile.index(sliders::STOMACH_SHAPE));
    STOMACH_WIDTH_GROUP.select(&mut assignment, active, value);
    assignment
}

pub fn stomach_width(profile: &MeasurementProfile, neck_gate: f32) -> MorphAssignment {
    let value = profile.slider(sliders::STOMACH_WIDTH);
    let mut assignment = MorphAssignment::new();
    let active = active_stomach_width_key(profile.index(sliders::STOMACH_SHAPE));
    STOMACH_WIDTH_GROUP.select(&mut assignment, active, value);
    assignment.set(SHOULDER_WIDTH, value);
    assignment.set(NECK_SHAPE, if neck_gate == 1.0 { value } else { 0.0 });
    assignment
}

/// Trimester keys follow the trimester slider (1..=3) while the pregnancy
/// extras are enabled, and are all zero otherwise.
pub fn trimester(profile: &MeasurementProfile, pregnancy_extras_enabled: bool) -> MorphAssignment {
    let mut assignment = MorphAssignment::new();
    TRIMESTER_GROUP.reset(&mut assignment);
    if pregnancy_extras_enabled {
        let index = profile.index(sliders::TRIMESTER).unwrap_or(0);
        if let Some(key) = index.checked_sub(1).and_then(|i| TRIMESTER_GROUP.member(i)) {
            assignment.set(key, 1.0);
        }
    }
    assignment
}
