//! Weight-class rule sets
//!
//! Each class sets the enlarged-head key against its own threshold, maps
//! the discrete neck height through its own staircase and writes the
//! trapezoid surface value. The three tables differ on purpose; keep them
//! separate even where they look alike.
//!
//! Only the female family exists, and only for lean, average and heavy.
//! Male and very-heavy profiles get no weight-class rule.

use super::assignment::MorphAssignment;
use super::keys::{HEAD_LARGE, NECK_LAYERS, TRAPEZOID};
use super::trapezoid::trapezoid;
use crate::models::{sliders, Gender, MeasurementProfile, WeightClass};
use tracing::trace;

/// Neck heights must hit a step within this distance to match.
const STEP_TOLERANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightClassRules {
    pub class: WeightClass,
    /// `headSize >= threshold` enables the enlarged-head key; `None` leaves it untouched.
    pub head_threshold: Option<f32>,
    /// Exact neck height -> neck layering weight.
    pub neck_layers: &'static [(f32, f32)],
}

pub const LEAN_RULES: WeightClassRules = WeightClassRules {
    class: WeightClass::Lean,
    head_threshold: Some(0.5),
    neck_layers: &[(0.0, 0.0), (0.25, 0.0), (0.5, 0.125), (0.75, 0.25), (1.0, 0.5)],
};

pub const AVERAGE_RULES: WeightClassRules = WeightClassRules {
    class: WeightClass::Average,
    head_threshold: Some(0.75),
    neck_layers: &[(0.0, 0.0), (0.25, 0.25), (0.5, 0.375), (0.75, 0.5), (1.0, 0.75)],
};

pub const HEAVY_RULES: WeightClassRules = WeightClassRules {
    class: WeightClass::Heavy,
    head_threshold: None,
    neck_layers: &[(0.0, 0.5), (0.25, 0.625), (0.5, 0.75), (0.75, 0.875), (1.0, 1.0)],
};

/// Rule set for the combination, if one was ever defined.
pub fn rules_for(gender: Gender, class: WeightClass) -> Option<&'static WeightClassRules> {
    match (gender, class) {
        (Gender::Female, WeightClass::Lean) => Some(&LEAN_RULES),
        (Gender::Female, WeightClass::Average) => Some(&AVERAGE_RULES),
        (Gender::Female, WeightClass::Heavy) => Some(&HEAVY_RULES),
        _ => None,
    }
}

impl WeightClassRules {
    /// Staircase lookup; neck heights between steps read as 0.
    pub fn neck_layering(&self, neck_height: f32) -> f32 {
        self.neck_layers
            .iter()
            .find(|(step, _)| (neck_height - step).abs() <= STEP_TOLERANCE)
            .map(|(_, weight)| *weight)
            .unwrap_or_else(|| {
                trace!(class = %self.class, neck_height, "neck height between staircase steps");
                0.0
            })
    }

    pub fn apply(&self, profile: &MeasurementProfile) -> MorphAssignment {
        let mut assignment = MorphAssignment::new();

        if let Some(threshold) = self.head_threshold {
            let enlarged = profile.slider(sliders::HEAD_SIZE) >= threshold;
            assignment.set(HEAD_LARGE, if enlarged { 1.0 } else { 0.0 });
        }

        assignment.set(NECK_LAYERS, self.neck_layering(profile.slider(sliders::NECK_HEIGHT)));

        assignment.set(
            TRAPEZOID,
            trapezoid(
                profile.slider(sliders::SHOULDER_WIDTH),
                profile.slider(sliders::SHOULDER_HEIGHT),
                profile.slider(sliders::NECK_WIDTH),
            ),
        );

        assignment
    }
}

pub fn lean_rule(profile: &MeasurementProfile) -> MorphAssignment {
    LEAN_RULES.apply(profile)
}

pub fn average_rule(profile: &MeasurementProfile) -> MorphAssignment {
    AVERAGE_RULES.apply(profile)
}

pub fn heavy_rule(profile: &MeasurementProfile) -> MorphAssignment {
    HEAVY_RULES.apply(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::define_schema;

    fn profile(head: f32, neck_height: f32) -> MeasurementProfile {
        MeasurementProfile::new()
            .with(sliders::HEAD_SIZE, head)
            .with(sliders::NECK_HEIGHT, neck_height)
            .with(sliders::SHOULDER_WIDTH, 0.5)
            .with(sliders::SHOULDER_HEIGHT, 0.5)
            .with(sliders::NECK_WIDTH, 0.2)
    }

    #[test]
    fn test_lean_head_threshold() {
        assert_eq!(lean_rule(&profile(0.5, 0.0)).get(HEAD_LARGE), Some(1.0));
        assert_eq!(lean_rule(&profile(0.25, 0.0)).get(HEAD_LARGE), Some(0.0));
    }

    #[test]
    fn test_average_head_threshold() {
        assert_eq!(average_rule(&profile(0.5, 0.0)).get(HEAD_LARGE), Some(0.0));
        assert_eq!(average_rule(&profile(0.75, 0.0)).get(HEAD_LARGE), Some(1.0));
    }

    #[test]
    fn test_heavy_has_no_head_rule() {
        let assignment = heavy_rule(&profile(1.0, 0.0));
        assert_eq!(assignment.get(HEAD_LARGE), None);
        assert_eq!(assignment.len(), 2);
    }

    #[test]
    fn test_neck_staircases() {
        let heights = [0.0, 0.25, 0.5, 0.75, 1.0];
        let lean: Vec<f32> = heights.iter().map(|h| LEAN_RULES.neck_layering(*h)).collect();
        let average: Vec<f32> = heights.iter().map(|h| AVERAGE_RULES.neck_layering(*h)).collect();
        let heavy: Vec<f32> = heights.iter().map(|h| HEAVY_RULES.neck_layering(*h)).collect();
        assert_eq!(lean, vec![0.0, 0.0, 0.125, 0.25, 0.5]);
        assert_eq!(average, vec![0.0, 0.25, 0.375, 0.5, 0.75]);
        assert_eq!(heavy, vec![0.5, 0.625, 0.75, 0.875, 1.0]);
    }

    #[test]
    fn test_every_neck_tick_has_a_step() {
        let neck_height = define_schema(Gender::Female)
            .slider(sliders::NECK_HEIGHT)
            .expect("female schema defines neckHeight");
        for rules in [LEAN_RULES, AVERAGE_RULES, HEAVY_RULES] {
            let mut previous = f32::MIN;
            for tick in neck_height.tick_values() {
                assert!(
                    rules.neck_layers.iter().any(|(step, _)| (tick - step).abs() <= STEP_TOLERANCE),
                    "{} has no step for neck height {}",
                    rules.class,
                    tick
                );
                let weight = rules.neck_layering(tick);
                assert!(weight >= previous, "{} staircase drops at {}", rules.class, tick);
                previous = weight;
            }
        }
    }

    #[test]
    fn test_trapezoid_written() {
        for rules in [LEAN_RULES, AVERAGE_RULES, HEAVY_RULES] {
            assert_eq!(rules.apply(&profile(0.0, 0.0)).get(TRAPEZOID), Some(0.625));
        }
    }

    #[test]
    fn test_rule_coverage() {
        assert!(rules_for(Gender::Female, WeightClass::Lean).is_some());
        assert!(rules_for(Gender::Female, WeightClass::Heavy).is_some());
        assert!(rules_for(Gender::Female, WeightClass::VeryHeavy).is_none());
        for class in WeightClass::ALL {
            assert!(rules_for(Gender::Male, class).is_none());
        }
    }
}
