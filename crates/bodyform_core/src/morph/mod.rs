//! Morph rule engine
//!
//! Turns a measurement profile into shape-key weights. Each region rule
//! returns a [`MorphAssignment`]; [`MorphRuleEngine::evaluate`] runs them all
//! in dependency order (stomach shape first, since both width rules read it)
//! and layers the results, later rules winning on shared keys.
//!
//! Writing into a renderer goes through [`MorphTarget`]. A single
//! `apply_to` call writes a whole assignment, so a caller holding the
//! influence array mutably never exposes a half-updated group.

pub mod assignment;
pub mod keys;
pub mod rules;
pub mod trapezoid;
pub mod weight_class;

pub use assignment::{InfluenceVector, MorphAssignment, MorphTarget, MorphTargetDictionary};
pub use keys::ExclusivityGroup;
pub use trapezoid::{trapezoid, trapezoid_lookup};
pub use weight_class::{rules_for, WeightClassRules};

use crate::config::EngineConfig;
use crate::models::{sliders, Gender, MeasurementProfile, WeightClass};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRule {
    StomachShape,
    ShoulderWidth,
    StomachWidth,
    Trimester,
    WeightClass,
}

impl RegionRule {
    /// Dependency order used by a full evaluation.
    pub const ORDER: [RegionRule; 5] = [
        RegionRule::StomachShape,
        RegionRule::ShoulderWidth,
        RegionRule::StomachWidth,
        RegionRule::Trimester,
        RegionRule::WeightClass,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutput {
    pub assignment: MorphAssignment,
    pub pregnancy_extras_enabled: bool,
}

/// Result of running every region rule for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub assignment: MorphAssignment,
    pub pregnancy_extras_enabled: bool,
    /// `Some(false)` when the trapezoid inputs fell outside every band and
    /// read as 0; `None` when no weight-class rule wrote the trapezoid key.
    pub trapezoid_in_band: Option<bool>,
    /// Set when no weight-class rule set exists for the gender/class pair.
    pub missing_rule_family: Option<(Gender, Option<WeightClass>)>,
}

#[derive(Debug, Clone, Default)]
pub struct MorphRuleEngine {
    config: EngineConfig,
}

impl MorphRuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one region rule.
    pub fn run(
        &self,
        rule: RegionRule,
        profile: &MeasurementProfile,
        gender: Gender,
        weight_class: Option<WeightClass>,
    ) -> RuleOutput {
        let extras = profile.index(sliders::STOMACH_SHAPE) == Some(keys::PREGNANT_STOMACH_INDEX);
        let assignment = match rule {
            RegionRule::StomachShape => {
                let update = rules::stomach_shape(profile);
                return RuleOutput {
                    assignment: update.assignment,
                    pregnancy_extras_enabled: update.pregnancy_extras_enabled,
                };
            }
            RegionRule::ShoulderWidth => rules::shoulder_width(profile),
            RegionRule::StomachWidth => {
                rules::stomach_width(profile, profile.slider(sliders::NECK_SHAPE))
            }
            RegionRule::Trimester => rules::trimester(profile, extras),
            RegionRule::WeightClass => weight_class
                .and_then(|class| rules_for(gender, class))
                .map(|rules| rules.apply(profile))
                .unwrap_or_default(),
        };
        RuleOutput { assignment, pregnancy_extras_enabled: extras }
    }

    /// Run one region rule and write it into the renderer's influence array.
    pub fn run_in_place(
        &self,
        rule: RegionRule,
        profile: &MeasurementProfile,
        gender: Gender,
        weight_class: Option<WeightClass>,
        dictionary: &MorphTargetDictionary,
        influences: &mut [f32],
    ) -> RuleOutput {
        let output = self.run(rule, profile, gender, weight_class);
        output.assignment.apply_to(&mut InfluenceVector::new(dictionary, influences), &self.config);
        output
    }

    /// Run every region rule in dependency order.
    pub fn evaluate(
        &self,
        profile: &MeasurementProfile,
        gender: Gender,
        weight_class: Option<WeightClass>,
    ) -> Evaluation {
        let mut assignment = MorphAssignment::new();
        let mut pregnancy_extras_enabled = false;
        for rule in RegionRule::ORDER {
            let output = self.run(rule, profile, gender, weight_class);
            if rule == RegionRule::StomachShape {
                pregnancy_extras_enabled = output.pregnancy_extras_enabled;
            }
            assignment.merge(output.assignment);
        }

        let missing_rule_family = match weight_class {
            Some(class) if rules_for(gender, class).is_some() => None,
            other => {
                debug!(%gender, weight_class = ?other, "no weight-class rule set");
                Some((gender, other))
            }
        };
        let trapezoid_in_band = missing_rule_family.is_none().then(|| {
            trapezoid_lookup(
                profile.slider(sliders::SHOULDER_WIDTH),
                profile.slider(sliders::SHOULDER_HEIGHT),
                profile.slider(sliders::NECK_WIDTH),
            )
            .is_some()
        });

        Evaluation { assignment, pregnancy_extras_enabled, trapezoid_in_band, missing_rule_family }
    }

    /// Full evaluation written into the renderer's influence array.
    pub fn evaluate_in_place(
        &self,
        profile: &MeasurementProfile,
        gender: Gender,
        weight_class: Option<WeightClass>,
        dictionary: &MorphTargetDictionary,
        influences: &mut [f32],
    ) -> Evaluation {
        let evaluation = self.evaluate(profile, gender, weight_class);
        evaluation
            .assignment
            .apply_to(&mut InfluenceVector::new(dictionary, influences), &self.config);
        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::keys::*;
    use super::*;

    fn female_profile() -> MeasurementProfile {
        MeasurementProfile::new()
            .with(sliders::HEAD_SIZE, 0.75)
            .with(sliders::NECK_HEIGHT, 0.5)
            .with(sliders::NECK_WIDTH, 0.3)
            .with(sliders::NECK_SHAPE, 1.0)
            .with(sliders::SHOULDER_WIDTH, 0.5)
            .with(sliders::SHOULDER_HEIGHT, 1.0)
            .with(sliders::STOMACH_SHAPE, 5.0)
            .with(sliders::STOMACH_WIDTH, 0.6)
            .with(sliders::TRIMESTER, 3.0)
    }

    fn dictionary() -> MorphTargetDictionary {
        [STOMACH_PREGNANT, STOMACH_AVERAGE, SHOULDER_WIDTH, NECK_SHAPE, TRAPEZOID]
            .iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), i))
            .collect()
    }

    #[test]
    fn test_full_evaluation() {
        let engine = MorphRuleEngine::default();
        let eval = engine.evaluate(&female_profile(), Gender::Female, Some(WeightClass::Average));

        assert!(eval.pregnancy_extras_enabled);
        assert_eq!(eval.trapezoid_in_band, Some(true));
        assert_eq!(eval.missing_rule_family, None);

        let weights = &eval.assignment;
        assert_eq!(weights.get(STOMACH_PREGNANT), Some(1.0));
        // stomach width runs after shoulder width and owns the generic key
        assert_eq!(weights.get(SHOULDER_WIDTH), Some(0.6));
        assert_eq!(weights.get(SHOULDER_WIDTH_LEFT), Some(0.5));
        assert_eq!(weights.get(STOMACH_WIDTH_PREGNANT), Some(0.6));
        assert_eq!(weights.get(NECK_SHAPE), Some(0.6));
        assert_eq!(weights.get(TRIMESTER_THIRD), Some(1.0));
        assert_eq!(weights.get(HEAD_LARGE), Some(1.0));
        assert_eq!(weights.get(NECK_LAYERS), Some(0.375));
        assert_eq!(weights.get(TRAPEZOID), Some(0.5));
    }

    #[test]
    fn test_missing_family_reported() {
        let engine = MorphRuleEngine::default();
        let male = engine.evaluate(&female_profile(), Gender::Male, Some(WeightClass::Lean));
        assert_eq!(male.missing_rule_family, Some((Gender::Male, Some(WeightClass::Lean))));
        assert_eq!(male.assignment.get(TRAPEZOID), None);
        assert_eq!(male.trapezoid_in_band, None);

        let very_heavy =
            engine.evaluate(&female_profile(), Gender::Female, Some(WeightClass::VeryHeavy));
        assert!(very_heavy.missing_rule_family.is_some());

        let unknown = engine.evaluate(&female_profile(), Gender::Female, None);
        assert_eq!(unknown.missing_rule_family, Some((Gender::Female, None)));
        assert_eq!(unknown.trapezoid_in_band, None);
    }

    #[test]
    fn test_trapezoid_out_of_band_reported() {
        let profile = female_profile().with(sliders::SHOULDER_HEIGHT, 0.25);
        let eval =
            MorphRuleEngine::default().evaluate(&profile, Gender::Female, Some(WeightClass::Lean));
        assert_eq!(eval.trapezoid_in_band, Some(false));
        assert_eq!(eval.assignment.get(TRAPEZOID), Some(0.0));
    }

    #[test]
    fn test_in_place_writes_known_targets_only() {
        let engine = MorphRuleEngine::default();
        let dict = dictionary();
        let mut influences = vec![0.25; dict.len()];
        engine.evaluate_in_place(
            &female_profile(),
            Gender::Female,
            Some(WeightClass::Average),
            &dict,
            &mut influences,
        );
        assert_eq!(influences, vec![1.0, 0.0, 0.6, 0.6, 0.5]);
    }

    #[test]
    fn test_single_rule_in_place() {
        let engine = MorphRuleEngine::default();
        let dict = dictionary();
        let mut influences = vec![0.0; dict.len()];
        let profile = MeasurementProfile::new().with(sliders::STOMACH_SHAPE, 0.0);
        let output = engine.run_in_place(
            RegionRule::StomachShape,
            &profile,
            Gender::Male,
            None,
            &dict,
            &mut influences,
        );
        assert!(!output.pregnancy_extras_enabled);
        assert_eq!(influences, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let engine = MorphRuleEngine::default();
        let first = engine.evaluate(&female_profile(), Gender::Female, Some(WeightClass::Lean));
        let second = engine.evaluate(&female_profile(), Gender::Female, Some(WeightClass::Lean));
        assert_eq!(first, second);
    }
}
