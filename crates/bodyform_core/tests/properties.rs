//! Property tests over profiles drawn from the female slider grid.

use bodyform_core::classification::{BucketTag, INVALID_TYPE, INVALID_VALUE};
use bodyform_core::encoder::{SEGMENT_COUNT, SEPARATOR};
use bodyform_core::morph::keys::{STOMACH_SHAPE_GROUP, STOMACH_WIDTH_GROUP, TRIMESTER_GROUP};
use bodyform_core::{
    define_schema, BodyShapeCode, Gender, MeasurementProfile, MorphRuleEngine, ShapeCodeEncoder,
    WeightClass,
};
use proptest::prelude::*;

/// Every female slider name with its tick count, in schema order.
fn female_sliders() -> Vec<(String, u32)> {
    let schema = define_schema(Gender::Female);
    schema
        .slider_names()
        .filter_map(|name| schema.slider(name).map(|def| (name.to_string(), def.ticks)))
        .collect()
}

fn on_grid_profile() -> impl Strategy<Value = MeasurementProfile> {
    let sliders = female_sliders();
    let count = sliders.len();
    (prop::collection::vec(any::<u32>(), count), prop::option::of(40.0f32..90.0f32)).prop_map(
        move |(picks, height)| {
            let schema = define_schema(Gender::Female);
            let mut profile = MeasurementProfile::new();
            for ((name, ticks), pick) in sliders.iter().zip(picks) {
                if let Some(def) = schema.slider(name) {
                    profile.set(name, def.tick_value(pick % ticks));
                }
            }
            profile.height_in = height;
            profile
        },
    )
}

fn weight_class() -> impl Strategy<Value = WeightClass> {
    prop::sample::select(WeightClass::ALL.to_vec())
}

fn nonzero(weights: &[Option<f32>]) -> usize {
    weights.iter().filter(|w| w.unwrap_or(0.0) != 0.0).count()
}

proptest! {
    #[test]
    fn prop_grid_profiles_validate(profile in on_grid_profile()) {
        prop_assert!(define_schema(Gender::Female).validate(&profile).is_ok());
    }

    #[test]
    fn prop_evaluation_deterministic(profile in on_grid_profile(), class in weight_class()) {
        let engine = MorphRuleEngine::default();
        let first = engine.evaluate(&profile, Gender::Female, Some(class));
        let second = engine.evaluate(&profile, Gender::Female, Some(class));
        prop_assert_eq!(first, second);
        prop_assert_eq!(
            ShapeCodeEncoder::encode(&profile, class),
            ShapeCodeEncoder::encode(&profile, class)
        );
    }

    #[test]
    fn prop_exclusive_groups(profile in on_grid_profile(), class in weight_class()) {
        let eval = MorphRuleEngine::default().evaluate(&profile, Gender::Female, Some(class));
        let weights = |members: &[&str]| -> Vec<Option<f32>> {
            members.iter().map(|k| eval.assignment.get(k)).collect()
        };

        let stomach = weights(STOMACH_SHAPE_GROUP.members);
        prop_assert!(stomach.iter().all(|w| w.is_some()));
        prop_assert_eq!(nonzero(&stomach), 1);

        prop_assert!(nonzero(&weights(STOMACH_WIDTH_GROUP.members)) <= 1);
        prop_assert!(nonzero(&weights(TRIMESTER_GROUP.members)) <= 1);
        if !eval.pregnancy_extras_enabled {
            prop_assert_eq!(nonzero(&weights(TRIMESTER_GROUP.members)), 0);
        }
    }

    #[test]
    fn prop_weights_in_unit_range(profile in on_grid_profile(), class in weight_class()) {
        let eval = MorphRuleEngine::default().evaluate(&profile, Gender::Female, Some(class));
        for (key, weight) in eval.assignment.iter() {
            prop_assert!((0.0..=1.0).contains(&weight), "{} = {}", key, weight);
        }
    }

    #[test]
    fn prop_code_always_seven_segments(profile in on_grid_profile(), class in "[a-z-]{0,12}") {
        let code = ShapeCodeEncoder::encode_str(&profile, &class);
        let text = code.to_string();
        prop_assert!(text.ends_with(SEPARATOR));
        prop_assert_eq!(text.matches(SEPARATOR).count(), SEGMENT_COUNT);
        let parsed: BodyShapeCode = text.parse().unwrap();
        prop_assert_eq!(parsed, code);
    }

    #[test]
    fn prop_quantize_lands_on_grid(raw in -2.0f32..8.0f32) {
        let schema = define_schema(Gender::Female);
        for name in schema.slider_names() {
            let def = schema.slider(name).unwrap();
            let snapped = def.quantize(raw);
            prop_assert!(def.check(name, snapped).is_ok(), "{} -> {}", raw, snapped);
            prop_assert_eq!(def.quantize(snapped), snapped);
        }
    }

    #[test]
    fn prop_classify_is_total(value in prop::num::f32::ANY) {
        for tag in BucketTag::ALL {
            let label = tag.bucket(value).as_str();
            prop_assert!(
                label == INVALID_VALUE || label == INVALID_TYPE || tag.labels().any(|l| l == label)
            );
        }
    }
}
