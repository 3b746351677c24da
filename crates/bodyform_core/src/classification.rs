//! Classification tables
//!
//! Maps a (tag, value) pair to a qualitative bucket label. Every tag owns an
//! ascending table of inclusive upper bounds; the first bound the value does
//! not exceed wins. Values above the last bound (or NaN) are unclassified.
//!
//! The thresholds are a fixed contract shared with stored body codes. Do not
//! retune them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Sentinel returned by [`classify`] when the value matches no bound.
pub const INVALID_VALUE: &str = "invalid value";
/// Sentinel returned by [`classify`] for an unknown tag.
pub const INVALID_TYPE: &str = "invalid type";

/// Inclusive upper bound and the label it selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub upper: f32,
    pub label: &'static str,
}

const fn b(upper: f32, label: &'static str) -> Boundary {
    Boundary { upper, label }
}

const HEAD: &[Boundary] =
    &[b(0.0, "small"), b(0.5, "average"), b(0.75, "large"), b(1.0, "very large")];
const NECK_HEIGHT: &[Boundary] = &[b(0.0, "short"), b(0.5, "average"), b(1.0, "long")];
const NECK_WIDTH: &[Boundary] =
    &[b(0.25, "thin"), b(0.5, "average"), b(0.75, "wide"), b(1.0, "very wide")];
const NECK_LAYERS: &[Boundary] =
    &[b(0.0, "none"), b(0.25, "slight"), b(0.5, "layered"), b(1.0, "heavily layered")];
const CHIN_SHAPE: &[Boundary] = &[b(0.0, "round"), b(1.0, "square"), b(2.0, "pointed")];
const TRAPEZOID_STATE: &[Boundary] =
    &[b(0.0, "flat"), b(0.375, "low"), b(0.75, "medium"), b(1.0, "high")];
const SHOULDER_HEIGHT: &[Boundary] = &[b(0.0, "Sloped"), b(0.5, "Average"), b(1.0, "Square")];
const SHOULDER_WIDTH: &[Boundary] = &[b(0.3, "Narrow"), b(0.7, "Average"), b(1.0, "Broad")];
const PREGNANCY: &[Boundary] =
    &[b(0.0, "none"), b(1.0, "first trimester"), b(2.0, "second trimester"), b(3.0, "third trimester")];
const ARM_SIZE: &[Boundary] =
    &[b(0.25, "slim"), b(0.5, "average"), b(0.75, "full"), b(1.0, "heavy")];
const ARM_DISTENTION: &[Boundary] = &[b(0.0, "none"), b(0.5, "mild"), b(1.0, "pronounced")];
const BREAST_SIZE: &[Boundary] = &[
    b(0.0, "AA"),
    b(0.125, "A/B"),
    b(0.25, "C"),
    b(0.375, "D/DD"),
    b(0.5, "E/F"),
    b(0.625, "G"),
    b(0.75, "HH"),
    b(0.875, "J"),
    b(1.0, "K+"),
];
const TORSO_DISTENTION: &[Boundary] = &[b(0.0, "flat"), b(0.5, "rounded"), b(1.0, "distended")];
const CROTCH_HEIGHT: &[Boundary] = &[b(0.0, "low"), b(0.5, "average"), b(1.0, "high")];
const LEG_HEIGHT: &[Boundary] = &[b(0.25, "short"), b(0.75, "average"), b(1.0, "long")];
const LEG_BUCKET: &[Boundary] =
    &[b(0.25, "slim"), b(0.5, "average"), b(0.75, "full"), b(1.0, "heavy")];
const HIP_SIZE: &[Boundary] =
    &[b(0.25, "narrow"), b(0.5, "average"), b(0.75, "wide"), b(1.0, "very wide")];
const BOTTOM_WIDTH: &[Boundary] = &[b(0.25, "flat"), b(0.75, "average"), b(1.0, "full")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BucketTag {
    Head,
    NeckHeight,
    NeckWidth,
    NeckLayers,
    ChinShape,
    TrapezoidState,
    ShoulderHeight,
    ShoulderWidth,
    Pregnancy,
    ArmSize,
    ArmDistention,
    BreastSize,
    TorsoDistention,
    CrotchHeight,
    LegHeight,
    LegBucket,
    HipSize,
    BottomWidth,
}

static TAG_INDEX: Lazy<HashMap<&'static str, BucketTag>> = Lazy::new(|| {
    let mut index: HashMap<&'static str, BucketTag> =
        BucketTag::ALL.iter().map(|tag| (tag.as_str(), *tag)).collect();
    // short names used by the encoder
    index.insert("breast", BucketTag::BreastSize);
    index.insert("arm", BucketTag::ArmSize);
    index
});

impl BucketTag {
    pub const ALL: [BucketTag; 18] = [
        BucketTag::Head,
        BucketTag::NeckHeight,
        BucketTag::NeckWidth,
        BucketTag::NeckLayers,
        BucketTag::ChinShape,
        BucketTag::TrapezoidState,
        BucketTag::ShoulderHeight,
        BucketTag::ShoulderWidth,
        BucketTag::Pregnancy,
        BucketTag::ArmSize,
        BucketTag::ArmDistention,
        BucketTag::BreastSize,
        BucketTag::TorsoDistention,
        BucketTag::CrotchHeight,
        BucketTag::LegHeight,
        BucketTag::LegBucket,
        BucketTag::HipSize,
        BucketTag::BottomWidth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketTag::Head => "head",
            BucketTag::NeckHeight => "neckHeight",
            BucketTag::NeckWidth => "neckWidth",
            BucketTag::NeckLayers => "neckLayers",
            BucketTag::ChinShape => "chinShape",
            BucketTag::TrapezoidState => "trapezoidState",
            BucketTag::ShoulderHeight => "shoulderHeight",
            BucketTag::ShoulderWidth => "shoulderWidth",
            BucketTag::Pregnancy => "pregnancy",
            BucketTag::ArmSize => "armSize",
            BucketTag::ArmDistention => "armDistention",
            BucketTag::BreastSize => "breastSize",
            BucketTag::TorsoDistention => "torsoDistention",
            BucketTag::CrotchHeight => "crotchHeight",
            BucketTag::LegHeight => "legHeight",
            BucketTag::LegBucket => "legBucket",
            BucketTag::HipSize => "hipSize",
            BucketTag::BottomWidth => "bottomWidth",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        TAG_INDEX.get(tag).copied()
    }

    pub fn boundaries(&self) -> &'static [Boundary] {
        match self {
            BucketTag::Head => HEAD,
            BucketTag::NeckHeight => NECK_HEIGHT,
            BucketTag::NeckWidth => NECK_WIDTH,
            BucketTag::NeckLayers => NECK_LAYERS,
            BucketTag::ChinShape => CHIN_SHAPE,
            BucketTag::TrapezoidState => TRAPEZOID_STATE,
            BucketTag::ShoulderHeight => SHOULDER_HEIGHT,
            BucketTag::ShoulderWidth => SHOULDER_WIDTH,
            BucketTag::Pregnancy => PREGNANCY,
            BucketTag::ArmSize => ARM_SIZE,
            BucketTag::ArmDistention => ARM_DISTENTION,
            BucketTag::BreastSize => BREAST_SIZE,
            BucketTag::TorsoDistention => TORSO_DISTENTION,
            BucketTag::CrotchHeight => CROTCH_HEIGHT,
            BucketTag::LegHeight => LEG_HEIGHT,
            BucketTag::LegBucket => LEG_BUCKET,
            BucketTag::HipSize => HIP_SIZE,
            BucketTag::BottomWidth => BOTTOM_WIDTH,
        }
    }

    /// Every label this tag can produce, in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.boundaries().iter().map(|boundary| boundary.label)
    }

    pub fn bucket(&self, value: f32) -> Bucket {
        self.boundaries()
            .iter()
            .find(|boundary| value <= boundary.upper)
            .map(|boundary| Bucket::Label(boundary.label))
            .unwrap_or(Bucket::InvalidValue)
    }
}

impl fmt::Display for BucketTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a classification. The two unclassified variants carry the
/// legacy sentinel strings through [`Bucket::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Label(&'static str),
    InvalidValue,
    InvalidType,
}

impl Bucket {
    pub fn label(&self) -> Option<&'static str> {
        match *self {
            Bucket::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Bucket::Label(_))
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Bucket::Label(label) => label,
            Bucket::InvalidValue => INVALID_VALUE,
            Bucket::InvalidType => INVALID_TYPE,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn bucket(tag: &str, value: f32) -> Bucket {
    match BucketTag::parse(tag) {
        Some(tag) => tag.bucket(value),
        None => Bucket::InvalidType,
    }
}

/// String form: label, `"invalid value"` or `"invalid type"`.
pub fn classify(tag: &str, value: f32) -> &'static str {
    bucket(tag, value).as_str()
}
