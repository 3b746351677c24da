//! Body shape code encoder
//!
//! A body shape code is seven segments, each terminated by `_`, in a fixed
//! order: weight class, stomach, head, shoulders, bust/arm, height and
//! legs/hips. Segments come from nested table lookups over the
//! classification buckets.
//!
//! Lookup misses never fail. They resolve to a default code exactly as
//! stored codes expect; [`ShapeCodeEncoder::explain`] reports which segments
//! took a fallback so tests and telemetry can see it.

use crate::classification::{BucketTag, INVALID_VALUE};
use crate::error::BodyError;
use crate::models::{sliders, MeasurementProfile, WeightClass};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub const SEGMENT_COUNT: usize = 7;
pub const SEPARATOR: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    WeightClass,
    Stomach,
    Head,
    Shoulders,
    BustArm,
    Height,
    LegsHips,
}

impl Segment {
    pub const ORDER: [Segment; SEGMENT_COUNT] = [
        Segment::WeightClass,
        Segment::Stomach,
        Segment::Head,
        Segment::Shoulders,
        Segment::BustArm,
        Segment::Height,
        Segment::LegsHips,
    ];

    pub fn position(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Direct,
    Fallback { reason: &'static str },
}

/// How one segment was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTrace {
    pub segment: Segment,
    pub code: &'static str,
    /// Bucket labels (or sentinels) used as lookup keys, in lookup order.
    pub labels: Vec<&'static str>,
    pub resolution: Resolution,
}

impl SegmentTrace {
    fn direct(segment: Segment, code: &'static str, labels: Vec<&'static str>) -> Self {
        Self { segment, code, labels, resolution: Resolution::Direct }
    }

    fn fallback(
        segment: Segment,
        code: &'static str,
        labels: Vec<&'static str>,
        reason: &'static str,
    ) -> Self {
        trace!(?segment, code, reason, "shape code segment fell back to default");
        Self { segment, code, labels, resolution: Resolution::Fallback { reason } }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.resolution, Resolution::Fallback { .. })
    }
}

fn weight_class_code(class: WeightClass) -> &'static str {
    match class {
        WeightClass::Lean => "LN",
        WeightClass::Average => "AV",
        WeightClass::Heavy => "HV",
        WeightClass::VeryHeavy => "VH",
    }
}

const UNKNOWN_WEIGHT_CLASS: &str = "XX";

/// Indexed by the stomach-shape slider.
const STOMACH_CODES: [&str; 6] = ["AV", "FL", "SP", "AP", "RC", "PG"];
const STOMACH_DEFAULT: &str = "AV";

/// Indexed by the head-shape slider.
const HEAD_SHAPES: [&str; 4] = ["average", "oblong", "round", "coned"];

struct HeadRow {
    size: &'static str,
    default: &'static str,
    shapes: &'static [(&'static str, &'static str)],
}

const HEAD_TABLE: &[HeadRow] = &[
    HeadRow { size: "small", default: "SA", shapes: &[("oblong", "SO"), ("round", "SR")] },
    HeadRow {
        size: "average",
        default: "AA",
        shapes: &[("oblong", "AO"), ("round", "AR"), ("coned", "AC")],
    },
    HeadRow { size: "large", default: "LA", shapes: &[("round", "LR"), ("coned", "LC")] },
    HeadRow { size: "very large", default: "XA", shapes: &[] },
];
const HEAD_DEFAULT: &str = "AA";

/// (shoulder width bucket, shoulder height bucket, code)
const SHOULDER_TABLE: &[(&str, &str, &str)] = &[
    ("Narrow", "Sloped", "NS"),
    ("Narrow", "Average", "NA"),
    ("Narrow", "Square", "NQ"),
    ("Average", "Sloped", "AS"),
    ("Average", "Average", "AA"),
    ("Average", "Square", "AQ"),
    ("Broad", "Sloped", "BS"),
    ("Broad", "Average", "BA"),
    ("Broad", "Square", "BQ"),
];
const SHOULDER_DEFAULT: &str = "AA";

type ArmRow = &'static [(&'static str, &'static str)];

/// Breast bucket -> arm bucket -> code. Buckets above HH have no row.
const BUST_TABLE: &[(&str, ArmRow)] = &[
    ("AA", &[("slim", "0S"), ("average", "0A"), ("full", "0F"), ("heavy", "0H")]),
    ("A/B", &[("slim", "1S"), ("average", "1A"), ("full", "1F"), ("heavy", "1H")]),
    ("C", &[("slim", "2S"), ("average", "2A"), ("full", "2F"), ("heavy", "2H")]),
    ("D/DD", &[("slim", "3S"), ("average", "3A"), ("full", "3F"), ("heavy", "3H")]),
    ("E/F", &[("slim", "4S"), ("average", "4A"), ("full", "4F"), ("heavy", "4H")]),
    ("G", &[("slim", "5S"), ("average", "5A"), ("full", "5F"), ("heavy", "5H")]),
    ("HH", &[("slim", "6S"), ("average", "6A"), ("full", "6F"), ("heavy", "6H")]),
];
const BUST_FALLBACK_ROW: &str = "HH";

/// Raw height tiers in inches.
const TALL_ABOVE_IN: f32 = 67.0;
const SHORT_BELOW_IN: f32 = 60.0;

pub struct ShapeCodeEncoder;

impl ShapeCodeEncoder {
    pub fn encode(profile: &MeasurementProfile, weight_class: WeightClass) -> BodyShapeCode {
        BodyShapeCode::from_traces(&Self::explain(profile, Some(weight_class)))
    }

    /// Encode with a free-form weight class; unknown names yield `XX_`.
    pub fn encode_str(profile: &MeasurementProfile, weight_class: &str) -> BodyShapeCode {
        BodyShapeCode::from_traces(&Self::explain(profile, WeightClass::parse(weight_class)))
    }

    /// Per-segment lookup trace, in code order.
    pub fn explain(
        profile: &MeasurementProfile,
        weight_class: Option<WeightClass>,
    ) -> [SegmentTrace; SEGMENT_COUNT] {
        [
            weight_segment(weight_class),
            stomach_segment(profile),
            head_segment(profile),
            shoulder_segment(profile),
            bust_arm_segment(profile),
            height_segment(profile),
            legs_hips_segment(profile),
        ]
    }
}

/// Bucket label or sentinel for a slider. Unset sliders read as 0, the same
/// resting value the morph rules see.
fn label_of(tag: BucketTag, profile: &MeasurementProfile, slider: &str) -> &'static str {
    tag.bucket(profile.slider(slider)).as_str()
}

/// Tick index of a discrete slider; unset reads as tick 0.
fn tick_of(profile: &MeasurementProfile, slider: &str) -> Option<usize> {
    usize::try_from(profile.index(slider).unwrap_or(0)).ok()
}

fn weight_segment(weight_class: Option<WeightClass>) -> SegmentTrace {
    match weight_class {
        Some(class) => {
            SegmentTrace::direct(Segment::WeightClass, weight_class_code(class), vec![class.as_str()])
        }
        None => SegmentTrace::fallback(
            Segment::WeightClass,
            UNKNOWN_WEIGHT_CLASS,
            vec![],
            "unknown weight class",
        ),
    }
}

fn stomach_segment(profile: &MeasurementProfile) -> SegmentTrace {
    let code = tick_of(profile, sliders::STOMACH_SHAPE)
        .and_then(|index| STOMACH_CODES.get(index).copied());
    match code {
        Some(code) => SegmentTrace::direct(Segment::Stomach, code, vec![]),
        None => SegmentTrace::fallback(
            Segment::Stomach,
            STOMACH_DEFAULT,
            vec![],
            "stomach shape index out of range",
        ),
    }
}

fn head_segment(profile: &MeasurementProfile) -> SegmentTrace {
    let size = label_of(BucketTag::Head, profile, sliders::HEAD_SIZE);
    let shape = tick_of(profile, sliders::HEAD_SHAPE)
        .and_then(|index| HEAD_SHAPES.get(index).copied());
    let labels = vec![size, shape.unwrap_or("unknown")];

    let Some(row) = HEAD_TABLE.iter().find(|row| row.size == size) else {
        return SegmentTrace::fallback(Segment::Head, HEAD_DEFAULT, labels, "head size unclassified");
    };
    match shape {
        Some("average") => SegmentTrace::direct(Segment::Head, row.default, labels),
        Some(name) => match row.shapes.iter().find(|(shape, _)| *shape == name) {
            Some(&(_, code)) => SegmentTrace::direct(Segment::Head, code, labels),
            None => SegmentTrace::fallback(
                Segment::Head,
                row.default,
                labels,
                "head shape has no entry for this size",
            ),
        },
        None => SegmentTrace::fallback(Segment::Head, row.default, labels, "head shape unknown"),
    }
}

fn shoulder_segment(profile: &MeasurementProfile) -> SegmentTrace {
    let width = label_of(BucketTag::ShoulderWidth, profile, sliders::SHOULDER_WIDTH);
    let height = label_of(BucketTag::ShoulderHeight, profile, sliders::SHOULDER_HEIGHT);
    let labels = vec![width, height];
    match SHOULDER_TABLE.iter().find(|(w, h, _)| *w == width && *h == height) {
        Some(&(_, _, code)) => SegmentTrace::direct(Segment::Shoulders, code, labels),
        None => SegmentTrace::fallback(
            Segment::Shoulders,
            SHOULDER_DEFAULT,
            labels,
            "shoulder combination unclassified",
        ),
    }
}

fn bust_arm_segment(profile: &MeasurementProfile) -> SegmentTrace {
    let breast = label_of(BucketTag::BreastSize, profile, sliders::BREAST_SIZE);
    let arm = label_of(BucketTag::ArmSize, profile, sliders::ARM_SIZE);
    let labels = vec![breast, arm];

    let (row, row_fallback) = match BUST_TABLE.iter().find(|(bust, _)| *bust == breast) {
        Some((_, row)) => (*row, false),
        None => {
            let row = BUST_TABLE
                .iter()
                .find(|(bust, _)| *bust == BUST_FALLBACK_ROW)
                .map(|(_, row)| *row)
                .unwrap_or(&[]);
            (row, true)
        }
    };

    match (row.iter().find(|(a, _)| *a == arm), row_fallback) {
        (Some(&(_, code)), false) => SegmentTrace::direct(Segment::BustArm, code, labels),
        (Some(&(_, code)), true) => SegmentTrace::fallback(
            Segment::BustArm,
            code,
            labels,
            "breast bucket has no row; using HH",
        ),
        (None, _) => {
            let code = row.iter().find(|(a, _)| *a == "average").map(|(_, c)| *c).unwrap_or("6A");
            SegmentTrace::fallback(Segment::BustArm, code, labels, "arm bucket unclassified")
        }
    }
}

fn height_segment(profile: &MeasurementProfile) -> SegmentTrace {
    let height = profile.height();
    if height > TALL_ABOVE_IN {
        SegmentTrace::direct(Segment::Height, "TL", vec!["tall"])
    } else if height < SHORT_BELOW_IN {
        SegmentTrace::direct(Segment::Height, "SH", vec!["short"])
    } else if height.is_nan() {
        SegmentTrace::fallback(Segment::Height, "MD", vec!["medium"], "height unknown")
    } else {
        SegmentTrace::direct(Segment::Height, "MD", vec!["medium"])
    }
}

fn legs_hips_segment(profile: &MeasurementProfile) -> SegmentTrace {
    let leg = label_of(BucketTag::LegBucket, profile, sliders::LEG_SIZE);
    let hip = label_of(BucketTag::HipSize, profile, sliders::HIPS_SIZE);
    let labels = vec![leg, hip];

    if leg == "slim" {
        let code = match hip {
            "narrow" => "SN",
            "average" => "SA",
            "wide" => "SW",
            "very wide" => "SX",
            _ => {
                return SegmentTrace::fallback(Segment::LegsHips, "SA", labels, "hip size unclassified")
            }
        };
        return SegmentTrace::direct(Segment::LegsHips, code, labels);
    }

    let mid_height = (SHORT_BELOW_IN..=TALL_ABOVE_IN).contains(&profile.height());
    let code = match (mid_height, hip) {
        (true, "narrow") => "MN",
        (true, "wide") => "MW",
        (_, "very wide") => "MX",
        _ => "MA",
    };
    if leg != INVALID_VALUE && hip != INVALID_VALUE {
        SegmentTrace::direct(Segment::LegsHips, code, labels)
    } else {
        SegmentTrace::fallback(Segment::LegsHips, code, labels, "leg or hip size unclassified")
    }
}

/// Seven-segment body shape code, e.g. `AV_PG_AR_AQ_3F_MD_MA_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyShapeCode {
    segments: [String; SEGMENT_COUNT],
}

impl BodyShapeCode {
    fn from_traces(traces: &[SegmentTrace; SEGMENT_COUNT]) -> Self {
        Self { segments: std::array::from_fn(|i| traces[i].code.to_string()) }
    }

    pub fn segments(&self) -> &[String; SEGMENT_COUNT] {
        &self.segments
    }

    pub fn segment(&self, segment: Segment) -> &str {
        &self.segments[segment.position()]
    }

    /// Number of segments that differ; 0 means the codes match.
    pub fn distance(&self, other: &BodyShapeCode) -> usize {
        self.segments.iter().zip(other.segments.iter()).filter(|(a, b)| a != b).count()
    }
}

impl fmt::Display for BodyShapeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}{}", segment, SEPARATOR)?;
        }
        Ok(())
    }
}

impl FromStr for BodyShapeCode {
    type Err = BodyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BodyError::InvalidRequest(format!("malformed body shape code: {}", s));
        let body = s.strip_suffix(SEPARATOR).ok_or_else(malformed)?;
        let parts: Vec<&str> = body.split(SEPARATOR).collect();
        if parts.len() != SEGMENT_COUNT
            || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(malformed());
        }
        Ok(Self { segments: std::array::from_fn(|i| parts[i].to_string()) })
    }
}

impl Serialize for BodyShapeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BodyShapeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
