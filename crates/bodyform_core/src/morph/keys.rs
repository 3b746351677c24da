//! Shape-key names and exclusivity groups

use super::assignment::MorphAssignment;

pub const STOMACH_AVERAGE: &str = "Stomach_Average";
pub const STOMACH_FLAT: &str = "Stomach_Flat";
pub const STOMACH_SPOON: &str = "Stomach_Spoon";
pub const STOMACH_APPLE: &str = "Stomach_Apple";
pub const STOMACH_RECTANGLE: &str = "Stomach_Rectangle";
pub const STOMACH_PREGNANT: &str = "Stomach_Pregnant";

pub const STOMACH_WIDTH_AVERAGE: &str = "StomachWidth_Average";
pub const STOMACH_WIDTH_SPOON: &str = "StomachWidth_Spoon";
pub const STOMACH_WIDTH_RECTANGLE: &str = "StomachWidth_Rectangle";
pub const STOMACH_WIDTH_PREGNANT: &str = "StomachWidth_Pregnant";
/// Member of the width group that no stomach shape selects; only ever reset.
pub const STOMACH_WIDTH_APPLE: &str = "StomachWidth_Apple";

/// Generic shoulder-width key, also driven by stomach width.
pub const SHOULDER_WIDTH: &str = "ShoulderWidth";
pub const SHOULDER_WIDTH_LEFT: &str = "ShoulderWidth_Left";
pub const SHOULDER_WIDTH_RIGHT: &str = "ShoulderWidth_Right";
pub const SHOULDER_WIDTH_FAMILY: [&str; 3] =
    [SHOULDER_WIDTH, SHOULDER_WIDTH_LEFT, SHOULDER_WIDTH_RIGHT];

pub const NECK_SHAPE: &str = "NeckShape";
pub const NECK_LAYERS: &str = "Neck_Layers";
pub const HEAD_LARGE: &str = "Head_Large";
pub const TRAPEZOID: &str = "Trapezoid";

pub const TRIMESTER_FIRST: &str = "Pregnancy_Trimester1";
pub const TRIMESTER_SECOND: &str = "Pregnancy_Trimester2";
pub const TRIMESTER_THIRD: &str = "Pregnancy_Trimester3";

/// Stomach-shape index that enables the pregnancy extras.
pub const PREGNANT_STOMACH_INDEX: i64 = 5;

/// Shape keys of which at most one may carry influence at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusivityGroup {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

/// Indexed by the discrete stomach-shape slider.
pub const STOMACH_SHAPE_GROUP: ExclusivityGroup = ExclusivityGroup {
    name: "stomach_shape",
    members: &[
        STOMACH_AVERAGE,
        STOMACH_FLAT,
        STOMACH_SPOON,
        STOMACH_APPLE,
        STOMACH_RECTANGLE,
        STOMACH_PREGNANT,
    ],
};

pub const STOMACH_WIDTH_GROUP: ExclusivityGroup = ExclusivityGroup {
    name: "stomach_width",
    members: &[
        STOMACH_WIDTH_AVERAGE,
        STOMACH_WIDTH_SPOON,
        STOMACH_WIDTH_RECTANGLE,
        STOMACH_WIDTH_PREGNANT,
        STOMACH_WIDTH_APPLE,
    ],
};

pub const TRIMESTER_GROUP: ExclusivityGroup = ExclusivityGroup {
    name: "trimester",
    members: &[TRIMESTER_FIRST, TRIMESTER_SECOND, TRIMESTER_THIRD],
};

impl ExclusivityGroup {
    pub fn member(&self, index: i64) -> Option<&'static str> {
        usize::try_from(index).ok().and_then(|i| self.members.get(i).copied())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.iter().any(|member| *member == key)
    }

    pub fn reset(&self, assignment: &mut MorphAssignment) {
        for member in self.members {
            assignment.set(member, 0.0);
        }
    }

    /// Reset the group, then give `key` the weight `value`.
    pub fn select(&self, assignment: &mut MorphAssignment, key: &str, value: f32) {
        debug_assert!(self.contains(key), "{} is not in group {}", key, self.name);
        self.reset(assignment);
        assignment.set(key, value);
    }
}

/// Stomach-width member that follows the current stomach shape.
/// Shapes outside 0..=5 fall back to the average width.
pub fn active_stomach_width_key(stomach_shape: Option<i64>) -> &'static str {
    match stomach_shape {
        Some(2) | Some(3) => STOMACH_WIDTH_SPOON,
        Some(4) => STOMACH_WIDTH_RECTANGLE,
        Some(5) => STOMACH_WIDTH_PREGNANT,
        _ => STOMACH_WIDTH_AVERAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_key_table() {
        assert_eq!(active_stomach_width_key(Some(0)), STOMACH_WIDTH_AVERAGE);
        assert_eq!(active_stomach_width_key(Some(1)), STOMACH_WIDTH_AVERAGE);
        assert_eq!(active_stomach_width_key(Some(2)), STOMACH_WIDTH_SPOON);
        assert_eq!(active_stomach_width_key(Some(3)), STOMACH_WIDTH_SPOON);
        assert_eq!(active_stomach_width_key(Some(4)), STOMACH_WIDTH_RECTANGLE);
        assert_eq!(active_stomach_width_key(Some(5)), STOMACH_WIDTH_PREGNANT);
        assert_eq!(active_stomach_width_key(Some(9)), STOMACH_WIDTH_AVERAGE);
        assert_eq!(active_stomach_width_key(None), STOMACH_WIDTH_AVERAGE);
    }

    #[test]
    fn test_group_member_lookup() {
        assert_eq!(STOMACH_SHAPE_GROUP.member(5), Some(STOMACH_PREGNANT));
        assert_eq!(STOMACH_SHAPE_GROUP.member(6), None);
        assert_eq!(STOMACH_SHAPE_GROUP.member(-1), None);
        assert!(STOMACH_WIDTH_GROUP.contains(STOMACH_WIDTH_APPLE));
    }

    #[test]
    fn test_select_zeroes_siblings() {
        let mut assignment = MorphAssignment::new();
        assignment.set(STOMACH_WIDTH_SPOON, 0.9);
        STOMACH_WIDTH_GROUP.select(&mut assignment, STOMACH_WIDTH_RECTANGLE, 0.4);
        assert_eq!(assignment.get(STOMACH_WIDTH_SPOON), Some(0.0));
        assert_eq!(assignment.get(STOMACH_WIDTH_RECTANGLE), Some(0.4));
        assert_eq!(assignment.len(), STOMACH_WIDTH_GROUP.members.len());
    }
}
