//! Semantic classification of model names.
//!
//! Stage archives name their special models with fixed patterns: goal
//! models carry `_GOAL` (optionally `_G`/`_R` for green/red) after a
//! three-character stage prefix, and switches start with `BUTTON_`.

/// The semantic role of a model, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelClass {
    BlueGoal,
    GreenGoal,
    RedGoal,
    Switch,
}

impl ModelClass {
    /// Output-name suffix used when extracting a goal of this colour.
    pub fn goal_suffix(self) -> Option<&'static str> {
        match self {
            ModelClass::BlueGoal => Some("GOAL_B"),
            ModelClass::GreenGoal => Some("GOAL_G"),
            ModelClass::RedGoal => Some("GOAL_R"),
            ModelClass::Switch => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ModelClass::BlueGoal => "Blue goal",
            ModelClass::GreenGoal => "Green goal",
            ModelClass::RedGoal => "Red goal",
            ModelClass::Switch => "Switch",
        }
    }
}

/// Classify a model name, testing the most specific pattern first.
///
/// The plain `_GOAL` pattern is a strict prefix of `_GOAL_G` and
/// `_GOAL_R`, so green and red are tested before blue; a green or red
/// goal never classifies as blue.
pub fn classify(name: &str) -> Option<ModelClass> {
    let bytes = name.as_bytes();
    let matches_at = |offset: usize, pattern: &[u8]| {
        bytes.get(offset..offset + pattern.len()) == Some(pattern)
    };

    if matches_at(3, b"_GOAL_G") {
        Some(ModelClass::GreenGoal)
    } else if matches_at(3, b"_GOAL_R") {
        Some(ModelClass::RedGoal)
    } else if matches_at(3, b"_GOAL") {
        Some(ModelClass::BlueGoal)
    } else if bytes.starts_with(b"BUTTON_") {
        Some(ModelClass::Switch)
    } else {
        None
    }
}

/// The first model of each goal colour found in an archive, by index.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GoalSlots {
    pub blue: Option<usize>,
    pub green: Option<usize>,
    pub red: Option<usize>,
}

impl GoalSlots {
    /// Colour/index pairs in blue, green, red order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelClass, Option<usize>)> {
        [
            (ModelClass::BlueGoal, self.blue),
            (ModelClass::GreenGoal, self.green),
            (ModelClass::RedGoal, self.red),
        ]
        .into_iter()
    }
}

/// Scan model names in ascending index order and fill each goal slot with
/// the first match. A filled slot is never reconsidered.
pub fn select_goals<'a>(names: impl IntoIterator<Item = &'a str>) -> GoalSlots {
    let mut slots = GoalSlots::default();
    for (index, name) in names.into_iter().enumerate() {
        let slot = match classify(name) {
            Some(ModelClass::BlueGoal) => &mut slots.blue,
            Some(ModelClass::GreenGoal) => &mut slots.green,
            Some(ModelClass::RedGoal) => &mut slots.red,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(index);
        }
    }
    slots
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn goal_patterns_match_at_offset_3() {
        assert_eq!(classify("ST1_GOAL"), Some(ModelClass::BlueGoal));
        assert_eq!(classify("ST1_GOAL_G"), Some(ModelClass::GreenGoal));
        assert_eq!(classify("ST1_GOAL_R"), Some(ModelClass::RedGoal));
        // Pattern at the wrong offset does not match
        assert_eq!(classify("_GOAL"), None);
        assert_eq!(classify("AB_GOAL"), None);
    }

    #[test]
    fn green_and_red_are_not_blue() {
        // _GOAL is a prefix of _GOAL_G/_GOAL_R; the specific patterns win
        assert_eq!(classify("XYZ_GOAL_G"), Some(ModelClass::GreenGoal));
        assert_eq!(classify("XYZ_GOAL_R"), Some(ModelClass::RedGoal));
        // A blue variant suffix still classifies as blue
        assert_eq!(classify("XYZ_GOAL_B"), Some(ModelClass::BlueGoal));
    }

    #[test]
    fn switches_match_by_prefix() {
        assert_eq!(classify("BUTTON_TIMER"), Some(ModelClass::Switch));
        assert_eq!(classify("BUTTON_"), Some(ModelClass::Switch));
        assert_eq!(classify("XBUTTON_"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn goal_slots_fill_once_in_scan_order() {
        let names = ["ST1_GOAL", "ST1_GOAL_G", "ST1_GOAL_B2", "ST1_GOAL_R"];
        let slots = select_goals(names);
        assert_eq!(slots.blue, Some(0));
        assert_eq!(slots.green, Some(1));
        assert_eq!(slots.red, Some(3));
    }

    #[test]
    fn later_candidates_do_not_displace_filled_slots() {
        let slots = select_goals(["AAA_GOAL", "BBB_GOAL", "CCC_GOAL_G", "DDD_GOAL_G"]);
        assert_eq!(slots.blue, Some(0));
        assert_eq!(slots.green, Some(2));
        assert_eq!(slots.red, None);
    }
}
