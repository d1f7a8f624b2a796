use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::recommend::Goal;

/// Accepted demographic input ranges, mirrored by interactive prompts.
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
pub const WEIGHT_RANGE_LBS: RangeInclusive<u32> = 80..=400;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn id(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    None,
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::None,
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ExperienceLevel::None => "none",
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::None => "No experience",
            ExperienceLevel::Beginner => "Beginner (1-6 months)",
            ExperienceLevel::Intermediate => "Intermediate (6+ months)",
            ExperienceLevel::Advanced => "Advanced (1+ years)",
        }
    }
}

/// Everything the quiz collects. Updates go through the `with_*` functions,
/// which return a new value and leave the source untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizAnswers {
    pub goals: BTreeSet<Goal>,
    pub age: u32,
    pub weight: u32,
    pub gender: Option<Gender>,
    pub injection_experience: Option<ExperienceLevel>,
    pub health_conditions: BTreeSet<String>,
    pub acknowledged_side_effects: bool,
}

impl QuizAnswers {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_goal_toggled(mut self, goal: Goal) -> Self {
        if !self.goals.remove(&goal) {
            self.goals.insert(goal);
        }
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_injection_experience(mut self, level: ExperienceLevel) -> Self {
        self.injection_experience = Some(level);
        self
    }

    pub fn with_health_condition(mut self, condition: impl Into<String>) -> Self {
        self.health_conditions.insert(condition.into());
        self
    }

    pub fn with_acknowledged_side_effects(mut self, acknowledged: bool) -> Self {
        self.acknowledged_side_effects = acknowledged;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::recommend::Goal;

    use super::{ExperienceLevel, Gender, QuizAnswers};

    #[test]
    fn default_answers_are_recognized_as_default() {
        assert!(QuizAnswers::default().is_default());
        assert!(!QuizAnswers::default().with_age(34).is_default());
    }

    #[test]
    fn updates_do_not_mutate_the_source_value() {
        let base = QuizAnswers::default().with_age(30);
        let updated = base.clone().with_weight(185).with_gender(Gender::Female);

        assert_eq!(base.weight, 0);
        assert_eq!(base.gender, None);
        assert_eq!(updated.age, 30);
        assert_eq!(updated.weight, 185);
        assert_eq!(updated.gender, Some(Gender::Female));
    }

    #[test]
    fn toggling_a_goal_twice_removes_it() {
        let once = QuizAnswers::default().with_goal_toggled(Goal::FatLoss);
        assert!(once.goals.contains(&Goal::FatLoss));

        let twice = once.with_goal_toggled(Goal::FatLoss);
        assert!(twice.goals.is_empty());
    }

    #[test]
    fn answers_round_trip_through_json() {
        let answers = QuizAnswers::default()
            .with_goal_toggled(Goal::MuscleGrowth)
            .with_goal_toggled(Goal::Energy)
            .with_age(42)
            .with_weight(210)
            .with_gender(Gender::Male)
            .with_injection_experience(ExperienceLevel::Beginner)
            .with_health_condition("hypertension")
            .with_acknowledged_side_effects(true);

        let raw = serde_json::to_string(&answers).expect("serialize answers");
        assert!(raw.contains("\"injectionExperience\":\"beginner\""));
        assert!(raw.contains("\"acknowledgedSideEffects\":true"));

        let restored: QuizAnswers = serde_json::from_str(&raw).expect("deserialize answers");
        assert_eq!(restored, answers);
    }
}
