use serde::{Deserialize, Serialize};

use crate::domain::answers::QuizAnswers;

pub const STEP_COUNT: u8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    Goals,
    Demographics,
    Gender,
    Experience,
    SafetyAcknowledgment,
    Results,
}

impl WizardStep {
    /// 1-based position shown in the progress header; always in 1..=6.
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Goals => 1,
            WizardStep::Demographics => 2,
            WizardStep::Gender => 3,
            WizardStep::Experience => 4,
            WizardStep::SafetyAcknowledgment => 5,
            WizardStep::Results => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(WizardStep::Goals),
            2 => Some(WizardStep::Demographics),
            3 => Some(WizardStep::Gender),
            4 => Some(WizardStep::Experience),
            5 => Some(WizardStep::SafetyAcknowledgment),
            6 => Some(WizardStep::Results),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Results
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Previous step, floored at the first.
    pub fn previous(self) -> Self {
        Self::from_index(self.index().saturating_sub(1)).unwrap_or(WizardStep::Goals)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Goals => "What are your primary goals?",
            WizardStep::Demographics => "Basic Information",
            WizardStep::Gender => "Gender",
            WizardStep::Experience => "Injection Experience",
            WizardStep::SafetyAcknowledgment => "Safety Acknowledgment",
            WizardStep::Results => "Your Personalized Recommendations",
        }
    }
}

/// Result of an `advance` attempt. A blocked advance is a refusal, not an
/// error: the wizard simply does not move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { from: WizardStep, to: WizardStep },
    Blocked { step: WizardStep, missing: Vec<&'static str> },
    Terminal { step: WizardStep },
}

/// Required fields still missing before `step` may be left.
pub fn missing_required_fields(step: WizardStep, answers: &QuizAnswers) -> Vec<&'static str> {
    let mut missing = Vec::new();

    match step {
        WizardStep::Goals => {
            if answers.goals.is_empty() {
                missing.push("goals");
            }
        }
        WizardStep::Demographics => {
            if answers.age == 0 {
                missing.push("age");
            }
            if answers.weight == 0 {
                missing.push("weight");
            }
        }
        WizardStep::Gender => {
            if answers.gender.is_none() {
                missing.push("gender");
            }
        }
        WizardStep::Experience => {
            if answers.injection_experience.is_none() {
                missing.push("injection_experience");
            }
        }
        WizardStep::SafetyAcknowledgment => {
            if !answers.acknowledged_side_effects {
                missing.push("acknowledged_side_effects");
            }
        }
        WizardStep::Results => {}
    }

    missing
}
