use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::cart::CartCollaborator;
use crate::domain::answers::{ExperienceLevel, Gender, QuizAnswers};
use crate::domain::product::{Product, ProductId};
use crate::events::{
    ActivityCategory, ActivityContext, ActivityEvent, ActivityOutcome, ActivitySink,
    NullActivitySink,
};
use crate::recommend::{recommend, Goal, ScoredRecommendation};
use crate::wizard::snapshot::{SnapshotStore, WizardSnapshot, WIZARD_SNAPSHOT_KEY};
use crate::wizard::states::{missing_required_fields, StepOutcome, WizardStep, STEP_COUNT};

/// Cosmetic pause before an advance completes, carried over from the
/// storefront UI. Has no correctness effect; set to zero in tests.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(300);

/// The guided quiz: a linear six-step flow over a catalog fetched once at
/// start. Single-writer, synchronous with respect to input; the only
/// asynchrony is the cosmetic advance delay.
pub struct QuizWizard {
    step: WizardStep,
    answers: QuizAnswers,
    catalog: Vec<Product>,
    recommendations: Vec<ScoredRecommendation>,
    store: Option<Arc<dyn SnapshotStore>>,
    sink: Arc<dyn ActivitySink>,
    context: ActivityContext,
    advance_delay: Duration,
}

impl QuizWizard {
    pub fn new(catalog: Vec<Product>) -> Self {
        let session_id = Uuid::new_v4().to_string();
        Self {
            step: WizardStep::Goals,
            answers: QuizAnswers::default(),
            catalog,
            recommendations: Vec::new(),
            store: None,
            sink: Arc::new(NullActivitySink),
            context: ActivityContext::new(Some(session_id.clone()), session_id, "quiz-wizard"),
            advance_delay: DEFAULT_ADVANCE_DELAY,
        }
    }

    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn with_activity_sink(mut self, sink: Arc<dyn ActivitySink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach persistent progress storage, restoring any stored snapshot.
    ///
    /// A snapshot at the terminal step is discarded rather than resumed, and
    /// a snapshot that fails to parse is discarded silently; both cases start
    /// the wizard fresh at step one.
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        match store.get(WIZARD_SNAPSHOT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<WizardSnapshot>(&raw) {
                Ok(snapshot) => match WizardStep::from_index(snapshot.current_step) {
                    Some(step) if !step.is_terminal() => {
                        self.step = step;
                        self.answers = snapshot.answers;
                        self.sink.emit(
                            ActivityEvent::new(
                                &self.context,
                                "wizard.progress_restored",
                                ActivityCategory::Wizard,
                                ActivityOutcome::Success,
                            )
                            .with_metadata("step", format!("{step:?}")),
                        );
                    }
                    _ => {
                        let _ = store.delete(WIZARD_SNAPSHOT_KEY);
                    }
                },
                Err(_) => {
                    let _ = store.delete(WIZARD_SNAPSHOT_KEY);
                }
            },
            Ok(None) => {}
            Err(_) => {}
        }

        self.store = Some(store);
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    pub fn recommendations(&self) -> &[ScoredRecommendation] {
        &self.recommendations
    }

    pub fn session_id(&self) -> Option<&str> {
        self.context.session_id.as_deref()
    }

    pub fn progress_percent(&self) -> u8 {
        (self.step.index() as u16 * 100 / STEP_COUNT as u16) as u8
    }

    pub fn toggle_goal(&mut self, goal: Goal) {
        self.answers = self.answers.clone().with_goal_toggled(goal);
        self.persist_progress();
    }

    pub fn set_age(&mut self, age: u32) {
        self.answers = self.answers.clone().with_age(age);
        self.persist_progress();
    }

    pub fn set_weight(&mut self, weight: u32) {
        self.answers = self.answers.clone().with_weight(weight);
        self.persist_progress();
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.answers = self.answers.clone().with_gender(gender);
        self.persist_progress();
    }

    pub fn set_injection_experience(&mut self, level: ExperienceLevel) {
        self.answers = self.answers.clone().with_injection_experience(level);
        self.persist_progress();
    }

    pub fn add_health_condition(&mut self, condition: impl Into<String>) {
        self.answers = self.answers.clone().with_health_condition(condition);
        self.persist_progress();
    }

    pub fn acknowledge_side_effects(&mut self, acknowledged: bool) {
        self.answers = self.answers.clone().with_acknowledged_side_effects(acknowledged);
        self.persist_progress();
    }

    /// Attempt to leave the current step.
    ///
    /// Missing required fields refuse the transition and leave the step
    /// unchanged. Leaving the safety step runs the recommendation engine
    /// exactly once, drops the persisted snapshot, and enters the terminal
    /// results step.
    pub async fn advance(&mut self) -> StepOutcome {
        if self.step.is_terminal() {
            return StepOutcome::Terminal { step: self.step };
        }

        let missing = missing_required_fields(self.step, &self.answers);
        if !missing.is_empty() {
            self.sink.emit(
                ActivityEvent::new(
                    &self.context,
                    "wizard.step_blocked",
                    ActivityCategory::Wizard,
                    ActivityOutcome::Refused,
                )
                .with_metadata("step", format!("{:?}", self.step))
                .with_metadata("missing", missing.join(",")),
            );
            return StepOutcome::Blocked { step: self.step, missing };
        }

        if !self.advance_delay.is_zero() {
            tokio::time::sleep(self.advance_delay).await;
        }

        let from = self.step;
        if from == WizardStep::SafetyAcknowledgment {
            self.recommendations = recommend(&self.answers.goals, &self.catalog);
            self.sink.emit(
                ActivityEvent::new(
                    &self.context,
                    "recommendation.generated",
                    ActivityCategory::Recommendation,
                    ActivityOutcome::Success,
                )
                .with_metadata("count", self.recommendations.len().to_string())
                .with_metadata(
                    "goals",
                    self.answers
                        .goals
                        .iter()
                        .map(|goal| goal.id())
                        .collect::<Vec<_>>()
                        .join(","),
                ),
            );
            self.step = WizardStep::Results;
            self.clear_progress();
        } else {
            self.step = from.next().unwrap_or(from);
            self.persist_progress();
        }

        self.sink.emit(
            ActivityEvent::new(
                &self.context,
                "wizard.step_advanced",
                ActivityCategory::Wizard,
                ActivityOutcome::Success,
            )
            .with_metadata("from", format!("{from:?}"))
            .with_metadata("to", format!("{:?}", self.step)),
        );

        StepOutcome::Advanced { from, to: self.step }
    }

    /// Step back one step, floored at the first. Never re-scores and keeps
    /// every answer.
    pub fn retreat(&mut self) -> WizardStep {
        let from = self.step;
        self.step = from.previous();

        if self.step != from {
            self.persist_progress();
            self.sink.emit(
                ActivityEvent::new(
                    &self.context,
                    "wizard.step_retreated",
                    ActivityCategory::Wizard,
                    ActivityOutcome::Success,
                )
                .with_metadata("from", format!("{from:?}"))
                .with_metadata("to", format!("{:?}", self.step)),
            );
        }

        self.step
    }

    /// Back to step one with default answers and no stored progress.
    pub fn reset(&mut self) {
        self.step = WizardStep::Goals;
        self.answers = QuizAnswers::default();
        self.recommendations.clear();
        self.clear_progress();
        self.sink.emit(ActivityEvent::new(
            &self.context,
            "wizard.reset",
            ActivityCategory::Wizard,
            ActivityOutcome::Success,
        ));
    }

    /// Hand one recommended product to the cart collaborator. Returns false
    /// when the product is not among the current recommendations.
    pub fn add_recommendation_to_cart(
        &self,
        product_id: &ProductId,
        cart: &dyn CartCollaborator,
    ) -> bool {
        let Some(entry) =
            self.recommendations.iter().find(|entry| &entry.product.id == product_id)
        else {
            return false;
        };

        cart.add_item(&entry.product);
        self.sink.emit(
            ActivityEvent::new(
                &self.context,
                "wizard.recommendation_added_to_cart",
                ActivityCategory::Wizard,
                ActivityOutcome::Success,
            )
            .with_metadata("product_id", product_id.0.clone()),
        );
        true
    }

    fn persist_progress(&self) {
        let Some(store) = &self.store else {
            return;
        };
        // Nothing worth resuming until the shopper has actually started.
        if self.step == WizardStep::Goals && self.answers.is_default() {
            return;
        }

        let snapshot =
            WizardSnapshot { current_step: self.step.index(), answers: self.answers.clone() };
        let encoded = match serde_json::to_string(&snapshot) {
            Ok(encoded) => encoded,
            Err(error) => {
                self.emit_storage_failure("wizard.snapshot_encode_failed", &error.to_string());
                return;
            }
        };

        if let Err(error) = store.set(WIZARD_SNAPSHOT_KEY, &encoded) {
            self.emit_storage_failure("wizard.snapshot_write_failed", &error.to_string());
        }
    }

    fn clear_progress(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(error) = store.delete(WIZARD_SNAPSHOT_KEY) {
            self.emit_storage_failure("wizard.snapshot_delete_failed", &error.to_string());
        }
    }

    fn emit_storage_failure(&self, event_type: &str, detail: &str) {
        self.sink.emit(
            ActivityEvent::new(
                &self.context,
                event_type,
                ActivityCategory::Wizard,
                ActivityOutcome::Failed,
            )
            .with_metadata("detail", detail.to_string()),
        );
    }
}
