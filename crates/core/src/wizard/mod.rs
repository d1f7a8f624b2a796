pub mod engine;
pub mod snapshot;
pub mod states;

pub use engine::{QuizWizard, DEFAULT_ADVANCE_DELAY};
pub use snapshot::{
    InMemorySnapshotStore, SnapshotStore, StoreError, WizardSnapshot, WIZARD_SNAPSHOT_KEY,
};
pub use states::{missing_required_fields, StepOutcome, WizardStep, STEP_COUNT};
