pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod recommend;
pub mod wizard;

pub use cart::{CartCollaborator, CartItem, InMemoryCart};
pub use catalog::CatalogStore;
pub use checkout::{
    place_order, summarize, CheckoutOutcome, CheckoutPolicy, CheckoutSession, GatewayError,
    OrderSummary, PaymentGateway,
};
pub use domain::answers::{ExperienceLevel, Gender, QuizAnswers, AGE_RANGE, WEIGHT_RANGE_LBS};
pub use domain::order::{InventoryAdjustment, Order, OrderId, OrderLine, OrderStatus};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError};
pub use events::{
    ActivityCategory, ActivityContext, ActivityEvent, ActivityOutcome, ActivitySink,
    InMemoryActivitySink, NullActivitySink,
};
pub use recommend::{
    candidate_tags, recommend, Goal, ScoredRecommendation, UnknownGoal, MAX_RECOMMENDATIONS,
};
pub use wizard::{
    missing_required_fields, InMemorySnapshotStore, QuizWizard, SnapshotStore, StepOutcome,
    StoreError, WizardSnapshot, WizardStep, DEFAULT_ADVANCE_DELAY, STEP_COUNT,
    WIZARD_SNAPSHOT_KEY,
};
