//! Goal-to-product recommendation engine.
//!
//! Pure tag-overlap scoring: selected goals map to fixed tag sets, products
//! are ranked by how many of their tags fall in the union.

mod engine;
mod goals;

pub use engine::{candidate_tags, recommend, ScoredRecommendation};
pub use goals::{Goal, UnknownGoal};

/// Maximum number of products surfaced on the results step.
pub const MAX_RECOMMENDATIONS: usize = 3;
