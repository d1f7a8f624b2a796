//! Tag-overlap scoring over the product catalog.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::goals::Goal;
use super::MAX_RECOMMENDATIONS;
use crate::domain::product::Product;

/// A catalog product paired with its relevance score. Ephemeral; never
/// persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub product: Product,
    pub score: u32,
}

/// Union of the tag sets mapped from the selected goals. Duplicates collapse
/// and ordering is irrelevant downstream.
pub fn candidate_tags(goals: &BTreeSet<Goal>) -> BTreeSet<&'static str> {
    goals.iter().flat_map(|goal| goal.matching_tags().iter().copied()).collect()
}

/// Rank catalog products against the selected goals.
///
/// A product qualifies when at least one of its tags appears in the candidate
/// set; its score is the number of its own tags that do. Results are sorted
/// by descending score, ties keeping catalog order, and truncated to
/// [`MAX_RECOMMENDATIONS`]. Deterministic and side-effect free.
pub fn recommend(goals: &BTreeSet<Goal>, catalog: &[Product]) -> Vec<ScoredRecommendation> {
    let candidates = candidate_tags(goals);
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredRecommendation> = catalog
        .iter()
        .filter_map(|product| {
            let score =
                product.tags.iter().filter(|tag| candidates.contains(tag.as_str())).count() as u32;
            (score > 0).then(|| ScoredRecommendation { product: product.clone(), score })
        })
        .collect();

    // Vec::sort_by is stable, which is what keeps equal scores in catalog order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(MAX_RECOMMENDATIONS);
    scored
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};
    use crate::recommend::goals::Goal;

    use super::{candidate_tags, recommend};

    fn product(id: &str, tags: &[&str]) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: format!("Peptide {id}"),
            use_case: "test".to_string(),
            injection_site: "subcutaneous".to_string(),
            description: String::new(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            price: Decimal::new(4999, 2),
            dosage: "250mcg".to_string(),
            cycle_length: "8 weeks".to_string(),
            image: None,
            stock_quantity: 100,
            active: true,
        }
    }

    fn goals(selected: &[Goal]) -> BTreeSet<Goal> {
        selected.iter().copied().collect()
    }

    #[test]
    fn empty_goal_set_yields_no_recommendations() {
        let catalog = vec![product("a", &["healing", "muscle"])];
        assert!(recommend(&BTreeSet::new(), &catalog).is_empty());
    }

    #[test]
    fn products_without_tags_never_match() {
        let catalog = vec![product("bare", &[])];
        assert!(recommend(&goals(&[Goal::MuscleGrowth]), &catalog).is_empty());
    }

    #[test]
    fn muscle_growth_scenario_ranks_by_overlap_count() {
        let catalog = vec![
            product("A", &["healing", "muscle"]),
            product("B", &["fat loss"]),
            product("C", &["muscle", "gh"]),
        ];

        let ranked = recommend(&goals(&[Goal::MuscleGrowth]), &catalog);
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.product.id.0.as_str()).collect();

        assert_eq!(ids, ["C", "A"]);
        assert_eq!(ranked[0].score, 2);
        assert_eq!(ranked[1].score, 1);
    }

    #[test]
    fn union_of_goal_tags_does_not_double_count_shared_tags() {
        // muscle_growth and energy share "muscle", "gh", and "strength"; the
        // union must collapse them so C still scores 2, not 4.
        let catalog = vec![
            product("A", &["healing", "muscle"]),
            product("B", &["fat loss"]),
            product("C", &["muscle", "gh"]),
        ];

        let selected = goals(&[Goal::MuscleGrowth, Goal::Energy]);
        let union = candidate_tags(&selected);
        assert_eq!(
            union,
            ["muscle", "gh", "growth", "strength", "performance"].into_iter().collect()
        );

        let ranked = recommend(&selected, &catalog);
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.product.id.0.as_str()).collect();
        assert_eq!(ids, ["C", "A"]);
        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn ties_preserve_catalog_order() {
        let catalog = vec![
            product("first", &["healing"]),
            product("second", &["recovery"]),
            product("third", &["injury"]),
        ];

        let ranked = recommend(&goals(&[Goal::Healing]), &catalog);
        let ids: Vec<&str> = ranked.iter().map(|entry| entry.product.id.0.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn results_are_capped_at_three() {
        let catalog = vec![
            product("a", &["gh"]),
            product("b", &["gh", "muscle"]),
            product("c", &["gh", "muscle", "strength"]),
            product("d", &["performance"]),
        ];

        let ranked = recommend(&goals(&[Goal::Energy]), &catalog);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].product.id.0, "c");
    }

    #[test]
    fn every_result_shares_a_tag_with_the_candidate_union() {
        let catalog = vec![
            product("a", &["fat loss", "gh"]),
            product("b", &["libido"]),
            product("c", &["longevity", "anti-aging"]),
        ];

        for goal in Goal::ALL {
            let selected = goals(&[goal]);
            let union = candidate_tags(&selected);
            for entry in recommend(&selected, &catalog) {
                assert!(
                    entry.product.tags.iter().any(|tag| union.contains(tag.as_str())),
                    "product {} must overlap the union for {goal:?}",
                    entry.product.id.0
                );
            }
        }
    }
}
