use std::collections::BTreeSet;

use serde::Serialize;

use regimen_core::config::{AppConfig, LoadOptions};
use regimen_core::{recommend, Goal};
use regimen_store::{load_catalog_or_empty, seed_catalog};

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RecommendationRow {
    rank: usize,
    id: String,
    name: String,
    use_case: String,
    dosage: String,
    price: String,
    score: u32,
}

pub fn run(goals_arg: &str, use_seed: bool, json: bool) -> CommandResult {
    let goals = match parse_goals(goals_arg) {
        Ok(goals) => goals,
        Err(message) => return CommandResult::failure("recommend", "bad_goal", message, 2),
    };

    let catalog = if use_seed {
        seed_catalog()
    } else {
        let config = match AppConfig::load(LoadOptions::default()) {
            Ok(config) => config,
            Err(error) => {
                return CommandResult::failure("recommend", "configuration", error.to_string(), 1)
            }
        };

        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(error) => {
                return CommandResult::failure(
                    "recommend",
                    "runtime",
                    format!("failed to initialize async runtime: {error}"),
                    1,
                );
            }
        };

        runtime.block_on(load_catalog_or_empty(&config.catalog.path))
    };

    let ranked = recommend(&goals, &catalog);
    let rows: Vec<RecommendationRow> = ranked
        .iter()
        .enumerate()
        .map(|(position, entry)| RecommendationRow {
            rank: position + 1,
            id: entry.product.id.0.clone(),
            name: entry.product.name.clone(),
            use_case: entry.product.use_case.clone(),
            dosage: entry.product.dosage.clone(),
            price: entry.product.price.to_string(),
            score: entry.score,
        })
        .collect();

    let output = if json {
        serde_json::to_string_pretty(&rows)
            .unwrap_or_else(|error| format!("[] // serialization failed: {error}"))
    } else {
        render_human(&rows)
    };

    CommandResult { exit_code: 0, output }
}

fn parse_goals(goals_arg: &str) -> Result<BTreeSet<Goal>, String> {
    goals_arg
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Goal>().map_err(|error| error.to_string()))
        .collect()
}

fn render_human(rows: &[RecommendationRow]) -> String {
    if rows.is_empty() {
        return "no products matched the selected goals".to_string();
    }

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        lines.push(format!(
            "{}. {} - {} | {} | ${} (score {})",
            row.rank, row.name, row.use_case, row.dosage, row.price, row.score
        ));
    }
    lines.join("\n")
}
