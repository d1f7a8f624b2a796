use regimen_core::config::{AppConfig, LoadOptions};
use regimen_core::{Goal, Product};
use regimen_store::{load_catalog, seed_catalog};

use super::CommandResult;

pub fn run(use_seed: bool) -> CommandResult {
    let (catalog, source) = if use_seed {
        (seed_catalog(), "seed catalog".to_string())
    } else {
        let config = match AppConfig::load(LoadOptions::default()) {
            Ok(config) => config,
            Err(error) => {
                return CommandResult::failure("catalog", "configuration", error.to_string(), 1)
            }
        };

        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(error) => {
                return CommandResult::failure(
                    "catalog",
                    "runtime",
                    format!("failed to initialize async runtime: {error}"),
                    1,
                );
            }
        };

        match runtime.block_on(load_catalog(&config.catalog.path)) {
            Ok(catalog) => (catalog, config.catalog.path.display().to_string()),
            Err(error) => {
                return CommandResult::failure("catalog", "catalog_load", error.to_string(), 1)
            }
        }
    };

    CommandResult { exit_code: 0, output: render_summary(&catalog, &source) }
}

fn render_summary(catalog: &[Product], source: &str) -> String {
    let active = catalog.iter().filter(|product| product.active).count();

    let mut lines = Vec::new();
    lines.push(format!("catalog `{source}`: {} listing(s), {active} active", catalog.len()));
    lines.push("goal coverage (active listings with at least one matching tag):".to_string());

    for goal in Goal::ALL {
        let matching = catalog
            .iter()
            .filter(|product| product.active)
            .filter(|product| {
                goal.matching_tags().iter().copied().any(|tag| product.has_tag(tag))
            })
            .count();
        lines.push(format!("- {}: {matching} product(s)", goal.id()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use regimen_store::seed_catalog;

    use super::render_summary;

    #[test]
    fn summary_reports_counts_and_full_goal_coverage() {
        let catalog = seed_catalog();
        let summary = render_summary(&catalog, "seed catalog");

        assert!(summary.contains("10 listing(s), 10 active"));
        for goal_line in
            ["fat_loss:", "muscle_growth:", "healing:", "libido:", "anti_aging:", "energy:"]
        {
            assert!(summary.contains(goal_line), "missing goal line `{goal_line}`");
        }
        assert!(!summary.contains(": 0 product(s)"), "every goal should be covered by the seed");
    }
}
