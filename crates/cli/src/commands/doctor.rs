use serde::Serialize;

use regimen_core::config::{AppConfig, LoadOptions};
use regimen_core::SnapshotStore;
use regimen_store::{load_catalog, FileSnapshotStore};

const PROBE_KEY: &str = "regimen.doctor.probe";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog_readability(&config));
            checks.push(check_progress_store_writability(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_readability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "progress_store_writability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog_readability(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "catalog_readability",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    match runtime.block_on(load_catalog(&config.catalog.path)) {
        Ok(catalog) => DoctorCheck {
            name: "catalog_readability",
            status: CheckStatus::Pass,
            details: format!(
                "loaded {} listing(s) from `{}`",
                catalog.len(),
                config.catalog.path.display()
            ),
        },
        Err(error) => DoctorCheck {
            name: "catalog_readability",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_progress_store_writability(config: &AppConfig) -> DoctorCheck {
    let store = FileSnapshotStore::new(&config.storage.path);

    let result = store
        .set(PROBE_KEY, "ok")
        .and_then(|()| store.get(PROBE_KEY))
        .and_then(|read_back| {
            store.delete(PROBE_KEY)?;
            Ok(read_back)
        });

    match result {
        Ok(Some(value)) if value == "ok" => DoctorCheck {
            name: "progress_store_writability",
            status: CheckStatus::Pass,
            details: format!("probe round-tripped through `{}`", config.storage.path.display()),
        },
        Ok(_) => DoctorCheck {
            name: "progress_store_writability",
            status: CheckStatus::Fail,
            details: "probe value did not read back".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "progress_store_writability",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
