use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use regimen_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let mut push = |key_path: &str, value: String, env_key: Option<&str>| {
        lines.push(render_line(
            key_path,
            &value,
            field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    };

    push(
        "catalog.path",
        config.catalog.path.display().to_string(),
        Some("REGIMEN_CATALOG_PATH"),
    );
    push(
        "storage.path",
        config.storage.path.display().to_string(),
        Some("REGIMEN_STORAGE_PATH"),
    );
    push(
        "wizard.advance_delay_ms",
        config.wizard.advance_delay_ms.to_string(),
        Some("REGIMEN_WIZARD_ADVANCE_DELAY_MS"),
    );
    push(
        "checkout.currency",
        config.checkout.currency.clone(),
        Some("REGIMEN_CHECKOUT_CURRENCY"),
    );
    push(
        "checkout.tax_rate",
        config.checkout.tax_rate.to_string(),
        Some("REGIMEN_CHECKOUT_TAX_RATE"),
    );
    push(
        "checkout.shipping_flat",
        config.checkout.shipping_flat.to_string(),
        Some("REGIMEN_CHECKOUT_SHIPPING_FLAT"),
    );
    push(
        "checkout.free_shipping_threshold",
        config
            .checkout
            .free_shipping_threshold
            .map(|threshold| threshold.to_string())
            .unwrap_or_else(|| "<unset>".to_string()),
        Some("REGIMEN_CHECKOUT_FREE_SHIPPING_THRESHOLD"),
    );
    push("logging.level", config.logging.level.clone(), Some("REGIMEN_LOGGING_LEVEL"));
    push(
        "logging.format",
        format!("{:?}", config.logging.format),
        Some("REGIMEN_LOGGING_FORMAT"),
    );

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("regimen.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/regimen.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
