use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::CheckoutPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub wizard: WizardConfig,
    pub checkout: CheckoutConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct WizardConfig {
    pub advance_delay_ms: u64,
}

#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    pub currency: String,
    pub tax_rate: Decimal,
    pub shipping_flat: Decimal,
    pub free_shipping_threshold: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub storage_path: Option<PathBuf>,
    pub advance_delay_ms: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { path: PathBuf::from("data/peptides.json") },
            storage: StorageConfig { path: PathBuf::from(".regimen/progress.json") },
            wizard: WizardConfig { advance_delay_ms: 300 },
            checkout: CheckoutConfig {
                currency: "USD".to_string(),
                tax_rate: Decimal::new(8, 2),
                shipping_flat: Decimal::new(999, 2),
                free_shipping_threshold: Some(Decimal::new(10_000, 2)),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("regimen.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Checkout pricing as the domain layer consumes it.
    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            currency: self.checkout.currency.clone(),
            tax_rate: self.checkout.tax_rate,
            shipping_flat: self.checkout.shipping_flat,
            free_shipping_threshold: self.checkout.free_shipping_threshold,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = PathBuf::from(path);
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(path) = storage.path {
                self.storage.path = PathBuf::from(path);
            }
        }

        if let Some(wizard) = patch.wizard {
            if let Some(advance_delay_ms) = wizard.advance_delay_ms {
                self.wizard.advance_delay_ms = advance_delay_ms;
            }
        }

        if let Some(checkout) = patch.checkout {
            if let Some(currency) = checkout.currency {
                self.checkout.currency = currency;
            }
            if let Some(tax_rate) = checkout.tax_rate {
                self.checkout.tax_rate = parse_decimal("checkout.tax_rate", &tax_rate)?;
            }
            if let Some(shipping_flat) = checkout.shipping_flat {
                self.checkout.shipping_flat =
                    parse_decimal("checkout.shipping_flat", &shipping_flat)?;
            }
            if let Some(threshold) = checkout.free_shipping_threshold {
                self.checkout.free_shipping_threshold =
                    Some(parse_decimal("checkout.free_shipping_threshold", &threshold)?);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("REGIMEN_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("REGIMEN_STORAGE_PATH") {
            self.storage.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("REGIMEN_WIZARD_ADVANCE_DELAY_MS") {
            self.wizard.advance_delay_ms = parse_u64("REGIMEN_WIZARD_ADVANCE_DELAY_MS", &value)?;
        }

        if let Some(value) = read_env("REGIMEN_CHECKOUT_CURRENCY") {
            self.checkout.currency = value;
        }
        if let Some(value) = read_env("REGIMEN_CHECKOUT_TAX_RATE") {
            self.checkout.tax_rate = parse_decimal("REGIMEN_CHECKOUT_TAX_RATE", &value)?;
        }
        if let Some(value) = read_env("REGIMEN_CHECKOUT_SHIPPING_FLAT") {
            self.checkout.shipping_flat = parse_decimal("REGIMEN_CHECKOUT_SHIPPING_FLAT", &value)?;
        }
        if let Some(value) = read_env("REGIMEN_CHECKOUT_FREE_SHIPPING_THRESHOLD") {
            self.checkout.free_shipping_threshold =
                Some(parse_decimal("REGIMEN_CHECKOUT_FREE_SHIPPING_THRESHOLD", &value)?);
        }

        let log_level = read_env("REGIMEN_LOGGING_LEVEL").or_else(|| read_env("REGIMEN_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("REGIMEN_LOGGING_FORMAT").or_else(|| read_env("REGIMEN_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = catalog_path;
        }
        if let Some(storage_path) = overrides.storage_path {
            self.storage.path = storage_path;
        }
        if let Some(advance_delay_ms) = overrides.advance_delay_ms {
            self.wizard.advance_delay_ms = advance_delay_ms;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_storage(&self.storage)?;
        validate_wizard(&self.wizard)?;
        validate_checkout(&self.checkout)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("regimen.toml"), PathBuf::from("config/regimen.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("catalog.path must not be empty".to_string()));
    }
    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("storage.path must not be empty".to_string()));
    }
    Ok(())
}

fn validate_wizard(wizard: &WizardConfig) -> Result<(), ConfigError> {
    if wizard.advance_delay_ms > 5_000 {
        return Err(ConfigError::Validation(
            "wizard.advance_delay_ms must be at most 5000".to_string(),
        ));
    }
    Ok(())
}

fn validate_checkout(checkout: &CheckoutConfig) -> Result<(), ConfigError> {
    let currency = checkout.currency.trim();
    if currency.len() != 3 || !currency.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(
            "checkout.currency must be a 3-letter uppercase code (e.g. USD)".to_string(),
        ));
    }

    if checkout.tax_rate < Decimal::ZERO || checkout.tax_rate > Decimal::new(25, 2) {
        return Err(ConfigError::Validation(
            "checkout.tax_rate must be in range 0..=0.25".to_string(),
        ));
    }

    if checkout.shipping_flat < Decimal::ZERO {
        return Err(ConfigError::Validation(
            "checkout.shipping_flat must not be negative".to_string(),
        ));
    }

    if let Some(threshold) = checkout.free_shipping_threshold {
        if threshold < Decimal::ZERO {
            return Err(ConfigError::Validation(
                "checkout.free_shipping_threshold must not be negative".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    storage: Option<StoragePatch>,
    wizard: Option<WizardPatch>,
    checkout: Option<CheckoutPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WizardPatch {
    advance_delay_ms: Option<u64>,
}

// Money fields arrive as strings so decimal amounts survive TOML intact.
#[derive(Debug, Default, Deserialize)]
struct CheckoutPatch {
    currency: Option<String>,
    tax_rate: Option<String>,
    shipping_flat: Option<String>,
    free_shipping_threshold: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
