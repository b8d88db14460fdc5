use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    currency::{CurrencyCode, DateFormatStyle, LocaleConfig},
    errors::FinanceError,
    planning::DEFAULT_DUE_SOON_DAYS,
    utils::paths::{app_data_dir, config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";
const MAX_HORIZON_DAYS: u32 = 366;

/// User preferences that shape how results are rendered and classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub date_style: DateFormatStyle,
    /// Days before a due date at which a bill counts as due soon.
    #[serde(default = "Config::default_due_soon_days")]
    pub due_soon_days: u32,
    /// How far ahead `forecast` lists upcoming payments.
    #[serde(default = "Config::default_upcoming_horizon_days")]
    pub upcoming_horizon_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            date_style: DateFormatStyle::default(),
            due_soon_days: Self::default_due_soon_days(),
            upcoming_horizon_days: Self::default_upcoming_horizon_days(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] = [
        "locale",
        "currency",
        "date_style",
        "due_soon_days",
        "upcoming_horizon_days",
    ];

    fn default_due_soon_days() -> u32 {
        DEFAULT_DUE_SOON_DAYS
    }

    fn default_upcoming_horizon_days() -> u32 {
        30
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.as_str())
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale, self.date_style)
    }

    /// Reads a single setting by key for display.
    pub fn get(&self, key: &str) -> Result<String, FinanceError> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "date_style" => match self.date_style {
                DateFormatStyle::Short => "short".into(),
                DateFormatStyle::Medium => "medium".into(),
            },
            "due_soon_days" => self.due_soon_days.to_string(),
            "upcoming_horizon_days" => self.upcoming_horizon_days.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FinanceError> {
        let value = value.trim();
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(FinanceError::invalid("locale must not be empty"));
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err(FinanceError::invalid(format!(
                        "currency `{value}` is not a three-letter ISO code"
                    )));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "date_style" => {
                self.date_style = match value.to_ascii_lowercase().as_str() {
                    "short" => DateFormatStyle::Short,
                    "medium" => DateFormatStyle::Medium,
                    _ => {
                        return Err(FinanceError::invalid(
                            "date_style must be `short` or `medium`",
                        ))
                    }
                }
            }
            "due_soon_days" => self.due_soon_days = parse_count(key, value)?,
            "upcoming_horizon_days" => {
                let days = parse_count(key, value)?;
                if days == 0 || days > MAX_HORIZON_DAYS {
                    return Err(FinanceError::invalid(format!(
                        "upcoming_horizon_days must be between 1 and {MAX_HORIZON_DAYS}"
                    )));
                }
                self.upcoming_horizon_days = days;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<u32, FinanceError> {
    value
        .parse::<u32>()
        .map_err(|_| FinanceError::invalid(format!("{key} must be a whole number, got `{value}`")))
}

fn unknown_key(key: &str) -> FinanceError {
    FinanceError::invalid(format!(
        "unknown setting `{key}` (expected one of: {})",
        Config::KEYS.join(", ")
    ))
}

/// Loads and persists [`Config`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, FinanceError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, FinanceError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, FinanceError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            debug!(path = %self.path.display(), "loaded configuration");
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), FinanceError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), FinanceError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
