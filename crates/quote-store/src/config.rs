//! Workspace configuration: `.quote/config.json`, a flat key/value map.
//!
//! Known keys:
//!
//! | key                        | values                  | default       |
//! |----------------------------|-------------------------|---------------|
//! | `pricing.tax_mode`         | `none` \| `exclusive`   | `none`        |
//! | `pricing.default_tax_rate` | number                  | unset         |
//! | `payments.tracking`        | `advance` \| `milestones` | `advance`   |
//! | `operator.name`            | string                  | `Admin User`  |
//! | `studio.name`              | string                  | built-in      |
//! | `studio.tagline`           | string                  | built-in      |
//! | `studio.regions`           | string                  | built-in      |
//!
//! `QUOTE_TAX_MODE` and `QUOTE_PAYMENT_TRACKING` override the file.

use anyhow::Context;
use quote_core::money;
use quote_core::{PaymentTracking, TaxMode, TotalsConfig};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::StoreError;

pub const TAX_MODE: &str = "pricing.tax_mode";
pub const DEFAULT_TAX_RATE: &str = "pricing.default_tax_rate";
pub const PAYMENT_TRACKING: &str = "payments.tracking";
pub const OPERATOR_NAME: &str = "operator.name";
pub const STUDIO_NAME: &str = "studio.name";
pub const STUDIO_TAGLINE: &str = "studio.tagline";
pub const STUDIO_REGIONS: &str = "studio.regions";

pub const TAX_MODE_ENV: &str = "QUOTE_TAX_MODE";
pub const PAYMENT_TRACKING_ENV: &str = "QUOTE_PAYMENT_TRACKING";

pub const DEFAULT_OPERATOR: &str = "Admin User";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceConfig {
    values: Map<String, Value>,
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                Value::String(s.to_string())
            }
        }
    }
}

fn as_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl WorkspaceConfig {
    /// Read config. Missing file or a non-object document is an empty map.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let val: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing config: {}", path.display()))?;
        Ok(match val {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        crate::write_atomic(path, json.as_bytes())
            .with_context(|| format!("saving config: {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set from raw text, parsed like the command line does.
    pub fn set(&mut self, key: &str, raw: &str) {
        self.values.insert(key.to_string(), parse_value(raw));
    }

    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(as_text)
            .filter(|s| !s.trim().is_empty())
    }

    /// Pricing configuration, environment first, then file, then defaults.
    pub fn totals_config(&self) -> Result<TotalsConfig, StoreError> {
        self.totals_config_with(|name| std::env::var(name).ok())
    }

    fn totals_config_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<TotalsConfig, StoreError> {
        let resolve = |env_name: &str, key: &str| {
            env(env_name)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (env_name.to_string(), v))
                .or_else(|| self.text(key).map(|v| (key.to_string(), v)))
        };

        let mut config = TotalsConfig::default();
        if let Some((key, raw)) = resolve(TAX_MODE_ENV, TAX_MODE) {
            config.tax = raw
                .parse::<TaxMode>()
                .map_err(|_| StoreError::InvalidConfig { key, value: raw })?;
        }
        if let Some((key, raw)) = resolve(PAYMENT_TRACKING_ENV, PAYMENT_TRACKING) {
            config.payments = raw
                .parse::<PaymentTracking>()
                .map_err(|_| StoreError::InvalidConfig { key, value: raw })?;
        }
        Ok(config)
    }

    /// Tax rate applied to new quotations in tax mode.
    pub fn default_tax_rate(&self) -> Option<Decimal> {
        self.values.get(DEFAULT_TAX_RATE).map(money::from_json)
    }

    /// Name recorded on history entries.
    pub fn operator_name(&self) -> String {
        self.text(OPERATOR_NAME)
            .unwrap_or_else(|| DEFAULT_OPERATOR.to_string())
    }

    pub fn studio_name(&self) -> Option<String> {
        self.text(STUDIO_NAME)
    }

    pub fn studio_tagline(&self) -> Option<String> {
        self.text(STUDIO_TAGLINE)
    }

    pub fn studio_regions(&self) -> Option<String> {
        self.text(STUDIO_REGIONS)
    }
}
