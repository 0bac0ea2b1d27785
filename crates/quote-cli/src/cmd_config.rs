use clap::Subcommand;
use quote_core::{PaymentTracking, TaxMode};
use quote_store::config::{parse_value, DEFAULT_TAX_RATE, PAYMENT_TRACKING, TAX_MODE};
use quote_store::Workspace;
use std::path::Path;

use crate::cmd_quote::open_locked;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. pricing.tax_mode)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Remove a config value
    Unset {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, repo_root: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(repo_root, &key, &value),
        ConfigCmd::Get { key } => get(repo_root, &key),
        ConfigCmd::Unset { key } => unset(repo_root, &key),
        ConfigCmd::List => list(repo_root),
    }
}

// ── Command Implementations ──

/// Reject values the pricing keys cannot hold.
fn validate(key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        TAX_MODE => {
            value.parse::<TaxMode>()?;
        }
        PAYMENT_TRACKING => {
            value.parse::<PaymentTracking>()?;
        }
        DEFAULT_TAX_RATE => {
            if !parse_value(value).is_number() {
                anyhow::bail!("{key} must be a number, got {value:?}");
            }
        }
        _ => {}
    }
    Ok(())
}

/// `quote config set <key> <value>`
pub fn set(repo_root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    validate(key, value)?;
    let (mut ws, _lock) = open_locked(repo_root)?;
    ws.config.set(key, value);
    ws.save_config()?;
    tracing::info!(key, value, "config updated");
    println!("{key} = {value}");
    Ok(())
}

/// `quote config get <key>`
pub fn get(repo_root: &Path, key: &str) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    match ws.config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `quote config unset <key>`
pub fn unset(repo_root: &Path, key: &str) -> anyhow::Result<()> {
    let (mut ws, _lock) = open_locked(repo_root)?;
    if ws.config.unset(key).is_some() {
        ws.save_config()?;
        println!("{key} removed");
    } else {
        println!("(not set)");
    }
    Ok(())
}

/// `quote config list`
pub fn list(repo_root: &Path) -> anyhow::Result<()> {
    let ws = Workspace::open(repo_root)?;
    if ws.config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in ws.config.entries() {
            println!("{k} = {v}");
        }
    }
    Ok(())
}
