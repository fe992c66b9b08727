// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::APP_DIR;

pub const LOG_FILTER_ENV: &str = "HORIZON_LOG";
const DEFAULT_FILTER: &str = "horizon=info";

/// `HORIZON_LOG` when it parses, `horizon=info` otherwise. The directive
/// matches every `horizon_*` crate target by prefix.
fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn env_filter() -> EnvFilter {
    filter_from(env::var(LOG_FILTER_ENV).ok().as_deref())
}

/// The terminal UI owns stdout and stderr, so interactive sessions log to
/// `<state dir>/horizon/horizon.log`.
pub fn default_log_path() -> Result<PathBuf> {
    let root = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| anyhow!("cannot resolve a state directory for the log file"))?;
    Ok(root.join(APP_DIR).join("horizon.log"))
}

pub fn init_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("install log subscriber")
}

/// Compact stderr logging for the one-shot commands.
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("install log subscriber")
}
