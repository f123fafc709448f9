// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{AiSettings, write_atomic};
use crate::domain::UsageLedger;
use crate::error::Result;

/// Running token and cost totals kept in a YAML ledger. `ai.cost_limit` from
/// the configuration is authoritative; the ledger only mirrors it.
#[derive(Debug, Clone)]
pub struct AiUsageTracker {
    path: PathBuf,
    cost_limit: f64,
    tracking_enabled: bool,
}

impl AiUsageTracker {
    pub fn new(path: impl Into<PathBuf>, cost_limit: f64, tracking_enabled: bool) -> Self {
        Self {
            path: path.into(),
            cost_limit,
            tracking_enabled,
        }
    }

    /// Ledger at `ai.usage_file`, resolved against the repository root when
    /// relative
    pub fn from_settings(repo_root: &Path, settings: &AiSettings) -> Self {
        let file = Path::new(&settings.usage_file);
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            repo_root.join(file)
        };
        Self::new(path, settings.cost_limit, settings.tracking_enabled)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }

    pub fn cost_limit(&self) -> f64 {
        self.cost_limit
    }

    pub fn increment_usage(&self, command: &str, tokens: u64, cost: f64) -> Result<()> {
        if !self.tracking_enabled {
            return Ok(());
        }

        let mut ledger = self.load();
        ledger.record(&today(), command, tokens, cost);
        ledger.limits.cost_limit = self.cost_limit;
        self.save(&ledger)?;

        debug!(command, tokens, cost, total = ledger.totals.cost, "usage recorded");
        Ok(())
    }

    /// Current ledger; an empty one when tracking is off
    pub fn usage_stats(&self) -> UsageLedger {
        if !self.tracking_enabled {
            let mut ledger = UsageLedger::new(&today(), self.cost_limit);
            ledger.limits.tracking_enabled = false;
            return ledger;
        }
        self.load()
    }

    pub fn reset_usage(&self) -> Result<()> {
        if !self.tracking_enabled {
            return Ok(());
        }
        self.save(&UsageLedger::new(&today(), self.cost_limit))?;
        debug!(path = %self.path.display(), "usage ledger reset");
        Ok(())
    }

    pub fn is_cost_limit_exceeded(&self) -> bool {
        self.tracking_enabled && self.load().totals.cost >= self.cost_limit
    }

    /// Unlimited when tracking is off
    pub fn remaining_budget(&self) -> f64 {
        if !self.tracking_enabled {
            return f64::INFINITY;
        }
        (self.cost_limit - self.load().totals.cost).max(0.0)
    }

    fn load(&self) -> UsageLedger {
        let fresh = || UsageLedger::new(&today(), self.cost_limit);

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return fresh(),
            Err(e) => {
                warn!(path = %self.path.display(), "cannot read usage ledger: {e}");
                return fresh();
            }
        };

        match serde_yaml::from_str::<UsageLedger>(&raw) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(path = %self.path.display(), "usage ledger unreadable, starting over: {e}");
                fresh()
            }
        }
    }

    fn save(&self, ledger: &UsageLedger) -> Result<()> {
        write_atomic(&self.path, &serde_yaml::to_string(ledger)?)
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
