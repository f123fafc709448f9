// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// On-disk AI usage ledger (`ai-usage.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLedger {
    pub period: UsagePeriod,
    #[serde(default)]
    pub daily_usage: BTreeMap<String, DailyUsage>,
    #[serde(default)]
    pub totals: UsageTotals,
    pub limits: UsageLimits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePeriod {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    pub requests: u64,
    pub tokens: u64,
    pub cost: f64,
    #[serde(default)]
    pub commands: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub requests: u64,
    pub tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub cost_limit: f64,
    #[serde(default = "default_true")]
    pub tracking_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl UsageLedger {
    /// Fresh ledger whose period starts on `today`
    pub fn new(today: &str, cost_limit: f64) -> Self {
        Self {
            period: UsagePeriod {
                start_date: today.to_string(),
                end_date: today.to_string(),
            },
            daily_usage: BTreeMap::new(),
            totals: UsageTotals::default(),
            limits: UsageLimits {
                cost_limit,
                tracking_enabled: true,
            },
        }
    }

    pub fn record(&mut self, today: &str, command: &str, tokens: u64, cost: f64) {
        let daily = self.daily_usage.entry(today.to_string()).or_default();
        daily.requests += 1;
        daily.tokens += tokens;
        daily.cost += cost;
        *daily.commands.entry(command.to_string()).or_insert(0) += 1;

        self.totals.requests += 1;
        self.totals.tokens += tokens;
        self.totals.cost += cost;

        self.period.end_date = today.to_string();
    }
}
