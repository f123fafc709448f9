// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use serde_json::Value;

use crate::app::App;
use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::parse_value_for;
use crate::error::{Error, Result};

pub fn run(app: &mut App, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommand::Get { key, level } => {
            let value = match level {
                Some(level) => app.store.get_at(key, *level),
                None => app.store.get(key),
            };
            let value = value.ok_or_else(|| match level {
                Some(level) => Error::Config(format!("'{key}' is not set at {level} level")),
                None => Error::Config(format!("'{key}' is not set")),
            })?;
            println!("{}", render(&value));
        }

        ConfigCommand::Set { key, value, level } => {
            app.store.set(key, parse_value_for(key, value), *level)?;
            app.out
                .success(&format!("{key} = {value} ({level})"));
        }

        ConfigCommand::List { level } => {
            for entry in app.store.list(*level)? {
                println!("{} = {}", entry.key, render(&entry.value));
            }
        }

        ConfigCommand::Reset { key, level } => {
            if !app.store.reset(*level, key.as_deref())? {
                let key = key.as_deref().unwrap_or_default();
                return Err(Error::Config(format!("'{key}' is not set at {level} level")));
            }
            match key {
                Some(key) => app.out.success(&format!("{key} removed from {level} level")),
                None => app.out.success(&format!("{level} level cleared")),
            }
        }

        ConfigCommand::Validate => {
            if let Some(path) = app.store.unreadable_files().first() {
                return Err(Error::Config(format!("{} is not valid YAML", path.display())));
            }
            app.store.validate()?;
            app.store.settings()?.ai.validate()?;
            app.out.success("Configuration is valid");
        }
    }
    Ok(())
}

/// Strings bare, everything else as JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
