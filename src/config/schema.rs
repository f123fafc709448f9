// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Embedded JSON Schemas for configuration, module files and commit drafts.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

const CONFIG_SCHEMA: &str = include_str!("../../schema/config.json");
const COMMIT_SCHEMA: &str = include_str!("../../schema/commit.json");
const MODULE_SCHEMA: &str = include_str!("../../schema/module.json");

/// Names accepted by [`validate`]
pub const SCHEMA_NAMES: &[&str] = &["config", "commit", "module"];

fn source(name: &str) -> Option<&'static str> {
    match name {
        "config" => Some(CONFIG_SCHEMA),
        "commit" => Some(COMMIT_SCHEMA),
        "module" => Some(MODULE_SCHEMA),
        _ => None,
    }
}

/// Check `instance` against the named schema. The first violation is
/// reported together with its JSON pointer (`/` for the document root).
pub fn validate(instance: &Value, name: &str) -> Result<()> {
    let raw = source(name).ok_or_else(|| Error::UnknownSchema(name.to_string()))?;

    let schema: Value = serde_json::from_str(raw)
        .map_err(|e| Error::Config(format!("embedded {name} schema is not JSON: {e}")))?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| Error::Config(format!("embedded {name} schema is invalid: {e}")))?;

    if let Some(err) = validator.iter_errors(instance).next() {
        let path = err.instance_path.to_string();
        return Err(Error::Schema {
            schema: name.to_string(),
            path: if path.is_empty() { "/".into() } else { path },
            message: err.to_string(),
        });
    }

    debug!(schema = name, "document valid");
    Ok(())
}

/// Whether the named schema types the dot-path `key` as a string only
pub fn expects_string(name: &str, key: &str) -> bool {
    let Some(schema) = source(name).and_then(|raw| serde_json::from_str::<Value>(raw).ok()) else {
        return false;
    };
    let leaf = key
        .split('.')
        .try_fold(&schema, |node, part| node.get("properties")?.get(part));

    match leaf.and_then(|leaf| leaf.get("type")) {
        Some(Value::String(ty)) => ty == "string",
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            names.contains(&"string")
                && !names
                    .iter()
                    .any(|t| matches!(*t, "number" | "integer" | "boolean"))
        }
        _ => false,
    }
}
