// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

//! Colored status lines on stderr. Command results go to stdout unstyled.

use std::io::IsTerminal;

use console::{Color, StyledObject, style};
use tracing::warn;

use crate::config::ColorSettings;

/// A named terminal color such as `green` or `bright_green`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shade {
    pub color: Color,
    pub bright: bool,
}

impl Shade {
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let (base, bright) = match name.strip_prefix("bright_") {
            Some(base) => (base, true),
            None => (name.as_str(), false),
        };
        let color = match base {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            _ => return None,
        };
        Some(Self { color, bright })
    }

    fn paint<D>(&self, value: D) -> StyledObject<D> {
        let styled = style(value).fg(self.color);
        if self.bright { styled.bright() } else { styled }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub success: Shade,
    pub error: Shade,
    pub warning: Shade,
    pub info: Shade,
}

impl Default for Palette {
    fn default() -> Self {
        let plain = |color| Shade {
            color,
            bright: false,
        };
        Self {
            success: plain(Color::Green),
            error: plain(Color::Red),
            warning: plain(Color::Yellow),
            info: plain(Color::Cyan),
        }
    }
}

impl Palette {
    /// Unknown color names keep their default
    pub fn from_settings(colors: &ColorSettings) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, name: &str, fallback: Shade| {
            Shade::parse(name).unwrap_or_else(|| {
                warn!("unknown color '{name}' for ui.colors.{key}, using default");
                fallback
            })
        };
        Self {
            success: pick("success", &colors.success, defaults.success),
            error: pick("error", &colors.error, defaults.error),
            warning: pick("warning", &colors.warning, defaults.warning),
            info: pick("info", &colors.info, defaults.info),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Output {
    palette: Palette,
}

impl Output {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn status(&self, msg: &str) {
        eprintln!("{} {}", self.palette.info.paint("→"), msg);
    }

    pub fn info(&self, msg: &str) {
        eprintln!("{} {}", self.palette.info.paint("info:"), msg);
    }

    pub fn warning(&self, msg: &str) {
        eprintln!("{} {}", self.palette.warning.paint("warning:").bold(), msg);
    }

    pub fn success(&self, msg: &str) {
        eprintln!("{} {}", self.palette.success.paint("✓").bold(), msg);
    }

    /// Highlighted value on stderr, e.g. a generated message awaiting
    /// confirmation
    pub fn highlight(&self, msg: &str) {
        eprintln!("{}", self.palette.success.paint(msg));
    }
}

/// Both ends attached to a terminal, so prompts can be shown
pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stdin().is_terminal()
}
