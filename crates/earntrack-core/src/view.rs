//! View state: which surface is shown, zen overlay, theme, and the short-lived
//! acknowledgments shown after a quick reset or a link copy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Settings,
    Calculator,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Settings => "settings",
            Screen::Calculator => "calculator",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settings" => Ok(Screen::Settings),
            "calculator" => Ok(Screen::Calculator),
            other => Err(ValidationError::InvalidValue {
                field: "screen".into(),
                message: format!("unknown screen '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("unknown theme '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub screen: Screen,
    pub zen_mode: bool,
    pub theme: Theme,
}

/// Deadline-based transient notices, compared against the engine clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Notices {
    reset_until: Option<u64>,
    copied_until: Option<u64>,
}

impl Notices {
    pub fn show_reset(&mut self, now_ms: u64, duration_ms: u64) {
        self.reset_until = Some(now_ms.saturating_add(duration_ms));
    }

    pub fn show_copied(&mut self, now_ms: u64, duration_ms: u64) {
        self.copied_until = Some(now_ms.saturating_add(duration_ms));
    }

    pub fn reset_visible(&self, now_ms: u64) -> bool {
        self.reset_until.is_some_and(|until| now_ms < until)
    }

    pub fn copied_visible(&self, now_ms: u64) -> bool {
        self.copied_until.is_some_and(|until| now_ms < until)
    }
}
