//! Configuration resolver.
//!
//! Settings are resolved once at startup, field by field:
//!
//! 1. query-string parameters that are present and individually valid
//! 2. the stored settings blob, merged over the defaults
//! 3. hard defaults
//!
//! A corrupt blob or a malformed parameter is reported as a diagnostic and
//! otherwise ignored.

use crate::error::ValidationError;
use crate::link::Location;
use crate::settings::{Currency, Cycle, PartialSettings, Settings, SettingsField};

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub settings: Settings,
    /// A settings parameter was present in the location, valid or not.
    pub url_override: bool,
    /// Zen mode was requested by the location.
    pub zen_mode: bool,
    pub diagnostics: Vec<ValidationError>,
}

pub fn resolve(location: Option<&Location>, stored: Option<&str>) -> Resolution {
    let mut diagnostics = Vec::new();

    let mut settings = match stored {
        Some(blob) => match serde_json::from_str::<PartialSettings>(blob) {
            Ok(partial) => partial.merge_over(Settings::default()),
            Err(e) => {
                diagnostics.push(ValidationError::MalformedStoredSettings(e.to_string()));
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let (url_override, zen_mode) = match location {
        Some(location) => {
            let overrides = url_settings(location, &mut diagnostics);
            overrides.apply_to(&mut settings);
            let url_override = location.has_settings_params();
            (url_override, url_override || location.zen_requested())
        }
        None => (false, false),
    };

    for diagnostic in &diagnostics {
        tracing::debug!(%diagnostic, "ignored configuration input");
    }

    Resolution {
        settings,
        url_override,
        zen_mode,
        diagnostics,
    }
}

/// Valid settings parameters found in the location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlSettings {
    pub salary: Option<f64>,
    pub currency: Option<Currency>,
    pub cycle: Option<Cycle>,
    pub work_hours: Option<f64>,
    pub work_days_per_week: Option<f64>,
}

impl UrlSettings {
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = self.salary {
            settings.salary = v;
        }
        if let Some(v) = self.currency {
            settings.currency = v;
        }
        if let Some(v) = self.cycle {
            settings.cycle = v;
        }
        if let Some(v) = self.work_hours {
            settings.work_hours = v;
        }
        if let Some(v) = self.work_days_per_week {
            settings.work_days_per_week = v;
        }
    }
}

pub fn url_settings(location: &Location, diagnostics: &mut Vec<ValidationError>) -> UrlSettings {
    let mut out = UrlSettings::default();
    for field in SettingsField::ALL {
        let Some(raw) = location.param(field.key()) else {
            continue;
        };
        let applied = match field {
            SettingsField::Salary => finite_param(&raw).map(|v| out.salary = Some(v)),
            SettingsField::WorkHours => finite_param(&raw).map(|v| out.work_hours = Some(v)),
            SettingsField::WorkDaysPerWeek => {
                finite_param(&raw).map(|v| out.work_days_per_week = Some(v))
            }
            SettingsField::Currency => raw.parse::<Currency>().ok().map(|v| out.currency = Some(v)),
            SettingsField::Cycle => raw.parse::<Cycle>().ok().map(|v| out.cycle = Some(v)),
        };
        if applied.is_none() {
            diagnostics.push(ValidationError::InvalidUrlParameter {
                name: field.key().to_string(),
                value: raw,
            });
        }
    }
    out
}

/// Numeric parameters must be finite: settings are stored as JSON and shared
/// back as links, neither of which can carry infinity.
fn finite_param(raw: &str) -> Option<f64> {
    parse_leading_float(raw).filter(|v| v.is_finite())
}

/// Parse the longest numeric prefix of `input`, after leading whitespace.
///
/// `"5000abc"` gives `5000`, `"Infinity"` gives infinity, `"abc"` and `""`
/// give `None`.
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}
