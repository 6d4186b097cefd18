//! Salary settings: the record every rate computation starts from.
//!
//! The JSON shape of [`Settings`] is also the durable settings blob, so the
//! field names are camelCase (`salary`, `currency`, `cycle`, `workHours`,
//! `workDaysPerWeek`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Work-hours value applied when a committed edit falls outside `[1, 24]`.
pub const DEFAULT_WORK_HOURS: f64 = 8.0;

/// Selectable work days per week, `5.5` being alternating 5/6-day weeks.
pub const WORK_DAY_OPTIONS: [f64; 8] = [7.0, 6.0, 5.5, 5.0, 4.0, 3.0, 2.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cny,
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Cny,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Cny => "CNY",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Cny | Currency::Jpy => "¥",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Currency::Cny => "Chinese Yuan (¥)",
            Currency::Usd => "US Dollar ($)",
            Currency::Eur => "Euro (€)",
            Currency::Gbp => "British Pound (£)",
            Currency::Jpy => "Japanese Yen (¥)",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Exact, case-sensitive match on the currency code.
impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "currency".into(),
                message: format!("unsupported currency '{s}'"),
            })
    }
}

/// Salary period basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    Annual,
    Monthly,
    Daily,
    Hourly,
}

impl Cycle {
    pub const ALL: [Cycle; 4] = [Cycle::Annual, Cycle::Monthly, Cycle::Daily, Cycle::Hourly];

    pub fn as_str(self) -> &'static str {
        match self {
            Cycle::Annual => "annual",
            Cycle::Monthly => "monthly",
            Cycle::Daily => "daily",
            Cycle::Hourly => "hourly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cycle::Annual => "Annual salary",
            Cycle::Monthly => "Monthly salary",
            Cycle::Daily => "Daily wage",
            Cycle::Hourly => "Hourly wage",
        }
    }

    /// Quick-select salary presets offered for this cycle. The first one
    /// becomes the salary whenever the user switches to this cycle.
    pub fn presets(self) -> [f64; 4] {
        match self {
            Cycle::Annual => [100_000.0, 200_000.0, 300_000.0, 500_000.0],
            Cycle::Monthly => [8_000.0, 15_000.0, 20_000.0, 30_000.0],
            Cycle::Daily => [200.0, 400.0, 600.0, 800.0],
            Cycle::Hourly => [25.0, 50.0, 100.0, 150.0],
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cycle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cycle::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "cycle".into(),
                message: format!("unsupported cycle '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub salary: f64,
    pub currency: Currency,
    pub cycle: Cycle,
    pub work_hours: f64,
    pub work_days_per_week: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            salary: 12_000.0,
            currency: Currency::Cny,
            cycle: Cycle::Monthly,
            work_hours: DEFAULT_WORK_HOURS,
            work_days_per_week: 5.0,
        }
    }
}

/// Editable settings fields, named as they appear in links and the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Salary,
    Currency,
    Cycle,
    WorkHours,
    WorkDaysPerWeek,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        SettingsField::Salary,
        SettingsField::Currency,
        SettingsField::Cycle,
        SettingsField::WorkHours,
        SettingsField::WorkDaysPerWeek,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SettingsField::Salary => "salary",
            SettingsField::Currency => "currency",
            SettingsField::Cycle => "cycle",
            SettingsField::WorkHours => "workHours",
            SettingsField::WorkDaysPerWeek => "workDaysPerWeek",
        }
    }
}

impl FromStr for SettingsField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "salary" => Ok(SettingsField::Salary),
            "currency" => Ok(SettingsField::Currency),
            "cycle" => Ok(SettingsField::Cycle),
            "workHours" | "work_hours" | "work-hours" => Ok(SettingsField::WorkHours),
            "workDaysPerWeek" | "work_days_per_week" | "work-days" => {
                Ok(SettingsField::WorkDaysPerWeek)
            }
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

impl Settings {
    /// `true` when the salary can produce a non-zero rate.
    pub fn has_valid_salary(&self) -> bool {
        self.salary.is_finite() && self.salary > 0.0
    }

    pub fn is_valid_work_days(days: f64) -> bool {
        WORK_DAY_OPTIONS.contains(&days)
    }

    /// Switch the salary cycle, replacing the salary with the cycle's first
    /// quick-select preset.
    pub fn change_cycle(&mut self, cycle: Cycle) {
        self.cycle = cycle;
        self.salary = cycle.presets()[0];
    }

    /// Correct out-of-range work hours once an edit is committed.
    ///
    /// Returns `true` if the value was replaced.
    pub fn commit_work_hours(&mut self) -> bool {
        if (1.0..=24.0).contains(&self.work_hours) {
            return false;
        }
        self.work_hours = DEFAULT_WORK_HOURS;
        true
    }

    /// Apply a raw user edit to one field.
    ///
    /// Work hours are accepted as typed; range correction happens in
    /// [`Settings::commit_work_hours`].
    pub fn set_field(&mut self, field: SettingsField, raw: &str) -> Result<(), ValidationError> {
        let raw = raw.trim();
        match field {
            SettingsField::Salary => self.salary = parse_number(field, raw)?,
            SettingsField::Currency => self.currency = raw.parse()?,
            SettingsField::Cycle => self.change_cycle(raw.parse()?),
            SettingsField::WorkHours => self.work_hours = parse_number(field, raw)?,
            SettingsField::WorkDaysPerWeek => {
                let days = parse_number(field, raw)?;
                if !Self::is_valid_work_days(days) {
                    return Err(ValidationError::InvalidValue {
                        field: field.key().into(),
                        message: format!("{days} is not one of {WORK_DAY_OPTIONS:?}"),
                    });
                }
                self.work_days_per_week = days;
            }
        }
        Ok(())
    }

    pub fn get_field(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Salary => self.salary.to_string(),
            SettingsField::Currency => self.currency.code().to_string(),
            SettingsField::Cycle => self.cycle.as_str().to_string(),
            SettingsField::WorkHours => self.work_hours.to_string(),
            SettingsField::WorkDaysPerWeek => self.work_days_per_week.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn parse_number(field: SettingsField, raw: &str) -> Result<f64, ValidationError> {
    match raw.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(ValidationError::InvalidValue {
            field: field.key().into(),
            message: format!("cannot parse '{raw}' as number"),
        }),
    }
}

/// Settings as stored durably, where any field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartialSettings {
    pub salary: Option<f64>,
    pub currency: Option<Currency>,
    pub cycle: Option<Cycle>,
    pub work_hours: Option<f64>,
    pub work_days_per_week: Option<f64>,
}

impl PartialSettings {
    /// Overlay the present fields onto `base`.
    pub fn merge_over(self, base: Settings) -> Settings {
        Settings {
            salary: self.salary.unwrap_or(base.salary),
            currency: self.currency.unwrap_or(base.currency),
            cycle: self.cycle.unwrap_or(base.cycle),
            work_hours: self.work_hours.unwrap_or(base.work_hours),
            work_days_per_week: self.work_days_per_week.unwrap_or(base.work_days_per_week),
        }
    }
}
