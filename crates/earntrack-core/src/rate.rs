//! Per-second income rate.

use crate::settings::{Cycle, Settings};

pub const SECONDS_PER_HOUR: f64 = 3600.0;
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// Working seconds in a year for the given schedule.
pub fn work_seconds_per_year(settings: &Settings) -> f64 {
    settings.work_days_per_week * WEEKS_PER_YEAR * settings.work_hours * SECONDS_PER_HOUR
}

/// Income earned per second of work, in the settings' currency.
///
/// A missing, non-positive or non-finite salary yields `0.0`, as does a
/// schedule with no working seconds. Hourly wages ignore the schedule.
pub fn per_second_rate(settings: &Settings) -> f64 {
    let salary = settings.salary;
    if !salary.is_finite() || salary <= 0.0 {
        return 0.0;
    }

    let annual = match settings.cycle {
        Cycle::Hourly => return salary / SECONDS_PER_HOUR,
        Cycle::Daily => salary * settings.work_days_per_week * WEEKS_PER_YEAR,
        Cycle::Monthly => salary * 12.0,
        Cycle::Annual => salary,
    };

    let seconds = work_seconds_per_year(settings);
    if seconds == 0.0 {
        return 0.0;
    }
    annual / seconds
}
