use clap::Subcommand;
use earntrack_core::{Cycle, SettingsField};

use super::{money, open_engine, print_json, CliResult, StdoutClipboard};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the active settings and the resulting rate
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one field (salary, currency, cycle, workHours, workDaysPerWeek)
    Set {
        field: SettingsField,
        value: String,
    },
    /// Switch the pay cycle; the salary becomes the cycle's first preset
    Cycle { cycle: Cycle },
    /// Print the shareable settings link
    Share {
        /// Leave out `mode=zen`
        #[arg(long)]
        no_zen: bool,
    },
    /// Copy the zen share link
    Copy,
}

pub fn run(action: SettingsAction, url: Option<&str>) -> CliResult {
    let (mut engine, config) = open_engine(url)?;

    match action {
        SettingsAction::Show { json } => {
            let settings = *engine.settings();
            if json {
                print_json(&settings)?;
                return Ok(());
            }
            let decimals = config.display.earnings_decimals;
            println!("Salary:     {} ({})", settings.salary, settings.cycle.label());
            println!("Presets:    {}", presets(settings.cycle));
            println!("Currency:   {} {}", settings.currency.code(), settings.currency.label());
            println!("Work hours: {}", settings.work_hours);
            println!("Work days:  {}", settings.work_days_per_week);
            println!(
                "Rate:       {}/s",
                money(engine.rate(), settings.currency, decimals)
            );
        }
        SettingsAction::Set { field, value } => {
            let mut event = engine.edit_setting(field, &value)?;
            // a one-shot edit is committed immediately
            if field == SettingsField::WorkHours {
                if let Some(corrected) = engine.commit_work_hours() {
                    eprintln!("work hours out of range, using {}", engine.settings().work_hours);
                    event = corrected;
                }
            }
            print_json(&event)?;
        }
        SettingsAction::Cycle { cycle } => {
            let event = engine.edit_setting(SettingsField::Cycle, cycle.as_str())?;
            print_json(&event)?;
        }
        SettingsAction::Share { no_zen } => {
            if no_zen {
                println!("{}", engine.share_url());
            } else {
                println!("{}", engine.share_link());
            }
        }
        SettingsAction::Copy => {
            let event = engine.copy_share_link(&StdoutClipboard)?;
            tracing::debug!(?event, "share link copied");
            eprintln!("Link copied");
        }
    }
    Ok(())
}

fn presets(cycle: Cycle) -> String {
    cycle
        .presets()
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
