use clap::Subcommand;
use earntrack_core::Screen;

use super::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Get,
    /// Switch between dark and light
    Toggle,
}

pub fn theme(action: ThemeAction, url: Option<&str>) -> CliResult {
    let (mut engine, _) = open_engine(url)?;
    match action {
        ThemeAction::Get => println!("{}", engine.view().theme),
        ThemeAction::Toggle => print_json(&engine.toggle_theme())?,
    }
    Ok(())
}

/// Print the active screen, or switch to `screen`.
pub fn screen(screen: Option<Screen>, url: Option<&str>) -> CliResult {
    let (mut engine, _) = open_engine(url)?;
    match screen {
        None => println!("{}", engine.view().screen),
        Some(screen) => {
            if let Some(event) = engine.set_screen(screen) {
                print_json(&event)?;
            }
        }
    }
    Ok(())
}

/// Toggle zen mode and print the rewritten location.
pub fn zen(url: Option<&str>) -> CliResult {
    let (mut engine, _) = open_engine(url)?;
    if let Some(event) = engine.toggle_zen() {
        tracing::debug!(?event, "zen toggled");
    }
    println!("{}", engine.location().url());
    Ok(())
}
