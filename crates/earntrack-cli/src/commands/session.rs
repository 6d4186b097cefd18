use earntrack_core::format::format_elapsed;
use earntrack_core::SessionState;

use super::{money, open_engine, print_json, CliResult};

pub fn start(url: Option<&str>) -> CliResult {
    let (mut engine, _) = open_engine(url)?;
    let event = engine.start()?;
    print_json(&event)
}

pub fn reset(url: Option<&str>, quick: bool) -> CliResult {
    let (mut engine, _) = open_engine(url)?;
    let event = engine.reset(quick);
    print_json(&event)
}

pub fn status(url: Option<&str>, json: bool) -> CliResult {
    let (mut engine, config) = open_engine(url)?;
    engine.refresh();

    if json {
        return print_json(&engine.snapshot());
    }

    let session = engine.session();
    let currency = engine.settings().currency;
    let decimals = config.display.earnings_decimals;
    let state = match engine.session_state() {
        SessionState::Idle => "idle",
        SessionState::Running => "running",
        SessionState::Paused => "paused",
    };

    println!("State:    {state}");
    println!("Earned:   {}", money(session.earnings, currency, decimals));
    println!("Elapsed:  {}", format_elapsed(session.elapsed_seconds));
    println!("Rate:     {}/s", money(engine.rate(), currency, decimals));
    if let Some(next) = engine.next_milestone() {
        println!("Next:     {}{next}", currency.symbol());
    }
    Ok(())
}
