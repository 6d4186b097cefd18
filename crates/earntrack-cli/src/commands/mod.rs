pub mod completions;
pub mod config;
pub mod session;
pub mod settings;
pub mod view;
pub mod watch;

use std::io::Write;

use earntrack_core::link::Clipboard;
use earntrack_core::{
    Config, CoreError, Currency, Database, Engine, EngineOptions, Location, SystemClock,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Engine over the on-disk store, as one page load.
pub type AppEngine = Engine<Database, SystemClock>;

/// Load the engine the way a page load would: `url` plays the role of the
/// address bar.
pub fn open_engine(url: Option<&str>) -> Result<(AppEngine, Config), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let options = EngineOptions::from_config(&config)?;
    let location = url
        .map(Location::parse)
        .transpose()
        .map_err(|e| format!("invalid --url: {e}"))?;
    let db = Database::open()?;
    let engine = Engine::load(db, SystemClock, location, options);
    if let Some(event) = engine.restored() {
        tracing::debug!(?event, "resuming session");
    }
    Ok((engine, config))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn money(amount: f64, currency: Currency, decimals: usize) -> String {
    format!(
        "{}{}",
        currency.symbol(),
        earntrack_core::format::format_earnings(amount, decimals)
    )
}

/// A terminal has no clipboard we can rely on; the link goes to stdout.
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<(), CoreError> {
        writeln!(std::io::stdout().lock(), "{text}")?;
        Ok(())
    }
}
