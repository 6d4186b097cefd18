use clap::{CommandFactory, Parser, Subcommand};
use earntrack_core::Screen;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "earntrack", version, about = "EarnTrack CLI")]
struct Cli {
    /// Page location to load with, e.g. a shared settings link
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new earnings session
    Start,
    /// Stop the session, or restart it in place with --quick
    Reset {
        #[arg(long)]
        quick: bool,
    },
    /// Print current earnings
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Live earnings counter (z: zen, p: pause, r: reset, q: quit)
    Watch,
    /// Salary and schedule settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Color theme
    Theme {
        #[command(subcommand)]
        action: commands::view::ThemeAction,
    },
    /// Print or switch the active screen
    View { screen: Option<Screen> },
    /// Toggle zen mode
    Zen,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("EARNTRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let url = cli.url.as_deref();
    let result = match cli.command {
        Commands::Start => commands::session::start(url),
        Commands::Reset { quick } => commands::session::reset(url, quick),
        Commands::Status { json } => commands::session::status(url, json),
        Commands::Watch => commands::watch::run(url).await,
        Commands::Settings { action } => commands::settings::run(action, url),
        Commands::Theme { action } => commands::view::theme(action, url),
        Commands::View { screen } => commands::view::screen(screen, url),
        Commands::Zen => commands::view::zen(url),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
