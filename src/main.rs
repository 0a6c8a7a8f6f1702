use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use session_scheduler::config::Cli;
use session_scheduler::run_scheduler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Settings may live in a .env file next to the binary
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    let fmt_layer = fmt::layer().with_file(true).with_line_number(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let config = cli.search_config()?;
    let path = run_scheduler(
        config,
        &cli.sessions,
        &cli.preferences,
        &cli.output_dir,
        cli.verbose,
        cli.summary,
    )?;

    println!("Schedule saved to {}", path.display());
    Ok(())
}
