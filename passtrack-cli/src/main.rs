mod display;

use std::time::Duration;

use clap::Parser;
use passtrack_core::colors::CatppuccinExt;
use passtrack_core::output::{
    get_formatter, HumanFormatter, JsonFormatter, OutputFormat, OutputFormatter,
};
use passtrack_core::{ErrorKind, TrackingClient};
use tracing_subscriber::EnvFilter;

use display::Spinner;

#[derive(Parser)]
#[command(name = "passtrack")]
#[command(about = "Check the status of an Irish passport application on the DFA tracking portal")]
#[command(version)]
struct Cli {
    /// Application reference number
    reference: String,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Seconds to wait for each portal request
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let formatter: Box<dyn OutputFormatter> = match cli.format {
        OutputFormat::Human if cli.no_color => Box::new(HumanFormatter::new().without_colors()),
        OutputFormat::Json if cli.compact => Box::new(JsonFormatter::new().compact()),
        format => get_formatter(format),
    };

    let client = TrackingClient::new().with_timeout(Duration::from_secs(cli.timeout));

    let spinner = Spinner::new(&format!("Checking {}...", cli.reference.trim()));
    let result = client.lookup(&cli.reference).await;
    spinner.finish();

    match result {
        Ok(report) => {
            println!("{}", formatter.format_report(cli.reference.trim(), &report));
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".ctp_red(), e);
            if let Some(hint) = hint_for(e.kind()) {
                eprintln!("{}", hint);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn hint_for(kind: ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::Transport => Some("The tracking portal could not be reached; try again later."),
        ErrorKind::Structure => {
            Some("The tracking portal returned an unexpected page; it may be under maintenance.")
        }
        ErrorKind::Input => None,
    }
}
