//! CLI entry point for `gmailgrab`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use gmailgrab::api::GmailClient;
use gmailgrab::auth::Credentials;
use gmailgrab::config::Config;
use gmailgrab::pipeline::{self, Progress};
use gmailgrab::{config, filter};

#[derive(Parser)]
#[command(
    name = "gmailgrab",
    version,
    about = "Bulk-download Gmail attachments, filtered by label or sender",
    after_help = "With no arguments the filter is chosen interactively. \
                  Authentication expects a bearer token in $GMAILGRAB_TOKEN \
                  or in <config-dir>/gmailgrab/token."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Download attachments from messages carrying this label (non-interactive)
    #[arg(long, value_name = "NAME")]
    label: Option<String>,

    /// Directory to write attachments to (default: ./files)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cmd_download(cli.label.as_deref(), cli.output, &config))
        }
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "gmailgrab.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "gmailgrab", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Resolve the filter, run the pipeline, print a summary.
async fn cmd_download(
    label: Option<&str>,
    output: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<()> {
    let credentials = Credentials::load()?;
    let client = GmailClient::new(credentials.token(), config.api.base_url.as_str())?;

    // Filter selection happens before the spinner starts, since the
    // interactive path reads from stdin.
    let filter = match label {
        Some(name) => filter::from_label_name(&client, name).await?,
        None => filter::choose_interactively(&client).await?,
    };

    let output_dir = output.unwrap_or_else(|| config.general.output_dir.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Listing {}", filter.describe()));

    let progress = |event: Progress| match event {
        Progress::PageRead { page } => {
            spinner.set_message(format!("Reading page {page}"));
        }
        Progress::MailsFetched { fetched, total } => {
            spinner.set_message(format!("{fetched}/{total} mails fetched"));
        }
        Progress::Cooldown { ms } => {
            spinner.set_message(format!("Sleeping for {} s", ms / 1000));
        }
        Progress::AttachmentsSaved { saved, total } => {
            spinner.set_message(format!("{saved}/{total} attachments saved"));
        }
    };

    let summary = pipeline::run(&client, &filter, config, &output_dir, &progress).await?;
    spinner.finish_and_clear();

    println!();
    println!("  {:<15} {}", "Messages", summary.messages);
    println!("  {:<15} {}", "Attachments", summary.saved.len());
    println!(
        "  {:<15} {}",
        "Total size",
        format_size(summary.total_bytes(), BINARY)
    );
    println!("  {:<15} {}", "Output", output_dir.display());
    println!();
    println!("Done");

    Ok(())
}
