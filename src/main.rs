//! Pomoclock - Pomodoro timer, countdown and timezone clock in the terminal
//!
//! Three modes share one widget:
//! - Pomodoro: work and break phases, advanced one round at a time
//! - Timer: a single freeform countdown
//! - Clock: the current time in a chosen timezone

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;

use pomoclock::cli::{pump_lines, Cli, Commands, Display, RunArgs, TerminalRenderer};
use pomoclock::session::{Session, SessionMessage};

/// Exit code used after Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so the widget on stdout stays readable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            run_session(args).await?;
        }
        Some(Commands::Timezones) => {
            Display::show_timezones();
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the interactive widget until `quit`, end of input or Ctrl-C.
async fn run_session(args: RunArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().context("Invalid durations")?;

    let session = Session::new(config, Box::new(TerminalRenderer::stdout()));
    let tx = session.sender();

    let input_tx = tx.clone();
    let reader = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = pump_lines(stdin, input_tx.clone()).await {
            Display::show_error(&format!("{:#}", e));
            let _ = input_tx.send(SessionMessage::Shutdown);
        }
    });

    let interrupted = Arc::new(AtomicBool::new(false));
    let signal_flag = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            signal_flag.store(true, Ordering::SeqCst);
            let _ = tx.send(SessionMessage::Shutdown);
        }
    });

    let snapshot = session.run().await;
    Display::show_goodbye(&snapshot);

    // A pending stdin read cannot be cancelled and would keep the runtime
    // from shutting down.
    if interrupted.load(Ordering::SeqCst) || !reader.is_finished() {
        std::io::stdout()
            .flush()
            .context("Failed to flush output")?;
        let code = if interrupted.load(Ordering::SeqCst) {
            EXIT_INTERRUPTED
        } else {
            0
        };
        std::process::exit(code);
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["pomoclock"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["pomoclock", "run"]);
        assert!(matches!(cli.command, Some(Commands::Run(_))));
    }

    #[test]
    fn test_cli_parse_run_with_options() {
        let cli = Cli::parse_from(["pomoclock", "run", "--work", "30", "--mode", "timer"]);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.work, 30);
                assert_eq!(args.mode, pomoclock::AppMode::Timer);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["pomoclock", "--verbose", "timezones"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Timezones)));
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
