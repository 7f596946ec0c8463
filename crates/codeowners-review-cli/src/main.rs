//! CODEOWNERS Review CLI
//!
//! A command-line tool that reports which code owners still have to review
//! a change and who to ask.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode as StdExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;
use cli::config::{ConfigError, ExitCode, ValidatedConfig};
use cli::output::{HumanOutput, JsonOutput};
use cli::source::LocalSource;
use codeowners_review_core::evaluate_from_source;

#[tokio::main]
async fn main() -> StdExitCode {
    let args = Args::parse();

    init_tracing(args.verbose, args.json);

    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_clone = terminated.clone();

    tokio::spawn(async move {
        let ctrl_c = signal::ctrl_c();
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }

        terminated_clone.store(true, Ordering::SeqCst);
    });

    let exit_code = run(args, &terminated).await;

    if terminated.load(Ordering::SeqCst) {
        return StdExitCode::from(ExitCode::Terminated as u8);
    }

    StdExitCode::from(i32::from(exit_code) as u8)
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Logs would interleave with the JSON document
    if json_output {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Run the analyser with the given arguments.
async fn run(args: Args, terminated: &AtomicBool) -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();

    let config = match ValidatedConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            let use_colors = !args.json && io::stderr().is_terminal();
            write_error(&mut stderr, &e.to_string(), use_colors);
            return ExitCode::StartupFailure;
        }
    };

    let use_colors = !config.json_output && io::stdout().is_terminal();

    debug!("Validated configuration: {:?}", config);
    info!("Repository path: {}", config.repo_path.display());
    info!("CODEOWNERS file: {}", config.codeowners_path.display());

    let codeowners_content = match tokio::fs::read_to_string(&config.codeowners_path).await {
        Ok(content) => content,
        Err(e) => {
            write_error(
                &mut stderr,
                &format!(
                    "Failed to read CODEOWNERS file '{}': {}",
                    config.codeowners_path.display(),
                    e
                ),
                use_colors,
            );
            return ExitCode::StartupFailure;
        }
    };

    let loaded = match config.load_rules(&codeowners_content) {
        Ok(loaded) => loaded,
        Err(ConfigError::InvalidCodeowners(issues)) => {
            write_error(&mut stderr, "Invalid CODEOWNERS file", use_colors);
            for issue in &issues {
                let _ = writeln!(stderr, "  {}", issue);
            }
            return ExitCode::StartupFailure;
        }
        Err(e) => {
            write_error(&mut stderr, &e.to_string(), use_colors);
            return ExitCode::StartupFailure;
        }
    };
    for issue in &loaded.issues {
        warn!("CODEOWNERS issue: {}", issue);
    }
    info!("Compiled {} rules", loaded.rules.len());

    if terminated.load(Ordering::SeqCst) {
        return ExitCode::Terminated;
    }

    let source = LocalSource::new(
        config.changed_files_path.clone(),
        config.snapshot_path.clone(),
    );
    let evaluation =
        match evaluate_from_source(&source, &loaded.rules, &config.evaluation_config).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                write_error(
                    &mut stderr,
                    &format!("Failed to load review data: {}", e),
                    use_colors,
                );
                return ExitCode::StartupFailure;
            }
        };

    for file in &evaluation.unowned {
        warn!("No code owner for {}", file);
    }
    debug!(
        "Evaluated {} rules, overall {}",
        evaluation.rules.len(),
        evaluation.overall
    );

    if terminated.load(Ordering::SeqCst) {
        return ExitCode::Terminated;
    }

    let written = if config.json_output {
        JsonOutput::new(&evaluation, &loaded.issues).write(&mut stdout)
    } else {
        HumanOutput::new(&mut stdout, use_colors).write_evaluation(&evaluation, &loaded.issues)
    };
    if let Err(e) = written {
        error!("Failed to write output: {}", e);
        return ExitCode::StartupFailure;
    }

    config.exit_code_for(&evaluation)
}

/// Write an error message to the writer.
fn write_error<W: Write>(writer: &mut W, message: &str, use_colors: bool) {
    let _ = HumanOutput::new(writer, use_colors).write_error(message);
}
