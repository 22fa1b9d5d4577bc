use clap::Parser;
use r2_cache_upload::cli::{run, Cli};
use r2_cache_upload_core::error::RunError;
use tracing::Level;

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    // Logs go to stderr so they never interleave with the prompts.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

#[cfg(unix)]
fn interrupt_listener() -> std::io::Result<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn interrupt_listener() -> std::io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}

/// Ctrl-C abandons the remaining uploads and exits cleanly.
///
/// The handler is registered before this returns, so an interrupt can never
/// fall through to the default disposition.
fn spawn_interrupt_watcher() {
    let mut interrupt = match interrupt_listener() {
        Ok(listener) => listener,
        Err(e) => {
            tracing::warn!(error = %e, "Could not install Ctrl-C handler");
            return;
        }
    };
    tokio::spawn(async move {
        if interrupt.recv().await.is_some() {
            tracing::warn!("Interrupted by user");
            println!("\n\nUpload cancelled by user.");
            std::process::exit(0);
        }
    });
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!("CLI application startup: tracing initialised");

    spawn_interrupt_watcher();

    let code = match run(cli).await {
        Ok(report) => {
            tracing::info!(failed = report.failed(), "CLI completed successfully");
            0
        }
        Err(e) => {
            // Pipeline aborts were already explained to the user by `run`.
            if e.downcast_ref::<RunError>().is_none() {
                println!("\nUnexpected error: {e:#}");
            }
            tracing::error!(error = %e, "CLI exited with error");
            1
        }
    };
    std::process::exit(code);
}
