//! Matrix TUI Entry Point
//!
//! Usage:
//!   matrix-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>    Config file (default: ~/.config/char-matrix/matrix.toml)
//!   -r, --route <PATH>     Page to open on start (default: /)
//!       --fps <FPS>        Override the frame rate
//!       --log-file <FILE>  Where logs go while the terminal is in use

use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matrix_core::{load_config, load_config_from_path, MatrixConfig};
use matrix_tui::App;

/// Character matrix terminal demo
#[derive(Parser, Debug)]
#[command(name = "matrix-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "MATRIX_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page to open on start
    #[arg(short, long, default_value = "/", value_name = "PATH")]
    route: String,

    /// Frames per second, overriding the config file
    #[arg(long, value_name = "FPS")]
    fps: Option<u32>,

    /// Log file; the terminal itself is busy drawing
    #[arg(long, default_value = "matrix-tui.log", value_name = "FILE")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args.log_file)?;

    let config = load(&args)?;
    tracing::info!(
        frame_rate = config.frame_rate,
        physics_hz = config.physics_hz,
        route = %args.route,
        "Starting matrix-tui"
    );

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: matrix-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or ssh ran without -t.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, &args.route).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "matrix-tui exited with an error");
    }
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: MatrixConfig,
    route: &str,
) -> anyhow::Result<()> {
    let mut app = App::new(config, route)?;
    app.run(terminal).await
}

/// Config file and environment, then CLI overrides
fn load(args: &Args) -> anyhow::Result<MatrixConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone()))?,
        None => load_config()?,
    };
    if let Some(fps) = args.fps {
        config.frame_rate = fps;
    }
    config.validate()?;
    Ok(config)
}

/// Send logs to a file so they never tear the drawn frame
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {path:?}"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("matrix_tui=info,matrix_core=warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}
