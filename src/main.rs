mod ai;
mod app;
mod config;
mod roulette;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "ruretto")]
#[command(version = "0.1.0")]
#[command(about = "A terminal lunch roulette — spin a wheel to pick where to eat")]
struct Args {
    /// Pick a winner without the TUI and print it as JSON
    #[arg(short, long)]
    pick: bool,

    /// Read the restaurant list from a file instead of the saved config
    #[arg(short, long)]
    list: Option<PathBuf>,

    /// Skip the AI comment for this run
    #[arg(long)]
    no_comment: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Handle CLI-only commands
    if args.pick {
        return pick_once(args.list);
    }

    // Run TUI
    run_tui(args).await
}

/// One-shot mode for scripts: load the list, roll a uniform winner, print
/// it as a JSON object.
fn pick_once(list_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();

    let text = match list_path {
        Some(path) => std::fs::read_to_string(&path)?,
        None => config.saved_list.clone(),
    };

    let palette = theme::wheel_palette(&config.palette);
    let entries = roulette::parse_entries(&text, &palette);

    if entries.len() < roulette::MIN_ENTRIES {
        anyhow::bail!("need at least two restaurants to pick from (found {})", entries.len());
    }

    let index = rand::rng().random_range(0..entries.len());
    let winner = &entries[index];

    let output = serde_json::json!({
        "name": winner.name,
        "color": theme::color_to_hex(winner.color),
        "index": index,
        "total": entries.len(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn run_tui(args: Args) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();

    // A file list drives this session only; the saved list is left alone
    let session_list = match &args.list {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, session_list, args.no_comment);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Short poll budget keeps the wheel animation smooth
        if event::poll(std::time::Duration::from_millis(33))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            break;
                        }
                        _ => {
                            if let Err(e) = app.handle_key(key) {
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    // The saved list is mirrored to disk on every edit; nothing left to flush
    Ok(())
}
