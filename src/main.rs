//! BLOCKFALL - a falling-block puzzle game for the terminal
//!
//! The binary is a thin shell around the engine in the `blockfall` library:
//! it maps keys to commands, feeds elapsed time to gravity and draws the state.

mod input;
mod settings;
mod ui;

use blockfall::game::{Game, GameEvent};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::{Action, KeyBindings};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

#[derive(Debug, Parser)]
#[command(name = "blockfall")]
#[command(about = "A falling-block puzzle game for the terminal")]
struct Options {
    /// Fix the piece sequence; overrides the seed in the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Print the default config file and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

/// Get the blockfall temp directory, creating it if needed
fn temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let options = Options::parse();
    if options.print_config {
        let text = Settings::default()
            .to_toml()
            .map_err(io::Error::other)?;
        print!("{}", text);
        return Ok(());
    }

    let session_id: u32 = rand::random();

    // Log to a file; the terminal belongs to the game
    let log_dir = temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let seed = options.seed.or(settings.gameplay.seed).unwrap_or_else(rand::random);
    tracing::info!(seed, "piece sequence seeded");

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut game = Game::with_seed(seed);
    let result = run_app(&mut terminal, &mut game, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!("exiting with error: {}", e);
    }

    let stats = game.state().stats();
    println!("\nThanks for playing BLOCKFALL!");
    println!("Final Score: {}", stats.score);
    println!("Level: {} | Lines: {}", stats.level + 1, stats.lines);
    println!("Seed: {}", seed);

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    settings: &Settings,
) -> io::Result<()> {
    let keys = KeyBindings::from_settings(settings);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render_game(frame, game.state(), &settings.visual))?;

        // Wake up for input, for the next gravity tick, or for the next frame
        let timeout = game
            .until_next_tick()
            .map_or(FRAME_DURATION, |tick| tick.min(FRAME_DURATION));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match keys.action_for(key) {
                        Some(Action::Quit) => {
                            tracing::info!("quit requested");
                            return Ok(());
                        }
                        Some(Action::Game(command)) => {
                            tracing::trace!(?command, "input");
                            log_events(&game.apply(command));
                        }
                        None => {}
                    }
                }
            }
        }

        let now = Instant::now();
        log_events(&game.advance(now - last_frame));
        last_frame = now;
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        tracing::trace!(?event, "event");
    }
}
