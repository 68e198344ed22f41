pub mod state;
pub mod view;

use crate::action::Action;
use crate::client::ApiClient;
use crate::config;
use crate::logging;
use crate::worker;
use state::AppState;
use view::draw;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration};
use tracing::info;

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: tasktab");
        println!();
        println!(
            "Reads its settings from the config file (override with ${}).",
            config::CONFIG_ENV
        );
        println!("  ${}    API base url", config::URL_ENV);
        println!("  ${}  bearer token", config::TOKEN_ENV);
        println!("  ${}    log filter (default: info)", logging::LOG_ENV);
        return Ok(());
    }

    let log_path = logging::init_tracing()?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        let panic_path = logging::data_dir()
            .map(|d| d.join("tasktab_panic.log"))
            .unwrap_or_else(|| "tasktab_panic.log".into());
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(panic_path)
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    let cfg = match config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            let path_str = config::Config::get_path_string()
                .unwrap_or_else(|_| "[Could not determine config path]".to_string());
            eprintln!("Could not load config: {:#}", e);
            eprintln!("Please create a configuration file at:");
            eprintln!("  {}", path_str);
            eprintln!("\nMinimal example:\n  url = \"https://api.example.com\"\n  token = \"...\"");
            return Ok(());
        }
    };
    info!(url = %cfg.url, log = ?log_path, "starting tasktab");

    let client = ApiClient::from_config(&cfg).context("failed to set up the API client")?;

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let mut app_state = AppState::new(cfg.default_filter, &cfg.date_format);
    let (action_tx, mut event_rx, worker_handle) = worker::spawn(client);
    let _ = action_tx.send(app_state.store.start()).await;

    // --- 4. UI LOOP ---
    let result: Result<()> = async {
        loop {
            terminal.draw(|f| draw(f, &mut app_state))?;

            while let Ok(event) = event_rx.try_recv() {
                if let Some(action) = app_state.handle_event(event) {
                    let _ = action_tx.send(action).await;
                }
            }

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            match event::read()? {
                Event::Mouse(mouse_event) => match mouse_event.kind {
                    MouseEventKind::ScrollDown => app_state.next(),
                    MouseEventKind::ScrollUp => app_state.previous(),
                    _ => {}
                },
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match app_state.handle_key(key.code) {
                        Some(Action::Quit) => {
                            let _ = action_tx.send(Action::Quit).await;
                            break;
                        }
                        Some(action) => {
                            let _ = action_tx.send(action).await;
                        }
                        None => {}
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
    .await;

    // --- 5. TEARDOWN ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    drop(action_tx);
    let _ = worker_handle.await;
    info!("tasktab exited");
    result
}
