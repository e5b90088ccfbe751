mod api;
mod app;
mod cli;
mod config;
mod models;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::HttpApi;
use crate::app::Controller;
use crate::cli::Args;
use crate::config::Config;
use crate::ui::picker::{PickerAction, PickerState, render_picker, handle_input};

/// Logs go to a file since the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::init(&args)?;
    init_logging(&config)?;
    info!(api = %config.api_base_url(), "Starting property picker");

    // Build the API client and controller
    let api = HttpApi::new(&config)?;
    let mut controller = Controller::new(Arc::new(api));

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Fetch the project list once at startup
    controller.load_projects();

    let result = run_app(&mut terminal, &mut controller).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!("Exiting after error: {:#}", err);
        println!("Error: {}", err);
    }

    let pending = controller.pending();
    if pending > 0 {
        info!(pending, "Exiting with requests still in flight");
    }

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, controller: &mut Controller) -> Result<()> {
    let mut picker = PickerState::default();

    loop {
        // Apply finished requests before drawing
        controller.drain();
        picker.sync(controller.state());

        // Render current screen
        terminal.draw(|f| render_picker(f, controller.state(), &mut picker))?;

        // Handle input
        match handle_input(&mut picker, controller.state())? {
            Some(PickerAction::Quit) => break,
            Some(PickerAction::Choose(value)) => controller.select_project(&value),
            Some(PickerAction::Add(property)) => controller.add_property(property),
            None => {}
        }
    }

    Ok(())
}
