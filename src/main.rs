//! Terminal front end and entry point.
//!
//! This binary is the thin integration layer between the Wayfinder library
//! and a line-oriented terminal. It reads commands from stdin, feeds them to
//! the coordinator and hands the resulting actions to the service worker.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────┐
//! │        Runtime loop           │
//! │  stdin ──► parse_command      │
//! │              │                │
//! │              ▼                │
//! │  ┌─────────────────────────┐  │
//! │  │ handle_event (AppState) │  │  ← pure decisions
//! │  └─────────────────────────┘  │
//! │              │ actions        │
//! │              ▼                │
//! │  ┌─────────────────────────┐  │
//! │  │     ServiceWorker       │  │  ← HTTP, timers, tracking
//! │  └─────────────────────────┘  │
//! │              │ events         │
//! │              └──────► loop    │
//! └───────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```text
//! wayfinder [CONFIG.toml] [--set key=value]... [--no-color]
//! ```
//!
//! Overrides take precedence over the file. Logs go to `wayfinder.log` in the
//! data directory; stdout belongs to the session.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::collections::BTreeMap;
use std::io::Stdout;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use wayfinder::app::{handle_event, AppState, Event};
use wayfinder::services::ManualGeolocation;
use wayfinder::ui::{parse_command, Command, TerminalSurface, Theme, HELP};
use wayfinder::worker::ServiceWorker;
use wayfinder::Config;

/// Session wrapper.
///
/// Wraps the library's `AppState` with the terminal and the worker that
/// carries out its actions.
struct Session {
    app: AppState,
    worker: ServiceWorker,
    surface: TerminalSurface<Stdout>,
    geolocation: ManualGeolocation,
}

impl Session {
    /// Runs one event through the coordinator and executes every action.
    fn dispatch(&mut self, event: &Event) {
        let actions = handle_event(&mut self.app, event);
        tracing::debug!(
            action_count = actions.len(),
            phase = ?self.app.phase(),
            "event handled"
        );
        for action in actions {
            self.worker.execute(action, &mut self.surface);
        }
    }

    /// Handles one stdin line.
    ///
    /// # Returns
    ///
    /// `false` when the session should end.
    fn on_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Ok(None) => true,
            Ok(Some(Command::Quit)) => false,
            Ok(Some(Command::Help)) => {
                self.surface.line(HELP);
                true
            }
            Ok(Some(Command::SetPosition(fix))) => {
                tracing::debug!(coordinate = %fix.coordinate, "manual position set");
                self.geolocation.set_fix(fix);
                self.dispatch(&Event::LocateRequested);
                true
            }
            Ok(Some(Command::FailPosition(kind))) => {
                tracing::debug!(error = %kind, "manual position disabled");
                self.geolocation.set_error(kind);
                self.dispatch(&Event::LocateRequested);
                true
            }
            Ok(Some(Command::Event(event))) => {
                self.dispatch(&event);
                true
            }
            Err(message) => {
                self.surface.line(&message);
                true
            }
        }
    }
}

/// Wayfinder - location, routing and place search in the terminal
#[derive(Parser, Debug)]
#[command(name = "wayfinder")]
#[command(version)]
#[command(about = "Location, routing and place search in the terminal", long_about = None)]
struct Args {
    /// TOML configuration file
    config: Option<PathBuf>,

    /// Override a configuration key (e.g. --set home=51.5007,-0.1246)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// Splits `key=value`, rejecting a missing `=` or an empty key.
fn parse_override(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

fn load_config(args: Args) -> wayfinder::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let overrides: BTreeMap<String, String> = args.overrides.into_iter().collect();
    config.apply_overrides(&overrides);
    if args.no_color {
        config.color = false;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let config = match load_config(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("wayfinder: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let log_file = wayfinder::observability::init_tracing(&config);

    let span = tracing::debug_span!("session_start");
    let guard = span.entered();
    tracing::debug!(log_file = ?log_file, "tracing initialized");

    let geolocation = ManualGeolocation::new(config.home_fix());
    let services = match wayfinder::build_services(&config, geolocation.clone()) {
        Ok(services) => services,
        Err(e) => {
            eprintln!("wayfinder: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let app = wayfinder::initialize(&config);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let theme = Theme::for_preference(app.theme);

    let mut session = Session {
        app,
        worker: ServiceWorker::new(services, events_tx),
        surface: TerminalSurface::new(std::io::stdout(), theme, config.color),
        geolocation,
    };
    drop(guard);

    session.surface.line("wayfinder ready. Type `help` for commands.");
    session.dispatch(&Event::Started);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !session.on_line(&line) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            },
            Some(event) = events_rx.recv() => session.dispatch(&event),
        }
    }

    tracing::debug!("session ended");
    std::process::ExitCode::SUCCESS
}
