mod config;
mod invoice_gen;
mod ledger;
mod logging;
mod models;
mod ui;

use std::fs;
use std::io;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::invoice_gen::InvoicePreview;
use crate::ledger::snapshot::Submission;
use crate::ledger::ItemLedger;
use crate::ui::ledger_editor::{
    handle_input as handle_ledger_input, render_ledger_editor, LedgerEditorAction,
    LedgerEditorState,
};

/// Edit invoice line items and submit them as a JSON payload
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Write the submitted payload here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Also write a Markdown preview of the submitted invoice
    #[arg(short, long)]
    preview: Option<String>,

    /// Log to this file (overrides INVOICE_EDITOR_LOG_FILE)
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = config::init()?.with_log_file(args.log_file.clone());
    logging::init(&config)?;
    info!("starting invoice editor session");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = LedgerEditorState::new(ItemLedger::new());

    let result = run_app(&mut terminal, &mut state);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result? {
        Some(submission) => deliver(&args, &submission)?,
        None => {
            info!("session closed without submitting");
            println!("No invoice submitted.");
        }
    }

    Ok(())
}

/// Runs until the user quits (`None`) or a submission clears the gate.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut LedgerEditorState,
) -> Result<Option<Submission>> {
    loop {
        terminal.draw(|f| render_ledger_editor(f, state))?;

        match handle_ledger_input(state)? {
            Some(LedgerEditorAction::Quit) => return Ok(None),
            Some(LedgerEditorAction::Submit(submission)) => return Ok(Some(submission)),
            None => {}
        }
    }
}

fn deliver(args: &Args, submission: &Submission) -> Result<()> {
    match &args.output {
        Some(path) => {
            fs::write(path, &submission.payload)?;
            info!(path = %path, "payload written");
        }
        None => println!("{}", submission.payload),
    }

    if let Some(path) = &args.preview {
        let preview = InvoicePreview::new(path)?;
        let written = preview.generate(&submission.snapshot, Local::now().date_naive())?;
        info!(path = %written, "preview written");
    }

    eprintln!(
        "Submitted {} item(s): {} (total {})",
        submission.snapshot.len(),
        submission.snapshot.summary(),
        ledger::compute::format_currency(submission.snapshot.total()),
    );

    Ok(())
}
