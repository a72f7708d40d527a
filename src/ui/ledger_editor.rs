use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::ledger::events::{EventOutcome, LedgerEvent, RowField};
use crate::ledger::snapshot::Submission;
use crate::ledger::ItemLedger;
use crate::models::{LineItem, RowId};
use crate::ui::components::field_input::FieldInputState;

// Whether keys move between rows or edit a field of the selected row
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EditorMode {
    Browse,
    Editing(RowField),
}

pub struct LedgerEditorState {
    ledger: ItemLedger,
    table_state: TableState,
    mode: EditorMode,
    input: FieldInputState,
    show_error: Option<String>,
}

pub enum LedgerEditorAction {
    Quit,
    Submit(Submission),
}

impl LedgerEditorState {
    pub fn new(ledger: ItemLedger) -> Self {
        let mut table_state = TableState::default();
        if !ledger.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            ledger,
            table_state,
            mode: EditorMode::Browse,
            input: FieldInputState::new(""),
            show_error: None,
        }
    }

    pub fn ledger(&self) -> &ItemLedger {
        &self.ledger
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.show_error.as_deref()
    }

    pub fn selected_row(&self) -> Option<&LineItem> {
        self.table_state
            .selected()
            .and_then(|i| self.ledger.rows().get(i))
    }

    pub fn selected_row_id(&self) -> Option<RowId> {
        self.selected_row().map(LineItem::id)
    }

    pub fn next(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Forward an event to the ledger and follow up on the host side.
    pub fn apply(&mut self, event: LedgerEvent) -> Option<LedgerEditorAction> {
        match self.ledger.dispatch(event) {
            EventOutcome::RowAdded(id) | EventOutcome::Reset(id) => {
                self.table_state.select(self.ledger.position(id));
            }
            EventOutcome::RowRemoved(_) => self.clamp_selection(),
            EventOutcome::RowUpdated(_) | EventOutcome::Ignored => {}
            EventOutcome::Submitted(submission) => {
                return Some(LedgerEditorAction::Submit(submission));
            }
            EventOutcome::Blocked(err) => {
                self.show_error = Some(err.to_string());
            }
        }

        None
    }

    pub fn begin_editing(&mut self) {
        if let Some(row) = self.selected_row() {
            let name = row.name().to_string();
            self.input.load(&name);
            self.mode = EditorMode::Editing(RowField::Name);
        }
    }

    /// Move Name -> Qty -> Unit Price, leaving edit mode after the price.
    pub fn advance_field(&mut self) {
        let EditorMode::Editing(field) = self.mode else {
            return;
        };

        let next = field.next().and_then(|next| {
            self.selected_row()
                .map(|row| (next, field_value(row, next).to_string()))
        });

        match next {
            Some((next, value)) => {
                self.input.load(&value);
                self.mode = EditorMode::Editing(next);
            }
            None => self.stop_editing(),
        }
    }

    pub fn stop_editing(&mut self) {
        self.mode = EditorMode::Browse;
        self.input.editing = false;
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        let EditorMode::Editing(field) = self.mode else {
            return;
        };
        let Some(id) = self.selected_row_id() else {
            self.stop_editing();
            return;
        };

        if self.input.handle_input(key) {
            let value = self.input.value.clone();
            self.apply(LedgerEvent::FieldChanged { id, field, value });
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }

        let selected = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(selected.min(len - 1)));
    }
}

fn field_value(row: &LineItem, field: RowField) -> &str {
    match field {
        RowField::Name => row.name(),
        RowField::Quantity => row.quantity(),
        RowField::UnitPrice => row.unit_price(),
    }
}

pub fn render_ledger_editor<B: Backend>(frame: &mut Frame<B>, state: &mut LedgerEditorState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3), // Title
                Constraint::Min(6),    // Items
                Constraint::Length(3), // Total
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new("Invoice Items")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_items(frame, state, chunks[1]);

    let total = Paragraph::new(Spans::from(vec![
        Span::raw("Total: "),
        Span::styled(
            state.ledger.grand_total_display(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(total, chunks[2]);

    let help_text = match state.mode {
        EditorMode::Browse => {
            "A - Add item | D - Delete selected | Enter - Edit selected | R - Reset | S - Submit | Esc - Quit"
        }
        EditorMode::Editing(_) => "Tab/Enter - Next field | Left/Right - Move cursor | Esc - Done",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);

    if let Some(error) = state.error() {
        let size = frame.size();
        render_error(frame, size, error);
    }
}

fn render_items<B: Backend>(frame: &mut Frame<B>, state: &mut LedgerEditorState, area: Rect) {
    let block = Block::default().title("Line Items").borders(Borders::ALL);

    if state.ledger.is_empty() {
        let empty = Paragraph::new("No items. Press A to add one or R to reset.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let editing_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let selected = state.table_state.selected();

    let rows = state
        .ledger
        .rows()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let editing_field = match state.mode {
                EditorMode::Editing(field) if selected == Some(i) => Some(field),
                _ => None,
            };

            let cell = |field: RowField| {
                if editing_field == Some(field) {
                    Cell::from(state.input.get_display_string()).style(editing_style)
                } else {
                    Cell::from(field_value(item, field).to_string())
                }
            };

            Row::new(vec![
                cell(RowField::Name),
                cell(RowField::Quantity),
                cell(RowField::UnitPrice),
                Cell::from(item.line_total_display()),
            ])
        })
        .collect::<Vec<_>>();

    let header = Row::new(vec![
        RowField::Name.label(),
        RowField::Quantity.label(),
        RowField::UnitPrice.label(),
        "Total",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Percentage(46),
        Constraint::Percentage(14),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows)
        .header(header)
        .block(block)
        .widths(&widths)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_error<B: Backend>(frame: &mut Frame<B>, size: Rect, error: &str) {
    let popup_area = centered_rect(60, 20, size);

    let error_msg = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(error),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().title("Invoice").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_msg, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_input(state: &mut LedgerEditorState) -> Result<Option<LedgerEditorAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key.code));
        }
    }

    Ok(None)
}

pub fn handle_key(state: &mut LedgerEditorState, key: KeyCode) -> Option<LedgerEditorAction> {
    // The validation popup swallows the next key
    if state.show_error.take().is_some() {
        return None;
    }

    if let EditorMode::Editing(_) = state.mode {
        match key {
            KeyCode::Esc => state.stop_editing(),
            KeyCode::Tab | KeyCode::Enter => state.advance_field(),
            _ => state.edit_current_field(key),
        }
        return None;
    }

    match key {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
            return Some(LedgerEditorAction::Quit);
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            return state.apply(LedgerEvent::AddRequested);
        }
        KeyCode::Char('d') | KeyCode::Char('D') => {
            if let Some(id) = state.selected_row_id() {
                return state.apply(LedgerEvent::DeleteRequested(id));
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            return state.apply(LedgerEvent::ResetRequested);
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            return state.apply(LedgerEvent::SubmitRequested);
        }
        KeyCode::Enter => state.begin_editing(),
        KeyCode::Up => state.previous(),
        KeyCode::Down => state.next(),
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::snapshot::NO_ITEMS_MESSAGE;

    fn type_text(state: &mut LedgerEditorState, text: &str) {
        for c in text.chars() {
            assert!(handle_key(state, KeyCode::Char(c)).is_none());
        }
    }

    fn clear_field(state: &mut LedgerEditorState) {
        for _ in 0..8 {
            handle_key(state, KeyCode::Backspace);
        }
    }

    fn fill_selected(state: &mut LedgerEditorState, name: &str, quantity: &str, price: &str) {
        handle_key(state, KeyCode::Enter);
        clear_field(state);
        type_text(state, name);
        handle_key(state, KeyCode::Tab);
        clear_field(state);
        type_text(state, quantity);
        handle_key(state, KeyCode::Tab);
        clear_field(state);
        type_text(state, price);
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn typing_updates_totals_live() {
        let mut state = LedgerEditorState::new(ItemLedger::new());

        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.mode(), EditorMode::Editing(RowField::Name));
        type_text(&mut state, "Widget");
        handle_key(&mut state, KeyCode::Tab);
        assert_eq!(state.mode(), EditorMode::Editing(RowField::Quantity));
        handle_key(&mut state, KeyCode::Backspace);
        type_text(&mut state, "3");
        handle_key(&mut state, KeyCode::Tab);
        type_text(&mut state, "2.5");
        assert_eq!(state.ledger().grand_total_display(), "$7.50");
        handle_key(&mut state, KeyCode::Enter);

        assert_eq!(state.mode(), EditorMode::Browse);
        let row = state.selected_row().unwrap();
        assert_eq!(row.name(), "Widget");
        assert_eq!(row.line_total_display(), "$7.50");
    }

    #[test]
    fn submit_without_valid_items_shows_blocking_message() {
        let mut state = LedgerEditorState::new(ItemLedger::new());

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.error(), Some(NO_ITEMS_MESSAGE));

        // dismissing the popup does not add a row
        assert!(handle_key(&mut state, KeyCode::Char('a')).is_none());
        assert_eq!(state.error(), None);
        assert_eq!(state.ledger().len(), 1);
    }

    #[test]
    fn submit_returns_the_payload() {
        let mut state = LedgerEditorState::new(ItemLedger::new());
        fill_selected(&mut state, "A", "2", "5.00");
        handle_key(&mut state, KeyCode::Char('a'));
        fill_selected(&mut state, "B", "1", "10.00");
        assert_eq!(state.ledger().grand_total_display(), "$20.00");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(LedgerEditorAction::Submit(submission)) => {
                assert_eq!(submission.snapshot.summary(), "A (x2); B (x1)");
                assert!(submission.payload.starts_with("[{\"name\":\"A\""));
            }
            _ => panic!("Expected a submission"),
        }
    }

    #[test]
    fn delete_and_add_keep_selection_in_range() {
        let mut state = LedgerEditorState::new(ItemLedger::new());
        handle_key(&mut state, KeyCode::Char('a'));
        handle_key(&mut state, KeyCode::Char('a'));
        assert_eq!(state.selected_row_id(), Some(RowId(3)));

        handle_key(&mut state, KeyCode::Char('d'));
        assert_eq!(state.selected_row_id(), Some(RowId(2)));

        handle_key(&mut state, KeyCode::Char('d'));
        handle_key(&mut state, KeyCode::Char('d'));
        assert!(state.ledger().is_empty());
        assert_eq!(state.selected_row_id(), None);

        // nothing to delete or edit
        handle_key(&mut state, KeyCode::Char('d'));
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.mode(), EditorMode::Browse);

        handle_key(&mut state, KeyCode::Char('a'));
        assert_eq!(state.selected_row_id(), Some(RowId(4)));
    }

    #[test]
    fn reset_key_restores_a_single_row() {
        let mut state = LedgerEditorState::new(ItemLedger::new());
        fill_selected(&mut state, "Widget", "3", "2.50");
        handle_key(&mut state, KeyCode::Char('a'));
        handle_key(&mut state, KeyCode::Char('a'));

        handle_key(&mut state, KeyCode::Char('r'));

        assert_eq!(state.ledger().len(), 1);
        assert_eq!(state.selected_row_id(), Some(RowId(1)));
        assert_eq!(state.ledger().grand_total_display(), "$0.00");
    }

    #[test]
    fn navigation_wraps_around() {
        let mut state = LedgerEditorState::new(ItemLedger::new());
        handle_key(&mut state, KeyCode::Char('a'));
        assert_eq!(state.selected_row_id(), Some(RowId(2)));

        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.selected_row_id(), Some(RowId(1)));
        handle_key(&mut state, KeyCode::Up);
        assert_eq!(state.selected_row_id(), Some(RowId(2)));
    }

    #[test]
    fn letters_are_text_while_editing() {
        let mut state = LedgerEditorState::new(ItemLedger::new());
        handle_key(&mut state, KeyCode::Enter);
        type_text(&mut state, "qasdr");

        assert_eq!(state.ledger().len(), 1);
        assert_eq!(state.selected_row().unwrap().name(), "qasdr");

        assert!(handle_key(&mut state, KeyCode::Esc).is_none());
        assert_eq!(state.mode(), EditorMode::Browse);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Esc),
            Some(LedgerEditorAction::Quit)
        ));
    }
}
