//! The in-memory item ledger: row lifecycle, derived totals and the
//! submission gate.

pub mod compute;
pub mod events;
pub mod snapshot;

use tracing::{debug, info};

use crate::models::{LineItem, RowId};
use events::{EventOutcome, LedgerEvent, RowField};

const FIRST_ROW_ID: u64 = 1;
const DEFAULT_QUANTITY: &str = "1";

pub struct ItemLedger {
    rows: Vec<LineItem>,
    next_id: u64,
    grand_total: f64,
}

impl ItemLedger {
    /// A new ledger always starts with one blank row.
    pub fn new() -> Self {
        let mut ledger = Self {
            rows: Vec::new(),
            next_id: FIRST_ROW_ID,
            grand_total: 0.0,
        };
        ledger.add_row();
        ledger
    }

    pub fn add_row(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;

        self.rows.push(LineItem::new(id, DEFAULT_QUANTITY));
        debug!(row = %id, "row added");

        self.recompute_grand_total();
        id
    }

    /// Remove a row. Unknown ids are ignored. The ledger may end up empty.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let Some(index) = self.position(id) else {
            debug!(row = %id, "remove ignored: no such row");
            return false;
        };

        self.rows.remove(index);
        debug!(row = %id, remaining = self.rows.len(), "row removed");

        self.recompute_grand_total();
        true
    }

    /// Drop every row, restart the id counter and add a single blank row.
    pub fn reset(&mut self) -> RowId {
        self.rows.clear();
        self.next_id = FIRST_ROW_ID;

        let id = self.add_row();
        self.recompute_grand_total();
        info!("ledger reset");
        id
    }

    pub fn set_name(&mut self, id: RowId, name: &str) -> bool {
        match self.row_mut(id) {
            Some(row) => {
                row.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_quantity(&mut self, id: RowId, quantity: &str) -> bool {
        match self.row_mut(id) {
            Some(row) => row.quantity = quantity.to_string(),
            None => return false,
        }
        self.recompute_row(id);
        true
    }

    pub fn set_unit_price(&mut self, id: RowId, unit_price: &str) -> bool {
        match self.row_mut(id) {
            Some(row) => row.unit_price = unit_price.to_string(),
            None => return false,
        }
        self.recompute_row(id);
        true
    }

    pub fn set_field(&mut self, id: RowId, field: RowField, value: &str) -> bool {
        match field {
            RowField::Name => self.set_name(id, value),
            RowField::Quantity => self.set_quantity(id, value),
            RowField::UnitPrice => self.set_unit_price(id, value),
        }
    }

    /// Refresh a row's `line_total` from its current inputs, then the grand total.
    pub fn recompute_row(&mut self, id: RowId) {
        let Some(row) = self.row_mut(id) else {
            return;
        };

        row.line_total = compute::line_total_from_input(&row.quantity, &row.unit_price);
        debug!(row = %id, line_total = row.line_total, "row recomputed");

        self.recompute_grand_total();
    }

    pub fn recompute_grand_total(&mut self) {
        self.grand_total = compute::grand_total(self.rows.iter().map(|row| row.line_total));
    }

    /// Apply one host event and report what changed.
    pub fn dispatch(&mut self, event: LedgerEvent) -> EventOutcome {
        match event {
            LedgerEvent::AddRequested => EventOutcome::RowAdded(self.add_row()),
            LedgerEvent::DeleteRequested(id) => {
                if self.remove_row(id) {
                    EventOutcome::RowRemoved(id)
                } else {
                    EventOutcome::Ignored
                }
            }
            LedgerEvent::FieldChanged { id, field, value } => {
                if self.set_field(id, field, &value) {
                    EventOutcome::RowUpdated(id)
                } else {
                    EventOutcome::Ignored
                }
            }
            LedgerEvent::ResetRequested => EventOutcome::Reset(self.reset()),
            LedgerEvent::SubmitRequested => match self.submit() {
                Ok(submission) => EventOutcome::Submitted(submission),
                Err(err) => EventOutcome::Blocked(err),
            },
        }
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&LineItem> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    pub fn grand_total_display(&self) -> String {
        compute::format_currency(self.grand_total)
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut LineItem> {
        self.rows.iter_mut().find(|row| row.id == id)
    }
}

impl Default for ItemLedger {
    fn default() -> Self {
        Self::new()
    }
}
