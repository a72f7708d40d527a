use thiserror::Error;
use tracing::{info, warn};

use crate::ledger::ItemLedger;
use crate::ledger::compute::{grand_total, line_total, parse_amount};
use crate::models::SnapshotItem;

pub const NO_ITEMS_MESSAGE: &str = "Please add at least one item to the invoice.";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please add at least one item to the invoice.")]
    NoValidItems,
    #[error("failed to serialize invoice items: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The rows that passed validation, in display order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    items: Vec<SnapshotItem>,
}

impl Snapshot {
    pub fn items(&self) -> &[SnapshotItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> f64 {
        grand_total(self.items.iter().map(|item| item.total))
    }

    /// One-line description, e.g. `Widget (x3); Bolt (x10)`.
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{} (x{})", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// JSON array of `{name, quantity, unit_price, total}` objects.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }
}

/// A snapshot that cleared the gate, together with its serialized payload.
#[derive(Debug, Clone)]
pub struct Submission {
    pub snapshot: Snapshot,
    pub payload: String,
}

impl ItemLedger {
    /// Collect every row with a name, a positive quantity and a non-negative price.
    /// Totals are recomputed from the inputs rather than read from `line_total`.
    pub fn collect_valid_items(&self) -> Snapshot {
        let items = self
            .rows()
            .iter()
            .filter_map(|row| {
                let name = row.name().trim();
                let quantity = parse_amount(row.quantity());
                let unit_price = parse_amount(row.unit_price());

                if name.is_empty() || quantity <= 0.0 || unit_price < 0.0 {
                    return None;
                }

                Some(SnapshotItem {
                    name: name.to_string(),
                    quantity,
                    unit_price,
                    total: line_total(quantity, unit_price),
                })
            })
            .collect();

        Snapshot { items }
    }

    /// Gate the submission. Leaves the ledger untouched either way.
    pub fn submit(&self) -> Result<Submission, SubmitError> {
        let snapshot = self.collect_valid_items();
        if snapshot.is_empty() {
            warn!(rows = self.len(), "submission blocked: no valid items");
            return Err(SubmitError::NoValidItems);
        }

        let payload = snapshot.to_payload()?;
        info!(items = snapshot.len(), total = snapshot.total(), "invoice items submitted");

        Ok(Submission { snapshot, payload })
    }
}
