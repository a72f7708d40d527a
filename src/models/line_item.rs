use std::fmt;

use crate::ledger::compute;

/// Identifier handed out by a ledger's counter. Stable for the row's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// One editable invoice line. Quantity and price are kept as typed; `line_total`
/// is only ever written by the ledger's recompute step.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub(crate) id: RowId,
    pub(crate) name: String,
    pub(crate) quantity: String,
    pub(crate) unit_price: String,
    pub(crate) line_total: f64,
}

impl LineItem {
    pub(crate) fn new(id: RowId, quantity: &str) -> Self {
        Self {
            id,
            name: String::new(),
            quantity: quantity.to_string(),
            unit_price: String::new(),
            line_total: 0.0,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn unit_price(&self) -> &str {
        &self.unit_price
    }

    pub fn line_total(&self) -> f64 {
        self.line_total
    }

    pub fn line_total_display(&self) -> String {
        compute::format_currency(self.line_total)
    }
}
