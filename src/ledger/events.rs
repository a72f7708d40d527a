use crate::ledger::snapshot::{SubmitError, Submission};
use crate::models::RowId;

/// The editable fields a row exposes to the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Name,
    Quantity,
    UnitPrice,
}

impl RowField {
    pub fn next(self) -> Option<RowField> {
        match self {
            RowField::Name => Some(RowField::Quantity),
            RowField::Quantity => Some(RowField::UnitPrice),
            RowField::UnitPrice => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowField::Name => "Item/Service Name",
            RowField::Quantity => "Qty",
            RowField::UnitPrice => "Unit Price",
        }
    }
}

/// Input the host surface forwards to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    AddRequested,
    DeleteRequested(RowId),
    FieldChanged {
        id: RowId,
        field: RowField,
        value: String,
    },
    ResetRequested,
    SubmitRequested,
}

/// What the ledger did with an event, so the host knows what to redraw.
#[derive(Debug)]
pub enum EventOutcome {
    RowAdded(RowId),
    RowRemoved(RowId),
    RowUpdated(RowId),
    Reset(RowId),
    Submitted(Submission),
    Blocked(SubmitError),
    /// The event named a row that is no longer in the ledger.
    Ignored,
}
