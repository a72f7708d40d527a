use serde::{Deserialize, Serialize};

/// A validated line as it is posted with the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}
