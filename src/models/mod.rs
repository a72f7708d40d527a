mod line_item;
mod snapshot_item;

pub use line_item::{LineItem, RowId};
pub use snapshot_item::SnapshotItem;
