pub mod components;
pub mod ledger_editor;
