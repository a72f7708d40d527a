pub mod field_input;
