//! Field formatting and derived financial figures.
//!
//! Everything here is pure: raw keystrokes in, normalized values out, and the
//! buy-and-hold coverage figures computed from their inputs on every call.

pub mod common;
pub mod coverage;
pub mod formatting;

pub use coverage::{CashFlowInputs, CoverageResult, calculate_coverage};
pub use formatting::{
    display_amount, format_amount, format_currency_input, format_file_size, parse_currency_input,
    parse_number,
};
