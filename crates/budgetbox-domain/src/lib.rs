//! budgetbox-domain
//!
//! Pure domain models (boxes, expenses, periods, application state).
//! No I/O, no clock, no storage. Only data types and money helpers.

pub mod budget_box;
pub mod money;
pub mod period;
pub mod state;

pub use budget_box::*;
pub use money::*;
pub use period::*;
pub use state::*;
