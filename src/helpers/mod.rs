//! Helper functions shared by the generator and the server
//!
//! URL building, listing pagination and date display.

mod date;
mod pagination;
mod url;

pub use date::*;
pub use pagination::*;
pub use url::*;
