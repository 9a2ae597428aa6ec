//! # folio-components
//!
//! Page-level Leptos components: the portfolio layout and the skills panel.

pub mod keywords;
pub mod portfolio;

pub use keywords::*;
pub use portfolio::*;
