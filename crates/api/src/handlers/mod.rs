//! HTTP handlers, one module per resource.

pub mod listings;
pub mod reference;
pub mod tokens;
pub mod users;
