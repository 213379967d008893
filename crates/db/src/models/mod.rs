//! Row structs and DTOs.
//!
//! Each submodule contains `FromRow` structs matching the queries of its
//! repository, plus the input DTOs those repositories accept.

pub mod listing;
pub mod reference;
pub mod token;
pub mod user;
