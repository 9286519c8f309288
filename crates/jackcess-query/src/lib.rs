//! Reconstructs human-readable Access SQL from the denormalized row
//! records stored in a database's `MSysQueries` system table.

pub mod dispatch;
pub mod error;
pub mod join;
pub mod param;
pub mod quoting;
pub mod row;
mod variant;

pub use dispatch::{reconstruct, ObjectFlag, QueryKind, QueryResult};
pub use error::QueryError;
pub use row::{Attribute, Row};
