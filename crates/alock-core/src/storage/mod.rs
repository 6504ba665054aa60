//! Persistence of the tree to a single encrypted file.
//!
//! - **envelope**: the fixed binary layout of a database file
//! - **database**: whole-file read/write operations
//! - **session**: the open/save lifecycle used by host applications

pub mod database;
pub mod envelope;
pub mod session;

pub use database::{
    inspect_database, read_database, read_database_with_format, write_database,
    write_database_with_format, DatabaseInfo,
};
pub use envelope::{Envelope, PayloadFormat};
pub use session::{Session, SessionState};
