//! Core of the zoom task system.
//!
//! Project files are markdown with one `## Level N` section per zoom level
//! (0 = next 15 minutes .. 4 = life goals) and checkbox task lines. This crate
//! scans those files ([`scan`]), rolls them up per project ([`aggregate`]),
//! and edits single task lines in place ([`mutate`]).

pub mod aggregate;
pub mod analysis;
pub mod changes;
pub mod config;
pub mod error;
pub mod io;
pub mod mutate;
pub mod paths;
pub mod project;
pub mod scan;
pub mod storage;
pub mod task;
pub mod types;

pub use error::{Result, ZoomError};
pub use storage::{FsStorage, Listing, Storage};
pub use types::Level;
