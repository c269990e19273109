//! Tabular I/O at the pipeline boundary: one load, one optional export.

/// CSV export of the current view.
pub mod export;
/// CSV loading and timestamp-index construction.
pub mod load;

pub use export::{export_csv, write_csv};
pub use load::{SYNTHETIC_EPOCH, load_csv, read_csv};
