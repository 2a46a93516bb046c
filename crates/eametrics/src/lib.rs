//! Top-level facade crate for eametrics.
//!
//! Re-exports the core registry types and the exporter so users can depend on a single crate.

pub mod core {
    pub use eametrics_core::*;
}

pub mod exporter {
    pub use eametrics_exporter::*;
}
