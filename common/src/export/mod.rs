//! Export core modules shared by the CLI and renderer backends.

pub mod pdf_core;
