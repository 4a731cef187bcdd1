//! Listing CSV export/import library
//!
//! This library provides the data-transformation core behind the back office's
//! CSV export and import: a lenient CSV codec with formula-injection guarding,
//! and a serializer that turns listing media into CSV columns and back.
//! The `validator` and `rebase` modules build file-level tooling on top.

pub mod cli;
pub mod config;
pub mod csv_codec;
pub mod error;
pub mod media;
pub mod rebase;
pub mod util;
pub mod validator;
