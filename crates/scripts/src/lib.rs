//! Shared plumbing for the one-shot maintenance binaries.
//!
//! Each binary loads `.env`, initialises tracing, connects to the database
//! through [`bootstrap`], logs progress as it goes and prints a summary at
//! the end. Binaries that modify data refuse to run unless
//! `CONFIRM_MIGRATION=true` is set.

pub mod bootstrap;
pub mod legacy;
