//! finchart — market chart and indicator engine for a finance dashboard.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`], CLI in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
