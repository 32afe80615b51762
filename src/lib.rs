//! Rentrack library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where the ledger keeps its data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON file per key under the data directory
    #[default]
    File,
    /// Nothing survives exit
    Memory,
}
