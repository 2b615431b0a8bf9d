//! Core models, database loading and password statistics for keestats.
//!
//! This crate provides the vault document model, KeePass loading and the
//! statistics engine used by the TUI frontend.

pub mod database;
pub mod models;
pub mod stats;
pub mod vault;

pub use database::KeepassDatabase;
pub use models::{fields, Entry, EntryId, Group, GroupId};
pub use stats::{
    compute_stats, ExtendedStatItem, GroupStats, StatComputer, StatItem, StatKind, StatsError,
    SHORTEST_SEED,
};
pub use vault::{Entries, GroupRef, Vault};
