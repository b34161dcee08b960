//! HafizLy Core Library
//!
//! This crate provides the core functionality for HafizLy, a bookmarking
//! app for links tagged Public or Private. Link persistence lives in a
//! remote hosted table reached over HTTP; the only local state is
//! configuration and the private-links passcode.
//!
//! # Architecture
//!
//! - The remote table is the source of truth. The store keeps a full
//!   in-memory snapshot and re-fetches after every mutation instead of
//!   patching locally.
//! - Private links sit behind a passcode gate that is only unlocked for
//!   the life of the mounted screen.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let table = RemoteTable::new(url, &config.table, key)?;
//! let mut store = LinkStore::new(Arc::new(table));
//!
//! store.refresh().await?;
//! store.add(&LinkDraft::new("Docs", "", "https://example.com", true)).await?;
//! ```
//!
//! # Modules
//!
//! - `store`: the link store (main entry point)
//! - `models`: data structures for links and drafts
//! - `remote`: the hosted-table client and its backend trait
//! - `filter`: category and search filtering for screens
//! - `vault`: passcode storage and the private-access gate
//! - `config`: application configuration

pub mod config;
pub mod filter;
pub mod models;
pub mod remote;
pub mod store;
pub mod vault;

pub use config::Config;
pub use filter::{filter_links, matches_search, CategoryFilter};
pub use models::{Category, Link, LinkDraft, ValidLink, ValidationError};
pub use remote::{LinkBackend, RemoteTable, TableError};
pub use store::{LinkStore, StoreError};
pub use vault::{AccessGate, PasscodeVault, VaultError};
