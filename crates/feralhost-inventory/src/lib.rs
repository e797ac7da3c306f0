//! Player inventory documents for feralhost.
//!
//! A player's inventory is a set of JSON documents, one per category
//! (`"100"` clothing, `"111"` dyes, `"avatars"` look slots, ...). Each
//! document is an ordered list of item records, and each record carries
//! a bag of named components.
//!
//! # Key types
//!
//! - [`PlayerInventory`]: all documents of one player
//! - [`InventoryDocument`] / [`ItemRecord`]: one category and its items
//! - [`Component`] / [`ComponentBag`]: typed components with an opaque
//!   fallback for anything the server doesn't model
//! - [`InventoryAccessor`]: the domain operations plus dirty tracking
//! - [`InventoryStore`] / [`flush_dirty`]: the persistence seam

mod accessor;
pub mod component;
mod document;
mod error;
mod store;

pub use accessor::{DEFAULT_LOOK_SLOTS, InventoryAccessor};
pub use component::{Component, ComponentBag};
pub use document::{Category, InventoryDocument, ItemRecord, PlayerInventory};
pub use error::InventoryError;
pub use store::{InventoryStore, MemoryStore, flush_dirty};
