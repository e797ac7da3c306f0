//! Definition catalogs for feralhost.
//!
//! The game ships reference tables that map item definition ids to the
//! default data new inventory records are built from. This crate loads
//! them once at startup; after that they are immutable and shared
//! behind an `Arc`.
//!
//! # Key types
//!
//! - [`AvatarCatalog`]: species by name or definition id, with the look
//!   `info` block and actor class id
//! - [`ClothingCatalog`]: default `Colorable` template per clothing item
//! - [`DyeCatalog`]: display HSV value per dye
//! - [`Catalogs`]: the three together, loaded from a directory
//!
//! A lookup miss is never an error. Callers treat `None` as "skip this
//! step".

mod avatar;
mod clothing;
pub mod de;
mod dye;
mod error;

pub use avatar::{AvatarCatalog, AvatarEntry};
pub use clothing::ClothingCatalog;
pub use dye::DyeCatalog;
pub use error::CatalogError;

use std::path::Path;

/// Definition id of the house every sanctuary starts with.
pub const DEFAULT_HOUSE_DEF_ID: i64 = 2694;

/// Definition id of the island every sanctuary starts with.
pub const DEFAULT_ISLAND_DEF_ID: i64 = 2695;

/// Definition id of a sanctuary look record.
pub const SANCTUARY_LOOK_DEF_ID: i64 = 9625;

/// Class inventory id written into every sanctuary look.
pub const SANCTUARY_CLASS_INV_ID: &str = "4eebb7c5-40ad-42c7-ae66-b9c1c996a920";

/// File names [`Catalogs::load_dir`] reads.
pub const AVATAR_FILE: &str = "avatarhelper.json";
pub const CLOTHING_FILE: &str = "clothinghelper.json";
pub const DYE_FILE: &str = "dyehelper.json";

/// All reference catalogs.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub avatars: AvatarCatalog,
    pub clothing: ClothingCatalog,
    pub dyes: DyeCatalog,
}

impl Catalogs {
    /// Catalogs with no entries. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds all three catalogs from in-memory JSON payloads.
    pub fn from_json(avatars: &str, clothing: &str, dyes: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            avatars: AvatarCatalog::from_json(avatars)?,
            clothing: ClothingCatalog::from_json(clothing)?,
            dyes: DyeCatalog::from_json(dyes)?,
        })
    }

    /// Loads `avatarhelper.json`, `clothinghelper.json` and
    /// `dyehelper.json` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
        };

        let catalogs = Self::from_json(&read(AVATAR_FILE)?, &read(CLOTHING_FILE)?, &read(DYE_FILE)?)?;
        tracing::info!(
            dir = %dir.display(),
            species = catalogs.avatars.len(),
            clothing = catalogs.clothing.len(),
            dyes = catalogs.dyes.len(),
            "definition catalogs loaded"
        );
        Ok(catalogs)
    }
}
