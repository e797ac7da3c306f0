//! Avatar species catalog.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::CatalogError;
use crate::de::{int_from_value, int_or_string, parse_int};

const CATALOG: &str = "avatar";

/// One avatar species definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarEntry {
    name: String,
    def_id: i64,
    actor_class_def_id: i64,
    info: Map<String, Value>,
}

impl AvatarEntry {
    /// The semantic species name, e.g. `"Kitsune"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The species' look definition id.
    pub fn def_id(&self) -> i64 {
        self.def_id
    }

    /// The actor class id species-unlock records are keyed by.
    pub fn actor_class_def_id(&self) -> i64 {
        self.actor_class_def_id
    }

    /// The default look `info` block copied into new look slots.
    pub fn info(&self) -> &Map<String, Value> {
        &self.info
    }
}

#[derive(Deserialize)]
struct AvatarFile {
    #[serde(rename = "Avatars")]
    avatars: BTreeMap<String, RawAvatar>,
}

#[derive(Deserialize)]
struct RawAvatar {
    #[serde(rename = "defId", deserialize_with = "int_or_string")]
    def_id: i64,
    #[serde(default)]
    info: Map<String, Value>,
}

/// Species lookup by name or by definition id.
#[derive(Debug, Clone, Default)]
pub struct AvatarCatalog {
    entries: Vec<AvatarEntry>,
    by_name: HashMap<String, usize>,
    by_def_id: HashMap<i64, usize>,
}

impl AvatarCatalog {
    /// Parses an `avatarhelper.json` payload.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: AvatarFile = serde_json::from_str(json)
            .map_err(|source| CatalogError::Parse { catalog: CATALOG, source })?;

        let mut catalog = Self::default();
        for (name, raw) in file.avatars {
            let actor_class_def_id = raw
                .info
                .get("actorClassDefID")
                .and_then(int_from_value)
                .ok_or_else(|| CatalogError::InvalidEntry {
                    catalog: CATALOG,
                    key: name.clone(),
                    reason: "missing or non-numeric info.actorClassDefID".into(),
                })?;

            let index = catalog.entries.len();
            catalog.by_name.insert(name.clone(), index);
            catalog.by_def_id.entry(raw.def_id).or_insert(index);
            catalog.entries.push(AvatarEntry {
                name,
                def_id: raw.def_id,
                actor_class_def_id,
                info: raw.info,
            });
        }

        tracing::debug!(species = catalog.entries.len(), "avatar catalog loaded");
        Ok(catalog)
    }

    /// Resolves a species by semantic name or by its definition id
    /// written as text. A numeric definition id wins over a name.
    pub fn resolve(&self, name_or_def_id: &str) -> Option<&AvatarEntry> {
        parse_int(name_or_def_id)
            .and_then(|def_id| self.by_def_id(def_id))
            .or_else(|| {
                self.by_name
                    .get(name_or_def_id)
                    .map(|&index| &self.entries[index])
            })
    }

    /// Looks up a species by its definition id.
    pub fn by_def_id(&self, def_id: i64) -> Option<&AvatarEntry> {
        self.by_def_id.get(&def_id).map(|&index| &self.entries[index])
    }

    /// Returns the definition id for a name or numeric id.
    pub fn def_id_of(&self, name_or_def_id: &str) -> Option<i64> {
        self.resolve(name_or_def_id).map(AvatarEntry::def_id)
    }

    /// Iterates every species in name order.
    pub fn iter(&self) -> impl Iterator<Item = &AvatarEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
