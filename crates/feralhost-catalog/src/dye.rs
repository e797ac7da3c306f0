//! Dye catalog: display HSV value per dye definition id.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::CatalogError;
use crate::de::parse_int;

const CATALOG: &str = "dye";

#[derive(Deserialize)]
struct DyeFile {
    #[serde(rename = "Dyes")]
    dyes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct DyeCatalog {
    hsv: HashMap<i64, String>,
}

impl DyeCatalog {
    /// Parses a `dyehelper.json` payload.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: DyeFile = serde_json::from_str(json)
            .map_err(|source| CatalogError::Parse { catalog: CATALOG, source })?;

        let mut hsv = HashMap::with_capacity(file.dyes.len());
        for (key, value) in file.dyes {
            let def_id = parse_int(&key).ok_or_else(|| CatalogError::InvalidEntry {
                catalog: CATALOG,
                key: key.clone(),
                reason: "key is not a definition id".into(),
            })?;
            hsv.insert(def_id, value);
        }

        tracing::debug!(dyes = hsv.len(), "dye catalog loaded");
        Ok(Self { hsv })
    }

    /// Returns the HSV display value for a dye.
    pub fn hsv(&self, def_id: i64) -> Option<&str> {
        self.hsv.get(&def_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hsv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hsv.is_empty()
    }
}
