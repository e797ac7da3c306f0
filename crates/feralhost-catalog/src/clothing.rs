//! Clothing catalog: default `Colorable` templates per definition id.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::CatalogError;
use crate::de::parse_int;

const CATALOG: &str = "clothing";

#[derive(Deserialize)]
struct ClothingFile {
    #[serde(rename = "Clothing")]
    clothing: BTreeMap<String, Map<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct ClothingCatalog {
    templates: HashMap<i64, Map<String, Value>>,
}

impl ClothingCatalog {
    /// Parses a `clothinghelper.json` payload.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: ClothingFile = serde_json::from_str(json)
            .map_err(|source| CatalogError::Parse { catalog: CATALOG, source })?;

        let mut templates = HashMap::with_capacity(file.clothing.len());
        for (key, template) in file.clothing {
            let def_id = parse_int(&key).ok_or_else(|| CatalogError::InvalidEntry {
                catalog: CATALOG,
                key: key.clone(),
                reason: "key is not a definition id".into(),
            })?;
            templates.insert(def_id, template);
        }

        tracing::debug!(items = templates.len(), "clothing catalog loaded");
        Ok(Self { templates })
    }

    /// Returns the `Colorable` template for a clothing item.
    pub fn get(&self, def_id: i64) -> Option<&Map<String, Value>> {
        self.templates.get(&def_id)
    }

    pub fn contains(&self, def_id: i64) -> bool {
        self.templates.contains_key(&def_id)
    }

    /// Returns the default HSV string of one color channel, read from
    /// `color<channel>HSV._hsv` in the template.
    pub fn default_channel_hsv(&self, def_id: i64, channel: u32) -> Option<&str> {
        self.get(def_id)?
            .get(&format!("color{channel}HSV"))?
            .get("_hsv")?
            .as_str()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Clothing": {
            "8661": {"color1HSV": {"_hsv": "0.1,0.2,0.3"}, "color2HSV": {"_hsv": "0.4,0.5,0.6"}}
        }
    }"#;

    #[test]
    fn test_get_returns_template() {
        let catalog = ClothingCatalog::from_json(SAMPLE).unwrap();
        let template = catalog.get(8661).expect("template");
        assert!(template.contains_key("color1HSV"));
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn test_default_channel_hsv_reads_channel() {
        let catalog = ClothingCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.default_channel_hsv(8661, 2), Some("0.4,0.5,0.6"));
    }

    #[test]
    fn test_default_channel_hsv_missing_channel_is_none() {
        let catalog = ClothingCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.default_channel_hsv(8661, 3), None);
        assert_eq!(catalog.default_channel_hsv(42, 1), None);
    }

    #[test]
    fn test_from_json_non_numeric_key_fails() {
        let json = r#"{"Clothing": {"hat": {}}}"#;
        assert!(matches!(
            ClothingCatalog::from_json(json),
            Err(CatalogError::InvalidEntry { .. })
        ));
    }
}
