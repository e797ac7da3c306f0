//! Item records, per-category documents and the player inventory.

use std::collections::BTreeMap;
use std::fmt;

use feralhost_catalog::de::int_or_string;
use serde::{Deserialize, Serialize};

use crate::component::ComponentBag;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The inventory categories the server mutates.
///
/// Documents under any other key are loaded and saved untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `"1"`: unlocked species, keyed by actor class id.
    Species,
    /// `"2"`: body mods and wings.
    AvatarParts,
    /// `"5"`: house instances.
    Houses,
    /// `"6"`: island instances.
    Islands,
    /// `"100"`: clothing items.
    Clothing,
    /// `"111"`: dye stacks.
    Dyes,
    /// `"201"`: sanctuary looks.
    SanctuaryLooks,
    /// `"avatars"`: avatar look slots.
    Avatars,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Species,
        Category::AvatarParts,
        Category::Houses,
        Category::Islands,
        Category::Clothing,
        Category::Dyes,
        Category::SanctuaryLooks,
        Category::Avatars,
    ];

    /// The document key this category is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Category::Species => "1",
            Category::AvatarParts => "2",
            Category::Houses => "5",
            Category::Islands => "6",
            Category::Clothing => "100",
            Category::Dyes => "111",
            Category::SanctuaryLooks => "201",
            Category::Avatars => "avatars",
        }
    }

    /// The `type` code written into every record of this category.
    pub fn type_code(self) -> i64 {
        match self {
            Category::Species => 1,
            Category::AvatarParts => 2,
            Category::Houses => 5,
            Category::Islands => 6,
            Category::Clothing => 100,
            Category::Dyes => 111,
            Category::SanctuaryLooks => 201,
            Category::Avatars => 200,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// ItemRecord
// ---------------------------------------------------------------------------

/// One inventory item.
///
/// Older saves wrote species unlocks with a string `defID`; that form is
/// read as an alias and always written back as an integer `defId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    #[serde(rename = "defId", alias = "defID", deserialize_with = "int_or_string")]
    pub def_id: i64,
    #[serde(rename = "type")]
    pub type_code: i64,
    #[serde(default)]
    pub components: ComponentBag,
}

impl ItemRecord {
    /// Creates a record for `category` with no components.
    pub fn new(id: impl Into<String>, def_id: i64, category: Category) -> Self {
        Self {
            id: id.into(),
            def_id,
            type_code: category.type_code(),
            components: ComponentBag::new(),
        }
    }

    pub fn with_components(mut self, components: ComponentBag) -> Self {
        self.components = components;
        self
    }
}

// ---------------------------------------------------------------------------
// InventoryDocument
// ---------------------------------------------------------------------------

/// The ordered records of one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryDocument(Vec<ItemRecord>);

impl InventoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.0
    }

    pub fn records_mut(&mut self) -> &mut [ItemRecord] {
        &mut self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.0.iter().any(|r| r.id == id)
    }

    pub fn contains_def(&self, def_id: i64) -> bool {
        self.0.iter().any(|r| r.def_id == def_id)
    }

    pub fn find(&self, id: &str) -> Option<&ItemRecord> {
        self.0.iter().find(|r| r.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ItemRecord> {
        self.0.iter_mut().find(|r| r.id == id)
    }

    /// Returns the first record with the given definition id.
    pub fn find_by_def(&self, def_id: i64) -> Option<&ItemRecord> {
        self.0.iter().find(|r| r.def_id == def_id)
    }

    pub fn find_by_def_mut(&mut self, def_id: i64) -> Option<&mut ItemRecord> {
        self.0.iter_mut().find(|r| r.def_id == def_id)
    }

    pub fn count_def(&self, def_id: i64) -> usize {
        self.0.iter().filter(|r| r.def_id == def_id).count()
    }

    /// Distinct definition ids in first-seen order.
    pub fn distinct_defs(&self) -> Vec<i64> {
        let mut defs = Vec::new();
        for record in &self.0 {
            if !defs.contains(&record.def_id) {
                defs.push(record.def_id);
            }
        }
        defs
    }

    pub fn push(&mut self, record: ItemRecord) {
        self.0.push(record);
    }

    /// Removes the record with the given id.
    pub fn remove(&mut self, id: &str) -> Option<ItemRecord> {
        let index = self.0.iter().position(|r| r.id == id)?;
        Some(self.0.remove(index))
    }

    /// Removes the first record with the given definition id.
    pub fn remove_by_def(&mut self, def_id: i64) -> Option<ItemRecord> {
        let index = self.0.iter().position(|r| r.def_id == def_id)?;
        Some(self.0.remove(index))
    }
}

impl From<Vec<ItemRecord>> for InventoryDocument {
    fn from(records: Vec<ItemRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a InventoryDocument {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// PlayerInventory
// ---------------------------------------------------------------------------

/// Every document a player owns, keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerInventory(BTreeMap<String, InventoryDocument>);

impl PlayerInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    /// Reads a document without creating it.
    pub fn get(&self, category: &str) -> Option<&InventoryDocument> {
        self.0.get(category)
    }

    /// Returns the document, creating an empty one if it doesn't exist.
    pub fn get_or_create(&mut self, category: &str) -> &mut InventoryDocument {
        self.0.entry(category.to_string()).or_default()
    }

    pub fn insert(&mut self, category: impl Into<String>, document: InventoryDocument) {
        self.0.insert(category.into(), document);
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
