//! Domain operations over one player's inventory.
//!
//! An [`InventoryAccessor`] is owned by exactly one session. Every call
//! that creates, changes or deletes a record adds that record's category
//! to the dirty set; the persistence layer reads the set through
//! [`dirty_categories`](InventoryAccessor::dirty_categories), saves the
//! matching documents and then calls
//! [`acknowledge_flush`](InventoryAccessor::acknowledge_flush).
//!
//! Queries materialize an empty document for a category that doesn't
//! exist yet. The two exceptions are
//! [`is_species_unlocked`](InventoryAccessor::is_species_unlocked) and
//! [`sanctuary_look_count`](InventoryAccessor::sanctuary_look_count),
//! which answer `false` / `0` and leave the inventory alone.
//!
//! Catalog misses are not errors: the affected step is skipped and the
//! rest of the operation carries on.

use std::collections::BTreeSet;
use std::sync::Arc;

use feralhost_catalog::de::parse_int;
use feralhost_catalog::{
    AvatarEntry, Catalogs, DEFAULT_HOUSE_DEF_ID, DEFAULT_ISLAND_DEF_ID, SANCTUARY_CLASS_INV_ID,
    SANCTUARY_LOOK_DEF_ID,
};
use feralhost_protocol::name_uuid;
use serde_json::Map;
use uuid::Uuid;

use crate::component::{
    AvatarLook, Component, ComponentBag, House, Island, Name, PrimaryLook, Quantity,
    SanctuaryInfo, SanctuaryLook, Timestamp, Tradable,
};
use crate::document::{Category, InventoryDocument, ItemRecord, PlayerInventory};

/// Look slots granted with a species when the player has no other
/// species to copy the slot count from.
pub const DEFAULT_LOOK_SLOTS: usize = 12;

/// Stateful facade over a [`PlayerInventory`].
#[derive(Debug)]
pub struct InventoryAccessor {
    inventory: PlayerInventory,
    catalogs: Arc<Catalogs>,
    dirty: BTreeSet<String>,
}

impl InventoryAccessor {
    pub fn new(inventory: PlayerInventory, catalogs: Arc<Catalogs>) -> Self {
        Self {
            inventory,
            catalogs,
            dirty: BTreeSet::new(),
        }
    }

    /// Read-only view of the whole inventory. Does not materialize.
    pub fn inventory(&self) -> &PlayerInventory {
        &self.inventory
    }

    pub fn into_inventory(self) -> PlayerInventory {
        self.inventory
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    // -----------------------------------------------------------------------
    // Dirty tracking
    // -----------------------------------------------------------------------

    /// Categories changed since the last acknowledged flush, sorted.
    pub fn dirty_categories(&self) -> Vec<String> {
        self.dirty.iter().cloned().collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Clears the dirty set after the persistence layer saved it.
    pub fn acknowledge_flush(&mut self) {
        self.dirty.clear();
    }

    fn mark_dirty(&mut self, category: &str) {
        if !self.dirty.contains(category) {
            self.dirty.insert(category.to_string());
        }
    }

    /// Returns a category's document, creating it if missing.
    pub fn document(&mut self, category: &str) -> &InventoryDocument {
        self.inventory.get_or_create(category)
    }

    fn document_mut(&mut self, category: Category) -> &mut InventoryDocument {
        self.inventory.get_or_create(category.key())
    }

    // -----------------------------------------------------------------------
    // Generic lookups
    // -----------------------------------------------------------------------

    pub fn has_object(&mut self, category: &str, id: &str) -> bool {
        self.inventory.get_or_create(category).contains_id(id)
    }

    pub fn has_object_by_def(&mut self, category: &str, def_id: i64) -> bool {
        self.inventory.get_or_create(category).contains_def(def_id)
    }

    pub fn find_object(&mut self, category: &str, id: &str) -> Option<&ItemRecord> {
        self.inventory.get_or_create(category).find(id)
    }

    pub fn find_object_by_def(&mut self, category: &str, def_id: i64) -> Option<&ItemRecord> {
        self.inventory.get_or_create(category).find_by_def(def_id)
    }

    /// Adds a record to `category`, marks it dirty and returns its id.
    fn add_record(&mut self, category: Category, def_id: i64, components: ComponentBag) -> String {
        let document = self.document_mut(category);
        let id = fresh_id(document);
        document.push(ItemRecord::new(id.clone(), def_id, category).with_components(components));
        self.mark_dirty(category.key());
        id
    }

    // -----------------------------------------------------------------------
    // Species and look slots
    // -----------------------------------------------------------------------

    /// True if any look slot exists for the species. Never materializes
    /// the `avatars` document.
    pub fn is_species_unlocked(&self, name_or_def_id: &str) -> bool {
        let Some(avatars) = self.inventory.get(Category::Avatars.key()) else {
            return false;
        };
        let def_id = self
            .catalogs
            .avatars
            .def_id_of(name_or_def_id)
            .or_else(|| parse_int(name_or_def_id));
        def_id.is_some_and(|def_id| avatars.contains_def(def_id))
    }

    /// Unlocks a species by name or definition id.
    ///
    /// Creates one primary look slot plus as many extra slots as the
    /// player's first species has (twelve if it has none), and records
    /// the species' actor class in the species document.
    pub fn unlock_species(&mut self, name_or_def_id: &str) {
        if self.is_species_unlocked(name_or_def_id) {
            return;
        }
        let catalogs = Arc::clone(&self.catalogs);
        let Some(species) = catalogs.avatars.resolve(name_or_def_id) else {
            tracing::debug!(species = name_or_def_id, "unknown species, unlock skipped");
            return;
        };

        let avatars = self.document_mut(Category::Avatars);
        let slots = match avatars.iter().find(|r| r.components.is_primary_look()) {
            Some(primary) => avatars
                .iter()
                .filter(|r| !r.components.is_primary_look() && r.def_id == primary.def_id)
                .count(),
            None => 0,
        };
        let slots = if slots == 0 { DEFAULT_LOOK_SLOTS } else { slots };

        for index in 0..=slots {
            let id = fresh_id(avatars);
            avatars.push(look_slot(id, species, index == 0));
        }
        self.mark_dirty(Category::Avatars.key());

        let actor_class = species.actor_class_def_id();
        if !self.document_mut(Category::Species).contains_def(actor_class) {
            self.add_record(
                Category::Species,
                actor_class,
                ComponentBag::new().with("Timestamp", Component::Timestamp(Timestamp::now())),
            );
        }

        tracing::debug!(species = species.name(), slots = slots + 1, "species unlocked");
    }

    /// Gives every unlocked species one more (non-primary) look slot.
    pub fn add_extra_look_slot(&mut self) {
        let catalogs = Arc::clone(&self.catalogs);
        let avatars = self.document_mut(Category::Avatars);
        let primaries: Vec<i64> = avatars
            .iter()
            .filter(|r| r.components.is_primary_look())
            .map(|r| r.def_id)
            .collect();

        for def_id in primaries {
            let Some(species) = catalogs.avatars.by_def_id(def_id) else {
                tracing::debug!(def_id, "primary look has no catalog species, skipped");
                continue;
            };
            let id = fresh_id(avatars);
            avatars.push(look_slot(id, species, false));
        }
        self.mark_dirty(Category::Avatars.key());
    }

    // -----------------------------------------------------------------------
    // Dyes
    // -----------------------------------------------------------------------

    /// Index of the dye stack for `def_id`, creating an empty one.
    fn dye_stack(&mut self, def_id: i64) -> usize {
        let document = self.document_mut(Category::Dyes);
        if let Some(index) = document.iter().position(|r| r.def_id == def_id) {
            return index;
        }

        let components = ComponentBag::new()
            .with("Tradable", Component::Tradable(Tradable {
                is_in_trade_list: false,
                extra: Map::new(),
            }))
            .with("Quantity", Component::Quantity(Quantity {
                quantity: 0,
                extra: Map::new(),
            }))
            .with("Timestamp", Component::Timestamp(Timestamp::now()));
        document.push(
            ItemRecord::new(dye_id(def_id), def_id, Category::Dyes).with_components(components),
        );
        let index = document.len() - 1;
        self.mark_dirty(Category::Dyes.key());
        index
    }

    /// Adds one dye to its stack and returns the stack id.
    pub fn add_dye(&mut self, def_id: i64) -> String {
        let index = self.dye_stack(def_id);
        let document = self.document_mut(Category::Dyes);
        let record = &mut document.records_mut()[index];
        let quantity = record.components.quantity().saturating_add(1);
        record.components.set_quantity(quantity);
        let id = record.id.clone();
        self.mark_dirty(Category::Dyes.key());
        id
    }

    /// Takes one dye off its stack, deleting the stack when it empties.
    pub fn remove_dye(&mut self, def_id: i64) {
        let index = self.dye_stack(def_id);
        self.decrement_dye_at(index);
    }

    /// Same as [`remove_dye`](Self::remove_dye), addressed by stack id.
    /// Unknown ids are ignored.
    pub fn remove_dye_by_id(&mut self, id: &str) {
        let document = self.document_mut(Category::Dyes);
        if let Some(index) = document.iter().position(|r| r.id == id) {
            self.decrement_dye_at(index);
        }
    }

    fn decrement_dye_at(&mut self, index: usize) {
        let document = self.document_mut(Category::Dyes);
        let record = &mut document.records_mut()[index];
        let quantity = record.components.quantity().saturating_sub(1);
        if quantity <= 0 {
            let id = record.id.clone();
            document.remove(&id);
        } else {
            record.components.set_quantity(quantity);
        }
        self.mark_dirty(Category::Dyes.key());
    }

    pub fn has_dye(&mut self, def_id: i64) -> bool {
        self.document_mut(Category::Dyes).contains_def(def_id)
    }

    pub fn dye_data(&mut self, id: &str) -> Option<&ItemRecord> {
        self.document_mut(Category::Dyes).find(id)
    }

    pub fn dye_hsv(&self, def_id: i64) -> Option<&str> {
        self.catalogs.dyes.hsv(def_id)
    }

    // -----------------------------------------------------------------------
    // Clothing
    // -----------------------------------------------------------------------

    pub fn has_clothing(&mut self, def_id: i64) -> bool {
        self.document_mut(Category::Clothing).contains_def(def_id)
    }

    pub fn clothing_count(&mut self, def_id: i64) -> usize {
        self.document_mut(Category::Clothing).count_def(def_id)
    }

    /// Adds a clothing item with the catalog's default colors.
    ///
    /// Returns `None` and adds nothing when the item isn't in the
    /// clothing catalog.
    pub fn add_clothing(&mut self, def_id: i64, in_trade_list: bool) -> Option<String> {
        self.document_mut(Category::Clothing);
        let catalogs = Arc::clone(&self.catalogs);
        let Some(template) = catalogs.clothing.get(def_id) else {
            tracing::debug!(def_id, "unknown clothing item, not added");
            return None;
        };

        let components = ComponentBag::new()
            .with("Tradable", Component::Tradable(Tradable {
                is_in_trade_list: in_trade_list,
                extra: Map::new(),
            }))
            .with("Colorable", Component::Colorable(template.clone()))
            .with("Timestamp", Component::Timestamp(Timestamp::now()));
        Some(self.add_record(Category::Clothing, def_id, components))
    }

    pub fn remove_clothing(&mut self, id: &str) {
        if self.document_mut(Category::Clothing).remove(id).is_some() {
            self.mark_dirty(Category::Clothing.key());
        }
    }

    pub fn clothing_data(&mut self, id: &str) -> Option<&ItemRecord> {
        self.document_mut(Category::Clothing).find(id)
    }

    pub fn default_clothing_channel_hsv(&self, def_id: i64, channel: u32) -> Option<&str> {
        self.catalogs.clothing.default_channel_hsv(def_id, channel)
    }

    // -----------------------------------------------------------------------
    // Avatar parts
    // -----------------------------------------------------------------------

    pub fn is_avatar_part_unlocked(&mut self, def_id: i64) -> bool {
        self.document_mut(Category::AvatarParts).contains_def(def_id)
    }

    /// Unlocks a body mod or wings. Already-unlocked parts are left alone.
    pub fn unlock_avatar_part(&mut self, def_id: i64) {
        if self.is_avatar_part_unlocked(def_id) {
            return;
        }
        self.add_record(
            Category::AvatarParts,
            def_id,
            ComponentBag::new().with("Timestamp", Component::Timestamp(Timestamp::now())),
        );
    }

    /// Removes the first unlock of a body mod or wings.
    pub fn lock_avatar_part(&mut self, def_id: i64) {
        if self.document_mut(Category::AvatarParts).remove_by_def(def_id).is_some() {
            self.mark_dirty(Category::AvatarParts.key());
        }
    }

    // -----------------------------------------------------------------------
    // Houses and islands
    // -----------------------------------------------------------------------

    pub fn unlocked_house_types(&mut self) -> Vec<i64> {
        self.document_mut(Category::Houses).distinct_defs()
    }

    pub fn unlocked_island_types(&mut self) -> Vec<i64> {
        self.document_mut(Category::Islands).distinct_defs()
    }

    pub fn house_type_count(&mut self, def_id: i64) -> usize {
        self.document_mut(Category::Houses).count_def(def_id)
    }

    pub fn island_type_count(&mut self, def_id: i64) -> usize {
        self.document_mut(Category::Islands).count_def(def_id)
    }

    pub fn is_house_type_unlocked(&mut self, def_id: i64) -> bool {
        self.document_mut(Category::Houses).contains_def(def_id)
    }

    pub fn is_island_type_unlocked(&mut self, def_id: i64) -> bool {
        self.document_mut(Category::Islands).contains_def(def_id)
    }

    /// Adds a new, unbuilt house of the given type.
    pub fn add_house(&mut self, def_id: i64) -> String {
        let components = ComponentBag::new()
            .with("House", Component::House(House::new()))
            .with("Timestamp", Component::Timestamp(Timestamp::now()));
        self.add_record(Category::Houses, def_id, components)
    }

    /// Adds a new island of the given type.
    pub fn add_island(&mut self, def_id: i64) -> String {
        let components = ComponentBag::new()
            .with("Island", Component::Island(Island::new()))
            .with("Timestamp", Component::Timestamp(Timestamp::now()));
        self.add_record(Category::Islands, def_id, components)
    }

    pub fn house_object(&mut self, id: &str) -> Option<&ItemRecord> {
        self.document_mut(Category::Houses).find(id)
    }

    pub fn island_object(&mut self, id: &str) -> Option<&ItemRecord> {
        self.document_mut(Category::Islands).find(id)
    }

    // -----------------------------------------------------------------------
    // Sanctuary
    // -----------------------------------------------------------------------

    /// Number of sanctuary looks. Never materializes the document.
    pub fn sanctuary_look_count(&self) -> usize {
        self.inventory
            .get(Category::SanctuaryLooks.key())
            .map_or(0, InventoryDocument::len)
    }

    pub fn sanctuary_look(&mut self, id: &str) -> Option<&ItemRecord> {
        self.document_mut(Category::SanctuaryLooks).find(id)
    }

    pub fn first_sanctuary_look(&mut self) -> Option<&ItemRecord> {
        self.document_mut(Category::SanctuaryLooks).records().first()
    }

    /// Adds a sanctuary look slot and returns its id.
    ///
    /// The look gets a fresh default house and island; every other
    /// house and island type the player has unlocked also gets a fresh
    /// instance so the new look can use it.
    pub fn add_extra_sanctuary_slot(&mut self) -> String {
        let look_id = fresh_id(self.document_mut(Category::SanctuaryLooks));

        let house_inv_id = self.add_house(DEFAULT_HOUSE_DEF_ID);
        for def_id in self.unlocked_house_types() {
            if def_id != DEFAULT_HOUSE_DEF_ID {
                self.add_house(def_id);
            }
        }

        let island_inv_id = self.add_island(DEFAULT_ISLAND_DEF_ID);
        for def_id in self.unlocked_island_types() {
            if def_id != DEFAULT_ISLAND_DEF_ID {
                self.add_island(def_id);
            }
        }

        let look = SanctuaryLook {
            info: SanctuaryInfo {
                house_def_id: DEFAULT_HOUSE_DEF_ID,
                house_inv_id,
                island_def_id: DEFAULT_ISLAND_DEF_ID,
                island_inv_id,
                class_inv_id: SANCTUARY_CLASS_INV_ID.to_string(),
                placement_info: Map::new(),
                extra: Map::new(),
            },
            extra: Map::new(),
        };
        let components = ComponentBag::new()
            .with("SanctuaryLook", Component::SanctuaryLook(look))
            .with("Timestamp", Component::Timestamp(Timestamp::now()));
        self.document_mut(Category::SanctuaryLooks).push(
            ItemRecord::new(look_id.clone(), SANCTUARY_LOOK_DEF_ID, Category::SanctuaryLooks)
                .with_components(components),
        );
        self.mark_dirty(Category::SanctuaryLooks.key());
        look_id
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A random v4 id not yet used in `document`.
fn fresh_id(document: &InventoryDocument) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !document.contains_id(&id) {
            return id;
        }
    }
}

/// Dye stacks use a stable, name-derived id so the client can address
/// them by definition.
fn dye_id(def_id: i64) -> String {
    name_uuid(def_id.to_string().as_bytes()).to_string()
}

fn look_slot(id: String, species: &AvatarEntry, primary: bool) -> ItemRecord {
    let mut components = ComponentBag::new();
    if primary {
        components.insert("PrimaryLook", Component::PrimaryLook(PrimaryLook::default()));
    }
    components.insert("Timestamp", Component::Timestamp(Timestamp::now()));
    components.insert(
        "AvatarLook",
        Component::AvatarLook(AvatarLook {
            gender: 0,
            info: species.info().clone(),
            extra: Map::new(),
        }),
    );
    components.insert("Name", Component::Name(Name::default()));
    ItemRecord::new(id, species.def_id(), Category::Avatars).with_components(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVATARS: &str = r#"{"Avatars": {
        "Kitsune": {"defId": 1763, "info": {"actorClassDefID": "1758"}},
        "Senri": {"defId": 2110, "info": {"actorClassDefID": "2105"}}
    }}"#;
    const CLOTHING: &str = r#"{"Clothing": {"8661": {"color1HSV": {"_hsv": "1,2,3"}}}}"#;
    const DYES: &str = r#"{"Dyes": {"7": "0.1,0.2,0.3"}}"#;

    fn accessor() -> InventoryAccessor {
        let catalogs = Catalogs::from_json(AVATARS, CLOTHING, DYES).unwrap();
        InventoryAccessor::new(PlayerInventory::new(), Arc::new(catalogs))
    }

    fn primaries(acc: &InventoryAccessor, def_id: i64) -> usize {
        acc.inventory()
            .get("avatars")
            .map_or(0, |d| d.iter().filter(|r| r.def_id == def_id && r.components.is_primary_look()).count())
    }

    #[test]
    fn test_has_clothing_materializes_empty_document() {
        let mut acc = accessor();
        assert!(!acc.has_clothing(42));
        assert!(acc.inventory().get("100").is_some_and(InventoryDocument::is_empty));
        assert!(acc.dirty_categories().is_empty());
    }

    #[test]
    fn test_generic_lookup_materializes_unknown_category() {
        let mut acc = accessor();
        assert!(!acc.has_object("999", "nope"));
        assert!(acc.inventory().contains("999"));
    }

    #[test]
    fn test_is_species_unlocked_does_not_materialize() {
        let acc = accessor();
        assert!(!acc.is_species_unlocked("Kitsune"));
        assert!(!acc.inventory().contains("avatars"));
    }

    #[test]
    fn test_sanctuary_look_count_does_not_materialize() {
        let acc = accessor();
        assert_eq!(acc.sanctuary_look_count(), 0);
        assert!(!acc.inventory().contains("201"));
    }

    #[test]
    fn test_unlock_species_first_creates_thirteen_slots() {
        let mut acc = accessor();
        acc.unlock_species("Kitsune");

        let avatars = acc.inventory().get("avatars").unwrap();
        assert_eq!(avatars.len(), 13);
        assert!(avatars.records()[0].components.is_primary_look());
        assert_eq!(primaries(&acc, 1763), 1);
        assert!(avatars.iter().all(|r| r.type_code == 200 && r.def_id == 1763));

        let species = acc.inventory().get("1").unwrap();
        assert_eq!(species.len(), 1);
        assert_eq!(species.records()[0].def_id, 1758);
        assert_eq!(acc.dirty_categories(), vec!["1".to_string(), "avatars".to_string()]);
    }

    #[test]
    fn test_unlock_species_by_def_id_text() {
        let mut acc = accessor();
        acc.unlock_species("2110");
        assert!(acc.is_species_unlocked("Senri"));
        assert!(acc.is_species_unlocked("2110"));
    }

    #[test]
    fn test_unlock_species_is_idempotent() {
        let mut acc = accessor();
        acc.unlock_species("Kitsune");
        acc.unlock_species("Kitsune");
        acc.unlock_species("1763");
        assert_eq!(acc.inventory().get("avatars").unwrap().len(), 13);
        assert_eq!(acc.inventory().get("1").unwrap().len(), 1);
    }

    #[test]
    fn test_unlock_second_species_copies_slot_count() {
        let mut acc = accessor();
        acc.unlock_species("Kitsune");
        acc.add_extra_look_slot();
        // Kitsune now has 13 non-primary slots.
        acc.unlock_species("Senri");
        let senri = acc
            .inventory()
            .get("avatars")
            .unwrap()
            .iter()
            .filter(|r| r.def_id == 2110)
            .count();
        assert_eq!(senri, 14);
        assert_eq!(primaries(&acc, 2110), 1);
    }

    #[test]
    fn test_unlock_unknown_species_is_noop() {
        let mut acc = accessor();
        acc.unlock_species("Dragon");
        assert!(acc.dirty_categories().is_empty());
        assert!(acc.inventory().get("1").is_none());
    }

    #[test]
    fn test_look_slot_ids_are_unique() {
        let mut acc = accessor();
        acc.unlock_species("Kitsune");
        acc.unlock_species("Senri");
        let avatars = acc.inventory().get("avatars").unwrap();
        let ids: BTreeSet<&str> = avatars.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), avatars.len());
    }

    #[test]
    fn test_add_extra_look_slot_skips_uncatalogued_species() {
        let mut acc = accessor();
        let mut avatars = InventoryDocument::new();
        avatars.push(
            ItemRecord::new("p", 5555, Category::Avatars).with_components(
                ComponentBag::new().with("PrimaryLook", Component::PrimaryLook(PrimaryLook::default())),
            ),
        );
        acc.inventory.insert("avatars", avatars);

        acc.add_extra_look_slot();
        assert_eq!(acc.inventory().get("avatars").unwrap().len(), 1);
        assert_eq!(acc.dirty_categories(), vec!["avatars".to_string()]);
    }

    #[test]
    fn test_add_dye_twice_then_remove_leaves_one() {
        let mut acc = accessor();
        let first = acc.add_dye(7);
        let second = acc.add_dye(7);
        assert_eq!(first, second);
        acc.remove_dye(7);

        let record = acc.dye_data(&first).expect("stack exists");
        assert_eq!(record.components.quantity(), 1);
        assert_eq!(acc.dirty_categories(), vec!["111".to_string()]);
    }

    #[test]
    fn test_dye_id_is_name_derived() {
        let mut acc = accessor();
        let id = acc.add_dye(7);
        assert_eq!(id, name_uuid(b"7").to_string());
    }

    #[test]
    fn test_remove_last_dye_deletes_stack() {
        let mut acc = accessor();
        let id = acc.add_dye(7);
        acc.remove_dye_by_id(&id);
        assert!(!acc.has_dye(7));
    }

    #[test]
    fn test_remove_missing_dye_never_goes_negative() {
        let mut acc = accessor();
        acc.remove_dye(9);
        assert!(!acc.has_dye(9));
        assert!(acc.document("111").is_empty());
    }

    #[test]
    fn test_add_dye_at_max_quantity_saturates() {
        let mut acc = accessor();
        let id = acc.add_dye(7);
        acc.document_mut(Category::Dyes)
            .find_mut(&id)
            .unwrap()
            .components
            .set_quantity(i64::MAX);

        acc.add_dye(7);

        assert_eq!(acc.dye_data(&id).unwrap().components.quantity(), i64::MAX);
    }

    #[test]
    fn test_remove_dye_at_min_quantity_deletes_stack() {
        let mut acc = accessor();
        let id = acc.add_dye(7);
        acc.document_mut(Category::Dyes)
            .find_mut(&id)
            .unwrap()
            .components
            .set_quantity(i64::MIN);

        acc.remove_dye(7);

        assert!(!acc.has_dye(7));
    }

    #[test]
    fn test_add_clothing_copies_catalog_colors() {
        let mut acc = accessor();
        let id = acc.add_clothing(8661, true).expect("catalogued");
        let record = acc.clothing_data(&id).unwrap();
        assert_eq!(record.type_code, 100);
        assert!(record.components.tradable().is_some_and(|t| t.is_in_trade_list));
        assert!(matches!(record.components.get("Colorable"), Some(Component::Colorable(_))));
        assert_eq!(acc.clothing_count(8661), 1);
        assert_eq!(acc.default_clothing_channel_hsv(8661, 1), Some("1,2,3"));
    }

    #[test]
    fn test_add_unknown_clothing_returns_none() {
        let mut acc = accessor();
        assert_eq!(acc.add_clothing(1, false), None);
        assert!(acc.dirty_categories().is_empty());
    }

    #[test]
    fn test_remove_clothing_marks_dirty() {
        let mut acc = accessor();
        let id = acc.add_clothing(8661, false).unwrap();
        acc.acknowledge_flush();
        acc.remove_clothing(&id);
        assert!(!acc.has_clothing(8661));
        assert_eq!(acc.dirty_categories(), vec!["100".to_string()]);
    }

    #[test]
    fn test_avatar_part_unlock_and_lock() {
        let mut acc = accessor();
        acc.unlock_avatar_part(300);
        acc.unlock_avatar_part(300);
        assert_eq!(acc.document("2").len(), 1);
        acc.lock_avatar_part(300);
        assert!(!acc.is_avatar_part_unlocked(300));
    }

    #[test]
    fn test_add_house_has_default_layout() {
        let mut acc = accessor();
        let id = acc.add_house(2700);
        let house = acc.house_object(&id).unwrap().components.house().unwrap().clone();
        assert_eq!(house.stage, 0);
        assert_eq!(house.enlarged_areas.len(), 10);
        assert!(acc.is_house_type_unlocked(2700));
        assert_eq!(acc.house_type_count(2700), 1);
    }

    #[test]
    fn test_add_extra_sanctuary_slot_composes_house_and_island() {
        let mut acc = accessor();
        acc.add_house(3000);
        acc.add_island(4000);
        acc.acknowledge_flush();

        let look_id = acc.add_extra_sanctuary_slot();
        assert_eq!(acc.sanctuary_look_count(), 1);
        assert_eq!(acc.house_type_count(2694), 1);
        assert_eq!(acc.house_type_count(3000), 2);
        assert_eq!(acc.island_type_count(2695), 1);
        assert_eq!(acc.island_type_count(4000), 2);

        let look = acc.sanctuary_look(&look_id).unwrap().clone();
        assert_eq!(look.def_id, 9625);
        let info = &look.components.sanctuary_look().unwrap().info;
        assert_eq!(info.class_inv_id, SANCTUARY_CLASS_INV_ID);
        assert!(acc.house_object(&info.house_inv_id).is_some());
        assert!(acc.island_object(&info.island_inv_id).is_some());
        assert_eq!(
            acc.dirty_categories(),
            vec!["201".to_string(), "5".to_string(), "6".to_string()]
        );
    }

    #[test]
    fn test_dirty_set_deduplicates_and_clears() {
        let mut acc = accessor();
        acc.add_dye(7);
        acc.add_dye(7);
        acc.add_dye(7);
        assert_eq!(acc.dirty_categories().len(), 1);
        acc.acknowledge_flush();
        assert!(!acc.is_dirty());
    }
}
