//! Typed item components with a lossless fallback.
//!
//! Every item record carries a bag of named components. The names the
//! server reasons about are decoded into typed structs through
//! [`COMPONENT_TABLE`]; anything else (and any known component whose
//! payload doesn't fit its typed shape) is kept verbatim as
//! [`Component::Opaque`] so saves written by newer clients survive a
//! round-trip untouched.
//!
//! Typed structs carry a flattened `extra` map for the same reason:
//! fields the server doesn't model are written back as they came in.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

// ---------------------------------------------------------------------------
// Component payloads
// ---------------------------------------------------------------------------

/// `Timestamp`: creation time in milliseconds since the epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    pub ts: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `PrimaryLook`: marker on the first look slot of each species.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryLook {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Quantity`: stack size of a stackable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub quantity: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Tradable`: whether the item is offered in the trade list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tradable {
    #[serde(rename = "isInTradeList")]
    pub is_in_trade_list: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Island`: placement data of an island instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Island {
    #[serde(rename = "gridId")]
    pub grid_id: i64,
    #[serde(rename = "themeDefId")]
    pub theme_def_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Number of enlargeable areas a house tracks.
pub const HOUSE_ENLARGED_AREAS: usize = 10;

/// `House`: build stage and layout of a house instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub stage: i64,
    #[serde(rename = "roomData")]
    pub room_data: Vec<Value>,
    pub x: Number,
    pub y: Number,
    #[serde(rename = "gridId")]
    pub grid_id: i64,
    #[serde(rename = "themeDefId")]
    pub theme_def_id: i64,
    #[serde(rename = "enlargedAreas")]
    pub enlarged_areas: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `SanctuaryLook`: which house and island a sanctuary look uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctuaryLook {
    pub info: SanctuaryInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctuaryInfo {
    #[serde(rename = "houseDefId")]
    pub house_def_id: i64,
    #[serde(rename = "houseInvId")]
    pub house_inv_id: String,
    #[serde(rename = "islandDefId")]
    pub island_def_id: i64,
    #[serde(rename = "islandInvId")]
    pub island_inv_id: String,
    #[serde(rename = "classInvId")]
    pub class_inv_id: String,
    #[serde(rename = "placementInfo", default)]
    pub placement_info: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `AvatarLook`: appearance of one look slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarLook {
    pub gender: i64,
    pub info: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `Name`: player-chosen name of a look slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A single component value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Timestamp(Timestamp),
    PrimaryLook(PrimaryLook),
    Quantity(Quantity),
    Tradable(Tradable),
    /// Per-channel color data, copied from the clothing catalog.
    Colorable(Map<String, Value>),
    Island(Island),
    House(House),
    SanctuaryLook(SanctuaryLook),
    AvatarLook(AvatarLook),
    Name(Name),
    /// A component the server doesn't model, kept verbatim.
    Opaque(Value),
}

type Decoder = fn(Value) -> Component;

/// Known component names and how to decode them.
pub static COMPONENT_TABLE: &[(&str, Decoder)] = &[
    ("Timestamp", |v| decode(v, Component::Timestamp)),
    ("PrimaryLook", |v| decode(v, Component::PrimaryLook)),
    ("Quantity", |v| decode(v, Component::Quantity)),
    ("Tradable", |v| decode(v, Component::Tradable)),
    ("Colorable", |v| decode(v, Component::Colorable)),
    ("Island", |v| decode(v, Component::Island)),
    ("House", |v| decode(v, Component::House)),
    ("SanctuaryLook", |v| decode(v, Component::SanctuaryLook)),
    ("AvatarLook", |v| decode(v, Component::AvatarLook)),
    ("Name", |v| decode(v, Component::Name)),
];

fn decode<T: DeserializeOwned>(value: Value, wrap: fn(T) -> Component) -> Component {
    match T::deserialize(&value) {
        Ok(typed) => wrap(typed),
        Err(err) => {
            tracing::trace!(%err, "component payload kept opaque");
            Component::Opaque(value)
        }
    }
}

impl Component {
    /// Decodes the payload of the component called `name`.
    pub fn from_json(name: &str, value: Value) -> Self {
        match COMPONENT_TABLE.iter().find(|(known, _)| *known == name) {
            Some((_, decoder)) => decoder(value),
            None => Component::Opaque(value),
        }
    }

    /// Re-encodes this component as JSON.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Component::Opaque(_))
    }
}

impl Timestamp {
    /// A timestamp for the current instant.
    pub fn now() -> Self {
        Self {
            ts: chrono::Utc::now().timestamp_millis(),
            extra: Map::new(),
        }
    }
}

impl House {
    /// A freshly built house at stage zero.
    pub fn new() -> Self {
        Self {
            stage: 0,
            room_data: Vec::new(),
            x: Number::from(0),
            y: Number::from(0),
            grid_id: 0,
            theme_def_id: 0,
            enlarged_areas: vec![0; HOUSE_ENLARGED_AREAS],
            extra: Map::new(),
        }
    }
}

impl Default for House {
    fn default() -> Self {
        Self::new()
    }
}

impl Island {
    pub fn new() -> Self {
        Self {
            grid_id: 0,
            theme_def_id: 0,
            extra: Map::new(),
        }
    }
}

impl Default for Island {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ComponentBag
// ---------------------------------------------------------------------------

/// The named components of one item record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentBag(BTreeMap<String, Component>);

impl ComponentBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component, replacing any previous one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, component: Component) {
        self.0.insert(name.into(), component);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, component: Component) -> Self {
        self.insert(name, component);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Component> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.0.iter().map(|(name, component)| (name.as_str(), component))
    }

    /// True if this record is the primary look of its species.
    pub fn is_primary_look(&self) -> bool {
        self.contains("PrimaryLook")
    }

    /// Current stack size; zero when absent or unreadable.
    pub fn quantity(&self) -> i64 {
        match self.get("Quantity") {
            Some(Component::Quantity(q)) => q.quantity,
            _ => 0,
        }
    }

    /// Sets the stack size, keeping any extra quantity fields.
    pub fn set_quantity(&mut self, quantity: i64) {
        match self.0.get_mut("Quantity") {
            Some(Component::Quantity(q)) => q.quantity = quantity,
            _ => self.insert(
                "Quantity",
                Component::Quantity(Quantity {
                    quantity,
                    extra: Map::new(),
                }),
            ),
        }
    }

    pub fn tradable(&self) -> Option<&Tradable> {
        match self.get("Tradable") {
            Some(Component::Tradable(t)) => Some(t),
            _ => None,
        }
    }

    pub fn avatar_look(&self) -> Option<&AvatarLook> {
        match self.get("AvatarLook") {
            Some(Component::AvatarLook(a)) => Some(a),
            _ => None,
        }
    }

    pub fn house(&self) -> Option<&House> {
        match self.get("House") {
            Some(Component::House(h)) => Some(h),
            _ => None,
        }
    }

    pub fn island(&self) -> Option<&Island> {
        match self.get("Island") {
            Some(Component::Island(i)) => Some(i),
            _ => None,
        }
    }

    pub fn sanctuary_look(&self) -> Option<&SanctuaryLook> {
        match self.get("SanctuaryLook") {
            Some(Component::SanctuaryLook(s)) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for ComponentBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ComponentBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .map(|(name, value)| {
                    let component = Component::from_json(&name, value);
                    (name, component)
                })
                .collect(),
        ))
    }
}
