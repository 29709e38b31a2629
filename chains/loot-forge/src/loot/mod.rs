//! Loot items and the attribute records derived from them.

use async_trait::async_trait;
use core_logic::UpstreamError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod generator;
pub mod stats;

pub use generator::{build_attributes, LootGenerator};
pub use stats::parse_stat;

/// One facet of a loot item, in the shape the metadata service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub display_type: String,
    pub trait_type: String,
    pub value: String,
}

impl Attribute {
    pub fn new(
        display_type: impl Into<String>,
        trait_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            display_type: display_type.into(),
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

/// Item descriptor as returned by the loot service.
///
/// Unknown fields are carried through untouched so the response can echo the
/// item verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub category: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub tier: String,
    #[serde(default)]
    pub main_stats: Vec<String>,
    #[serde(rename = "stats", default)]
    pub sub_stats: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Both variants the loot service rolls per call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LootPayload {
    #[serde(default)]
    pub armor: Option<LootItem>,
    #[serde(default)]
    pub weapon: Option<LootItem>,
}

impl LootPayload {
    pub fn take(self, variant: LootVariant) -> Option<LootItem> {
        match variant {
            LootVariant::Armor => self.armor,
            LootVariant::Weapon => self.weapon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootVariant {
    Armor,
    Weapon,
}

impl fmt::Display for LootVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LootVariant::Armor => write!(f, "armor"),
            LootVariant::Weapon => write!(f, "weapon"),
        }
    }
}

/// The selected item plus its ordered attribute list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedLoot {
    pub loot: LootItem,
    pub attributes: Vec<Attribute>,
}

impl GeneratedLoot {
    /// Name registered with the metadata service, e.g. `"Fury Sword"`.
    pub fn token_name(&self) -> String {
        format!("{} {}", self.loot.name, self.loot.item_type)
    }
}

#[async_trait]
pub trait LootSource: Send + Sync {
    async fn fetch_loot(&self) -> Result<LootPayload, UpstreamError>;
}
