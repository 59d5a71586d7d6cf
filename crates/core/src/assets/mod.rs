use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AltarError, Result};

/// Where a decorative image is placed around the altar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSlot {
    Censer,
    LeftPanel,
    RightPanel,
}

/// Static image consumed read-only by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorAsset {
    pub id: String,
    pub path: String,
    pub alt: String,
    pub slot: AssetSlot,
}

impl DecorAsset {
    pub fn new(id: &str, path: &str, alt: &str, slot: AssetSlot) -> Self {
        Self {
            id: id.to_string(),
            path: path.to_string(),
            alt: alt.to_string(),
            slot,
        }
    }
}

/// Registry for all decorative images referenced by the altar.
#[derive(Debug, Default)]
pub struct AssetStore {
    assets: HashMap<String, DecorAsset>,
    order: Vec<String>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The censer and the blossom panels flanking it.
    pub fn altar_defaults() -> Self {
        let mut store = Self::new();
        store.register(DecorAsset::new("censer", "/censer.png", "Lư hương", AssetSlot::Censer));
        store.register(DecorAsset::new("peach", "/dao.png", "Hoa đào", AssetSlot::LeftPanel));
        store.register(DecorAsset::new("panel-left", "/the1.png", "Hoa mai", AssetSlot::LeftPanel));
        store.register(DecorAsset::new("panel-right", "/the2.png", "Hoa mai", AssetSlot::RightPanel));
        store.register(DecorAsset::new("apricot", "/mai.png", "Hoa mai", AssetSlot::RightPanel));
        store
    }

    pub fn register(&mut self, asset: DecorAsset) {
        if !self.assets.contains_key(&asset.id) {
            self.order.push(asset.id.clone());
        }
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn resolve(&self, id: &str) -> Result<&DecorAsset> {
        self.assets
            .get(id)
            .ok_or_else(|| AltarError::UnknownAsset(id.to_string()))
    }

    /// Assets placed in `slot`, in registration order.
    pub fn in_slot(&self, slot: AssetSlot) -> Vec<&DecorAsset> {
        self.order
            .iter()
            .filter_map(|id| self.assets.get(id))
            .filter(|asset| asset.slot == slot)
            .collect()
    }
}
