use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Campaign names per ad platform, as extracted from upstream ad generators.
///
/// A `BTreeMap` keeps platform iteration order stable, which the traffic
/// resolver relies on for run reproducibility.
pub type CampaignPool = BTreeMap<String, Vec<String>>;

/// One product from the upstream e-commerce catalog generator.
///
/// Consumed as opaque reference data; the simulation never invents products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
}
