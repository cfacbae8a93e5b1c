//! Platform formatters: pure projections of one [`SimulationResult`] into
//! platform-specific row shapes.
//!
//! Every row is a typed record built with dense defaults, so each table's
//! key set is identical across all rows and downstream schema-inference
//! consumers see a stable structure. Identifier remapping into platform
//! ranges is a deterministic pure function of the input id: the same result
//! formatted twice yields byte-identical output.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use funnelmock_core::SimulationResult;

pub mod analytics;
pub mod ecommerce;
pub mod errors;
pub mod output;
pub mod remap;

pub use errors::FormatError;

/// Rows per table for one target platform.
pub type PlatformTables = BTreeMap<String, Vec<Value>>;

/// One target-schema projection.
pub trait PlatformFormatter {
    fn platform(&self) -> &'static str;

    /// Project the result into this platform's tables. Never fails on a
    /// well-formed result; a dangling id is a driver bug, not a runtime
    /// condition this guards against.
    fn format(&self, result: &SimulationResult) -> Result<PlatformTables, FormatError>;
}

/// All known platform formatters.
pub struct FormatterRegistry {
    formatters: Vec<Box<dyn PlatformFormatter>>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self {
            formatters: vec![
                Box::new(ecommerce::ShopifyFormatter),
                Box::new(ecommerce::WooCommerceFormatter),
                Box::new(ecommerce::BigCommerceFormatter),
                Box::new(analytics::Ga4Formatter),
                Box::new(analytics::AmplitudeFormatter),
                Box::new(analytics::MixpanelFormatter),
            ],
        }
    }

    pub fn platforms(&self) -> Vec<&'static str> {
        self.formatters
            .iter()
            .map(|formatter| formatter.platform())
            .collect()
    }

    pub fn formatter(&self, platform: &str) -> Option<&dyn PlatformFormatter> {
        self.formatters
            .iter()
            .find(|formatter| formatter.platform() == platform)
            .map(Box::as_ref)
    }

    /// Format every registered platform: `platform -> table -> rows`.
    pub fn format_all(
        &self,
        result: &SimulationResult,
    ) -> Result<BTreeMap<String, PlatformTables>, FormatError> {
        let mut dataset = BTreeMap::new();
        for formatter in &self.formatters {
            dataset.insert(formatter.platform().to_string(), formatter.format(result)?);
        }
        Ok(dataset)
    }
}

pub(crate) fn to_rows<T: Serialize>(rows: &[T]) -> Result<Vec<Value>, FormatError> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(FormatError::from))
        .collect()
}
