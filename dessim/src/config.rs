//! Top-level configuration.

use serde::{Deserialize, Serialize};

use crate::inventory::InventoryConfig;
use crate::queueing::QueueingConfig;

/// A complete simulation configuration, tagged by the system it drives.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), serde_json::Error> {
/// use dessim::Config;
///
/// let config = r#"{
///     "system": "queueing",
///     "interarrival_mean": 1.0,
///     "service_mean": 0.5,
///     "target_delays": 1000
/// }"#;
/// let config: Config = serde_json::from_str(config)?;
/// assert!(matches!(config, Config::Queueing(_)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "system", rename_all = "snake_case")]
pub enum Config {
    /// Single-server queueing system.
    Queueing(QueueingConfig),
    /// Single-product inventory system.
    Inventory(InventoryConfig),
}
