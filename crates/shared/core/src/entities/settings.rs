use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Trading preferences the viewer must fill in before creating offers
///
/// Emptiness of each set is meaningful: an empty set means the viewer has
/// not finished setting up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingSettings {
    pub accepted_locales: BTreeSet<String>,
    pub accepted_countries: BTreeSet<String>,
    pub accepted_arbitrators: BTreeSet<String>,
}

impl TradingSettings {
    pub fn is_complete(&self) -> bool {
        !self.accepted_locales.is_empty()
            && !self.accepted_countries.is_empty()
            && !self.accepted_arbitrators.is_empty()
    }
}
