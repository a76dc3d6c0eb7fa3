//! Presentation asset lookup
//!
//! A missing icon is cosmetic: it is logged and the caller renders
//! without it.

use log::warn;
use tradebook_core::Country;
use tradebook_ports::ResourceLookup;

/// Path of the flag icon for `country`, if the asset exists
pub fn country_flag_resource(country: &Country, lookup: &dyn ResourceLookup) -> Option<String> {
    let path = format!("/images/countries/{}.png", country.code.to_lowercase());
    if lookup.exists(&path) {
        Some(path)
    } else {
        warn!(
            "Country icon not found: {} country name: {}",
            path, country.name
        );
        None
    }
}
