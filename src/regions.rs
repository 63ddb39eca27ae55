/// Warning area registry for the configured region.
///
/// Maps each Flood Warning Area code to its tidal classification, as loaded
/// from the `[[warning_area]]` entries of fwii.toml. This is the single
/// source of truth for fluvial vs coastal: raw records are backfilled from
/// here before duration inference, and the scoring layer never looks areas
/// up itself.

use std::collections::HashMap;

use crate::config::WarningArea;
use crate::model::RawWarning;

/// Area code → tidal flag lookup.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    areas: HashMap<String, WarningArea>,
}

impl RegionRegistry {
    pub fn new(areas: impl IntoIterator<Item = WarningArea>) -> Self {
        RegionRegistry {
            areas: areas
                .into_iter()
                .map(|a| (a.fwd_code.clone(), a))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn contains(&self, area_code: &str) -> bool {
        self.areas.contains_key(area_code)
    }

    /// Tidal flag for a registered area. `None` for unknown areas and for
    /// registered areas whose classification is not configured.
    pub fn is_tidal(&self, area_code: &str) -> Option<bool> {
        self.areas.get(area_code).and_then(|a| a.is_tidal)
    }

    /// Overwrites each record's tidal flag with the registry's value.
    ///
    /// Records for areas not in the registry keep whatever flag they arrived
    /// with. Returns how many records were classified from the registry.
    pub fn backfill_tidal(&self, records: &mut [RawWarning]) -> usize {
        let mut classified = 0;
        let mut unknown = 0;

        for record in records.iter_mut() {
            let Some(code) = record.area_code.as_deref() else {
                continue;
            };
            if self.contains(code) {
                record.is_tidal = self.is_tidal(code);
                classified += 1;
            } else {
                unknown += 1;
            }
        }

        if unknown > 0 {
            tracing::warn!(
                "{} of {} records belong to areas missing from the region registry",
                unknown,
                records.len()
            );
        }
        classified
    }
}
