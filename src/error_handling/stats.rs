//! Warning statistics tracking.
//!
//! The optimizer runs single-threaded over one document, so plain `Cell`
//! counters are enough; counts are still incremented through a shared
//! reference so the tracker can be threaded through the pipeline stages.

use std::cell::Cell;
use std::collections::HashMap;
use strum::IntoEnumIterator;

use super::types::WarningType;

/// Missing-resource warning tracker.
///
/// All warning types are initialized to zero on creation, so iteration over
/// the categories always sees a complete map.
pub struct WarningStats {
    warnings: HashMap<WarningType, Cell<usize>>,
}

impl WarningStats {
    /// Creates a tracker with every warning counter at zero.
    pub fn new() -> Self {
        let mut warnings = HashMap::new();
        for warning in WarningType::iter() {
            warnings.insert(warning, Cell::new(0));
        }

        WarningStats { warnings }
    }

    /// Increment a warning counter.
    ///
    /// All warning types are initialized in the constructor; a missing entry
    /// indicates a bug in initialization and is logged rather than panicking.
    pub fn increment(&self, warning: WarningType) {
        if let Some(counter) = self.warnings.get(&warning) {
            counter.set(counter.get() + 1);
        } else {
            log::error!(
                "Attempted to increment warning counter for {:?} which is not in the map. \
                 This indicates a bug in WarningStats initialization.",
                warning
            );
        }
    }

    /// Get the count for a warning type.
    ///
    /// Returns 0 if the warning type is not in the map (should never happen
    /// if properly initialized).
    pub fn count(&self, warning: WarningType) -> usize {
        self.warnings
            .get(&warning)
            .map(|c| c.get())
            .unwrap_or_else(|| {
                log::warn!(
                    "Warning type {:?} not found in stats map, returning 0. \
                     This indicates a bug in WarningStats initialization.",
                    warning
                );
                0
            })
    }

    /// Get total warning count across all warning types.
    pub fn total(&self) -> usize {
        WarningType::iter().map(|w| self.count(w)).sum()
    }

    /// Prints per-category warning counts to the log.
    pub fn log_summary(&self) {
        let total = self.total();
        if total == 0 {
            return;
        }

        log::info!("Warning Counts ({} total):", total);
        for warning_type in WarningType::iter() {
            let count = self.count(warning_type);
            if count > 0 {
                log::info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }
}

impl Default for WarningStats {
    fn default() -> Self {
        Self::new()
    }
}
