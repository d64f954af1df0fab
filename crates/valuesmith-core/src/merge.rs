//! Deep merge of values documents

use indexmap::map::Entry;

use crate::tree::{Mapping, ValueTree};

/// Deep merge `overlay` into `base`
///
/// Rules:
/// - Mappings on both sides: recursive merge
/// - Anything else: overlay replaces base (lists are not appended)
/// - Keys only present in base are kept as they are
///
/// Keys keep their base position; keys new in the overlay are appended in
/// overlay order.
pub fn merge(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, overlay_value) in overlay {
        match base.entry(key) {
            Entry::Occupied(mut slot) => match (slot.get_mut(), overlay_value) {
                (ValueTree::Mapping(base_map), ValueTree::Mapping(overlay_map)) => {
                    let merged = merge(std::mem::take(base_map), overlay_map);
                    *base_map = merged;
                }
                (current, overlay_value) => *current = overlay_value,
            },
            Entry::Vacant(slot) => {
                slot.insert(overlay_value);
            }
        }
    }
    base
}
