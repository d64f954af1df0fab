//! Resolution of pinned keys after a merge
//!
//! A merge recurses into matching mappings, so an override can only add to a
//! sub-map already present in the base document. Wrapping the override key in
//! pin markers (`^annotations^`) makes its value replace whatever sits at the
//! unpinned key once the merge is done.

use std::collections::BTreeMap;

use crate::tree::{Mapping, ValueTree, unpin};

/// Separator between the levels addressed by a pinned key
const PATH_SEPARATOR: char = '.';

/// Replace every pinned key by its unpinned name, at every mapping level
///
/// A pinned key is a path relative to the mapping holding it: `^a.b^`
/// addresses `a -> b`, creating missing levels and replacing anything that is
/// not a mapping on the way. The pinned value overwrites whatever is at that
/// path. When several pins target the same path, the last one in insertion
/// order wins. Pins are applied after their siblings are normalized, so an
/// outer pin beats a pin nested below it.
///
/// The returned mappings are sorted by key and contain no pinned keys, so
/// normalizing twice gives the same tree.
pub fn normalize(tree: Mapping) -> Mapping {
    let mut working = BTreeMap::new();
    let mut pins = Vec::new();

    for (key, value) in tree {
        match unpin(&key) {
            Some(normal) => pins.push((pin_path(normal), normalize_value(value))),
            None => {
                working.insert(key, normalize_value(value));
            }
        }
    }

    let mut normalized: Mapping = working.into_iter().collect();
    for (path, value) in pins {
        if replace_at(&mut normalized, &path, value) {
            tracing::debug!(key = %path.join("."), "pinned value replaces merged value");
        }
    }
    normalized
}

fn normalize_value(value: ValueTree) -> ValueTree {
    match value {
        ValueTree::Mapping(map) => ValueTree::Mapping(normalize(map)),
        other => other,
    }
}

fn pin_path(normal: &str) -> Vec<String> {
    let segments: Vec<String> = normal
        .split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect();
    if segments.is_empty() {
        vec![normal.to_string()]
    } else {
        segments
    }
}

/// Put `value` at `path` below `map`, keeping every level sorted
///
/// Returns whether an existing value was replaced.
fn replace_at(map: &mut Mapping, path: &[String], value: ValueTree) -> bool {
    let Some((key, rest)) = path.split_first() else {
        return false;
    };

    let replaced = if rest.is_empty() {
        map.insert(key.clone(), value).is_some()
    } else {
        let mut child = match map.shift_remove(key) {
            Some(ValueTree::Mapping(child)) => child,
            _ => Mapping::new(),
        };
        let replaced = replace_at(&mut child, rest, value);
        map.insert(key.clone(), ValueTree::Mapping(child));
        replaced
    };

    map.sort_keys();
    replaced
}
