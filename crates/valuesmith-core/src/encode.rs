//! Flat `path=value` encoding of value trees
//!
//! The encoding follows the override syntax of `helm --set`:
//! - nested keys are joined with `.`
//! - list elements are addressed with `[<index>]`
//! - assignments are separated by `,` when passed as one option value
//!
//! A pinned key (`^key^`) is emitted without its markers and with every `.`
//! inside it escaped as `\.`, so annotation names such as
//! `external-dns.alpha.kubernetes.io/target` stay a single key.

use crate::error::{CoreError, Result};
use crate::tree::{Mapping, ValueTree, unpin};

/// Separator between assignments in a single option value
pub const ASSIGNMENT_SEPARATOR: &str = ",";

/// Encode `node` under the path `key`
///
/// Scalars produce one assignment. A list element that is a mapping produces
/// one entry holding all of its assignments joined with `,`, so the result
/// has one entry per index for such lists.
pub fn encode(key: &str, node: &ValueTree) -> Result<Vec<String>> {
    let mut out = Vec::new();
    encode_into(key, node, &mut out)?;
    Ok(out)
}

/// Encode every entry of a top-level mapping, in lexicographic order of the
/// emitted key segments
pub fn encode_mapping(map: &Mapping) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for (key, value) in sorted_entries(map) {
        encode_into(&key_segment(key), value, &mut out)?;
    }
    Ok(out)
}

/// Join encoded assignments into one option value
pub fn join(assignments: &[String]) -> String {
    assignments.join(ASSIGNMENT_SEPARATOR)
}

fn encode_into(key: &str, node: &ValueTree, out: &mut Vec<String>) -> Result<()> {
    match node {
        ValueTree::Scalar(scalar) => out.push(format!("{}={}", key, scalar)),
        ValueTree::Mapping(map) => {
            for (sub_key, sub_node) in sorted_entries(map) {
                encode_into(&child_path(key, sub_key), sub_node, out)?;
            }
        }
        ValueTree::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                let path = format!("{}[{}]", key, index);
                match item {
                    ValueTree::Scalar(scalar) => out.push(format!("{}={}", path, scalar)),
                    ValueTree::Mapping(map) => {
                        let mut cell = Vec::new();
                        for (sub_key, sub_node) in sorted_entries(map) {
                            encode_into(&child_path(&path, sub_key), sub_node, &mut cell)?;
                        }
                        if !cell.is_empty() {
                            out.push(join(&cell));
                        }
                    }
                    ValueTree::Sequence(_) => return Err(CoreError::UnsupportedShape { path }),
                }
            }
        }
    }
    Ok(())
}

/// Entries ordered by the segment they emit, so pinned keys sort by their
/// unpinned name
fn sorted_entries(map: &Mapping) -> Vec<(&String, &ValueTree)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by_cached_key(|(key, _)| key_segment(key));
    entries
}

/// Path segment for a key: verbatim, or unpinned with literal dots escaped
fn key_segment(key: &str) -> String {
    match unpin(key) {
        Some(inner) => inner.replace('.', "\\."),
        None => key.to_string(),
    }
}

fn child_path(prefix: &str, key: &str) -> String {
    let segment = key_segment(key);
    if prefix.is_empty() {
        segment
    } else {
        format!("{}.{}", prefix, segment)
    }
}
