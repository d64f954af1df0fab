//! Valuesmith Core - override-value encoding and merge engine for Helm
//!
//! This crate turns nested override values into what a Helm invocation needs:
//! - `ValueTree`: nested values document (scalars, lists, mappings)
//! - `encode`: flat `path=value` assignments for `--set` style options
//! - `merge`: deep merge of overrides into a base values document
//! - `pin`: resolution of pinned (`^key^`) keys after a merge
//! - `ValueOverride`: the four override groups and their option fragments
//! - `document`: rewriting a chart's `values.yaml` with overrides

pub mod assemble;
pub mod document;
pub mod encode;
pub mod error;
pub mod merge;
pub mod pin;
pub mod tree;

pub use assemble::{Fragment, OverrideGroup, VALUES_FLAG, ValueOverride};
pub use document::{VALUES_FILE, load_document, rewrite_values_file, save_document};
pub use encode::{encode, encode_mapping};
pub use error::{CoreError, Result};
pub use merge::merge;
pub use pin::normalize;
pub use tree::{Mapping, PIN_MARKER, Scalar, ValueTree, is_pinned, unpin};
