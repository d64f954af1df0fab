//! Encode command - print the flat assignments of a values document

use std::path::Path;
use valuesmith_core::{ValueTree, encode_mapping};

use crate::error::Result;

pub fn run(file: &Path) -> Result<()> {
    let document = ValueTree::from_file(file)?.into_mapping("document")?;
    for assignment in encode_mapping(&document)? {
        println!("{}", assignment);
    }
    Ok(())
}
