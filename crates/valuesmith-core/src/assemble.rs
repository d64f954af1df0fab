//! Assembly of value overrides into Helm command-line options

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encode;
use crate::error::{CoreError, Result};
use crate::merge::merge;
use crate::pin::normalize;
use crate::tree::{Mapping, Scalar, ValueTree};

/// Option passing a values file to Helm
pub const VALUES_FLAG: &str = "--values";

/// The three tree-valued override groups, in the order they are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideGroup {
    /// Rendered as-is with `--set`
    Plain,
    /// Kept as literal strings with `--set-string`
    StringTyped,
    /// Values are file paths whose content Helm injects, with `--set-file`
    FilePath,
}

impl OverrideGroup {
    pub const ALL: [OverrideGroup; 3] = [
        OverrideGroup::Plain,
        OverrideGroup::StringTyped,
        OverrideGroup::FilePath,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            OverrideGroup::Plain => "--set",
            OverrideGroup::StringTyped => "--set-string",
            OverrideGroup::FilePath => "--set-file",
        }
    }

    /// Configuration field name of the group
    pub fn name(self) -> &'static str {
        match self {
            OverrideGroup::Plain => "overrides",
            OverrideGroup::StringTyped => "stringOverrides",
            OverrideGroup::FilePath => "fileOverrides",
        }
    }
}

impl fmt::Display for OverrideGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One command-line option and its value, e.g. `--set a=1,b=2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub flag: &'static str,
    pub value: String,
}

impl fmt::Display for Fragment {
    /// Rendered with its leading separator so fragments concatenate directly
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {} {}", self.flag, self.value)
    }
}

/// Value overrides passed to a Helm invocation
///
/// Each tree group may be written as a nested mapping or as a JSON object
/// embedded in a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueOverride {
    /// Values passed with `--set`
    pub overrides: Option<ValueTree>,

    /// Values passed with `--set-string`
    pub string_overrides: Option<ValueTree>,

    /// File paths passed with `--set-file`
    pub file_overrides: Option<ValueTree>,

    /// Values file passed with `--values`
    pub yaml_file: Option<String>,
}

impl ValueOverride {
    pub fn with_group(mut self, group: OverrideGroup, tree: ValueTree) -> Self {
        *self.slot(group) = Some(tree);
        self
    }

    pub fn with_yaml_file(mut self, path: impl Into<String>) -> Self {
        self.yaml_file = Some(path.into());
        self
    }

    fn slot(&mut self, group: OverrideGroup) -> &mut Option<ValueTree> {
        match group {
            OverrideGroup::Plain => &mut self.overrides,
            OverrideGroup::StringTyped => &mut self.string_overrides,
            OverrideGroup::FilePath => &mut self.file_overrides,
        }
    }

    fn raw(&self, group: OverrideGroup) -> Option<&ValueTree> {
        match group {
            OverrideGroup::Plain => self.overrides.as_ref(),
            OverrideGroup::StringTyped => self.string_overrides.as_ref(),
            OverrideGroup::FilePath => self.file_overrides.as_ref(),
        }
    }

    /// Resolve a group to its mapping, or `None` if it is absent or empty
    pub fn group(&self, group: OverrideGroup) -> Result<Option<Mapping>> {
        let Some(raw) = self.raw(group) else {
            return Ok(None);
        };

        let tree = match raw {
            ValueTree::Scalar(Scalar::String(text)) if looks_like_json(text) => {
                ValueTree::from_json(text)?
            }
            other => other.clone(),
        };

        let map = tree.into_mapping(group.name())?;
        Ok((!map.is_empty()).then_some(map))
    }

    /// Values file reference, unless blank
    pub fn yaml_file(&self) -> Option<&str> {
        self.yaml_file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    /// Option fragments for every non-empty group, in emission order
    pub fn fragments(&self) -> Result<Vec<Fragment>> {
        let mut fragments = Vec::new();

        for group in OverrideGroup::ALL {
            let Some(map) = self.group(group)? else {
                continue;
            };
            let assignments = encode::encode_mapping(&map)?;
            if assignments.is_empty() {
                continue;
            }
            tracing::debug!(
                group = %group,
                count = assignments.len(),
                "encoded override group"
            );
            fragments.push(Fragment {
                flag: group.flag(),
                value: encode::join(&assignments),
            });
        }

        if let Some(path) = self.yaml_file() {
            fragments.push(Fragment {
                flag: VALUES_FLAG,
                value: path.to_string(),
            });
        }

        Ok(fragments)
    }

    /// All fragments concatenated, each with its leading space
    ///
    /// Empty when there is nothing to override.
    pub fn values_options(&self) -> Result<String> {
        Ok(self.fragments()?.iter().map(Fragment::to_string).collect())
    }

    /// Merge the plain overrides into a base document and resolve pins
    ///
    /// Returns `None` when there are no plain overrides, in which case the
    /// base document should be left untouched.
    pub fn merge_into(&self, base: Mapping) -> Result<Option<Mapping>> {
        let Some(overlay) = self.group(OverrideGroup::Plain)? else {
            return Ok(None);
        };
        tracing::debug!(keys = overlay.len(), "merging overrides into base document");
        Ok(Some(normalize(merge(base, overlay))))
    }
}

fn looks_like_json(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with('{') || text.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> ValueTree {
        ValueTree::from_json(text).unwrap()
    }

    #[test]
    fn test_no_override_no_option() {
        assert_eq!(ValueOverride::default().values_options().unwrap(), "");
    }

    #[test]
    fn test_normal_value_override() {
        let values = ValueOverride::default()
            .with_group(OverrideGroup::Plain, json(r#"{"key1": "value1"}"#));
        assert_eq!(values.values_options().unwrap(), " --set key1=value1");
    }

    #[test]
    fn test_multiple_normal_value_overrides() {
        let values = ValueOverride::default().with_group(
            OverrideGroup::Plain,
            json(r#"{"key1": "value1", "key2": "value2"}"#),
        );
        assert_eq!(values.values_options().unwrap(), " --set key1=value1,key2=value2");
    }

    #[test]
    fn test_string_value_overrides() {
        let values = ValueOverride::default().with_group(
            OverrideGroup::StringTyped,
            json(r#"{"key1": "value1", "key2": "value2"}"#),
        );
        assert_eq!(
            values.values_options().unwrap(),
            " --set-string key1=value1,key2=value2"
        );
    }

    #[test]
    fn test_file_value_overrides() {
        let values = ValueOverride::default().with_group(
            OverrideGroup::FilePath,
            json(r#"{"key1": "path/to/file1.txt", "key2": "D:/absolute/path/to/file2.txt"}"#),
        );
        assert_eq!(
            values.values_options().unwrap(),
            " --set-file key1=path/to/file1.txt,key2=D:/absolute/path/to/file2.txt"
        );
    }

    #[test]
    fn test_values_yaml_file() {
        let values = ValueOverride::default().with_yaml_file("path/to/values.yaml");
        assert_eq!(values.values_options().unwrap(), " --values path/to/values.yaml");
    }

    #[test]
    fn test_blank_yaml_file_is_skipped() {
        let values = ValueOverride::default().with_yaml_file("   ");
        assert_eq!(values.values_options().unwrap(), "");
    }

    #[test]
    fn test_all_overrides_used_together() {
        let values = ValueOverride::default()
            .with_yaml_file("path/to/values.yaml")
            .with_group(
                OverrideGroup::FilePath,
                json(r#"{"fkey1": "path/to/file1.txt", "fkey2": "D:/absolute/path/to/file2.txt"}"#),
            )
            .with_group(
                OverrideGroup::StringTyped,
                json(r#"{"skey1": "svalue1", "skey2": "svalue2"}"#),
            )
            .with_group(OverrideGroup::Plain, json(r#"{"key1": "value1", "key2": "value2"}"#));

        insta::assert_snapshot!(
            values.values_options().unwrap().trim_start(),
            @"--set key1=value1,key2=value2 --set-string skey1=svalue1,skey2=svalue2 --set-file fkey1=path/to/file1.txt,fkey2=D:/absolute/path/to/file2.txt --values path/to/values.yaml"
        );
    }

    #[test]
    fn test_empty_groups_contribute_nothing() {
        let values = ValueOverride::default()
            .with_group(OverrideGroup::Plain, json("{}"))
            .with_group(OverrideGroup::StringTyped, json(r#"{"a": {}}"#))
            .with_group(OverrideGroup::FilePath, json(r#"{"f": "x.txt"}"#));
        assert_eq!(values.values_options().unwrap(), " --set-file f=x.txt");
    }

    #[test]
    fn test_embedded_json_string_is_parsed() {
        let values = ValueOverride::default().with_group(
            OverrideGroup::Plain,
            ValueTree::from(r#"{"image": {"tag": "1.2.3"}, "hosts": ["a", "b"]}"#),
        );
        assert_eq!(
            values.values_options().unwrap(),
            " --set hosts[0]=a,hosts[1]=b,image.tag=1.2.3"
        );
    }

    #[test]
    fn test_malformed_embedded_json_fails() {
        let values = ValueOverride::default()
            .with_group(OverrideGroup::Plain, ValueTree::from(r#"{"image": "#));
        assert!(matches!(values.values_options(), Err(CoreError::JsonParse(_))));
    }

    #[test]
    fn test_bare_scalar_group_is_invalid() {
        let values = ValueOverride::default()
            .with_group(OverrideGroup::StringTyped, ValueTree::from("value"));
        match values.values_options() {
            Err(CoreError::InvalidOverrideGroup { group, .. }) => {
                assert_eq!(group, "stringOverrides")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_shape_propagates() {
        let values =
            ValueOverride::default().with_group(OverrideGroup::Plain, json(r#"{"x": [["a"]]}"#));
        assert!(matches!(
            values.values_options(),
            Err(CoreError::UnsupportedShape { ref path }) if path == "x[0]"
        ));
    }

    #[test]
    fn test_deserialize_from_yaml_config() {
        let values: ValueOverride = serde_yaml::from_str(
            r#"
overrides:
  image:
    tag: "2.0"
stringOverrides: '{"build": "0042"}'
yamlFile: ci/values.yaml
"#,
        )
        .unwrap();

        insta::assert_snapshot!(
            values.values_options().unwrap().trim_start(),
            @"--set image.tag=2.0 --set-string build=0042 --values ci/values.yaml"
        );
    }

    #[test]
    fn test_merge_into_base() {
        let base = ValueTree::from_yaml(
            r#"
replicas: 1
ingress:
  annotations:
    a: "0"
    b: "0"
"#,
        )
        .unwrap()
        .into_mapping("base")
        .unwrap();

        let values = ValueOverride::default().with_group(
            OverrideGroup::Plain,
            json(r#"{"replicas": 2, "ingress": {"^annotations^": {"a": "1"}}}"#),
        );

        let merged = ValueTree::Mapping(values.merge_into(base).unwrap().unwrap());

        assert_eq!(merged.get(&["replicas"]), Some(&ValueTree::from(2i64)));
        assert_eq!(
            merged.get(&["ingress", "annotations"]),
            Some(&[("a", "1")].into_iter().collect::<ValueTree>())
        );
    }

    #[test]
    fn test_merge_into_without_plain_overrides() {
        let values = ValueOverride::default()
            .with_group(OverrideGroup::StringTyped, json(r#"{"a": "1"}"#));
        assert_eq!(values.merge_into(Mapping::new()).unwrap(), None);
    }
}
