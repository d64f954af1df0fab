//! Chart directory discovery

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{CliError, Result};

/// Chart manifest file name, matched case-insensitively
pub const CHART_FILE: &str = "Chart.yaml";

/// Find every directory below `root` that holds a chart manifest
///
/// Directories matching one of the `excludes` glob patterns are skipped.
/// Patterns are matched against the path relative to `root` and against the
/// full path. The result is sorted.
pub fn find_chart_directories(root: &Path, excludes: &[String]) -> Result<Vec<PathBuf>> {
    let patterns = excludes
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                CliError::config_with_help(
                    format!("invalid exclude pattern '{}': {}", p, e),
                    "Excludes are glob patterns such as '**/test-*'",
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if !root.is_dir() {
        return Err(CliError::chart(format!(
            "chart directory not found: {}",
            root.display()
        )));
    }

    let mut charts = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| {
            CliError::chart(format!("unable to scan chart directory at {}: {}", root.display(), e))
        })?;

        let is_chart_file = entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(CHART_FILE));
        if !is_chart_file {
            continue;
        }

        let Some(dir) = entry.path().parent() else {
            continue;
        };
        if is_excluded(dir, root, &patterns) {
            tracing::debug!(dir = %dir.display(), "skipping excluded chart directory");
            continue;
        }
        charts.push(dir.to_path_buf());
    }

    charts.sort();
    charts.dedup();

    if charts.is_empty() {
        tracing::warn!(
            root = %root.display(),
            "no charts detected - no Chart.yaml files found"
        );
    }

    Ok(charts)
}

fn is_excluded(dir: &Path, root: &Path, patterns: &[Pattern]) -> bool {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    patterns
        .iter()
        .any(|p| p.matches_path(relative) || p.matches_path(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add_chart(root: &Path, dir: &str, file_name: &str) {
        let path = root.join(dir);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join(file_name), "apiVersion: v2\nname: test\nversion: 0.1.0\n").unwrap();
    }

    #[test]
    fn test_finds_nested_charts_sorted() {
        let root = TempDir::new().unwrap();
        add_chart(root.path(), "web", "Chart.yaml");
        add_chart(root.path(), "api", "chart.yaml");
        add_chart(root.path(), "web/charts/redis", "Chart.yaml");

        let charts = find_chart_directories(root.path(), &[]).unwrap();

        assert_eq!(
            charts,
            vec![
                root.path().join("api"),
                root.path().join("web"),
                root.path().join("web/charts/redis"),
            ]
        );
    }

    #[test]
    fn test_excludes_are_applied() {
        let root = TempDir::new().unwrap();
        add_chart(root.path(), "web", "Chart.yaml");
        add_chart(root.path(), "exclude1", "Chart.yaml");
        add_chart(root.path(), "nested/exclude2", "Chart.yaml");

        let charts = find_chart_directories(
            root.path(),
            &["exclude1".to_string(), "**/exclude2".to_string()],
        )
        .unwrap();

        assert_eq!(charts, vec![root.path().join("web")]);
    }

    #[test]
    fn test_no_charts_is_empty() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("values.yaml"), "a: 1\n").unwrap();
        assert!(find_chart_directories(root.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let root = TempDir::new().unwrap();
        let err = find_chart_directories(&root.path().join("missing"), &[]).unwrap_err();
        assert!(matches!(err, CliError::Chart { .. }));
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let root = TempDir::new().unwrap();
        let err = find_chart_directories(root.path(), &["[".to_string()]).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
