//! Analyte layout loading.
//!
//! The layout file lists the analyte columns to plot, tab-delimited within a
//! line and newline-delimited across lines. Order is preserved; duplicates
//! are permitted and harmless downstream.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::IngestError;

/// Load the ordered analyte list from a layout file.
pub fn load_layout(path: &Path) -> Result<Vec<String>, IngestError> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::Layout {
        path: path.to_path_buf(),
        source,
    })?;
    let analytes = parse_layout(&contents);
    debug!(path = %path.display(), analytes = analytes.len(), "layout loaded");
    Ok(analytes)
}

fn parse_layout(contents: &str) -> Vec<String> {
    contents
        .lines()
        .flat_map(|line| line.trim().split('\t'))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{load_layout, parse_layout};

    #[test]
    fn order_and_duplicates_are_preserved() {
        let parsed = parse_layout("IgG\tIgM\nIgA\nIgG\n");
        assert_eq!(parsed, ["IgG", "IgM", "IgA", "IgG"]);
    }

    #[test]
    fn blank_lines_and_empty_fields_are_skipped() {
        let parsed = parse_layout("IgG\t\t IgM \n\n   \nIgA");
        assert_eq!(parsed, ["IgG", "IgM", "IgA"]);
    }

    #[test]
    fn load_layout_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output-layout.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "IgG\tIgM").unwrap();
        writeln!(file, "IgA").unwrap();
        assert_eq!(load_layout(&path).unwrap(), ["IgG", "IgM", "IgA"]);

        let missing = dir.path().join("absent.txt");
        assert!(load_layout(&missing).is_err());
    }
}
