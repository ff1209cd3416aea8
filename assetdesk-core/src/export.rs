//! CSV export of the visible asset rows.

use crate::entities::Asset;
use crate::error::ExportError;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 6] = ["Asset ID", "Name", "Category", "Status", "Value", "Assigned Date"];

/// Quotes a field when it contains a comma, quote or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn row(asset: &Asset) -> [String; 6] {
    [
        asset.asset_code.clone(),
        asset.name.clone(),
        asset.category.clone(),
        asset.status.as_wire_str().to_string(),
        format_value(asset.value),
        asset.created_at.format("%Y-%m-%d").to_string(),
    ]
}

/// Renders header plus one line per row, in the given order.
pub fn assets_to_csv<'a>(rows: impl IntoIterator<Item = &'a Asset>) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for asset in rows {
        let line: Vec<String> = row(asset).iter().map(|f| escape_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// `<branch>_assets.csv`, or `assets.csv` without a branch.
pub fn export_file_name(branch_name: Option<&str>) -> String {
    match branch_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => {
            let safe: String = name
                .chars()
                .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
                .collect();
            format!("{}_assets.csv", safe)
        }
        None => "assets.csv".to_string(),
    }
}

/// Writes the rows to `dir/<file name>` and returns the written path.
pub fn write_assets_csv(
    dir: &Path,
    branch_name: Option<&str>,
    rows: &[&Asset],
) -> Result<PathBuf, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(export_file_name(branch_name));
    let csv = assets_to_csv(rows.iter().copied());
    std::fs::write(&path, csv).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::AssetStatus;
    use crate::identity::{AssetId, BranchId, EntityIdType};
    use chrono::{TimeZone, Utc};

    fn asset(code: &str, name: &str, value: f64) -> Asset {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "assetId": code,
            "name": name,
            "category": "Furniture",
            "status": "Active",
            "value": value,
            "branchId": 1,
            "createdAt": "2024-03-05T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn csv_has_header_and_rows_in_order() {
        let a = asset("FUR-0001", "Desk, oak", 1500.0);
        let b = asset("FUR-0002", "Chair", 99.5);
        let csv = assets_to_csv([&a, &b]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Asset ID,Name,Category,Status,Value,Assigned Date");
        assert_eq!(lines[1], "FUR-0001,\"Desk, oak\",Furniture,Active,1500,2024-03-05");
        assert_eq!(lines[2], "FUR-0002,Chair,Furniture,Active,99.5,2024-03-05");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn file_name_uses_branch() {
        assert_eq!(export_file_name(Some("Kandy")), "Kandy_assets.csv");
        assert_eq!(export_file_name(Some("A/B")), "A_B_assets.csv");
        assert_eq!(export_file_name(None), "assets.csv");
        assert_eq!(export_file_name(Some("  ")), "assets.csv");
    }

    #[test]
    fn empty_export_is_refused() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            write_assets_csv(&dir, None, &[]),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn built_asset_matches_wire_status() {
        let mut a = asset("X", "Y", 1.0);
        a.status = AssetStatus::InUse;
        a.id = AssetId::new(2);
        a.branch_id = BranchId::new(4);
        a.created_at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(row(&a)[3], "In Use");
        assert_eq!(row(&a)[5], "2023-12-31");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn asset_named(name: &str) -> Asset {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "assetId": "GEN-0001",
            "name": name,
            "category": "Computer",
            "status": "Damaged",
            "value": 10.0,
            "branchId": 1,
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    proptest! {
        #[test]
        fn prop_one_line_per_row(names in prop::collection::vec("[a-zA-Z ,\"]{0,12}", 0..20)) {
            let assets: Vec<Asset> = names.iter().map(|n| asset_named(n)).collect();
            let csv = assets_to_csv(&assets);
            // Generated names never contain line breaks, so physical lines map 1:1 to records.
            prop_assert_eq!(csv.lines().count(), assets.len() + 1);
        }

        #[test]
        fn prop_escaped_field_has_balanced_quotes(field in ".{0,24}") {
            let escaped = escape_field(&field);
            prop_assert_eq!(escaped.matches('"').count() % 2, 0);
        }
    }
}
