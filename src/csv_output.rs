//! CSV output format for detection results
//!
//! Rows use the fixed result column order. Missing values are empty fields;
//! undefined trends are written as `NaN`.

use crate::results::{ResultTable, TrendRecord, View, RESULT_COLUMNS};

/// Escape CSV field (handle commas, quotes, newlines)
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_record(record: &TrendRecord) -> String {
    let fields = [
        escape_field(&record.feat1),
        escape_field(&record.feat2),
        escape_field(&record.trend_type),
        record.agg_trend.to_string(),
        record
            .group_feat
            .as_deref()
            .map(escape_field)
            .unwrap_or_default(),
        record
            .subgroup
            .as_ref()
            .map(|s| escape_field(&s.to_string()))
            .unwrap_or_default(),
        record
            .subgroup_trend
            .map(|v| v.to_string())
            .unwrap_or_default(),
    ];
    fields.join(",")
}

/// Result rows as CSV, header first
pub fn table_to_csv(table: &ResultTable) -> String {
    let mut output = String::new();
    output.push_str(&RESULT_COLUMNS.join(","));
    output.push('\n');

    for record in table {
        output.push_str(&format_record(record));
        output.push('\n');
    }
    output
}

/// Views as CSV; the `group_feat` column appears only for colored views
pub fn views_to_csv(views: &[View], colored: bool) -> String {
    let mut output = String::new();
    output.push_str(if colored {
        "feat1,feat2,group_feat\n"
    } else {
        "feat1,feat2\n"
    });

    for view in views {
        output.push_str(&escape_field(&view.feat1));
        output.push(',');
        output.push_str(&escape_field(&view.feat2));
        if colored {
            output.push(',');
            if let Some(g) = &view.group_feat {
                output.push_str(&escape_field(g));
            }
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TrendRecord {
        TrendRecord {
            feat1: "X".to_string(),
            feat2: "Y".to_string(),
            trend_type: "pearson_corr".to_string(),
            agg_trend: 0.8,
            group_feat: Some("G".to_string()),
            subgroup: Some("a".into()),
            subgroup_trend: Some(-0.5),
        }
    }

    #[test]
    fn test_csv_header() {
        let csv = table_to_csv(&ResultTable::new());
        assert_eq!(
            csv,
            "feat1,feat2,trend_type,agg_trend,group_feat,subgroup,subgroup_trend\n"
        );
    }

    #[test]
    fn test_csv_row() {
        let csv = table_to_csv(&ResultTable::from_records(vec![record()]));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "X,Y,pearson_corr,0.8,G,a,-0.5");
    }

    #[test]
    fn test_csv_aggregate_only_row_has_empty_fields() {
        let mut r = record();
        r.group_feat = None;
        r.subgroup = None;
        r.subgroup_trend = None;
        let csv = table_to_csv(&ResultTable::from_records(vec![r]));
        assert!(csv.ends_with("X,Y,pearson_corr,0.8,,,\n"));
    }

    #[test]
    fn test_csv_nan_trend() {
        let mut r = record();
        r.subgroup_trend = Some(f64::NAN);
        let csv = table_to_csv(&ResultTable::from_records(vec![r]));
        assert!(csv.ends_with(",a,NaN\n"));
    }

    #[test]
    fn test_csv_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_views() {
        let views = vec![View {
            feat1: "X".to_string(),
            feat2: "Y, cm".to_string(),
            group_feat: Some("G".to_string()),
        }];
        assert_eq!(views_to_csv(&views, true), "feat1,feat2,group_feat\nX,\"Y, cm\",G\n");

        let plain = vec![View {
            feat1: "X".to_string(),
            feat2: "Y".to_string(),
            group_feat: None,
        }];
        assert_eq!(views_to_csv(&plain, false), "feat1,feat2\nX,Y\n");
    }
}
