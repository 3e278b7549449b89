//! CSV export of the filtered row set.

use crate::model::ResourceWrapper;
use crate::table::Column;
use crate::{DashboardError, DashboardResult};

/// Download filename offered to the user for CSV snapshots.
pub const EXPORT_FILE_NAME: &str = "healthcare-resources.csv";

/// Serializes the given rows to CSV.
///
/// The snapshot reflects the filtered (not paginated) row set at the time of
/// export, in current sort order: callers pass the output of
/// [`crate::TableState::filtered_rows`]. The header row carries the column
/// display names and every field is quoted.
pub fn csv_export(rows: &[&ResourceWrapper]) -> DashboardResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(Column::ALL.iter().map(|column| column.header()))?;
    for row in rows {
        writer.write_record(Column::ALL.iter().map(|column| column.value(row)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(DashboardError::CsvUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_resources;
    use crate::table::{SortDirection, TableAction, TableState};

    #[test]
    fn test_unfiltered_export_has_one_row_per_record() {
        let data = sample_resources();
        let state = TableState::new();
        let csv = csv_export(&state.filtered_rows(&data)).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1 + data.len());
        assert_eq!(
            lines[0],
            "\"Resource Key\",\"Patient ID\",\"Resource Type\",\"Status\",\"FHIR Version\",\"Created\",\"Summary\""
        );
        // Rows appear in current (here: collection) order.
        assert!(lines[1].starts_with("\"patient-001\""));
        assert!(lines[6].starts_with("\"encounter-001\""));
    }

    #[test]
    fn test_export_reflects_sort_order() {
        let data = sample_resources();
        let state = TableState::new().apply(TableAction::SetSort(Some((
            Column::Key,
            SortDirection::Descending,
        ))));
        let csv = csv_export(&state.filtered_rows(&data)).unwrap();

        let mut expected: Vec<String> = data.iter().map(|r| r.key().to_string()).collect();
        expected.sort();
        expected.reverse();
        let first_cells: Vec<String> = csv
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap().trim_matches('"').to_string())
            .collect();
        assert_eq!(first_cells, expected);
    }

    #[test]
    fn test_export_reflects_filters_not_pagination() {
        let data = sample_resources();
        // "2024" matches the Created column of every record, so all six rows
        // survive the filter while the page view holds only five.
        let state = TableState::new().apply(TableAction::SetSearch("2024".to_string()));
        assert_eq!(state.page_rows(&data).len(), 5);

        let csv = csv_export(&state.filtered_rows(&data)).unwrap();
        assert_eq!(csv.lines().count(), 1 + data.len());
    }

    #[test]
    fn test_export_quotes_and_escapes_fields() {
        let mut data = sample_resources();
        data[0].resource.human_readable_str = "Summary with \"quotes\", and a comma".to_string();
        let state = TableState::new();
        let csv = csv_export(&state.filtered_rows(&data)).unwrap();
        assert!(csv.contains("\"Summary with \"\"quotes\"\", and a comma\""));
    }
}
