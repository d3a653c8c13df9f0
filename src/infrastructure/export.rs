use crate::domain::market::feature_table::FeatureTable;
use std::io::Write;

/// Writes `table` as CSV with a leading `Date` column; undefined cells are
/// empty fields.
pub fn write_csv<W: Write>(table: &FeatureTable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header: Vec<&str> = std::iter::once("Date").chain(table.column_names()).collect();
    wtr.write_record(&header)?;

    for (i, date) in table.index().iter().enumerate() {
        let record: Vec<String> = std::iter::once(date.format("%Y-%m-%d").to_string())
            .chain(
                table
                    .row(i)
                    .into_iter()
                    .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            )
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `table` as pretty JSON: symbol, date index and named columns,
/// undefined cells as `null`.
pub fn write_json<W: Write>(table: &FeatureTable, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::ohlcv::{DailyBar, OhlcvTable};
    use crate::domain::market::series::Series;
    use chrono::NaiveDate;

    fn table() -> FeatureTable {
        let bars: Vec<DailyBar> = (0..2)
            .map(|i| DailyBar {
                date: NaiveDate::from_ymd_opt(2024, 4, 1 + i).unwrap(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 100.0,
            })
            .collect();
        FeatureTable::from_ohlcv(&OhlcvTable::from_bars("T", &bars).unwrap())
            .with_column("Lag", Series::from(vec![1.5, 1.5]).lag(1))
            .unwrap()
    }

    #[test]
    fn test_csv_undefined_cells_are_empty() {
        let mut out = Vec::new();
        write_csv(&table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume,Lag");
        assert_eq!(lines[1], "2024-04-01,1,2,0.5,1.5,100,");
        assert_eq!(lines[2], "2024-04-02,1,2,0.5,1.5,100,1.5");
    }

    #[test]
    fn test_json_uses_null_for_undefined() {
        let mut out = Vec::new();
        write_json(&table(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["symbol"], "T");
        let lag = &value["columns"][5];
        assert_eq!(lag["name"], "Lag");
        assert!(lag["values"][0].is_null());
        assert_eq!(lag["values"][1], 1.5);
    }
}
