use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatchReader;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Restaurant, RestaurantTable};

pub const CITY: &str = "city";
pub const CUISINES: &str = "cuisines";
pub const AGGREGATE_RATING: &str = "aggregate_rating";
pub const AVERAGE_COST_FOR_TWO: &str = "average_cost_for_two";
pub const VOTES: &str = "votes";
pub const HAS_ONLINE_DELIVERY: &str = "has_online_delivery";

/// Cell texts read as missing values, on top of the empty string.
const NULL_MARKERS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "NULL"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a restaurant table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per field
/// * `.json`    – `[{ "City": "...", "Cuisines": "...", ... }, ...]`
/// * anything else is read as comma-delimited text, decoded as Latin-1
pub fn load_file(path: &Path) -> Result<RestaurantTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let frame = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        _ => read_csv(open(path)?)?,
    };

    let table = build_table(frame)?;
    log::info!(
        "Loaded {} restaurants ({} cities) from {} with columns {:?}",
        table.len(),
        table.cities.len(),
        path.display(),
        table.column_names
    );
    Ok(table)
}

/// Parse delimited text from any reader.
pub fn load_reader<R: Read>(reader: R) -> Result<RestaurantTable, LoadError> {
    build_table(read_csv(reader)?)
}

/// `"Average Cost for two"` → `"average_cost_for_two"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Raw frame → typed table
// ---------------------------------------------------------------------------

/// Header plus untyped rows, as produced by every format reader.
struct RawFrame {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

fn build_table(frame: RawFrame) -> Result<RestaurantTable, LoadError> {
    let columns: Vec<String> = frame
        .columns
        .iter()
        .map(|c| normalize_column_name(c))
        .collect();

    let index_of = |name: &'static str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let city_idx = index_of(CITY)?;
    let cuisines_idx = index_of(CUISINES)?;
    let rating_idx = index_of(AGGREGATE_RATING)?;
    let cost_idx = index_of(AVERAGE_COST_FOR_TWO)?;
    let votes_idx = index_of(VOTES)?;
    let delivery_idx = index_of(HAS_ONLINE_DELIVERY)?;

    let mut restaurants = Vec::with_capacity(frame.rows.len());
    let mut dropped = 0;

    for (row_no, cells) in frame.rows.into_iter().enumerate() {
        let cell = |i: usize| cells.get(i).unwrap_or(&CellValue::Null);

        let Some(cuisines) = cell(cuisines_idx).as_text() else {
            dropped += 1;
            continue;
        };

        let city = cell(city_idx).as_text().unwrap_or_default();
        let aggregate_rating = parse_float(cell(rating_idx), row_no, AGGREGATE_RATING)?;
        let average_cost_for_two = parse_count(cell(cost_idx), row_no, AVERAGE_COST_FOR_TWO)?;
        let votes = parse_count(cell(votes_idx), row_no, VOTES)?;
        let has_online_delivery = cell(delivery_idx).as_text();

        restaurants.push(Restaurant {
            city,
            cuisines,
            aggregate_rating,
            average_cost_for_two,
            votes,
            has_online_delivery,
            cells,
        });
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows without cuisines");
    }

    Ok(RestaurantTable::from_restaurants(columns, restaurants, dropped))
}

fn parse_float(
    cell: &CellValue,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    let parsed;
    let cell = match cell {
        CellValue::String(text) => {
            parsed = parse_number_text(text);
            &parsed
        }
        other => other,
    };
    match cell {
        CellValue::Null => Ok(None),
        CellValue::Integer(_) | CellValue::Float(_) => {
            Ok(cell.as_f64().filter(|v| !v.is_nan()))
        }
        other => Err(LoadError::InvalidNumber {
            row,
            column,
            value: other.to_string(),
            expected: "number",
        }),
    }
}

fn parse_count(
    cell: &CellValue,
    row: usize,
    column: &'static str,
) -> Result<Option<u32>, LoadError> {
    let parsed;
    let cell = match cell {
        CellValue::String(text) => {
            parsed = parse_number_text(text);
            &parsed
        }
        other => other,
    };
    let value = match cell {
        CellValue::Null => return Ok(None),
        CellValue::Float(f) if f.is_nan() => return Ok(None),
        CellValue::Integer(i) => u32::try_from(*i).ok(),
        CellValue::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
            Some(*f as u32)
        }
        _ => None,
    };
    value.map(Some).ok_or_else(|| LoadError::InvalidNumber {
        row,
        column,
        value: cell.to_string(),
        expected: "non-negative integer",
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Header row with column names, one restaurant per line. Every byte is
/// decoded as Latin-1 so no input fails on encoding. Cells keep their text;
/// only the numeric columns are parsed, in [`build_table`]. Short rows are
/// padded with nulls, rows wider than the header are rejected.
fn read_csv<R: Read>(reader: R) -> Result<RawFrame, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns: Vec<String> = reader.byte_headers()?.iter().map(decode_latin1).collect();

    let mut rows = Vec::new();
    for (row_no, record) in reader.byte_records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(LoadError::UnsupportedLayout(format!(
                "row {row_no} has {} fields but the header has {}",
                record.len(),
                columns.len()
            )));
        }
        let mut row: Vec<CellValue> = record
            .iter()
            .map(|field| text_cell(decode_latin1(field)))
            .collect();
        row.resize(columns.len(), CellValue::Null);
        rows.push(row);
    }

    Ok(RawFrame { columns, rows })
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn text_cell(s: String) -> CellValue {
    if s.is_empty() || NULL_MARKERS.contains(&s.as_str()) {
        CellValue::Null
    } else {
        CellValue::String(s)
    }
}

/// Numeric reading of a text cell; text that is not a number stays as is.
fn parse_number_text(text: &str) -> CellValue {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::String(text.to_string())
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "City": "Delhi", "Cuisines": "North Indian, Chinese", "Votes": 50, ... },
///   ...
/// ]
/// ```
///
/// Keys missing from a record read as nulls.
fn read_json(path: &Path) -> Result<RawFrame, LoadError> {
    let mut bytes = Vec::new();
    open(path)?
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let root: JsonValue = serde_json::from_slice(&bytes)?;

    let records = root.as_array().ok_or_else(|| {
        LoadError::UnsupportedLayout("expected a top-level JSON array of records".into())
    })?;

    let mut objects = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            LoadError::UnsupportedLayout(format!("record {i} is not a JSON object"))
        })?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok(RawFrame { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Column names go through the same
/// normalisation as CSV headers.
fn read_parquet(path: &Path) -> Result<RawFrame, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?.build()?;
    let columns: Vec<String> = reader
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            rows.push(batch.columns().iter().map(|col| arrow_cell(col, row)).collect());
        }
    }

    Ok(RawFrame { columns, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => match i64::try_from(col.as_primitive::<UInt64Type>().value(row)) {
            Ok(i) => CellValue::Integer(i),
            Err(_) => CellValue::Float(col.as_primitive::<UInt64Type>().value(row) as f64),
        },
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        _ => arrow::util::display::array_value_to_string(col, row)
            .map(CellValue::String)
            .unwrap_or(CellValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use rstest::rstest;

    use super::*;
    use crate::data::fixtures::{sample_table, SAMPLE_CSV};

    const HEADER: &str =
        "City,Cuisines,Aggregate Rating,Average Cost for Two,Votes,Has Online Delivery\n";

    #[rstest]
    #[case::title_case("Average Cost for two", "average_cost_for_two")]
    #[case::already_normal("votes", "votes")]
    #[case::padded(" Has Online delivery ", "has_online_delivery")]
    fn normalises_column_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_column_name(raw), expected);
    }

    #[test]
    fn drops_exactly_the_rows_without_cuisines() {
        let original_rows = SAMPLE_CSV.lines().count() - 1;
        let table = sample_table();

        assert_eq!(table.dropped_rows, 1);
        assert_eq!(table.len(), original_rows - 1);
        assert!(table.restaurants.iter().all(|r| !r.cuisines.is_empty()));
        assert!(!table.restaurants.iter().any(|r| r.cells[0].to_string() == "Cafe Noir"));
    }

    #[test]
    fn types_the_core_columns() {
        let table = sample_table();
        let first = &table.restaurants[0];

        assert_eq!(first.city, "Delhi");
        assert_eq!(first.cuisines, "North Indian, Chinese");
        assert_eq!(first.aggregate_rating, Some(4.0));
        assert_eq!(first.average_cost_for_two, Some(600));
        assert_eq!(first.votes, Some(50));
        assert_eq!(first.has_online_delivery.as_deref(), Some("Yes"));
        assert_eq!(first.cells.len(), table.column_names.len());

        let missing_rating = &table.restaurants[5];
        assert_eq!(missing_rating.aggregate_rating, None);
        assert_eq!(missing_rating.votes, Some(0));
    }

    #[test]
    fn decodes_non_utf8_bytes_as_latin1() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"S\xe3o Paulo,Caf\xe9,4.1,300,12,No\n");

        let table = load_reader(bytes.as_slice()).unwrap();
        assert_eq!(table.restaurants[0].city, "São Paulo");
        assert_eq!(table.restaurants[0].cuisines, "Café");
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let csv = "City,Cuisines,Votes\nDelhi,Chinese,3\n";
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(AGGREGATE_RATING)));
    }

    #[rstest]
    #[case::text_rating("Delhi,Chinese,great,300,12,No\n", AGGREGATE_RATING)]
    #[case::negative_cost("Delhi,Chinese,4.0,-5,12,No\n", AVERAGE_COST_FOR_TWO)]
    #[case::fractional_votes("Delhi,Chinese,4.0,300,1.5,No\n", VOTES)]
    fn invalid_numbers_are_load_errors(#[case] line: &str, #[case] bad_column: &str) {
        let csv = format!("{HEADER}{line}");
        match load_reader(csv.as_bytes()) {
            Err(LoadError::InvalidNumber { column, row, .. }) => {
                assert_eq!(column, bad_column);
                assert_eq!(row, 0);
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let csv = format!("{HEADER}Delhi,Chinese,4.0,300\nDelhi,Thai,3.9,500,7,Yes\n");
        let table = load_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let short = &table.restaurants[0];
        assert_eq!(short.average_cost_for_two, Some(300));
        assert_eq!(short.votes, None);
        assert_eq!(short.has_online_delivery, None);
        assert_eq!(short.cells.len(), table.column_names.len());
        assert_eq!(table.restaurants[1].has_online_delivery.as_deref(), Some("Yes"));
    }

    #[test]
    fn rows_wider_than_the_header_are_rejected() {
        let csv = format!("{HEADER}Delhi,Chinese,4.0,300,12,No,extra\n");
        assert!(matches!(
            load_reader(csv.as_bytes()),
            Err(LoadError::UnsupportedLayout(_))
        ));
    }

    #[test]
    fn text_cells_keep_their_source_spelling() {
        let csv = format!("{HEADER}True,1.50,4.0,0300,12,TRUE\n");
        let table = load_reader(csv.as_bytes()).unwrap();
        let row = &table.restaurants[0];

        assert_eq!(row.city, "True");
        assert_eq!(row.cuisines, "1.50");
        assert_eq!(row.has_online_delivery.as_deref(), Some("TRUE"));
        assert_eq!(row.aggregate_rating, Some(4.0));
        assert_eq!(row.average_cost_for_two, Some(300));
        assert_eq!(row.cells[2].to_string(), "4.0");
        assert_eq!(table.cities, vec!["True"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/definitely/not/here/zomato.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn loads_json_records() {
        let path = std::env::temp_dir().join(format!("restaurants-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[
                {"City": "Delhi", "Cuisines": "Chinese", "Aggregate rating": 4.1,
                 "Average Cost for two": 500, "Votes": 9, "Has Online delivery": "Yes"},
                {"City": "Delhi", "Cuisines": null, "Aggregate rating": 3.0,
                 "Average Cost for two": 200, "Votes": 1, "Has Online delivery": "No"}
            ]"#,
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
        assert_eq!(table.dropped_rows, 1);
        assert_eq!(table.restaurants[0].average_cost_for_two, Some(500));
    }

    #[test]
    fn loads_parquet_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("City", DataType::Utf8, false),
            Field::new("Cuisines", DataType::Utf8, true),
            Field::new("Aggregate rating", DataType::Float64, true),
            Field::new("Average Cost for two", DataType::Int64, true),
            Field::new("Votes", DataType::Int64, true),
            Field::new("Has Online delivery", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Delhi", "Mumbai"])),
                Arc::new(StringArray::from(vec![Some("Chinese, Thai"), None])),
                Arc::new(Float64Array::from(vec![3.9, 4.4])),
                Arc::new(Int64Array::from(vec![700, 800])),
                Arc::new(Int64Array::from(vec![40, 60])),
                Arc::new(StringArray::from(vec!["No", "Yes"])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("restaurants-{}.parquet", std::process::id()));
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
        assert_eq!(table.dropped_rows, 1);
        assert_eq!(table.restaurants[0].cuisines, "Chinese, Thai");
        assert_eq!(table.restaurants[0].aggregate_rating, Some(3.9));
        assert_eq!(table.column_names[3], AVERAGE_COST_FOR_TWO);
    }
}
