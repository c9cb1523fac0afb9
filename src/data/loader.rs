use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Field, Listing, MISSING_COLOR};

/// Columns a source must provide; rows missing any of them are dropped.
const REQUIRED: [Field; 4] = [Field::Odometer, Field::Price, Field::Model, Field::Year];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// RawValue – an uncleaned cell, whatever the source format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl RawValue {
    fn as_f64(&self) -> Option<f64> {
        let v = match self {
            RawValue::Float(v) => *v,
            RawValue::Integer(i) => *i as f64,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Bool(_) | RawValue::Null => return None,
        };
        (!v.is_nan()).then_some(v)
    }

    /// Integral value; pandas writes integer columns with gaps as `2011.0`.
    fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            _ => {
                let v = self.as_f64()?;
                (v.fract() == 0.0 && v.is_finite()).then_some(v as i64)
            }
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) if s.is_empty() => None,
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Float(v) if v.is_nan() => None,
            RawValue::Float(v) => Some(v.to_string()),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Null => None,
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            RawValue::Bool(b) => *b,
            RawValue::Integer(i) => *i != 0,
            RawValue::Float(v) => *v != 0.0 && !v.is_nan(),
            RawValue::Text(s) => matches!(
                s.trim().to_lowercase().as_str(),
                "true" | "1" | "1.0" | "yes" | "sí" | "si"
            ),
            RawValue::Null => false,
        }
    }
}

/// One source row keyed by the columns we know about.
pub type RawRecord = BTreeMap<Field, RawValue>;

fn field_for_column(name: &str) -> Option<Field> {
    Field::ALL
        .iter()
        .copied()
        .find(|f| f.source_name() == name.trim())
}

fn check_required(columns: &BTreeSet<Field>) -> Result<(), DatasetError> {
    match REQUIRED.iter().find(|f| !columns.contains(f)) {
        Some(f) => Err(DatasetError::MissingColumn(f.source_name())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean a listings file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names
/// * `.json`    – `[{ "price": 9400, "model": "bmw x5", ... }, ...]`
/// * `.parquet` – flat columns of string / integer / float / boolean type
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)?
        }
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DatasetError::UnsupportedExtension(other.to_string()).into()),
    };

    let total = records.len();
    let dataset = Dataset::from_listings(clean_records(records));
    log::info!(
        "Loaded {} from {}: {} rows kept, {} dropped",
        ext,
        path.display(),
        dataset.len(),
        total - dataset.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Turn raw rows into listings, silently dropping rows with a missing
/// required field or a negative odometer/price. Order is preserved.
pub fn clean_records(records: Vec<RawRecord>) -> Vec<Listing> {
    records.iter().filter_map(clean_record).collect()
}

fn clean_record(rec: &RawRecord) -> Option<Listing> {
    static NULL: RawValue = RawValue::Null;
    let get = |f: Field| rec.get(&f).unwrap_or(&NULL);

    let odometer = get(Field::Odometer).as_f64().filter(|v| *v >= 0.0)?;
    let price = get(Field::Price).as_f64().filter(|v| *v >= 0.0)?;
    let model = get(Field::Model).as_text()?;
    let model_year = i32::try_from(get(Field::Year).as_i64()?).ok()?;

    Some(Listing {
        price,
        model_year,
        model,
        condition: get(Field::Condition).as_text(),
        cylinders: get(Field::Cylinders).as_f64(),
        fuel: get(Field::Fuel).as_text(),
        odometer,
        transmission: get(Field::Transmission).as_text(),
        vehicle_type: get(Field::VehicleType).as_text(),
        paint_color: get(Field::Color)
            .as_text()
            .unwrap_or_else(|| MISSING_COLOR.to_string()),
        four_wheel_drive: get(Field::FourWheelDrive).is_truthy(),
        date_posted: get(Field::DatePosted).as_text(),
        days_listed: get(Field::DaysListed).as_i64(),
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read CSV rows. Unknown columns are ignored, empty cells are null.
pub fn read_csv<R: Read>(source: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns: Vec<Option<Field>> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(field_for_column)
        .collect();
    let present: BTreeSet<Field> = columns.iter().flatten().copied().collect();
    check_required(&present)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {}", row_no + 2))?;
        let record = columns
            .iter()
            .zip(row.iter())
            .filter_map(|(field, value)| Some(((*field)?, guess_value(value))))
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn guess_value(s: &str) -> RawValue {
    if s.is_empty() {
        return RawValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return RawValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return RawValue::Float(f);
    }
    if s == "True" || s == "False" || s == "true" || s == "false" {
        return RawValue::Bool(s.eq_ignore_ascii_case("true"));
    }
    RawValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient="records")`.
fn read_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON {}", path.display()))?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<RawRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let record: RawRecord = obj
            .iter()
            .filter_map(|(key, val)| Some((field_for_column(key)?, json_to_raw(val))))
            .collect();
        seen.extend(record.keys().copied());
        records.push(record);
    }

    if !records.is_empty() {
        check_required(&seen)?;
    }
    Ok(records)
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::Text(s.clone()),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => RawValue::Integer(i),
            None => n.as_f64().map_or(RawValue::Null, RawValue::Float),
        },
        JsonValue::Bool(b) => RawValue::Bool(*b),
        JsonValue::Null => RawValue::Null,
        other => RawValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both Pandas (`df.to_parquet()`) and Polars.
fn read_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let known: Vec<(usize, Field)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| Some((i, field_for_column(f.name())?)))
        .collect();
    let present: BTreeSet<Field> = known.iter().map(|(_, f)| *f).collect();
    check_required(&present)?;

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let mut columns = Vec::with_capacity(known.len());
        for (idx, field) in &known {
            let values = column_values(batch.column(*idx))
                .with_context(|| format!("reading column '{}'", field.source_name()))?;
            columns.push((*field, values));
        }

        for row in 0..batch.num_rows() {
            records.push(
                columns
                    .iter()
                    .map(|(field, values)| (*field, values[row].clone()))
                    .collect(),
            );
        }
    }

    Ok(records)
}

/// Convert a whole Arrow column to raw values.
fn column_values(col: &ArrayRef) -> Result<Vec<RawValue>> {
    let n = col.len();
    let values = match col.data_type() {
        DataType::Null => vec![RawValue::Null; n],
        DataType::Boolean => {
            let arr = col.as_boolean_opt().context("expected BooleanArray")?;
            arr.iter()
                .map(|v| v.map_or(RawValue::Null, RawValue::Bool))
                .collect()
        }
        DataType::Utf8 => {
            let arr = col.as_string_opt::<i32>().context("expected StringArray")?;
            arr.iter()
                .map(|v| v.map_or(RawValue::Null, |s| RawValue::Text(s.to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_string_opt::<i64>()
                .context("expected LargeStringArray")?;
            arr.iter()
                .map(|v| v.map_or(RawValue::Null, |s| RawValue::Text(s.to_string())))
                .collect()
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let widened = cast(col, &DataType::Int64).context("casting to Int64")?;
            let arr = widened
                .as_primitive_opt::<Int64Type>()
                .context("expected Int64Array")?;
            arr.iter()
                .map(|v| v.map_or(RawValue::Null, RawValue::Integer))
                .collect()
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 | DataType::UInt64 => {
            let widened = cast(col, &DataType::Float64).context("casting to Float64")?;
            let arr = widened
                .as_primitive_opt::<Float64Type>()
                .context("expected Float64Array")?;
            arr.iter()
                .map(|v| v.map_or(RawValue::Null, RawValue::Float))
                .collect()
        }
        // Dates, timestamps, views: keep their text rendering.
        other => {
            let text = cast(col, &DataType::Utf8)
                .with_context(|| format!("cannot read {other:?} column as text"))?;
            return column_values(&text);
        }
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field as ArrowField, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::filter::{filtered_indices, FilterState, Range};
    use crate::data::stats::describe;

    const HEADER: &str = "price,model_year,model,condition,cylinders,fuel,odometer,transmission,type,paint_color,is_4wd,date_posted,days_listed\n";

    fn load_csv_str(body: &str) -> Vec<Listing> {
        let text = format!("{HEADER}{body}");
        clean_records(read_csv(text.as_bytes()).unwrap())
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let rows = load_csv_str(
            "9400,2011.0,bmw x5,good,6.0,gas,145000.0,automatic,SUV,,1.0,2018-06-23,19\n\
             25500,,ford f-150,good,6.0,gas,88705.0,automatic,pickup,white,1.0,2018-10-19,50\n\
             5500,2013.0,hyundai sonata,like new,4.0,gas,,automatic,sedan,red,,2019-02-07,79\n\
             1500,2003.0,,fair,8.0,gas,181613.0,automatic,pickup,,,2019-03-22,9\n\
             ,2017.0,chrysler 200,excellent,4.0,gas,80903.0,automatic,sedan,black,,2019-04-02,28\n",
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].model, "bmw x5");
        assert_eq!(rows[0].model_year, 2011);
    }

    #[test]
    fn drops_negative_price_and_odometer() {
        let rows = load_csv_str(
            "-1,2011,bmw x5,good,6,gas,145000,automatic,SUV,,,2018-06-23,19\n\
             100,2011,bmw x5,good,6,gas,-5,automatic,SUV,,,2018-06-23,19\n\
             0,2011,bmw x5,good,6,gas,0,automatic,SUV,,,2018-06-23,19\n",
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 0.0);
        assert_eq!(rows[0].odometer, 0.0);
    }

    #[test]
    fn fills_sentinel_defaults() {
        let rows = load_csv_str(
            "9400,2011,bmw x5,good,6,gas,145000,automatic,SUV,,1,2018-06-23,19\n\
             9400,2011,bmw x5,good,6,gas,145000,automatic,SUV,blue,,2018-06-23,19\n",
        );
        assert_eq!(rows[0].paint_color, "-");
        assert_eq!(rows[0].four_wheel_drive_label(), "Sí");
        assert_eq!(rows[1].paint_color, "blue");
        assert_eq!(rows[1].four_wheel_drive_label(), "No");
    }

    #[test]
    fn keeps_optional_fields() {
        let rows = load_csv_str("9400,2011,bmw x5,good,6.0,gas,145000,automatic,SUV,black,,2018-06-23,19\n");
        let l = &rows[0];
        assert_eq!(l.condition.as_deref(), Some("good"));
        assert_eq!(l.cylinders, Some(6.0));
        assert_eq!(l.fuel.as_deref(), Some("gas"));
        assert_eq!(l.transmission.as_deref(), Some("automatic"));
        assert_eq!(l.vehicle_type.as_deref(), Some("SUV"));
        assert_eq!(l.date_posted.as_deref(), Some("2018-06-23"));
        assert_eq!(l.days_listed, Some(19));
    }

    #[test]
    fn unparseable_numbers_count_as_missing() {
        let rows = load_csv_str(
            "abc,2011,bmw x5,good,6,gas,145000,automatic,SUV,,,2018-06-23,19\n\
             100,2011,bmw x5,good,six,gas,NaN,automatic,SUV,,,2018-06-23,19\n\
             100,2011,bmw x5,good,six,gas,10,automatic,SUV,,,2018-06-23,19\n",
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cylinders, None);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = read_csv("price,model,odometer\n1,a,2\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::MissingColumn("model_year"))
        ));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let recs = read_csv("model,model_year,price,odometer\nram 1500,2014,12000,99000\n".as_bytes())
            .unwrap();
        let rows = clean_records(recs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].paint_color, "-");
        assert!(!rows[0].four_wheel_drive);
    }

    #[test]
    fn thousand_rows_with_fifty_negative_prices() {
        let mut body = String::new();
        for i in 0..1000 {
            let price = if i % 20 == 0 { -100 } else { 1000 + i };
            body.push_str(&format!(
                "{price},{},toyota camry,good,4,gas,{},automatic,sedan,,,2019-01-01,10\n",
                2000 + i % 20,
                i * 10
            ));
        }
        let rows = load_csv_str(&body);
        assert_eq!(rows.len(), 950);
        assert!(rows.iter().all(|l| l.price >= 0.0 && l.odometer >= 0.0));

        let ds = Dataset::from_listings(rows);
        let mut filters = FilterState::initial(&ds, 10).unwrap();
        filters.year = Range::new(2015, 2015);
        filters.models = ["toyota camry".to_string()].into();
        let idx = filtered_indices(&ds, &filters);
        assert_eq!(idx.len(), 50);
        assert!(idx.iter().all(|&i| {
            let l = &ds.listings()[i];
            l.model_year == 2015 && l.model == "toyota camry"
        }));

        filters.models = ["honda civic".to_string()].into();
        let idx = filtered_indices(&ds, &filters);
        assert!(idx.is_empty());
        for s in describe(idx.iter().map(|&i| &ds.listings()[i])) {
            assert_eq!(s.count, 0);
            assert!(s.mean.is_nan() && s.std.is_nan() && s.median.is_nan());
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_file(Path::new("/nonexistent/vehicles.csv")).is_err());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("vehicles.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatasetError>(),
            Some(DatasetError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_csv_file_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(
            file,
            "{HEADER}9400,2011,bmw x5,good,6,gas,145000,automatic,SUV,,1,2018-06-23,19\n"
        )
        .unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.models(), ["bmw x5"]);
    }

    #[test]
    fn loads_records_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"price": 9400, "model_year": 2011.0, "model": "bmw x5", "odometer": 145000.0,
                  "paint_color": null, "is_4wd": 1.0, "days_listed": 19}},
                {{"price": 5000, "model_year": null, "model": "kia soul", "odometer": 1.0}},
                {{"price": 7000, "model_year": 2015, "model": "kia soul", "odometer": 60000,
                  "paint_color": "grey", "is_4wd": null}}
            ]"#
        )
        .unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.listings()[0];
        assert_eq!(first.paint_color, "-");
        assert!(first.four_wheel_drive);
        assert_eq!(first.days_listed, Some(19));
        assert_eq!(ds.listings()[1].paint_color, "grey");
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(parse_json(r#"{"price": 1}"#).is_err());
        assert!(parse_json("[]").unwrap().is_empty());
    }

    #[test]
    fn loads_parquet() {
        let schema = Arc::new(Schema::new(vec![
            ArrowField::new("price", arrow::datatypes::DataType::Int64, true),
            ArrowField::new("model_year", arrow::datatypes::DataType::Float64, true),
            ArrowField::new("model", arrow::datatypes::DataType::Utf8, true),
            ArrowField::new("odometer", arrow::datatypes::DataType::Float64, true),
            ArrowField::new("is_4wd", arrow::datatypes::DataType::Boolean, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(9400), Some(-3), Some(100)])),
                Arc::new(Float64Array::from(vec![Some(2011.0), Some(2012.0), None])),
                Arc::new(StringArray::from(vec![Some("bmw x5"), Some("ram 1500"), Some("ram 1500")])),
                Arc::new(Float64Array::from(vec![Some(145000.0), Some(1.0), Some(2.0)])),
                Arc::new(BooleanArray::from(vec![Some(true), None, None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.listings()[0].model_year, 2011);
        assert!(ds.listings()[0].four_wheel_drive);
    }
}
