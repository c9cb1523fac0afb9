//! Writes a synthetic listings file for trying the dashboard without the
//! real dataset.
//!
//! Usage: `generate_sample [output.csv|output.parquet] [rows]`

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const MODELS: [(&str, f64); 12] = [
    ("bmw x5", 18000.0),
    ("chevrolet silverado", 16000.0),
    ("ford f-150", 17000.0),
    ("ford focus", 7000.0),
    ("honda accord", 9500.0),
    ("honda civic", 8000.0),
    ("jeep wrangler", 15000.0),
    ("nissan altima", 7500.0),
    ("ram 1500", 16500.0),
    ("subaru outback", 11000.0),
    ("toyota camry", 9000.0),
    ("toyota tacoma", 15500.0),
];
const CONDITIONS: [&str; 5] = ["new", "like new", "excellent", "good", "fair"];
const FUELS: [&str; 3] = ["gas", "diesel", "hybrid"];
const TRANSMISSIONS: [&str; 2] = ["automatic", "manual"];
const TYPES: [&str; 5] = ["sedan", "SUV", "pickup", "truck", "coupe"];
const COLORS: [&str; 6] = ["white", "black", "silver", "red", "blue", "grey"];

/// Deterministic splitmix64 generator.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// One row in the source file's column layout.
#[derive(Debug, Serialize)]
struct SampleRow {
    price: Option<f64>,
    model_year: Option<f64>,
    model: Option<String>,
    condition: String,
    cylinders: Option<f64>,
    fuel: String,
    odometer: Option<f64>,
    transmission: String,
    #[serde(rename = "type")]
    vehicle_type: String,
    paint_color: Option<String>,
    is_4wd: Option<f64>,
    date_posted: String,
    days_listed: i64,
}

fn generate(rows: usize, rng: &mut Rng) -> Vec<SampleRow> {
    (0..rows)
        .map(|_| {
            let (model, base_price) = MODELS[rng.below(MODELS.len())];
            let year = 1995 + rng.below(25) as i64;
            let age = (2019 - year) as f64;
            let odometer = (age * 11000.0 + rng.unit() * 30000.0).round();
            let mut price = (base_price * 0.92f64.powf(age) * (0.7 + rng.unit() * 0.6)).round();

            // Dirty rows the loader has to drop.
            if rng.chance(0.02) {
                price = -price;
            }

            SampleRow {
                price: (!rng.chance(0.01)).then_some(price),
                model_year: (!rng.chance(0.05)).then_some(year as f64),
                model: (!rng.chance(0.01)).then(|| model.to_string()),
                condition: rng.pick(&CONDITIONS).to_string(),
                cylinders: (!rng.chance(0.1)).then(|| [4.0, 6.0, 8.0][rng.below(3)]),
                fuel: rng.pick(&FUELS).to_string(),
                odometer: (!rng.chance(0.1)).then_some(odometer),
                transmission: rng.pick(&TRANSMISSIONS).to_string(),
                vehicle_type: rng.pick(&TYPES).to_string(),
                paint_color: (!rng.chance(0.18)).then(|| rng.pick(&COLORS).to_string()),
                is_4wd: rng.chance(0.5).then_some(1.0),
                date_posted: format!("2018-{:02}-{:02}", 1 + rng.below(12), 1 + rng.below(28)),
                days_listed: rng.below(120) as i64,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    fn floats(rows: &[SampleRow], f: impl Fn(&SampleRow) -> Option<f64>) -> ArrayRef {
        Arc::new(rows.iter().map(f).collect::<Float64Array>())
    }
    fn strings(rows: &[SampleRow], f: impl Fn(&SampleRow) -> Option<&str>) -> ArrayRef {
        Arc::new(rows.iter().map(f).collect::<StringArray>())
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("price", floats(rows, |r| r.price)),
        ("model_year", floats(rows, |r| r.model_year)),
        ("model", strings(rows, |r| r.model.as_deref())),
        ("condition", strings(rows, |r| Some(r.condition.as_str()))),
        ("cylinders", floats(rows, |r| r.cylinders)),
        ("fuel", strings(rows, |r| Some(r.fuel.as_str()))),
        ("odometer", floats(rows, |r| r.odometer)),
        ("transmission", strings(rows, |r| Some(r.transmission.as_str()))),
        ("type", strings(rows, |r| Some(r.vehicle_type.as_str()))),
        ("paint_color", strings(rows, |r| r.paint_color.as_deref())),
        ("is_4wd", floats(rows, |r| r.is_4wd)),
        ("date_posted", strings(rows, |r| Some(r.date_posted.as_str()))),
        (
            "days_listed",
            Arc::new(rows.iter().map(|r| Some(r.days_listed)).collect::<Int64Array>()) as ArrayRef,
        ),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), true))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, arr)| arr).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "vehicles_us_clean.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid row count '{n}'"))?,
        None => 5000,
    };

    let path = Path::new(&output);
    let data = generate(rows, &mut Rng(42));

    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("parquet")) {
        write_parquet(path, &data)?;
    } else {
        write_csv(path, &data)?;
    }

    println!("Wrote {} listings to {output}", data.len());
    Ok(())
}
