use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Display vocabulary
// ---------------------------------------------------------------------------

/// Placeholder shown when a listing has no paint colour.
pub const MISSING_COLOR: &str = "-";
/// Four-wheel-drive labels.
pub const FOUR_WD_YES: &str = "Sí";
pub const FOUR_WD_NO: &str = "No";

/// Every column of a listing, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Price,
    Year,
    Model,
    Condition,
    Cylinders,
    Fuel,
    Odometer,
    Transmission,
    VehicleType,
    Color,
    FourWheelDrive,
    DatePosted,
    DaysListed,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Price,
        Field::Year,
        Field::Model,
        Field::Condition,
        Field::Cylinders,
        Field::Fuel,
        Field::Odometer,
        Field::Transmission,
        Field::VehicleType,
        Field::Color,
        Field::FourWheelDrive,
        Field::DatePosted,
        Field::DaysListed,
    ];

    /// Fields the aggregator summarises. `FourWheelDrive` is excluded: once
    /// mapped to `Sí`/`No` it is categorical.
    pub const NUMERIC: [Field; 5] = [
        Field::Price,
        Field::Year,
        Field::Cylinders,
        Field::Odometer,
        Field::DaysListed,
    ];

    /// Column name in the source file.
    pub fn source_name(self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::Year => "model_year",
            Field::Model => "model",
            Field::Condition => "condition",
            Field::Cylinders => "cylinders",
            Field::Fuel => "fuel",
            Field::Odometer => "odometer",
            Field::Transmission => "transmission",
            Field::VehicleType => "type",
            Field::Color => "paint_color",
            Field::FourWheelDrive => "is_4wd",
            Field::DatePosted => "date_posted",
            Field::DaysListed => "days_listed",
        }
    }

    /// Column header shown in the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Field::Price => "Precio",
            Field::Year => "Año",
            Field::Model => "Modelo",
            Field::Condition => "Condición",
            Field::Cylinders => "Cilindrada",
            Field::Fuel => "Combustible",
            Field::Odometer => "Kilometraje",
            Field::Transmission => "Transmisión",
            Field::VehicleType => "Tipo",
            Field::Color => "Color",
            Field::FourWheelDrive => "Tracción 4x4",
            Field::DatePosted => "Fecha de publicación",
            Field::DaysListed => "Días publicados",
        }
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single rendered cell
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell, mirroring the pandas dtypes the listings
/// arrive with.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.fract() == 0.0 => write!(f, "{v:.0}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Missing => Ok(()),
        }
    }
}

fn text_or_missing(value: &Option<String>) -> CellValue {
    value
        .as_ref()
        .map_or(CellValue::Missing, |s| CellValue::Text(s.clone()))
}

// ---------------------------------------------------------------------------
// Listing – one cleaned row
// ---------------------------------------------------------------------------

/// A single vehicle-for-sale record that survived cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub price: f64,
    pub model_year: i32,
    pub model: String,
    pub condition: Option<String>,
    pub cylinders: Option<f64>,
    pub fuel: Option<String>,
    pub odometer: f64,
    pub transmission: Option<String>,
    pub vehicle_type: Option<String>,
    /// `-` when the source had no colour.
    pub paint_color: String,
    pub four_wheel_drive: bool,
    /// ISO-8601 date string kept as text.
    pub date_posted: Option<String>,
    pub days_listed: Option<i64>,
}

impl Listing {
    pub fn four_wheel_drive_label(&self) -> &'static str {
        if self.four_wheel_drive {
            FOUR_WD_YES
        } else {
            FOUR_WD_NO
        }
    }

    /// The value of `field` as a table cell.
    pub fn cell(&self, field: Field) -> CellValue {
        match field {
            Field::Price => CellValue::Float(self.price),
            Field::Year => CellValue::Integer(self.model_year as i64),
            Field::Model => CellValue::Text(self.model.clone()),
            Field::Condition => text_or_missing(&self.condition),
            Field::Cylinders => self.cylinders.map_or(CellValue::Missing, CellValue::Float),
            Field::Fuel => text_or_missing(&self.fuel),
            Field::Odometer => CellValue::Float(self.odometer),
            Field::Transmission => text_or_missing(&self.transmission),
            Field::VehicleType => text_or_missing(&self.vehicle_type),
            Field::Color => CellValue::Text(self.paint_color.clone()),
            Field::FourWheelDrive => CellValue::Text(self.four_wheel_drive_label().to_string()),
            Field::DatePosted => text_or_missing(&self.date_posted),
            Field::DaysListed => self.days_listed.map_or(CellValue::Missing, CellValue::Integer),
        }
    }

    /// Numeric value of `field`, `None` for missing or categorical fields.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        match field {
            Field::Price => Some(self.price),
            Field::Year => Some(self.model_year as f64),
            Field::Cylinders => self.cylinders,
            Field::Odometer => Some(self.odometer),
            Field::DaysListed => self.days_listed.map(|d| d as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned table
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` of a column over the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

/// The immutable cleaned dataset with pre-computed indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    listings: Vec<Listing>,
    /// Sorted distinct model names.
    models: Vec<String>,
    year_bounds: Option<Bounds<i32>>,
    odometer_bounds: Option<Bounds<f64>>,
    price_bounds: Option<Bounds<f64>>,
}

impl Dataset {
    /// Build indices from cleaned listings. Order is kept as loaded.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let models: BTreeSet<String> = listings.iter().map(|l| l.model.clone()).collect();

        Dataset {
            year_bounds: bounds(listings.iter().map(|l| l.model_year)),
            odometer_bounds: bounds(listings.iter().map(|l| l.odometer)),
            price_bounds: bounds(listings.iter().map(|l| l.price)),
            models: models.into_iter().collect(),
            listings,
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn year_bounds(&self) -> Option<Bounds<i32>> {
        self.year_bounds
    }

    pub fn odometer_bounds(&self) -> Option<Bounds<f64>> {
        self.odometer_bounds
    }

    pub fn price_bounds(&self) -> Option<Bounds<f64>> {
        self.price_bounds
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

fn bounds<T: PartialOrd + Copy>(values: impl Iterator<Item = T>) -> Option<Bounds<T>> {
    values.fold(None, |acc: Option<Bounds<T>>, v| {
        Some(match acc {
            None => Bounds { min: v, max: v },
            Some(b) => Bounds {
                min: if v < b.min { v } else { b.min },
                max: if v > b.max { v } else { b.max },
            },
        })
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Listing with only the required fields set.
    pub(crate) fn listing(model: &str, year: i32, odometer: f64, price: f64) -> Listing {
        Listing {
            price,
            model_year: year,
            model: model.to_string(),
            condition: None,
            cylinders: None,
            fuel: None,
            odometer,
            transmission: None,
            vehicle_type: None,
            paint_color: MISSING_COLOR.to_string(),
            four_wheel_drive: false,
            date_posted: None,
            days_listed: None,
        }
    }

    #[test]
    fn dataset_indexes_models_and_bounds() {
        let ds = Dataset::from_listings(vec![
            listing("ford f-150", 2012, 90000.0, 15000.0),
            listing("bmw x5", 2008, 140000.0, 7000.0),
            listing("ford f-150", 2018, 20000.0, 32000.0),
        ]);

        assert_eq!(ds.models(), ["bmw x5", "ford f-150"]);
        assert_eq!(ds.year_bounds(), Some(Bounds { min: 2008, max: 2018 }));
        assert_eq!(
            ds.odometer_bounds(),
            Some(Bounds {
                min: 20000.0,
                max: 140000.0
            })
        );
        assert_eq!(
            ds.price_bounds(),
            Some(Bounds {
                min: 7000.0,
                max: 32000.0
            })
        );
    }

    #[test]
    fn bounds_do_not_depend_on_row_order() {
        let ds = Dataset::from_listings(vec![
            listing("a", 2014, 3.0, 30.0),
            listing("a", 2019, 1.0, 10.0),
            listing("a", 2001, 2.0, 20.0),
        ]);
        assert_eq!(ds.year_bounds(), Some(Bounds { min: 2001, max: 2019 }));
        assert_eq!(ds.price_bounds(), Some(Bounds { min: 10.0, max: 30.0 }));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = Dataset::from_listings(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.year_bounds().is_none());
        assert!(ds.odometer_bounds().is_none());
        assert!(ds.price_bounds().is_none());
        assert!(ds.models().is_empty());
    }

    #[test]
    fn four_wheel_drive_renders_as_label() {
        let mut l = listing("jeep wrangler", 2015, 50000.0, 20000.0);
        assert_eq!(l.cell(Field::FourWheelDrive).to_string(), "No");
        l.four_wheel_drive = true;
        assert_eq!(l.cell(Field::FourWheelDrive).to_string(), "Sí");
    }

    #[test]
    fn cells_format_compactly() {
        assert_eq!(CellValue::Float(145000.0).to_string(), "145000");
        assert_eq!(CellValue::Float(6.5).to_string(), "6.50");
        assert_eq!(CellValue::Missing.to_string(), "");
    }

    #[test]
    fn categorical_fields_are_not_numeric() {
        let l = listing("honda civic", 2010, 1.0, 2.0);
        assert_eq!(l.numeric(Field::Model), None);
        assert_eq!(l.numeric(Field::FourWheelDrive), None);
        assert_eq!(l.numeric(Field::Year), Some(2010.0));
        assert_eq!(l.numeric(Field::Cylinders), None);
    }
}
