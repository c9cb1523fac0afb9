use super::model::{Field, Listing};

// ---------------------------------------------------------------------------
// Descriptive statistics over the filtered listings
// ---------------------------------------------------------------------------

/// One row of the summary table. Every value is rounded to 2 decimals; on an
/// empty input everything but `count` is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSummary {
    pub field: Field,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FieldSummary {
    /// Column headers of the summary table, after the field name.
    pub const HEADERS: [&'static str; 8] = [
        "Cantidad",
        "Promedio",
        "Desviación estándar",
        "Mínimo",
        "Q1",
        "Mediana",
        "Q3",
        "Máximo",
    ];

    /// Statistic values in `HEADERS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

/// Summarise every numeric field over `listings`.
pub fn describe<'a, I>(listings: I) -> Vec<FieldSummary>
where
    I: IntoIterator<Item = &'a Listing>,
    I::IntoIter: Clone,
{
    let iter = listings.into_iter();
    Field::NUMERIC
        .iter()
        .map(|&field| {
            let values: Vec<f64> = iter.clone().filter_map(|l| l.numeric(field)).collect();
            summarize(field, values)
        })
        .collect()
}

fn summarize(field: Field, mut values: Vec<f64>) -> FieldSummary {
    values.sort_by(f64::total_cmp);
    let n = values.len();

    let mean = if n == 0 {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / n as f64
    };
    // Sample standard deviation (n - 1), undefined below two values.
    let std = if n < 2 {
        f64::NAN
    } else {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    };

    FieldSummary {
        field,
        count: n,
        mean: round2(mean),
        std: round2(std),
        min: round2(quantile(&values, 0.0)),
        q1: round2(quantile(&values, 0.25)),
        median: round2(quantile(&values, 0.5)),
        q3: round2(quantile(&values, 0.75)),
        max: round2(quantile(&values, 1.0)),
    }
}

/// Quantile of sorted data, interpolating linearly between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// Halves go to the even neighbour, like `DataFrame.round`.
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}
