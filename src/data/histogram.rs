use std::collections::BTreeMap;

use super::model::Listing;

/// Odometer counts per model over shared, equal-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    /// Model name → count per bin; every vector has the same length.
    pub series: BTreeMap<String, Vec<usize>>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.series.values().next().map_or(0, Vec::len)
    }

    /// Centre of bin `i` on the odometer axis.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }

    /// Base of every bin for each series when the series are stacked in
    /// `series` order: the running per-bin total of the series before it.
    pub fn stack_bases(&self) -> Vec<Vec<usize>> {
        let mut running = vec![0; self.bin_count()];
        self.series
            .values()
            .map(|counts| {
                let bases = running.clone();
                for (total, c) in running.iter_mut().zip(counts) {
                    *total += c;
                }
                bases
            })
            .collect()
    }
}

/// Bin the odometer readings of `listings`, grouped by model. `None` when
/// there is nothing to draw.
pub fn odometer_histogram<'a, I>(listings: I, bins: usize) -> Option<Histogram>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let points: Vec<(&str, f64)> = listings
        .into_iter()
        .map(|l| (l.model.as_str(), l.odometer))
        .collect();
    if points.is_empty() || bins == 0 {
        return None;
    }

    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    // A single distinct reading still gets one visible bar.
    let (bins, bin_width) = if max > min {
        (bins, (max - min) / bins as f64)
    } else {
        (1, 1.0)
    };

    let mut series: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (model, odometer) in points {
        let idx = (((odometer - min) / bin_width).floor() as usize).min(bins - 1);
        series
            .entry(model.to_string())
            .or_insert_with(|| vec![0; bins])[idx] += 1;
    }

    Some(Histogram {
        start: min,
        bin_width,
        series,
    })
}
