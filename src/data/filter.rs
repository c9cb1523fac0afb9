use std::collections::BTreeSet;

use super::model::{Bounds, Dataset, Listing};

// ---------------------------------------------------------------------------
// Filter predicate: ranges plus the selected models
// ---------------------------------------------------------------------------

/// Closed interval `[lo, hi]`. An inverted interval matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub lo: T,
    pub hi: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    pub fn new(lo: T, hi: T) -> Self {
        Range { lo, hi }
    }

    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }
}

impl<T: PartialOrd + Copy> From<Bounds<T>> for Range<T> {
    fn from(b: Bounds<T>) -> Self {
        Range::new(b.min, b.max)
    }
}

/// The user's current selection. All four predicates are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub year: Range<i32>,
    pub odometer: Range<f64>,
    pub price: Range<f64>,
    /// An empty set selects nothing.
    pub models: BTreeSet<String>,
}

impl FilterState {
    /// Full ranges and the first `default_models` model names in
    /// alphabetical order. `None` for an empty dataset, where there are no
    /// bounds to build the range controls from.
    pub fn initial(dataset: &Dataset, default_models: usize) -> Option<Self> {
        Some(FilterState {
            year: dataset.year_bounds()?.into(),
            odometer: dataset.odometer_bounds()?.into(),
            price: dataset.price_bounds()?.into(),
            models: dataset
                .models()
                .iter()
                .take(default_models)
                .cloned()
                .collect(),
        })
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.year.contains(listing.model_year)
            && self.odometer.contains(listing.odometer)
            && self.price.contains(listing.price)
            && self.models.contains(&listing.model)
    }
}

/// Return indices of listings that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &Dataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .listings()
        .iter()
        .enumerate()
        .filter(|(_, l)| filters.matches(l))
        .map(|(i, _)| i)
        .collect()
}

/// Filter any sequence of listings, keeping relative order. Re-applying the
/// same state to the result is a no-op.
#[cfg(test)]
pub fn filter_listings<'a, I>(listings: I, filters: &FilterState) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    listings.into_iter().filter(|l| filters.matches(l)).collect()
}
