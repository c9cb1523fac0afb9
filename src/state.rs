use crate::color::ColorMap;
use crate::config::Config;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::{Dataset, Listing};
use crate::data::stats::{describe, FieldSummary};

// ---------------------------------------------------------------------------
// Derived view: everything the panels draw from
// ---------------------------------------------------------------------------

/// Pure function of (dataset, filter state).
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    /// Indices of listings passing the filters, in dataset order.
    pub indices: Vec<usize>,
    pub summary: Vec<FieldSummary>,
}

impl DerivedView {
    pub fn compute(dataset: &Dataset, filters: Option<&FilterState>) -> Self {
        let indices = match filters {
            Some(f) => filtered_indices(dataset, f),
            None => Vec::new(),
        };
        let summary = describe(indices.iter().map(|&i| &dataset.listings()[i]));
        DerivedView { indices, summary }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup and never modified.
    pub dataset: Dataset,

    /// Current control values. `None` when the dataset is empty and the
    /// controls are disabled.
    pub filters: Option<FilterState>,

    /// View derived from `computed_for`.
    view: DerivedView,
    computed_for: Option<FilterState>,

    /// One colour per model, shared by both charts.
    pub color_map: ColorMap,

    pub show_histogram: bool,
    pub show_scatter: bool,
    pub show_data: bool,
    pub histogram_bins: usize,
}

impl AppState {
    pub fn new(dataset: Dataset, config: &Config) -> Self {
        let filters = FilterState::initial(&dataset, config.default_model_count);
        if dataset.is_empty() {
            log::warn!("Dataset is empty after cleaning; filters disabled");
        }
        let view = DerivedView::compute(&dataset, filters.as_ref());

        Self {
            color_map: ColorMap::new(dataset.models()),
            computed_for: filters.clone(),
            filters,
            view,
            dataset,
            show_histogram: config.show_histogram,
            show_scatter: config.show_scatter,
            show_data: config.show_data,
            histogram_bins: config.histogram_bins.max(1),
        }
    }

    /// Recompute the view when the filters differ from the ones it was built
    /// from. Returns whether a recomputation happened.
    pub fn refresh(&mut self) -> bool {
        if self.filters == self.computed_for {
            return false;
        }
        self.view = DerivedView::compute(&self.dataset, self.filters.as_ref());
        self.computed_for = self.filters.clone();
        log::debug!("Filters changed: {} listings visible", self.view.indices.len());
        true
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Listings of the current view, in dataset order.
    pub fn visible(&self) -> impl Iterator<Item = &Listing> + Clone + '_ {
        self.view
            .indices
            .iter()
            .map(move |&i| &self.dataset.listings()[i])
    }

    pub fn visible_count(&self) -> usize {
        self.view.indices.len()
    }

    /// Toggle a single model in the selection.
    pub fn toggle_model(&mut self, model: &str) {
        if let Some(f) = &mut self.filters {
            if !f.models.remove(model) {
                f.models.insert(model.to_string());
            }
        }
    }

    pub fn select_all_models(&mut self) {
        if let Some(f) = &mut self.filters {
            f.models = self.dataset.models().iter().cloned().collect();
        }
    }

    pub fn select_no_models(&mut self) {
        if let Some(f) = &mut self.filters {
            f.models.clear();
        }
    }
}
