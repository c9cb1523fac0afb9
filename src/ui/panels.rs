use eframe::egui::{self, emath::Numeric, DragValue, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::Range;
use crate::data::model::Bounds;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and view toggles
// ---------------------------------------------------------------------------

/// Render the left panel and bring the derived view up to date.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filtros");
            ui.separator();
            filter_controls(ui, state);

            ui.add_space(8.0);
            ui.heading("Visualizaciones");
            ui.separator();
            view_toggles(ui, state);
        });

    state.refresh();
}

fn filter_controls(ui: &mut Ui, state: &mut AppState) {
    let ds = &state.dataset;
    let (Some(years), Some(odometer), Some(price)) =
        (ds.year_bounds(), ds.odometer_bounds(), ds.price_bounds())
    else {
        disabled_controls(ui);
        return;
    };
    let models = ds.models().to_vec();

    let Some(filters) = state.filters.as_mut() else {
        disabled_controls(ui);
        return;
    };

    range_control(ui, "Año del vehículo", &mut filters.year, years);
    range_control(ui, "Rango de kilometraje (millas)", &mut filters.odometer, odometer);
    range_control(ui, "Rango de precio (USD)", &mut filters.price, price);
    ui.add_space(4.0);

    let header = format!(
        "Selección de modelos  ({}/{})",
        filters.models.len(),
        models.len()
    );
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("model_select")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all_models();
                }
                if ui.small_button("Ninguno").clicked() {
                    state.select_no_models();
                }
            });

            ScrollArea::vertical()
                .id_salt("model_list")
                .max_height(260.0)
                .show(ui, |ui: &mut Ui| {
                    for model in &models {
                        let mut checked = state
                            .filters
                            .as_ref()
                            .is_some_and(|f| f.models.contains(model));
                        let text = RichText::new(model).color(state.color_map.color_for(model));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_model(model);
                        }
                    }
                });
        });
}

/// A closed interval edited through two linked sliders.
fn range_control<T: Numeric>(ui: &mut Ui, label: &str, range: &mut Range<T>, bounds: Bounds<T>) {
    ui.strong(label);
    let lo = ui.add(Slider::new(&mut range.lo, bounds.min..=bounds.max).text("desde"));
    let hi = ui.add(Slider::new(&mut range.hi, bounds.min..=bounds.max).text("hasta"));

    if lo.changed() && range.lo > range.hi {
        range.hi = range.lo;
    }
    if hi.changed() && range.hi < range.lo {
        range.lo = range.hi;
    }
    ui.add_space(4.0);
}

/// Shown when cleaning left no listings: there are no bounds to slide over.
fn disabled_controls(ui: &mut Ui) {
    ui.add_enabled_ui(false, |ui: &mut Ui| {
        let mut placeholder = 0;
        for label in [
            "Año del vehículo",
            "Rango de kilometraje (millas)",
            "Rango de precio (USD)",
        ] {
            ui.strong(label);
            ui.add(Slider::new(&mut placeholder, 0..=0));
        }
        ui.strong("Selección de modelos");
    });
    ui.label("No hay vehículos en el conjunto de datos.");
}

fn view_toggles(ui: &mut Ui, state: &mut AppState) {
    ui.checkbox(&mut state.show_histogram, "Histograma de Kilometraje");
    if state.show_histogram {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Intervalos");
            ui.add(DragValue::new(&mut state.histogram_bins).range(1..=500));
        });
    }
    ui.checkbox(&mut state.show_scatter, "Dispersión Precio vs Kilometraje");
    ui.checkbox(&mut state.show_data, "Ver datos filtrados");
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Análisis de Vehículos Usados en EE.UU.");
        ui.separator();
        ui.label(format!("{} vehículos cargados", state.dataset.len()));
    });
}

/// Always-visible count of the filtered set.
pub fn record_count(ui: &mut Ui, state: &AppState) {
    ui.label(RichText::new(format!("Vehículos mostrados: {}", state.visible_count())).strong());
}
