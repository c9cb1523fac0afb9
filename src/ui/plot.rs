use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points};

use crate::data::histogram::odometer_histogram;
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Odometer histogram, stacked per model
// ---------------------------------------------------------------------------

pub fn odometer_histogram_plot(ui: &mut Ui, state: &AppState) {
    ui.heading("Distribución del Kilometraje");

    let Some(hist) = odometer_histogram(state.visible(), state.histogram_bins) else {
        ui.label("Sin vehículos para los filtros seleccionados.");
        return;
    };

    let charts: Vec<BarChart> = hist
        .series
        .iter()
        .zip(hist.stack_bases())
        .map(|((model, counts), bases)| {
            let bars: Vec<Bar> = (0..hist.bin_count())
                .filter(|&i| counts[i] > 0)
                .map(|i| {
                    Bar::new(hist.bin_center(i), counts[i] as f64)
                        .base_offset(bases[i] as f64)
                        .width(hist.bin_width)
                })
                .collect();
            BarChart::new(bars)
                .name(model)
                .color(state.color_map.color_for(model))
        })
        .collect();

    Plot::new("odometer_histogram")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Kilometraje")
        .y_axis_label("Cantidad")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Price vs odometer scatter
// ---------------------------------------------------------------------------

pub fn price_scatter_plot(ui: &mut Ui, state: &AppState) {
    ui.heading("Relación entre Precio y Kilometraje");

    // model → (odometer, price, year), kept for the hover label.
    let mut by_model: BTreeMap<String, Vec<(f64, f64, i32)>> = BTreeMap::new();
    for l in state.visible() {
        by_model
            .entry(l.model.clone())
            .or_default()
            .push((l.odometer, l.price, l.model_year));
    }

    let series: Vec<Points> = by_model
        .iter()
        .map(|(model, pts)| {
            let points: PlotPoints = pts.iter().map(|&(x, y, _)| [x, y]).collect();
            Points::new(points)
                .name(model)
                .color(state.color_map.color_for(model))
                .radius(2.5)
        })
        .collect();

    Plot::new("price_scatter")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Kilometraje")
        .y_axis_label("Precio")
        .label_formatter(move |name, value| hover_label(&by_model, name, value))
        .show(ui, |plot_ui| {
            for points in series {
                plot_ui.points(points);
            }
        });
}

fn hover_label(
    by_model: &BTreeMap<String, Vec<(f64, f64, i32)>>,
    name: &str,
    value: &PlotPoint,
) -> String {
    let year = by_model.get(name).and_then(|pts| {
        pts.iter()
            .min_by(|a, b| {
                let da = (a.0 - value.x).powi(2) + (a.1 - value.y).powi(2);
                let db = (b.0 - value.x).powi(2) + (b.1 - value.y).powi(2);
                da.total_cmp(&db)
            })
            .map(|p| p.2)
    });

    match year {
        Some(year) => format!(
            "Modelo: {name}\nAño: {year}\nKilometraje: {:.0}\nPrecio: {:.0}",
            value.x, value.y
        ),
        None => format!("Kilometraje: {:.0}\nPrecio: {:.0}", value.x, value.y),
    }
}
