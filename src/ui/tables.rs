use eframe::egui::{self, Grid, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Field;
use crate::data::stats::FieldSummary;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw data and summary sections
// ---------------------------------------------------------------------------

pub fn data_views(ui: &mut Ui, state: &AppState) {
    egui::CollapsingHeader::new("Mostrar datos filtrados")
        .id_salt("raw_data")
        .default_open(true)
        .show(ui, |ui: &mut Ui| raw_table(ui, state));

    egui::CollapsingHeader::new("Resumen de Datos Filtrados")
        .id_salt("summary")
        .default_open(true)
        .show(ui, |ui: &mut Ui| summary_table(ui, &state.view().summary));
}

/// Every column of the filtered listings. Rows are virtualised.
fn raw_table(ui: &mut Ui, state: &AppState) {
    let indices = &state.view().indices;
    let listings = state.dataset.listings();

    ScrollArea::horizontal().id_salt("raw_hscroll").show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(400.0)
            .columns(Column::auto().at_least(60.0), Field::ALL.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for field in Field::ALL {
                    header.col(|ui: &mut Ui| {
                        ui.strong(field.label());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                    let listing = &listings[indices[row.index()]];
                    for field in Field::ALL {
                        row.col(|ui: &mut Ui| {
                            ui.label(listing.cell(field).to_string());
                        });
                    }
                });
            });
    });
}

/// One row per numeric field. Undefined statistics print as `NaN`.
fn summary_table(ui: &mut Ui, summary: &[FieldSummary]) {
    Grid::new("summary_grid")
        .striped(true)
        .num_columns(FieldSummary::HEADERS.len() + 1)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for h in FieldSummary::HEADERS {
                ui.strong(h);
            }
            ui.end_row();

            for row in summary {
                ui.strong(row.field.label());
                for (i, v) in row.values().iter().enumerate() {
                    // Count is an integer; the rest keep two decimals.
                    if i == 0 {
                        ui.label(format!("{v:.0}"));
                    } else {
                        ui.label(format!("{v:.2}"));
                    }
                }
                ui.end_row();
            }
        });
}
