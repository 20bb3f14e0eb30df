use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::columns;
use crate::data::filter::Dimension;
use crate::data::loader::read_upload;
use crate::state::AppState;
use crate::ui::{plot, tables};

/// Shown while no table is loaded.
const GUIDANCE: &str = "Open a CSV file to see the dashboard (File → Open…). \
The file should contain columns such as Year, Term, Applications, Admitted, Enrolled, \
Retention Rate (%), Student Satisfaction (%), Engineering Enrolled, Business Enrolled, \
Arts Enrolled, Science Enrolled.";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in [Dimension::Year, Dimension::Term] {
                let all_values = table.categories(dim.column());
                if all_values.is_empty() {
                    continue;
                }

                let n_selected = state.selection.values(dim).len();
                let header_text = format!("{}  ({n_selected}/{})", dim.column(), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.column())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for val in &all_values {
                            let mut checked = state.selection.values(dim).contains(val);
                            let text = match dim {
                                Dimension::Term => {
                                    RichText::new(val).color(state.color_map.color_for(val))
                                }
                                Dimension::Year => RichText::new(val),
                            };
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle(dim, val);
                            }
                        }
                    });
            }

            ui.separator();

            // ---- Department selector ----
            ui.strong("Department (enrollment)");
            if state.department_choices.is_empty() {
                ui.label("No department columns found.");
                return;
            }
            let current = state.department.clone().unwrap_or_default();
            let choices = state.department_choices.clone();
            egui::ComboBox::from_id_salt("department")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &choices {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.set_department(col.clone());
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(dashboard)) = (&state.table, &state.dashboard) {
            let response = ui.label(format!(
                "{}: {} rows loaded, {} visible",
                state.file_name.as_deref().unwrap_or("data"),
                table.len(),
                dashboard.visible_rows.len()
            ));
            if let Some(id) = state.cache.identity() {
                response.on_hover_text(format!("{} bytes, {}", id.size_bytes, id.hash));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – overview, KPIs, charts, tables
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let (Some(table), Some(dashboard)) = (&state.table, &state.dashboard) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(GUIDANCE).size(16.0));
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data overview");
            ui.label(format!("Detected columns: {}", table.column_names.join(", ")));
            if table.is_empty() {
                ui.label("The file has a header but no data rows.");
            } else {
                tables::preview(ui, table, state.config.preview_rows);
            }
            ui.separator();

            ui.heading("Key indicators");
            ui.columns(4, |cols| {
                for (col, (title, value)) in cols.iter_mut().zip(dashboard.kpis.cards()) {
                    col.group(|ui: &mut Ui| {
                        ui.label(title);
                        ui.label(RichText::new(value.to_string()).size(26.0).strong());
                    });
                }
            });
            ui.separator();

            plot::retention_chart(ui, &dashboard.retention_trend, &state.color_map);
            ui.separator();
            plot::satisfaction_chart(ui, &dashboard.satisfaction_trend);
            ui.separator();
            plot::term_chart(ui, &dashboard.term_comparison, &state.color_map);
            ui.separator();
            let year = table
                .has_column(columns::YEAR)
                .then(|| state.selection.last_year())
                .flatten();
            plot::department_chart(
                ui,
                &dashboard.department_distribution,
                year,
                &state.color_map,
            );
            ui.separator();

            ui.heading("Filtered data");
            tables::filtered(ui, table, &dashboard.visible_rows);
            ui.separator();

            ui.heading("Aggregate statistics by year and term");
            tables::rollup(ui, &dashboard.rollup);
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open admissions data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match read_upload(&path) {
            Ok(upload) => state.open_upload(&upload),
            Err(e) => {
                log::error!("Failed to read file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
