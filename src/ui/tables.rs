use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::aggregate::rollup::Rollup;
use crate::data::columns;
use crate::data::model::Table;
use crate::error::Warning;
use crate::ui::plot::warning;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable grid with a header row; `cell(row, col)` yields the text.
fn grid(
    ui: &mut Ui,
    id: &str,
    headers: &[String],
    n_rows: usize,
    max_height: f32,
    cell: impl Fn(usize, usize) -> String,
) {
    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(max_height)
                .columns(Column::auto().at_least(60.0), headers.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for h in headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(h);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, n_rows, |mut row| {
                        let r = row.index();
                        for c in 0..headers.len() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell(r, c));
                            });
                        }
                    });
                });
        });
    });
}

/// The first `n` rows of the full table.
pub fn preview(ui: &mut Ui, table: &Table, n: usize) {
    let n_rows = n.min(table.len());
    grid(ui, "preview", &table.column_names, n_rows, 200.0, |r, c| {
        table.rows[r][c].to_string()
    });
}

/// Every row that passed the filter.
pub fn filtered(ui: &mut Ui, table: &Table, visible_rows: &[usize]) {
    ui.label(format!("{} of {} rows", visible_rows.len(), table.len()));
    grid(ui, "filtered", &table.column_names, visible_rows.len(), 300.0, |r, c| {
        table.rows[visible_rows[r]][c].to_string()
    });
}

/// Year/term rollup, or the reason it could not be computed.
pub fn rollup(ui: &mut Ui, result: &Result<Rollup, Warning>) {
    let rollup = match result {
        Ok(rollup) => rollup,
        Err(w) => return warning(ui, w),
    };

    let mut headers = vec![columns::YEAR.to_string(), columns::TERM.to_string()];
    headers.extend(rollup.metrics.iter().map(|m| m.to_string()));

    grid(ui, "rollup", &headers, rollup.rows.len(), 300.0, |r, c| {
        let row = &rollup.rows[r];
        match c {
            0 => row.year.clone(),
            1 => row.term.clone(),
            _ => rollup
                .get(row, rollup.metrics[c - 2])
                .map(|m| format!("{m:.2}"))
                .unwrap_or_default(),
        }
    });
}
