use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::dashboard::{department_choices, DashboardView};
use crate::data::cache::TableCache;
use crate::data::columns;
use crate::data::filter::{init_selection, Dimension, Selection};
use crate::data::loader::Upload;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Memo of the last parsed upload.
    pub cache: TableCache,

    /// Loaded table (None until a file parses).
    pub table: Option<Arc<Table>>,

    /// Name of the file the table came from.
    pub file_name: Option<String>,

    /// Year / Term filter selections.
    pub selection: Selection,

    /// Department columns offered by the selector.
    pub department_choices: Vec<String>,

    /// Department column chosen for the distribution chart.
    pub department: Option<String>,

    /// Panel results for the current selection (cached).
    pub dashboard: Option<DashboardView>,

    /// Colours for terms and departments.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: TableCache::new(),
            table: None,
            file_name: None,
            selection: Selection::default(),
            department_choices: Vec::new(),
            department: None,
            dashboard: None,
            color_map: ColorMap::default(),
            status_message: None,
        }
    }

    /// Parse (or reuse) an upload and make it the current table.
    pub fn open_upload(&mut self, upload: &Upload) {
        match self.cache.load(upload) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {} ({} parses so far)",
                    table.len(),
                    table.column_names,
                    upload.name,
                    self.cache.parse_count()
                );
                self.file_name = Some(upload.name.clone());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", upload.name);
                self.clear();
                self.status_message = Some(format!("Could not read {}: {e}", upload.name));
            }
        }
    }

    /// Ingest a newly loaded table, initialise filters and colours.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.selection = init_selection(&table);
        self.department_choices = department_choices(&table);
        self.department = self.department_choices.first().cloned();

        let mut labels = table.categories(columns::TERM);
        labels.extend(
            self.department_choices
                .iter()
                .filter_map(|c| columns::department_label(c))
                .map(str::to_string),
        );
        labels.push(self.config.other_label.clone());
        self.color_map = ColorMap::new(labels.iter().map(String::as_str));

        self.table = Some(table);
        self.status_message = None;
        self.recompute();
    }

    /// Drop the current table, back to the "no data loaded" state.
    pub fn clear(&mut self) {
        self.table = None;
        self.file_name = None;
        self.selection = Selection::default();
        self.department_choices.clear();
        self.department = None;
        self.dashboard = None;
    }

    /// Recompute every panel after a selection change.
    pub fn recompute(&mut self) {
        self.dashboard = self.table.as_ref().map(|table| {
            DashboardView::compute(
                table,
                &self.selection,
                self.department.as_deref(),
                &self.config,
            )
        });
    }

    /// Toggle a single Year or Term value.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        self.selection.toggle(dim, value);
        self.recompute();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(table) = &self.table {
            self.selection.select_all(dim, table);
            self.recompute();
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.select_none(dim);
        self.recompute();
    }

    pub fn set_department(&mut self, column: String) {
        self.department = Some(column);
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Warning;

    fn upload(content: &str) -> Upload {
        Upload {
            name: "university_student_data.csv".into(),
            bytes: content.as_bytes().to_vec(),
        }
    }

    const DATA: &str = "Year,Term,Enrolled,Arts Enrolled,Science Enrolled\n\
        2021,Fall,10,4,6\n\
        2022,Fall,20,5,0\n";

    #[test]
    fn open_upload_initialises_filters_and_department() {
        let mut state = AppState::new(DashboardConfig::default());
        state.open_upload(&upload(DATA));

        assert!(state.table.is_some());
        assert_eq!(state.selection.years.len(), 2);
        assert_eq!(state.department.as_deref(), Some("Arts Enrolled"));
        let dashboard = state.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.visible_rows, vec![0, 1]);
    }

    #[test]
    fn malformed_upload_shows_no_data_state() {
        let mut state = AppState::new(DashboardConfig::default());
        state.open_upload(&upload(DATA));
        state.open_upload(&upload(""));

        assert!(state.table.is_none());
        assert!(state.dashboard.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn selection_changes_recompute() {
        let mut state = AppState::new(DashboardConfig::default());
        state.open_upload(&upload(DATA));

        state.toggle(Dimension::Year, "2022");
        let dist = state.dashboard.as_ref().unwrap().department_distribution.clone();
        let values: Vec<f64> = dist.unwrap().iter().map(|d| d.value).collect();
        assert_eq!(values, vec![6.0, 4.0]);

        state.select_none(Dimension::Year);
        assert_eq!(state.dashboard.as_ref().unwrap().visible_rows.len(), 2);
    }

    #[test]
    fn table_without_departments_has_no_choice() {
        let mut state = AppState::new(DashboardConfig::default());
        state.open_upload(&upload("Year,Term\n2021,Fall\n"));

        assert!(state.department_choices.is_empty());
        assert_eq!(
            state.dashboard.as_ref().unwrap().department_distribution,
            Err(Warning::NoDepartmentSelected)
        );
    }
}
