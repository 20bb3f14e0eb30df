use indexmap::IndexSet;

use super::columns;
use super::model::{CellValue, Table, MISSING_LABEL};

// ---------------------------------------------------------------------------
// Selection: which Year / Term values are chosen
// ---------------------------------------------------------------------------

/// One of the two categorical filter dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Term,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Year => columns::YEAR,
            Dimension::Term => columns::TERM,
        }
    }
}

/// Chosen Year and Term values, kept in the order they were selected.
///
/// An empty set means "no filter" for that dimension: clearing every checkbox
/// shows all rows rather than none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub years: IndexSet<String>,
    pub terms: IndexSet<String>,
}

/// Initialise a [`Selection`] with all observed values chosen, sorted.
pub fn init_selection(table: &Table) -> Selection {
    Selection {
        years: table.categories(columns::YEAR).into_iter().collect(),
        terms: table.categories(columns::TERM).into_iter().collect(),
    }
}

impl Selection {
    pub fn values(&self, dim: Dimension) -> &IndexSet<String> {
        match dim {
            Dimension::Year => &self.years,
            Dimension::Term => &self.terms,
        }
    }

    fn values_mut(&mut self, dim: Dimension) -> &mut IndexSet<String> {
        match dim {
            Dimension::Year => &mut self.years,
            Dimension::Term => &mut self.terms,
        }
    }

    /// Toggle a single value. Newly selected values go to the end.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        let set = self.values_mut(dim);
        if !set.shift_remove(value) {
            set.insert(value.to_string());
        }
    }

    /// Select every observed value of a dimension, in sorted order.
    pub fn select_all(&mut self, dim: Dimension, table: &Table) {
        *self.values_mut(dim) = table.categories(dim.column()).into_iter().collect();
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.values_mut(dim).clear();
    }

    /// The most recently selected year.
    pub fn last_year(&self) -> Option<&str> {
        self.years.last().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// FilteredView: a row subset of a table
// ---------------------------------------------------------------------------

/// Rows of `table` that passed a filter, by index, in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub table: &'a Table,
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every row of the table.
    pub fn all(table: &'a Table) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    /// Cells of one column over the view; `None` when the column is absent.
    pub fn cells(&self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + '_> {
        let column = self.table.column(name)?;
        Some(self.indices.iter().map(move |&i| column.get(i)))
    }

    /// Non-missing numeric values of a column over the view. Text counts as
    /// missing. `None` when the column is absent.
    pub fn numeric(&self, name: &str) -> Option<Vec<f64>> {
        self.cells(name)
            .map(|cells| cells.filter_map(CellValue::as_f64).collect())
    }

    /// Narrow the view to rows whose `column` category equals `value`.
    pub fn restrict(&self, column: &str, value: &str) -> FilteredView<'a> {
        let indices = match self.table.column(column) {
            Some(col) => self
                .indices
                .iter()
                .copied()
                .filter(|&i| col.get(i).category() == value)
                .collect(),
            None => Vec::new(),
        };
        FilteredView {
            table: self.table,
            indices,
        }
    }
}

/// Return the rows that pass the Year and Term selections.
///
/// A row passes a dimension when:
/// * The table has no column for it → passes (no constraint)
/// * The selection for it is empty → passes (no filter applied)
/// * The row's category for it is in the selection → passes
///
/// Blank cells carry the [`MISSING_LABEL`] category, so a full selection keeps
/// every row.
pub fn apply_filter<'a>(table: &'a Table, selection: &Selection) -> FilteredView<'a> {
    let active: Vec<_> = [Dimension::Year, Dimension::Term]
        .into_iter()
        .filter_map(|dim| {
            let selected = selection.values(dim);
            if selected.is_empty() {
                return None;
            }
            table.column(dim.column()).map(|col| (col, selected))
        })
        .collect();

    if active.is_empty() {
        return FilteredView::all(table);
    }

    let indices: Vec<usize> = (0..table.len())
        .filter(|&i| {
            active
                .iter()
                .all(|(col, selected)| selected.contains(&col.get(i).category()))
        })
        .collect();

    log::debug!("filter kept {} of {} rows", indices.len(), table.len());
    FilteredView { table, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    fn sample() -> Table {
        load_csv_bytes(
            b"Year,Term,Enrolled\n\
              2021,Fall,40\n\
              2021,Spring,35\n\
              2022,Fall,45\n\
              2022,Spring,38\n\
              2023,Fall,50\n",
        )
        .unwrap()
    }

    #[test]
    fn full_selection_keeps_every_row_in_order() {
        let table = sample();
        let view = apply_filter(&table, &init_selection(&table));
        assert_eq!(view.indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn empty_selection_applies_no_filter() {
        let table = sample();
        let mut selection = init_selection(&table);
        selection.select_none(Dimension::Year);
        selection.select_none(Dimension::Term);

        let view = apply_filter(&table, &selection);
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn year_and_term_restrict_together() {
        let table = sample();
        let mut selection = init_selection(&table);
        selection.toggle(Dimension::Year, "2021");
        selection.toggle(Dimension::Term, "Spring");

        let view = apply_filter(&table, &selection);
        assert_eq!(view.indices, vec![2, 4]);
    }

    #[test]
    fn absent_column_is_not_filtered() {
        let table = load_csv_bytes(b"Year,Enrolled\n2021,1\n2022,2\n").unwrap();
        let selection = Selection {
            years: IndexSet::new(),
            terms: ["Fall".to_string()].into_iter().collect(),
        };
        assert_eq!(apply_filter(&table, &selection).len(), 2);
    }

    #[test]
    fn blank_year_is_a_selectable_category() {
        let table = load_csv_bytes(b"Year,Term,Enrolled\n2021,Fall,40\n,Fall,45\n").unwrap();
        let mut selection = init_selection(&table);
        assert_eq!(
            selection.years.iter().collect::<Vec<_>>(),
            vec![MISSING_LABEL, "2021"]
        );
        assert_eq!(apply_filter(&table, &selection).indices, vec![0, 1]);
        assert_eq!(selection.last_year(), Some("2021"));

        selection.toggle(Dimension::Year, MISSING_LABEL);
        assert_eq!(apply_filter(&table, &selection).indices, vec![0]);
    }

    #[test]
    fn blank_term_rows_survive_full_selection() {
        let table = load_csv_bytes(b"Year,Term\n2021,\n2021,Fall\n2022,NA\n").unwrap();
        let view = apply_filter(&table, &init_selection(&table));
        assert_eq!(view.indices, vec![0, 1, 2]);
    }

    #[test]
    fn toggle_appends_and_last_year_follows_order() {
        let table = sample();
        let mut selection = init_selection(&table);
        assert_eq!(selection.last_year(), Some("2023"));

        selection.toggle(Dimension::Year, "2021");
        selection.toggle(Dimension::Year, "2021");
        assert_eq!(selection.last_year(), Some("2021"));

        selection.select_all(Dimension::Year, &table);
        assert_eq!(selection.last_year(), Some("2023"));
    }

    #[test]
    fn numeric_skips_missing_and_text() {
        let table = load_csv_bytes(b"Enrolled\n10\n\nabc\n20.5\n").unwrap();
        let view = FilteredView::all(&table);
        assert_eq!(view.numeric("Enrolled"), Some(vec![10.0, 20.5]));
        assert_eq!(view.numeric("Admitted"), None);
    }

    #[test]
    fn restrict_narrows_to_one_label() {
        let table = sample();
        let view = FilteredView::all(&table).restrict("Year", "2022");
        assert_eq!(view.indices, vec![2, 3]);
        assert!(FilteredView::all(&table).restrict("Nope", "x").is_empty());

        let blanks = load_csv_bytes(b"Year,Enrolled\n2021,1\nNA,2\n").unwrap();
        let view = FilteredView::all(&blanks).restrict("Year", MISSING_LABEL);
        assert_eq!(view.indices, vec![1]);
    }
}
