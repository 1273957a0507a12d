use super::{CellView, Document};
use gridcalc_engine::engine::{Cell, CellRef, FormulaService, Grid};
use tracing::debug;

impl Document {
    /// Formula service over this document's grid.
    fn service(&self) -> FormulaService<'_, Grid> {
        FormulaService::with_config(&self.grid, self.config.clone())
    }

    /// Set a cell's raw input. A new cell starts with an empty stored result;
    /// an existing cell only has its input replaced.
    pub fn set_cell_input(&mut self, cell_ref: CellRef, input: &str) {
        match self.grid.get_mut(&cell_ref) {
            Some(mut cell) => cell.input = input.to_string(),
            None => {
                self.grid.insert(cell_ref, Cell::new(input));
            }
        }
        debug!(cell = %cell_ref, input, "cell input set");
        self.modified = true;
    }

    /// Remove the cell entirely. Returns the removed cell, if any.
    pub fn clear_cell(&mut self, cell_ref: &CellRef) -> Option<Cell> {
        let removed = self.grid.remove(cell_ref).map(|(_, cell)| cell);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    /// The cell's input and freshly computed result, or None if it does not exist.
    pub fn get_cell(&self, cell_ref: &CellRef) -> Option<CellView> {
        let input = self.grid.get(cell_ref)?.input.clone();
        Some(CellView {
            cell: *cell_ref,
            input,
            result: self.compute_result(cell_ref),
        })
    }

    /// Result text for the cell (`""` if it does not exist).
    pub fn compute_result(&self, cell_ref: &CellRef) -> String {
        self.service().compute_result(cell_ref)
    }

    /// Evaluate formula text against this sheet without storing it.
    pub fn compute_formula(&self, text: &str) -> String {
        self.service().compute_formula(text)
    }

    /// Every cell with its computed result, row-major.
    pub fn cells_sorted(&self) -> Vec<CellView> {
        let mut cells: Vec<(CellRef, String)> = self
            .grid
            .iter()
            .map(|entry| (*entry.key(), entry.value().input.clone()))
            .collect();
        cells.sort_by_key(|(cell_ref, _)| *cell_ref);

        let service = self.service();
        cells
            .into_iter()
            .map(|(cell, input)| CellView {
                cell,
                input,
                result: service.compute_result(&cell),
            })
            .collect()
    }
}
