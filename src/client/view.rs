use std::{collections::BTreeMap, fmt::Display};

use crate::{Coordinates, BLOCKED_MARKER};

/// Identifies a cell by its `row` and `col` attributes, kept as the raw
/// strings the cell exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: String,
    pub col: String,
}

impl CellKey {
    pub fn new(row: impl ToString, col: impl ToString) -> Self {
        Self {
            row: row.to_string(),
            col: col.to_string(),
        }
    }

    /// The grid position, if both attributes are plain indices.
    pub fn position(&self) -> Option<Coordinates> {
        Some((self.row.trim().parse().ok()?, self.col.trim().parse().ok()?))
    }
}

/// Visual class of a cell. Only the three known markers have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    Red,
    Blue,
    Yellow,
}

impl CellClass {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "red" => Some(CellClass::Red),
            "blue" => Some(CellClass::Blue),
            BLOCKED_MARKER => Some(CellClass::Yellow),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CellClass::Red => "red",
            CellClass::Blue => "blue",
            CellClass::Yellow => BLOCKED_MARKER,
        }
    }
}

/// The cells the player clicks on and sees, keyed by position.
pub trait GridView {
    /// every cell of the view, always in the same order
    fn cell_keys(&self) -> Vec<CellKey>;

    /// the text currently displayed in a cell, `None` if there is no such cell
    fn text(&self, key: &CellKey) -> Option<&str>;

    /// overwrites the text and the class of a cell
    fn paint(&mut self, key: &CellKey, text: &str, class: Option<CellClass>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellElement {
    pub text: String,
    pub class: Option<CellClass>,
}

/// A view that only lives in memory, used by the terminal client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryGrid {
    cells: BTreeMap<CellKey, CellElement>,
}

impl MemoryGrid {
    /// a `rows` x `cols` grid of blank cells
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| CellKey::new(row, col)))
            .map(|key| (key, CellElement::default()))
            .collect();
        Self { cells }
    }

    pub fn with_cells(keys: impl IntoIterator<Item = CellKey>) -> Self {
        Self {
            cells: keys
                .into_iter()
                .map(|key| (key, CellElement::default()))
                .collect(),
        }
    }

    pub fn cell(&self, key: &CellKey) -> Option<&CellElement> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl GridView for MemoryGrid {
    fn cell_keys(&self) -> Vec<CellKey> {
        self.cells.keys().cloned().collect()
    }

    fn text(&self, key: &CellKey) -> Option<&str> {
        self.cells.get(key).map(|cell| cell.text.as_str())
    }

    fn paint(&mut self, key: &CellKey, text: &str, class: Option<CellClass>) {
        if let Some(cell) = self.cells.get_mut(key) {
            cell.text = text.to_string();
            cell.class = class;
        }
    }
}

impl Display for MemoryGrid {
    /// Draws the cells with a known position as a table, one row per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let positioned: BTreeMap<Coordinates, &CellElement> = self
            .cells
            .iter()
            .filter_map(|(key, cell)| Some((key.position()?, cell)))
            .collect();
        let Some(rows) = positioned.keys().map(|(row, _)| row + 1).max() else {
            return Ok(());
        };
        let cols = positioned.keys().map(|(_, col)| col + 1).max().unwrap_or(0);

        write!(f, "   ")?;
        for col in 0..cols {
            write!(f, " {:^6}", col)?;
        }
        writeln!(f)?;
        for row in 0..rows {
            write!(f, "{:>2} ", row)?;
            for col in 0..cols {
                let text = match positioned.get(&(row, col)) {
                    Some(cell) if cell.text.is_empty() => ".",
                    Some(cell) => cell.text.as_str(),
                    None => " ",
                };
                write!(f, " {:^6}", text)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
