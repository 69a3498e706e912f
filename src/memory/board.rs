use std::fmt;

use anyhow::{ensure, Result};

/// Contents of a single square of the playing field
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty = 0,
    Body = 1,
    Head = 2,
    Food = 3,
}

impl Cell {
    /// Numerical encoding used as network input
    pub fn encode(self) -> f32 {
        self as u8 as f32
    }

    /// Character drawn for this cell in terminal recordings
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Body => 'o',
            Cell::Head => '@',
            Cell::Food => '*',
        }
    }
}

/// A square snake board, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// An empty board of `size` x `size` cells
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a board from row-major cells
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self> {
        ensure!(
            cells.len() == size * size,
            "a {size}x{size} board needs {} cells, got {}",
            size * size,
            cells.len()
        );
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        (row < self.size && col < self.size).then(|| self.cells[row * self.size + col])
    }

    /// Set the cell at `(row, col)`
    ///
    /// ### Panics
    /// If the position is off the board
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(
            row < self.size && col < self.size,
            "({row}, {col}) is off a {0}x{0} board",
            self.size
        );
        self.cells[row * self.size + col] = cell;
    }

    /// Encoded cells, row-major
    pub fn encode(&self) -> impl Iterator<Item = f32> + '_ {
        self.cells.iter().map(|c| c.encode())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = format!("+{}+", "-".repeat(self.size));
        writeln!(f, "{edge}")?;
        for row in self.cells.chunks(self.size.max(1)) {
            let line = row.iter().map(|c| c.glyph()).collect::<String>();
            writeln!(f, "|{line}|")?;
        }
        write!(f, "{edge}")
    }
}
