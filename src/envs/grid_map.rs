use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic cell type on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cell {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "B")]
    Blue,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "Y")]
    Yellow,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "T")]
    Terminal,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::White => 'W',
            Cell::Blue => 'B',
            Cell::Red => 'R',
            Cell::Yellow => 'Y',
            Cell::Green => 'G',
            Cell::Terminal => 'T',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'W' => Some(Cell::White),
            'B' => Some(Cell::Blue),
            'R' => Some(Cell::Red),
            'Y' => Some(Cell::Yellow),
            'G' => Some(Cell::Green),
            'T' => Some(Cell::Terminal),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `(row, col)` on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Rectangular, non-empty grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl GridMap {
    pub fn new(cells: Vec<Vec<Cell>>) -> Result<Self> {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidMapShape {
                message: format!("map must have at least one cell, got {rows}x{cols}"),
            });
        }

        if let Some((r, row)) = cells.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(Error::InvalidMapShape {
                message: format!("row {r} has {} columns, expected {cols}", row.len()),
            });
        }

        Ok(Self { rows, cols, cells })
    }

    /// Parses one string per row, one symbol character per cell.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .chars()
                    .enumerate()
                    .map(|(col, symbol)| {
                        Cell::from_symbol(symbol)
                            .ok_or(Error::InvalidMapValue { symbol, row, col })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, p: Position) -> Option<Cell> {
        self.cells.get(p.row).and_then(|row| row.get(p.col)).copied()
    }

    /// Applies a signed delta, returning `None` when the result leaves the grid.
    pub fn offset(&self, p: Position, (dr, dc): (isize, isize)) -> Option<Position> {
        let row = p.row.checked_add_signed(dr)?;
        let col = p.col.checked_add_signed(dc)?;
        (row < self.rows && col < self.cols).then_some(Position { row, col })
    }

    pub fn locate(&self, target: Cell) -> Result<Position> {
        locate(&self.cells, target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &cell)| (Position { row, col }, cell))
        })
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }

        Ok(())
    }
}

/// Finds the first cell bearing `target`, scanning rows then columns.
pub fn locate<R: AsRef<[Cell]>>(grid: &[R], target: Cell) -> Result<Position> {
    for (row, cells) in grid.iter().enumerate() {
        if let Some(col) = cells.as_ref().iter().position(|&c| c == target) {
            return Ok(Position { row, col });
        }
    }

    Err(Error::InvalidGridValue {
        symbol: target.symbol(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Cell::Red, (1, 0))]
    #[case(Cell::Yellow, (1, 2))]
    #[case(Cell::White, (0, 0))]
    fn locate_first_in_row_major_order(#[case] target: Cell, #[case] expected: (usize, usize)) {
        let map = GridMap::parse(&["WWB", "RWY"]).unwrap();

        assert_eq!(map.locate(target).unwrap(), Position::from(expected));
    }

    #[test]
    fn locate_missing_symbol_is_an_error() {
        let map = GridMap::parse(&["WW", "WW"]).unwrap();

        assert!(matches!(
            map.locate(Cell::Green),
            Err(Error::InvalidGridValue { symbol: 'G' })
        ));
    }

    #[test]
    fn parse_rejects_unknown_symbol() {
        let err = GridMap::parse(&["WW", "WX"]).unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidMapValue {
                symbol: 'X',
                row: 1,
                col: 1
            }
        ));
    }

    #[rstest]
    #[case(&[] as &[&str])]
    #[case(&[""])]
    #[case(&["WW", "W"])]
    fn parse_rejects_bad_shapes(#[case] rows: &[&str]) {
        assert!(matches!(
            GridMap::parse(rows),
            Err(Error::InvalidMapShape { .. })
        ));
    }

    #[test]
    fn offset_stays_on_grid() {
        let map = GridMap::parse(&["WWW", "WWW"]).unwrap();
        let p = Position::new(0, 2);

        assert_eq!(map.offset(p, (1, 0)), Some(Position::new(1, 2)));
        assert_eq!(map.offset(p, (0, -2)), Some(Position::new(0, 0)));
        assert_eq!(map.offset(p, (-1, 0)), None);
        assert_eq!(map.offset(p, (0, 1)), None);
        assert_eq!(map.offset(p, (2, 0)), None);
    }

    #[test]
    fn display_renders_symbol_rows() {
        let map = GridMap::parse(&["WBG", "TRY"]).unwrap();

        insta::assert_snapshot!(map.to_string().trim_end(), @r###"
        WBG
        TRY
        "###);
    }
}
