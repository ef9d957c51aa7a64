use std::collections::VecDeque;
use std::ops::Index;

use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;

/// Grid of cells, `height` rows by `width` columns, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Creates an all-hidden board without mines.
    pub fn new(width: Coord, height: Coord) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions);
        }

        Ok(Self {
            cells: Array2::default((usize::from(height), usize::from(width))),
            mine_count: 0,
        })
    }

    /// Rebuilds a board from row-major cells, as stored in a snapshot.
    pub fn from_rows(rows: Vec<Vec<Cell>>, width: Coord, height: Coord) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions);
        }

        let (rows_len, cols_len) = (usize::from(height), usize::from(width));
        if rows.len() != rows_len || rows.iter().any(|row| row.len() != cols_len) {
            return Err(GameError::InvalidBoardShape);
        }

        let cells = Array2::from_shape_vec((rows_len, cols_len), rows.concat())
            .map_err(|_| GameError::InvalidBoardShape)?;
        let mut board = Self {
            cells,
            mine_count: 0,
        };
        board.mine_count = board.count_where(|cell| cell.is_mine);
        Ok(board)
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn width(&self) -> Coord {
        Coord::try_from(self.cells.ncols()).unwrap_or(Coord::MAX)
    }

    pub fn height(&self) -> Coord {
        Coord::try_from(self.cells.nrows()).unwrap_or(Coord::MAX)
    }

    /// Bounds as `(height, width)`, the exclusive limit for `(row, col)`.
    pub fn size(&self) -> Coord2 {
        (self.height(), self.width())
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn has_mines(&self) -> bool {
        self.mine_count > 0
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (height, width) = self.size();
        if coords.0 < height && coords.1 < width {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (height, width) = self.size();
        (0..height).flat_map(move |row| (0..width).map(move |col| (row, col)))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, grid_bounds(&self.cells))
    }

    /// Returns a new board with `mine_count` mines spread uniformly over every
    /// cell except `exclude`; cell states carry over unchanged.
    ///
    /// The caller is expected to clamp `mine_count` to the eligible cells, any
    /// excess is dropped.
    pub fn place_mines<R: Rng + ?Sized>(
        &self,
        mine_count: CellCount,
        exclude: Option<Coord2>,
        rng: &mut R,
    ) -> Board {
        let mut eligible: Vec<Coord2> = self
            .iter_coords()
            .filter(|&coords| Some(coords) != exclude)
            .collect();
        eligible.shuffle(rng);

        let requested = usize::from(mine_count);
        if requested > eligible.len() {
            log::warn!(
                "Requested {} mines but only {} cells are eligible",
                requested,
                eligible.len()
            );
        }

        let mut mine_mask: Array2<bool> = Array2::default(self.cells.dim());
        for &coords in eligible.iter().take(requested) {
            mine_mask[coords.to_nd_index()] = true;
        }

        let board = self.with_mine_mask(&mine_mask);
        log::debug!(
            "Placed {} mines on {}x{} board, excluding {:?}",
            board.mine_count,
            board.width(),
            board.height(),
            exclude
        );
        board
    }

    /// Returns a new board with mines at exactly `mine_coords`.
    pub fn with_mine_coords(&self, mine_coords: &[Coord2]) -> Result<Board> {
        let mut mine_mask: Array2<bool> = Array2::default(self.cells.dim());
        for &coords in mine_coords {
            let coords = self.validate_coords(coords)?;
            mine_mask[coords.to_nd_index()] = true;
        }
        Ok(self.with_mine_mask(&mine_mask))
    }

    fn with_mine_mask(&self, mine_mask: &Array2<bool>) -> Board {
        let mut cells = self.cells.clone();
        for ((row, col), cell) in cells.indexed_iter_mut() {
            cell.is_mine = mine_mask[[row, col]];
            cell.adjacent_mines = if cell.is_mine {
                0
            } else {
                count_mines_around(mine_mask, (row as Coord, col as Coord))
            };
        }

        let mut board = Board {
            cells,
            mine_count: 0,
        };
        board.mine_count = board.count_where(|cell| cell.is_mine);
        board
    }

    /// Whether every safe cell carries the true count of its mine neighbors.
    pub fn adjacency_consistent(&self) -> bool {
        let mine_mask = self.cells.map(|cell| cell.is_mine);
        self.iter_coords().all(|coords| {
            let cell = self[coords];
            cell.is_mine || cell.adjacent_mines == count_mines_around(&mine_mask, coords)
        })
    }

    /// Reveals a cell, flooding outwards through zero cells.
    ///
    /// Revealed and flagged cells are left alone, and the flood never opens a
    /// flagged cell. Returns how many cells were opened.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.validate_coords(coords)?;

        if !self.open(coords) {
            return Ok(0);
        }
        let mut opened: CellCount = 1;

        let cell = self[coords];
        if cell.is_mine || cell.adjacent_mines > 0 {
            return Ok(opened);
        }

        let mut to_visit: VecDeque<Coord2> = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].state.is_revealable())
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            coords,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !self.open(visit_coords) {
                continue;
            }
            opened += 1;

            let visit_adjacent_mines = self[visit_coords].adjacent_mines;
            log::trace!(
                "Flood opened cell at {:?}, mine count: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                to_visit.extend(
                    self.iter_neighbors(visit_coords)
                        .filter(|&pos| self[pos].state.is_revealable()),
                );
            }
        }

        Ok(opened)
    }

    /// Cycles `Hidden -> Flagged -> Question -> Hidden`, no-op once revealed.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        Ok(match cell.state.next_mark() {
            Some(next) => {
                cell.state = next;
                MarkOutcome::Changed
            }
            None => MarkOutcome::NoChange,
        })
    }

    /// Marks every mine as revealed, flagged ones included.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
            cell.state = CellState::Revealed;
        }
    }

    pub fn count_revealed(&self) -> CellCount {
        self.count_where(Cell::is_revealed)
    }

    pub fn count_flags(&self) -> CellCount {
        self.count_where(Cell::is_flagged)
    }

    fn open(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.state.is_revealable() {
            cell.state = CellState::Revealed;
            true
        } else {
            false
        }
    }

    fn count_where(&self, predicate: impl Fn(&Cell) -> bool) -> CellCount {
        self.cells
            .iter()
            .filter(|&cell| predicate(cell))
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

fn count_mines_around(mine_mask: &Array2<bool>, coords: Coord2) -> u8 {
    neighbors(coords, grid_bounds(mine_mask))
        .filter(|&pos| mine_mask[pos.to_nd_index()])
        .count() as u8
}
