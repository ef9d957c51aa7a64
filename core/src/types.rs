use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// `(rows, cols)` of a grid, saturated to the coordinate range.
pub fn grid_bounds<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, cols) = grid.dim();
    (
        Coord::try_from(rows).unwrap_or(Coord::MAX),
        Coord::try_from(cols).unwrap_or(Coord::MAX),
    )
}

/// The up to eight neighbours of `center` that fall inside `bounds`, in
/// row-major order.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    let (row, col) = center;
    let (rows, cols) = bounds;
    let step = move |base: Coord, delta: i8, limit: Coord| {
        base.checked_add_signed(delta).filter(|&next| next < limit)
    };

    (-1i8..=1)
        .flat_map(|d_row| (-1i8..=1).map(move |d_col| (d_row, d_col)))
        .filter(|&delta| delta != (0, 0))
        .filter_map(move |(d_row, d_col)| {
            Some((step(row, d_row, rows)?, step(col, d_col, cols)?))
        })
}
