use std::fmt::{Display, Formatter};

use ndarray::{s, Array2, SliceInfo, SliceInfoElem, Ix2};

/// An axis-aligned rectangle of cells. The top left corner of a grid is row 0, column 0.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Rect {
    /// First row covered.
    pub row_start: usize,
    /// Number of rows covered, at least 1.
    pub row_len: usize,
    /// First column covered.
    pub col_start: usize,
    /// Number of columns covered, at least 1.
    pub col_len: usize,
}

impl Rect {
    /// Rectangle spanning rows `row_start..row_start + row_len` and the matching column range.
    pub fn new(row_start: usize, row_len: usize, col_start: usize, col_len: usize) -> Self {
        Self { row_start, row_len, col_start, col_len }
    }

    pub(crate) fn row_end(&self) -> usize {
        self.row_start + self.row_len
    }

    pub(crate) fn col_end(&self) -> usize {
        self.col_start + self.col_len
    }

    pub(crate) fn slice(&self) -> SliceInfo<[SliceInfoElem; 2], Ix2, Ix2> {
        s![self.row_start..self.row_end(), self.col_start..self.col_end()]
    }

    /// A `dims`-shaped mask that is `true` exactly inside this rectangle.
    pub fn to_mask(&self, dims: (usize, usize)) -> Array2<bool> {
        let mut mask = Array2::from_elem(dims, false);
        mask.slice_mut(self.slice()).fill(true);
        mask
    }

    /// Every rectangle fitting in `dims`, ordered by top row, left column, height, then width.
    pub(crate) fn all_within(dims: (usize, usize)) -> impl Iterator<Item = Rect> {
        let (rows, cols) = dims;
        (0..rows).flat_map(move |row_start| {
            (0..cols).flat_map(move |col_start| {
                (1..=rows - row_start).flat_map(move |row_len| {
                    (1..=cols - col_start).map(move |col_len| Rect::new(row_start, row_len, col_start, col_len))
                })
            })
        })
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}@({}, {})", self.row_len, self.col_len, self.row_start, self.col_start)
    }
}
