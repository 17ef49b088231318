//! Generic dense grid for per-cell data

use crate::core::types::GridPos;

/// Generic 2D grid stored row-major
///
/// Coordinates are signed so callers can probe outside the grid freely;
/// reads outside return `None` and writes outside are ignored.
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }

    /// Grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        match self.index(x, y) {
            Some(i) => Some(&mut self.data[i]),
            None => None,
        }
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = value;
        }
    }

    /// Read a cell, falling back to `T::default()` outside the grid
    #[inline]
    pub fn get_or_default(&self, x: i32, y: i32) -> T {
        self.get(x, y).cloned().unwrap_or_default()
    }

    /// Apply `f` to every cell
    pub fn map_in_place(&mut self, f: impl Fn(&mut T)) {
        for cell in &mut self.data {
            f(cell);
        }
    }

    /// Iterate cells with their coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &T)> + '_ {
        let width = self.width;
        self.data.iter().enumerate().map(move |(i, value)| {
            (GridPos::new((i % width) as i32, (i / width) as i32), value)
        })
    }
}
