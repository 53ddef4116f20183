//! Mapping between grid cells, their local pixel slots and the global raster.
//!
//! The display is a fixed 8×9 grid of cells. Each cell carries an 8×4
//! sub-raster, so the whole display spans 64×36 pixels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of grid cells laid out horizontally.
pub const GRID_COLUMNS: u32 = 8;
/// Number of grid cells laid out vertically.
pub const GRID_ROWS: u32 = 9;
/// Total number of grid cells composing the display.
pub const CELL_COUNT: u32 = GRID_COLUMNS * GRID_ROWS;
/// Pixel columns inside a single grid cell.
pub const CELL_PIXEL_COLUMNS: u32 = 8;
/// Pixel rows inside a single grid cell.
pub const CELL_PIXEL_ROWS: u32 = 4;
/// Pixel slots owned by a single grid cell.
pub const PIXELS_PER_CELL: u32 = CELL_PIXEL_COLUMNS * CELL_PIXEL_ROWS;
/// Width of the global raster in pixels.
pub const RASTER_COLUMNS: u32 = GRID_COLUMNS * CELL_PIXEL_COLUMNS;
/// Height of the global raster in pixels.
pub const RASTER_ROWS: u32 = GRID_ROWS * CELL_PIXEL_ROWS;

/// Stable identity of a grid cell, tagged onto the cell when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalIndex(u32);

impl LogicalIndex {
    /// Creates an index when `value` lies within `0..72`.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value < CELL_COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Interprets a raw tag value, rejecting anything outside `0..72`.
    #[must_use]
    pub fn from_tag(value: i64) -> Option<Self> {
        u32::try_from(value).ok().and_then(Self::new)
    }

    /// Numeric value of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Raw value written into the cell's index tag.
    #[must_use]
    pub const fn tag_value(&self) -> i64 {
        self.0 as i64
    }

    /// Iterates every index in row-major spawn order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CELL_COUNT).map(Self)
    }

    /// Grid placement of the cell carrying this index.
    #[must_use]
    pub const fn grid(&self) -> GridCoord {
        cell_of(*self)
    }
}

impl fmt::Display for LogicalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of one pixel slot within a grid cell, `0..32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalCellIndex(u32);

impl LocalCellIndex {
    /// Creates a slot index when `value` lies within `0..32`.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value < PIXELS_PER_CELL {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Numeric value of the slot index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Column of the slot within the cell's 8×4 sub-raster.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.0 % CELL_PIXEL_COLUMNS
    }

    /// Row of the slot within the cell's 8×4 sub-raster.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.0 / CELL_PIXEL_COLUMNS
    }

    /// Iterates every slot in row-major local order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PIXELS_PER_CELL).map(Self)
    }

    /// Name of the typed property that stores this slot's packed colour.
    #[must_use]
    pub fn property_key(&self) -> String {
        format!("palxel:pixel_{}", self.0)
    }
}

/// Placement of a grid cell within the 8×9 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a grid coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based grid column.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based grid row.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Coordinate of a pixel in the 64×36 global raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalPixel {
    column: u32,
    row: u32,
}

impl GlobalPixel {
    /// Creates a global pixel coordinate when it lies inside the raster.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Option<Self> {
        if column < RASTER_COLUMNS && row < RASTER_ROWS {
            Some(Self { column, row })
        } else {
            None
        }
    }

    /// Zero-based raster column.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based raster row.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for GlobalPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "px[{},{}]", self.column, self.row)
    }
}

/// Grid placement of the cell with the provided logical index.
#[must_use]
pub const fn cell_of(index: LogicalIndex) -> GridCoord {
    GridCoord::new(index.0 % GRID_COLUMNS, index.0 / GRID_COLUMNS)
}

/// Global raster coordinate of one slot of one cell.
#[must_use]
pub const fn local_to_global(index: LogicalIndex, local: LocalCellIndex) -> GlobalPixel {
    let grid = cell_of(index);
    GlobalPixel {
        column: grid.column * CELL_PIXEL_COLUMNS + local.column(),
        row: grid.row * CELL_PIXEL_ROWS + local.row(),
    }
}

/// Cell and slot that own the provided global raster coordinate.
#[must_use]
pub const fn global_to_local(pixel: GlobalPixel) -> (LogicalIndex, LocalCellIndex) {
    let grid_column = pixel.column / CELL_PIXEL_COLUMNS;
    let grid_row = pixel.row / CELL_PIXEL_ROWS;
    let local_column = pixel.column % CELL_PIXEL_COLUMNS;
    let local_row = pixel.row % CELL_PIXEL_ROWS;
    (
        LogicalIndex(grid_row * GRID_COLUMNS + grid_column),
        LocalCellIndex(local_row * CELL_PIXEL_COLUMNS + local_column),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_dimensions_are_sixteen_by_nine() {
        assert_eq!(RASTER_COLUMNS, 64);
        assert_eq!(RASTER_ROWS, 36);
        assert_eq!(CELL_COUNT * PIXELS_PER_CELL, 2304);
    }

    #[test]
    fn cell_of_is_row_major() {
        let index = LogicalIndex::new(5).expect("valid index");
        assert_eq!(cell_of(index), GridCoord::new(5, 0));
        let index = LogicalIndex::new(71).expect("valid index");
        assert_eq!(cell_of(index), GridCoord::new(7, 8));
    }

    #[test]
    fn local_slot_nine_maps_into_second_row() {
        let index = LogicalIndex::new(5).expect("valid index");
        let local = LocalCellIndex::new(9).expect("valid slot");
        assert_eq!((local.column(), local.row()), (1, 1));
        let pixel = local_to_global(index, local);
        assert_eq!((pixel.column(), pixel.row()), (41, 1));
        assert_eq!(global_to_local(pixel), (index, local));
    }

    #[test]
    fn out_of_range_identifiers_are_rejected() {
        assert!(LogicalIndex::new(72).is_none());
        assert!(LogicalIndex::from_tag(-1).is_none());
        assert!(LogicalIndex::from_tag(i64::MAX).is_none());
        assert!(LocalCellIndex::new(32).is_none());
        assert!(GlobalPixel::new(64, 0).is_none());
        assert!(GlobalPixel::new(0, 36).is_none());
    }

    #[test]
    fn property_keys_are_distinct_per_slot() {
        let keys: std::collections::HashSet<String> =
            LocalCellIndex::all().map(|slot| slot.property_key()).collect();
        assert_eq!(keys.len(), PIXELS_PER_CELL as usize);
    }
}
