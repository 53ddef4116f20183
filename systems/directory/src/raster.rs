//! Point-in-time read of the whole 64×36 raster.

use palxel_core::{
    local_to_global, GlobalPixel, Host, LocalCellIndex, Rgb, RASTER_COLUMNS, RASTER_ROWS,
};

use crate::{logical_index, read_pixel, Directory};

/// Colours of every global pixel. Pixels whose cell is missing are `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pixels: Vec<Option<Rgb>>,
}

impl Raster {
    /// Reads every live cell through the directory.
    ///
    /// When two live cells claim the same index, the first one enumerated
    /// wins.
    pub fn capture<H: Host + ?Sized>(directory: &Directory, host: &H) -> Self {
        let mut raster = Self {
            pixels: vec![None; (RASTER_COLUMNS * RASTER_ROWS) as usize],
        };
        for handle in directory.list_all(host) {
            let Some(index) = logical_index(host, handle) else {
                continue;
            };
            for local in LocalCellIndex::all() {
                let slot = raster.slot(local_to_global(index, local));
                if raster.pixels[slot].is_some() {
                    continue;
                }
                if let Ok(color) = read_pixel(host, handle, local) {
                    raster.pixels[slot] = Some(color);
                }
            }
        }
        raster
    }

    /// Colour of one pixel, if its cell was live when captured.
    #[must_use]
    pub fn get(&self, pixel: GlobalPixel) -> Option<Rgb> {
        self.pixels[self.slot(pixel)]
    }

    /// Number of pixels whose cell was live when captured.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.is_some()).count()
    }

    /// Iterates rows from top to bottom, each row left to right.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Rgb>]> {
        self.pixels.chunks(RASTER_COLUMNS as usize)
    }

    fn slot(&self, pixel: GlobalPixel) -> usize {
        (pixel.row() * RASTER_COLUMNS + pixel.column()) as usize
    }
}
