//! Property-based invariants for colour packing and raster addressing.

use std::collections::HashSet;

use palxel_core::{
    global_to_local, local_to_global, GlobalPixel, LocalCellIndex, LogicalIndex, PackedColor, Rgb,
    CELL_COUNT, PIXELS_PER_CELL, RASTER_COLUMNS, RASTER_ROWS,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn unpack_inverts_pack(red in any::<u8>(), green in any::<u8>(), blue in any::<u8>()) {
        let packed = PackedColor::pack(red, green, blue);
        prop_assert_eq!(packed.unpack(), Rgb::new(red, green, blue));
        prop_assert!(packed.get() <= 0xFF_FFFF);
    }

    #[test]
    fn lossy_construction_matches_rounded_channels(
        red in -100.0f64..400.0,
        green in -100.0f64..400.0,
        blue in -100.0f64..400.0,
    ) {
        let color = Rgb::from_lossy(red, green, blue);
        let expect = |value: f64| value.round().clamp(0.0, 255.0) as u8;
        prop_assert_eq!(color, Rgb::new(expect(red), expect(green), expect(blue)));
    }

    #[test]
    fn local_to_global_stays_inside_raster(
        index in 0u32..CELL_COUNT,
        local in 0u32..PIXELS_PER_CELL,
    ) {
        let index = LogicalIndex::new(index).expect("index in range");
        let local = LocalCellIndex::new(local).expect("slot in range");
        let pixel = local_to_global(index, local);
        prop_assert!(pixel.column() < RASTER_COLUMNS);
        prop_assert!(pixel.row() < RASTER_ROWS);
        prop_assert_eq!(global_to_local(pixel), (index, local));
    }
}

#[test]
fn addressing_is_a_bijection_over_the_raster() {
    let mut seen = HashSet::new();
    for index in LogicalIndex::all() {
        for local in LocalCellIndex::all() {
            let pixel = local_to_global(index, local);
            assert!(seen.insert(pixel), "{pixel} produced twice");
        }
    }
    assert_eq!(seen.len(), (RASTER_COLUMNS * RASTER_ROWS) as usize);

    for column in 0..RASTER_COLUMNS {
        for row in 0..RASTER_ROWS {
            let pixel = GlobalPixel::new(column, row).expect("pixel in range");
            assert!(seen.contains(&pixel), "{pixel} never produced");
        }
    }
}
