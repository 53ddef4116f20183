//! Reading and writing the packed colour slots of a single grid cell.

use palxel_core::{EntityHandle, Host, HostError, LocalCellIndex, PackedColor, Rgb};

/// Reads one slot. A slot that was never written reads as black.
pub fn read_pixel<H: Host + ?Sized>(
    host: &H,
    handle: EntityHandle,
    local: LocalCellIndex,
) -> Result<Rgb, HostError> {
    let raw = host.property(handle, &local.property_key())?;
    Ok(PackedColor::from_raw(raw.unwrap_or(0)).unpack())
}

/// Writes one slot.
pub fn write_pixel<H: Host + ?Sized>(
    host: &mut H,
    handle: EntityHandle,
    local: LocalCellIndex,
    color: Rgb,
) -> Result<(), HostError> {
    host.set_property(handle, &local.property_key(), color.pack().get())
}

/// Writes every slot of one cell in local order. Missing entries are
/// written as black; the first rejected write aborts the remainder.
pub fn write_all<H: Host + ?Sized>(
    host: &mut H,
    handle: EntityHandle,
    colors: &[Rgb],
) -> Result<(), HostError> {
    for local in LocalCellIndex::all() {
        let color = colors
            .get(local.get() as usize)
            .copied()
            .unwrap_or(Rgb::BLACK);
        write_pixel(host, handle, local, color)?;
    }
    Ok(())
}
