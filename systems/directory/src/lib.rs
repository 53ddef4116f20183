#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enumeration and re-resolution of the live grid cells backing the display.
//!
//! Handles handed out by the host are only keys. Any code that crossed a
//! suspension point (a dialog round trip or a deferred task) must call
//! [`Directory::refresh`] before touching the object again; a miss is an
//! ordinary `None`, never an error.

mod pixels;
mod raster;

use log::debug;
use palxel_core::{
    EntityHandle, Host, HostError, LogicalIndex, RegionId, CELL_ENTITY_TYPE, INDEX_TAG,
};

pub use self::{
    pixels::{read_pixel, write_all, write_pixel},
    raster::Raster,
};

/// Configuration parameters required to construct the directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    regions: Vec<RegionId>,
}

impl Config {
    /// Creates a configuration that scans the provided regions in order.
    #[must_use]
    pub fn new(regions: Vec<RegionId>) -> Self {
        Self { regions }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(RegionId::ALL.to_vec())
    }
}

/// Directory of the display's grid cells across every supported region.
#[derive(Clone, Debug)]
pub struct Directory {
    regions: Vec<RegionId>,
}

impl Directory {
    /// Creates a directory scanning the configured regions.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            regions: config.regions,
        }
    }

    /// Regions scanned by [`Directory::list_all`], in order.
    #[must_use]
    pub fn regions(&self) -> &[RegionId] {
        &self.regions
    }

    /// Lists every live grid cell. Regions that cannot be queried are
    /// skipped, so the result may be partial.
    pub fn list_all<H: Host + ?Sized>(&self, host: &H) -> Vec<EntityHandle> {
        let mut handles = Vec::new();
        for region in &self.regions {
            match host.list_entities(*region, CELL_ENTITY_TYPE) {
                Ok(found) => handles.extend(found),
                Err(error) => debug!("skipping region {region}: {error}"),
            }
        }
        handles
    }

    /// Finds the live cell whose index tag equals `key`.
    ///
    /// Any integer is accepted; keys outside `0..72` simply never match.
    pub fn resolve<H: Host + ?Sized>(&self, host: &H, key: i64) -> Option<EntityHandle> {
        self.list_all(host)
            .into_iter()
            .find(|handle| matches!(host.tag(*handle, INDEX_TAG), Ok(Some(tag)) if tag == key))
    }

    /// Re-resolves a possibly stale handle through its index tag.
    ///
    /// Returns `None` immediately if the handle itself no longer names a
    /// live object or carries no index tag.
    pub fn refresh<H: Host + ?Sized>(&self, host: &H, stale: EntityHandle) -> Option<EntityHandle> {
        match host.tag(stale, INDEX_TAG) {
            Ok(Some(key)) => self.resolve(host, key),
            Ok(None) => None,
            Err(error) => {
                debug!("refresh of entity {} failed: {error}", stale.get());
                None
            }
        }
    }

    /// Number of live grid cells currently visible.
    pub fn live_count<H: Host + ?Sized>(&self, host: &H) -> usize {
        self.list_all(host).len()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Reads the raw index tag off a handle.
pub fn index_tag<H: Host + ?Sized>(
    host: &H,
    handle: EntityHandle,
) -> Result<Option<i64>, HostError> {
    host.tag(handle, INDEX_TAG)
}

/// Reads the index tag off a handle as a validated logical index.
///
/// Handles that vanished, carry no tag, or carry an out-of-range tag all
/// yield `None`.
pub fn logical_index<H: Host + ?Sized>(host: &H, handle: EntityHandle) -> Option<LogicalIndex> {
    index_tag(host, handle)
        .ok()
        .flatten()
        .and_then(LogicalIndex::from_tag)
}
