#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Destruction and staggered respawn of the 72-cell display grid.
//!
//! A reset removes every live cell, then queues one materialisation task
//! per logical index so the host creates at most a bounded number of cells
//! per tick. The grid is only consistent again once every queued task ran.

use log::{debug, info, warn};
use palxel_core::{
    EntityHandle, Host, HostError, LogicalIndex, Position, RegionId, Scheduler, SpawnOrder, Task,
    TaskHandle, CELL_ENTITY_TYPE, CELL_HEIGHT, CELL_WIDTH, INDEX_TAG,
};
use palxel_system_animation::Animation;
use palxel_system_directory::{write_all, Directory};

/// Configuration parameters required to construct the lifecycle system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    stagger: u32,
}

impl Config {
    /// Creates a configuration that delays cell `i` by `i * stagger` ticks.
    #[must_use]
    pub const fn new(stagger: u32) -> Self {
        Self { stagger }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Summary of the synchronous half of a reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Cells removed from the world.
    pub removed: usize,
    /// Cells that were already gone when removal was attempted.
    pub already_gone: usize,
    /// Spawns of an earlier reset that were still queued and got cancelled.
    pub superseded: usize,
    /// Materialisation tasks queued.
    pub scheduled: usize,
}

/// Outcome of one released materialisation task.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterializeOutcome {
    /// The cell now exists with its index tag and zeroed slots.
    Spawned(EntityHandle),
    /// The task belonged to a reset that was superseded.
    Superseded,
    /// The host refused to create or initialise the cell.
    Failed(HostError),
}

/// Sole writer of grid cell existence and initial state.
#[derive(Debug)]
pub struct Lifecycle {
    stagger: u32,
    pending: Vec<TaskHandle>,
}

impl Lifecycle {
    /// Creates a lifecycle system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            stagger: config.stagger,
            pending: Vec::new(),
        }
    }

    /// Reports whether materialisation tasks are still queued.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of materialisation tasks still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Removes every live cell and queues a fresh 72-cell grid at `anchor`.
    ///
    /// Stops the animation first, and cancels any spawns still queued from
    /// an earlier reset so logical indices stay unique.
    pub fn reset<W>(
        &mut self,
        world: &mut W,
        directory: &Directory,
        animation: &mut Animation,
        region: RegionId,
        anchor: Position,
    ) -> ResetReport
    where
        W: Host + Scheduler + ?Sized,
    {
        let _ = animation.stop(world);

        let mut report = ResetReport::default();
        for handle in self.pending.drain(..) {
            if world.cancel(handle) {
                report.superseded += 1;
            }
        }

        for handle in directory.list_all(&*world) {
            match world.remove(handle) {
                Ok(()) => report.removed += 1,
                Err(error) => {
                    debug!("removal of entity {} ignored: {error}", handle.get());
                    report.already_gone += 1;
                }
            }
        }

        for (offset, (index, position)) in (0u32..).zip(layout(anchor)) {
            let order = SpawnOrder {
                region,
                index,
                position,
            };
            let delay = offset.saturating_mul(self.stagger);
            self.pending
                .push(world.run_after(delay, Task::MaterializeCell(order)));
        }
        report.scheduled = self.pending.len();

        info!(
            "grid reset in {region}: removed {}, queued {} spawns",
            report.removed, report.scheduled
        );
        report
    }

    /// Runs one released materialisation task.
    pub fn materialize<H: Host + ?Sized>(
        &mut self,
        handle: TaskHandle,
        host: &mut H,
        order: SpawnOrder,
    ) -> MaterializeOutcome {
        let Some(position) = self.pending.iter().position(|pending| *pending == handle) else {
            debug!("ignoring superseded spawn of cell {}", order.index);
            return MaterializeOutcome::Superseded;
        };
        let _ = self.pending.swap_remove(position);

        let outcome = match spawn_cell(host, order) {
            Ok(cell) => MaterializeOutcome::Spawned(cell),
            Err(error) => {
                warn!("failed to materialise cell {}: {error}", order.index);
                MaterializeOutcome::Failed(error)
            }
        };
        if self.pending.is_empty() {
            info!("grid materialisation finished");
        }
        outcome
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Row-major placement of every cell relative to `anchor`.
pub fn layout(anchor: Position) -> impl Iterator<Item = (LogicalIndex, Position)> {
    LogicalIndex::all().map(move |index| {
        let grid = index.grid();
        let position = anchor.offset(
            f64::from(grid.column()) * CELL_WIDTH,
            f64::from(grid.row()) * CELL_HEIGHT,
            0.0,
        );
        (index, position)
    })
}

fn spawn_cell<H: Host + ?Sized>(
    host: &mut H,
    order: SpawnOrder,
) -> Result<EntityHandle, HostError> {
    let cell = host.spawn(order.region, CELL_ENTITY_TYPE, order.position)?;
    host.set_tag(cell, INDEX_TAG, order.index.tag_value())?;
    write_all(host, cell, &[])?;
    Ok(cell)
}
