#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Palxel display.
//!
//! The display renders a 64×36 raster out of 72 host objects that each own
//! 32 colour slots. This crate defines the pure pieces every other crate
//! agrees on: raster addressing, colour packing, the collaborator traits
//! the host provides, and the [`Command`]/[`Event`] message surface used to
//! drive the authoritative world. Adapters submit commands, the world
//! executes them via its `apply` entry point and broadcasts events, and
//! systems react to those events through the collaborator traits.

pub mod addressing;
pub mod color;
pub mod host;

pub use addressing::{
    cell_of, global_to_local, local_to_global, GlobalPixel, GridCoord, LocalCellIndex,
    LogicalIndex, CELL_COUNT, CELL_PIXEL_COLUMNS, CELL_PIXEL_ROWS, GRID_COLUMNS, GRID_ROWS,
    PIXELS_PER_CELL, RASTER_COLUMNS, RASTER_ROWS,
};
pub use color::{to_hex, PackedColor, Rgb};
pub use host::{
    ActorId, ActorKind, ActorSnapshot, EntityHandle, Host, HostError, Messenger, Position,
    Presence, RegionId, Scheduler, SpawnOrder, Task, TaskHandle,
};

/// Entity type id under which every grid cell is spawned.
pub const CELL_ENTITY_TYPE: &str = "palxel:display_cell";

/// Tag key holding a grid cell's logical index.
pub const INDEX_TAG: &str = "palxel_index";

/// World units between horizontally adjacent grid cells.
pub const CELL_WIDTH: f64 = 1.0;

/// World units between vertically adjacent grid cells.
pub const CELL_HEIGHT: f64 = 0.5;

/// Commands that express world mutations outside the collaborator traits.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick and releases due tasks.
    Tick,
    /// Adds an actor to the world.
    JoinActor {
        /// Whether the actor is user-controlled.
        kind: ActorKind,
        /// Region the actor appears in.
        region: RegionId,
        /// Position the actor appears at.
        position: Position,
    },
    /// Moves an existing actor.
    MoveActor {
        /// Actor to move.
        actor: ActorId,
        /// Destination region.
        region: RegionId,
        /// Destination position.
        position: Position,
    },
    /// Loads or unloads a region.
    SetRegionLoaded {
        /// Region whose availability changes.
        region: RegionId,
        /// Whether the region can be queried afterwards.
        loaded: bool,
    },
    /// Delivers a named script event on behalf of an optional source actor.
    SendScriptEvent {
        /// Namespaced event identifier, for example `palxel:palxel`.
        id: String,
        /// Actor that raised the event, if any.
        source: Option<ActorId>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The simulation advanced to a new tick.
    TimeAdvanced {
        /// Tick counter after advancing.
        tick: u64,
    },
    /// A scheduled task reached its due tick and was released.
    TaskDue {
        /// Handle originally returned by the scheduler.
        handle: TaskHandle,
        /// Continuation to execute.
        task: Task,
    },
    /// An actor joined the world.
    ActorJoined {
        /// Identifier assigned to the actor.
        actor: ActorId,
    },
    /// An actor changed position or region.
    ActorMoved {
        /// Actor that moved.
        actor: ActorId,
    },
    /// A region was loaded or unloaded.
    RegionAvailabilityChanged {
        /// Region whose availability changed.
        region: RegionId,
        /// Whether the region can now be queried.
        loaded: bool,
    },
    /// A script event was received.
    ScriptEventReceived {
        /// Namespaced event identifier.
        id: String,
        /// Actor that raised the event, if any.
        source: Option<ActorId>,
    },
}
