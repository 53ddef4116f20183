//! Collaborator contracts the display consumes from its host.
//!
//! The host owns object existence, per-object storage, deferred work,
//! player presence and messaging. Everything in this module is the narrow
//! surface the display needs from it; handles handed out here are plain
//! keys and may stop resolving at any moment.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addressing::LogicalIndex;

/// World region that can be queried independently of the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionId {
    /// The default surface region.
    Overworld,
    /// The underground region.
    Nether,
    /// The far region.
    TheEnd,
}

impl RegionId {
    /// Every region the host knows about, in query order.
    pub const ALL: [RegionId; 3] = [RegionId::Overworld, RegionId::Nether, RegionId::TheEnd];

    /// Stable textual name of the region.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Nether => "nether",
            Self::TheEnd => "the_end",
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point in world space measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// Depth axis.
    pub z: f64,
}

impl Position {
    /// Creates a position from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the position shifted by the provided deltas.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared straight-line distance between two positions.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Straight-line distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Opaque key for a host object. A handle may outlive the object it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Creates a handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Identifier of an actor able to trigger display interactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates an actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Distinguishes user-controlled characters from every other event source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A user-controlled character.
    Player,
    /// Any other source, such as a command block or a mob.
    Other,
}

/// Snapshot of an actor at the moment it was queried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Identifier of the actor.
    pub id: ActorId,
    /// Whether the actor is user-controlled.
    pub kind: ActorKind,
    /// Region the actor currently occupies.
    pub region: RegionId,
    /// Current position of the actor.
    pub position: Position,
}

/// Cancellation key returned by [`Scheduler::run_after`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Creates a task handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Request to materialise one grid cell on a later tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Region that receives the cell.
    pub region: RegionId,
    /// Logical index to tag onto the cell.
    pub index: LogicalIndex,
    /// World position of the cell.
    pub position: Position,
}

/// Deferred continuation queued with the host scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Task {
    /// Spawn and initialise one grid cell.
    MaterializeCell(SpawnOrder),
    /// Repaint every live cell with random colours.
    AnimationFrame,
}

/// Failures reported by host collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    /// The handle no longer names a live object.
    #[error("entity {} no longer exists", .0.get())]
    NotFound(EntityHandle),
    /// The region cannot be queried right now.
    #[error("region {0} is unavailable")]
    RegionUnavailable(RegionId),
    /// A tag or property write did not land because the object vanished.
    #[error("write of `{key}` to entity {} was rejected", .handle.get())]
    WriteRejected {
        /// Handle the write targeted.
        handle: EntityHandle,
        /// Tag or property key that was being written.
        key: String,
    },
}

/// Host object API: existence, enumeration and per-object storage.
pub trait Host {
    /// Lists every live object of `kind` inside `region`.
    fn list_entities(&self, region: RegionId, kind: &str) -> Result<Vec<EntityHandle>, HostError>;

    /// Spawns a new object of `kind` at `position`.
    fn spawn(
        &mut self,
        region: RegionId,
        kind: &str,
        position: Position,
    ) -> Result<EntityHandle, HostError>;

    /// Removes an object. Callers treat a failure as "already gone".
    fn remove(&mut self, handle: EntityHandle) -> Result<(), HostError>;

    /// World position of a live object.
    fn position(&self, handle: EntityHandle) -> Result<Position, HostError>;

    /// Reads an arbitrary-key tag.
    fn tag(&self, handle: EntityHandle, key: &str) -> Result<Option<i64>, HostError>;

    /// Writes an arbitrary-key tag.
    fn set_tag(&mut self, handle: EntityHandle, key: &str, value: i64) -> Result<(), HostError>;

    /// Reads a typed numeric property.
    fn property(&self, handle: EntityHandle, key: &str) -> Result<Option<u32>, HostError>;

    /// Writes a typed numeric property.
    fn set_property(
        &mut self,
        handle: EntityHandle,
        key: &str,
        value: u32,
    ) -> Result<(), HostError>;
}

/// Host deferred-task scheduler measured in simulation ticks.
pub trait Scheduler {
    /// Queues `task` to run after `delay` ticks. A zero delay still defers
    /// to the next tick.
    fn run_after(&mut self, delay: u32, task: Task) -> TaskHandle;

    /// Cancels a queued task. Returns `false` when nothing was pending.
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

/// Host text channel used to report status to a user.
pub trait Messenger {
    /// Sends a fire-and-forget notice.
    fn notify(&mut self, user: ActorId, text: &str);
}

/// Host lookup of the actors that may trigger interactions.
pub trait Presence {
    /// Current snapshot of an actor, if it is still present.
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot>;
}
