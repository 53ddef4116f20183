#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative single-threaded host for the Palxel display.
//!
//! The [`World`] implements every collaborator trait from `palxel-core`:
//! object storage, the tick-driven scheduler, the notice mailbox and actor
//! presence. Mutations that are not part of those traits are expressed as
//! [`Command`] values and executed through [`apply`].

mod entities;
mod tasks;

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use palxel_core::{
    ActorId, ActorSnapshot, Command, EntityHandle, Event, Host, HostError, Messenger, Position,
    Presence, RegionId, Scheduler, Task, TaskHandle,
};

use self::{entities::EntityRegistry, tasks::TaskQueue};

/// Text delivered to an actor through the messaging channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Recipient of the notice.
    pub to: ActorId,
    /// Message body.
    pub text: String,
}

/// Represents the authoritative host world state.
#[derive(Debug)]
pub struct World {
    tick: u64,
    entities: EntityRegistry,
    loaded_regions: BTreeSet<RegionId>,
    actors: BTreeMap<ActorId, ActorSnapshot>,
    next_actor: u32,
    tasks: TaskQueue,
    notices: Vec<Notice>,
}

impl World {
    /// Creates an empty world with every region loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick: 0,
            entities: EntityRegistry::new(),
            loaded_regions: RegionId::ALL.into_iter().collect(),
            actors: BTreeMap::new(),
            next_actor: 1,
            tasks: TaskQueue::new(),
            notices: Vec::new(),
        }
    }

    /// Removes and returns every notice delivered so far.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn ensure_loaded(&self, region: RegionId) -> Result<(), HostError> {
        if self.loaded_regions.contains(&region) {
            Ok(())
        } else {
            Err(HostError::RegionUnavailable(region))
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for World {
    fn list_entities(&self, region: RegionId, kind: &str) -> Result<Vec<EntityHandle>, HostError> {
        self.ensure_loaded(region)?;
        Ok(self.entities.of_kind_in(region, kind))
    }

    fn spawn(
        &mut self,
        region: RegionId,
        kind: &str,
        position: Position,
    ) -> Result<EntityHandle, HostError> {
        self.ensure_loaded(region)?;
        let handle = self.entities.insert(kind, region, position);
        trace!("spawned {kind} as entity {} in {region}", handle.get());
        Ok(handle)
    }

    fn remove(&mut self, handle: EntityHandle) -> Result<(), HostError> {
        if self.entities.remove(handle) {
            Ok(())
        } else {
            Err(HostError::NotFound(handle))
        }
    }

    fn position(&self, handle: EntityHandle) -> Result<Position, HostError> {
        self.entities
            .get(handle)
            .map(|record| record.position)
            .ok_or(HostError::NotFound(handle))
    }

    fn tag(&self, handle: EntityHandle, key: &str) -> Result<Option<i64>, HostError> {
        self.entities
            .get(handle)
            .map(|record| record.tags.get(key).copied())
            .ok_or(HostError::NotFound(handle))
    }

    fn set_tag(&mut self, handle: EntityHandle, key: &str, value: i64) -> Result<(), HostError> {
        let record = self
            .entities
            .get_mut(handle)
            .ok_or_else(|| HostError::WriteRejected {
                handle,
                key: key.to_owned(),
            })?;
        let _ = record.tags.insert(key.to_owned(), value);
        Ok(())
    }

    fn property(&self, handle: EntityHandle, key: &str) -> Result<Option<u32>, HostError> {
        self.entities
            .get(handle)
            .map(|record| record.properties.get(key).copied())
            .ok_or(HostError::NotFound(handle))
    }

    fn set_property(
        &mut self,
        handle: EntityHandle,
        key: &str,
        value: u32,
    ) -> Result<(), HostError> {
        let record = self
            .entities
            .get_mut(handle)
            .ok_or_else(|| HostError::WriteRejected {
                handle,
                key: key.to_owned(),
            })?;
        let _ = record.properties.insert(key.to_owned(), value);
        Ok(())
    }
}

impl Scheduler for World {
    fn run_after(&mut self, delay: u32, task: Task) -> TaskHandle {
        let due_tick = self.tick + u64::from(delay.max(1));
        self.tasks.push(due_tick, task)
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.tasks.cancel(handle)
    }
}

impl Messenger for World {
    fn notify(&mut self, user: ActorId, text: &str) {
        self.notices.push(Notice {
            to: user,
            text: text.to_owned(),
        });
    }
}

impl Presence for World {
    fn actor(&self, id: ActorId) -> Option<ActorSnapshot> {
        self.actors.get(&id).copied()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick = world.tick.saturating_add(1);
            out_events.push(Event::TimeAdvanced { tick: world.tick });
            for (handle, task) in world.tasks.drain_due(world.tick) {
                out_events.push(Event::TaskDue { handle, task });
            }
        }
        Command::JoinActor {
            kind,
            region,
            position,
        } => {
            let actor = ActorId::new(world.next_actor);
            world.next_actor += 1;
            let _ = world.actors.insert(
                actor,
                ActorSnapshot {
                    id: actor,
                    kind,
                    region,
                    position,
                },
            );
            out_events.push(Event::ActorJoined { actor });
        }
        Command::MoveActor {
            actor,
            region,
            position,
        } => {
            if let Some(snapshot) = world.actors.get_mut(&actor) {
                snapshot.region = region;
                snapshot.position = position;
                out_events.push(Event::ActorMoved { actor });
            } else {
                debug!("ignoring move of unknown actor {}", actor.get());
            }
        }
        Command::SetRegionLoaded { region, loaded } => {
            let changed = if loaded {
                world.loaded_regions.insert(region)
            } else {
                world.loaded_regions.remove(&region)
            };
            if changed {
                out_events.push(Event::RegionAvailabilityChanged { region, loaded });
            }
        }
        Command::SendScriptEvent { id, source } => {
            out_events.push(Event::ScriptEventReceived { id, source });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use palxel_core::{RegionId, TaskHandle};

    use super::World;

    /// Current simulation tick.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Number of live objects of any kind in any region.
    #[must_use]
    pub fn entity_count(world: &World) -> usize {
        world.entities.len()
    }

    /// Number of deferred tasks still waiting to run.
    #[must_use]
    pub fn pending_tasks(world: &World) -> usize {
        world.tasks.len()
    }

    /// Reports whether the task behind `handle` is still queued.
    #[must_use]
    pub fn is_task_pending(world: &World, handle: TaskHandle) -> bool {
        world.tasks.contains(handle)
    }

    /// Reports whether `region` can currently be queried.
    #[must_use]
    pub fn is_region_loaded(world: &World, region: RegionId) -> bool {
        world.loaded_regions.contains(&region)
    }
}
