#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interactive configuration surface for the Palxel display.
//!
//! [`Palxel`] is the composition root: it owns the directory, the grid
//! lifecycle, the animation and the menu flow, routes world events to them,
//! and hands dialogs back to the adapter as [`Prompt`] values. The adapter
//! shows each prompt and feeds the user's answer back through
//! [`Palxel::respond`].

mod flow;
mod forms;
mod triggers;

use log::{debug, trace};
use palxel_core::{ActorId, ActorKind, Event, Host, Messenger, Presence, Scheduler, Task};
use palxel_system_animation::{Animation, AnimationState, Config as AnimationConfig};
use palxel_system_directory::{Config as DirectoryConfig, Directory, Raster};
use palxel_system_lifecycle::{Config as LifecycleConfig, Lifecycle, MaterializeOutcome};
use rand::Rng;

pub use self::{
    flow::InteractionFlow,
    forms::{ActionForm, Form, FormResponse, ModalForm, Prompt, Slider},
    triggers::{Trigger, Triggers},
};

/// Trigger namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "palxel";

/// Root-menu cell listing limit used when none is configured.
pub const DEFAULT_NEAREST_LIMIT: usize = 10;

const SPAWN_FAILED: &str = "Grid spawn failed";

/// Aggregated configuration for every component of the display.
#[derive(Clone, Debug)]
pub struct Config {
    /// Regions scanned for grid cells.
    pub directory: DirectoryConfig,
    /// Spawn staggering.
    pub lifecycle: LifecycleConfig,
    /// Animation frame pacing.
    pub animation: AnimationConfig,
    /// Namespace of the script-event triggers.
    pub namespace: String,
    /// Maximum number of nearby cells listed in the root menu.
    pub nearest_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            lifecycle: LifecycleConfig::default(),
            animation: AnimationConfig::default(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            nearest_limit: DEFAULT_NEAREST_LIMIT,
        }
    }
}

/// The long-lived components every interaction step may touch.
#[derive(Debug)]
pub struct Components {
    /// Enumeration and re-resolution of grid cells.
    pub directory: Directory,
    /// Sole writer of grid cell existence.
    pub lifecycle: Lifecycle,
    /// The single animation instance.
    pub animation: Animation,
    /// User who asked for the reset still materialising, told once if it
    /// fails.
    pub requester: Option<ActorId>,
}

/// Composition root wiring the display's components to the host.
#[derive(Debug)]
pub struct Palxel<R> {
    components: Components,
    flow: InteractionFlow,
    triggers: Triggers,
    rng: R,
}

impl<R: Rng> Palxel<R> {
    /// Creates the display with the supplied configuration and randomness
    /// source for the animation.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            components: Components {
                directory: Directory::new(config.directory),
                lifecycle: Lifecycle::new(config.lifecycle),
                animation: Animation::new(config.animation),
                requester: None,
            },
            flow: InteractionFlow::new(config.nearest_limit),
            triggers: Triggers::new(&config.namespace),
            rng,
        }
    }

    /// Reacts to world events, pushing any dialog that must be shown.
    pub fn handle<W>(&mut self, events: &[Event], world: &mut W, out: &mut Vec<Prompt>)
    where
        W: Host + Scheduler + Messenger + Presence + ?Sized,
    {
        for event in events {
            match event {
                Event::TaskDue {
                    handle,
                    task: Task::MaterializeCell(order),
                } => {
                    let outcome = self
                        .components
                        .lifecycle
                        .materialize(*handle, world, *order);
                    self.report_spawn(outcome, world);
                }
                Event::TaskDue {
                    handle,
                    task: Task::AnimationFrame,
                } => {
                    let _ = self.components.animation.on_frame(
                        *handle,
                        world,
                        &self.components.directory,
                        &mut self.rng,
                    );
                }
                Event::ScriptEventReceived { id, source } => {
                    self.handle_script_event(id, *source, world, out);
                }
                Event::TimeAdvanced { .. }
                | Event::ActorJoined { .. }
                | Event::ActorMoved { .. }
                | Event::RegionAvailabilityChanged { .. } => {}
            }
        }
    }

    /// Feeds a user's answer to their open dialog back into the flow.
    pub fn respond<W>(
        &mut self,
        world: &mut W,
        user: ActorId,
        response: FormResponse,
        out: &mut Vec<Prompt>,
    ) where
        W: Host + Scheduler + Messenger + Presence + ?Sized,
    {
        let Some(snapshot) = world.actor(user) else {
            debug!("dropping answer from departed actor {}", user.get());
            self.flow.abandon(user);
            return;
        };
        if let Some(form) = self
            .flow
            .respond(world, &mut self.components, &snapshot, response)
        {
            out.push(Prompt { user, form });
        }
    }

    /// Reports whether `user` has a dialog awaiting an answer.
    #[must_use]
    pub fn is_waiting(&self, user: ActorId) -> bool {
        self.flow.is_waiting(user)
    }

    /// Current animation state.
    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        self.components.animation.state()
    }

    /// Reports whether a reset is still materialising cells.
    #[must_use]
    pub fn is_spawning(&self) -> bool {
        self.components.lifecycle.is_spawning()
    }

    /// Number of cell materialisations still queued.
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.components.lifecycle.pending()
    }

    /// Number of live grid cells visible through the directory.
    pub fn live_cells<H: Host + ?Sized>(&self, host: &H) -> usize {
        self.components.directory.live_count(host)
    }

    /// Reads the whole raster as it currently stands.
    pub fn raster<H: Host + ?Sized>(&self, host: &H) -> Raster {
        Raster::capture(&self.components.directory, host)
    }

    /// Trigger identifiers this display answers to.
    #[must_use]
    pub fn triggers(&self) -> &Triggers {
        &self.triggers
    }

    fn report_spawn<W>(&mut self, outcome: MaterializeOutcome, world: &mut W)
    where
        W: Messenger + ?Sized,
    {
        if let MaterializeOutcome::Failed(error) = outcome {
            if let Some(user) = self.components.requester.take() {
                world.notify(user, &format!("{SPAWN_FAILED}: {error}"));
            }
        }
        if !self.components.lifecycle.is_spawning() {
            self.components.requester = None;
        }
    }

    fn handle_script_event<W>(
        &mut self,
        id: &str,
        source: Option<ActorId>,
        world: &mut W,
        out: &mut Vec<Prompt>,
    ) where
        W: Host + Scheduler + Messenger + Presence + ?Sized,
    {
        let Some(trigger) = self.triggers.parse(id) else {
            return;
        };
        let Some(user) = source
            .and_then(|actor| world.actor(actor))
            .filter(|snapshot| snapshot.kind == ActorKind::Player)
        else {
            trace!("dropping `{id}` raised by a non-player source");
            return;
        };

        match trigger {
            Trigger::OpenMenu => {
                let form = self.flow.open_root(&*world, &self.components, &user);
                out.push(Prompt {
                    user: user.id,
                    form,
                });
            }
            Trigger::ToggleAnimation => {
                self.flow
                    .toggle_animation(world, &mut self.components, user.id);
            }
        }
    }
}
