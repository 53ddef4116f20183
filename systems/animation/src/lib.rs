#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-instance background animation that repaints every pixel with
//! independently random colours once per scheduled frame.

use log::{debug, info};
use palxel_core::{EntityHandle, Host, LocalCellIndex, Rgb, Scheduler, Task, TaskHandle};
use palxel_system_directory::{write_pixel, Directory};
use rand::Rng;

/// Fastest frame interval the scheduler can express.
pub const FASTEST_INTERVAL: u32 = 1;

/// Configuration parameters required to construct the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    frame_interval: u32,
}

impl Config {
    /// Creates a configuration repainting every `frame_interval` ticks.
    /// Zero is treated as the fastest interval.
    #[must_use]
    pub const fn new(frame_interval: u32) -> Self {
        let frame_interval = if frame_interval == 0 {
            FASTEST_INTERVAL
        } else {
            frame_interval
        };
        Self { frame_interval }
    }

    /// Ticks between successive frames.
    #[must_use]
    pub const fn frame_interval(&self) -> u32 {
        self.frame_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(FASTEST_INTERVAL)
    }
}

/// Observable lifecycle of the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// No frame is scheduled.
    Stopped,
    /// Exactly one frame continuation is scheduled.
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Session {
    Stopped,
    Running { pending: TaskHandle },
}

/// Outcome of painting one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Cells whose 32 slots were all overwritten.
    pub painted: usize,
    /// Cells that vanished mid-frame and were skipped.
    pub skipped: usize,
}

/// Start/stop-able random colour animation.
#[derive(Debug)]
pub struct Animation {
    frame_interval: u32,
    session: Session,
}

impl Animation {
    /// Creates a stopped animation using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            frame_interval: config.frame_interval(),
            session: Session::Stopped,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        match self.session {
            Session::Stopped => AnimationState::Stopped,
            Session::Running { .. } => AnimationState::Running,
        }
    }

    /// Reports whether a frame continuation is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == AnimationState::Running
    }

    /// Handle of the scheduled frame continuation, if running.
    #[must_use]
    pub fn pending(&self) -> Option<TaskHandle> {
        match self.session {
            Session::Stopped => None,
            Session::Running { pending } => Some(pending),
        }
    }

    /// Starts the animation. Returns `false` if it was already running.
    pub fn start<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if self.is_running() {
            return false;
        }
        let pending = scheduler.run_after(self.frame_interval, Task::AnimationFrame);
        self.session = Session::Running { pending };
        info!("random animation started");
        true
    }

    /// Stops the animation and cancels its scheduled continuation.
    /// Returns `false` if it was already stopped.
    pub fn stop<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        let Session::Running { pending } = self.session else {
            return false;
        };
        if !scheduler.cancel(pending) {
            debug!("animation continuation {} was no longer queued", pending.get());
        }
        self.session = Session::Stopped;
        info!("random animation stopped");
        true
    }

    /// Flips the animation and returns the resulting state.
    pub fn toggle<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> AnimationState {
        if self.is_running() {
            let _ = self.stop(scheduler);
        } else {
            let _ = self.start(scheduler);
        }
        self.state()
    }

    /// Runs one released frame continuation.
    ///
    /// The continuation only acts if it is the one this animation is
    /// currently waiting for; anything else was superseded by a stop and is
    /// ignored. Cells are enumerated fresh on every frame.
    pub fn on_frame<W, R>(
        &mut self,
        handle: TaskHandle,
        world: &mut W,
        directory: &Directory,
        rng: &mut R,
    ) -> Option<FrameReport>
    where
        W: Host + Scheduler + ?Sized,
        R: Rng + ?Sized,
    {
        match self.session {
            Session::Running { pending } if pending == handle => {}
            _ => {
                debug!("ignoring stale animation frame {}", handle.get());
                return None;
            }
        }

        let mut report = FrameReport::default();
        for cell in directory.list_all(&*world) {
            if paint_cell(world, cell, rng) {
                report.painted += 1;
            } else {
                report.skipped += 1;
            }
        }

        let pending = world.run_after(self.frame_interval, Task::AnimationFrame);
        self.session = Session::Running { pending };
        Some(report)
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn paint_cell<H, R>(host: &mut H, cell: EntityHandle, rng: &mut R) -> bool
where
    H: Host + ?Sized,
    R: Rng + ?Sized,
{
    for local in LocalCellIndex::all() {
        let color = Rgb::new(rng.gen(), rng.gen(), rng.gen());
        if let Err(error) = write_pixel(host, cell, local, color) {
            debug!("animation skipped entity {}: {error}", cell.get());
            return false;
        }
    }
    true
}
