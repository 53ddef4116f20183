//! Multi-step menu state machine.
//!
//! Every dialog is a suspension point: between showing a form and receiving
//! the answer the grid may be repainted, reset or partially removed. A
//! pending step therefore keeps only the handle it last resolved, and every
//! step re-resolves that handle through the directory before reading or
//! writing anything. A miss ends the interaction with a notice.

use std::collections::HashMap;

use log::{debug, warn};
use palxel_core::{
    local_to_global, ActorId, ActorSnapshot, EntityHandle, Host, LocalCellIndex, LogicalIndex,
    Messenger, Position, Rgb, Scheduler, CELL_COUNT, PIXELS_PER_CELL,
};
use palxel_system_animation::AnimationState;
use palxel_system_directory::{index_tag, logical_index, read_pixel, write_pixel};

use crate::{
    forms::{ActionForm, Form, FormResponse, ModalForm},
    Components,
};

const TITLE: &str = "Palxel";
const NOT_FOUND: &str = "Grid cell not found";
const SPAWNING: &str = "Spawning grid...";
const RESET_DONE: &str = "Grid reset. Spawning grid...";
const RESET_LABEL: &str = "Reset (remove all & respawn)";
const CHANNEL_MAX: f64 = 255.0;

/// Step a user's open dialog is waiting on.
#[derive(Clone, Debug, PartialEq)]
enum Pending {
    SpawnPrompt,
    Root { nearest: Vec<EntityHandle> },
    CellPicker { cell: EntityHandle },
    Editor { cell: EntityHandle, local: LocalCellIndex },
    ResetConfirm,
}

/// Menu navigation with at most one open dialog per user.
#[derive(Debug)]
pub struct InteractionFlow {
    nearest_limit: usize,
    sessions: HashMap<ActorId, Pending>,
}

impl InteractionFlow {
    /// Creates a flow listing up to `nearest_limit` cells in the root menu.
    #[must_use]
    pub fn new(nearest_limit: usize) -> Self {
        Self {
            nearest_limit,
            sessions: HashMap::new(),
        }
    }

    /// Reports whether `user` has a dialog awaiting an answer.
    #[must_use]
    pub fn is_waiting(&self, user: ActorId) -> bool {
        self.sessions.contains_key(&user)
    }

    /// Forgets any dialog `user` had open.
    pub fn abandon(&mut self, user: ActorId) {
        let _ = self.sessions.remove(&user);
    }

    /// Builds the root menu, replacing whatever dialog the user had open.
    pub fn open_root<H>(&mut self, host: &H, parts: &Components, user: &ActorSnapshot) -> Form
    where
        H: Host + ?Sized,
    {
        let cells = parts.directory.list_all(host);
        if cells.is_empty() {
            let form = ActionForm::new(TITLE)
                .body("No grid cells exist.\nSpawn the grid first.")
                .button(format!("Spawn grid ({CELL_COUNT} cells)"));
            return self.show(user.id, Pending::SpawnPrompt, Form::Action(form));
        }

        let mut form = ActionForm::new(TITLE)
            .body(format!("64×36px (16:9) | {}/{CELL_COUNT} cells", cells.len()))
            .button(animation_label(parts.animation.state()));

        let nearest = nearest_cells(host, cells, user.position, self.nearest_limit);
        for (cell, distance) in &nearest {
            form = form.button(cell_label(host, *cell, *distance));
        }
        let form = form.button(RESET_LABEL);

        let nearest = nearest.into_iter().map(|(cell, _)| cell).collect();
        self.show(user.id, Pending::Root { nearest }, Form::Action(form))
    }

    /// Flips the animation and tells the user the new state.
    pub fn toggle_animation<W>(&mut self, world: &mut W, parts: &mut Components, user: ActorId)
    where
        W: Scheduler + Messenger + ?Sized,
    {
        let state = parts.animation.toggle(world);
        let text = match state {
            AnimationState::Running => "Random animation: ON",
            AnimationState::Stopped => "Random animation: OFF",
        };
        world.notify(user, text);
    }

    /// Consumes the answer to the user's open dialog and returns the next
    /// dialog to show, if any.
    pub fn respond<W>(
        &mut self,
        world: &mut W,
        parts: &mut Components,
        user: &ActorSnapshot,
        response: FormResponse,
    ) -> Option<Form>
    where
        W: Host + Scheduler + Messenger + ?Sized,
    {
        let Some(pending) = self.sessions.remove(&user.id) else {
            debug!("actor {} answered without an open dialog", user.id.get());
            return None;
        };
        if response == FormResponse::Canceled {
            return None;
        }

        match (pending, response) {
            (Pending::SpawnPrompt, FormResponse::Selection(0)) => {
                reset_grid(world, parts, user, SPAWNING);
                None
            }
            (Pending::Root { nearest }, FormResponse::Selection(selection)) => {
                if selection == 0 {
                    self.toggle_animation(world, parts, user.id);
                    None
                } else if selection == nearest.len() + 1 {
                    Some(self.open_reset_confirm(user.id))
                } else if let Some(cell) = nearest.get(selection - 1) {
                    self.open_cell_picker(world, parts, user.id, *cell)
                } else {
                    warn!("root menu selection {selection} out of range");
                    None
                }
            }
            (Pending::CellPicker { cell }, FormResponse::Selection(selection)) => {
                let Some(latest) = parts.directory.refresh(&*world, cell) else {
                    world.notify(user.id, NOT_FOUND);
                    return None;
                };
                if selection == PIXELS_PER_CELL as usize {
                    return Some(self.open_reset_confirm(user.id));
                }
                let Some(local) = u32::try_from(selection).ok().and_then(LocalCellIndex::new) else {
                    warn!("pixel selection {selection} out of range");
                    return None;
                };
                self.open_editor(world, parts, user.id, latest, local)
            }
            (Pending::Editor { cell, local }, FormResponse::Values(values)) => {
                apply_edit(world, parts, user.id, cell, local, &values);
                None
            }
            (Pending::ResetConfirm, FormResponse::Selection(0)) => {
                reset_grid(world, parts, user, RESET_DONE);
                None
            }
            (Pending::ResetConfirm | Pending::SpawnPrompt, FormResponse::Selection(_)) => None,
            (pending, response) => {
                warn!("response {response:?} does not fit dialog {pending:?}");
                None
            }
        }
    }

    fn open_cell_picker<W>(
        &mut self,
        world: &mut W,
        parts: &Components,
        user: ActorId,
        cell: EntityHandle,
    ) -> Option<Form>
    where
        W: Host + Messenger + ?Sized,
    {
        let Some(fresh) = parts.directory.refresh(&*world, cell) else {
            world.notify(user, NOT_FOUND);
            return None;
        };

        let grid = logical_index(&*world, fresh)
            .map(|index| {
                let grid = index.grid();
                format!("[{},{}]", grid.column(), grid.row())
            })
            .unwrap_or_else(|| "[?,?]".to_owned());
        let mut form = ActionForm::new(format!("Cell {grid} - pick a pixel"))
            .body("Choose the pixel to edit (8×4)");
        for local in LocalCellIndex::all() {
            let color = read_pixel(&*world, fresh, local).unwrap_or(Rgb::BLACK);
            form = form.button(format!(
                "[{},{}] #{}",
                local.column(),
                local.row(),
                color.to_hex()
            ));
        }
        let form = form.button(RESET_LABEL);

        Some(self.show(user, Pending::CellPicker { cell: fresh }, Form::Action(form)))
    }

    fn open_editor<W>(
        &mut self,
        world: &mut W,
        parts: &Components,
        user: ActorId,
        cell: EntityHandle,
        local: LocalCellIndex,
    ) -> Option<Form>
    where
        W: Host + Messenger + ?Sized,
    {
        let fresh = parts.directory.refresh(&*world, cell);
        let target = fresh.and_then(|fresh| {
            let index = logical_index(&*world, fresh)?;
            let color = read_pixel(&*world, fresh, local).ok()?;
            Some((fresh, index, color))
        });
        let Some((fresh, index, color)) = target else {
            world.notify(user, NOT_FOUND);
            return None;
        };

        let pixel = local_to_global(index, local);
        let form = ModalForm::new(format!("{pixel} - RGB"))
            .slider("R (red) 0-255", 0.0, CHANNEL_MAX, 1.0, f64::from(color.red()))
            .slider("G (green) 0-255", 0.0, CHANNEL_MAX, 1.0, f64::from(color.green()))
            .slider("B (blue) 0-255", 0.0, CHANNEL_MAX, 1.0, f64::from(color.blue()));

        Some(self.show(user, Pending::Editor { cell: fresh, local }, Form::Modal(form)))
    }

    fn open_reset_confirm(&mut self, user: ActorId) -> Form {
        let form = ActionForm::new("Confirm reset")
            .body("Remove every grid cell and spawn the grid again.\nAre you sure?")
            .button("Yes, reset")
            .button("Cancel");
        self.show(user, Pending::ResetConfirm, Form::Action(form))
    }

    fn show(&mut self, user: ActorId, pending: Pending, form: Form) -> Form {
        let _ = self.sessions.insert(user, pending);
        form
    }
}

fn apply_edit<W>(
    world: &mut W,
    parts: &Components,
    user: ActorId,
    cell: EntityHandle,
    local: LocalCellIndex,
    values: &[f64],
) where
    W: Host + Messenger + ?Sized,
{
    let [red, green, blue] = values else {
        warn!("editor answered with {} values instead of 3", values.len());
        return;
    };
    let target = parts
        .directory
        .refresh(&*world, cell)
        .and_then(|latest| Some((latest, logical_index(&*world, latest)?)));
    let Some((latest, index)) = target else {
        world.notify(user, NOT_FOUND);
        return;
    };

    let color = Rgb::from_lossy(*red, *green, *blue);
    if let Err(error) = write_pixel(world, latest, local, color) {
        debug!("pixel write rejected: {error}");
        world.notify(user, NOT_FOUND);
        return;
    }
    let pixel = local_to_global(index, local);
    world.notify(
        user,
        &format!("{pixel} -> #{} {color} = {}", color.to_hex(), color.pack().get()),
    );
}

fn reset_grid<W>(world: &mut W, parts: &mut Components, user: &ActorSnapshot, notice: &str)
where
    W: Host + Scheduler + Messenger + ?Sized,
{
    parts.requester = Some(user.id);
    let _ = parts.lifecycle.reset(
        world,
        &parts.directory,
        &mut parts.animation,
        user.region,
        user.position,
    );
    world.notify(user.id, notice);
}

fn animation_label(state: AnimationState) -> &'static str {
    match state {
        AnimationState::Running => "Random animation [ON] -> turn OFF",
        AnimationState::Stopped => "Random animation [OFF] -> turn ON",
    }
}

/// Live cells sorted by straight-line distance, ties kept in enumeration
/// order. Cells whose position can no longer be read are left out.
fn nearest_cells<H: Host + ?Sized>(
    host: &H,
    cells: Vec<EntityHandle>,
    origin: Position,
    limit: usize,
) -> Vec<(EntityHandle, f64)> {
    let mut measured: Vec<(EntityHandle, f64)> = cells
        .into_iter()
        .filter_map(|cell| {
            let position = host.position(cell).ok()?;
            Some((cell, position.distance_squared(origin)))
        })
        .collect();
    measured.sort_by(|a, b| a.1.total_cmp(&b.1));
    measured.truncate(limit);
    measured
        .into_iter()
        .map(|(cell, distance_squared)| (cell, distance_squared.sqrt()))
        .collect()
}

fn cell_label<H: Host + ?Sized>(host: &H, cell: EntityHandle, distance: f64) -> String {
    match index_tag(host, cell).ok().flatten() {
        Some(tag) => match LogicalIndex::from_tag(tag) {
            Some(index) => {
                let grid = index.grid();
                format!(
                    "#{} [{},{}] [{distance:.1}m]",
                    index.get(),
                    grid.column(),
                    grid.row()
                )
            }
            None => format!("#{tag} [?,?] [{distance:.1}m]"),
        },
        None => format!("#? [?,?] [{distance:.1}m]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_label_reflects_state() {
        assert!(animation_label(AnimationState::Running).contains("[ON]"));
        assert!(animation_label(AnimationState::Stopped).contains("[OFF]"));
    }
}
