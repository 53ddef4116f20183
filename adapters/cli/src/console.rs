//! Line-driven host session: one player, one world, dialogs as text.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use palxel_core::{
    global_to_local, ActorId, ActorKind, Command, Event, GlobalPixel, Position, Presence,
    RegionId, Rgb, CELL_COUNT, PIXELS_PER_CELL, RASTER_COLUMNS, RASTER_ROWS,
};
use palxel_system_animation::AnimationState;
use palxel_system_interaction::{Config, Form, FormResponse, Palxel, Prompt};
use palxel_world::{self as world, query, World};
use rand_chacha::ChaCha8Rng;

use crate::commands::{ConsoleCommand, HELP};

const PROMPT: &str = "palxel> ";

/// Whether the console keeps reading after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns the world and the display and prints everything to `out`.
pub(crate) struct Console<O> {
    world: World,
    palxel: Palxel<ChaCha8Rng>,
    player: ActorId,
    dialog: Option<Form>,
    out: O,
}

impl<O: Write> Console<O> {
    /// Creates a world with a single player standing at the origin of the
    /// overworld.
    pub(crate) fn new(config: Config, rng: ChaCha8Rng, out: O) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::JoinActor {
                kind: ActorKind::Player,
                region: RegionId::Overworld,
                position: Position::default(),
            },
            &mut events,
        );
        let player = events
            .iter()
            .find_map(|event| match event {
                Event::ActorJoined { actor } => Some(*actor),
                _ => None,
            })
            .unwrap_or_else(|| ActorId::new(1));

        Self {
            world,
            palxel: Palxel::new(config, rng),
            player,
            dialog: None,
            out,
        }
    }

    /// Runs every line of a script, stopping at the first failing line.
    pub(crate) fn run_script<B: BufRead>(&mut self, input: B) -> Result<()> {
        for (number, line) in input.lines().enumerate() {
            let line = line.context("failed to read script line")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            writeln!(self.out, "{PROMPT}{line}")?;
            let command: ConsoleCommand = line
                .parse()
                .with_context(|| format!("line {}", number + 1))?;
            if self.execute(command)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Reads commands until `quit` or end of input. Malformed lines are
    /// reported and skipped.
    pub(crate) fn run_interactive<B: BufRead>(&mut self, input: B) -> Result<()> {
        writeln!(self.out, "palxel console, type `help` for commands")?;
        write!(self.out, "{PROMPT}")?;
        self.out.flush()?;
        for line in input.lines() {
            let line = line.context("failed to read console input")?;
            let line = line.trim();
            if !line.is_empty() {
                match line.parse().and_then(|command| self.execute(command)) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(error) => writeln!(self.out, "error: {error:#}")?,
                }
            }
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn execute(&mut self, command: ConsoleCommand) -> Result<Flow> {
        match command {
            ConsoleCommand::Menu => {
                let id = self.palxel.triggers().open_menu_id().to_owned();
                self.raise(id)?;
            }
            ConsoleCommand::Anim => {
                let id = self.palxel.triggers().toggle_animation_id().to_owned();
                self.raise(id)?;
            }
            ConsoleCommand::Event(id) => self.raise(id)?,
            ConsoleCommand::Pick(button) => self.answer(FormResponse::Selection(button))?,
            ConsoleCommand::Values(values) => self.answer(FormResponse::Values(values))?,
            ConsoleCommand::Cancel => self.answer(FormResponse::Canceled)?,
            ConsoleCommand::Tick(ticks) => {
                for _ in 0..ticks {
                    self.run(Command::Tick)?;
                }
                writeln!(self.out, "tick {}", query::tick(&self.world))?;
            }
            ConsoleCommand::Settle => {
                while self.palxel.is_spawning() {
                    self.run(Command::Tick)?;
                }
                writeln!(self.out, "tick {}", query::tick(&self.world))?;
            }
            ConsoleCommand::Move(position) => {
                let region = self.player_region();
                self.run(Command::MoveActor {
                    actor: self.player,
                    region,
                    position,
                })?;
            }
            ConsoleCommand::Region(region) => {
                let position = self
                    .world
                    .actor(self.player)
                    .map(|snapshot| snapshot.position)
                    .unwrap_or_default();
                self.run(Command::MoveActor {
                    actor: self.player,
                    region,
                    position,
                })?;
            }
            ConsoleCommand::SetLoaded(region, loaded) => {
                self.run(Command::SetRegionLoaded { region, loaded })?;
            }
            ConsoleCommand::Show => self.show_raster()?,
            ConsoleCommand::Pixel(column, row) => self.show_pixel(column, row)?,
            ConsoleCommand::Status => self.show_status()?,
            ConsoleCommand::Help => writeln!(self.out, "{HELP}")?,
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn raise(&mut self, id: String) -> Result<()> {
        self.run(Command::SendScriptEvent {
            id,
            source: Some(self.player),
        })
    }

    fn run(&mut self, command: Command) -> Result<()> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        let mut prompts = Vec::new();
        self.palxel.handle(&events, &mut self.world, &mut prompts);
        self.present(prompts)
    }

    fn answer(&mut self, response: FormResponse) -> Result<()> {
        if self.dialog.take().is_none() {
            bail!("no dialog is open");
        }
        let mut prompts = Vec::new();
        self.palxel
            .respond(&mut self.world, self.player, response, &mut prompts);
        self.present(prompts)
    }

    fn present(&mut self, prompts: Vec<Prompt>) -> Result<()> {
        for notice in self.world.drain_notices() {
            if notice.to == self.player {
                writeln!(self.out, "* {}", notice.text)?;
            }
        }
        for prompt in prompts {
            if prompt.user != self.player {
                continue;
            }
            write_form(&mut self.out, &prompt.form)?;
            self.dialog = Some(prompt.form);
        }
        Ok(())
    }

    fn player_region(&self) -> RegionId {
        self.world
            .actor(self.player)
            .map_or(RegionId::Overworld, |snapshot| snapshot.region)
    }

    fn show_raster(&mut self) -> Result<()> {
        let raster = self.palxel.raster(&self.world);
        let total = CELL_COUNT * PIXELS_PER_CELL;
        writeln!(
            self.out,
            "raster {RASTER_COLUMNS}x{RASTER_ROWS}, {}/{total} pixels live",
            raster.resolved()
        )?;
        for row in raster.rows() {
            let line: String = row
                .iter()
                .map(|pixel| match pixel {
                    None => '.',
                    Some(color) if *color == Rgb::BLACK => '-',
                    Some(_) => '#',
                })
                .collect();
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn show_pixel(&mut self, column: u32, row: u32) -> Result<()> {
        let Some(pixel) = GlobalPixel::new(column, row) else {
            bail!("pixel ({column},{row}) is outside {RASTER_COLUMNS}x{RASTER_ROWS}");
        };
        let (cell, slot) = global_to_local(pixel);
        match self.palxel.raster(&self.world).get(pixel) {
            Some(color) => writeln!(
                self.out,
                "{pixel} #{} {color} = {} (cell {cell} slot {})",
                color.to_hex(),
                color.pack().get(),
                slot.get()
            )?,
            None => writeln!(self.out, "{pixel} has no live cell {cell}")?,
        }
        Ok(())
    }

    fn show_status(&mut self) -> Result<()> {
        let live = self.palxel.live_cells(&self.world);
        let spawning = match self.palxel.pending_spawns() {
            0 => "no".to_owned(),
            queued => format!("{queued} queued"),
        };
        let animation = match self.palxel.animation_state() {
            AnimationState::Running => "on",
            AnimationState::Stopped => "off",
        };
        let dialog = if self.dialog.is_some() { "open" } else { "none" };
        writeln!(
            self.out,
            "tick {} | cells {live}/{CELL_COUNT} | animation {animation} | spawning {spawning} \
             | region {} | dialog {dialog}",
            query::tick(&self.world),
            self.player_region(),
        )?;
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> O {
        self.out
    }
}

fn write_form<O: Write>(out: &mut O, form: &Form) -> Result<()> {
    writeln!(out, "== {} ==", form.title())?;
    match form {
        Form::Action(form) => {
            for line in form.body.lines() {
                writeln!(out, "  {line}")?;
            }
            for (index, label) in form.buttons.iter().enumerate() {
                writeln!(out, "  [{index}] {label}")?;
            }
            writeln!(out, "answer with `pick <n>` or `cancel`")?;
        }
        Form::Modal(form) => {
            for slider in &form.sliders {
                writeln!(
                    out,
                    "  {}: {}..{} step {} (now {})",
                    slider.label, slider.min, slider.max, slider.step, slider.default
                )?;
            }
            writeln!(out, "answer with `values <r> <g> <b>` or `cancel`")?;
        }
    }
    Ok(())
}
