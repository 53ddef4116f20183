//! Line commands understood by the console.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use palxel_core::{Position, RegionId};

/// One parsed console line.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ConsoleCommand {
    /// Raise the open-menu trigger as the console player.
    Menu,
    /// Raise the animation toggle trigger as the console player.
    Anim,
    /// Raise an arbitrary script event as the console player.
    Event(String),
    /// Press a button of the open dialog.
    Pick(usize),
    /// Submit the open sliders form.
    Values(Vec<f64>),
    /// Dismiss the open dialog.
    Cancel,
    /// Advance the world by the given number of ticks.
    Tick(u32),
    /// Tick until every pending spawn has materialised.
    Settle,
    /// Move the console player inside their current region.
    Move(Position),
    /// Move the console player to another region at the same position.
    Region(RegionId),
    /// Load or unload a region.
    SetLoaded(RegionId, bool),
    /// Print the whole raster.
    Show,
    /// Print one pixel.
    Pixel(u32, u32),
    /// Print a one-line summary.
    Status,
    /// Print the command list.
    Help,
    /// Leave the console.
    Quit,
}

/// Upper bound for a single `tick` command.
const MAX_TICKS: u32 = 10_000;

pub(crate) const HELP: &str = "\
commands:
  menu                  open the palxel menu
  anim                  toggle the random animation
  event <id>            raise a raw script event
  pick <n>              press button n of the open dialog
  values <r> <g> <b>    submit the open RGB editor
  cancel                dismiss the open dialog
  tick [n]              advance n ticks (default 1)
  settle                tick until the grid finished spawning
  move <x> <y> <z>      move the player
  region <name>         switch the player to another region
  load <name>           mark a region loaded
  unload <name>         mark a region unloaded
  show                  print the raster
  pixel <col> <row>     print one pixel
  status                print a summary
  help                  print this list
  quit                  leave";

impl FromStr for ConsoleCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("menu", []) => Self::Menu,
            ("anim", []) => Self::Anim,
            ("event", [id]) => Self::Event((*id).to_owned()),
            ("pick", [n]) => Self::Pick(number(n, "button")?),
            ("values", values) => Self::Values(
                values
                    .iter()
                    .map(|value| number(value, "slider value"))
                    .collect::<Result<_>>()?,
            ),
            ("cancel", []) => Self::Cancel,
            ("tick", []) => Self::Tick(1),
            ("tick", [n]) => {
                let ticks: u32 = number(n, "tick count")?;
                if ticks > MAX_TICKS {
                    bail!("at most {MAX_TICKS} ticks per command");
                }
                Self::Tick(ticks)
            }
            ("settle", []) => Self::Settle,
            ("move", [x, y, z]) => Self::Move(Position::new(
                number(x, "x")?,
                number(y, "y")?,
                number(z, "z")?,
            )),
            ("region", [name]) => Self::Region(region(name)?),
            ("load", [name]) => Self::SetLoaded(region(name)?, true),
            ("unload", [name]) => Self::SetLoaded(region(name)?, false),
            ("show", []) => Self::Show,
            ("pixel", [column, row]) => {
                Self::Pixel(number(column, "column")?, number(row, "row")?)
            }
            ("status", []) => Self::Status,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (verb, args) => {
                return Err(anyhow!(
                    "unrecognised command `{verb}` with {} argument(s), try `help`",
                    args.len()
                ))
            }
        };
        Ok(command)
    }
}

fn number<T>(text: &str, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse()
        .with_context(|| format!("invalid {what} `{text}`"))
}

fn region(name: &str) -> Result<RegionId> {
    RegionId::ALL
        .into_iter()
        .find(|region| region.name() == name)
        .ok_or_else(|| anyhow!("unknown region `{name}`"))
}
