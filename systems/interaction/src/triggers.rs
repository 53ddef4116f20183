//! Namespaced script-event triggers.

use log::{trace, warn};

const NAMESPACE_SEPARATOR: char = ':';

/// Action requested by a recognised trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Open the root menu for the triggering user.
    OpenMenu,
    /// Toggle the animation without showing a menu.
    ToggleAnimation,
}

/// Parser for the two script-event identifiers inside one namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triggers {
    namespace: String,
    open_menu: String,
    toggle_animation: String,
}

impl Triggers {
    /// Creates the parser for `<namespace>:palxel` and `<namespace>:palxel_anim`.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            open_menu: format!("{namespace}{NAMESPACE_SEPARATOR}palxel"),
            toggle_animation: format!("{namespace}{NAMESPACE_SEPARATOR}palxel_anim"),
        }
    }

    /// Identifier that opens the menu.
    #[must_use]
    pub fn open_menu_id(&self) -> &str {
        &self.open_menu
    }

    /// Identifier that toggles the animation.
    #[must_use]
    pub fn toggle_animation_id(&self) -> &str {
        &self.toggle_animation
    }

    /// Maps an event identifier onto a trigger. Identifiers from other
    /// namespaces are not ours and are dropped quietly.
    #[must_use]
    pub fn parse(&self, id: &str) -> Option<Trigger> {
        let Some((namespace, _)) = id.split_once(NAMESPACE_SEPARATOR) else {
            trace!("ignoring unnamespaced script event `{id}`");
            return None;
        };
        if namespace != self.namespace {
            trace!("ignoring script event `{id}` from namespace `{namespace}`");
            return None;
        }
        if id == self.open_menu {
            Some(Trigger::OpenMenu)
        } else if id == self.toggle_animation {
            Some(Trigger::ToggleAnimation)
        } else {
            warn!("unknown script event `{id}`");
            None
        }
    }
}
