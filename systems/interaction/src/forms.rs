//! Presentation-agnostic dialogs handed to the adapter for display.

use palxel_core::ActorId;

/// Button list dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionForm {
    /// Dialog title.
    pub title: String,
    /// Text shown above the buttons.
    pub body: String,
    /// Button labels in display order; responses refer to these by position.
    pub buttons: Vec<String>,
}

impl ActionForm {
    /// Starts a button list with the provided title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            buttons: Vec::new(),
        }
    }

    /// Sets the body text.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Appends a button.
    #[must_use]
    pub fn button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(label.into());
        self
    }
}

/// Numeric slider inside a [`ModalForm`].
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    /// Label shown next to the slider.
    pub label: String,
    /// Smallest selectable value.
    pub min: f64,
    /// Largest selectable value.
    pub max: f64,
    /// Increment between selectable values.
    pub step: f64,
    /// Value the slider starts at.
    pub default: f64,
}

/// Sliders form.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalForm {
    /// Dialog title.
    pub title: String,
    /// Sliders in display order; responses list values in the same order.
    pub sliders: Vec<Slider>,
}

impl ModalForm {
    /// Starts a sliders form with the provided title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sliders: Vec::new(),
        }
    }

    /// Appends a slider.
    #[must_use]
    pub fn slider(
        mut self,
        label: impl Into<String>,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    ) -> Self {
        self.sliders.push(Slider {
            label: label.into(),
            min,
            max,
            step,
            default,
        });
        self
    }
}

/// Any dialog the display can ask the adapter to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Form {
    /// Button list.
    Action(ActionForm),
    /// Sliders.
    Modal(ModalForm),
}

impl Form {
    /// Title of the dialog.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Action(form) => &form.title,
            Self::Modal(form) => &form.title,
        }
    }
}

/// Dialog addressed to one user.
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt {
    /// User who should see the dialog.
    pub user: ActorId,
    /// Dialog to show.
    pub form: Form,
}

/// What the user did with the last dialog shown to them.
#[derive(Clone, Debug, PartialEq)]
pub enum FormResponse {
    /// The dialog was dismissed.
    Canceled,
    /// A button was pressed, identified by position.
    Selection(usize),
    /// A sliders form was submitted.
    Values(Vec<f64>),
}
