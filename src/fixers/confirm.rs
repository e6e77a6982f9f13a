//! Per-fix confirmation.

use crate::ui::{Prompt, UserInterface};

/// Prompt key used for every fix confirmation.
pub const CONFIRM_FIX_KEY: &str = "confirm_fix";

/// Decides whether a mutating fix may proceed.
pub trait Confirm {
    fn confirm(&mut self, description: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, description: &str) -> bool {
        self(description)
    }
}

/// Asks the user through a [`UserInterface`]. A failed prompt counts as no.
pub struct UiConfirm<'a> {
    ui: &'a mut dyn UserInterface,
}

impl<'a> UiConfirm<'a> {
    pub fn new(ui: &'a mut dyn UserInterface) -> Self {
        Self { ui }
    }
}

impl Confirm for UiConfirm<'_> {
    fn confirm(&mut self, description: &str) -> bool {
        let prompt = Prompt::new(CONFIRM_FIX_KEY, format!("{}?", description));
        match self.ui.confirm(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}
