//! Interactive prompts.

use console::Term;
use dialoguer::Confirm;

use crate::error::{HarmonizerError, Result};

use super::Prompt;

fn map_dialoguer_err(e: dialoguer::Error) -> HarmonizerError {
    let io: std::io::Error = e.into();
    if io.kind() == std::io::ErrorKind::Interrupted {
        HarmonizerError::Cancelled
    } else {
        HarmonizerError::Io(io)
    }
}

/// Ask a yes/no question on `term`.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<bool> {
    Confirm::new()
        .with_prompt(&prompt.question)
        .default(prompt.default)
        .interact_on(term)
        .map_err(map_dialoguer_err)
}
