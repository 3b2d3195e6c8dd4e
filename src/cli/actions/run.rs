use crate::cli::actions::{show, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub fn execute(action: Action) -> Result<()> {
    match action {
        Action::Show(args) => show::execute(&args),
    }
}
