pub mod show;

mod run;

#[derive(Debug)]
pub enum Action {
    Show(show::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub fn execute(self) -> anyhow::Result<()> {
        run::execute(self)
    }
}
