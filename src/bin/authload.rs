use anyhow::Result;
use authload::cli;

fn main() -> Result<()> {
    let action = cli::start()?;

    action.execute()?;

    Ok(())
}
