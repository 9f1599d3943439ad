use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, set_id: &str, format: &OutputFormat) -> Result<()> {
    let set = app.load_set(set_id)?;
    let mut session = app.open_session(&set)?;
    session
        .reset()
        .with_context(|| format!("Failed to reset set '{}'", set_id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&session.stats())?),
        OutputFormat::Plain => println!("Reset {} cards in {}", set.cards.len(), set.name),
    }

    Ok(())
}
