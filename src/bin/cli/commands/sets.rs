use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let sets = app.source.list_sets().context("Failed to list sets")?;

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for set in &sets {
                let session = app.open_session(set)?;
                output.push(serde_json::json!({
                    "id": set.id,
                    "name": set.name,
                    "cardCount": set.cards.len(),
                    "dueCount": session.stack().len(),
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("(no sets)");
            }
            for set in &sets {
                let session = app.open_session(set)?;
                println!(
                    "{} ({}): {} cards, {} due",
                    set.name,
                    set.id,
                    set.cards.len(),
                    session.stack().len()
                );
            }
        }
    }

    Ok(())
}

pub fn run_add(
    app: &App,
    set_id: &str,
    front: String,
    back: String,
    format: &OutputFormat,
) -> Result<()> {
    let card = app
        .source
        .add_card(set_id, front, back)
        .with_context(|| format!("Failed to add card to set '{}'", set_id))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Added {} to {}", card.id, set_id),
    }

    Ok(())
}
