use anyhow::Result;

use crate::app::App;
use crate::render::{local_time, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, set_id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.load_set(set_id)?;
    let session = app.open_session(&set)?;
    let stack = session.stack();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "setId": set.id,
                "cards": stack,
                "nextDue": session.next_due(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if stack.is_empty() {
                println!("Session complete: nothing due in {}", set.name);
                if let Some(at) = session.next_due() {
                    println!("Next card due {}", local_time(at));
                }
                return Ok(());
            }

            println!("{} ({} due)", paint(&set.name, Color::BOLD, use_color), stack.len());
            for card in stack {
                println!("  {}  {}", paint(&card.id, Color::DIM, use_color), card.front);
            }
        }
    }

    Ok(())
}
