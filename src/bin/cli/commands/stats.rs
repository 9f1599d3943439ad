use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, set_id: &str, format: &OutputFormat) -> Result<()> {
    let set = app.load_set(set_id)?;
    let stats = app.open_session(&set)?.stats();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("{}", set.name);
            println!("  total:     {}", stats.total_cards);
            println!("  new:       {}", stats.new_cards);
            println!("  learning:  {}", stats.learning_cards);
            println!("  due:       {}", stats.due_cards);
            println!("  completed: {}", stats.completed_cards);
        }
    }

    Ok(())
}
