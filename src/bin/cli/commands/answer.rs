use anyhow::{bail, Context, Result};

use cardstack_lib::flashcards::algorithm::format_interval;
use cardstack_lib::flashcards::Swipe;

use crate::app::{find_card, App};
use crate::render::{local_time, paint, Color};
use crate::OutputFormat;

pub enum Answer {
    Grade(f64),
    Swipe(Swipe),
}

pub fn run(
    app: &App,
    set_id: &str,
    card_query: &str,
    answer: Answer,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let set = app.load_set(set_id)?;
    let card = find_card(&set, card_query)?;
    let mut session = app.open_session(&set)?;

    let outcome = match answer {
        Answer::Grade(q) => session.answer(&card.id, q),
        Answer::Swipe(s) => session.swipe(&card.id, s),
    }
    .with_context(|| format!("Failed to record answer for card {}", card.id))?;

    if !outcome.persisted {
        // One more attempt before giving up; the update must not be lost silently
        if let Err(e) = session.flush() {
            bail!("Answer for card {} was not saved: {}", card.id, e);
        }
    }

    let status = &outcome.status;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(status)?),
        OutputFormat::Plain => {
            let verdict = if status.repetitions > 0 {
                paint("correct", Color::GREEN, use_color)
            } else {
                paint("again", Color::RED, use_color)
            };
            println!("{}: {}", card.front, verdict);
            println!(
                "  next review in {} ({})",
                format_interval(status.interval),
                status.next_review_at().map(local_time).unwrap_or_default()
            );
            if status.is_completed {
                println!("  card completed");
            }
        }
    }

    Ok(())
}
