use anyhow::Result;
use chrono::Utc;

use ddx_lib::flashcards::{CardStatus, RandomShuffler};

use crate::app::App;
use crate::render::terminal::{due_label, paint, status_label, status_name, Color};
use crate::{DeckArgs, OutputFormat};

pub fn run(
    app: &App,
    args: &DeckArgs,
    shuffle_all: bool,
    seed: Option<u64>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let engine = app.engine()?;
    let settings = app.settings();
    let catalog = app.catalog(&engine, args);
    let mut shuffler = seed.map(RandomShuffler::seeded).unwrap_or_default();

    let now = Utc::now();
    let queue = if shuffle_all {
        engine.shuffle_all(&catalog, &mut shuffler)
    } else {
        engine.build_queue(&catalog, &settings, now, &mut shuffler)
    };
    let progress = engine.progress().load_all();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = queue.iter().map(|card| {
                let state = progress.get(&card.id);
                serde_json::json!({
                    "id": card.id,
                    "front": card.front,
                    "back": card.back,
                    "status": CardStatus::of(state),
                    "reviewDate": state.map(|p| p.review_due_at.to_rfc3339()),
                })
            }).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if queue.is_empty() {
                println!("Nothing due. {} cards in this deck.", catalog.len());
                return Ok(());
            }

            let id_width = queue.iter().map(|c| c.id.len()).max().unwrap_or(4).min(50).max(4);

            println!("{:<id_w$} {:<8} {}", "Card", "Status", "Due", id_w = id_width);
            println!("{} {} {}", "\u{2500}".repeat(id_width), "\u{2500}".repeat(8), "\u{2500}".repeat(8));

            for card in &queue {
                let state = progress.get(&card.id);
                let status = CardStatus::of(state);
                // Pad by the plain name so escape codes don't break alignment
                let padding = " ".repeat(8usize.saturating_sub(status_name(status).len()));
                let status_text = format!("{}{}", status_label(status, use_color), padding);
                let due = state.map(|p| due_label(p.review_due_at, now)).unwrap_or_else(|| "-".to_string());
                println!("{:<id_w$} {} {}", card.id, status_text, paint(&due, Color::DIM, use_color), id_w = id_width);
            }

            println!("\n{} cards in queue, {} in deck", queue.len(), catalog.len());
        }
    }

    Ok(())
}

pub fn run_prune(app: &App) -> Result<()> {
    let engine = app.engine()?;
    let catalog = app.full_catalog(&engine);
    let removed = engine.prune(&catalog)?;
    println!("Removed {} stale progress entries.", removed);
    Ok(())
}
