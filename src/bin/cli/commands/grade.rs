use anyhow::{Context, Result};
use chrono::Utc;

use ddx_lib::flashcards::algorithm::{format_interval, preview_intervals};
use ddx_lib::flashcards::Grade;

use crate::app::App;
use crate::{DeckArgs, OutputFormat};

pub fn run(app: &App, args: &DeckArgs, card_id: &str, grade: Grade, format: &OutputFormat) -> Result<()> {
    let engine = app.engine()?;
    let settings = app.settings();
    let catalog = app.catalog(&engine, args);

    let now = Utc::now();
    let progress = engine
        .grade(&catalog, card_id, grade, &settings, now)
        .with_context(|| format!("Could not grade '{}' (check --mode and --category)", card_id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "id": card_id,
                "grade": grade,
                "progress": progress,
            }))?);
        }
        OutputFormat::Plain => {
            println!(
                "{} graded {}: next review in {} (interval {:.2}d, ease {:.2})",
                card_id,
                grade,
                format_interval(progress.review_due_at - now),
                progress.interval_days,
                progress.ease_factor
            );
        }
    }

    Ok(())
}

pub fn run_preview(app: &App, card_id: &str, format: &OutputFormat) -> Result<()> {
    let engine = app.engine()?;
    app.find_card(&engine, card_id)?;

    let settings = app.settings();
    let current = app.progress().get(card_id);
    let preview = preview_intervals(current.as_ref(), &settings, Utc::now());

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = preview
                .iter()
                .map(|(grade, offset)| (grade.label().to_lowercase(), serde_json::json!(offset.num_seconds())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let labels: Vec<String> = preview
                .iter()
                .map(|(grade, offset)| format!("{} {}", grade, format_interval(*offset)))
                .collect();
            println!("{}: {}", card_id, labels.join("  "));
        }
    }

    Ok(())
}
