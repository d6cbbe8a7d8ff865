use anyhow::Result;

use ddx_lib::ratings::{Demographic, Difficulty, VindicateCategory};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_rate(
    app: &App,
    demographic: Demographic,
    presentation: &str,
    category: VindicateCategory,
    difficulty: Difficulty,
) -> Result<()> {
    app.ratings().record(demographic, presentation, category, difficulty)?;
    println!("Rated {} ({}, {}) as {}", presentation, demographic, category, difficulty);
    Ok(())
}

pub fn run_list(app: &App, difficulty: Option<Difficulty>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let store = app.ratings();
    let mut items = match difficulty {
        Some(d) => store.items_with_difficulty(d),
        None => store.rated_items(),
    };
    items.sort_by(|a, b| a.presentation.cmp(&b.presentation));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No rated presentations.");
                return Ok(());
            }

            for item in &items {
                let color = match item.difficulty {
                    Difficulty::Easy => Color::GREEN,
                    Difficulty::Medium => Color::YELLOW,
                    Difficulty::Hard => Color::RED,
                };
                println!(
                    "{} {}  {}",
                    paint(&format!("{:<6}", item.difficulty.as_str()), color, use_color),
                    item.presentation,
                    paint(&format!("{} - VINDICATE: {}", item.demographic, item.category), Color::DIM, use_color)
                );
            }
            println!("\n{} ratings", items.len());
        }
    }

    Ok(())
}
