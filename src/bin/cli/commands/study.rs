use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;

use ddx_lib::flashcards::algorithm::{format_interval, preview_intervals};
use ddx_lib::flashcards::{Grade, RandomShuffler, ReviewSession};

use crate::app::App;
use crate::render::terminal::{paint, render_back, render_front, Color};
use crate::DeckArgs;

pub fn run(app: &App, args: &DeckArgs, shuffle_all: bool, use_color: bool) -> Result<()> {
    let engine = app.engine()?;
    let settings = app.settings();
    let catalog = app.catalog(&engine, args);

    let mut shuffler = RandomShuffler::from_entropy();
    let queue = if shuffle_all {
        engine.shuffle_all(&catalog, &mut shuffler)
    } else {
        engine.build_queue(&catalog, &settings, Utc::now(), &mut shuffler)
    };

    let mut session = ReviewSession::new(queue);
    if session.is_finished() {
        println!("Nothing due right now. Come back later, or use --shuffle-all to practice every card.");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(card) = session.current().cloned() {
        println!();
        println!(
            "{} {}",
            paint(&format!("[{}/{}]", session.reviewed() + 1, session.len()), Color::DIM, use_color),
            render_front(&card, use_color)
        );

        prompt("Press Enter to reveal (q to quit) ")?;
        match lines.next().transpose()? {
            Some(line) if !line.trim().eq_ignore_ascii_case("q") => {}
            _ => break,
        }

        println!("{}", render_back(&card, use_color));

        let preview = preview_intervals(engine.progress().get(&card.id).as_ref(), &settings, Utc::now());
        let options: Vec<String> = preview
            .iter()
            .map(|(grade, offset)| format!("{} {}", grade_key(*grade, use_color), format_interval(*offset)))
            .collect();
        println!("{}", options.join("   "));

        let Some(grade) = read_grade(&mut lines)? else {
            break;
        };
        session.grade(&engine, &card.id, grade, &settings, Utc::now())?;
    }

    println!();
    println!("Reviewed {} of {} cards.", session.reviewed(), session.len());
    Ok(())
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{}", text);
    io::stdout().flush()
}

/// Button label such as "[g]ood"
fn grade_key(grade: Grade, use_color: bool) -> String {
    let label = grade.label().to_lowercase();
    let color = match grade {
        Grade::Again => Color::RED,
        Grade::Hard => Color::YELLOW,
        Grade::Good => Color::BLUE,
        Grade::Easy => Color::GREEN,
    };
    format!("[{}]{}", paint(&label[..1], color, use_color), &label[1..])
}

/// Prompt until a valid grade is entered; `None` on quit or end of input
fn read_grade<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<Grade>> {
    loop {
        prompt("Grade: ")?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match input.parse::<Grade>() {
            Ok(grade) => return Ok(Some(grade)),
            Err(e) => println!("{}", e),
        }
    }
}
