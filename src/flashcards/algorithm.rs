//! Spaced repetition scheduling
//!
//! A simplified SM-2 variant driven by four grades:
//! - Again: ease drops by 0.2, the card restarts its learning step and is
//!   shown again after `againMinutes`
//! - Hard: ease drops by 0.15; a graduated interval grows by ease * 1.2
//! - Good: ease unchanged; a graduated interval grows by ease
//! - Easy: ease rises by 0.15; a graduated interval grows by ease
//!
//! A card that has not yet graduated (interval 0) takes `easyDays` on Easy
//! and `goodDays` on Good or Hard.

use chrono::{DateTime, Duration, Utc};

use super::models::{CardProgress, Grade, Settings, MIN_EASE};

const AGAIN_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;
const HARD_INTERVAL_MULTIPLIER: f64 = 1.2;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Calculate the next scheduling state for a card
///
/// # Arguments
/// * `current` - Existing progress, or `None` for a card never graded
/// * `grade` - The learner's grade
/// * `settings` - Scheduler settings (clamped before use)
/// * `now` - Instant the grade was given
pub fn calculate_next_review(
    current: Option<&CardProgress>,
    grade: Grade,
    settings: &Settings,
    now: DateTime<Utc>,
) -> CardProgress {
    let settings = settings.sanitized();
    let current = normalize(current.copied().unwrap_or_else(|| CardProgress::seed(now)));

    if grade == Grade::Again {
        return CardProgress {
            review_due_at: now + Duration::minutes(i64::from(settings.again_minutes)),
            interval_days: 0.0,
            ease_factor: (current.ease_factor - AGAIN_EASE_PENALTY).max(MIN_EASE),
        };
    }

    let ease_factor = match grade {
        Grade::Hard => (current.ease_factor - HARD_EASE_PENALTY).max(MIN_EASE),
        Grade::Easy => current.ease_factor + EASY_EASE_BONUS,
        _ => current.ease_factor,
    };

    let interval_days = if current.is_graduated() {
        let multiplier = if grade == Grade::Hard { HARD_INTERVAL_MULTIPLIER } else { 1.0 };
        current.interval_days * ease_factor * multiplier
    } else if grade == Grade::Easy {
        f64::from(settings.easy_days)
    } else {
        // Hard on an ungraduated card graduates at the Good interval
        f64::from(settings.good_days)
    };

    CardProgress {
        review_due_at: due_after_days(now, interval_days),
        interval_days,
        ease_factor,
    }
}

/// Repair values that can only come from a hand-edited or corrupt blob
fn normalize(progress: CardProgress) -> CardProgress {
    let ease_factor = if progress.ease_factor.is_finite() {
        progress.ease_factor.max(MIN_EASE)
    } else {
        MIN_EASE
    };
    let interval_days = if progress.interval_days.is_finite() {
        progress.interval_days.max(0.0)
    } else {
        0.0
    };

    CardProgress {
        review_due_at: progress.review_due_at,
        interval_days,
        ease_factor,
    }
}

/// Offset `now` by a non-negative fractional day count, to the millisecond
fn due_after_days(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    // `as` saturates, so runaway intervals pin to the latest representable instant
    let offset = Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64);
    now.checked_add_signed(offset).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// How far away each grade would schedule the card, in Again/Hard/Good/Easy order
/// Used to label the grading buttons
pub fn preview_intervals(
    current: Option<&CardProgress>,
    settings: &Settings,
    now: DateTime<Utc>,
) -> [(Grade, Duration); 4] {
    Grade::ALL.map(|grade| {
        let next = calculate_next_review(current, grade, settings, now);
        (grade, next.review_due_at - now)
    })
}

/// Format a scheduling offset as a compact human-readable string
pub fn format_interval(offset: Duration) -> String {
    let minutes = offset.num_minutes();
    let hours = offset.num_hours();
    let days = offset.num_days();

    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if hours < 24 {
        format!("{}h", hours)
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
