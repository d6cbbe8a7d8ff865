use anyhow::Result;

use ddx_lib::flashcards::Settings;

use crate::app::App;
use crate::OutputFormat;

/// Fields to change; `None` keeps the stored value
pub struct SettingsUpdate {
    pub again_minutes: Option<i32>,
    pub good_days: Option<i32>,
    pub easy_days: Option<i32>,
    pub new_cards_per_day: Option<i32>,
}

impl SettingsUpdate {
    fn apply(&self, settings: Settings) -> Settings {
        Settings {
            again_minutes: self.again_minutes.unwrap_or(settings.again_minutes),
            good_days: self.good_days.unwrap_or(settings.good_days),
            easy_days: self.easy_days.unwrap_or(settings.easy_days),
            new_cards_per_day: self.new_cards_per_day.unwrap_or(settings.new_cards_per_day),
        }
    }
}

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    print_settings(&app.settings(), format)
}

pub fn run_set(app: &App, update: SettingsUpdate, format: &OutputFormat) -> Result<()> {
    let store = app.settings_store();
    let saved = store.save(&update.apply(store.load()))?;
    print_settings(&saved, format)
}

fn print_settings(settings: &Settings, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        OutputFormat::Plain => {
            println!("\"Again\" interval:        {} min", settings.again_minutes);
            println!("\"Good\" interval (new):   {} d", settings.good_days);
            println!("\"Easy\" interval (new):   {} d", settings.easy_days);
            println!("New cards per day:       {}", settings.new_cards_per_day);
        }
    }
    Ok(())
}
