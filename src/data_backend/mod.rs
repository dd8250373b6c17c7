use chrono::{Datelike, NaiveDate};
use regex_lite::Regex;
use static_init::dynamic;

use crate::constants::{PLACEHOLDER_IMAGE, STORAGE_BUCKET};
use crate::data_types::Meal;

pub mod supabase;

pub use supabase::{MealsRepository, SupabaseClient};

pub const EMOJIS: [&str; 7] = ["☀️", "🦀", "💂🏻‍♀️", "☕️", "☝🏻", "🌤️", "🥦"];
pub const DARK_EMOJIS: [&str; 4] = ["🌙", "🦉", "🌌", "⭐"];

pub fn german_date_fmt(date: NaiveDate) -> String {
    let week_days = [
        "Montag",
        "Dienstag",
        "Mittwoch",
        "Donnerstag",
        "Freitag",
        "Samstag",
        "Sonntag",
    ];

    format!(
        "{}, {}",
        week_days[date.weekday().num_days_from_monday() as usize],
        date.format("%d.%m.%Y")
    )
}

/// Meal title without the parenthesised additive codes, e.g. "Chili (a,c,9)".
pub fn display_title(title: &str) -> String {
    #[dynamic]
    static PARENS: Regex = Regex::new(r"\([^)]*\)").unwrap();
    #[dynamic]
    static SPACES: Regex = Regex::new(r"\s+").unwrap();

    let without_codes = PARENS.replace_all(title, " ");
    SPACES.replace_all(&without_codes, " ").trim().to_string()
}

/// Emoji and label for a known icon key, `❓` and the raw key otherwise.
pub fn icon_label(icon: &str) -> (&'static str, String) {
    let known = match icon.to_lowercase().as_str() {
        "vegetarisch" => Some(("🥕", "Vegetarisch")),
        "vegan" => Some(("🌱", "Vegan")),
        "fleisch" => Some(("🥩", "Fleisch")),
        "strohschwein" => Some(("🐷", "Schwein")),
        "leinetalerrind" => Some(("🐄", "Rind")),
        "fisch" => Some(("🐟", "Fisch")),
        "bio" => Some(("🌿", "Bio")),
        "regional" => Some(("🏡", "Regional")),
        "klimaessen" => Some(("🌍", "Klimaessen")),
        _ => None,
    };

    match known {
        Some((emoji, label)) => (emoji, label.to_string()),
        None => ("❓", icon.to_string()),
    }
}

/// Public storage URL of a meal picture. The bucket serves `.jpg` only.
pub fn image_url(base_url: &str, meal: Option<&Meal>) -> String {
    let jpg = |path: &String| path.replace(".png", ".jpg");

    let path = meal
        .and_then(|meal| {
            meal.image_path
                .as_ref()
                .map(jpg)
                .or_else(|| meal.image_path_generic.as_ref().map(jpg))
        })
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        STORAGE_BUCKET,
        path
    )
}
