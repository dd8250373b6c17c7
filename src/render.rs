use chrono::NaiveDate;
use rand::Rng;

use crate::constants::MAX_ICONS_SHOWN;
use crate::data_backend::{
    display_title, german_date_fmt, icon_label, image_url, DARK_EMOJIS, EMOJIS,
};
use crate::data_types::{Canteen, DayMeals, FavoriteSet, MealDate, Theme};
use crate::meal_pipeline::is_favorite;

fn header_emoji(theme: Theme) -> &'static str {
    let emojis: &[&'static str] = match theme {
        Theme::Light => &EMOJIS,
        Theme::Dark => &DARK_EMOJIS,
    };
    emojis[rand::thread_rng().gen_range(0..emojis.len())]
}

pub fn render_canteens(canteens: &[Canteen], selected: Option<&Canteen>) -> String {
    if canteens.is_empty() {
        return "keine Mensen gefunden.\n".to_string();
    }

    let mut msg = String::new();
    for canteen in canteens {
        let marker = if selected.is_some_and(|s| s.id == canteen.id) {
            "→"
        } else {
            " "
        };
        msg += &format!("{} {}  [{}]\n", marker, canteen.name, canteen.id);
    }
    msg
}

pub fn render_meal(meal_date: &MealDate, favorites: &FavoriteSet, base_url: &str) -> String {
    let mut msg = String::new();
    let star = if is_favorite(meal_date, favorites) { "★ " } else { "" };

    let Some(meal) = &meal_date.meal else {
        msg += &format!(" • {}{} (Gericht nicht mehr verfügbar)\n", star, meal_date.category);
        return msg;
    };

    msg += &format!(" • {}{}\n", star, display_title(&meal.title));
    msg += &format!("     {}\n", meal_date.category);

    if !meal.full_text.is_empty() && meal.full_text != meal.title {
        msg += &format!("     + {}\n", meal.full_text);
    }

    if !meal.icons().is_empty() {
        let icons = meal
            .icons()
            .iter()
            .take(MAX_ICONS_SHOWN)
            .map(|icon| {
                let (emoji, label) = icon_label(icon);
                format!("{} {}", emoji, label)
            })
            .collect::<Vec<String>>()
            .join("  ");
        msg += &format!("     {}\n", icons);
    }

    if let Some(note) = meal_date.note.as_deref().filter(|note| !note.trim().is_empty()) {
        msg += &format!("     ℹ️ {}\n", note);
    }

    msg += &format!("     {}\n", image_url(base_url, Some(meal)));
    msg
}

pub fn render_day(
    day: &DayMeals,
    favorites: &FavoriteSet,
    theme: Theme,
    base_url: &str,
) -> String {
    let emoji = header_emoji(theme);
    let mut msg = format!("{} {} {}\n", emoji, german_date_fmt(day.date), emoji);

    if day.is_empty() {
        msg += "\nkeine Gerichte für diesen Tag.\n";
        return msg;
    }

    if !day.lunch.is_empty() {
        msg += if day.lunch_dimmed {
            "\nMittag (vorbei)\n"
        } else {
            "\nMittag\n"
        };
        for meal_date in &day.lunch {
            msg += &render_meal(meal_date, favorites, base_url);
        }
    }

    if !day.afternoon.is_empty() {
        if !day.lunch.is_empty() {
            msg += "\nNachmittag\n";
        }
        for meal_date in &day.afternoon {
            msg += &render_meal(meal_date, favorites, base_url);
        }
    }

    msg
}

pub fn render_week(
    week: &[(NaiveDate, Vec<MealDate>)],
    favorites: &FavoriteSet,
    theme: Theme,
    base_url: &str,
) -> String {
    if week.is_empty() {
        return "keine Gerichte gefunden.\n".to_string();
    }

    let mut msg = String::new();
    for (date, meals) in week {
        let emoji = header_emoji(theme);
        msg += &format!("\n{} {} {}\n", emoji, german_date_fmt(*date), emoji);
        for meal_date in meals {
            msg += &render_meal(meal_date, favorites, base_url);
        }
    }
    msg
}
