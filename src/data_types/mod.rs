pub mod supabase_data_types;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use clap::ValueEnum;
pub use supabase_data_types::{Canteen, Meal, MealDate};

/// Meals grouped by the day they are served on; days without meals are absent.
pub type MealsByDate = BTreeMap<NaiveDate, Vec<MealDate>>;

pub type FavoriteSet = BTreeSet<String>;

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DietaryFilter {
    Vegan,
    Vegetarisch,
    Fleisch,
    Fisch,
}

impl DietaryFilter {
    /// Icon key as delivered by the backend (lowercase).
    pub fn icon_key(self) -> &'static str {
        match self {
            DietaryFilter::Vegan => "vegan",
            DietaryFilter::Vegetarisch => "vegetarisch",
            DietaryFilter::Fleisch => "fleisch",
            DietaryFilter::Fisch => "fisch",
        }
    }
}

/// Search text and dietary filters currently applied to the meal list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealQuery {
    pub search: String,
    pub dietary: BTreeSet<DietaryFilter>,
}

impl MealQuery {
    pub fn is_searching(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Whether a meal is served at lunch, in the afternoon, or both.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServingTime {
    LunchOnly,
    AfternoonOnly,
    AllDay,
}

/// A single day, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct DayMeals {
    pub date: NaiveDate,
    pub lunch: Vec<MealDate>,
    pub afternoon: Vec<MealDate>,
    /// lunch is over for today and there is something left to eat
    pub lunch_dimmed: bool,
}

impl DayMeals {
    pub fn is_empty(&self) -> bool {
        self.lunch.is_empty() && self.afternoon.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl From<bool> for Theme {
    fn from(dark_mode: bool) -> Self {
        if dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}
