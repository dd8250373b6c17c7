use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Canteen {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Meal {
    pub id: String,
    pub title: String,
    pub full_text: String,
    // dietary/origin tags, e.g. "vegan", "fisch", "bio"
    #[serde(default)]
    pub icons: Option<Vec<String>>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub image_path_generic: Option<String>,
}

impl Meal {
    pub fn icons(&self) -> &[String] {
        self.icons.as_deref().unwrap_or_default()
    }
}

/// One meal offered at one canteen on one day, under one category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MealDate {
    pub id: String,
    pub meal_id: String,
    pub canteen_id: String,
    pub served_on: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub note: Option<String>,
    /// embedded `meals(*)` join, null once the meal row is gone
    #[serde(default, rename = "meals")]
    pub meal: Option<Meal>,
}

impl MealDate {
    pub fn title(&self) -> Option<&str> {
        self.meal.as_ref().map(|meal| meal.title.as_str())
    }
}
