//! Turns the flat `meal_dates` rows into what the views display:
//! grouped by day, filtered, split into lunch/afternoon and sorted with
//! favorites first and desserts last.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::constants::{
    AFTERNOON_KEYWORD, DESSERT_KEYWORDS, LUNCH_CUTOFF_HOUR, LUNCH_CUTOFF_MINUTE,
};
use crate::data_types::{DayMeals, FavoriteSet, MealDate, MealQuery, MealsByDate, ServingTime};

/// Groups rows by serving day, each day sorted by category (case-insensitive, stable).
pub fn group_by_date(rows: Vec<MealDate>) -> MealsByDate {
    let mut meals_by_date = MealsByDate::new();

    for row in rows {
        meals_by_date.entry(row.served_on).or_default().push(row);
    }

    for day_meals in meals_by_date.values_mut() {
        day_meals.sort_by_cached_key(|meal_date| meal_date.category.to_lowercase());
    }

    meals_by_date
}

/// Drops everything served before yesterday.
pub fn drop_stale_rows(rows: Vec<MealDate>, today: NaiveDate) -> Vec<MealDate> {
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    rows.into_iter()
        .filter(|meal_date| meal_date.served_on >= yesterday)
        .collect()
}

pub fn matches_search(meal_date: &MealDate, query: &str) -> bool {
    let query = query.to_lowercase();
    match &meal_date.meal {
        Some(meal) => {
            meal.title.to_lowercase().contains(&query)
                || meal.full_text.to_lowercase().contains(&query)
        }
        None => false,
    }
}

pub fn filter_by_search(meals: Vec<MealDate>, query: &str) -> Vec<MealDate> {
    if query.is_empty() {
        return meals;
    }
    meals
        .into_iter()
        .filter(|meal_date| matches_search(meal_date, query))
        .collect()
}

pub fn filter_by_dietary(meals: Vec<MealDate>, query: &MealQuery) -> Vec<MealDate> {
    if query.dietary.is_empty() {
        return meals;
    }
    meals
        .into_iter()
        .filter(|meal_date| {
            let Some(meal) = &meal_date.meal else {
                return false;
            };
            // OR across the selected filters
            meal.icons().iter().any(|icon| {
                let icon = icon.to_lowercase();
                query.dietary.iter().any(|filter| filter.icon_key() == icon)
            })
        })
        .collect()
}

pub fn apply_query(meals: Vec<MealDate>, query: &MealQuery) -> Vec<MealDate> {
    filter_by_dietary(filter_by_search(meals, &query.search), query)
}

/// The note doubles as a serving-time annotation.
pub fn classify_serving_time(note: Option<&str>) -> ServingTime {
    let note = note.unwrap_or_default().to_lowercase();

    if note.contains(AFTERNOON_KEYWORD) {
        ServingTime::AfternoonOnly
    } else if note.trim().is_empty() {
        ServingTime::AllDay
    } else {
        ServingTime::LunchOnly
    }
}

/// Returns `(lunch, afternoon)`. All-day meals land in both.
pub fn split_by_serving_time(meals: Vec<MealDate>) -> (Vec<MealDate>, Vec<MealDate>) {
    let mut lunch = Vec::new();
    let mut afternoon = Vec::new();

    for meal_date in meals {
        match classify_serving_time(meal_date.note.as_deref()) {
            ServingTime::AfternoonOnly => afternoon.push(meal_date),
            ServingTime::LunchOnly => lunch.push(meal_date),
            ServingTime::AllDay => {
                lunch.push(meal_date.clone());
                afternoon.push(meal_date);
            }
        }
    }

    (lunch, afternoon)
}

/// Sort key for a category. Desserts order after every regular category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CategoryKey {
    Regular(String),
    Dessert,
}

impl CategoryKey {
    pub fn new(category: &str) -> Self {
        let category = category.to_lowercase();
        if DESSERT_KEYWORDS
            .iter()
            .any(|keyword| category.contains(keyword))
        {
            CategoryKey::Dessert
        } else {
            CategoryKey::Regular(category)
        }
    }
}

pub fn is_favorite(meal_date: &MealDate, favorites: &FavoriteSet) -> bool {
    meal_date
        .title()
        .is_some_and(|title| favorites.contains(title))
}

/// Favorites first, then by category with desserts last. Stable.
pub fn sort_favorites_first(meals: &mut [MealDate], favorites: &FavoriteSet) {
    meals.sort_by_cached_key(|meal_date| {
        (
            !is_favorite(meal_date, favorites),
            CategoryKey::new(&meal_date.category),
        )
    });
}

pub fn is_past_lunch_cutoff(time: NaiveTime) -> bool {
    time.hour() > LUNCH_CUTOFF_HOUR
        || (time.hour() == LUNCH_CUTOFF_HOUR && time.minute() >= LUNCH_CUTOFF_MINUTE)
}

/// Today, or tomorrow once lunch is over.
pub fn target_date(now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    if is_past_lunch_cutoff(now.time()) {
        today.succ_opt().unwrap_or(today)
    } else {
        today
    }
}

/// Index into the sorted `dates` the day view should open on.
pub fn initial_date_index(dates: &[NaiveDate], now: NaiveDateTime) -> usize {
    let target = target_date(now);

    dates
        .iter()
        .position(|date| *date == target)
        .or_else(|| dates.iter().position(|date| *date > target))
        .unwrap_or(0)
}

pub fn prepare_day(
    meals_by_date: &MealsByDate,
    date: NaiveDate,
    query: &MealQuery,
    favorites: &FavoriteSet,
    now: NaiveDateTime,
) -> DayMeals {
    let meals = meals_by_date.get(&date).cloned().unwrap_or_default();
    let (mut lunch, mut afternoon) = split_by_serving_time(apply_query(meals, query));

    sort_favorites_first(&mut lunch, favorites);
    sort_favorites_first(&mut afternoon, favorites);

    let lunch_dimmed =
        date == now.date() && is_past_lunch_cutoff(now.time()) && !afternoon.is_empty();

    DayMeals {
        date,
        lunch,
        afternoon,
        lunch_dimmed,
    }
}

/// Every day with at least one meal left after filtering, in date order.
pub fn prepare_week(
    meals_by_date: &MealsByDate,
    query: &MealQuery,
    favorites: &FavoriteSet,
) -> Vec<(NaiveDate, Vec<MealDate>)> {
    meals_by_date
        .iter()
        .filter_map(|(date, meals)| {
            let mut meals = apply_query(meals.clone(), query);
            if meals.is_empty() {
                return None;
            }
            sort_favorites_first(&mut meals, favorites);
            Some((*date, meals))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::data_types::{Meal, MealDate};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn meal(title: &str, full_text: &str, icons: &[&str]) -> Meal {
        Meal {
            id: format!("meal-{title}"),
            title: title.to_string(),
            full_text: full_text.to_string(),
            icons: Some(icons.iter().map(|icon| icon.to_string()).collect()),
            image_path: None,
            image_path_generic: None,
        }
    }

    pub fn meal_date(
        id: &str,
        served_on: NaiveDate,
        category: &str,
        note: Option<&str>,
        meal: Option<Meal>,
    ) -> MealDate {
        MealDate {
            id: id.to_string(),
            meal_id: meal.as_ref().map(|m| m.id.clone()).unwrap_or_default(),
            canteen_id: "c1".to_string(),
            served_on,
            category: category.to_string(),
            note: note.map(str::to_string),
            meal,
        }
    }

    pub fn ids(meals: &[MealDate]) -> Vec<&str> {
        meals.iter().map(|m| m.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::data_types::DietaryFilter;

    fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn grouping_keeps_every_row_once() {
        let d1 = date(2024, 5, 6);
        let d2 = date(2024, 5, 7);
        let rows = vec![
            meal_date("a", d1, "Suppe", None, None),
            meal_date("b", d1, "Hauptgericht", None, None),
            meal_date("c", d2, "Dessert", None, None),
        ];

        let grouped = group_by_date(rows);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.values().map(Vec::len).sum::<usize>(), 3);
        assert_eq!(ids(&grouped[&d1]), vec!["b", "a"]);
        assert_eq!(ids(&grouped[&d2]), vec!["c"]);
    }

    #[test]
    fn grouping_of_nothing_has_no_days() {
        assert!(group_by_date(Vec::new()).is_empty());
    }

    #[test]
    fn category_sort_is_case_insensitive_and_stable() {
        let d = date(2024, 5, 6);
        let rows = vec![
            meal_date("1", d, "suppe", None, None),
            meal_date("2", d, "Beilage", None, None),
            meal_date("3", d, "Suppe", None, None),
            meal_date("4", d, "beilage", None, None),
        ];

        let grouped = group_by_date(rows);

        assert_eq!(ids(&grouped[&d]), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn stale_rows_before_yesterday_are_dropped() {
        let today = date(2024, 5, 8);
        let rows = vec![
            meal_date("old", date(2024, 5, 6), "X", None, None),
            meal_date("yesterday", date(2024, 5, 7), "X", None, None),
            meal_date("today", today, "X", None, None),
        ];

        assert_eq!(ids(&drop_stale_rows(rows, today)), vec!["yesterday", "today"]);
    }

    #[test]
    fn search_matches_title_or_full_text() {
        let d = date(2024, 5, 6);
        let rows = vec![
            meal_date("1", d, "X", None, Some(meal("Spaghetti Bolognese", "mit Parmesan", &[]))),
            meal_date("2", d, "X", None, Some(meal("Linsensuppe", "dazu PARMESAN-Brot", &[]))),
            meal_date("3", d, "X", None, Some(meal("Salat", "Dressing", &[]))),
            meal_date("4", d, "X", None, None),
        ];

        assert_eq!(ids(&filter_by_search(rows.clone(), "parmesan")), vec!["1", "2"]);
        assert_eq!(ids(&filter_by_search(rows.clone(), "SPAGHETTI")), vec!["1"]);
        assert_eq!(ids(&filter_by_search(rows, "")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn dietary_filter_is_an_or_over_icons() {
        let d = date(2024, 5, 6);
        let rows = vec![
            meal_date("1", d, "X", None, Some(meal("A", "", &["Vegan", "bio"]))),
            meal_date("2", d, "X", None, Some(meal("B", "", &["fisch"]))),
            meal_date("3", d, "X", None, Some(meal("C", "", &["fleisch"]))),
            meal_date("4", d, "X", None, Some(meal("D", "", &[]))),
            meal_date("5", d, "X", None, None),
        ];
        let query = MealQuery {
            search: String::new(),
            dietary: [DietaryFilter::Vegan, DietaryFilter::Fisch].into_iter().collect(),
        };

        assert_eq!(ids(&filter_by_dietary(rows.clone(), &query)), vec!["1", "2"]);
        assert_eq!(ids(&filter_by_dietary(rows, &MealQuery::default())).len(), 5);
    }

    #[test]
    fn serving_time_follows_the_note() {
        assert_eq!(classify_serving_time(None), ServingTime::AllDay);
        assert_eq!(classify_serving_time(Some("   ")), ServingTime::AllDay);
        assert_eq!(
            classify_serving_time(Some("Nur NACHMITTAGS")),
            ServingTime::AfternoonOnly
        );
        assert_eq!(classify_serving_time(Some("solange der Vorrat reicht")), ServingTime::LunchOnly);
    }

    #[test]
    fn every_meal_lands_in_at_least_one_list() {
        let d = date(2024, 5, 6);
        let notes = [None, Some(""), Some("nachmittags"), Some("mittags"), Some("Aktion")];
        let rows: Vec<MealDate> = notes
            .iter()
            .enumerate()
            .map(|(i, note)| meal_date(&i.to_string(), d, "X", *note, None))
            .collect();

        let (lunch, afternoon) = split_by_serving_time(rows.clone());

        for row in &rows {
            assert!(lunch.contains(row) || afternoon.contains(row), "{} got lost", row.id);
        }
        assert_eq!(ids(&lunch), vec!["0", "1", "3", "4"]);
        assert_eq!(ids(&afternoon), vec!["0", "1", "2"]);
    }

    #[test]
    fn desserts_sort_after_everything_else() {
        let d = date(2024, 5, 6);
        let mut meals = vec![
            meal_date("nachtisch", d, "Nachtisch", None, None),
            meal_date("dessert", d, "Dessert des Tages", None, None),
            meal_date("zwischen", d, "Zwischenmahlzeit", None, None),
            meal_date("beilage", d, "Beilage", None, None),
        ];

        sort_favorites_first(&mut meals, &FavoriteSet::new());

        assert_eq!(ids(&meals), vec!["beilage", "zwischen", "nachtisch", "dessert"]);
        assert!(CategoryKey::new("zzzz") < CategoryKey::new("dessert"));
    }

    #[test]
    fn favorites_sort_before_category_order() {
        let d = date(2024, 5, 6);
        let mut meals = vec![
            meal_date("suppe", d, "Suppe", None, Some(meal("Tomatensuppe", "", &[]))),
            meal_date("kuchen", d, "Dessert", None, Some(meal("Kuchen", "", &[]))),
            meal_date("beilage", d, "Beilage", None, Some(meal("Pommes", "", &[]))),
            meal_date("nomeal", d, "Aaa", None, None),
        ];
        let favorites: FavoriteSet = ["Kuchen".to_string()].into_iter().collect();

        sort_favorites_first(&mut meals, &favorites);

        assert_eq!(ids(&meals), vec!["kuchen", "nomeal", "beilage", "suppe"]);
    }

    #[test]
    fn lunch_cutoff_is_half_past_two() {
        let d = date(2024, 5, 6);
        assert!(!is_past_lunch_cutoff(at(d, 14, 29).time()));
        assert!(is_past_lunch_cutoff(at(d, 14, 30).time()));
        assert!(is_past_lunch_cutoff(at(d, 15, 0).time()));
        assert!(!is_past_lunch_cutoff(at(d, 9, 45).time()));
    }

    #[test]
    fn initial_index_prefers_target_then_next_then_first() {
        let mon = date(2024, 5, 6);
        let tue = date(2024, 5, 7);
        let thu = date(2024, 5, 9);
        let dates = [mon, tue, thu];

        assert_eq!(initial_date_index(&dates, at(mon, 11, 0)), 0);
        assert_eq!(initial_date_index(&dates, at(mon, 15, 0)), 1);
        // wednesday has no menu, thursday is the next one
        assert_eq!(initial_date_index(&dates, at(date(2024, 5, 8), 10, 0)), 2);
        // past the last day
        assert_eq!(initial_date_index(&dates, at(date(2024, 5, 20), 10, 0)), 0);
        assert_eq!(initial_date_index(&[], at(mon, 10, 0)), 0);
    }

    #[test]
    fn lunch_is_dimmed_only_today_after_cutoff() {
        let d = date(2024, 5, 6);
        let meals_by_date = group_by_date(vec![
            meal_date("1", d, "Hauptgericht", None, None),
            meal_date("2", d, "Snack", Some("nachmittags"), None),
        ]);
        let favorites = FavoriteSet::new();
        let query = MealQuery::default();

        assert!(prepare_day(&meals_by_date, d, &query, &favorites, at(d, 14, 45)).lunch_dimmed);
        assert!(!prepare_day(&meals_by_date, d, &query, &favorites, at(d, 12, 0)).lunch_dimmed);
        let yesterday = date(2024, 5, 5);
        assert!(!prepare_day(&meals_by_date, d, &query, &favorites, at(yesterday, 16, 0)).lunch_dimmed);
    }

    #[test]
    fn week_skips_days_emptied_by_filters() {
        let d1 = date(2024, 5, 6);
        let d2 = date(2024, 5, 7);
        let meals_by_date = group_by_date(vec![
            meal_date("1", d1, "X", None, Some(meal("Falafel", "", &["vegan"]))),
            meal_date("2", d2, "X", None, Some(meal("Schnitzel", "", &["fleisch"]))),
        ]);
        let query = MealQuery {
            search: String::new(),
            dietary: [DietaryFilter::Vegan].into_iter().collect(),
        };

        let week = prepare_week(&meals_by_date, &query, &FavoriteSet::new());

        assert_eq!(week.len(), 1);
        assert_eq!(week[0].0, d1);
    }
}
