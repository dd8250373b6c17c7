pub const DEFAULT_DB: &str = "mensa.sqlite";

// local preference keys
pub const SELECTED_CANTEEN_KEY: &str = "selected_canteen_id";
pub const FAVORITES_KEY: &str = "favorite_meals";
pub const DARK_MODE_KEY: &str = "dark_mode";

pub const FAVORITES_DELIMITER: char = ',';

// backend tables
pub const CANTEENS_TABLE: &str = "canteens";
pub const MEAL_DATES_TABLE: &str = "meal_dates";

pub const STORAGE_BUCKET: &str = "mensa-food";
pub const PLACEHOLDER_IMAGE: &str = "mensa.png";

/// Lunch service is considered over from 14:30 local time on.
pub const LUNCH_CUTOFF_HOUR: u32 = 14;
pub const LUNCH_CUTOFF_MINUTE: u32 = 30;

pub const AFTERNOON_KEYWORD: &str = "nachmittag";
pub const DESSERT_KEYWORDS: [&str; 2] = ["dessert", "nachtisch"];

pub const MAX_ICONS_SHOWN: usize = 4;

pub const NO_CANTEEN_MSG: &str = "Keine Mensa ausgewählt, bitte zuerst `canteens` ausführen";
