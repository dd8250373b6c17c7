use crate::constants::{FAVORITES_DELIMITER, FAVORITES_KEY};
use crate::data_types::FavoriteSet;
use crate::db_operations::SettingsStore;

pub fn encode_favorites(favorites: &FavoriteSet) -> String {
    favorites
        .iter()
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(FAVORITES_DELIMITER.to_string().as_str())
}

pub fn decode_favorites(encoded: &str) -> FavoriteSet {
    if encoded.is_empty() {
        return FavoriteSet::new();
    }
    encoded
        .split(FAVORITES_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Favorite meals, identified by title.
///
/// Two different meals with the same title share one favorite flag.
pub struct FavoritesManager<'a> {
    settings: &'a SettingsStore,
    favorites: FavoriteSet,
}

impl<'a> FavoritesManager<'a> {
    pub fn load(settings: &'a SettingsStore) -> rusqlite::Result<Self> {
        let favorites = settings
            .get_string(FAVORITES_KEY)?
            .map(|encoded| decode_favorites(&encoded))
            .unwrap_or_default();

        Ok(FavoritesManager {
            settings,
            favorites,
        })
    }

    /// Adds or removes `title` and persists the result. Returns whether it is now a favorite.
    /// Empty titles are ignored, they would not survive the encoding.
    pub fn toggle(&mut self, title: &str) -> rusqlite::Result<bool> {
        if title.is_empty() {
            log::warn!("Ignoring favorite with empty title");
            return Ok(false);
        }
        if title.contains(FAVORITES_DELIMITER) {
            log::warn!(
                "Favorite '{}' contains '{}' and will not survive a restart intact",
                title,
                FAVORITES_DELIMITER
            );
        }

        let mut favorites = self.favorites.clone();
        let now_favorite = if favorites.remove(title) {
            false
        } else {
            favorites.insert(title.to_string());
            true
        };

        self.settings
            .put_string(FAVORITES_KEY, &encode_favorites(&favorites))?;
        self.favorites = favorites;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorites.contains(title)
    }

    pub fn all(&self) -> &FavoriteSet {
        &self.favorites
    }
}
