use chrono::{NaiveDate, NaiveDateTime};

use crate::data_backend::{MealsRepository, SupabaseClient};
use crate::data_types::{Canteen, DayMeals, MealDate, MealQuery, MealsByDate, Theme};
use crate::db_operations::SettingsStore;
use crate::favorites::FavoritesManager;
use crate::meal_pipeline::{initial_date_index, prepare_day, prepare_week};

/// Handed out when a meal fetch starts; the response is only applied if the
/// canteen it was requested for is still the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    canteen_id: String,
}

impl FetchTicket {
    pub fn canteen_id(&self) -> &str {
        &self.canteen_id
    }
}

pub struct MensaSession<'a> {
    repository: MealsRepository<'a>,
    settings: &'a SettingsStore,
    favorites: FavoritesManager<'a>,
    canteens: Vec<Canteen>,
    selected_canteen: Option<Canteen>,
    meals_by_date: MealsByDate,
    // latest fetch still running for the selected canteen
    pending: Option<FetchTicket>,
}

impl<'a> MensaSession<'a> {
    pub fn new(client: &'a SupabaseClient, settings: &'a SettingsStore) -> rusqlite::Result<Self> {
        Ok(MensaSession {
            repository: MealsRepository::new(client),
            settings,
            favorites: FavoritesManager::load(settings)?,
            canteens: Vec::new(),
            selected_canteen: None,
            meals_by_date: MealsByDate::new(),
            pending: None,
        })
    }

    pub async fn load_canteens(&mut self) -> rusqlite::Result<()> {
        let canteens = self.repository.get_canteens().await;
        self.restore_selection(canteens)
    }

    /// Takes the saved canteen if it still exists, the first one otherwise.
    pub fn restore_selection(&mut self, canteens: Vec<Canteen>) -> rusqlite::Result<()> {
        let saved_id = self.settings.selected_canteen_id()?;

        self.selected_canteen = saved_id
            .and_then(|id| canteens.iter().find(|canteen| canteen.id == id))
            .or_else(|| canteens.first())
            .cloned();
        self.canteens = canteens;

        Ok(())
    }

    /// Selects and remembers a canteen. Returns false for unknown ids.
    pub fn select_canteen(&mut self, canteen_id: &str) -> rusqlite::Result<bool> {
        let Some(canteen) = self.canteens.iter().find(|c| c.id == canteen_id) else {
            return Ok(false);
        };

        if self.selected_canteen.as_ref() != Some(canteen) {
            self.meals_by_date.clear();
        }
        if self
            .pending
            .as_ref()
            .is_some_and(|ticket| ticket.canteen_id != canteen.id)
        {
            self.pending = None;
        }
        self.selected_canteen = Some(canteen.clone());
        self.settings.set_selected_canteen_id(canteen_id)?;
        Ok(true)
    }

    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let canteen = self.selected_canteen.as_ref()?;
        let ticket = FetchTicket {
            canteen_id: canteen.id.clone(),
        };
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    /// Applies a fetch result unless the selection moved on in the meantime.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, meals_by_date: MealsByDate) -> bool {
        if self.pending.as_ref() == Some(&ticket) {
            self.pending = None;
        }

        let current = self.selected_canteen.as_ref().map(|c| c.id.as_str());
        if current != Some(ticket.canteen_id()) {
            log::warn!(
                "Discarding stale meals for canteen {} (selected: {})",
                ticket.canteen_id(),
                current.unwrap_or("none")
            );
            return false;
        }

        self.meals_by_date = meals_by_date;
        true
    }

    /// Fetches the selected canteen's meals. Does nothing without a selection.
    pub async fn refresh(&mut self) -> bool {
        let Some(ticket) = self.begin_fetch() else {
            return false;
        };
        let meals_by_date = self.fetch(&ticket).await;
        self.apply_fetch(ticket, meals_by_date)
    }

    pub async fn fetch(&self, ticket: &FetchTicket) -> MealsByDate {
        self.repository
            .get_meals_for_canteen(ticket.canteen_id())
            .await
    }

    pub fn canteens(&self) -> &[Canteen] {
        &self.canteens
    }

    pub fn selected_canteen(&self) -> Option<&Canteen> {
        self.selected_canteen.as_ref()
    }

    pub fn meals_by_date(&self) -> &MealsByDate {
        &self.meals_by_date
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.meals_by_date.keys().copied().collect()
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn favorites(&self) -> &FavoritesManager<'a> {
        &self.favorites
    }

    pub fn toggle_favorite(&mut self, title: &str) -> rusqlite::Result<bool> {
        self.favorites.toggle(title)
    }

    pub fn theme(&self) -> rusqlite::Result<Theme> {
        Ok(self.settings.dark_mode()?.into())
    }

    pub fn image_base_url(&self) -> &str {
        self.repository.client().base_url()
    }

    /// The requested day, or the one picked from the clock when `date` is `None`.
    pub fn day_view(
        &self,
        date: Option<NaiveDate>,
        query: &MealQuery,
        now: NaiveDateTime,
    ) -> Option<DayMeals> {
        let date = match date {
            Some(date) => date,
            None => {
                let dates = self.dates();
                *dates.get(initial_date_index(&dates, now))?
            }
        };

        Some(prepare_day(
            &self.meals_by_date,
            date,
            query,
            self.favorites.all(),
            now,
        ))
    }

    pub fn week_view(&self, query: &MealQuery) -> Vec<(NaiveDate, Vec<MealDate>)> {
        prepare_week(&self.meals_by_date, query, self.favorites.all())
    }
}
