use std::time::Instant;

use chrono::Local;
use serde::de::DeserializeOwned;

use crate::constants::{CANTEENS_TABLE, MEAL_DATES_TABLE};
use crate::data_types::{Canteen, MealDate, MealsByDate};
use crate::errors::FetchError;
use crate::meal_pipeline::{drop_stale_rows, group_by_date};

/// Read-only access to the PostgREST endpoint of the Supabase project.
///
/// Built once in `main` and handed to whoever needs it by reference.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        SupabaseClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, FetchError> {
        let resp = self
            .http
            .get(format!("{}/rest/v1/{}", self.base_url, table))
            .query(query)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// `select=*,meals(*)` filtered by canteen, oldest day first.
pub fn meal_dates_query(canteen_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*,meals(*)".to_string()),
        ("canteen_id", format!("eq.{}", canteen_id)),
        ("order", "served_on.asc".to_string()),
    ]
}

pub struct MealsRepository<'a> {
    client: &'a SupabaseClient,
}

impl<'a> MealsRepository<'a> {
    pub fn new(client: &'a SupabaseClient) -> Self {
        MealsRepository { client }
    }

    pub fn client(&self) -> &SupabaseClient {
        self.client
    }

    /// All canteens in backend order; empty if the backend can't be reached.
    pub async fn get_canteens(&self) -> Vec<Canteen> {
        let now = Instant::now();
        match self
            .client
            .select::<Canteen>(CANTEENS_TABLE, &[("select", "*".to_string())])
            .await
        {
            Ok(canteens) => {
                log::debug!("Fetched {} canteens: {:.2?}", canteens.len(), now.elapsed());
                canteens
            }
            Err(e) => {
                log::error!("Error fetching canteens: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_meal_dates(&self, canteen_id: &str) -> Result<Vec<MealDate>, FetchError> {
        self.client
            .select::<MealDate>(MEAL_DATES_TABLE, &meal_dates_query(canteen_id))
            .await
    }

    /// Meals from yesterday on, grouped by day. Empty if the backend can't be reached.
    pub async fn get_meals_for_canteen(&self, canteen_id: &str) -> MealsByDate {
        let now = Instant::now();
        match self.fetch_meal_dates(canteen_id).await {
            Ok(rows) => {
                log::debug!(
                    "Fetched {} meal rows for canteen {}: {:.2?}",
                    rows.len(),
                    canteen_id,
                    now.elapsed()
                );
                let today = Local::now().date_naive();
                group_by_date(drop_stale_rows(rows, today))
            }
            Err(e) => {
                log::error!("Error fetching meals for canteen {}: {}", canteen_id, e);
                MealsByDate::new()
            }
        }
    }
}
