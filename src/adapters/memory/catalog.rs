//! In-memory catalog adapter.
//!
//! Holds themes and schedules for tests and local runs. Seeding methods
//! stand in for the catalog management that lives outside this service.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::catalog::{Schedule, Theme};
use crate::domain::foundation::{DomainError, ErrorCode, ScheduleId, ThemeId};
use crate::ports::CatalogReader;

#[derive(Debug, Default)]
struct CatalogState {
    themes: BTreeMap<ThemeId, Theme>,
    schedules: BTreeMap<ScheduleId, Schedule>,
    next_theme_id: i64,
    next_schedule_id: i64,
}

/// In-memory theme and schedule store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a theme, assigning the next id.
    pub async fn add_theme(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        price: u32,
    ) -> Theme {
        let mut state = self.state.write().await;
        state.next_theme_id += 1;
        let theme = Theme::new(ThemeId::new(state.next_theme_id), name, description, price);
        state.themes.insert(theme.id, theme.clone());
        theme
    }

    /// Seed a schedule for an existing theme, assigning the next id.
    ///
    /// # Errors
    ///
    /// - `ThemeNotFound` if `theme_id` was never seeded
    pub async fn add_schedule(
        &self,
        theme_id: ThemeId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Schedule, DomainError> {
        let mut state = self.state.write().await;
        if !state.themes.contains_key(&theme_id) {
            return Err(DomainError::new(
                ErrorCode::ThemeNotFound,
                format!("Theme not found: {}", theme_id),
            ));
        }
        state.next_schedule_id += 1;
        let schedule = Schedule::new(ScheduleId::new(state.next_schedule_id), theme_id, date, time);
        state.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    /// Ids of the theme's schedules on `date`.
    pub async fn schedule_ids_for(&self, theme_id: ThemeId, date: NaiveDate) -> Vec<ScheduleId> {
        self.state
            .read()
            .await
            .schedules
            .values()
            .filter(|s| s.theme_id == theme_id && s.date == date)
            .map(|s| s.id)
            .collect()
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn find_schedule(&self, id: ScheduleId) -> Result<Option<Schedule>, DomainError> {
        Ok(self.state.read().await.schedules.get(&id).cloned())
    }

    async fn list_themes(&self) -> Result<Vec<Theme>, DomainError> {
        Ok(self.state.read().await.themes.values().cloned().collect())
    }
}
