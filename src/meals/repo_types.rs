use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealScheduleEntry {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub eaten_at: OffsetDateTime,
    pub is_on_plan: bool,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMealScheduleEntry {
    pub name: String,
    pub description: String,
    pub eaten_at: OffsetDateTime,
    pub is_on_plan: bool,
}

/// Partial replace; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealScheduleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub eaten_at: Option<OffsetDateTime>,
    pub is_on_plan: Option<bool>,
}

impl MealScheduleChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.eaten_at.is_none()
            && self.is_on_plan.is_none()
    }
}
