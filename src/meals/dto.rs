use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{repo_types::MealScheduleEntry, services::MealStats};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealScheduleRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub eaten_at: OffsetDateTime,
    pub is_on_plan: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealScheduleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub eaten_at: Option<OffsetDateTime>,
    pub is_on_plan: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealScheduleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub eaten_at: OffsetDateTime,
    pub is_on_plan: bool,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MealScheduleEntry> for MealScheduleResponse {
    fn from(e: MealScheduleEntry) -> Self {
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            eaten_at: e.eaten_at,
            is_on_plan: e.is_on_plan,
            user_id: e.user_id,
            created_at: e.created_at,
        }
    }
}

/// `{"mealSchedule": ...}` wrapper used by the read endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealScheduleEnvelope<T> {
    pub meal_schedule: T,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_meals: usize,
    pub total_meals_on_plan: usize,
    pub total_meals_not_on_plan: usize,
    pub total_best_streak: usize,
    pub total_current_streak: usize,
}

impl From<MealStats> for StatsResponse {
    fn from(s: MealStats) -> Self {
        Self {
            total_meals: s.total,
            total_meals_on_plan: s.on_plan,
            total_meals_not_on_plan: s.not_on_plan,
            total_best_streak: s.best_streak,
            total_current_streak: s.current_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn create_request_reads_camel_case_and_rfc3339() {
        let req: CreateMealScheduleRequest = serde_json::from_str(
            r#"{"name":"Lunch","description":"Salad","eatenAt":"2024-10-05T12:30:00-03:00","isOnPlan":true}"#,
        )
        .unwrap();
        assert_eq!(req.name, "Lunch");
        assert_eq!(req.eaten_at, datetime!(2024-10-05 15:30 UTC));
        assert!(req.is_on_plan);
    }

    #[test]
    fn create_request_rejects_non_rfc3339_dates() {
        let res = serde_json::from_str::<CreateMealScheduleRequest>(
            r#"{"name":"Lunch","description":"","eatenAt":"yesterday","isOnPlan":true}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn update_request_tolerates_missing_fields() {
        let req: UpdateMealScheduleRequest = serde_json::from_str(r#"{"isOnPlan":false}"#).unwrap();
        assert_eq!(req.is_on_plan, Some(false));
        assert!(req.name.is_none());
        assert!(req.eaten_at.is_none());

        let req: UpdateMealScheduleRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_on_plan.is_none());
    }

    #[test]
    fn response_uses_camel_case() {
        let entry = MealScheduleEntry {
            id: Uuid::nil(),
            name: "Dinner".into(),
            description: "Soup".into(),
            eaten_at: datetime!(2024-10-05 20:00 UTC),
            is_on_plan: false,
            user_id: Uuid::nil(),
            created_at: datetime!(2024-10-05 20:01 UTC),
        };
        let json = serde_json::to_value(MealScheduleEnvelope {
            meal_schedule: MealScheduleResponse::from(entry),
        })
        .unwrap();
        assert_eq!(json["mealSchedule"]["eatenAt"], "2024-10-05T20:00:00Z");
        assert_eq!(json["mealSchedule"]["isOnPlan"], false);
        assert!(json["mealSchedule"].get("userId").is_some());
    }
}
