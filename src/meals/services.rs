use super::{
    dto::{CreateMealScheduleRequest, UpdateMealScheduleRequest},
    repo_types::{MealScheduleChanges, NewMealScheduleEntry},
};
use crate::error::ApiError;

pub const TEXT_MAX_LEN: usize = 255;

/// Aggregates over a user's meals, oldest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MealStats {
    pub total: usize,
    pub on_plan: usize,
    pub not_on_plan: usize,
    pub best_streak: usize,
    pub current_streak: usize,
}

impl MealStats {
    /// Single forward pass; an off-plan meal resets the running streak.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let mut stats = MealStats::default();
        for on_plan in flags {
            stats.total += 1;
            if on_plan {
                stats.on_plan += 1;
                stats.current_streak += 1;
                stats.best_streak = stats.best_streak.max(stats.current_streak);
            } else {
                stats.current_streak = 0;
            }
        }
        stats.not_on_plan = stats.total - stats.on_plan;
        stats
    }
}

pub fn validate_create(req: CreateMealScheduleRequest) -> Result<NewMealScheduleEntry, ApiError> {
    Ok(NewMealScheduleEntry {
        name: clean_name(&req.name)?,
        description: clean_description(&req.description)?,
        eaten_at: req.eaten_at,
        is_on_plan: req.is_on_plan,
    })
}

pub fn validate_update(req: UpdateMealScheduleRequest) -> Result<MealScheduleChanges, ApiError> {
    let changes = MealScheduleChanges {
        name: req.name.as_deref().map(clean_name).transpose()?,
        description: req.description.as_deref().map(clean_description).transpose()?,
        eaten_at: req.eaten_at,
        is_on_plan: req.is_on_plan,
    };
    if changes.is_empty() {
        return Err(ApiError::bad_request("No fields were provided"));
    }
    Ok(changes)
}

fn clean_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if name.chars().count() > TEXT_MAX_LEN {
        return Err(ApiError::bad_request("Name too long"));
    }
    Ok(name.to_string())
}

fn clean_description(raw: &str) -> Result<String, ApiError> {
    let description = raw.trim();
    if description.chars().count() > TEXT_MAX_LEN {
        return Err(ApiError::bad_request("Description too long"));
    }
    Ok(description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn streak_resets_on_off_plan_meal() {
        let stats = MealStats::from_flags([true, true, false, true]);
        assert_eq!(
            stats,
            MealStats {
                total: 4,
                on_plan: 3,
                not_on_plan: 1,
                best_streak: 2,
                current_streak: 1,
            }
        );
    }

    #[test]
    fn no_meals_means_zeroes() {
        assert_eq!(MealStats::from_flags(Vec::new()), MealStats::default());
    }

    #[test]
    fn all_on_plan_is_one_long_streak() {
        let stats = MealStats::from_flags([true; 5]);
        assert_eq!(stats.best_streak, 5);
        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.not_on_plan, 0);
    }

    #[test]
    fn trailing_off_plan_meal_ends_current_streak() {
        let stats = MealStats::from_flags([true, true, true, false]);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn later_longer_streak_wins() {
        let stats = MealStats::from_flags([true, false, true, true, true, false, true, true]);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.on_plan, 6);
        assert_eq!(stats.not_on_plan, 2);
    }

    #[test]
    fn all_off_plan_has_no_streak() {
        let stats = MealStats::from_flags([false, false]);
        assert_eq!(stats.best_streak, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.not_on_plan, 2);
    }

    #[test]
    fn create_trims_and_requires_name() {
        let ok = validate_create(CreateMealScheduleRequest {
            name: "  Breakfast ".into(),
            description: " oats ".into(),
            eaten_at: datetime!(2024-10-05 08:00 UTC),
            is_on_plan: true,
        })
        .unwrap();
        assert_eq!(ok.name, "Breakfast");
        assert_eq!(ok.description, "oats");

        let err = validate_create(CreateMealScheduleRequest {
            name: "   ".into(),
            description: String::new(),
            eaten_at: datetime!(2024-10-05 08:00 UTC),
            is_on_plan: true,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn create_rejects_oversized_description() {
        let err = validate_create(CreateMealScheduleRequest {
            name: "Snack".into(),
            description: "x".repeat(TEXT_MAX_LEN + 1),
            eaten_at: datetime!(2024-10-05 08:00 UTC),
            is_on_plan: false,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn update_without_fields_is_rejected() {
        let err = validate_update(UpdateMealScheduleRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "No fields were provided");
    }

    #[test]
    fn update_with_only_off_plan_flag_is_a_change() {
        let changes = validate_update(UpdateMealScheduleRequest {
            is_on_plan: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.is_on_plan, Some(false));
        assert!(changes.name.is_none());
    }

    #[test]
    fn update_rejects_blank_name() {
        let res = validate_update(UpdateMealScheduleRequest {
            name: Some(" ".into()),
            ..Default::default()
        });
        assert!(res.is_err());
    }
}
