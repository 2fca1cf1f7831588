use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{MealScheduleChanges, MealScheduleEntry, NewMealScheduleEntry};

impl MealScheduleEntry {
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        new: &NewMealScheduleEntry,
    ) -> anyhow::Result<MealScheduleEntry> {
        let row = sqlx::query_as::<_, MealScheduleEntry>(
            r#"
            INSERT INTO meal_schedule (id, name, description, eaten_at, is_on_plan, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, eaten_at, is_on_plan, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.eaten_at)
        .bind(new.is_on_plan)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("insert meal schedule entry")?;
        Ok(row)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MealScheduleEntry>> {
        let rows = sqlx::query_as::<_, MealScheduleEntry>(
            r#"
            SELECT id, name, description, eaten_at, is_on_plan, user_id, created_at
            FROM meal_schedule
            WHERE user_id = $1
            ORDER BY eaten_at DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list meal schedule by user")?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<MealScheduleEntry>> {
        let row = sqlx::query_as::<_, MealScheduleEntry>(
            r#"
            SELECT id, name, description, eaten_at, is_on_plan, user_id, created_at
            FROM meal_schedule
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find meal schedule entry")?;
        Ok(row)
    }

    /// Applies `changes` to the entry when it belongs to `user_id`.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        changes: &MealScheduleChanges,
    ) -> anyhow::Result<Option<MealScheduleEntry>> {
        let row = sqlx::query_as::<_, MealScheduleEntry>(
            r#"
            UPDATE meal_schedule
               SET name        = COALESCE($3, name),
                   description = COALESCE($4, description),
                   eaten_at    = COALESCE($5, eaten_at),
                   is_on_plan  = COALESCE($6, is_on_plan)
             WHERE id = $1 AND user_id = $2
            RETURNING id, name, description, eaten_at, is_on_plan, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.eaten_at)
        .bind(changes.is_on_plan)
        .fetch_optional(db)
        .await
        .context("update meal schedule entry")?;
        Ok(row)
    }

    /// Returns whether a row was removed.
    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM meal_schedule WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await
            .context("delete meal schedule entry")?;
        Ok(res.rows_affected() > 0)
    }

    /// On-plan flags of all the user's entries, oldest meal first.
    pub async fn on_plan_flags(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<bool>> {
        let flags = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_on_plan
            FROM meal_schedule
            WHERE user_id = $1
            ORDER BY eaten_at ASC, created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("load on-plan flags")?;
        Ok(flags)
    }
}
