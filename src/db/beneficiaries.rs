//! CRUD queries for the `beneficiary` table.

use super::{
    models::{Beneficiary, BeneficiaryUpdate, NewBeneficiary},
    DbPool,
};
use crate::error::{AppError, AppResult};

const ENTITY: &str = "Beneficiary";

pub async fn create(pool: &DbPool, new: &NewBeneficiary) -> AppResult<Beneficiary> {
    let beneficiary = sqlx::query_as::<_, Beneficiary>(
        r#"
        INSERT INTO beneficiary (name, story, image_url, amount_needed, amount_collected)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, name, story, image_url, amount_needed, amount_collected
        "#,
    )
    .bind(&new.name)
    .bind(&new.story)
    .bind(&new.image_url)
    .bind(new.amount_needed)
    .bind(new.amount_collected.unwrap_or(0))
    .fetch_one(pool)
    .await?;

    tracing::info!(id = beneficiary.id, name = %beneficiary.name, "beneficiary created");
    Ok(beneficiary)
}

/// All beneficiaries in insertion order.
pub async fn list_all(pool: &DbPool) -> AppResult<Vec<Beneficiary>> {
    let rows = sqlx::query_as::<_, Beneficiary>(
        r#"
        SELECT id, name, story, image_url, amount_needed, amount_collected
        FROM beneficiary
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All beneficiaries, newest first (admin dashboard ordering).
pub async fn list_newest_first(pool: &DbPool) -> AppResult<Vec<Beneficiary>> {
    let rows = sqlx::query_as::<_, Beneficiary>(
        r#"
        SELECT id, name, story, image_url, amount_needed, amount_collected
        FROM beneficiary
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &DbPool, id: i64) -> AppResult<Beneficiary> {
    sqlx::query_as::<_, Beneficiary>(
        r#"
        SELECT id, name, story, image_url, amount_needed, amount_collected
        FROM beneficiary
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(ENTITY, id))
}

pub async fn update(pool: &DbPool, id: i64, changes: &BeneficiaryUpdate) -> AppResult<Beneficiary> {
    let updated = sqlx::query_as::<_, Beneficiary>(
        r#"
        UPDATE beneficiary
        SET name = ?1, story = ?2, amount_needed = ?3, amount_collected = ?4,
            image_url = COALESCE(?5, image_url)
        WHERE id = ?6
        RETURNING id, name, story, image_url, amount_needed, amount_collected
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.story)
    .bind(changes.amount_needed)
    .bind(changes.amount_collected)
    .bind(&changes.image_url)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(ENTITY, id))?;

    tracing::info!(id, "beneficiary updated");
    Ok(updated)
}

pub async fn delete(pool: &DbPool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM beneficiary WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(ENTITY, id));
    }

    tracing::info!(id, "beneficiary deleted");
    Ok(())
}
