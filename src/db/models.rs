//! Database Models - structs representing database tables (used by sqlx/serde).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A person or cause the site raises funds for.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: i64,
    pub name: String,
    pub story: String,
    pub image_url: String,
    pub amount_needed: i64,
    pub amount_collected: i64,
}

/// New beneficiary for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBeneficiary {
    pub name: String,
    pub story: String,
    pub image_url: String,
    pub amount_needed: i64,
    /// Defaults to 0 when absent.
    pub amount_collected: Option<i64>,
}

/// Full replacement of a beneficiary's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficiaryUpdate {
    pub name: String,
    pub story: String,
    pub amount_needed: i64,
    pub amount_collected: i64,
    /// `None` keeps the stored image.
    pub image_url: Option<String>,
}
