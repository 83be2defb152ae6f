/**
 * Beneficiary Routes
 * Admin dashboard plus add, edit and delete of beneficiaries
 */
use axum::{
    extract::{Multipart, Path, State},
    response::Response,
};
use serde::Serialize;

use super::{
    flash::{redirect_with_flash, Flash, IncomingFlash},
    form::{parse_amount, store_optional_photo, MultipartForm},
    render, DASHBOARD_PATH,
};
use crate::auth::AdminSession;
use crate::db::{
    beneficiaries,
    models::{Beneficiary, BeneficiaryUpdate, NewBeneficiary},
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::uploads::UploadNaming;

const PLACEHOLDER_BASE: &str = "https://placehold.co/600x400/FFC107/333333?text=";

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub beneficiaries: Vec<Beneficiary>,
}

#[derive(Debug, Serialize)]
pub struct EditPage {
    pub beneficiary: Beneficiary,
}

fn edit_path(id: i64) -> String {
    format!("/admin/edit/{id}")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Placeholder image labelled with the first word of the name.
pub fn placeholder_image(name: &str) -> String {
    let label = name.split_whitespace().next().unwrap_or(name);
    format!("{PLACEHOLDER_BASE}{}", encode_query_value(label))
}

/// Image for a new beneficiary: uploaded photo, then external URL, then placeholder.
pub fn new_beneficiary_image(
    photo_url: Option<String>,
    external_url: Option<&str>,
    name: &str,
) -> String {
    photo_url
        .or_else(|| external_url.map(str::to_string))
        .unwrap_or_else(|| placeholder_image(name))
}

/// Replacement image on edit, or `None` to keep the current one.
pub fn resolve_edit_image(
    current: &str,
    photo_url: Option<String>,
    external_url: Option<&str>,
) -> Option<String> {
    photo_url.or_else(|| {
        external_url
            .filter(|url| *url != current)
            .map(str::to_string)
    })
}

/// GET /admin/dashboard
pub async fn dashboard(
    _admin: AdminSession,
    State(state): State<AppState>,
    flash: IncomingFlash,
) -> AppResult<Response> {
    let page = DashboardPage {
        beneficiaries: beneficiaries::list_newest_first(&state.pool).await?,
    };
    Ok(render(flash, page))
}

/// POST /admin/add
pub async fn add(
    _admin: AdminSession,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = MultipartForm::read(multipart).await?;

    let (Some(name), Some(story), Some(amount_needed)) = (
        form.text("name"),
        form.text("story"),
        form.text("amount_needed"),
    ) else {
        return Ok(redirect_with_flash(DASHBOARD_PATH, Flash::MissingFields));
    };
    let Some(amount_needed) = parse_amount(amount_needed) else {
        return Ok(redirect_with_flash(DASHBOARD_PATH, Flash::InvalidAmount));
    };

    let photo =
        store_optional_photo(&state.uploads, form.file("photo"), UploadNaming::Sanitized).await?;
    let image_url = new_beneficiary_image(photo.map(|p| p.url), form.text("image_url"), name);

    beneficiaries::create(
        &state.pool,
        &NewBeneficiary {
            name: name.to_string(),
            story: story.to_string(),
            image_url,
            amount_needed,
            amount_collected: None,
        },
    )
    .await?;

    Ok(redirect_with_flash(DASHBOARD_PATH, Flash::BeneficiaryAdded))
}

/// GET /admin/edit/{id}
pub async fn edit_page(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    flash: IncomingFlash,
) -> AppResult<Response> {
    let beneficiary = beneficiaries::find(&state.pool, id).await?;
    Ok(render(flash, EditPage { beneficiary }))
}

/// POST /admin/edit/{id}
pub async fn edit(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Response> {
    let current = beneficiaries::find(&state.pool, id).await?;
    let form = MultipartForm::read(multipart).await?;
    let back = edit_path(id);

    let (Some(name), Some(story), Some(amount_needed), Some(amount_collected)) = (
        form.text("name"),
        form.text("story"),
        form.text("amount_needed"),
        form.text("amount_collected"),
    ) else {
        return Ok(redirect_with_flash(&back, Flash::MissingFields));
    };
    let (Some(amount_needed), Some(amount_collected)) =
        (parse_amount(amount_needed), parse_amount(amount_collected))
    else {
        return Ok(redirect_with_flash(&back, Flash::InvalidAmount));
    };

    let photo =
        store_optional_photo(&state.uploads, form.file("photo"), UploadNaming::Sanitized).await?;
    let image_url =
        resolve_edit_image(&current.image_url, photo.map(|p| p.url), form.text("image_url"));

    beneficiaries::update(
        &state.pool,
        id,
        &BeneficiaryUpdate {
            name: name.to_string(),
            story: story.to_string(),
            amount_needed,
            amount_collected,
            image_url,
        },
    )
    .await?;

    Ok(redirect_with_flash(DASHBOARD_PATH, Flash::BeneficiaryUpdated))
}

/// GET /admin/delete/{id}
pub async fn delete(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    beneficiaries::delete(&state.pool, id).await?;
    Ok(redirect_with_flash(DASHBOARD_PATH, Flash::BeneficiaryDeleted))
}
