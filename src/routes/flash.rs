//! One-shot status messages carried across a redirect in the `flash` cookie.

use axum::{
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use std::convert::Infallible;

use crate::cookies::{cookie_value, expire_cookie, set_cookie};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    InvalidCredentials,
    MissingFields,
    InvalidAmount,
    PhotoRequired,
    DisallowedFileType,
    BeneficiaryAdded,
    BeneficiaryUpdated,
    BeneficiaryDeleted,
    NewsAdded,
    NewsDeleted,
    GalleryImageAdded,
    GalleryImageDeleted,
}

const ALL: &[Flash] = &[
    Flash::InvalidCredentials,
    Flash::MissingFields,
    Flash::InvalidAmount,
    Flash::PhotoRequired,
    Flash::DisallowedFileType,
    Flash::BeneficiaryAdded,
    Flash::BeneficiaryUpdated,
    Flash::BeneficiaryDeleted,
    Flash::NewsAdded,
    Flash::NewsDeleted,
    Flash::GalleryImageAdded,
    Flash::GalleryImageDeleted,
];

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::InvalidCredentials => "invalid_credentials",
            Flash::MissingFields => "missing_fields",
            Flash::InvalidAmount => "invalid_amount",
            Flash::PhotoRequired => "photo_required",
            Flash::DisallowedFileType => "disallowed_file_type",
            Flash::BeneficiaryAdded => "beneficiary_added",
            Flash::BeneficiaryUpdated => "beneficiary_updated",
            Flash::BeneficiaryDeleted => "beneficiary_deleted",
            Flash::NewsAdded => "news_added",
            Flash::NewsDeleted => "news_deleted",
            Flash::GalleryImageAdded => "gallery_image_added",
            Flash::GalleryImageDeleted => "gallery_image_deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ALL.iter().copied().find(|f| f.code() == code)
    }

    pub fn category(self) -> &'static str {
        match self {
            Flash::InvalidCredentials
            | Flash::MissingFields
            | Flash::InvalidAmount
            | Flash::PhotoRequired
            | Flash::DisallowedFileType => "danger",
            Flash::NewsDeleted | Flash::GalleryImageDeleted => "warning",
            _ => "success",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::InvalidCredentials => "Username or password is incorrect.",
            Flash::MissingFields => "Please fill in all required fields.",
            Flash::InvalidAmount => "Amounts must be whole numbers of zero or more.",
            Flash::PhotoRequired => "Please upload a photo.",
            Flash::DisallowedFileType => "Only PNG, JPG, JPEG and GIF images are allowed.",
            Flash::BeneficiaryAdded => "Beneficiary added successfully!",
            Flash::BeneficiaryUpdated => "Beneficiary updated successfully!",
            Flash::BeneficiaryDeleted => "Beneficiary deleted successfully!",
            Flash::NewsAdded => "News article added successfully!",
            Flash::NewsDeleted => "News article deleted.",
            Flash::GalleryImageAdded => "Photo added to the gallery!",
            Flash::GalleryImageDeleted => "Photo removed from the gallery.",
        }
    }

    pub fn to_message(self) -> FlashMessage {
        FlashMessage {
            category: self.category(),
            message: self.message(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FlashMessage {
    pub category: &'static str,
    pub message: &'static str,
}

/// Flash left by the previous response, if any. Unknown codes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomingFlash(pub Option<Flash>);

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(
            cookie_value(&parts.headers, FLASH_COOKIE).and_then(Flash::from_code),
        ))
    }
}

/// Redirect to `to` and show `flash` on the next page.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    (
        AppendHeaders([(SET_COOKIE, set_cookie(FLASH_COOKIE, flash.code(), None, false))]),
        Redirect::to(to),
    )
        .into_response()
}

/// `Set-Cookie` that consumes a displayed flash.
pub fn consume_flash_cookie() -> String {
    expire_cookie(FLASH_COOKIE, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[test]
    fn test_codes_round_trip_for_every_variant() {
        for flash in ALL {
            assert_eq!(Flash::from_code(flash.code()), Some(*flash));
        }
        assert_eq!(Flash::from_code("bogus"), None);
    }

    #[test]
    fn test_validation_flashes_are_danger() {
        assert_eq!(Flash::MissingFields.category(), "danger");
        assert_eq!(Flash::NewsDeleted.category(), "warning");
        assert_eq!(Flash::BeneficiaryAdded.category(), "success");
    }

    #[test]
    fn test_redirect_with_flash_sets_cookie_and_location() {
        let res = redirect_with_flash("/admin/news", Flash::NewsAdded);
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[LOCATION], "/admin/news");
        let cookie = res.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=news_added;"));
    }
}
