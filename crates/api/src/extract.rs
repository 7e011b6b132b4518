//! Extractors whose rejections render as the standard error envelope
//! instead of axum's plain-text defaults.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Request body decoded from JSON or from an urlencoded form.
///
/// `Content-Type: application/x-www-form-urlencoded` goes through
/// [`axum::Form`]; anything else is treated as JSON. Malformed bodies map to
/// 400 `BAD_REQUEST`; bodies that do not fit the payload type (missing
/// field, wrong type) map to 400 `VALIDATION_ERROR`.
#[derive(Debug)]
pub struct AppBody<T>(pub T);

impl<T, S> FromRequest<S> for AppBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(Self(value))
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

/// `axum::extract::Path` with [`AppError`] as its rejection, so a
/// non-numeric id is a 400 envelope rather than a bare text body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
