//! Shared response envelope.
//!
//! Every response body, success or failure, is a `{ "data": ..., "message": ... }`
//! envelope. Use [`Envelope`] instead of ad-hoc `serde_json::json!` bodies.

use serde::Serialize;

/// Standard `{ "data": T, "message": "..." }` response envelope.
///
/// `()` serialises as `null`, so `Envelope<()>` is the data-less form.
///
/// # Example
///
/// ```ignore
/// Ok(Json(Envelope::new(records, resource.listed_message())))
/// ```
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

impl Envelope<()> {
    /// Envelope with `data: null`.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new((), message)
    }
}
