// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Mapping of HTTP status codes onto [`CalDavError`].

use crate::error::CalDavError;

/// Classifies an HTTP status code.
///
/// Every code in `200..=299` is a success. Everything else maps to exactly one
/// error kind, so the same code always yields the same error.
///
/// # Errors
///
/// Returns the error kind matching a non-2xx status code.
pub fn classify(status: u16) -> Result<(), CalDavError> {
    match status {
        200..=299 => Ok(()),
        403 => Err(CalDavError::Forbidden),
        404 => Err(CalDavError::NotFound),
        409 => Err(CalDavError::Conflict),
        412 => Err(CalDavError::PreconditionFailed),
        500..=599 => Err(CalDavError::ServerError(status)),
        _ => Err(CalDavError::UnknownStatus(status)),
    }
}
