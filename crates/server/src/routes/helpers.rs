//! Shared handler helpers.

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Paging parameters accepted by the list endpoints. `page_size` stays a
/// raw string so the policy can reject garbage with a 400 instead of
/// letting deserialization mask it.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<String>,
}

/// Resolve paging input against the configured policy. Runs before any
/// database work so invalid input fails fast.
pub fn resolve_paging(
    state: &AppState,
    page: Option<u32>,
    page_size: Option<&str>,
) -> AppResult<(u32, u32)> {
    let per_page = state
        .page_policy()
        .resolve(page_size)
        .map_err(|error| AppError::BadRequest(error.to_string()))?;
    Ok((page.unwrap_or(1).max(1), per_page))
}
