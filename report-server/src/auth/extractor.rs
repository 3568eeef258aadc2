//! Actor Extractor
//!
//! Reads the self-declared actor from request headers. Names are taken as
//! raw UTF-8 header bytes so non-ASCII names survive without encoding.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::models::{Actor, Role};

use crate::utils::validation::MAX_NAME_LEN;
use crate::utils::{AppError, ErrorCode};

pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Unverified acting identity of the request
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

fn header_text<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, AppError> {
    match parts.headers.get(name) {
        Some(value) => std::str::from_utf8(value.as_bytes())
            .map(|v| Some(v.trim()).filter(|v| !v.is_empty()))
            .map_err(|_| {
                AppError::with_message(
                    ErrorCode::InvalidFormat,
                    format!("{} header is not valid UTF-8", name),
                )
            }),
        None => Ok(None),
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(actor) = parts.extensions.get::<CurrentActor>() {
            return Ok(actor.clone());
        }

        let role: Role = header_text(parts, ACTOR_ROLE_HEADER)?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::RoleRequired, "X-Actor-Role header is required")
            })?
            .parse()?;

        let name = header_text(parts, ACTOR_NAME_HEADER)?.ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, "X-Actor-Name header is required")
                .with_detail("field", ACTOR_NAME_HEADER)
        })?;
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::validation("X-Actor-Name is too long"));
        }

        let actor = CurrentActor(Actor::new(name, role));
        parts.extensions.insert(actor.clone());
        Ok(actor)
    }
}
