//! Export Carts Handler

use futures::{StreamExt, TryStreamExt};
use salvo::{
    http::header::CONTENT_TYPE, hyper::body::Bytes, oapi::extract::QueryParam, prelude::*,
};
use thiserror::Error;
use uuid::Uuid;

use trolley_app::carts::{CartsServiceError, models::Cart};

use crate::{
    carts::{
        errors::{CartsResultExt as _, outcome_label},
        responses::CartResponse,
    },
    extensions::*,
    observability,
};

use super::selection;

pub(crate) const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Failures that end an export stream after the response has started.
#[derive(Debug, Error)]
enum ExportError {
    #[error("failed to load carts: {0}")]
    Carts(#[from] CartsServiceError),

    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ExportError {
    fn outcome(&self) -> &'static str {
        match self {
            Self::Carts(error) => outcome_label(error),
            Self::Encode(_) => "encode_failed",
        }
    }
}

fn encode_line(cart: Cart) -> Result<Bytes, ExportError> {
    let mut line = serde_json::to_vec(&CartResponse::from(cart))?;

    line.push(b'\n');

    Ok(Bytes::from(line))
}

/// Export Carts Handler
///
/// Streams matching carts as newline-delimited JSON, one cart per line.
/// `limit` caps the number of carts exported; when absent every cart after
/// `offset` is streamed.
#[endpoint(
    tags("admin"),
    summary = "Export Carts",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "NDJSON stream of carts"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user_uuid: QueryParam<Uuid, false>,
    include_deleted: QueryParam<bool, false>,
    limit: QueryParam<u32, false>,
    offset: QueryParam<u64, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.state_or_500()?;

    let (filter, pagination) = selection(user_uuid, include_deleted, limit, offset);

    // Reject a bad offset before the 200 status is committed.
    pagination.checked_offset().observed("export_carts")?;

    let lines = state
        .app
        .admin
        .export_carts(filter, pagination)
        .map_err(ExportError::from)
        .and_then(|cart| async move { encode_line(cart) })
        .inspect_ok(|_| observability::observe_export_line("ok"))
        .inspect_err(|error| {
            observability::observe_export_line(error.outcome());
            tracing::error!("cart export aborted: {error}");
        })
        .boxed();

    res.add_header(CONTENT_TYPE, NDJSON_CONTENT_TYPE, true)
        .or_500("failed to set content type header")?;

    res.stream(lines);

    Ok(())
}
