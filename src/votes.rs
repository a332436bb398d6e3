use crate::error::TallyError;
use crate::startup::AppState;
use crate::tally::{TallySnapshot, read_snapshot};
use axum::{Json, extract::Extension};

/// One-shot read of the current tally, same shape as the `current_votes` event.
pub async fn current_votes(
    Extension(app_state): Extension<AppState>,
) -> Result<Json<TallySnapshot>, TallyError> {
    let snapshot = read_snapshot(app_state.source.as_ref()).await?;
    Ok(Json(snapshot))
}
