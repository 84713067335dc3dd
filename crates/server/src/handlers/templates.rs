//! Template metadata API handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use terraplane_core::validate_tenant_id;

use crate::db::models::TemplateMetadata;
use crate::error::AppError;
use crate::state::AppState;
use crate::stores::TemplateStore;

/// List a tenant's templates.
///
/// `GET /api/tenants/{tenant_id}/templates`
pub async fn list(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<Vec<TemplateMetadata>>, AppError> {
    validate_tenant_id(&tenant_id)?;
    let templates = state.templates.list(&tenant_id).await?;
    Ok(Json(templates))
}
