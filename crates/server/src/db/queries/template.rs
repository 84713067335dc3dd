//! Template metadata queries.

use uuid::Uuid;

use crate::db::models::TemplateMetadata;
use crate::db::DbPool;
use crate::error::AppResult;

/// Fetch a template's metadata, scoped to the owning tenant.
pub async fn fetch_template_metadata(
    pool: &DbPool,
    tenant_id: &str,
    template_id: Uuid,
) -> AppResult<Option<TemplateMetadata>> {
    let template = sqlx::query_as::<_, TemplateMetadata>(
        r#"
        SELECT template_id, tenant_id, name, storage_key
        FROM template_metadata
        WHERE tenant_id = $1 AND template_id = $2
        "#,
    )
    .bind(tenant_id)
    .bind(template_id)
    .fetch_optional(pool)
    .await?;

    Ok(template)
}

/// List all templates owned by a tenant.
pub async fn list_templates(pool: &DbPool, tenant_id: &str) -> AppResult<Vec<TemplateMetadata>> {
    let templates = sqlx::query_as::<_, TemplateMetadata>(
        r#"
        SELECT template_id, tenant_id, name, storage_key
        FROM template_metadata
        WHERE tenant_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;

    Ok(templates)
}
