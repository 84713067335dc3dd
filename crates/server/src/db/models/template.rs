//! Template metadata model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a stored Terraform template, owned by one tenant.
///
/// Immutable once fetched for a run; `storage_key` names the template's
/// configuration blob in object storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateMetadata {
    /// Tenant-scoped unique template identifier.
    pub template_id: Uuid,

    /// Owning tenant.
    pub tenant_id: String,

    /// Human-readable template name.
    pub name: String,

    /// Object storage key of the template's configuration.
    pub storage_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let template = TemplateMetadata {
            template_id: Uuid::new_v4(),
            tenant_id: "t1".to_string(),
            name: "network-baseline".to_string(),
            storage_key: "templates/t1/network-baseline.tf".to_string(),
        };

        let json = serde_json::to_string(&template).unwrap();
        assert!(json.contains("network-baseline"));
        assert!(json.contains("templates/t1"));
    }
}
