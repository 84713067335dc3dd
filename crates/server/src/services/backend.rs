//! Remote-state backend configuration rendering.

use minijinja::{context, Environment};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Backend block written into every tenant workspace before a run. The
/// state key is scoped to the tenant and template so no two tenants can
/// ever share remote state.
const BACKEND_TEMPLATE: &str = r#"terraform {
  backend "s3" {
    bucket = "{{ bucket }}"
    key    = "{{ prefix }}/{{ tenant_id }}/{{ template_id }}/terraform.tfstate"
  }
}
"#;

/// Render the `backend.tf` content for a tenant/template pair.
pub fn render_backend_config(
    bucket: &str,
    prefix: &str,
    tenant_id: &str,
    template_id: Uuid,
) -> AppResult<String> {
    let env = Environment::new();
    let tmpl = env
        .template_from_str(BACKEND_TEMPLATE)
        .map_err(|e| AppError::Internal(format!("Backend template parse error: {}", e)))?;

    tmpl.render(context! {
        bucket => bucket,
        prefix => prefix,
        tenant_id => tenant_id,
        template_id => template_id.to_string(),
    })
    .map_err(|e| AppError::Internal(format!("Backend template render error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_scoped_state_key() {
        let template_id = Uuid::new_v4();
        let rendered =
            render_backend_config("tf-state", "tfstate", "t1", template_id).unwrap();

        assert!(rendered.contains("bucket = \"tf-state\""));
        assert!(rendered.contains(&format!(
            "key    = \"tfstate/t1/{}/terraform.tfstate\"",
            template_id
        )));
    }

    #[test]
    fn test_different_tenants_get_different_keys() {
        let template_id = Uuid::new_v4();
        let a = render_backend_config("b", "p", "t1", template_id).unwrap();
        let b = render_backend_config("b", "p", "t2", template_id).unwrap();
        assert_ne!(a, b);
    }
}
