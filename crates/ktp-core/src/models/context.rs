//! Resource context: which project, sub-project and role a catalog belongs to.
//!
//! The strings come from outside the resource manager (routing parameters and the
//! role recorded at login) and are never interpreted beyond display and keying.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_USER_ROLE, MISSING_SEGMENT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContext {
    pub project: Option<String>,
    pub sub_project: Option<String>,
    pub role: String,
}

impl ResourceContext {
    /// Build a context; a missing or blank role falls back to the default role.
    pub fn new(project: Option<String>, sub_project: Option<String>, role: Option<String>) -> Self {
        let role = role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ROLE.to_string());

        ResourceContext {
            project: non_blank(project),
            sub_project: non_blank(sub_project),
            role,
        }
    }

    /// Page title, e.g. `Frontend Developer Resources`.
    pub fn title(&self) -> String {
        format!("{} Resources", self.role)
    }

    /// `project → subProject`, with absent parts left empty.
    pub fn breadcrumb(&self) -> String {
        format!(
            "{} → {}",
            self.project.as_deref().unwrap_or_default(),
            self.sub_project.as_deref().unwrap_or_default()
        )
    }

    /// Catalog key for this context: `{base}:{project}:{subProject}:{role}`.
    pub fn scoped_catalog_key(&self, base: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            base,
            self.project.as_deref().unwrap_or(MISSING_SEGMENT),
            self.sub_project.as_deref().unwrap_or(MISSING_SEGMENT),
            self.role
        )
    }
}

impl Default for ResourceContext {
    fn default() -> Self {
        ResourceContext::new(None, None, None)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
