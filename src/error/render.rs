//! Template rendering errors

use std::path::Path;

use super::DeployError;

/// Creates a template not found error
pub fn template_not_found(path: &Path) -> DeployError {
    DeployError::TemplateNotFound {
        path: path.display().to_string(),
    }
}

/// Creates a template parse error
pub fn parse_failed(path: &Path, reason: impl Into<String>) -> DeployError {
    DeployError::TemplateParse {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates a render failed error
pub fn render_failed(path: &Path, reason: impl Into<String>) -> DeployError {
    DeployError::RenderFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates a post-render validation error
pub fn validation_failed(
    service: impl Into<String>,
    fragment: impl Into<String>,
    found: impl Into<String>,
) -> DeployError {
    DeployError::ValidationFailed {
        service: service.into(),
        fragment: fragment.into(),
        found: found.into(),
    }
}
