//! Manifest rendering and validation
//!
//! For each fragment a service ships, in render order:
//! 1. read `<mesh>/<service>/<file>`
//! 2. parse and render it against `vars`
//! 3. reject the result if any `{{` or `}}` survived
//!
//! Only when every fragment of the service passes is `<output>/<service>/`
//! created and the manifests written, byte for byte, under their template
//! file names.

pub mod guard;
pub mod template;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Fragment, ServiceDescriptor};
use crate::error::{Result, fs as fs_error, render as render_error};

pub use template::Template;

/// One rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest {
    pub fragment: Fragment,
    /// Where the manifest was written
    pub path: PathBuf,
    pub content: String,
}

/// Renders service templates from `mesh_dir` into `output_dir`
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    mesh_dir: PathBuf,
    output_dir: PathBuf,
    vars: &'a BTreeMap<String, String>,
}

impl<'a> Renderer<'a> {
    pub fn new(
        mesh_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        vars: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            mesh_dir: mesh_dir.into(),
            output_dir: output_dir.into(),
            vars,
        }
    }

    /// Rendered output directory of a service
    pub fn service_output_dir(&self, service: &str) -> PathBuf {
        self.output_dir.join(service)
    }

    fn template_path(&self, service: &str, fragment: Fragment) -> PathBuf {
        self.mesh_dir.join(service).join(fragment.file_name())
    }

    /// Render and validate one fragment without writing it
    pub fn render_fragment(&self, service: &str, fragment: Fragment) -> Result<String> {
        let path = self.template_path(service, fragment);
        let source = read_template(&path)?;

        let template =
            Template::parse(&source).map_err(|e| render_error::parse_failed(&path, e.to_string()))?;
        tracing::trace!(service, %fragment, variables = ?template.variables(), "parsed template");
        let rendered = template
            .render(self.vars)
            .map_err(|e| render_error::render_failed(&path, e.to_string()))?;

        if let Some(found) = guard::find_leftover(&rendered) {
            return Err(render_error::validation_failed(
                service,
                fragment.to_string(),
                found,
            ));
        }
        Ok(rendered)
    }

    /// Render every fragment of a service and write the results
    ///
    /// Nothing is written unless every fragment renders and validates.
    pub fn render_service(&self, service: &ServiceDescriptor) -> Result<Vec<RenderedManifest>> {
        let name = service.name();
        let mut rendered = Vec::new();
        for fragment in service.fragments() {
            let content = self.render_fragment(name, fragment)?;
            tracing::debug!(service = name, %fragment, bytes = content.len(), "rendered");
            rendered.push((fragment, content));
        }

        let dir = self.service_output_dir(name);
        std::fs::create_dir_all(&dir).map_err(|e| fs_error::write_failed(&dir, e))?;

        rendered
            .into_iter()
            .map(|(fragment, content)| -> Result<RenderedManifest> {
                let path = dir.join(fragment.file_name());
                std::fs::write(&path, content.as_bytes())
                    .map_err(|e| fs_error::write_failed(&path, e))?;
                Ok(RenderedManifest {
                    fragment,
                    path,
                    content,
                })
            })
            .collect()
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            render_error::template_not_found(path)
        } else {
            fs_error::io_error(format!("{}: {e}", path.display()))
        }
    })
}
