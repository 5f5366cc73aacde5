//! Deploy workspace layout
//!
//! meshctl runs from the deploy top directory:
//!
//! ```text
//! <root>/
//! ├── etc/test_env.yaml   # default environment file
//! ├── deps/               # shared dependencies synced before a run
//! ├── mesh/
//! │   ├── sync.sh         # dependency sync script
//! │   └── <service>/      # configmap.yaml, dm.yaml, service.yaml, istio.yaml, apply.sh
//! └── output/             # rendered manifests (recreated every run)
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Result, config as config_error};

/// Service template root
pub const MESH_DIR: &str = "mesh";

/// Shared dependency directory
pub const DEPS_DIR: &str = "deps";

/// A validated deploy top directory
#[derive(Debug, Clone)]
pub struct DeployWorkspace {
    /// Deploy top directory
    pub root: PathBuf,

    /// `<root>/mesh`
    pub mesh_dir: PathBuf,

    /// `<root>/deps`
    pub deps_dir: PathBuf,
}

impl DeployWorkspace {
    /// Open the deploy workspace rooted at `root`
    ///
    /// Both `mesh/` and `deps/` must exist.
    pub fn open(root: &Path) -> Result<Self> {
        let root = dunce::canonicalize(root)
            .map_err(|_| config_error::workspace_invalid(root.display().to_string(), "directory"))?;

        let mesh_dir = root.join(MESH_DIR);
        if !mesh_dir.is_dir() {
            return Err(config_error::workspace_invalid(
                root.display().to_string(),
                format!("{MESH_DIR}/"),
            ));
        }

        let deps_dir = root.join(DEPS_DIR);
        if !deps_dir.is_dir() {
            return Err(config_error::workspace_invalid(
                root.display().to_string(),
                format!("{DEPS_DIR}/"),
            ));
        }

        Ok(Self {
            root,
            mesh_dir,
            deps_dir,
        })
    }

    /// Template directory of a service
    pub fn service_dir(&self, service: &str) -> PathBuf {
        self.mesh_dir.join(service)
    }
}
