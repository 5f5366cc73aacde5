//! Common test utilities for meshctl integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A deploy top directory with `mesh/` and `deps/`
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a workspace whose dependency sync is a no-op
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        std::fs::create_dir_all(path.join("deps")).expect("Failed to create deps directory");
        let workspace = Self { temp, path };
        workspace.write_file("mesh/sync.sh", "exit 0\n");
        workspace
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn meshctl_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("meshctl").expect("meshctl binary");
    cmd.env_remove("RUN_ENV")
        .env_remove("MESH_NAMESPACE")
        .env_remove("MESHCTL_WORKDIR")
        .env_remove("RUST_LOG");
    cmd
}
