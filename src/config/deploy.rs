//! Environment file (`etc/*.yaml`) data structures

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::serialization::deserialize_vars;
use crate::error::{Result, config as config_error};

/// Default directory rendered manifests are written to
pub const DEFAULT_OUTPUT_PATH: &str = "output";

/// Default shared storage mount shared by all services
pub const DEFAULT_SHARE_STORAGE: &str = "/biss-dep";

/// Default dependency sync command, run inside `mesh/`
pub const DEFAULT_SYNC_COMMAND: &str = "bash sync.sh";

/// Enable/disable selector: service names and/or group names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selector {
    /// Individual service names
    pub service: Vec<String>,

    /// Names of entries in `service_group`
    pub service_group: Vec<String>,
}

impl Selector {
    /// True when neither services nor groups are selected
    pub fn is_empty(&self) -> bool {
        self.service.is_empty() && self.service_group.is_empty()
    }
}

/// Deployment configuration loaded once per run
///
/// Names referenced by groups, selectors or priority tiers are not checked
/// against `service` here; a dangling name surfaces later as a lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Directory rendered manifests are written to
    pub output_path: PathBuf,

    /// Template variables
    #[serde(deserialize_with = "deserialize_vars")]
    pub vars: BTreeMap<String, String>,

    /// Every declared service, in declaration order
    #[serde(rename = "service")]
    pub services: Vec<String>,

    /// Named groups of services
    #[serde(rename = "service_group")]
    pub service_groups: HashMap<String, Vec<String>>,

    pub enable: Selector,

    pub disable: Selector,

    /// Services always deployed, ahead of the selection
    pub must_deps: Vec<String>,

    /// Services applied with sidecar injection switched off
    pub skip_inject_service: Vec<String>,

    pub high_priority_deps: Vec<String>,
    pub mid_priority_deps: Vec<String>,
    pub low_priority_deps: Vec<String>,

    /// Shared storage directory that must exist before any service starts
    pub share_storage_path: PathBuf,

    /// Command run inside `mesh/` to sync shared dependencies
    pub sync_command: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            vars: BTreeMap::new(),
            services: Vec::new(),
            service_groups: HashMap::new(),
            enable: Selector::default(),
            disable: Selector::default(),
            must_deps: Vec::new(),
            skip_inject_service: Vec::new(),
            high_priority_deps: Vec::new(),
            mid_priority_deps: Vec::new(),
            low_priority_deps: Vec::new(),
            share_storage_path: PathBuf::from(DEFAULT_SHARE_STORAGE),
            sync_command: DEFAULT_SYNC_COMMAND.to_string(),
        }
    }
}

impl DeployConfig {
    /// Parse configuration from a YAML string
    #[cfg(test)]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// Relative `output_path` and `share_storage_path` are resolved against
    /// `workdir`, the deploy top directory.
    pub fn load(path: &Path, workdir: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        if !path.is_file() {
            return Err(config_error::not_found(shown));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error::read_failed(&shown, e.to_string()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .map_err(|e| config_error::parse_failed(&shown, e.to_string()))?;

        config.output_path = absolutize(workdir, &config.output_path);
        config.share_storage_path = absolutize(workdir, &config.share_storage_path);

        tracing::debug!(
            config = %shown,
            services = config.services.len(),
            groups = config.service_groups.len(),
            "loaded deploy configuration"
        );
        Ok(config)
    }

    /// Members of a service group (empty for an unknown group)
    pub fn group_members(&self, group: &str) -> &[String] {
        self.service_groups
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `service` is deployed with sidecar injection disabled
    pub fn skips_injection(&self, service: &str) -> bool {
        self.skip_inject_service.iter().any(|s| s == service)
    }

    /// Namespace declared under `vars.namespace`, if non-empty
    pub fn declared_namespace(&self) -> Option<&str> {
        self.vars
            .get("namespace")
            .map(|ns| ns.trim())
            .filter(|ns| !ns.is_empty())
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
