//! Manifest fragments a service directory may contain

use std::collections::BTreeSet;
use std::fmt;

/// One optional manifest file within a service directory
///
/// Variant order is the render and apply order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fragment {
    /// `configmap.yaml`, applied on its own before everything else
    ConfigMap,
    /// `dm.yaml`, the deployment/daemonset
    Workload,
    /// `service.yaml`, the Kubernetes service
    NetworkService,
    /// `istio.yaml`, virtual service / destination rule
    MeshSidecar,
}

impl Fragment {
    /// All fragments in render order
    pub const ALL: [Fragment; 4] = [
        Fragment::ConfigMap,
        Fragment::Workload,
        Fragment::NetworkService,
        Fragment::MeshSidecar,
    ];

    /// File name of the fragment template (and of its rendered output)
    pub fn file_name(self) -> &'static str {
        match self {
            Fragment::ConfigMap => "configmap.yaml",
            Fragment::Workload => "dm.yaml",
            Fragment::NetworkService => "service.yaml",
            Fragment::MeshSidecar => "istio.yaml",
        }
    }

    /// Recognize a fragment from a file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.file_name() == name)
    }

    /// Short label used in messages
    pub fn label(self) -> &'static str {
        match self {
            Fragment::ConfigMap => "config-map",
            Fragment::Workload => "workload",
            Fragment::NetworkService => "network-service",
            Fragment::MeshSidecar => "mesh-sidecar",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.file_name())
    }
}

/// Script run in the service's template directory right before apply
pub const PRE_APPLY_SCRIPT: &str = "apply.sh";

/// Files found for one service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    pub fragments: BTreeSet<Fragment>,
    pub pre_apply_script: bool,
}

impl FragmentSet {
    /// Build a set from plain file names, ignoring unrecognized ones
    pub fn from_file_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::default();
        for name in names {
            if name == PRE_APPLY_SCRIPT {
                set.pre_apply_script = true;
            } else if let Some(fragment) = Fragment::from_file_name(name) {
                set.fragments.insert(fragment);
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty() && !self.pre_apply_script
    }
}
