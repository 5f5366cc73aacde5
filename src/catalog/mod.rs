//! Service catalog
//!
//! One [`ServiceDescriptor`] per declared service, built once per run from a
//! [`FragmentLister`] and never mutated afterwards.

pub mod fragment;
pub mod lister;

use std::collections::{BTreeSet, HashMap};

pub use fragment::{Fragment, FragmentSet, PRE_APPLY_SCRIPT};
pub use lister::{FragmentLister, FsFragmentLister};

use crate::config::DeployConfig;
use crate::error::{DeployError, Result};
use crate::ui::Reporter;

/// Which fragments a service ships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    fragments: BTreeSet<Fragment>,
    pre_apply_script: bool,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, files: FragmentSet) -> Self {
        Self {
            name: name.into(),
            fragments: files.fragments,
            pre_apply_script: files.pre_apply_script,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, fragment: Fragment) -> bool {
        self.fragments.contains(&fragment)
    }

    /// Present fragments in render order
    pub fn fragments(&self) -> impl Iterator<Item = Fragment> + '_ {
        self.fragments.iter().copied()
    }

    pub fn has_pre_apply_script(&self) -> bool {
        self.pre_apply_script
    }
}

/// Descriptors for every declared service
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: HashMap<String, ServiceDescriptor>,
}

impl Catalog {
    /// Build the catalog for every name in the declared `service` list
    ///
    /// A declared service without a directory is fatal; a directory without
    /// any recognized file is only reported.
    pub fn build(
        config: &DeployConfig,
        lister: &dyn FragmentLister,
        reporter: &dyn Reporter,
    ) -> Result<Self> {
        let mut services = HashMap::with_capacity(config.services.len());
        for name in &config.services {
            let files = lister.list_fragments(name)?;
            if files.is_empty() {
                reporter.warn(&format!(
                    "service {name} directory contains no manifest templates"
                ));
            }
            tracing::debug!(service = %name, fragments = ?files.fragments, "catalogued service");
            services.insert(name.clone(), ServiceDescriptor::new(name.clone(), files));
        }
        Ok(Self { services })
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    /// Lookup that fails with [`DeployError::ServiceNotFound`]
    pub fn require(&self, name: &str) -> Result<&ServiceDescriptor> {
        self.get(name).ok_or_else(|| DeployError::ServiceNotFound {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
