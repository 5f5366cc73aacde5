//! Discover which fragment files exist for a service

use std::path::PathBuf;

use walkdir::WalkDir;

use crate::catalog::fragment::FragmentSet;
use crate::error::{DeployError, Result};

/// Lists the fragment files present for a service
pub trait FragmentLister {
    /// Fragment presence for `service`
    ///
    /// Fails with [`DeployError::ServiceDirMissing`] when the service has no
    /// directory at all.
    fn list_fragments(&self, service: &str) -> Result<FragmentSet>;
}

/// Lists fragments from `<mesh>/<service>/` on disk
///
/// Only regular files directly inside the service directory count.
#[derive(Debug, Clone)]
pub struct FsFragmentLister {
    mesh_dir: PathBuf,
}

impl FsFragmentLister {
    pub fn new(mesh_dir: impl Into<PathBuf>) -> Self {
        Self {
            mesh_dir: mesh_dir.into(),
        }
    }

    pub fn service_dir(&self, service: &str) -> PathBuf {
        self.mesh_dir.join(service)
    }
}

impl FragmentLister for FsFragmentLister {
    fn list_fragments(&self, service: &str) -> Result<FragmentSet> {
        let dir = self.service_dir(service);
        if !dir.is_dir() {
            return Err(DeployError::ServiceDirMissing {
                service: service.to_string(),
                path: dir.display().to_string(),
            });
        }

        let names: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();

        Ok(FragmentSet::from_file_names(names.iter().map(String::as_str)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fragment::Fragment;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_lists_present_fragments() {
        let temp = create_temp_dir();
        let service = temp.path().join("cache");
        std::fs::create_dir_all(service.join("nested")).unwrap();
        std::fs::write(service.join("configmap.yaml"), "").unwrap();
        std::fs::write(service.join("dm.yaml"), "").unwrap();
        std::fs::write(service.join("apply.sh"), "").unwrap();
        std::fs::write(service.join("nested").join("service.yaml"), "").unwrap();

        let set = FsFragmentLister::new(temp.path())
            .list_fragments("cache")
            .unwrap();
        assert!(set.pre_apply_script);
        assert_eq!(
            set.fragments.into_iter().collect::<Vec<_>>(),
            vec![Fragment::ConfigMap, Fragment::Workload]
        );
    }

    #[test]
    fn test_missing_service_dir() {
        let temp = create_temp_dir();
        let err = FsFragmentLister::new(temp.path())
            .list_fragments("ghost")
            .unwrap_err();
        assert!(matches!(err, DeployError::ServiceDirMissing { .. }));
    }

    #[test]
    fn test_empty_service_dir() {
        let temp = create_temp_dir();
        std::fs::create_dir_all(temp.path().join("idle")).unwrap();
        let set = FsFragmentLister::new(temp.path())
            .list_fragments("idle")
            .unwrap();
        assert!(set.is_empty());
    }
}
