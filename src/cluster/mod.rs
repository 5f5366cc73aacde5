//! Cluster facade
//!
//! Builds every `kubectl` command line meshctl issues and runs it through the
//! [`CommandRunner`]. Mutating commands report their output through the
//! [`Reporter`]; queries return it to the caller.

pub mod namespace;

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{Result, command as command_error};
use crate::exec::{CommandOutput, CommandRunner};
use crate::ui::Reporter;

pub use namespace::{Namespace, resolve_namespace};

/// Working directory for commands that do not depend on one
const CLUSTER_CWD: &str = "/";

/// Resource kinds meshctl manages, in teardown order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ResourceKind {
    #[value(name = "deployment", alias = "deployments", alias = "deploy")]
    Deployment,
    #[value(name = "daemonsets", alias = "daemonset", alias = "ds")]
    DaemonSet,
    #[value(name = "pods", alias = "pod", alias = "po")]
    Pod,
    #[value(name = "service", alias = "services", alias = "svc")]
    Service,
    #[value(name = "configmap", alias = "configmaps", alias = "cm")]
    ConfigMap,
    #[value(name = "vs", alias = "virtualservice")]
    VirtualService,
    #[value(name = "dr", alias = "destinationrule")]
    DestinationRule,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Deployment,
        ResourceKind::DaemonSet,
        ResourceKind::Pod,
        ResourceKind::Service,
        ResourceKind::ConfigMap,
        ResourceKind::VirtualService,
        ResourceKind::DestinationRule,
    ];

    /// Resource name as passed to kubectl
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Deployment => "deployment",
            ResourceKind::DaemonSet => "daemonsets",
            ResourceKind::Pod => "pods",
            ResourceKind::Service => "service",
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::VirtualService => "vs",
            ResourceKind::DestinationRule => "dr",
        }
    }

    /// Workloads are deleted forcibly with zero grace period
    pub fn force_delete(self) -> bool {
        matches!(
            self,
            ResourceKind::Deployment | ResourceKind::DaemonSet | ResourceKind::Pod
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the namespace `istio-injection` label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionMode {
    Enabled,
    Disabled,
}

impl InjectionMode {
    pub fn label_value(self) -> &'static str {
        match self {
            InjectionMode::Enabled => "enabled",
            InjectionMode::Disabled => "disabled",
        }
    }
}

/// Options for following a container's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub tail: u32,
    pub since: Option<String>,
}

/// `kubectl` operations scoped to one namespace
pub struct Cluster<'a> {
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    namespace: Namespace,
}

impl<'a> Cluster<'a> {
    pub fn new(runner: &'a dyn CommandRunner, reporter: &'a dyn Reporter, namespace: Namespace) -> Self {
        Self {
            runner,
            reporter,
            namespace,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn query(&self, command: &str) -> Result<CommandOutput> {
        self.runner.run(command, Path::new(CLUSTER_CWD))
    }

    fn exec(&self, scope: &str, command: &str, cwd: &Path) -> Result<CommandOutput> {
        let output = self.runner.run(command, cwd)?;
        self.reporter.command_finished(scope, command, &output);
        Ok(output)
    }

    /// Whether the namespace exists
    ///
    /// A failed query counts as absence.
    pub fn namespace_exists(&self) -> bool {
        let command = format!("kubectl get namespace {} -o name", self.namespace);
        match self.query(&command) {
            Ok(output) => output.success(),
            Err(e) => {
                tracing::debug!(error = %e, "namespace query failed");
                false
            }
        }
    }

    /// Create the namespace unless it already exists
    pub fn ensure_namespace(&self) -> Result<()> {
        if self.namespace_exists() {
            tracing::debug!(namespace = %self.namespace, "namespace exists");
            return Ok(());
        }

        let command = format!("kubectl create namespace {}", self.namespace);
        let output = self
            .exec(self.namespace.as_str(), &command, Path::new(CLUSTER_CWD))
            .map_err(|e| command_error::namespace_create_failed(self.namespace.as_str(), e.to_string()))?;
        if !output.success() {
            return Err(command_error::namespace_create_failed(
                self.namespace.as_str(),
                output.stderr.trim(),
            ));
        }
        self.reporter
            .success(&format!("created namespace {}", self.namespace));
        Ok(())
    }

    /// Set the namespace's sidecar injection label
    pub fn set_injection(&self, mode: InjectionMode) -> Result<()> {
        let command = format!(
            "kubectl label namespace {} istio-injection={} --overwrite",
            self.namespace,
            mode.label_value()
        );
        self.exec("istio", &command, Path::new(CLUSTER_CWD))?
            .into_result(&command)
            .map(|_| ())
    }

    /// Apply a single manifest file from `dir`
    pub fn apply_file(&self, service: &str, dir: &Path, file: &str) -> Result<()> {
        let command = format!("kubectl apply -f {file}");
        self.exec(service, &command, dir)?
            .into_result(&command)
            .map(|_| ())
    }

    /// Apply every manifest in `dir`
    pub fn apply_dir(&self, service: &str, dir: &Path) -> Result<()> {
        let command = "kubectl apply -f .";
        self.exec(service, command, dir)?
            .into_result(command)
            .map(|_| ())
    }

    /// Delete every resource described by the manifests in `dir`
    pub fn delete_dir(&self, service: &str, dir: &Path) -> Result<CommandOutput> {
        self.exec(service, "kubectl delete -f . --ignore-not-found", dir)
    }

    /// Delete all resources of one kind in the namespace
    pub fn delete_all(&self, kind: ResourceKind) -> Result<CommandOutput> {
        let mut command = format!("kubectl -n {} delete {kind} --all", self.namespace);
        if kind.force_delete() {
            command.push_str(" --force --grace-period=0");
        }
        self.exec(self.namespace.as_str(), &command, Path::new(CLUSTER_CWD))
    }

    pub fn delete_namespace(&self) -> Result<CommandOutput> {
        let command = format!("kubectl delete namespace {}", self.namespace);
        self.exec(self.namespace.as_str(), &command, Path::new(CLUSTER_CWD))
    }

    /// `kubectl get` listing for one kind
    pub fn get(&self, kind: ResourceKind) -> Result<CommandOutput> {
        self.query(&format!("kubectl -n {} get {kind}", self.namespace))
    }

    /// Pods generated for the service's workload
    pub fn pods_for(&self, service: &str) -> Result<Vec<String>> {
        let output = self.get(ResourceKind::Pod)?;
        Ok(output
            .stdout
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().next())
            .filter(|name| is_pod_of(name, service))
            .map(str::to_string)
            .collect())
    }

    /// Header and NodePort rows of the service listing
    pub fn node_ports(&self) -> Result<(String, Vec<String>)> {
        let output = self.get(ResourceKind::Service)?;
        let mut lines = output.stdout.lines();
        let header = lines.next().unwrap_or_default().to_string();
        let rows = lines
            .filter(|line| line.contains(" NodePort "))
            .map(str::to_string)
            .collect();
        Ok((header, rows))
    }

    /// Follow a container's log, handing each line to `on_line`
    pub fn follow_logs(
        &self,
        pod: &str,
        container: &str,
        options: &LogOptions,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<CommandOutput> {
        let mut command = format!(
            "kubectl -n {} logs {pod} -c {container} --tail={}",
            self.namespace, options.tail
        );
        if let Some(since) = &options.since {
            command.push_str(&format!(" --since={since}"));
        }
        command.push_str(" -f");
        self.runner.stream(&command, Path::new(CLUSTER_CWD), on_line)
    }
}

/// Characters Kubernetes uses for generated name suffixes
const GENERATED_ALPHABET: &str = "bcdfghjklmnpqrstvwxz2456789";

/// `<service>-<hash>` (DaemonSet), `<service>-<rs-hash>-<hash>` (Deployment)
/// or `<service>-<ordinal>` (StatefulSet)
fn is_pod_of(name: &str, service: &str) -> bool {
    let Some(suffix) = name
        .strip_prefix(service)
        .and_then(|rest| rest.strip_prefix('-'))
    else {
        return false;
    };
    let generated =
        |segment: &str| !segment.is_empty() && segment.chars().all(|c| GENERATED_ALPHABET.contains(c));
    match suffix.split('-').collect::<Vec<_>>().as_slice() {
        [ordinal] if !ordinal.is_empty() && ordinal.chars().all(|c| c.is_ascii_digit()) => true,
        [hash] => generated(hash),
        [rs_hash, hash] => generated(rs_hash) && generated(hash),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;
    use crate::test_fixtures::{FakeRunner, RecordingReporter};

    fn ns(name: &str) -> Namespace {
        Namespace::new(name)
    }

    #[test]
    fn test_ensure_namespace_skips_existing() {
        let runner = FakeRunner::new();
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        cluster.ensure_namespace().unwrap();
        assert_eq!(runner.commands(), vec!["kubectl get namespace dev -o name"]);
    }

    #[test]
    fn test_ensure_namespace_creates_missing() {
        let runner = FakeRunner::new().respond("get namespace", CommandOutput::failed(1, "NotFound"));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        cluster.ensure_namespace().unwrap();
        assert_eq!(runner.commands()[1], "kubectl create namespace dev");
        assert!(reporter.contains("success", "created namespace dev"));
    }

    #[test]
    fn test_namespace_creation_failure_is_fatal() {
        let runner = FakeRunner::new()
            .respond("get namespace", CommandOutput::failed(1, "NotFound"))
            .respond("create namespace", CommandOutput::failed(1, "forbidden"));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        let err = cluster.ensure_namespace().unwrap_err();
        assert!(matches!(
            err,
            DeployError::NamespaceCreateFailed { ref namespace, ref reason }
                if namespace == "dev" && reason == "forbidden"
        ));
    }

    #[test]
    fn test_injection_label_command() {
        let runner = FakeRunner::new();
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        cluster.set_injection(InjectionMode::Disabled).unwrap();
        assert_eq!(
            runner.commands(),
            vec!["kubectl label namespace dev istio-injection=disabled --overwrite"]
        );
    }

    #[test]
    fn test_delete_all_forces_workloads_only() {
        let runner = FakeRunner::new();
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        cluster.delete_all(ResourceKind::Pod).unwrap();
        cluster.delete_all(ResourceKind::VirtualService).unwrap();
        assert_eq!(
            runner.commands(),
            vec![
                "kubectl -n dev delete pods --all --force --grace-period=0",
                "kubectl -n dev delete vs --all",
            ]
        );
    }

    #[test]
    fn test_apply_failure_is_command_failed() {
        let runner = FakeRunner::new().respond("apply", CommandOutput::failed(1, "invalid manifest"));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        let err = cluster.apply_dir("cache", Path::new("/tmp/out/cache")).unwrap_err();
        assert!(matches!(err, DeployError::CommandFailed { ref stderr, .. } if stderr == "invalid manifest"));
        assert_eq!(runner.recorded()[0].cwd, Path::new("/tmp/out/cache"));
        assert!(reporter.contains("warn", "invalid manifest"));
    }

    #[test]
    fn test_pods_for_matches_name_prefix() {
        let listing = "NAME                     READY   STATUS\n\
                       cache-7d9f8b6c4-x2x9z    2/2     Running\n\
                       gateway-5c8d7-bcdfg      2/2     Running\n\
                       cache-7d9f8b6c4-q8w7z    2/2     Running\n";
        let runner = FakeRunner::new().respond("get pods", CommandOutput::ok(listing));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        assert_eq!(
            cluster.pods_for("cache").unwrap(),
            vec!["cache-7d9f8b6c4-x2x9z", "cache-7d9f8b6c4-q8w7z"]
        );
        assert!(cluster.pods_for("billing").unwrap().is_empty());
    }

    #[test]
    fn test_pods_for_skips_services_sharing_a_prefix() {
        let listing = "NAME                          READY   STATUS\n\
                       cache-proxy-6f7b9c8d5-k2m4p   2/2     Running\n\
                       cache-proxy-x7n2q             1/1     Running\n\
                       cache-7d9f8b6c4-x2x9z         2/2     Running\n\
                       cache-q8w7z                   1/1     Running\n\
                       cachedb-0                     1/1     Running\n";
        let runner = FakeRunner::new().respond("get pods", CommandOutput::ok(listing));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        assert_eq!(
            cluster.pods_for("cache").unwrap(),
            vec!["cache-7d9f8b6c4-x2x9z", "cache-q8w7z"]
        );
        assert_eq!(
            cluster.pods_for("cache-proxy").unwrap(),
            vec!["cache-proxy-6f7b9c8d5-k2m4p", "cache-proxy-x7n2q"]
        );
    }

    #[test]
    fn test_is_pod_of_statefulset_ordinal() {
        assert!(is_pod_of("cachedb-0", "cachedb"));
        assert!(is_pod_of("cachedb-12", "cachedb"));
        assert!(!is_pod_of("cachedb", "cachedb"));
        assert!(!is_pod_of("cachedb-", "cachedb"));
    }

    #[test]
    fn test_node_ports_keeps_header() {
        let listing = "NAME     TYPE        CLUSTER-IP   PORT(S)\n\
                       gateway  NodePort    10.0.0.1     80:30080/TCP\n\
                       cache    ClusterIP   10.0.0.2     6379/TCP\n";
        let runner = FakeRunner::new().respond("get service", CommandOutput::ok(listing));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));

        let (header, rows) = cluster.node_ports().unwrap();
        assert!(header.starts_with("NAME"));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("gateway"));
    }

    #[test]
    fn test_follow_logs_command() {
        let runner = FakeRunner::new().respond("logs", CommandOutput::ok("one\ntwo\n"));
        let reporter = RecordingReporter::default();
        let cluster = Cluster::new(&runner, &reporter, ns("dev"));
        let options = LogOptions {
            tail: 150,
            since: Some("5m".to_string()),
        };

        let mut lines = Vec::new();
        cluster
            .follow_logs("cache-1", "cache", &options, &mut |line: &str| {
                lines.push(line.to_string());
            })
            .unwrap();
        assert_eq!(lines, vec!["one", "two"]);
        assert_eq!(
            runner.commands(),
            vec!["kubectl -n dev logs cache-1 -c cache --tail=150 --since=5m -f"]
        );
    }

    #[test]
    fn test_resource_kind_parses_aliases() {
        assert_eq!(ResourceKind::from_str("svc", true).unwrap(), ResourceKind::Service);
        assert_eq!(ResourceKind::from_str("pod", true).unwrap(), ResourceKind::Pod);
        assert!(ResourceKind::from_str("ingress", true).is_err());
    }
}
