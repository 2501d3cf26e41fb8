// Helm wrapper
#![allow(dead_code)]

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::exec::Runner;
use crate::helm::config::HelmConfig;
use crate::helm::error::{HelmError, Result};
use crate::helm::types::{InstallOptions, UpgradeOptions};

/// Wrapper around the helm binary.
pub struct HelmRunner {
    config: HelmConfig,
    runner: Runner,
}

impl HelmRunner {
    pub fn new(config: HelmConfig) -> Self {
        Self {
            config,
            runner: Runner::new(),
        }
    }

    /// Use an injected runner instead of the system one.
    pub fn with_runner(config: HelmConfig, runner: Runner) -> Self {
        Self { config, runner }
    }

    /// Install a chart.
    pub async fn install(&self, cancel: &CancellationToken, opts: InstallOptions) -> Result<()> {
        if opts.release_name.is_empty() {
            return Err(HelmError::MissingField("release name"));
        }
        if opts.chart.is_empty() {
            return Err(HelmError::MissingField("chart"));
        }

        info!(
            release = %opts.release_name,
            chart = %opts.chart,
            namespace = %opts.namespace,
            "installing helm chart"
        );
        let start = Instant::now();

        let mut args = vec![String::from("install"), opts.release_name, opts.chart];
        if !opts.namespace.is_empty() {
            args.push(String::from("--namespace"));
            args.push(opts.namespace);
        }
        if opts.create_namespace {
            args.push(String::from("--create-namespace"));
        }
        for values_file in opts.values {
            args.push(String::from("--values"));
            args.push(values_file);
        }
        for set_value in opts.set {
            args.push(String::from("--set"));
            args.push(set_value);
        }
        if opts.wait {
            args.push(String::from("--wait"));
        }
        if !opts.timeout.is_empty() {
            args.push(String::from("--timeout"));
            args.push(opts.timeout);
        }

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm chart installed"
        );
        Ok(())
    }

    /// Upgrade a release.
    pub async fn upgrade(&self, cancel: &CancellationToken, opts: UpgradeOptions) -> Result<()> {
        if opts.release_name.is_empty() {
            return Err(HelmError::MissingField("release name"));
        }
        if opts.chart.is_empty() {
            return Err(HelmError::MissingField("chart"));
        }

        info!(
            release = %opts.release_name,
            chart = %opts.chart,
            namespace = %opts.namespace,
            "upgrading helm release"
        );
        let start = Instant::now();

        let mut args = vec![String::from("upgrade"), opts.release_name, opts.chart];
        if !opts.namespace.is_empty() {
            args.push(String::from("--namespace"));
            args.push(opts.namespace);
        }
        if opts.install {
            args.push(String::from("--install"));
        }
        for values_file in opts.values {
            args.push(String::from("--values"));
            args.push(values_file);
        }
        for set_value in opts.set {
            args.push(String::from("--set"));
            args.push(set_value);
        }
        if opts.wait {
            args.push(String::from("--wait"));
        }
        if !opts.timeout.is_empty() {
            args.push(String::from("--timeout"));
            args.push(opts.timeout);
        }

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm release upgraded"
        );
        Ok(())
    }

    /// Uninstall a release.
    pub async fn uninstall(
        &self,
        cancel: &CancellationToken,
        release_name: &str,
        namespace: &str,
        extra: &[String],
    ) -> Result<()> {
        if release_name.is_empty() {
            return Err(HelmError::MissingField("release name"));
        }

        info!(release = %release_name, namespace = %namespace, "uninstalling helm release");
        let start = Instant::now();

        let mut args = vec![String::from("uninstall"), release_name.to_string()];
        if !namespace.is_empty() {
            args.push(String::from("--namespace"));
            args.push(namespace.to_string());
        }
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm release uninstalled"
        );
        Ok(())
    }

    /// List releases; an empty namespace lists across all namespaces.
    pub async fn list(
        &self,
        cancel: &CancellationToken,
        namespace: &str,
        extra: &[String],
    ) -> Result<()> {
        info!(namespace = %namespace, "listing helm releases");
        let start = Instant::now();

        let mut args = vec![String::from("list")];
        if !namespace.is_empty() {
            args.push(String::from("--namespace"));
            args.push(namespace.to_string());
        } else {
            args.push(String::from("--all-namespaces"));
        }
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm releases listed"
        );
        Ok(())
    }

    /// Show the status of a release.
    pub async fn status(
        &self,
        cancel: &CancellationToken,
        release_name: &str,
        namespace: &str,
        extra: &[String],
    ) -> Result<()> {
        if release_name.is_empty() {
            return Err(HelmError::MissingField("release name"));
        }

        info!(release = %release_name, namespace = %namespace, "getting helm release status");
        let start = Instant::now();

        let mut args = vec![String::from("status"), release_name.to_string()];
        if !namespace.is_empty() {
            args.push(String::from("--namespace"));
            args.push(namespace.to_string());
        }
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm release status retrieved"
        );
        Ok(())
    }

    /// Render chart templates locally.
    pub async fn template(
        &self,
        cancel: &CancellationToken,
        release_name: &str,
        chart: &str,
        extra: &[String],
    ) -> Result<()> {
        if release_name.is_empty() {
            return Err(HelmError::MissingField("release name"));
        }
        if chart.is_empty() {
            return Err(HelmError::MissingField("chart"));
        }

        info!(release = %release_name, chart = %chart, "rendering helm templates");
        let start = Instant::now();

        let mut args = vec![
            String::from("template"),
            release_name.to_string(),
            chart.to_string(),
        ];
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm templates rendered"
        );
        Ok(())
    }

    /// Lint a chart directory.
    pub async fn lint(
        &self,
        cancel: &CancellationToken,
        chart: &str,
        extra: &[String],
    ) -> Result<()> {
        if chart.is_empty() {
            return Err(HelmError::MissingField("chart path"));
        }

        info!(chart = %chart, "linting helm chart");
        let start = Instant::now();

        let mut args = vec![String::from("lint"), chart.to_string()];
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm chart linted"
        );
        Ok(())
    }

    /// Package a chart directory into an archive.
    pub async fn package(
        &self,
        cancel: &CancellationToken,
        chart: &str,
        extra: &[String],
    ) -> Result<()> {
        if chart.is_empty() {
            return Err(HelmError::MissingField("chart path"));
        }

        info!(chart = %chart, "packaging helm chart");
        let start = Instant::now();

        let mut args = vec![String::from("package"), chart.to_string()];
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm chart packaged"
        );
        Ok(())
    }

    /// Add a chart repository.
    pub async fn repo_add(
        &self,
        cancel: &CancellationToken,
        name: &str,
        url: &str,
        extra: &[String],
    ) -> Result<()> {
        if name.is_empty() {
            return Err(HelmError::MissingField("repository name"));
        }
        if url.is_empty() {
            return Err(HelmError::MissingField("repository URL"));
        }

        info!(name = %name, url = %url, "adding helm repository");
        let start = Instant::now();

        let mut args = vec![
            String::from("repo"),
            String::from("add"),
            name.to_string(),
            url.to_string(),
        ];
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm repository added"
        );
        Ok(())
    }

    /// Update chart repositories.
    pub async fn repo_update(&self, cancel: &CancellationToken, extra: &[String]) -> Result<()> {
        info!("updating helm repositories");
        let start = Instant::now();

        let mut args = vec![String::from("repo"), String::from("update")];
        args.extend(extra.iter().cloned());

        self.run_helm(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "helm repositories updated"
        );
        Ok(())
    }

    async fn run_helm(&self, cancel: &CancellationToken, args: Vec<String>) -> Result<()> {
        self.runner
            .run(cancel, &self.config.bin, self.config.stream_to_log, args)
            .await?;
        Ok(())
    }
}
