// Ko wrapper
#![allow(dead_code)]

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::exec::Runner;
use crate::ko::config::KoConfig;
use crate::ko::error::{KoError, Result};
use crate::ko::types::{ApplyOptions, BuildOptions, DeleteOptions};

/// Wrapper around the ko binary.
pub struct KoRunner {
    config: KoConfig,
    runner: Runner,
}

impl KoRunner {
    pub fn new(config: KoConfig) -> Self {
        Self {
            config,
            runner: Runner::new(),
        }
    }

    /// Use an injected runner instead of the system one.
    pub fn with_runner(config: KoConfig, runner: Runner) -> Self {
        Self { config, runner }
    }

    /// Build a container image for an import path.
    pub async fn build(&self, cancel: &CancellationToken, opts: BuildOptions) -> Result<()> {
        if opts.import_path.is_empty() {
            return Err(KoError::MissingField("import path"));
        }

        info!(
            import_path = %opts.import_path,
            local = opts.local,
            push = opts.push,
            "building container image"
        );
        let start = Instant::now();

        let mut args = vec![String::from("build"), opts.import_path];
        for tag in opts.tags {
            args.push(String::from("--tags"));
            args.push(tag);
        }
        for platform in opts.platforms {
            args.push(String::from("--platform"));
            args.push(platform);
        }
        if !opts.base_image.is_empty() {
            // TODO: revisit this mapping; ko reads the default base image from
            // .ko.yaml, while --base-import-paths controls image naming.
            args.push(String::from("--base-import-paths"));
            args.push(opts.base_image);
        }
        if opts.bare {
            args.push(String::from("--bare"));
        }
        if opts.local {
            args.push(String::from("--local"));
        }
        if opts.push {
            args.push(String::from("--push"));
        }
        if opts.preserve_import_paths {
            args.push(String::from("--preserve-import-paths"));
        }

        self.run_ko(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "container image built"
        );
        Ok(())
    }

    /// Build images and apply the referenced Kubernetes manifests.
    pub async fn apply(&self, cancel: &CancellationToken, opts: ApplyOptions) -> Result<()> {
        if opts.filenames.is_empty() {
            return Err(KoError::MissingField("at least one filename"));
        }

        info!(files = ?opts.filenames, local = opts.local, "building and applying manifests");
        let start = Instant::now();

        let mut args = vec![String::from("apply")];
        for filename in opts.filenames {
            args.push(String::from("-f"));
            args.push(filename);
        }
        if opts.recursive {
            args.push(String::from("--recursive"));
        }
        if !opts.selector.is_empty() {
            args.push(String::from("--selector"));
            args.push(opts.selector);
        }
        if !opts.base_image.is_empty() {
            args.push(String::from("--base-import-paths"));
            args.push(opts.base_image);
        }
        for platform in opts.platforms {
            args.push(String::from("--platform"));
            args.push(platform);
        }
        if opts.local {
            args.push(String::from("--local"));
        }
        if opts.bare {
            args.push(String::from("--bare"));
        }
        if opts.preserve_import_paths {
            args.push(String::from("--preserve-import-paths"));
        }

        self.run_ko(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "images built and manifests applied"
        );
        Ok(())
    }

    /// Delete the resources described by the manifests.
    pub async fn delete(&self, cancel: &CancellationToken, opts: DeleteOptions) -> Result<()> {
        if opts.filenames.is_empty() {
            return Err(KoError::MissingField("at least one filename"));
        }

        info!(files = ?opts.filenames, "deleting resources");
        let start = Instant::now();

        let mut args = vec![String::from("delete")];
        for filename in opts.filenames {
            args.push(String::from("-f"));
            args.push(filename);
        }
        if opts.recursive {
            args.push(String::from("--recursive"));
        }
        if !opts.selector.is_empty() {
            args.push(String::from("--selector"));
            args.push(opts.selector);
        }

        self.run_ko(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "resources deleted"
        );
        Ok(())
    }

    /// Resolve import paths to image references.
    pub async fn resolve(
        &self,
        cancel: &CancellationToken,
        import_paths: &[String],
        extra: &[String],
    ) -> Result<()> {
        if import_paths.is_empty() {
            return Err(KoError::MissingField("at least one import path"));
        }

        info!(paths = ?import_paths, "resolving import paths");
        let start = Instant::now();

        let mut args = vec![String::from("resolve")];
        args.extend(extra.iter().cloned());
        args.extend(import_paths.iter().cloned());

        self.run_ko(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "import paths resolved"
        );
        Ok(())
    }

    /// Publish an image for an import path.
    pub async fn publish(
        &self,
        cancel: &CancellationToken,
        import_path: &str,
        extra: &[String],
    ) -> Result<()> {
        if import_path.is_empty() {
            return Err(KoError::MissingField("import path"));
        }

        info!(import_path = %import_path, "publishing image");
        let start = Instant::now();

        let mut args = vec![String::from("publish"), import_path.to_string()];
        args.extend(extra.iter().cloned());

        self.run_ko(cancel, args).await?;
        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "image published"
        );
        Ok(())
    }

    async fn run_ko(&self, cancel: &CancellationToken, args: Vec<String>) -> Result<()> {
        self.runner
            .run(cancel, &self.config.bin, self.config.stream_to_log, args)
            .await?;
        Ok(())
    }
}
