// Go toolchain wrapper
#![allow(dead_code)]

use std::path::Path;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::exec::{CommandSpec, Runner};
use crate::gotool::config::GoConfig;
use crate::gotool::error::{GoError, Result};
use crate::gotool::types::BuildOptions;

/// Wrapper around the Go toolchain binaries.
pub struct GoRunner {
    config: GoConfig,
    runner: Runner,
}

impl GoRunner {
    pub fn new(config: GoConfig) -> Self {
        Self {
            config,
            runner: Runner::new(),
        }
    }

    /// Use an injected runner instead of the system one.
    pub fn with_runner(config: GoConfig, runner: Runner) -> Self {
        Self { config, runner }
    }

    /// Run the test suite via `go test ./...`.
    pub async fn run_tests(&self, cancel: &CancellationToken, extra: &[String]) -> Result<()> {
        info!("running go tests");
        let start = Instant::now();

        let mut args = vec![String::from("test"), String::from("./...")];
        args.extend(extra.iter().cloned());
        self.run_go(cancel, args).await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "tests passed"
        );
        Ok(())
    }

    /// Run the test suite with a coverage profile.
    pub async fn run_tests_with_coverage(
        &self,
        cancel: &CancellationToken,
        extra: &[String],
    ) -> Result<()> {
        info!("running go tests with coverage");
        let start = Instant::now();

        let mut args = vec![
            String::from("test"),
            String::from("-cover"),
            String::from("-coverprofile=coverage.out"),
            String::from("./..."),
        ];
        args.extend(extra.iter().cloned());
        self.run_go(cancel, args).await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "tests with coverage passed"
        );
        Ok(())
    }

    /// Run golangci-lint over the repository.
    pub async fn run_lint(&self, cancel: &CancellationToken, extra: &[String]) -> Result<()> {
        info!("running go linter");
        let start = Instant::now();

        let mut args = vec![String::from("run"), String::from("--timeout=5m")];
        args.extend(extra.iter().cloned());
        self.runner
            .run(cancel, &self.config.lint_bin, self.config.stream_to_log, args)
            .await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "lint passed"
        );
        Ok(())
    }

    /// Run `go vet ./...`.
    pub async fn run_vet(&self, cancel: &CancellationToken, extra: &[String]) -> Result<()> {
        info!("running go vet");
        let start = Instant::now();

        let mut args = vec![String::from("vet"), String::from("./...")];
        args.extend(extra.iter().cloned());
        self.run_go(cancel, args).await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "go vet passed"
        );
        Ok(())
    }

    /// Install each package with `go install`, stopping at the first failure.
    pub async fn run_install(
        &self,
        cancel: &CancellationToken,
        packages: &[String],
        extra: &[String],
    ) -> Result<()> {
        if packages.is_empty() {
            return Err(GoError::NoPackages);
        }

        info!(packages = ?packages, "installing go packages");
        let start = Instant::now();

        for package in packages {
            let mut args = vec![String::from("install"), package.clone()];
            args.extend(extra.iter().cloned());
            self.run_go(cancel, args)
                .await
                .map_err(|source| GoError::Install {
                    package: package.clone(),
                    source,
                })?;
        }

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "installation complete"
        );
        Ok(())
    }

    /// Run `go mod tidy` then `go mod verify`, stopping at the first failure.
    pub async fn run_mod_maintenance(&self, cancel: &CancellationToken) -> Result<()> {
        info!("running go module maintenance");
        let start = Instant::now();

        let commands: [&[&str]; 2] = [&["mod", "tidy"], &["mod", "verify"]];
        for command in commands {
            let rendered = format!("go {}", command.join(" "));
            info!(command = %rendered, "executing");

            let args: Vec<String> = command.iter().map(|arg| arg.to_string()).collect();
            self.run_go(cancel, args)
                .await
                .map_err(|source| GoError::ModTask {
                    command: rendered,
                    source,
                })?;
        }

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "module maintenance completed"
        );
        Ok(())
    }

    /// Cross-compile a binary into `<dest>/<os>_<arch>/<binary>`.
    pub async fn run_build(&self, cancel: &CancellationToken, opts: BuildOptions) -> Result<()> {
        if opts.binary.is_empty() {
            return Err(GoError::MissingField("binary name"));
        }
        let packages = if opts.packages.is_empty() {
            vec![String::from(".")]
        } else {
            opts.packages
        };
        let destination_dir = if opts.destination_dir.is_empty() {
            String::from("dist/binaries")
        } else {
            opts.destination_dir
        };

        info!(
            binary = %opts.binary,
            os = %opts.os,
            arch = %opts.arch,
            debug = opts.debug,
            "building go binary"
        );
        let start = Instant::now();

        let mut ldflags = format!("-X main.version={}", opts.version);
        if !opts.debug {
            ldflags.push_str(" -s -w");
        }

        let out_dir = Path::new(&destination_dir).join(format!("{}_{}", opts.os, opts.arch));
        tokio::fs::create_dir_all(&out_dir).await?;
        let out_path = out_dir.join(&opts.binary);

        let mut args = vec![
            String::from("build"),
            String::from("-ldflags"),
            ldflags,
            String::from("-o"),
            out_path.display().to_string(),
        ];
        args.extend(packages);

        let spec = CommandSpec::new(self.config.go_bin.clone(), args)
            .env("GOOS", opts.os)
            .env("GOARCH", opts.arch)
            .env("CGO_ENABLED", "0");
        self.runner
            .run_spec(cancel, spec, self.config.stream_to_log)
            .await?;

        info!(
            output = %out_path.display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "build completed"
        );
        Ok(())
    }

    /// Format sources with gofmt.
    pub async fn run_format(&self, cancel: &CancellationToken, extra: &[String]) -> Result<()> {
        info!("formatting go files");
        let start = Instant::now();

        let mut args = vec![String::from("-w"), String::from(".")];
        args.extend(extra.iter().cloned());
        self.runner
            .run(cancel, &self.config.fmt_bin, self.config.stream_to_log, args)
            .await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "formatting complete"
        );
        Ok(())
    }

    /// Format imports with goimports.
    pub async fn run_format_imports(
        &self,
        cancel: &CancellationToken,
        extra: &[String],
    ) -> Result<()> {
        info!("formatting go imports");
        let start = Instant::now();

        let mut args = vec![String::from("-w"), String::from(".")];
        args.extend(extra.iter().cloned());
        self.runner
            .run(
                cancel,
                &self.config.imports_bin,
                self.config.stream_to_log,
                args,
            )
            .await?;

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "import formatting complete"
        );
        Ok(())
    }

    async fn run_go(
        &self,
        cancel: &CancellationToken,
        args: Vec<String>,
    ) -> crate::exec::Result<()> {
        self.runner
            .run(cancel, &self.config.go_bin, self.config.stream_to_log, args)
            .await
    }
}
