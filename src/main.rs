mod env;
mod exec;
mod gotool;
mod helm;
mod ko;

use clap::{ArgAction, Args, Parser, Subcommand};
use std::process;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info};
use tracing_subscriber::fmt;

/// Build and deploy task runner wrapping the go toolchain, helm, and ko
#[derive(Debug, Parser)]
#[command(name = "shipkit")]
#[command(about = "Build and deploy task runner wrapping go, helm, and ko")]
struct Cli {
    /// Route child output through the log stream instead of the terminal
    #[arg(long, global = true)]
    log_stream: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Go toolchain targets
    #[command(subcommand)]
    Go(GoCommand),
    /// Helm chart targets
    #[command(subcommand)]
    Helm(HelmCommand),
    /// Ko container image targets
    #[command(subcommand)]
    Ko(KoCommand),
}

#[derive(Debug, Subcommand)]
enum GoCommand {
    /// Run go test ./...
    Test {
        /// Also collect a coverage profile
        #[arg(long)]
        coverage: bool,
        /// Extra arguments appended to the invocation
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Run golangci-lint
    Lint {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Run go vet ./...
    Vet {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Install packages with go install
    Install {
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Run go mod tidy and go mod verify
    ModMaintenance,
    /// Cross-compile a binary
    Build(GoBuildArgs),
    /// Format sources with gofmt
    Fmt {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Format imports with goimports
    Imports {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct GoBuildArgs {
    /// Binary name
    #[arg(long)]
    binary: String,

    /// Version stamped into main.version
    #[arg(long, default_value = "dev")]
    version: String,

    /// Target operating system
    #[arg(long, default_value = "linux")]
    os: String,

    /// Target architecture
    #[arg(long, default_value = "amd64")]
    arch: String,

    /// Keep symbols and debug info
    #[arg(long)]
    debug: bool,

    /// Output root directory
    #[arg(long, default_value = "dist/binaries")]
    dest_dir: String,

    /// Packages to build
    packages: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum HelmCommand {
    /// Install a chart
    Install(HelmInstallArgs),
    /// Upgrade a release
    Upgrade(HelmUpgradeArgs),
    /// Uninstall a release
    Uninstall {
        release: String,
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// List releases
    List {
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Show release status
    Status {
        release: String,
        #[arg(long, default_value = "")]
        namespace: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Render chart templates locally
    Template {
        release: String,
        chart: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Lint a chart
    Lint {
        chart: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Package a chart directory into an archive
    Package {
        chart: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Add a chart repository
    RepoAdd {
        name: String,
        url: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Update chart repositories
    RepoUpdate {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct HelmInstallArgs {
    release: String,
    chart: String,

    #[arg(long, default_value = "")]
    namespace: String,

    /// Values files, repeatable
    #[arg(short = 'f', long = "values")]
    values: Vec<String>,

    /// Inline overrides, repeatable
    #[arg(long = "set")]
    set: Vec<String>,

    #[arg(long)]
    create_namespace: bool,

    #[arg(long)]
    wait: bool,

    #[arg(long, default_value = "")]
    timeout: String,
}

#[derive(Debug, Args)]
struct HelmUpgradeArgs {
    release: String,
    chart: String,

    #[arg(long, default_value = "")]
    namespace: String,

    /// Values files, repeatable
    #[arg(short = 'f', long = "values")]
    values: Vec<String>,

    /// Inline overrides, repeatable
    #[arg(long = "set")]
    set: Vec<String>,

    /// Install the release when it does not exist yet
    #[arg(long)]
    install: bool,

    #[arg(long)]
    wait: bool,

    #[arg(long, default_value = "")]
    timeout: String,
}

#[derive(Debug, Subcommand)]
enum KoCommand {
    /// Build a container image
    Build(KoBuildArgs),
    /// Build images and apply manifests
    Apply(KoApplyArgs),
    /// Delete resources created from manifests
    Delete {
        #[arg(short = 'f', long = "filename", required = true)]
        filenames: Vec<String>,
        #[arg(long)]
        recursive: bool,
        #[arg(long, default_value = "")]
        selector: String,
    },
    /// Resolve import paths to image references
    Resolve {
        #[arg(required = true)]
        import_paths: Vec<String>,
    },
    /// Publish an image for an import path
    Publish {
        import_path: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct KoBuildArgs {
    import_path: String,

    /// Image tags, repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Target platforms, repeatable
    #[arg(long = "platform")]
    platforms: Vec<String>,

    #[arg(long, default_value = "")]
    base_image: String,

    #[arg(long)]
    bare: bool,

    #[arg(long)]
    local: bool,

    #[arg(long)]
    push: bool,

    #[arg(long)]
    preserve_import_paths: bool,
}

#[derive(Debug, Args)]
struct KoApplyArgs {
    #[arg(short = 'f', long = "filename", required = true)]
    filenames: Vec<String>,

    #[arg(long)]
    recursive: bool,

    #[arg(long, default_value = "")]
    selector: String,

    #[arg(long, default_value = "")]
    base_image: String,

    /// Target platforms, repeatable
    #[arg(long = "platform")]
    platforms: Vec<String>,

    #[arg(long)]
    local: bool,

    #[arg(long)]
    bare: bool,

    #[arg(long)]
    preserve_import_paths: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    fmt().with_max_level(level).with_target(false).init();

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            signal_cancel.cancel();
        }
    });

    if let Err(error) = dispatch(cli.command, cli.log_stream, &cancel).await {
        error!(%error, "command failed");
        process::exit(1);
    }
}

async fn dispatch(
    command: Command,
    log_stream: bool,
    cancel: &CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Go(command) => {
            let mut config = gotool::GoConfig::from_env();
            config.stream_to_log = config.stream_to_log || log_stream;
            let go = gotool::GoRunner::new(config);

            match command {
                GoCommand::Test { coverage, extra } => {
                    if coverage {
                        go.run_tests_with_coverage(cancel, &extra).await?;
                    } else {
                        go.run_tests(cancel, &extra).await?;
                    }
                }
                GoCommand::Lint { extra } => go.run_lint(cancel, &extra).await?,
                GoCommand::Vet { extra } => go.run_vet(cancel, &extra).await?,
                GoCommand::Install { packages } => go.run_install(cancel, &packages, &[]).await?,
                GoCommand::ModMaintenance => go.run_mod_maintenance(cancel).await?,
                GoCommand::Build(args) => {
                    go.run_build(
                        cancel,
                        gotool::BuildOptions {
                            binary: args.binary,
                            version: args.version,
                            os: args.os,
                            arch: args.arch,
                            debug: args.debug,
                            packages: args.packages,
                            destination_dir: args.dest_dir,
                        },
                    )
                    .await?;
                }
                GoCommand::Fmt { extra } => go.run_format(cancel, &extra).await?,
                GoCommand::Imports { extra } => go.run_format_imports(cancel, &extra).await?,
            }
            Ok(())
        }
        Command::Helm(command) => {
            let mut config = helm::HelmConfig::from_env();
            config.stream_to_log = config.stream_to_log || log_stream;
            let helm = helm::HelmRunner::new(config);

            match command {
                HelmCommand::Install(args) => {
                    helm.install(
                        cancel,
                        helm::InstallOptions {
                            release_name: args.release,
                            chart: args.chart,
                            namespace: args.namespace,
                            values: args.values,
                            set: args.set,
                            create_namespace: args.create_namespace,
                            wait: args.wait,
                            timeout: args.timeout,
                        },
                    )
                    .await?;
                }
                HelmCommand::Upgrade(args) => {
                    helm.upgrade(
                        cancel,
                        helm::UpgradeOptions {
                            release_name: args.release,
                            chart: args.chart,
                            namespace: args.namespace,
                            values: args.values,
                            set: args.set,
                            install: args.install,
                            wait: args.wait,
                            timeout: args.timeout,
                        },
                    )
                    .await?;
                }
                HelmCommand::Uninstall {
                    release,
                    namespace,
                    extra,
                } => helm.uninstall(cancel, &release, &namespace, &extra).await?,
                HelmCommand::List { namespace, extra } => {
                    helm.list(cancel, &namespace, &extra).await?
                }
                HelmCommand::Status {
                    release,
                    namespace,
                    extra,
                } => helm.status(cancel, &release, &namespace, &extra).await?,
                HelmCommand::Template {
                    release,
                    chart,
                    extra,
                } => helm.template(cancel, &release, &chart, &extra).await?,
                HelmCommand::Lint { chart, extra } => helm.lint(cancel, &chart, &extra).await?,
                HelmCommand::Package { chart, extra } => {
                    helm.package(cancel, &chart, &extra).await?
                }
                HelmCommand::RepoAdd { name, url, extra } => {
                    helm.repo_add(cancel, &name, &url, &extra).await?
                }
                HelmCommand::RepoUpdate { extra } => helm.repo_update(cancel, &extra).await?,
            }
            Ok(())
        }
        Command::Ko(command) => {
            let mut config = ko::KoConfig::from_env();
            config.stream_to_log = config.stream_to_log || log_stream;
            let ko = ko::KoRunner::new(config);

            match command {
                KoCommand::Build(args) => {
                    ko.build(
                        cancel,
                        ko::BuildOptions {
                            import_path: args.import_path,
                            tags: args.tags,
                            platforms: args.platforms,
                            base_image: args.base_image,
                            bare: args.bare,
                            local: args.local,
                            push: args.push,
                            preserve_import_paths: args.preserve_import_paths,
                        },
                    )
                    .await?;
                }
                KoCommand::Apply(args) => {
                    ko.apply(
                        cancel,
                        ko::ApplyOptions {
                            filenames: args.filenames,
                            recursive: args.recursive,
                            selector: args.selector,
                            base_image: args.base_image,
                            platforms: args.platforms,
                            local: args.local,
                            bare: args.bare,
                            preserve_import_paths: args.preserve_import_paths,
                        },
                    )
                    .await?;
                }
                KoCommand::Delete {
                    filenames,
                    recursive,
                    selector,
                } => {
                    ko.delete(
                        cancel,
                        ko::DeleteOptions {
                            filenames,
                            recursive,
                            selector,
                        },
                    )
                    .await?;
                }
                KoCommand::Resolve { import_paths } => {
                    ko.resolve(cancel, &import_paths, &[]).await?
                }
                KoCommand::Publish { import_path, extra } => {
                    ko.publish(cancel, &import_path, &extra).await?
                }
            }
            Ok(())
        }
    }
}
