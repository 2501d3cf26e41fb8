// Integration tests for the ko module
// This file should be run with cargo test --test test_ko

#[path = "../src/env.rs"]
mod env;

#[path = "../src/exec/mod.rs"]
mod exec;

#[path = "../src/ko/mod.rs"]
mod ko;

mod common;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use crate::common::RecordingSpawner;
    use crate::exec::Runner;
    use crate::ko::{ApplyOptions, BuildOptions, DeleteOptions, KoConfig, KoError, KoRunner};

    fn runner_with(spawner: &Arc<RecordingSpawner>) -> KoRunner {
        KoRunner::with_runner(KoConfig::default(), Runner::with_spawner(spawner.clone()))
    }

    #[tokio::test]
    async fn build_assembles_all_flags_in_order() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        ko.build(
            &cancel,
            BuildOptions {
                import_path: String::from("./cmd/app"),
                tags: vec![String::from("latest"), String::from("v1.0.0")],
                platforms: vec![String::from("linux/amd64"), String::from("linux/arm64")],
                base_image: String::from("gcr.io/distroless/static"),
                bare: true,
                local: true,
                push: true,
                preserve_import_paths: true,
            },
        )
        .await
        .unwrap();

        let recorded = spawner.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].program, "ko");
        assert_eq!(
            recorded[0].args,
            vec![
                "build",
                "./cmd/app",
                "--tags",
                "latest",
                "--tags",
                "v1.0.0",
                "--platform",
                "linux/amd64",
                "--platform",
                "linux/arm64",
                "--base-import-paths",
                "gcr.io/distroless/static",
                "--bare",
                "--local",
                "--push",
                "--preserve-import-paths",
            ]
        );
    }

    #[tokio::test]
    async fn minimal_build_passes_only_the_import_path() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        ko.build(
            &cancel,
            BuildOptions {
                import_path: String::from("./cmd/app"),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(spawner.recorded()[0].args, vec!["build", "./cmd/app"]);
    }

    #[tokio::test]
    async fn build_without_import_path_is_a_validation_error() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        let result = ko.build(&cancel, BuildOptions::default()).await;
        assert!(matches!(result, Err(KoError::MissingField(_))));
        assert!(spawner.recorded().is_empty(), "validation must not spawn");
    }

    #[tokio::test]
    async fn apply_assembles_manifests_and_flags() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        ko.apply(
            &cancel,
            ApplyOptions {
                filenames: vec![String::from("k8s/deploy.yaml"), String::from("k8s/svc.yaml")],
                recursive: true,
                selector: String::from("app=web"),
                platforms: vec![String::from("linux/amd64")],
                local: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            spawner.recorded()[0].args,
            vec![
                "apply",
                "-f",
                "k8s/deploy.yaml",
                "-f",
                "k8s/svc.yaml",
                "--recursive",
                "--selector",
                "app=web",
                "--platform",
                "linux/amd64",
                "--local",
            ]
        );
    }

    #[tokio::test]
    async fn apply_without_filenames_is_a_validation_error() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        let result = ko.apply(&cancel, ApplyOptions::default()).await;
        assert!(matches!(result, Err(KoError::MissingField(_))));
        assert!(spawner.recorded().is_empty(), "validation must not spawn");
    }

    #[tokio::test]
    async fn delete_forwards_manifests_and_selector() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        ko.delete(
            &cancel,
            DeleteOptions {
                filenames: vec![String::from("k8s/deploy.yaml")],
                recursive: false,
                selector: String::from("app=web"),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            spawner.recorded()[0].args,
            vec!["delete", "-f", "k8s/deploy.yaml", "--selector", "app=web"]
        );
    }

    #[tokio::test]
    async fn resolve_puts_extra_args_before_import_paths() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        ko.resolve(
            &cancel,
            &[String::from("./cmd/app")],
            &[String::from("-f"), String::from("k8s/deploy.yaml")],
        )
        .await
        .unwrap();

        assert_eq!(
            spawner.recorded()[0].args,
            vec!["resolve", "-f", "k8s/deploy.yaml", "./cmd/app"]
        );
    }

    #[tokio::test]
    async fn resolve_without_paths_is_a_validation_error() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        let result = ko.resolve(&cancel, &[], &[]).await;
        assert!(matches!(result, Err(KoError::MissingField(_))));
        assert!(spawner.recorded().is_empty(), "validation must not spawn");
    }

    #[tokio::test]
    async fn publish_names_the_import_path() {
        let cancel = CancellationToken::new();
        let spawner = RecordingSpawner::succeeding();
        let ko = runner_with(&spawner);

        ko.publish(&cancel, "./cmd/app", &[String::from("--tarball"), String::from("out.tar")])
            .await
            .unwrap();

        assert_eq!(
            spawner.recorded()[0].args,
            vec!["publish", "./cmd/app", "--tarball", "out.tar"]
        );
    }
}
