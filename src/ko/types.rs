// Data types for the ko wrapper

/// Options for `ko build`.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Go import path to build.
    pub import_path: String,
    /// Image tags, passed as repeated `--tags` flags.
    pub tags: Vec<String>,
    /// Target platforms, e.g. linux/amd64.
    pub platforms: Vec<String>,
    /// Base image override.
    pub base_image: String,
    /// Use a bare image reference without the import-path suffix.
    pub bare: bool,
    /// Build into the local container daemon without pushing.
    pub local: bool,
    /// Push to the registry.
    pub push: bool,
    /// Keep the full import path in the image name.
    pub preserve_import_paths: bool,
}

/// Options for `ko apply`.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Kubernetes manifest files.
    pub filenames: Vec<String>,
    /// Process manifest directories recursively.
    pub recursive: bool,
    /// Label selector.
    pub selector: String,
    /// Base image override.
    pub base_image: String,
    pub platforms: Vec<String>,
    pub local: bool,
    pub bare: bool,
    pub preserve_import_paths: bool,
}

/// Options for `ko delete`.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Kubernetes manifest files.
    pub filenames: Vec<String>,
    pub recursive: bool,
    pub selector: String,
}
