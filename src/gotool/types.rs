// Data types for the Go toolchain wrapper

/// Options for cross-compiling a Go binary.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub binary: String,
    /// Version string stamped into `main.version`.
    pub version: String,
    pub os: String,
    pub arch: String,
    /// Keep symbols and debug info in the binary.
    pub debug: bool,
    /// Packages to build; defaults to the current package.
    pub packages: Vec<String>,
    /// Output root; defaults to dist/binaries.
    pub destination_dir: String,
}
