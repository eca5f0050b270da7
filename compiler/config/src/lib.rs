#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Protobridge Configuration
//!
//! This crate loads `protobridge.toml` from the project root and turns it
//! into an immutable [`Options`] record that every pipeline stage reads.
//! The file specifies:
//! - where schema sources live and where each runtime's bindings go
//! - the import prefixes used to relocate generated Python code
//! - test-runner flags and the coverage threshold
//! - report, documentation and tool locations
//!
//! Required keys must be present; there is no default-filling for them.
//! Only the optional keys listed on each field carry defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Name of the configuration file that marks the project root.
pub const CONFIG_FILE_NAME: &str = "protobridge.toml";

/// Test package selector meaning "every package in the module".
pub const ALL_PACKAGES: &str = "./...";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// No configuration file in the current directory or its ancestors
    #[error(transparent)]
    ProjectRoot(#[from] path::DiscoveryError),
    /// A required key is absent
    #[error("Missing required config key `{key}` in [{section}]")]
    MissingKey {
        /// Table holding the key
        section: &'static str,
        /// Key name
        key: &'static str,
    },
    /// A key is present but its value is unusable
    #[error("Invalid value for `{key}` in [{section}]: {reason}")]
    Invalid {
        /// Table holding the key
        section: &'static str,
        /// Key name
        key: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Fully validated configuration for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Directory holding the configuration file. External commands run here
    /// and relative paths below are relative to it.
    pub root: PathBuf,
    /// Project metadata
    pub metadata: Metadata,
    /// Schema source settings
    pub proto: ProtoOptions,
    /// Go binding generation
    pub go: GoOptions,
    /// Python binding generation and import relocation
    pub python: PythonOptions,
    /// Test and coverage gate settings
    pub testing: TestingOptions,
    /// Persisted report locations
    pub reports: ReportPaths,
    /// Documentation settings
    pub docs: DocsOptions,
    /// External tool names
    pub tools: ToolOptions,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// `[metadata]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    /// Project name; optional, read by the `name` command.
    pub name: Option<String>,
}

/// `[proto]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoOptions {
    /// Root of the schema source tree. Required.
    pub source_root: PathBuf,
}

/// `[generate.go]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoOptions {
    /// Directory passed to `--go_out`. Required.
    pub output_root: PathBuf,
    /// Go module path passed to `--go_opt=module=`. Required.
    pub module: String,
    /// Discovery skips sources whose path contains this marker.
    pub exclude: Option<String>,
    /// When set, struct tags are injected into every `*.pb.go` below it.
    pub inject_tags_root: Option<PathBuf>,
}

/// `[generate.python]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonOptions {
    /// Directory passed to the Python output flags. Required.
    pub output_root: PathBuf,
    /// Import prefix the generator emits. Required.
    pub old_prefix: String,
    /// Import prefix the output must use. Required.
    pub new_prefix: String,
    /// Tree whose files are rewritten. Defaults to `output_root/source_root`,
    /// which is where the generator places the files.
    pub rewrite_root: PathBuf,
    /// Discovery skips sources whose path contains this marker.
    pub exclude: Option<String>,
}

/// Coverage threshold as a fraction of statements, `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CoverageThreshold(f64);

impl CoverageThreshold {
    /// Validate a fraction.
    pub fn new(fraction: f64) -> Result<Self, String> {
        if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(format!("{} is not a fraction between 0 and 1", fraction))
        }
    }

    /// The threshold as a fraction.
    pub fn fraction(&self) -> f64 { self.0 }
}

/// `[testing]`
#[derive(Debug, Clone, PartialEq)]
pub struct TestingOptions {
    /// Required by the test gate; see [`TestingOptions::threshold`].
    pub coverage_required: Option<CoverageThreshold>,
    /// Package selector handed to the package lister. Default `./...`.
    pub test_package: String,
    /// Packages containing any of these substrings are left out of coverage. Default empty.
    pub exclude: Vec<String>,
    /// Pass the race detector flag. Default on.
    pub race_detection: bool,
    /// Let the test runner use several processes. Default on.
    pub multi_process: bool,
    /// Per-run timeout handed to the test runner. Default 60 seconds.
    pub timeout: Duration,
    /// Render the HTML coverage report after a passing gate. Default off.
    pub html_report: bool,
}

impl TestingOptions {
    /// The coverage threshold, which has no default.
    pub fn threshold(&self) -> Result<CoverageThreshold, ConfigError> {
        self.coverage_required
            .ok_or(ConfigError::MissingKey { section: "testing", key: "coverage_required" })
    }
}

/// Report artifacts, all inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// `[reports] dir`, default `zdevelop/tests/_reports`.
    pub dir: PathBuf,
}

impl ReportPaths {
    /// Default reports directory.
    pub const DEFAULT_DIR: &'static str = "zdevelop/tests/_reports";

    /// Captured test stdout (coverage report stdout is appended).
    pub fn stdout_log(&self) -> PathBuf { self.dir.join("test_stdout.txt") }

    /// Captured test stderr (coverage report stderr is appended).
    pub fn stderr_log(&self) -> PathBuf { self.dir.join("test_stderr.txt") }

    /// Test stdout followed by stderr.
    pub fn full_log(&self) -> PathBuf { self.dir.join("test_full.txt") }

    /// Raw coverage profile written by the test runner.
    pub fn coverage_data(&self) -> PathBuf { self.dir.join("coverage.out") }

    /// HTML test results.
    pub fn test_results_html(&self) -> PathBuf { self.dir.join("test_results.html") }

    /// HTML coverage report.
    pub fn coverage_html(&self) -> PathBuf { self.dir.join("coverage.html") }
}

/// `[docs]` and `[docs.proto]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsOptions {
    /// Built documentation entry page. Default `zdocs/build/html/index.html`.
    pub html_index: PathBuf,
    /// Schema files to document. Default empty.
    pub proto_paths: Vec<String>,
    /// Directory passed to `--doc_out`. Default `./zdocs/source/_static`.
    pub out_dir: String,
}

/// `[tools]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOptions {
    /// Schema compiler. Default `protoc`.
    pub protoc: String,
    /// Python interpreter hosting `grpc_tools`. Default `python3`.
    pub python: String,
    /// Go toolchain. Default `go`.
    pub go: String,
    /// Struct tag injector. Default `protoc-go-inject-tag`.
    pub inject_tag: String,
    /// Program used to open HTML files; chosen per platform when absent.
    pub viewer: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). Default `info`.
    pub level: String,
}

/// A list given either as a TOML array or as a newline-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringList {
    Items(Vec<String>),
    Lines(String),
}

impl StringList {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            StringList::Items(items) => items,
            StringList::Lines(text) => text.lines().map(str::to_string).collect(),
        };
        items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    metadata: RawMetadata,
    proto: RawProto,
    generate: RawGenerate,
    testing: RawTesting,
    reports: RawReports,
    docs: RawDocs,
    tools: RawTools,
    logging: RawLogging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMetadata {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProto {
    source_root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGenerate {
    go: RawGo,
    python: RawPython,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGo {
    output_root: Option<PathBuf>,
    module: Option<String>,
    exclude: Option<String>,
    inject_tags_root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPython {
    output_root: Option<PathBuf>,
    old_prefix: Option<String>,
    new_prefix: Option<String>,
    rewrite_root: Option<PathBuf>,
    exclude: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTesting {
    coverage_required: Option<f64>,
    test_package: Option<String>,
    exclude: Option<StringList>,
    race_detection: Option<bool>,
    multi_process: Option<bool>,
    timeout: Option<u64>,
    html_report: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReports {
    dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocs {
    html_index: Option<PathBuf>,
    proto: RawProtoDocs,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProtoDocs {
    paths: Option<StringList>,
    out_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTools {
    protoc: Option<String>,
    python: Option<String>,
    go: Option<String>,
    inject_tag: Option<String>,
    viewer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: Option<String>,
}

fn required<T>(value: Option<T>, section: &'static str, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingKey { section, key })
}

fn required_text(
    value: Option<String>,
    section: &'static str,
    key: &'static str,
) -> Result<String, ConfigError> {
    let value = required(value, section, key)?;
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid { section, key, reason: "must not be empty".to_string() });
    }
    Ok(value)
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|v| !v.trim().is_empty()) }

impl Options {
    /// Locate `protobridge.toml` from the current directory upwards and load it.
    pub fn discover() -> Result<Self, ConfigError> { Self::from_file(Self::default_path()?) }

    /// Returns the config path of the enclosing project:
    /// `{project_root}/protobridge.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(path::find_project_root(CONFIG_FILE_NAME)?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file at `path`. The file's directory
    /// becomes the project root.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let root = fs::canonicalize(parent)?;
        Self::parse(&contents, root)
    }

    /// Parse and validate TOML text, treating `root` as the project root.
    pub fn parse(contents: &str, root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents)?;
        Self::validate(raw, root.into())
    }

    fn validate(raw: RawConfig, root: PathBuf) -> Result<Self, ConfigError> {
        let source_root = required(raw.proto.source_root, "proto", "source_root")?;

        let go = GoOptions {
            output_root: required(raw.generate.go.output_root, "generate.go", "output_root")?,
            module: required_text(raw.generate.go.module, "generate.go", "module")?,
            exclude: non_empty(raw.generate.go.exclude),
            inject_tags_root: raw.generate.go.inject_tags_root,
        };

        let python_output =
            required(raw.generate.python.output_root, "generate.python", "output_root")?;
        let python = PythonOptions {
            old_prefix: required_text(raw.generate.python.old_prefix, "generate.python", "old_prefix")?,
            new_prefix: required_text(raw.generate.python.new_prefix, "generate.python", "new_prefix")?,
            rewrite_root: raw
                .generate
                .python
                .rewrite_root
                .unwrap_or_else(|| python_output.join(&source_root)),
            exclude: non_empty(raw.generate.python.exclude),
            output_root: python_output,
        };

        let coverage_required = raw
            .testing
            .coverage_required
            .map(|fraction| {
                CoverageThreshold::new(fraction).map_err(|reason| ConfigError::Invalid {
                    section: "testing",
                    key: "coverage_required",
                    reason,
                })
            })
            .transpose()?;

        let testing = TestingOptions {
            coverage_required,
            test_package: non_empty(raw.testing.test_package)
                .unwrap_or_else(|| ALL_PACKAGES.to_string()),
            exclude: raw.testing.exclude.map(StringList::into_vec).unwrap_or_default(),
            race_detection: raw.testing.race_detection.unwrap_or(true),
            multi_process: raw.testing.multi_process.unwrap_or(true),
            timeout: Duration::from_secs(raw.testing.timeout.unwrap_or(60)),
            html_report: raw.testing.html_report.unwrap_or(false),
        };

        Ok(Self {
            root,
            metadata: Metadata { name: non_empty(raw.metadata.name) },
            proto: ProtoOptions { source_root },
            go,
            python,
            testing,
            reports: ReportPaths {
                dir: raw.reports.dir.unwrap_or_else(|| PathBuf::from(ReportPaths::DEFAULT_DIR)),
            },
            docs: DocsOptions {
                html_index: raw
                    .docs
                    .html_index
                    .unwrap_or_else(|| PathBuf::from("zdocs/build/html/index.html")),
                proto_paths: raw.docs.proto.paths.map(StringList::into_vec).unwrap_or_default(),
                out_dir: raw
                    .docs
                    .proto
                    .out_dir
                    .unwrap_or_else(|| "./zdocs/source/_static".to_string()),
            },
            tools: ToolOptions {
                protoc: raw.tools.protoc.unwrap_or_else(|| "protoc".to_string()),
                python: raw.tools.python.unwrap_or_else(|| "python3".to_string()),
                go: raw.tools.go.unwrap_or_else(|| "go".to_string()),
                inject_tag: raw
                    .tools
                    .inject_tag
                    .unwrap_or_else(|| "protoc-go-inject-tag".to_string()),
                viewer: non_empty(raw.tools.viewer),
            },
            logging: LoggingConfig {
                level: raw.logging.level.unwrap_or_else(|| "info".to_string()),
            },
        })
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, configured: &Path) -> PathBuf { path::resolve_in_root(&self.root, configured) }
}
