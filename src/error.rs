use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving the feed configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No input directory given")]
    MissingInputDir,

    #[error("Failed to determine absolute path for {path}: {source}")]
    AbsolutePathFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Base URL '{0}' has no host")]
    BaseUrlWithoutHost(String),

    #[error("Failed to read config file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    FileParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that can occur when listing the input directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that leave a single audio file out of the feed
#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("Failed to read file metadata of {path}: {source}")]
    MetadataFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),
}

/// Errors that can occur when reading embedded tags from a single file
///
/// These are recovered by the metadata extractor and never abort a run.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tags in {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },
}

/// Errors that can occur when rendering the feed document to XML
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Failed to write RSS XML: {0}")]
    Rss(#[from] rss::Error),
}

/// Top-level errors for feed generation
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Failed to write feed file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
