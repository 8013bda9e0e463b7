// Error taxonomy for the upload pipeline. Every variant is terminal for a
// run: the orchestrator prints the `Display` text as the single failure
// line and turns the variant into an exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used by the pipeline stages.
pub type PipelineResult<T> = Result<T, UploadError>;

/// Everything that can stop an upload run.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No config file existed; a placeholder one has just been written.
    #[error("You need to add the details for Your Snippets API to the config file: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// The config file still holds the shipped placeholder values.
    #[error("You need to add the details for Your Snippets API to the config file: {}", path.display())]
    ConfigNotConfigured { path: PathBuf },

    /// The config file could not be read, parsed or written.
    #[error("Unable to successfully read config file: {} ({reason})", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    /// The input file is missing or is not a recognized image format.
    #[error("There doesn't appear to be a valid image file at: {}", path.display())]
    NotAnImage { path: PathBuf },

    /// The caller supplied an empty target URL.
    #[error("No URL was given for the snippet this image belongs to")]
    NoTargetUrl,

    /// The token endpoint answered with something other than 200.
    #[error("Failed to successfully authenticate against your API")]
    AuthFailed { status: u16 },

    /// The images endpoint answered with something other than 201.
    #[error("Failed to upload image!")]
    UploadFailed { status: u16 },

    /// Either HTTP call never produced a response (DNS, refused, timeout).
    #[error("Unable to reach your API: {0}")]
    NetworkFailure(String),
}

impl UploadError {
    /// True for the failures that mean "edit your config file first".
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            UploadError::ConfigMissing { .. }
                | UploadError::ConfigNotConfigured { .. }
                | UploadError::ConfigUnreadable { .. }
        )
    }
}
