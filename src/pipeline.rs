// Pipeline orchestration: config gate, image gate, target URL,
// authentication, then encoding and upload. Every failure is terminal for
// the run; `Pipeline::run` turns it into one printed line and an
// `Outcome` the binary maps to an exit code.

use std::path::PathBuf;

use log::{debug, info};

use crate::api::{ApiStatus, SnippetsApi};
use crate::config;
use crate::error::{PipelineResult, UploadError};
use crate::image;
use crate::slug::slug_from_path;
use crate::ui::{Reporter, UrlProvider};

/// Line printed after a successful upload.
pub const SUCCESS_MESSAGE: &str = "Successfully uploaded image.";

/// `name: version` string logged at startup.
pub fn version_string() -> String {
    format!("{}: v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Inputs of a single run.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub config_path: PathBuf,
    pub image_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Print the version and raw HTTP status codes.
    pub debug: bool,
}

/// Where a run currently is. `Failed` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ConfigChecked,
    ImageChecked,
    Authenticated,
    Uploaded,
    Done,
    Failed,
}

/// How a run ended, as seen by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The config file is missing, unreadable or still the placeholder.
    ConfigNotReady,
    OperationFailed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::OperationFailed => 1,
            Outcome::ConfigNotReady => 2,
        }
    }
}

impl From<&UploadError> for Outcome {
    fn from(err: &UploadError) -> Self {
        if err.is_config() {
            Outcome::ConfigNotReady
        } else {
            Outcome::OperationFailed
        }
    }
}

/// Single-shot upload pipeline.
pub struct Pipeline<A, R> {
    api: A,
    reporter: R,
    options: PipelineOptions,
    stage: Stage,
}

impl<A: SnippetsApi, R: Reporter> Pipeline<A, R> {
    pub fn new(api: A, reporter: R, options: PipelineOptions) -> Self {
        Pipeline {
            api,
            reporter,
            options,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run every stage once and report the result to the user.
    pub fn run(&mut self, request: &UploadRequest, urls: &mut dyn UrlProvider) -> Outcome {
        let version = version_string();
        info!("{}", version);
        if self.options.debug {
            self.reporter.line(&version);
        }

        match self.execute(request, urls) {
            Ok(()) => {
                self.advance(Stage::Done);
                info!("Uploaded {}", request.image_path.display());
                self.reporter.line(SUCCESS_MESSAGE);
                Outcome::Success
            }
            Err(err) => {
                info!("Run failed after {:?}: {:?}", self.stage, err);
                self.advance(Stage::Failed);
                self.reporter.line(&err.to_string());
                Outcome::from(&err)
            }
        }
    }

    fn execute(&mut self, request: &UploadRequest, urls: &mut dyn UrlProvider) -> PipelineResult<()> {
        let config = config::validate(&request.config_path)?;
        self.advance(Stage::ConfigChecked);

        let bytes = image::inspect(&request.image_path)?;
        self.advance(Stage::ImageChecked);

        let target_url = urls.target_url().map_err(|e| {
            info!("Could not obtain a target URL: {:#}", e);
            UploadError::NoTargetUrl
        })?;
        let target_url = target_url.trim();
        if target_url.is_empty() {
            return Err(UploadError::NoTargetUrl);
        }
        info!("Target URL: {}", target_url);

        self.reporter.stage("Authenticating...");
        let auth = self.api.authenticate(&config);
        self.report_status("Token", &auth.status);
        if !auth.authorized() {
            return Err(match auth.status {
                ApiStatus::NetworkFailure(reason) => UploadError::NetworkFailure(reason),
                ApiStatus::Http(status) => UploadError::AuthFailed { status },
            });
        }
        self.advance(Stage::Authenticated);

        let payload = image::encode(&bytes);
        let slug = slug_from_path(&request.image_path);
        debug!("Uploading as '{}'", slug);

        self.reporter.stage("Uploading...");
        let upload = self.api.submit(&config, target_url, &slug, &payload);
        self.report_status("Upload", &upload.status);
        if !upload.succeeded() {
            return Err(match upload.status {
                ApiStatus::NetworkFailure(reason) => UploadError::NetworkFailure(reason),
                ApiStatus::Http(status) => UploadError::UploadFailed { status },
            });
        }
        self.advance(Stage::Uploaded);

        Ok(())
    }

    fn advance(&mut self, next: Stage) {
        if self.stage == Stage::Failed {
            return;
        }
        debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn report_status(&mut self, what: &str, status: &ApiStatus) {
        if !self.options.debug {
            return;
        }
        let line = match status {
            ApiStatus::Http(code) => format!("{} endpoint returned HTTP {}", what, code),
            ApiStatus::NetworkFailure(reason) => format!("{} endpoint unreachable: {}", what, reason),
        };
        self.reporter.line(&line);
    }
}
