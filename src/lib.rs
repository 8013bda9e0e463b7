// Library root
// -----------
// This crate exposes the upload pipeline as a library; the binary
// (`main.rs`) only parses arguments, sets up logging and wires the
// terminal collaborators in.
//
// Module responsibilities:
// - `config`: validates (and on first run bootstraps) the config file.
// - `image`: magic-byte image check and base64 encoding.
// - `slug`: file name to `file_name:` slug.
// - `api`: blocking HTTP client for the token and image endpoints.
// - `ui`: URL prompt and user-facing output sinks.
// - `pipeline`: runs the stages in order and maps the result to an
//   exit code.
// - `cli`: command line arguments.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod slug;
pub mod ui;

pub use error::UploadError;
pub use pipeline::{Outcome, Pipeline, PipelineOptions, UploadRequest};
