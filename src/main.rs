// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging, build the API
//   client and hand everything to the pipeline.
// - The pipeline prints its own messages; `main` only turns the outcome
//   into the process exit code.

use std::fs::OpenOptions;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use snippet_upload::api::ApiClient;
use snippet_upload::cli::Args;
use snippet_upload::ui::{ConsoleReporter, FixedUrl, PromptUrl, UrlProvider};
use snippet_upload::{Pipeline, PipelineOptions, UploadRequest};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args)?;

    let api = ApiClient::new(&args.client_options())?;
    let request = UploadRequest {
        config_path: args.resolve_config_path(),
        image_path: args.imagefile.clone(),
    };

    // Only prompt when no URL was passed on the command line.
    let mut urls: Box<dyn UrlProvider> = match &args.url {
        Some(url) => Box::new(FixedUrl(url.clone())),
        None => Box::new(PromptUrl),
    };

    let mut pipeline = Pipeline::new(
        api,
        ConsoleReporter::new(),
        PipelineOptions { debug: args.debug },
    );
    let outcome = pipeline.run(&request, urls.as_mut());

    Ok(ExitCode::from(outcome.exit_code()))
}

/// `env_logger` to stderr or to `--logfile`; `RUST_LOG` still wins.
fn init_logging(args: &Args) -> Result<()> {
    // Keep stderr quiet unless asked; a log file gets the full info trail.
    let level = match (args.debug, args.logfile.is_some()) {
        (true, _) => LevelFilter::Debug,
        (false, true) => LevelFilter::Info,
        (false, false) => LevelFilter::Warn,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let Some(path) = &args.logfile {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
