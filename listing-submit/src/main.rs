// External crates
use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

// Internal imports
use listing_core::{ListingError, TriggerContext};
use listing_submit::outputs::{self, OutputSink};
use listing_submit::{cli, summary, Cli, Pipeline, RunOutcome};

fn main() {
    // Held until exit so buffered file logs are flushed
    let guard = listing_logging::init_subscriber();

    let parsed = match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => Err(cli::usage_error(&e)),
    };
    let code = match run(parsed) {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:#}");
            1
        }
    };

    drop(guard);
    std::process::exit(code);
}

fn run(cli: listing_core::Result<Cli>) -> anyhow::Result<()> {
    let mut sink = outputs::sink_from_env();

    match cli.and_then(execute) {
        Ok(outcome) => {
            outputs::write_outcome(sink.as_mut(), &outcome)
                .context("Failed to write step outputs")?;
            if let Err(e) = summary::append(&summary::render_success(&outcome)) {
                warn!(error = %e, "Failed to write job summary");
            }
            info!(status = %outcome.status, "Done");
            Ok(())
        }
        Err(e) => {
            report_failure(sink.as_mut(), &e);
            Err(e.into())
        }
    }
}

fn execute(cli: Cli) -> listing_core::Result<RunOutcome> {
    let (config, overrides) = cli.into_settings()?;
    let context = TriggerContext::from_env();

    info!(
        project = %config.project_path.display(),
        mode = ?config.mode(),
        "Preparing listing submission"
    );
    Pipeline::new(&config, &overrides, &context).run()
}

fn report_failure(sink: &mut dyn OutputSink, error: &ListingError) {
    if let Err(e) = outputs::write_failure(sink) {
        warn!(error = %e, "Failed to write step outputs");
    }
    if let Err(e) = summary::append(&summary::render_failure(error)) {
        warn!(error = %e, "Failed to write job summary");
    }
}
