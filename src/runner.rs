//! The command runner: prompt file in, one completion, response file out.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::{CompletionConfig, Credential};
use crate::context::ServiceContext;
use crate::error::RunError;
use crate::ports::llm::{CompletionRequest, CompletionResponse, LlmClient};

/// When set, completions are replayed from this cassette file.
pub const REPLAY_VAR: &str = "ONESHOT_REPLAY";
/// When set, live completions are recorded to this cassette file.
pub const RECORD_VAR: &str = "ONESHOT_RECORD";

/// Run a parsed command line end to end and print the confirmation.
///
/// The credential is validated before any client is constructed.
///
/// # Errors
///
/// Returns the first [`RunError`] hit along the way.
pub fn dispatch(cli: &Cli) -> Result<(), RunError> {
    let credential = Credential::from_env()?;
    let config = cli.completion_config();
    let ctx = context_from_env(credential, &config)?;

    let written = execute(&ctx, &config, &cli.input, &cli.output)?;
    println!("Response saved to {}", written.display());
    Ok(())
}

/// Pick live, recording, or replaying adapters from the environment.
fn context_from_env(
    credential: Credential,
    config: &CompletionConfig,
) -> Result<ServiceContext, RunError> {
    if let Some(path) = cassette_path(env::var_os(REPLAY_VAR)) {
        return ServiceContext::replaying(&path).map_err(RunError::Cassette);
    }
    if let Some(path) = cassette_path(env::var_os(RECORD_VAR)) {
        return Ok(ServiceContext::recording(credential, config, &path));
    }
    Ok(ServiceContext::live(credential, config))
}

/// A cassette variable set to the empty string counts as unset.
fn cassette_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Read the prompt, request one completion, and write its text to `output`.
///
/// Nothing is written unless the completion succeeded.
///
/// # Errors
///
/// Returns [`RunError::InputRead`], [`RunError::Request`],
/// [`RunError::Runtime`], or [`RunError::OutputWrite`].
pub fn execute(
    ctx: &ServiceContext,
    config: &CompletionConfig,
    input: &Path,
    output: &Path,
) -> Result<PathBuf, RunError> {
    let prompt = ctx
        .fs
        .read_to_string(input)
        .map_err(|source| RunError::InputRead { path: input.to_path_buf(), source })?;
    debug!(input = %input.display(), bytes = prompt.len(), "read prompt");

    let request = CompletionRequest::single_prompt(config, prompt);
    info!(
        model = %request.model,
        temperature = request.temperature,
        max_tokens = request.max_tokens,
        "requesting completion"
    );
    let response = complete_blocking(ctx.llm.as_ref(), &request)?;
    debug!(
        prompt_tokens = response.prompt_tokens,
        completion_tokens = response.completion_tokens,
        "completion received"
    );

    ctx.fs
        .write(output, &response.text)
        .map_err(|source| RunError::OutputWrite { path: output.to_path_buf(), source })?;
    Ok(output.to_path_buf())
}

/// Drive one completion to the end on a current-thread runtime.
fn complete_blocking(
    llm: &dyn LlmClient,
    request: &CompletionRequest,
) -> Result<CompletionResponse, RunError> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(llm.complete(request)).map_err(RunError::Request)
}
