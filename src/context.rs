//! Service context bundling the port trait objects for one run.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::llm::OpenAiClient;
use crate::adapters::recording::RecordingLlmClient;
use crate::adapters::replaying::ReplayingLlmClient;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::{CompletionConfig, Credential};
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;

/// Bundles the port trait objects into a single context.
///
/// Built once per run and passed explicitly to the runner; there is no
/// process-wide client.
pub struct ServiceContext {
    /// Filesystem for the prompt and completion files.
    pub fs: Box<dyn FileSystem>,
    /// LLM client for the completion call.
    pub llm: Box<dyn LlmClient>,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context talking to the real completion service.
    #[must_use]
    pub fn live(credential: Credential, config: &CompletionConfig) -> Self {
        Self::with_llm(Box::new(OpenAiClient::new(credential, &config.base_url)))
    }

    /// Creates a context with the live filesystem and the given LLM client.
    #[must_use]
    pub fn with_llm(llm: Box<dyn LlmClient>) -> Self {
        Self { fs: Box::new(LiveFileSystem), llm, recorder: None }
    }

    /// Creates a recording context that writes a cassette file on drop.
    ///
    /// The live client does the actual work; every completion call is
    /// captured and written to `path` when this context is dropped, even if
    /// the run failed.
    #[must_use]
    pub fn recording(credential: Credential, config: &CompletionConfig, path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            "oneshot-session",
            env!("CARGO_PKG_VERSION"),
        )));
        let live = Box::new(OpenAiClient::new(credential, &config.base_url));

        Self {
            fs: Box::new(LiveFileSystem),
            llm: Box::new(RecordingLlmClient::new(live, Arc::clone(&recorder))),
            recorder: Some(recorder),
        }
    }

    /// Creates a context whose completions are served from a cassette file.
    ///
    /// The network is never touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        debug!(
            cassette = %path.display(),
            interactions = cassette.interactions.len(),
            "replaying completions from cassette"
        );
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));
        Ok(Self::with_llm(Box::new(ReplayingLlmClient::new(replayer))))
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let guard = match recorder.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            match guard.finish() {
                Ok(path) => debug!(cassette = %path.display(), "recording saved"),
                Err(e) => {
                    let cassette = guard.path().display();
                    warn!(%cassette, error = %e, "failed to write cassette");
                }
            }
        }
    }
}
