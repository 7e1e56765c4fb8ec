//! Shared test utilities

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_backend;
pub mod recording;

use mock_backend::MockBackend;
use playlist_ajax::listing::PlaylistIndex;
use playlist_ajax::settings::Timings;
use playlist_ajax::submit::SubmissionController;
use recording::{RecordingNotifier, RecordingSurface, ScriptedPrompt};
use std::sync::Arc;

/// Controller wired to test doubles
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub notifier: Arc<RecordingNotifier>,
    pub surface: Arc<RecordingSurface>,
    pub prompt: Arc<ScriptedPrompt>,
    pub controller: SubmissionController,
}

impl Harness {
    pub fn new(index: PlaylistIndex) -> Self {
        let backend = Arc::new(MockBackend::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let surface = Arc::new(RecordingSurface::default());
        let prompt = Arc::new(ScriptedPrompt::default());
        let controller = SubmissionController::new(
            backend.clone(),
            notifier.clone(),
            surface.clone(),
            prompt.clone(),
            index,
            Timings::default(),
        );
        Self {
            backend,
            notifier,
            surface,
            prompt,
            controller,
        }
    }
}
