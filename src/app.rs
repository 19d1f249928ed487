//! Page controller: UI state, the transition function, and the orchestration
//! of image acquisition, inference and formatting.

use crate::ai::{GeminiStoneClient, InferenceService};
use crate::format::{format_analysis, Fragment};
use crate::image::{
    self, read_selected, validate_selection, AssetService, DataUrl, FileInput, FsAssetLoader,
    HttpAssetLoader,
};
use crate::models::{AssetRoot, Config};
use crate::prompts;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze image. Please try again.";
const ANALYSIS_CANCELLED_MESSAGE: &str = "Analysis was cancelled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    LoadingDefault,
    Ready,
    Analyzing,
    Error,
}

/// Everything the page shows. Only changed through [`reduce`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub image: Option<DataUrl>,
    pub analysis: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped whenever a new async operation starts; completions carrying an
    /// older value are stale and dropped.
    pub generation: u64,
}

impl PageState {
    pub fn phase(&self) -> Phase {
        match (&self.error, self.loading, &self.image) {
            (Some(_), _, _) => Phase::Error,
            (None, true, None) => Phase::LoadingDefault,
            (None, true, Some(_)) => Phase::Analyzing,
            (None, false, Some(_)) => Phase::Ready,
            (None, false, None) => Phase::Idle,
        }
    }

    /// Whether the "Identify Stone" action is enabled.
    pub fn can_identify(&self) -> bool {
        self.image.is_some() && !self.loading
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadDefaultStarted,
    DefaultLoaded {
        generation: u64,
        image: DataUrl,
        analysis: String,
    },
    DefaultFailed {
        generation: u64,
        message: String,
    },
    SelectionRejected {
        message: String,
    },
    ImageRead {
        image: DataUrl,
    },
    ReadFailed {
        message: String,
    },
    AnalysisStarted,
    AnalysisCompleted {
        generation: u64,
        text: String,
    },
    AnalysisFailed {
        generation: u64,
        message: String,
    },
}

/// Pure state transition.
pub fn reduce(state: PageState, action: Action) -> PageState {
    match action {
        Action::LoadDefaultStarted | Action::AnalysisStarted => PageState {
            loading: true,
            error: None,
            generation: state.generation + 1,
            ..state
        },
        Action::DefaultLoaded {
            generation,
            image,
            analysis,
        } => {
            if generation != state.generation {
                return stale(state, generation);
            }
            PageState {
                image: Some(image),
                analysis,
                loading: false,
                ..state
            }
        }
        Action::AnalysisCompleted { generation, text } => {
            if generation != state.generation {
                return stale(state, generation);
            }
            PageState {
                analysis: text,
                loading: false,
                ..state
            }
        }
        Action::DefaultFailed {
            generation,
            message,
        }
        | Action::AnalysisFailed {
            generation,
            message,
        } => {
            if generation != state.generation {
                return stale(state, generation);
            }
            PageState {
                error: Some(message),
                loading: false,
                ..state
            }
        }
        Action::SelectionRejected { message } | Action::ReadFailed { message } => PageState {
            error: Some(message),
            ..state
        },
        Action::ImageRead { image } => PageState {
            image: Some(image),
            error: None,
            ..state
        },
    }
}

fn stale(state: PageState, generation: u64) -> PageState {
    warn!(
        "Dropping stale result from generation {} (current {})",
        generation, state.generation
    );
    state
}

/// An inference call running on its own task.
pub struct PendingAnalysis {
    generation: u64,
    handle: JoinHandle<crate::Result<String>>,
}

impl PendingAnalysis {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub inference: Arc<dyn InferenceService>,
    pub assets: Box<dyn AssetService>,
}

pub struct App {
    inference: Arc<dyn InferenceService>,
    assets: Box<dyn AssetService>,
    default_image: String,
    state: PageState,
}

impl App {
    pub fn with_services(services: AppServices, default_image: String) -> Self {
        Self {
            inference: services.inference,
            assets: services.assets,
            default_image,
            state: PageState::default(),
        }
    }

    /// Construct an app wired to Gemini and the configured asset root.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool for inference and asset fetches.
        let http_client = reqwest::Client::new();

        info!("Inference provider: Gemini (model: {})", config.gemini_model);
        let inference = GeminiStoneClient::new_with_client(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.inference_timeout,
            http_client.clone(),
        )
        .with_base_url(config.gemini_base_url.clone());

        let assets: Box<dyn AssetService> = match &config.asset_root {
            AssetRoot::Directory(dir) => {
                info!("Serving assets from directory {}", dir);
                Box::new(FsAssetLoader::new(dir))
            }
            AssetRoot::Url(url) => {
                info!("Fetching assets from {}", url);
                Box::new(HttpAssetLoader::new_with_client(url.clone(), http_client))
            }
        };

        Self::with_services(
            AppServices {
                inference: Arc::new(inference),
                assets,
            },
            config.default_image.clone(),
        )
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn fragments(&self) -> Vec<Fragment> {
        format_analysis(&self.state.analysis)
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Initial page load: the bundled image with the canned analysis. No
    /// inference call is made.
    pub async fn load_default(&mut self) {
        self.dispatch(Action::LoadDefaultStarted);
        let generation = self.state.generation;
        info!("Loading default image {}", self.default_image);

        let action = match image::load_default(self.assets.as_ref(), &self.default_image).await {
            Ok(image) => Action::DefaultLoaded {
                generation,
                image,
                analysis: prompts::DEFAULT_ANALYSIS.to_string(),
            },
            Err(e) => {
                error!("Error loading default image: {}", e);
                Action::DefaultFailed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
        self.dispatch(action);
    }

    /// Handle a file-input change: validate, read, show the new image and
    /// analyze it. The input is cleared either way.
    pub async fn upload(&mut self, input: &mut FileInput) {
        let Some(file) = input.take() else {
            return;
        };
        info!(
            "Upload selected: {} ({}, {} bytes)",
            file.name, file.content_type, file.size
        );

        if let Err(e) = validate_selection(&file) {
            warn!("Rejected upload {}: {}", file.name, e);
            self.dispatch(Action::SelectionRejected {
                message: e.to_string(),
            });
            return;
        }

        match read_selected(&file).await {
            Ok(image) => self.dispatch(Action::ImageRead { image }),
            Err(e) => {
                self.dispatch(Action::ReadFailed {
                    message: e.to_string(),
                });
                return;
            }
        }

        if let Some(pending) = self.begin_analysis() {
            self.complete(pending).await;
        }
    }

    /// The "Identify Stone" action. Ignored while another operation is in
    /// flight or before any image exists. Returns whether it ran.
    pub async fn reanalyze(&mut self) -> bool {
        if !self.state.can_identify() {
            info!("Identify ignored in phase {:?}", self.state.phase());
            return false;
        }
        match self.begin_analysis() {
            Some(pending) => {
                self.complete(pending).await;
                true
            }
            None => false,
        }
    }

    /// Start analyzing the current image on a separate task. Supersedes any
    /// analysis already in flight.
    pub fn begin_analysis(&mut self) -> Option<PendingAnalysis> {
        let image = self.state.image.clone()?;
        self.dispatch(Action::AnalysisStarted);
        let generation = self.state.generation;
        info!("Starting analysis (generation {})", generation);

        let inference = Arc::clone(&self.inference);
        let handle = tokio::spawn(async move {
            inference.analyze(&image, prompts::STONE_ANALYSIS).await
        });

        Some(PendingAnalysis { generation, handle })
    }

    /// Wait for a pending analysis and apply its outcome.
    pub async fn complete(&mut self, pending: PendingAnalysis) {
        let generation = pending.generation;
        let action = match pending.handle.await {
            Ok(Ok(text)) => {
                info!("Analysis complete (generation {})", generation);
                Action::AnalysisCompleted { generation, text }
            }
            Ok(Err(e)) => {
                error!("Analysis failed (generation {}): {}", generation, e);
                Action::AnalysisFailed {
                    generation,
                    message: e.to_string(),
                }
            }
            Err(e) if e.is_cancelled() => Action::AnalysisFailed {
                generation,
                message: ANALYSIS_CANCELLED_MESSAGE.to_string(),
            },
            Err(e) => {
                error!("Analysis task failed (generation {}): {}", generation, e);
                Action::AnalysisFailed {
                    generation,
                    message: ANALYSIS_FAILED_MESSAGE.to_string(),
                }
            }
        };
        self.dispatch(action);
    }
}
