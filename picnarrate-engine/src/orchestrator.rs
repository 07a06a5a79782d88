use crate::traits::{DescribeService, ProgressFn};
use crate::waveform::WaveformFetcher;
use crate::workflow::{UploadWorkflowState, WorkflowStatus};
use picnarrate_core::error::ClientError;
use picnarrate_core::media::UploadRequest;
use picnarrate_core::types::UploadResult;
use std::sync::Arc;
use tokio::sync::watch;

/// Observer invoked synchronously with every published workflow state.
///
/// Must be fast; it runs on the task that drives the upload.
pub type StateHook = Arc<dyn Fn(&UploadWorkflowState) + Send + Sync>;

/// Runs once per accepted result, while the state is still owned by that submission, so a
/// newer submission's call always lands after it. It must not touch the orchestrator.
pub type SuccessHook = Arc<dyn Fn(&UploadResult) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded(UploadResult),
    Failed(ClientError),
    /// A later submission (or a reset) took over before this attempt finished, including
    /// while its waveform was still being fetched.
    Superseded,
}

struct Inner {
    service: Arc<dyn DescribeService>,
    waveform: WaveformFetcher,
    on_success: SuccessHook,
    state: watch::Sender<UploadWorkflowState>,
}

/// Drives one upload -> describe -> synthesize cycle at a time.
///
/// A new `submit` supersedes whatever is in flight. Nothing is cancelled; the older attempt's
/// late progress and result are dropped when they arrive.
#[derive(Clone)]
pub struct UploadOrchestrator {
    inner: Arc<Inner>,
}

impl UploadOrchestrator {
    pub fn new(service: Arc<dyn DescribeService>, waveform: WaveformFetcher) -> Self {
        Self::with_success_hook(service, waveform, Arc::new(|_: &UploadResult| {}))
    }

    pub fn with_success_hook(
        service: Arc<dyn DescribeService>,
        waveform: WaveformFetcher,
        on_success: SuccessHook,
    ) -> Self {
        let (state, _) = watch::channel(UploadWorkflowState::default());
        Self {
            inner: Arc::new(Inner {
                service,
                waveform,
                on_success,
                state,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadWorkflowState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> UploadWorkflowState {
        self.inner.state.borrow().clone()
    }

    pub fn waveform(&self) -> &WaveformFetcher {
        &self.inner.waveform
    }

    pub async fn submit(&self, request: UploadRequest) -> SubmitOutcome {
        self.submit_with_hook(request, Arc::new(|_: &UploadWorkflowState| {})).await
    }

    pub async fn submit_with_hook(&self, request: UploadRequest, hook: StateHook) -> SubmitOutcome {
        let (file, options) = match request.validate() {
            Ok(v) => v,
            Err(e) => {
                self.reject(e.clone(), &hook);
                return SubmitOutcome::Failed(e);
            }
        };

        let generation = self.start(&hook);
        self.inner.waveform.begin(generation);
        log::info!(
            "upload workflow: submission {generation} in flight ({}, {} bytes, mode={})",
            file.filename,
            file.bytes.len(),
            options.mode
        );

        let progress: ProgressFn = {
            let this = self.clone();
            let hook = hook.clone();
            Arc::new(move |pct| {
                this.apply(generation, &hook, |s| {
                    let pct = pct.min(100);
                    if s.status != WorkflowStatus::InFlight || pct <= s.progress {
                        return false;
                    }
                    s.progress = pct;
                    true
                });
            })
        };

        let res = self.inner.service.upload(file, options, progress).await;

        match res {
            Ok(result) => {
                // Observers always see 100% before the terminal state.
                self.apply(generation, &hook, |s| {
                    if s.progress >= 100 {
                        return false;
                    }
                    s.progress = 100;
                    true
                });
                let on_success = &self.inner.on_success;
                let current = self.apply(generation, &hook, |s| {
                    s.status = WorkflowStatus::Succeeded;
                    s.progress = 100;
                    s.result = Some(result.clone());
                    s.error = None;
                    on_success(&result);
                    true
                });
                if !current {
                    log::debug!("upload workflow: late result of submission {generation} ignored");
                    return SubmitOutcome::Superseded;
                }
                log::info!(
                    "upload workflow: InFlight -> Succeeded (submission {generation}, audio={})",
                    result.has_audio()
                );

                if result.has_audio() {
                    self.inner.waveform.fetch_for(generation).await;
                } else {
                    self.inner.waveform.clear(generation);
                }
                if self.inner.state.borrow().generation != generation {
                    log::debug!(
                        "upload workflow: submission {generation} taken over during waveform fetch"
                    );
                    return SubmitOutcome::Superseded;
                }
                SubmitOutcome::Succeeded(result)
            }
            Err(e) => {
                let current = self.apply(generation, &hook, |s| {
                    s.status = WorkflowStatus::Failed;
                    s.error = Some(e.clone());
                    true
                });
                if !current {
                    log::debug!("upload workflow: late failure of submission {generation} ignored");
                    return SubmitOutcome::Superseded;
                }
                log::warn!("upload workflow: InFlight -> Failed (submission {generation}): {e}");
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Returns to Idle and abandons any in-flight submission.
    pub fn reset(&self) {
        let mut generation = 0;
        self.inner.state.send_modify(|s| {
            s.generation += 1;
            generation = s.generation;
            s.status = WorkflowStatus::Idle;
            s.progress = 0;
            s.result = None;
            s.error = None;
        });
        self.inner.waveform.clear(generation);
        log::info!("upload workflow: reset");
    }

    fn start(&self, hook: &StateHook) -> u64 {
        let mut published = UploadWorkflowState::default();
        self.inner.state.send_modify(|s| {
            s.generation += 1;
            s.status = WorkflowStatus::InFlight;
            s.progress = 0;
            s.error = None;
            published = s.clone();
        });
        hook(&published);
        published.generation
    }

    // A validation failure is a newer user intent too, so it also takes over the generation.
    fn reject(&self, error: ClientError, hook: &StateHook) {
        log::info!("upload workflow: submission rejected: {error}");
        let mut published = UploadWorkflowState::default();
        self.inner.state.send_modify(|s| {
            s.generation += 1;
            s.status = WorkflowStatus::Idle;
            s.progress = 0;
            s.error = Some(error);
            published = s.clone();
        });
        hook(&published);
    }

    /// Applies `modify` only if `generation` still owns the state. Returns whether it does.
    fn apply(
        &self,
        generation: u64,
        hook: &StateHook,
        modify: impl FnOnce(&mut UploadWorkflowState) -> bool,
    ) -> bool {
        let mut current = false;
        let mut published = None;
        self.inner.state.send_if_modified(|s| {
            if s.generation != generation {
                return false;
            }
            current = true;
            if !modify(s) {
                return false;
            }
            published = Some(s.clone());
            true
        });
        if let Some(s) = published {
            hook(&s);
        }
        current
    }
}
