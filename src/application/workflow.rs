//! AnalysisWorkflow - Orchestrates one document's analysis pipeline.
//!
//! Drives extraction, classification, summarization and sanitization in
//! strict sequence and publishes the result only when every stage succeeded.
//!
//! # Supersession
//!
//! Every `submit` bumps a [`RunToken`]. Each continuation point (after a
//! remote call returns, before a state change) compares its token with the
//! current one; a mismatch means a newer document was selected and the stale
//! run's outcome is discarded without touching workflow state.
//!
//! # Remote calls
//!
//! Each call is bounded by `WorkflowOptions::timeout`. Transport failures
//! (including timeouts) are retried up to `max_retries` times with
//! exponential backoff; contract violations are never retried.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use crate::config::{ChatConfig, ServiceConfig};
use crate::domain::foundation::{DocumentId, RunToken, StateMachine};
use crate::domain::policy::{
    AnalysisError, AnalysisResult, ChatTranscript, ChatTurn, ClauseClassifier, Document,
    PipelineState, DEFAULT_GREETING, PIPELINE_FAILURE_MESSAGE, SUMMARY_PROMPT,
};
use crate::ports::AnalysisClient;

/// Tuning for remote calls and the chat transcript.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Upper bound for a single remote call.
    pub timeout: Duration,
    /// Extra attempts after a transport failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further attempt.
    pub retry_backoff: Duration,
    /// Assistant turn that opens every transcript (empty for none).
    pub greeting: String,
}

impl WorkflowOptions {
    /// Builds options from the service and chat configuration sections.
    pub fn from_config(service: &ServiceConfig, chat: &ChatConfig) -> Self {
        Self {
            timeout: service.timeout(),
            max_retries: service.max_retries,
            greeting: chat.greeting.clone(),
            ..Self::default()
        }
    }
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

/// How a submitted run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The result was published.
    Ready(Arc<AnalysisResult>),
    /// The run failed; workflow state is `Failed`.
    Failed(AnalysisError),
    /// A newer submission replaced this run; nothing was published.
    Superseded,
}

impl RunOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, RunOutcome::Ready(_))
    }
}

/// Observable view of the workflow, sent on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowSnapshot {
    pub run: RunToken,
    pub document_id: Option<DocumentId>,
    pub document_name: Option<String>,
    pub state: PipelineState,
    pub failure_message: Option<String>,
    pub has_result: bool,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Extraction,
    Summary,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Stage::Extraction => "extraction",
            Stage::Summary => "summary",
        }
    }

    fn timed_out(&self, after: Duration) -> AnalysisError {
        let reason = format!("timed out after {}s", after.as_secs_f64());
        match self {
            Stage::Extraction => AnalysisError::extraction_failed(reason),
            Stage::Summary => AnalysisError::query_failed(reason),
        }
    }
}

#[derive(Debug)]
struct Inner {
    run: RunToken,
    document: Option<Document>,
    state: PipelineState,
    result: Option<Arc<AnalysisResult>>,
    failure_message: Option<String>,
    transcript: ChatTranscript,
}

/// The analysis pipeline for the currently selected document.
///
/// Sole writer of the published result and of the chat transcript; the chat
/// gateway appends turns through [`AnalysisWorkflow::begin_chat_turn`] and
/// [`AnalysisWorkflow::finish_chat_turn`].
pub struct AnalysisWorkflow {
    client: Arc<dyn AnalysisClient>,
    options: WorkflowOptions,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<WorkflowSnapshot>,
}

impl AnalysisWorkflow {
    pub fn new(client: Arc<dyn AnalysisClient>, options: WorkflowOptions) -> Self {
        let inner = Inner {
            run: RunToken::INITIAL,
            document: None,
            state: PipelineState::Idle,
            result: None,
            failure_message: None,
            transcript: ChatTranscript::with_greeting(&options.greeting),
        };
        let (snapshots, _) = watch::channel(WorkflowSnapshot::default());

        Self {
            client,
            options,
            inner: Mutex::new(inner),
            snapshots,
        }
    }

    /// Runs the full pipeline for a newly selected document.
    ///
    /// Selecting a document discards the previous result, failure message and
    /// chat history, and supersedes any run still in flight.
    pub async fn submit(&self, doc: Document) -> RunOutcome {
        let run = self.start_run(&doc);

        if !self.advance(run, PipelineState::Extracting) {
            return RunOutcome::Superseded;
        }
        let extracted = self
            .call_remote(run, Stage::Extraction, || self.client.extract_clauses(&doc))
            .await;
        if !self.is_current(run) {
            return self.discard(run, Stage::Extraction);
        }
        let extracted = match extracted {
            Ok(clauses) => clauses,
            Err(err) => return self.fail(run, Stage::Extraction, err),
        };

        let buckets = match ClauseClassifier::classify(&extracted) {
            Ok(buckets) => buckets,
            Err(err) => return self.fail(run, Stage::Extraction, err),
        };
        tracing::debug!(
            %run,
            high = buckets.high().len(),
            moderate = buckets.moderate().len(),
            low = buckets.low().len(),
            "clauses classified"
        );

        if !self.advance(run, PipelineState::Summarizing) {
            return RunOutcome::Superseded;
        }
        let answer = self
            .call_remote(run, Stage::Summary, || {
                self.client.ask_question(SUMMARY_PROMPT)
            })
            .await;
        if !self.is_current(run) {
            return self.discard(run, Stage::Summary);
        }
        let answer = match answer {
            Ok(answer) => answer,
            Err(err) => return self.fail(run, Stage::Summary, err),
        };

        let result = match AnalysisResult::new(answer, buckets.into_ordered()) {
            Ok(result) => Arc::new(result),
            Err(err) => {
                return self.fail(run, Stage::Summary, AnalysisError::malformed(err.to_string()))
            }
        };

        self.publish(run, result)
    }

    /// Current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.lock().state
    }

    /// Latest published result, if the current document finished successfully.
    pub fn result(&self) -> Option<Arc<AnalysisResult>> {
        self.lock().result.clone()
    }

    /// Currently selected document.
    pub fn document(&self) -> Option<Document> {
        self.lock().document.clone()
    }

    /// Selected document together with its published result.
    ///
    /// Both are read under one lock, so the pair always belongs to the same
    /// run even while a newer submission is starting.
    pub fn published(&self) -> Option<(Document, Arc<AnalysisResult>)> {
        let inner = self.lock();
        match (&inner.document, &inner.result) {
            (Some(doc), Some(result)) => Some((doc.clone(), Arc::clone(result))),
            _ => None,
        }
    }

    /// User-facing message of the last failed run.
    pub fn failure_message(&self) -> Option<String> {
        self.lock().failure_message.clone()
    }

    /// Chat turns for the current document, in append order.
    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.lock().transcript.turns().to_vec()
    }

    /// Token of the most recent run.
    pub fn current_run(&self) -> RunToken {
        self.lock().run
    }

    /// Receives a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.snapshots.subscribe()
    }

    /// Appends a user turn and returns the document generation it belongs to.
    pub(crate) fn begin_chat_turn(&self, turn: ChatTurn) -> RunToken {
        let mut inner = self.lock();
        inner.transcript.push(turn);
        inner.run
    }

    /// Appends the reply to a turn started under `run`.
    ///
    /// Returns false (and appends nothing) if the document changed since.
    pub(crate) fn finish_chat_turn(&self, run: RunToken, turn: ChatTurn) -> bool {
        let mut inner = self.lock();
        if inner.run != run {
            return false;
        }
        inner.transcript.push(turn);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, run: RunToken) -> bool {
        self.lock().run == run
    }

    fn start_run(&self, doc: &Document) -> RunToken {
        let mut inner = self.lock();
        let previous = inner.state;
        let run = inner.run.next();

        if previous.is_in_flight() {
            tracing::info!(
                superseded = %inner.run,
                %run,
                "new document supersedes in-flight run"
            );
        }

        inner.run = run;
        inner.document = Some(doc.clone());
        inner.result = None;
        inner.failure_message = None;
        inner.transcript = ChatTranscript::with_greeting(&self.options.greeting);
        inner.state = PipelineState::Uploading;

        tracing::info!(
            document_id = %doc.id(),
            document = doc.name(),
            bytes = doc.byte_size(),
            %run,
            from = %previous,
            to = %PipelineState::Uploading,
            "pipeline state changed"
        );
        self.notify(&inner);
        run
    }

    /// Moves a current run forward. Returns false if the run is stale.
    fn advance(&self, run: RunToken, to: PipelineState) -> bool {
        let mut inner = self.lock();
        if inner.run != run {
            return false;
        }

        let from = inner.state;
        match from.transition_to(to) {
            Ok(next) => inner.state = next,
            Err(err) => {
                tracing::error!(%run, error = %err, "rejected pipeline transition");
                return false;
            }
        }

        tracing::info!(
            document_id = ?inner.document.as_ref().map(Document::id),
            %run,
            %from,
            %to,
            "pipeline state changed"
        );
        self.notify(&inner);
        true
    }

    fn fail(&self, run: RunToken, stage: Stage, err: AnalysisError) -> RunOutcome {
        let mut inner = self.lock();
        if inner.run != run {
            drop(inner);
            return self.discard(run, stage);
        }

        tracing::error!(%run, stage = stage.as_str(), error = %err, "analysis pipeline failed");

        let from = inner.state;
        inner.state = PipelineState::Failed;
        inner.result = None;
        inner.failure_message = Some(PIPELINE_FAILURE_MESSAGE.to_string());
        tracing::info!(%run, %from, to = %PipelineState::Failed, "pipeline state changed");
        self.notify(&inner);

        RunOutcome::Failed(err)
    }

    fn publish(&self, run: RunToken, result: Arc<AnalysisResult>) -> RunOutcome {
        let mut inner = self.lock();
        if inner.run != run {
            drop(inner);
            return self.discard(run, Stage::Summary);
        }

        let from = inner.state;
        match from.transition_to(PipelineState::Ready) {
            Ok(next) => inner.state = next,
            Err(err) => {
                tracing::error!(%run, error = %err, "rejected pipeline transition");
                return RunOutcome::Superseded;
            }
        }
        inner.result = Some(Arc::clone(&result));
        tracing::info!(
            %run,
            clauses = result.clauses().len(),
            %from,
            to = %PipelineState::Ready,
            "pipeline state changed"
        );
        self.notify(&inner);

        RunOutcome::Ready(result)
    }

    fn discard(&self, run: RunToken, stage: Stage) -> RunOutcome {
        tracing::warn!(
            %run,
            stage = stage.as_str(),
            "discarding completion of superseded run"
        );
        RunOutcome::Superseded
    }

    fn notify(&self, inner: &Inner) {
        let snapshot = WorkflowSnapshot {
            run: inner.run,
            document_id: inner.document.as_ref().map(Document::id),
            document_name: inner.document.as_ref().map(|d| d.name().to_string()),
            state: inner.state,
            failure_message: inner.failure_message.clone(),
            has_result: inner.result.is_some(),
        };
        self.snapshots.send_replace(snapshot);
    }

    /// Runs one remote call under the timeout and retry policy.
    ///
    /// Stops retrying as soon as the run is superseded.
    async fn call_remote<T, F, Fut>(
        &self,
        run: RunToken,
        stage: Stage,
        mut call: F,
    ) -> Result<T, AnalysisError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AnalysisError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let err = match timeout(self.options.timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => err,
                Err(_) => stage.timed_out(self.options.timeout),
            };

            if !err.is_transport() || attempt >= self.options.max_retries || !self.is_current(run)
            {
                return Err(err);
            }

            let backoff = self.options.retry_backoff * 2u32.saturating_pow(attempt);
            tracing::warn!(
                %run,
                stage = stage.as_str(),
                attempt = attempt + 1,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "remote call failed, retrying"
            );
            sleep(backoff).await;
            attempt += 1;
        }
    }
}
