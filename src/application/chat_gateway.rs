//! ChatGateway - Conversational Q&A over the current document.
//!
//! One gateway covers every chat variant: answers come either from the live
//! analysis service or from a canned list, and questions can optionally be
//! spoken through an injected [`SpeechInput`].
//!
//! Questions are served one at a time in submission order, so the transcript
//! always reads question, answer, question, answer. Chat is independent of
//! the pipeline state; a reply that arrives after a new document was selected
//! is dropped.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::timeout;

use super::workflow::AnalysisWorkflow;
use crate::config::{ChatConfig, ChatMode};
use crate::domain::policy::{ChatTurn, CHAT_FAILURE_MESSAGE};
use crate::ports::{AnalysisClient, SpeechError, SpeechInput};

/// Where chat answers come from.
#[derive(Clone)]
pub enum ChatResponder {
    /// Ask the analysis service.
    Live(Arc<dyn AnalysisClient>),
    /// Cycle through fixed replies without any remote call.
    Canned(Vec<String>),
}

impl std::fmt::Debug for ChatResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatResponder::Live(_) => write!(f, "Live"),
            ChatResponder::Canned(responses) => {
                f.debug_tuple("Canned").field(&responses.len()).finish()
            }
        }
    }
}

/// Result of one chat question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// The responder answered; the turn was appended.
    Answered(ChatTurn),
    /// The responder failed; the fallback turn was appended.
    Fallback(ChatTurn),
    /// The document changed while waiting; nothing was appended.
    Discarded,
}

impl ChatReply {
    /// The appended assistant turn, if any.
    pub fn turn(&self) -> Option<&ChatTurn> {
        match self {
            ChatReply::Answered(turn) | ChatReply::Fallback(turn) => Some(turn),
            ChatReply::Discarded => None,
        }
    }
}

/// Chat errors. None of these touch the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The question was empty or whitespace.
    #[error("question is empty")]
    EmptyQuery,

    /// Voice input is disabled or no speech input was provided.
    #[error("voice input is not available")]
    VoiceUnavailable,

    /// Speech capture failed.
    #[error(transparent)]
    Voice(#[from] SpeechError),
}

/// Serializes questions and owns the canned-reply cursor.
#[derive(Debug, Default)]
struct ChatQueue {
    canned_cursor: usize,
}

/// Consolidated chat front door.
pub struct ChatGateway {
    workflow: Arc<AnalysisWorkflow>,
    responder: ChatResponder,
    speech: Option<Arc<dyn SpeechInput>>,
    timeout: Duration,
    queue: Mutex<ChatQueue>,
}

impl ChatGateway {
    pub fn new(workflow: Arc<AnalysisWorkflow>, responder: ChatResponder, timeout: Duration) -> Self {
        Self {
            workflow,
            responder,
            speech: None,
            timeout,
            queue: Mutex::new(ChatQueue::default()),
        }
    }

    /// Builds a gateway with the capabilities selected by configuration.
    ///
    /// `speech` is only wired in when `voice_enabled` is set.
    pub fn from_config(
        config: &ChatConfig,
        workflow: Arc<AnalysisWorkflow>,
        client: Arc<dyn AnalysisClient>,
        speech: Option<Arc<dyn SpeechInput>>,
        timeout: Duration,
    ) -> Self {
        let responder = match config.mode {
            ChatMode::Live => ChatResponder::Live(client),
            ChatMode::Canned => ChatResponder::Canned(
                config
                    .canned_responses
                    .iter()
                    .filter(|r| !r.trim().is_empty())
                    .cloned()
                    .collect(),
            ),
        };

        let gateway = Self::new(workflow, responder, timeout);
        match speech {
            Some(speech) if config.voice_enabled => gateway.with_speech(speech),
            _ => gateway,
        }
    }

    /// Enables spoken questions.
    pub fn with_speech(mut self, speech: Arc<dyn SpeechInput>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn voice_available(&self) -> bool {
        self.speech.is_some()
    }

    /// Asks a typed question about the current document.
    ///
    /// Appends the user turn, then the answer (or the fixed fallback message if
    /// the responder fails). Pipeline state is never touched.
    pub async fn ask(&self, query: &str) -> Result<ChatReply, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }

        let mut queue = self.queue.lock().await;
        let run = self.workflow.begin_chat_turn(ChatTurn::user(query));

        let (turn, answered) = match self.respond(&mut queue, query).await {
            Some(answer) => (ChatTurn::assistant(answer), true),
            None => (ChatTurn::assistant(CHAT_FAILURE_MESSAGE), false),
        };

        if !self.workflow.finish_chat_turn(run, turn.clone()) {
            tracing::warn!(%run, "document changed during chat, dropping reply");
            return Ok(ChatReply::Discarded);
        }

        Ok(if answered {
            ChatReply::Answered(turn)
        } else {
            ChatReply::Fallback(turn)
        })
    }

    /// Captures a spoken question and asks it.
    pub async fn ask_by_voice(&self) -> Result<ChatReply, ChatError> {
        let speech = self.speech.as_ref().ok_or(ChatError::VoiceUnavailable)?;
        let query = speech.listen().await?;
        self.ask(&query).await
    }

    async fn respond(&self, queue: &mut ChatQueue, query: &str) -> Option<String> {
        match &self.responder {
            ChatResponder::Live(client) => {
                match timeout(self.timeout, client.ask_question(query)).await {
                    Ok(Ok(answer)) => Some(answer),
                    Ok(Err(err)) => {
                        tracing::warn!(error = %err, "chat question failed, using fallback");
                        None
                    }
                    Err(_) => {
                        tracing::warn!(
                            timeout_secs = self.timeout.as_secs_f64(),
                            "chat question timed out, using fallback"
                        );
                        None
                    }
                }
            }
            ChatResponder::Canned(responses) => {
                if responses.is_empty() {
                    tracing::warn!("no canned responses configured, using fallback");
                    return None;
                }
                let answer = responses[queue.canned_cursor % responses.len()].clone();
                queue.canned_cursor += 1;
                Some(answer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::analysis::MockAnalysisClient;
    use crate::adapters::speech::ScriptedSpeechInput;
    use crate::application::workflow::WorkflowOptions;
    use crate::domain::policy::{AnalysisError, ChatRole, Document, PipelineState};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn setup(client: &MockAnalysisClient) -> (Arc<AnalysisWorkflow>, ChatGateway) {
        let workflow = Arc::new(AnalysisWorkflow::new(
            Arc::new(client.clone()),
            WorkflowOptions::default(),
        ));
        let gateway = ChatGateway::new(
            Arc::clone(&workflow),
            ChatResponder::Live(Arc::new(client.clone())),
            TIMEOUT,
        );
        (workflow, gateway)
    }

    fn contents(workflow: &AnalysisWorkflow) -> Vec<String> {
        workflow.transcript().into_iter().map(|t| t.content).collect()
    }

    #[tokio::test]
    async fn answered_question_appends_both_turns() {
        let client = MockAnalysisClient::new().with_answer("Your deductible is $500.");
        let (workflow, gateway) = setup(&client);

        let reply = gateway.ask("What is my deductible?").await.unwrap();

        assert!(matches!(reply, ChatReply::Answered(_)));
        let transcript = workflow.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, ChatRole::User);
        assert_eq!(transcript[1].content, "What is my deductible?");
        assert_eq!(transcript[2].role, ChatRole::Assistant);
        assert_eq!(transcript[2].content, "Your deductible is $500.");
    }

    #[tokio::test]
    async fn empty_question_is_rejected_without_calling_backend() {
        let client = MockAnalysisClient::new();
        let (workflow, gateway) = setup(&client);

        assert_eq!(gateway.ask("   ").await, Err(ChatError::EmptyQuery));
        assert_eq!(client.ask_count(), 0);
        assert_eq!(workflow.transcript().len(), 1);
    }

    #[tokio::test]
    async fn failure_appends_fallback_and_keeps_pipeline_state() {
        let client = MockAnalysisClient::new()
            .with_clauses(Vec::new())
            .with_answer("summary")
            .with_ask_error(AnalysisError::query_failed("500"));
        let (workflow, gateway) = setup(&client);
        let doc = Document::new("policy.pdf", b"bytes".to_vec()).unwrap();
        workflow.submit(doc).await;
        assert_eq!(workflow.state(), PipelineState::Ready);

        let reply = gateway.ask("Is flood covered?").await.unwrap();

        assert!(matches!(reply, ChatReply::Fallback(_)));
        assert_eq!(
            contents(&workflow).last().map(String::as_str),
            Some(CHAT_FAILURE_MESSAGE)
        );
        assert_eq!(workflow.state(), PipelineState::Ready);
        assert!(workflow.result().is_some());
    }

    #[tokio::test]
    async fn turns_keep_submission_order_when_answers_arrive_out_of_order() {
        let client = MockAnalysisClient::new()
            .with_answer_after("first answer", Duration::from_millis(100))
            .with_answer("second answer");
        let (workflow, gateway) = setup(&client);
        let gateway = Arc::new(gateway);

        let first = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { gateway.ask("first?").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = gateway.ask("second?").await.unwrap();
        first.await.unwrap().unwrap();

        assert!(matches!(second, ChatReply::Answered(_)));
        assert_eq!(
            contents(&workflow)[1..],
            ["first?", "first answer", "second?", "second answer"]
        );
    }

    #[tokio::test]
    async fn reply_is_dropped_when_document_changes() {
        let client = MockAnalysisClient::new()
            .with_answer_after("stale answer", Duration::from_millis(100));
        let (workflow, gateway) = setup(&client);
        let gateway = Arc::new(gateway);

        let pending = {
            let gateway = Arc::clone(&gateway);
            tokio::spawn(async move { gateway.ask("question?").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let doc = Document::new("other.pdf", b"bytes".to_vec()).unwrap();
        workflow.submit(doc).await;

        assert_eq!(pending.await.unwrap(), Ok(ChatReply::Discarded));
        assert!(!contents(&workflow).contains(&"stale answer".to_string()));
    }

    #[tokio::test]
    async fn canned_mode_cycles_without_remote_calls() {
        let client = MockAnalysisClient::new();
        let workflow = Arc::new(AnalysisWorkflow::new(
            Arc::new(client.clone()),
            WorkflowOptions::default(),
        ));
        let config = ChatConfig {
            mode: ChatMode::Canned,
            canned_responses: vec!["one".to_string(), "two".to_string()],
            ..Default::default()
        };
        let gateway = ChatGateway::from_config(
            &config,
            Arc::clone(&workflow),
            Arc::new(client.clone()),
            None,
            TIMEOUT,
        );

        for _ in 0..3 {
            gateway.ask("anything").await.unwrap();
        }

        assert_eq!(client.ask_count(), 0);
        let answers: Vec<String> = workflow
            .transcript()
            .into_iter()
            .skip(1)
            .filter(|t| t.role == ChatRole::Assistant)
            .map(|t| t.content)
            .collect();
        assert_eq!(answers, vec!["one", "two", "one"]);
    }

    #[tokio::test]
    async fn voice_questions_flow_through_ask() {
        let client = MockAnalysisClient::new().with_answer("Yes, after 30 days.");
        let (workflow, gateway) = setup(&client);
        let gateway =
            gateway.with_speech(Arc::new(ScriptedSpeechInput::new().with_utterance("Am I covered?")));

        let reply = gateway.ask_by_voice().await.unwrap();

        assert!(matches!(reply, ChatReply::Answered(_)));
        assert_eq!(client.questions(), vec!["Am I covered?"]);
        assert_eq!(contents(&workflow)[1], "Am I covered?");
    }

    #[tokio::test]
    async fn voice_is_unavailable_unless_enabled() {
        let client = MockAnalysisClient::new();
        let (_workflow, gateway) = setup(&client);
        assert_eq!(gateway.ask_by_voice().await, Err(ChatError::VoiceUnavailable));

        let workflow = Arc::new(AnalysisWorkflow::new(
            Arc::new(client.clone()),
            WorkflowOptions::default(),
        ));
        let speech: Arc<dyn SpeechInput> = Arc::new(ScriptedSpeechInput::new().with_utterance("hi"));
        let disabled = ChatGateway::from_config(
            &ChatConfig::default(),
            workflow,
            Arc::new(client.clone()),
            Some(speech),
            TIMEOUT,
        );
        assert!(!disabled.voice_available());
    }

    #[tokio::test]
    async fn speech_errors_are_reported() {
        let client = MockAnalysisClient::new();
        let (workflow, gateway) = setup(&client);
        let gateway = gateway.with_speech(Arc::new(ScriptedSpeechInput::new()));

        assert_eq!(
            gateway.ask_by_voice().await,
            Err(ChatError::Voice(SpeechError::NothingRecognized))
        );
        assert_eq!(workflow.transcript().len(), 1);
    }
}
