//! End-to-end turn orchestration against a scripted completion client.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use dc_domain::chat::{Role, ToolCall};
use dc_domain::config::Config;
use dc_domain::error::{Error, Result};
use dc_providers::{ChatRequest, ChatResponse, CompletionClient};
use dc_retrieval::{Passage, Retriever, NO_RESULTS};
use dc_runtime::{run_turn, Session, TurnEvent, TurnSink};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scripted doubles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct ScriptedClient {
    responses: Mutex<VecDeque<Result<ChatResponse>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<ChatResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().push(req.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("script exhausted".into())))
    }

    fn client_id(&self) -> &str {
        "scripted"
    }
}

struct StaticRetriever {
    passages: Vec<Passage>,
}

impl StaticRetriever {
    fn new(passages: &[(&str, &str)]) -> Arc<dyn Retriever> {
        Arc::new(Self {
            passages: passages
                .iter()
                .map(|(source, content)| Passage {
                    source: (*source).into(),
                    content: (*content).into(),
                })
                .collect(),
        })
    }
}

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    fn title(&self) -> &str {
        "static"
    }
    async fn search(&self, _query: &str) -> Result<Vec<Passage>> {
        Ok(self.passages.clone())
    }
}

struct RecordingSink {
    events: Vec<TurnEvent>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl TurnSink for RecordingSink {
    fn emit(&mut self, event: &TurnEvent) {
        self.events.push(event.clone());
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn text_response(content: &str) -> Result<ChatResponse> {
    Ok(ChatResponse {
        content: content.into(),
        tool_calls: Vec::new(),
        model: "test".into(),
        finish_reason: Some("stop".into()),
    })
}

fn tool_response(tool_name: &str, arguments: &str) -> Result<ChatResponse> {
    Ok(ChatResponse {
        content: String::new(),
        tool_calls: vec![ToolCall {
            call_id: "call_1".into(),
            tool_name: tool_name.into(),
            arguments: arguments.into(),
        }],
        model: "test".into(),
        finish_reason: Some("tool_calls".into()),
    })
}

fn session_with(
    history_dir: &std::path::Path,
    client: Arc<ScriptedClient>,
    retrievers: Vec<Arc<dyn Retriever>>,
) -> Session {
    let mut config = Config::default();
    config.agent.context_window = 2;
    config.history.dir = history_dir.to_path_buf();
    Session::new(Arc::new(config), client, retrievers).unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenarios
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn direct_answer_makes_one_call() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![text_response("Hello, study time!")]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);
    let mut sink = RecordingSink::new();

    let out = run_turn(&mut session, "hi", &mut sink).await;

    assert_eq!(out, "Hello, study time!");
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].tools.is_empty());
    assert_eq!(
        sink.events,
        vec![TurnEvent::Final {
            content: "Hello, study time!".into(),
            is_error: false,
        }]
    );
}

#[tokio::test]
async fn tool_turn_resolves_dedups_and_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        tool_response("search_documents", r#"{"query": "osmosis"}"#),
        text_response("Osmosis is the passive movement of water. [bio/notes]"),
    ]);
    let retrievers = vec![
        StaticRetriever::new(&[
            ("bio/notes", "Osmosis moves water across membranes."),
            ("bio/notes", "Osmosis moves water across membranes."),
            ("bio/slides", "Diffusion spreads molecules."),
            ("bio/extra", "A third passage past the window."),
        ]),
    ];
    let mut session = session_with(dir.path(), Arc::clone(&client), retrievers);
    let mut sink = RecordingSink::new();

    let out = run_turn(&mut session, "what is osmosis?", &mut sink).await;

    assert_eq!(out, "Osmosis is the passive movement of water. [bio/notes]");
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    // second request carries the tool result and offers no tools
    assert!(requests[1].tools.is_empty());
    let tool_msg = requests[1].messages.last().unwrap();
    assert_eq!(tool_msg.role, Role::Tool);
    assert_eq!(tool_msg.name.as_deref(), Some("search_documents"));
    // duplicate dropped, then cut to context_window = 2
    assert_eq!(
        tool_msg.content,
        "[bio/notes]: Osmosis moves water across membranes.\n\n\
         [bio/slides]: Diffusion spreads molecules."
    );

    assert!(matches!(sink.events[0], TurnEvent::ToolCall { .. }));
    assert!(matches!(sink.events[1], TurnEvent::ToolResult { .. }));
    assert!(matches!(
        sink.events[2],
        TurnEvent::Final { is_error: false, .. }
    ));
}

#[tokio::test]
async fn tool_calls_outrank_content_in_the_first_response() {
    let dir = tempfile::tempdir().unwrap();
    let mut first = tool_response("search_documents", r#"{"query": "q"}"#).unwrap();
    first.content = "premature answer".into();
    let client = ScriptedClient::new(vec![Ok(first), text_response("grounded answer")]);
    let retrievers = vec![StaticRetriever::new(&[("s", "passage")])];
    let mut session = session_with(dir.path(), Arc::clone(&client), retrievers);

    let out = run_turn(&mut session, "q", &mut dc_runtime::NullSink).await;

    assert_eq!(out, "grounded answer");
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn second_response_tool_calls_are_coerced_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut second = tool_response("search_documents", r#"{"query": "again"}"#).unwrap();
    second.content = "answer with leftover tool call".into();
    let client = ScriptedClient::new(vec![
        tool_response("search_documents", r#"{"query": "q"}"#),
        Ok(second),
    ]);
    let retrievers = vec![StaticRetriever::new(&[("s", "passage")])];
    let mut session = session_with(dir.path(), Arc::clone(&client), retrievers);

    let out = run_turn(&mut session, "q", &mut dc_runtime::NullSink).await;

    // content used, tool call ignored, never a third request
    assert_eq!(out, "answer with leftover tool call");
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn second_response_with_only_tool_calls_falls_back_to_apology() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        tool_response("search_documents", r#"{"query": "q"}"#),
        tool_response("search_documents", r#"{"query": "again"}"#),
    ]);
    let retrievers = vec![StaticRetriever::new(&[("s", "passage")])];
    let mut session = session_with(dir.path(), Arc::clone(&client), retrievers);

    let out = run_turn(&mut session, "q", &mut dc_runtime::NullSink).await;

    assert_eq!(out, "Sorry, I could not process the retrieved information this time.");
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn no_retrievers_hands_the_sentinel_to_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        tool_response("search_documents", r#"{"query": "q"}"#),
        text_response("I found nothing; please rephrase."),
    ]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);

    run_turn(&mut session, "q", &mut dc_runtime::NullSink).await;

    let requests = client.requests();
    assert_eq!(requests[1].messages.last().unwrap().content, NO_RESULTS);
}

#[tokio::test]
async fn unknown_tool_calls_are_skipped_but_the_turn_continues() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        tool_response("delete_everything", "{}"),
        text_response("carried on"),
    ]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);
    let mut sink = RecordingSink::new();

    let out = run_turn(&mut session, "q", &mut sink).await;

    assert_eq!(out, "carried on");
    // no tool events for the unrecognized call
    assert_eq!(sink.events.len(), 1);
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    // nothing was appended for the skipped call
    assert_eq!(
        requests[0].messages.len(),
        requests[1].messages.len()
    );
}

#[tokio::test]
async fn bad_tool_arguments_end_the_turn_as_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![tool_response("search_documents", "not json")]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);
    let mut sink = RecordingSink::new();

    let out = run_turn(&mut session, "q", &mut sink).await;

    assert!(out.starts_with("Error: "));
    assert!(matches!(
        sink.events.last().unwrap(),
        TurnEvent::Final { is_error: true, .. }
    ));
    // only one completion call happened
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn transport_failure_ends_the_turn_but_not_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        Err(Error::Timeout("deadline exceeded".into())),
        text_response("recovered on the next turn"),
    ]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);

    let first = run_turn(&mut session, "q1", &mut dc_runtime::NullSink).await;
    assert!(first.starts_with("Error: "));

    let second = run_turn(&mut session, "q2", &mut dc_runtime::NullSink).await;
    assert_eq!(second, "recovered on the next turn");
}

#[tokio::test]
async fn empty_content_without_tool_calls_falls_back_to_apology() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![text_response("   ")]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);

    let out = run_turn(&mut session, "q", &mut dc_runtime::NullSink).await;

    assert_eq!(out, "Sorry, I could not produce an answer this time.");
}

#[tokio::test]
async fn requests_window_to_the_last_five_messages() {
    let dir = tempfile::tempdir().unwrap();
    let responses = (0..6).map(|i| text_response(&format!("a{i}"))).collect();
    let client = ScriptedClient::new(responses);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);

    for i in 0..6 {
        run_turn(&mut session, &format!("u{i}"), &mut dc_runtime::NullSink).await;
    }

    let requests = client.requests();
    let last = requests.last().unwrap();
    // system prompt plus the five-message window
    assert_eq!(last.messages.len(), 6);
    assert_eq!(last.messages[0].role, Role::System);
    // the window ends with the user message that started this turn
    assert_eq!(last.messages[5].content, "u5");
    assert_eq!(last.messages[4].content, "a4");
}

#[tokio::test]
async fn turns_persist_the_full_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![text_response("answer")]);
    let mut session = session_with(dir.path(), Arc::clone(&client), vec![]);
    let agent_id = session.agent_id.clone();

    run_turn(&mut session, "question", &mut dc_runtime::NullSink).await;

    let store = dc_history::HistoryStore::new(dir.path());
    let saved = store.load(&agent_id).unwrap();
    // welcome + user + assistant
    assert_eq!(saved.len(), 3);
    assert_eq!(saved[0].role, Role::Assistant);
    assert_eq!(saved[1].content, "question");
    assert_eq!(saved[2].content, "answer");
}

#[tokio::test]
async fn tool_turns_persist_no_tool_messages() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![
        tool_response("search_documents", r#"{"query": "osmosis"}"#),
        text_response("grounded answer"),
    ]);
    let retrievers = vec![StaticRetriever::new(&[("bio/notes", "a passage")])];
    let mut session = session_with(dir.path(), Arc::clone(&client), retrievers);
    let agent_id = session.agent_id.clone();

    run_turn(&mut session, "what is osmosis?", &mut dc_runtime::NullSink).await;

    // the tool result rode in the second request but never into history
    let store = dc_history::HistoryStore::new(dir.path());
    let saved = store.load(&agent_id).unwrap();
    assert_eq!(saved.len(), 3);
    assert!(saved
        .iter()
        .all(|m| matches!(m.role, Role::User | Role::Assistant)));
    assert_eq!(saved[1].content, "what is osmosis?");
    assert_eq!(saved[2].content, "grounded answer");
}

#[tokio::test]
async fn fresh_session_starts_with_the_welcome_message() {
    let dir = tempfile::tempdir().unwrap();
    let client = ScriptedClient::new(vec![]);
    let session = session_with(dir.path(), client, vec![]);
    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].role, Role::Assistant);
    assert!(session.messages[0].content.contains("Tutor"));
}
