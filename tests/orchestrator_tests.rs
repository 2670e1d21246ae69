//! End-to-end turn handling against a scripted provider.

mod common;

use std::sync::Arc;

use counselor::agent::{run_repl, ConversationHistory, Orchestrator, TurnOutcome, TurnState};
use counselor::cache::AccessCache;
use counselor::classifier::IntentLabel;
use counselor::config::AgentSettings;
use counselor::error::CounselError;
use counselor::prompts::{COUNSELOR_INSTRUCTION, REFUSAL_INSTRUCTION, SUMMARY_INSTRUCTION};
use counselor::strategy::{
    CasualStrategy, HelpOutcome, RefusalStrategy, ResponseStrategy, RetrievalStrategy,
};
use counselor::tools::{FetchAdviceTool, Summarizer, Tool, FETCH_ADVICE};
use counselor::types::{GenerationSettings, Role};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::MockProvider;

fn orchestrator_with(
    provider: &Arc<MockProvider>,
    settings: &AgentSettings,
    cache: Option<AccessCache>,
) -> Orchestrator {
    let corpus = Arc::new(common::scenario_corpus());
    let summarizer = Summarizer::new(provider.clone(), GenerationSettings::default());
    let mut tool = FetchAdviceTool::new(corpus, summarizer);
    if let Some(cache) = cache {
        tool = tool.with_access_cache(cache);
    }
    Orchestrator::new(provider.clone(), Arc::new(tool), settings)
}

fn orchestrator(provider: &Arc<MockProvider>) -> Orchestrator {
    orchestrator_with(provider, &AgentSettings::default(), None)
}

fn roles(agent: &Orchestrator) -> Vec<Role> {
    agent.history().messages().iter().map(|m| m.role).collect()
}

#[tokio::test]
async fn none_intent_replies_casually() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:None");
    provider.queue_response("Hey! How has your day been?");
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_turn("hi").await.unwrap();
    match outcome {
        TurnOutcome::Replied { intent, reply, help } => {
            assert_eq!(intent, IntentLabel::None);
            assert_eq!(reply, "Hey! How has your day been?");
            assert!(help.is_none());
        }
        other => panic!("expected reply, got {other:?}"),
    }
    assert_eq!(roles(&agent), vec![Role::User, Role::Assistant]);
    assert_eq!(agent.state(), TurnState::AwaitingInput);

    let requests = provider.requests();
    assert_eq!(requests[1].system_instruction.as_deref(), Some(COUNSELOR_INSTRUCTION));
    assert_eq!(requests[1].messages.len(), 1);
    assert!(requests[1].tools.is_none());
}

#[tokio::test]
async fn fallback_intent_apologizes_and_keeps_reply() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:Fallback");
    provider.queue_response("Sorry, I can't help with homework.");
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_turn("solve this integral for me").await.unwrap();
    assert_eq!(outcome.reply(), Some("Sorry, I can't help with homework."));
    assert!(matches!(
        outcome,
        TurnOutcome::Replied { intent: IntentLabel::Fallback, .. }
    ));
    assert_eq!(roles(&agent), vec![Role::User, Role::Assistant]);
    assert_eq!(
        provider.requests()[1].system_instruction.as_deref(),
        Some(REFUSAL_INSTRUCTION)
    );
}

#[tokio::test]
async fn help_without_capability_call_leaves_history_to_casual_reply() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:Help");
    provider.queue_response("You sound stressed.");
    provider.queue_response("That sounds hard. What happened?");
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_turn("everything is going wrong").await.unwrap();
    match outcome {
        TurnOutcome::Replied { intent, reply, help } => {
            assert_eq!(intent, IntentLabel::Help);
            assert_eq!(reply, "That sounds hard. What happened?");
            assert!(matches!(help, Some(HelpOutcome::NoCapabilityCall)));
        }
        other => panic!("expected reply, got {other:?}"),
    }
    // Help added nothing; the casual reply is the only assistant turn.
    assert_eq!(roles(&agent), vec![Role::User, Role::Assistant]);
    assert_eq!(provider.request_count(), 3);

    let requests = provider.requests();
    let extraction = &requests[1];
    assert!(extraction.system_instruction.is_none());
    let tools = extraction.tools.as_ref().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, FETCH_ADVICE);
}

#[tokio::test]
async fn help_with_capability_call_augments_history() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::shared();
    provider.queue_response("Intent:Help");
    provider.queue_tool_call("call-1", FETCH_ADVICE, json!({"keywords": ["anxious"]}));
    provider.queue_response("Slow breathing helps.");
    provider.queue_response("Have you tried slow breathing before your exams?");
    let mut agent = orchestrator_with(
        &provider,
        &AgentSettings::default(),
        Some(AccessCache::new(dir.path())),
    );

    let outcome = agent.handle_turn("I feel anxious all the time").await.unwrap();
    let TurnOutcome::Replied { reply, help, .. } = outcome else {
        panic!("expected reply");
    };
    assert_eq!(reply, "Have you tried slow breathing before your exams?");
    match help {
        Some(HelpOutcome::Augmented { call, result }) => {
            assert_eq!(call.id, "call-1");
            assert_eq!(result, json!({"results": "Slow breathing helps."}));
        }
        other => panic!("expected augmented help, got {other:?}"),
    }

    assert_eq!(
        roles(&agent),
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
    let messages = agent.history().messages();
    assert_eq!(messages[1].tool_calls()[0].name, FETCH_ADVICE);
    let result = messages[2].tool_results()[0];
    assert_eq!(result.call_id, "call-1");
    assert_eq!(result.result, json!({"results": "Slow breathing helps."}));

    let requests = provider.requests();
    assert_eq!(requests.len(), 4);
    // Summarization sees the joined responses of the matches only.
    assert_eq!(requests[2].system_instruction.as_deref(), Some(SUMMARY_INSTRUCTION));
    assert_eq!(requests[2].messages[0].text_content(), "Try breathing exercises");
    // The final reply is generated over the augmented history.
    assert_eq!(requests[3].messages.len(), 3);
    assert_eq!(requests[3].messages[2].role, Role::Tool);

    let mut entries = std::fs::read_dir(dir.path()).unwrap();
    let cache_file = entries.next().unwrap().unwrap().path();
    assert!(entries.next().is_none());
    let batches = AccessCache::read_batches(&cache_file).await.unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].records[0].index, 0);
}

#[tokio::test]
async fn help_with_every_matching_record_joins_responses() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:Help");
    provider.queue_tool_call("c", FETCH_ADVICE, json!({"keywords": ["stress", "anxious"]}));
    provider.queue_response("summary");
    provider.queue_response("reply");
    let mut agent = orchestrator(&provider);

    agent.handle_turn("work and exams are too much").await.unwrap();
    assert_eq!(
        provider.requests()[2].messages[0].text_content(),
        "Try breathing exercises Consider talking to a counselor"
    );
}

#[tokio::test]
async fn help_with_no_matching_records_skips_summary() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:Help");
    provider.queue_tool_call("c", FETCH_ADVICE, json!({"keywords": ["lonely"]}));
    provider.queue_response("I'm here with you.");
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_turn("I feel lonely").await.unwrap();
    let TurnOutcome::Replied { reply, help, .. } = outcome else {
        panic!("expected reply");
    };
    assert_eq!(reply, "I'm here with you.");
    assert!(matches!(help, Some(HelpOutcome::NoMatches { .. })));
    assert_eq!(roles(&agent), vec![Role::User, Role::Assistant]);
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn help_failures_are_absorbed() {
    // Malformed arguments, an unknown capability and a service error all
    // degrade to a plain casual reply.
    let scripts: Vec<Box<dyn Fn(&MockProvider)>> = vec![
        Box::new(|p: &MockProvider| p.queue_tool_call("c", FETCH_ADVICE, json!({"keywords": [1, 2]}))),
        Box::new(|p: &MockProvider| p.queue_tool_call("c", FETCH_ADVICE, json!({"keywords": []}))),
        Box::new(|p: &MockProvider| p.queue_tool_call("c", "deleteEverything", json!({}))),
        Box::new(|p: &MockProvider| p.queue_error(CounselError::api(500, "backend unavailable"))),
    ];

    for script in scripts {
        let provider = MockProvider::shared();
        provider.queue_response("Intent:Help");
        script(&provider);
        provider.queue_response("Tell me more.");
        let mut agent = orchestrator(&provider);

        let outcome = agent.handle_turn("I need advice").await.unwrap();
        let TurnOutcome::Replied { reply, help, .. } = outcome else {
            panic!("expected reply");
        };
        assert_eq!(reply, "Tell me more.");
        assert!(help.as_ref().is_some_and(HelpOutcome::is_failed), "got {help:?}");
        assert_eq!(roles(&agent), vec![Role::User, Role::Assistant]);
        assert_eq!(provider.remaining(), 0);
    }
}

#[tokio::test]
async fn unrecognized_label_produces_no_reply() {
    let provider = MockProvider::shared();
    provider.queue_response("I am not sure what this is.");
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_turn("asdfgh").await.unwrap();
    match outcome {
        TurnOutcome::Unrouted { raw } => assert_eq!(raw, "I am not sure what this is."),
        other => panic!("expected unrouted, got {other:?}"),
    }
    assert_eq!(roles(&agent), vec![Role::User]);
    assert_eq!(agent.state(), TurnState::AwaitingInput);
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn classifier_error_propagates_and_agent_stays_usable() {
    let provider = MockProvider::shared();
    provider.queue_error(CounselError::Authentication("invalid key".into()));
    provider.queue_response("Intent:None");
    provider.queue_response("Hello again.");
    let mut agent = orchestrator(&provider);

    let err = agent.handle_turn("hi").await.unwrap_err();
    assert!(matches!(err, CounselError::Authentication(_)));
    assert_eq!(agent.state(), TurnState::AwaitingInput);
    assert_eq!(roles(&agent), vec![Role::User]);

    let outcome = agent.handle_turn("hi?").await.unwrap();
    assert_eq!(outcome.reply(), Some("Hello again."));
}

#[tokio::test]
async fn context_window_bounds_strategy_requests() {
    let provider = MockProvider::shared();
    for reply in ["first reply", "second reply", "third reply"] {
        provider.queue_response("Intent:None");
        provider.queue_response(reply);
    }
    let settings = AgentSettings {
        context_window: 3,
        ..AgentSettings::default()
    };
    let mut agent = orchestrator_with(&provider, &settings, None);

    agent.handle_turn("one").await.unwrap();
    agent.handle_turn("two").await.unwrap();
    agent.handle_turn("three").await.unwrap();

    assert_eq!(agent.history().len(), 6);
    let last = provider.requests().pop().unwrap();
    let texts: Vec<String> = last.messages.iter().map(|m| m.text_content()).collect();
    assert_eq!(texts, vec!["two", "second reply", "three"]);
}

#[tokio::test]
async fn single_turn_window_keeps_help_reply_request_non_empty() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:Help");
    provider.queue_tool_call("c", FETCH_ADVICE, json!({"keywords": ["anxious"]}));
    provider.queue_response("Slow breathing helps.");
    provider.queue_response("Try a slow breath with me.");
    let settings = AgentSettings {
        context_window: 1,
        ..AgentSettings::default()
    };
    let mut agent = orchestrator_with(&provider, &settings, None);

    let outcome = agent.handle_turn("I feel anxious").await.unwrap();
    assert_eq!(outcome.reply(), Some("Try a slow breath with me."));

    let last = provider.requests().pop().unwrap();
    let request_roles: Vec<Role> = last.messages.iter().map(|m| m.role).collect();
    assert_eq!(request_roles, vec![Role::User, Role::Assistant, Role::Tool]);
    assert_eq!(last.messages[0].text_content(), "I feel anxious");
}

#[tokio::test]
async fn window_after_help_exchange_opens_on_user_turn() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:None");
    provider.queue_response("Hi, how are you?");
    provider.queue_response("Intent:Help");
    provider.queue_tool_call("c", FETCH_ADVICE, json!({"keywords": ["anxious"]}));
    provider.queue_response("Slow breathing helps.");
    provider.queue_response("Try slow breathing.");
    provider.queue_response("Intent:None");
    provider.queue_response("Glad to hear it.");
    let settings = AgentSettings {
        context_window: 4,
        ..AgentSettings::default()
    };
    let mut agent = orchestrator_with(&provider, &settings, None);

    agent.handle_turn("hello").await.unwrap();
    agent.handle_turn("I feel anxious").await.unwrap();
    agent.handle_turn("thanks, that helps").await.unwrap();

    // The last four turns are [call, tool, assistant, user]; the call turn
    // must not lead the request.
    let last = provider.requests().pop().unwrap();
    assert_eq!(last.messages.len(), 1);
    assert_eq!(last.messages[0].role, Role::User);
    assert!(last.messages.iter().all(|m| m.tool_calls().is_empty()));
}

#[tokio::test]
async fn help_skips_extraction_when_model_lacks_tools() {
    let provider = Arc::new(MockProvider::without_tools("text-only-model"));
    provider.queue_response("Intent:Help");
    provider.queue_response("That sounds hard.");
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_turn("I feel anxious").await.unwrap();
    let TurnOutcome::Replied { reply, help, .. } = outcome else {
        panic!("expected reply");
    };
    assert_eq!(reply, "That sounds hard.");
    assert!(matches!(help, Some(HelpOutcome::NoCapabilityCall)));
    assert_eq!(provider.request_count(), 2);
    assert!(provider.requests().iter().all(|r| r.tools.is_none()));
}

#[tokio::test]
async fn shutdown_command_terminates() {
    let provider = MockProvider::shared();
    let mut agent = orchestrator(&provider);

    let outcome = agent.handle_input("  /EXIT ").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Shutdown));
    assert!(agent.is_terminated());

    let err = agent.handle_turn("hello?").await.unwrap_err();
    assert!(matches!(err, CounselError::InvalidState(_)));
    assert_eq!(provider.request_count(), 0);
    assert!(agent.history().is_empty());
}

#[tokio::test]
async fn repl_prints_replies_until_exit() {
    let provider = MockProvider::shared();
    provider.queue_response("Intent:None");
    provider.queue_response("Hi there.");
    let mut agent = orchestrator(&provider);

    let input = "hello\n\n/quit\nnever read\n".as_bytes();
    let mut output = Vec::new();
    run_repl(&mut agent, input, &mut output).await.unwrap();

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("Assistant: Hi there.\n"), "got {printed:?}");
    assert!(printed.starts_with("User: "));
    assert!(agent.is_terminated());
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn repl_end_of_input_terminates() {
    let provider = MockProvider::shared();
    let mut agent = orchestrator(&provider);

    let mut output = Vec::new();
    run_repl(&mut agent, "".as_bytes(), &mut output).await.unwrap();

    assert!(agent.is_terminated());
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn strategies_share_one_interface() {
    let provider = MockProvider::shared();
    provider.queue_response("casual");
    provider.queue_response("sorry");
    provider.queue_response("no capability call");

    let settings = GenerationSettings::default();
    let summarizer = Summarizer::new(provider.clone(), settings.clone());
    let tool: Arc<dyn Tool> = Arc::new(FetchAdviceTool::new(
        Arc::new(common::scenario_corpus()),
        summarizer,
    ));
    let strategies: Vec<Box<dyn ResponseStrategy>> = vec![
        Box::new(CasualStrategy::new(provider.clone(), settings.clone())),
        Box::new(RefusalStrategy::new(provider.clone(), settings.clone())),
        Box::new(RetrievalStrategy::new(provider.clone(), tool, settings)),
    ];

    let mut history = ConversationHistory::new(0);
    history.push_user("hello");
    let mut replies = Vec::new();
    for strategy in &strategies {
        replies.push((strategy.name(), strategy.respond(&mut history).await.unwrap()));
    }

    assert_eq!(
        replies,
        vec![
            ("none", Some("casual".to_string())),
            ("fallback", Some("sorry".to_string())),
            ("help", None),
        ]
    );
    assert_eq!(history.len(), 3);
}
