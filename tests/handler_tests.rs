//! Tests for the dialog engine and the messaging gateway seam

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use helpdesk_dialog::{
    replies, DialogEngine, DialogError, DialogResult, InboundMessage, MessageGateway,
    OutboundReply, SessionQuery, SessionQueryHandler, SessionQueryResult, SessionStore, Stage,
    TopicCode,
};

/// Gateway double that records every delivered reply
#[derive(Default)]
struct RecordingGateway {
    sent: Mutex<Vec<OutboundReply>>,
}

impl RecordingGateway {
    async fn sent(&self) -> Vec<OutboundReply> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageGateway for RecordingGateway {
    async fn deliver(&self, reply: &OutboundReply) -> DialogResult<()> {
        self.sent.lock().await.push(reply.clone());
        Ok(())
    }
}

/// Gateway double that always fails delivery
struct FailingGateway;

#[async_trait]
impl MessageGateway for FailingGateway {
    async fn deliver(&self, _reply: &OutboundReply) -> DialogResult<()> {
        Err(DialogError::Delivery("gateway unreachable".to_string()))
    }
}

fn engine_with_recording() -> (DialogEngine, Arc<RecordingGateway>, Arc<SessionStore>) {
    let store = Arc::new(SessionStore::new());
    let gateway = Arc::new(RecordingGateway::default());
    let engine = DialogEngine::new(store.clone(), gateway.clone());
    (engine, gateway, store)
}

fn text(user: &str, body: &str) -> InboundMessage {
    InboundMessage::new(user, body)
}

#[tokio::test]
async fn test_full_conversation_scenario() {
    let (engine, gateway, store) = engine_with_recording();
    let user = "5599000000001";

    // First contact: welcome prompt, session awaiting identification
    let outcome = engine
        .handle(text(user, "Meu nome é Carlos, CPF 123"))
        .await
        .unwrap();
    assert_eq!(
        outcome.session.as_ref().map(|s| s.stage),
        Some(Stage::AwaitProfile)
    );
    assert_eq!(outcome.reply.as_ref().map(|r| r.body.as_str()), Some(replies::WELCOME));

    // Identification captured, menu sent
    let outcome = engine
        .handle(text(user, "Carlos Silva, CPF 123, PM, 1º BPM"))
        .await
        .unwrap();
    assert_eq!(
        outcome.session.as_ref().map(|s| s.stage),
        Some(Stage::AwaitTopic)
    );

    // Topic 2: deadlines guidance
    let outcome = engine.handle(text(user, "2")).await.unwrap();
    let session = outcome.session.unwrap();
    assert_eq!(session.stage, Stage::InTopic);
    assert_eq!(session.topic, Some(TopicCode::parse("2").unwrap()));
    assert_eq!(
        outcome.reply.map(|r| r.body),
        Some(replies::topic_reply(TopicCode::parse("2").unwrap()))
    );

    // Escalation
    let outcome = engine.handle(text(user, "atendente")).await.unwrap();
    assert_eq!(outcome.session.unwrap().stage, Stage::Human);
    assert_eq!(
        outcome.reply.map(|r| r.body).as_deref(),
        Some(replies::HANDOFF_ACK)
    );

    // Exactly one reply per turn went through the gateway, all to this user
    let sent = gateway.sent().await;
    assert_eq!(sent.len(), 4);
    assert!(sent.iter().all(|r| r.user_id == user));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_welcome_sent_exactly_once_per_session() {
    let (engine, gateway, _store) = engine_with_recording();
    let user = "5599000000002";

    engine.handle(text(user, "oi")).await.unwrap();
    engine.handle(text(user, "Maria, PJC")).await.unwrap();
    engine.handle(text(user, "tudo bem?")).await.unwrap();

    let sent = gateway.sent().await;
    let welcomes = sent.iter().filter(|r| r.body == replies::WELCOME).count();
    assert_eq!(welcomes, 1);
}

#[tokio::test]
async fn test_group_messages_are_silently_ignored() {
    let (engine, gateway, store) = engine_with_recording();

    let outcome = engine
        .handle(text("123456789@g.us", "1").group())
        .await
        .unwrap();

    assert!(outcome.ignored);
    assert!(outcome.reply.is_none());
    assert!(gateway.sent().await.is_empty());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_human_stage_is_idempotent() {
    let (engine, gateway, store) = engine_with_recording();
    let user = "5599000000003";

    engine.handle(text(user, "oi")).await.unwrap();
    engine.handle(text(user, "Ana, CBM")).await.unwrap();
    engine.handle(text(user, "0")).await.unwrap();

    // The same message twice while escalated: same state, one ack each time
    for _ in 0..2 {
        let outcome = engine.handle(text(user, "alguém aí?")).await.unwrap();
        assert_eq!(outcome.session.unwrap().stage, Stage::Human);
        assert_eq!(
            outcome.reply.map(|r| r.body).as_deref(),
            Some(replies::HUMAN_STAGE_ACK)
        );
    }
    assert_eq!(store.len().await, 1);

    let acks = gateway
        .sent()
        .await
        .iter()
        .filter(|r| r.body == replies::HUMAN_STAGE_ACK)
        .count();
    assert_eq!(acks, 2);
}

#[tokio::test]
async fn test_reset_deletes_session_and_restarts() {
    let (engine, _gateway, store) = engine_with_recording();
    let user = "5599000000004";

    engine.handle(text(user, "oi")).await.unwrap();
    engine.handle(text(user, "José, POLITEC")).await.unwrap();
    assert_eq!(store.len().await, 1);

    let outcome = engine.handle(text(user, "reiniciar")).await.unwrap();
    assert!(outcome.session.is_none());
    assert!(store.is_empty().await);

    // Next message is first contact again
    let outcome = engine.handle(text(user, "oi de novo")).await.unwrap();
    assert_eq!(
        outcome.session.map(|s| s.stage),
        Some(Stage::AwaitProfile)
    );
    assert_eq!(
        outcome.reply.map(|r| r.body).as_deref(),
        Some(replies::WELCOME)
    );
}

#[tokio::test]
async fn test_delivery_failure_does_not_roll_back_transition() {
    let store = Arc::new(SessionStore::new());
    let engine = DialogEngine::new(store.clone(), Arc::new(FailingGateway));
    let user = "5599000000005";

    let outcome = engine.handle(text(user, "oi")).await.unwrap();

    // The transition committed even though delivery failed
    assert_eq!(outcome.session.map(|s| s.stage), Some(Stage::AwaitProfile));
    assert_eq!(
        store.get(user).await.map(|s| s.stage),
        Some(Stage::AwaitProfile)
    );
}

#[tokio::test]
async fn test_empty_message_does_not_create_session() {
    let (engine, gateway, store) = engine_with_recording();

    let outcome = engine.handle(text("5599000000006", "   ")).await.unwrap();

    assert!(outcome.session.is_none());
    assert!(store.is_empty().await);
    assert_eq!(
        gateway.sent().await.first().map(|r| r.body.clone()).as_deref(),
        Some(replies::TEXT_ONLY_NOTICE)
    );
}

#[tokio::test]
async fn test_concurrent_users_do_not_interfere() {
    let (engine, _gateway, store) = engine_with_recording();
    let engine = Arc::new(engine);

    let a = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine.handle(text("5599000000007", "oi")).await.unwrap();
            engine.handle(text("5599000000007", "Ana, PM")).await.unwrap();
        })
    };
    let b = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine.handle(text("5599000000008", "oi")).await.unwrap();
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    assert_eq!(store.len().await, 2);
    assert_eq!(
        store.get("5599000000007").await.map(|s| s.stage),
        Some(Stage::AwaitTopic)
    );
    assert_eq!(
        store.get("5599000000008").await.map(|s| s.stage),
        Some(Stage::AwaitProfile)
    );
}

#[tokio::test]
async fn test_queries_reflect_store_contents() {
    let (engine, _gateway, store) = engine_with_recording();
    let queries = SessionQueryHandler::new(store);

    engine.handle(text("a", "oi")).await.unwrap();
    engine.handle(text("b", "oi")).await.unwrap();
    engine.handle(text("b", "Bruna, PJC")).await.unwrap();
    engine.handle(text("b", "0")).await.unwrap();

    let result = queries.execute(SessionQuery::GetPendingHandoffs).await;
    let SessionQueryResult::Sessions(handoffs) = result else {
        panic!("expected a session list");
    };
    assert_eq!(handoffs.len(), 1);
    assert_eq!(handoffs[0].user_id, "b");

    let result = queries.execute(SessionQuery::GetSessionStatistics).await;
    let SessionQueryResult::Statistics(stats) = result else {
        panic!("expected statistics");
    };
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.pending_handoffs, 1);
    assert!(stats.average_turn_count > 0.0);

    let result = queries
        .execute(SessionQuery::GetSessionByUser {
            user_id: "a".to_string(),
        })
        .await;
    let SessionQueryResult::Session(Some(session)) = result else {
        panic!("expected a session");
    };
    assert_eq!(session.stage, Stage::AwaitProfile);
}
