use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use teloxide::types::{ChatId, MessageId};
use uuid::Uuid;

use quizsharebot::publish::{Publish, PublishError, PublishedQuiz};
use quizsharebot::registry::{QuizRecord, Registry, RegistryError};

const GROUP: ChatId = ChatId(-1001);

/// Mints a fresh token per publish, like Telegram does for every sent poll.
struct MintingPublisher {
    delay: Duration,
    sent: AtomicUsize,
}

impl MintingPublisher {
    fn new() -> Self {
        Self::slow(Duration::ZERO)
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            sent: AtomicUsize::new(0),
        }
    }

    fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl Publish for MintingPublisher {
    async fn publish(
        &self,
        _quiz: &QuizRecord,
        destination: ChatId,
    ) -> Result<PublishedQuiz, PublishError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let nth = self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(PublishedQuiz {
            token: Uuid::new_v4().to_string(),
            chat: destination,
            message: MessageId(nth as i32 + 1),
        })
    }
}

struct FailingPublisher;

impl Publish for FailingPublisher {
    async fn publish(
        &self,
        _quiz: &QuizRecord,
        _destination: ChatId,
    ) -> Result<PublishedQuiz, PublishError> {
        Err(PublishError::MissingPoll)
    }
}

fn quiz(owner: &str, question: &str, token: &str) -> QuizRecord {
    QuizRecord::new(
        owner.into(),
        question.into(),
        vec!["A".into(), "B".into(), "C".into()],
        1,
        token.into(),
    )
    .unwrap()
}

#[tokio::test]
async fn activation_rekeys_the_record() {
    let registry = Registry::new();
    let publisher = MintingPublisher::new();
    registry.register(quiz("u1", "Q1", "t1")).await.unwrap();

    let record = registry.activate("t1", &publisher, GROUP).await.unwrap();

    assert_ne!(record.token(), "t1");
    assert_eq!(record.owner(), "u1");
    let destination = record.destination().expect("destination set on launch");
    assert_eq!(destination.chat, GROUP);

    // The old token is gone from the index, the new one resolves.
    assert_eq!(registry.owner_of("t1").await, None);
    assert_eq!(
        registry.owner_of(record.token()).await.as_deref(),
        Some("u1")
    );

    // The directory serves the current token, not the registration-time one.
    let listed = registry.list_for_owner("u1").await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].token(), record.token());
}

#[tokio::test]
async fn stale_token_fails_after_activation() {
    let registry = Registry::new();
    let publisher = MintingPublisher::new();
    registry.register(quiz("u1", "Q1", "t1")).await.unwrap();

    let record = registry.activate("t1", &publisher, GROUP).await.unwrap();

    let err = registry.activate("t1", &publisher, GROUP).await.unwrap_err();
    assert!(matches!(err, RegistryError::UnknownToken(t) if t == "t1"));

    // The re-keyed token is still live and can be launched again.
    let relaunched = registry
        .activate(record.token(), &publisher, ChatId(-1002))
        .await
        .unwrap();
    assert_ne!(relaunched.token(), record.token());
    assert_eq!(relaunched.destination().unwrap().chat, ChatId(-1002));
}

#[tokio::test]
async fn unknown_token_on_empty_registry() {
    let registry = Registry::new();
    let publisher = MintingPublisher::new();

    let err = registry
        .activate("unknown-token", &publisher, GROUP)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownToken(_)));
    assert_eq!(publisher.sent(), 0);
}

#[tokio::test]
async fn failed_publish_leaves_state_unchanged() {
    let registry = Registry::new();
    registry.register(quiz("u1", "Q1", "t1")).await.unwrap();

    let err = registry
        .activate("t1", &FailingPublisher, GROUP)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::PublishFailed(_)));

    // Nothing was re-keyed; the quiz can still be launched.
    assert_eq!(registry.owner_of("t1").await.as_deref(), Some("u1"));
    let listed = registry.list_for_owner("u1").await;
    assert_eq!(listed[0].token(), "t1");
    assert_eq!(listed[0].destination(), None);

    let publisher = MintingPublisher::new();
    registry.activate("t1", &publisher, GROUP).await.unwrap();
}

#[tokio::test]
async fn racing_activations_yield_one_winner() {
    let registry = Registry::new();
    let publisher = MintingPublisher::slow(Duration::from_millis(20));
    registry.register(quiz("u1", "Q1", "t1")).await.unwrap();

    let (a, b) = tokio::join!(
        registry.activate("t1", &publisher, GROUP),
        registry.activate("t1", &publisher, ChatId(-1002)),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser.unwrap_err(), RegistryError::UnknownToken(_)));

    // The loser never reached the publish step.
    assert_eq!(publisher.sent(), 1);
}

#[tokio::test]
async fn directory_lists_all_quizzes_with_current_tokens() {
    let registry = Registry::new();
    let publisher = MintingPublisher::new();
    for i in 0..3 {
        registry
            .register(quiz("u1", &format!("Q{i}"), &format!("t{i}")))
            .await
            .unwrap();
    }

    let launched = registry.activate("t1", &publisher, GROUP).await.unwrap();

    let listed = registry.list_for_owner("u1").await;
    let questions: Vec<_> = listed.iter().map(QuizRecord::question).collect();
    assert_eq!(questions, ["Q0", "Q1", "Q2"]);
    assert_eq!(listed[0].token(), "t0");
    assert_eq!(listed[1].token(), launched.token());
    assert_eq!(listed[2].token(), "t2");
}
