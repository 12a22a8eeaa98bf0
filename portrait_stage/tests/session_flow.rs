//! Integration tests for persisted stage sessions.
//!
//! These tests verify that:
//! - a new session is initialized and saved immediately
//! - only eligible messages are persisted
//! - a reopened session resumes with its stored speakers and balance

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use portrait_core::{AnnotatorConfig, Entity, IncomingMessage, TurnOutcome};
use portrait_stage::{
    Error, JsonFileStateStore, MemoryStateStore, StageManager, StateStore, StoredState,
    parse_transcript,
};
use uuid::Uuid;

/// Memory store whose saves can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStateStore,
    fail_saves: AtomicBool,
}

#[async_trait]
impl StateStore for FlakyStore {
    async fn load(&self, id: &Uuid) -> anyhow::Result<Option<StoredState>> {
        self.inner.load(id).await
    }

    async fn save(&self, id: &Uuid, stored: &StoredState) -> anyhow::Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.save(id, stored).await
    }

    async fn clear(&self, id: &Uuid) -> anyhow::Result<bool> {
        self.inner.clear(id).await
    }

    async fn list(&self) -> anyhow::Result<Vec<Uuid>> {
        self.inner.list().await
    }
}

fn config() -> AnnotatorConfig {
    AnnotatorConfig::default()
        .with_characters(vec![
            Entity::new("Ankha", "ankha.png"),
            Entity::new("Blair", "blair.png"),
            Entity::new("Tracer", "tracer.png").with_aliases(["Lena", "Oxton"]),
        ])
        .with_fallback_to_author(true)
}

fn speaker_names(manager: &StageManager<impl StateStore>) -> Vec<String> {
    manager
        .view_model()
        .speakers
        .into_iter()
        .map(|e| e.name)
        .collect()
}

#[tokio::test]
async fn new_session_is_saved_on_open() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStateStore::new());
    let id = Uuid::now_v7();

    let manager = StageManager::new(&config(), Arc::clone(&store), id).await?;
    assert_eq!(manager.session_id(), id);
    assert_eq!(manager.stored().turns, 0);

    let stored = store.load(&id).await?;
    assert!(stored.is_some_and(|s| s.state.last_speakers.is_empty()));
    Ok(())
}

#[tokio::test]
async fn user_messages_are_not_persisted() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStateStore::new());
    let id = Uuid::now_v7();
    let mut manager = StageManager::new(&config(), Arc::clone(&store), id).await?;

    let outcome = manager
        .handle_message(&IncomingMessage::new("assistant", "Lena: C 300"))
        .await?;
    assert!(matches!(outcome, TurnOutcome::Updated(_)));

    let before = store.load(&id).await?;

    let outcome = manager
        .handle_message(&IncomingMessage::new("user", "Blair: C 1"))
        .await?;
    assert!(outcome.is_skipped());

    assert_eq!(store.load(&id).await?, before);
    assert_eq!(speaker_names(&manager), ["Tracer"]);
    assert_eq!(manager.view_model().balance_value, Some(300.0));
    Ok(())
}

#[tokio::test]
async fn transcript_replay_and_resume_from_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let id = Uuid::now_v7();

    let transcript = parse_transcript(
        r#"
{"role": "assistant", "text": "Ankha: Welcome.\nBlair: Your balance is C 1,500."}
{"role": "user", "text": "Ankha: I'd like to buy something."}
{"author": {"name": "Blair", "role": "assistant"}, "content": "She counts the coins."}
"#,
    )?;

    {
        let store = JsonFileStateStore::new(dir.path()).await?;
        let mut manager = StageManager::new(&config(), store, id).await?;
        let summary = manager.replay(&transcript).await?;

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(speaker_names(&manager), ["Blair"]);
        assert_eq!(manager.stored().turns, 2);
    }

    let store = JsonFileStateStore::new(dir.path()).await?;
    let manager = StageManager::resume(&config(), store, id).await?;
    assert_eq!(speaker_names(&manager), ["Blair"]);
    assert_eq!(manager.view_model().balance_value, Some(1500.0));
    assert_eq!(
        manager.view_model().balance_display().as_deref(),
        Some("C 1,500")
    );
    assert_eq!(manager.stored().turns, 2);
    Ok(())
}

#[tokio::test]
async fn resume_unknown_session_fails() -> anyhow::Result<()> {
    let store = MemoryStateStore::new();
    let id = Uuid::now_v7();

    match StageManager::resume(&config(), store, id).await {
        Err(Error::SessionNotFound(missing)) => assert_eq!(missing, id),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("resume should fail for an unknown session"),
    }
    Ok(())
}

#[tokio::test]
async fn failed_save_leaves_session_unchanged() -> anyhow::Result<()> {
    let store = Arc::new(FlakyStore::default());
    let id = Uuid::now_v7();
    let mut manager = StageManager::new(&config(), Arc::clone(&store), id).await?;
    let message = IncomingMessage::new("assistant", "Ankha: C 40");

    store.fail_saves.store(true, Ordering::SeqCst);
    let result = manager.handle_message(&message).await;
    assert!(matches!(result, Err(Error::Store(_))));
    assert!(speaker_names(&manager).is_empty());
    assert_eq!(manager.view_model().balance_value, None);
    assert_eq!(manager.stored().turns, 0);

    store.fail_saves.store(false, Ordering::SeqCst);
    manager.handle_message(&message).await?;
    assert_eq!(speaker_names(&manager), ["Ankha"]);
    assert_eq!(manager.stored().turns, 1);
    assert_eq!(store.load(&id).await?.map(|s| s.turns), Some(1));
    Ok(())
}

#[tokio::test]
async fn resume_applies_lowered_cap() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStateStore::new());
    let id = Uuid::now_v7();

    {
        let mut manager = StageManager::new(&config(), Arc::clone(&store), id).await?;
        manager
            .handle_message(&IncomingMessage::new(
                "assistant",
                "Ankha: Hi.\nBlair: Hello.\nLena: Cheers!",
            ))
            .await?;
        assert_eq!(speaker_names(&manager), ["Ankha", "Blair", "Tracer"]);
    }

    let lowered = config().with_max_per_turn(1);
    let manager = StageManager::resume(&lowered, Arc::clone(&store), id).await?;
    assert_eq!(speaker_names(&manager), ["Ankha"]);
    Ok(())
}
