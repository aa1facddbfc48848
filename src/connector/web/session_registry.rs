use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::ChatSession;
use crate::connector::api::Container;
use crate::domain::{ChatError, Exchange, TranscriptOrder};

/// Sessions untouched for this long are dropped by [`SessionRegistry::sweep_idle`].
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// What page views read: the transcript as of the last finished submit, plus
/// the failure message to show once.
#[derive(Default)]
struct SessionView {
    exchanges: Vec<Exchange>,
    last_error: Option<String>,
}

/// A browser's chat session.
///
/// The session itself is held for the whole of a submit, which may last as
/// long as the responder timeout. Readers never touch it: they read a snapshot
/// that is republished when each submit returns.
pub struct SessionEntry {
    session: Mutex<ChatSession>,
    view: RwLock<SessionView>,
}

impl SessionEntry {
    fn new(session: ChatSession) -> Self {
        Self {
            session: Mutex::new(session),
            view: RwLock::new(SessionView::default()),
        }
    }

    /// Submit on the underlying session, waiting for any submit already in
    /// flight, then publish the outcome to readers.
    ///
    /// A blank question clears the pending error; any other failure replaces it.
    pub async fn submit(&self, question: &str) -> Result<Exchange, ChatError> {
        let mut session = self.session.lock().await;
        let result = session.submit(question).await;

        let mut view = self.view.write().await;
        match &result {
            Ok(_) => {
                view.exchanges = session.transcript(TranscriptOrder::Chronological);
                view.last_error = None;
            }
            Err(ChatError::EmptyInput) => view.last_error = None,
            Err(e) => view.last_error = Some(e.to_string()),
        }

        result
    }

    /// Transcript as of the last finished submit. Does not wait for a submit in flight.
    pub async fn transcript(&self, order: TranscriptOrder) -> Vec<Exchange> {
        let view = self.view.read().await;
        match order {
            TranscriptOrder::Chronological => view.exchanges.clone(),
            TranscriptOrder::Reverse => view.exchanges.iter().rev().cloned().collect(),
        }
    }

    /// Take the pending failure message, so it is shown only once.
    pub async fn take_error(&self) -> Option<String> {
        self.view.write().await.last_error.take()
    }

    pub fn is_submitting(&self) -> bool {
        self.session.try_lock().is_err()
    }
}

pub type SharedSession = Arc<SessionEntry>;

struct Slot {
    entry: SharedSession,
    last_seen: Instant,
}

/// In-memory map from session cookie to [`SessionEntry`].
///
/// Different browsers proceed independently. Nothing is persisted; a restart
/// forgets every transcript, and sessions idle for longer than the idle
/// timeout are dropped by [`sweep_idle`](Self::sweep_idle).
pub struct SessionRegistry {
    container: Arc<Container>,
    sessions: RwLock<HashMap<String, Slot>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(container: Arc<Container>) -> Self {
        Self {
            container,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Look up the session for `id`, or start a new one under a fresh id.
    ///
    /// Returns the session id, the session, and whether it was just created
    /// (the caller then needs to set the cookie).
    pub async fn get_or_create(&self, id: Option<&str>) -> (String, SharedSession, bool) {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(slot) = sessions.get_mut(id) {
                slot.last_seen = Instant::now();
                return (id.to_string(), slot.entry.clone(), false);
            }
        }

        let id = Uuid::new_v4().to_string();
        let entry = Arc::new(SessionEntry::new(self.container.chat_session()));
        sessions.insert(
            id.clone(),
            Slot {
                entry: entry.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!("Started chat session {}", id);

        (id, entry, true)
    }

    /// Drop sessions idle for at least the idle timeout. A session with a
    /// submit in flight is kept. Returns how many were removed.
    pub async fn sweep_idle(&self) -> usize {
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();
        sessions.retain(|_, slot| {
            now.duration_since(slot.last_seen) < self.idle_timeout || slot.entry.is_submitting()
        });
        let removed = initial_count - sessions.len();

        if removed > 0 {
            info!("Dropped {} idle chat sessions", removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn container(&self) -> &Container {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockResponder;
    use crate::domain::{PersonaConfig, ResponderError};

    fn container(responder: MockResponder) -> Arc<Container> {
        Arc::new(Container::with_responder(
            PersonaConfig::mumbai_local(),
            Arc::new(responder),
        ))
    }

    fn registry() -> SessionRegistry {
        SessionRegistry::new(container(MockResponder::new()))
    }

    #[tokio::test]
    async fn test_known_id_returns_same_session() {
        let registry = registry();
        let (id, first, created) = registry.get_or_create(None).await;
        assert!(created);

        first.submit("hello").await.unwrap();

        let (same_id, again, created) = registry.get_or_create(Some(&id)).await;
        assert!(!created);
        assert_eq!(same_id, id);
        assert_eq!(again.transcript(TranscriptOrder::Reverse).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_starts_fresh_session() {
        let registry = registry();
        let (id, _, created) = registry.get_or_create(Some("stale-cookie")).await;

        assert!(created);
        assert_ne!(id, "stale-cookie");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_failure_is_taken_once() {
        let registry = SessionRegistry::new(container(
            MockResponder::new().failing_once_with(ResponderError::unavailable("offline")),
        ));
        let (_, entry, _) = registry.get_or_create(None).await;

        assert!(entry.submit("hello").await.is_err());
        assert!(entry.take_error().await.unwrap().contains("offline"));
        assert_eq!(entry.take_error().await, None);
        assert!(entry.transcript(TranscriptOrder::Reverse).await.is_empty());
    }

    #[tokio::test]
    async fn test_transcript_readable_during_submit() {
        let registry = SessionRegistry::new(container(MockResponder::new().with_delay_ms(2000)));
        let (_, entry, _) = registry.get_or_create(None).await;

        let writer = entry.clone();
        let handle = tokio::spawn(async move { writer.submit("slow one").await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(entry.is_submitting());

        let read = tokio::time::timeout(
            Duration::from_millis(500),
            entry.transcript(TranscriptOrder::Reverse),
        )
        .await;
        assert_eq!(read.unwrap().len(), 0);

        handle.await.unwrap().unwrap();
        assert_eq!(entry.transcript(TranscriptOrder::Reverse).await.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_drops_idle_sessions() {
        let registry = registry().with_idle_timeout(Duration::ZERO);
        for _ in 0..3 {
            registry.get_or_create(None).await;
        }
        assert_eq!(registry.len().await, 3);

        assert_eq!(registry.sweep_idle().await, 3);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_sessions() {
        let registry = registry();
        let (id, _, _) = registry.get_or_create(None).await;

        assert_eq!(registry.sweep_idle().await, 0);
        let (same_id, _, created) = registry.get_or_create(Some(&id)).await;
        assert!(!created);
        assert_eq!(same_id, id);
    }

    #[tokio::test]
    async fn test_sweep_keeps_session_with_submit_in_flight() {
        let registry = SessionRegistry::new(container(MockResponder::new().with_delay_ms(1000)))
            .with_idle_timeout(Duration::ZERO);
        let (_, entry, _) = registry.get_or_create(None).await;

        let writer = entry.clone();
        let handle = tokio::spawn(async move { writer.submit("still going").await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(registry.sweep_idle().await, 0);
        handle.await.unwrap().unwrap();
        assert_eq!(registry.sweep_idle().await, 1);
    }
}
