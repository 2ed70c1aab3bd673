//! Best-effort replication of local mutations to the remote collaborator.
//!
//! Local state is always updated first. Events are queued on an unbounded
//! channel and applied in order by a background task; every remote failure is
//! logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pulse_types::api::{LoginRequest, SignupRequest, UpdateFeedbackRequest};
use pulse_types::{FeedbackRecord, MirrorEvent, Rating, Sentiment};
use reqwest::{Client, Response};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(#[from] reqwest::Error),

    #[error("remote answered with status {status}")]
    Status { status: u16 },

    #[error("unreadable remote payload: {0}")]
    Decode(String),

    #[error("mirror worker stopped")]
    WorkerStopped,
}

/// The remote collaborator as seen by the client core.
#[async_trait]
pub trait RemoteMirror: Send + Sync {
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, MirrorError>;

    async fn create_feedback(&self, record: &FeedbackRecord) -> Result<(), MirrorError>;

    async fn update_feedback(&self, id: &str, rating: Rating, text: &str) -> Result<(), MirrorError>;

    async fn delete_feedback(&self, id: &str) -> Result<(), MirrorError>;

    async fn sign_up(&self, request: &SignupRequest) -> Result<(), MirrorError>;

    async fn sign_in(&self, request: &LoginRequest) -> Result<(), MirrorError>;
}

/// `reqwest` client for the `/api` routes served by `cinemapulse-server`.
pub struct HttpMirror {
    client: Client,
    api_base: String,
}

impl HttpMirror {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, MirrorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }
}

fn check(response: Response) -> Result<Response, MirrorError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(MirrorError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl RemoteMirror for HttpMirror {
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, MirrorError> {
        let response = check(self.client.get(self.url("feedback")).send().await?)?;
        response
            .json()
            .await
            .map_err(|e| MirrorError::Decode(e.to_string()))
    }

    async fn create_feedback(&self, record: &FeedbackRecord) -> Result<(), MirrorError> {
        check(self.client.post(self.url("feedback")).json(record).send().await?)?;
        Ok(())
    }

    async fn update_feedback(&self, id: &str, rating: Rating, text: &str) -> Result<(), MirrorError> {
        let body = UpdateFeedbackRequest {
            rating: i64::from(rating.get()),
            text: text.to_string(),
            sentiment: Some(Sentiment::classify(rating)),
        };
        let url = self.url(&format!("feedback/{id}"));
        check(self.client.put(url).json(&body).send().await?)?;
        Ok(())
    }

    async fn delete_feedback(&self, id: &str) -> Result<(), MirrorError> {
        let url = self.url(&format!("feedback/{id}"));
        check(self.client.delete(url).send().await?)?;
        Ok(())
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<(), MirrorError> {
        check(self.client.post(self.url("signup")).json(request).send().await?)?;
        Ok(())
    }

    async fn sign_in(&self, request: &LoginRequest) -> Result<(), MirrorError> {
        check(self.client.post(self.url("login")).json(request).send().await?)?;
        Ok(())
    }
}

enum Command {
    Apply(MirrorEvent),
    Flush(oneshot::Sender<()>),
    Pull(oneshot::Sender<Result<Vec<FeedbackRecord>, MirrorError>>),
}

/// Sender side of the mirror queue, owned by the app.
pub struct MirrorHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl MirrorHandle {
    /// Start the worker on the current tokio runtime. Returns `None` outside
    /// a runtime; the app then runs without a mirror.
    pub fn spawn(remote: Arc<dyn RemoteMirror>) -> Option<Self> {
        let runtime = tokio::runtime::Handle::try_current().ok()?;
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_worker(remote, rx));
        Some(Self { tx })
    }

    /// Queue `event`. A stopped worker makes this a no-op.
    pub fn send(&self, event: MirrorEvent) {
        debug!(kind = event.kind(), "mirror event queued");
        let _ = self.tx.send(Command::Apply(event));
    }

    /// Wait until everything queued so far has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Fetch the remote feedback list once every event queued before this
    /// call has been attempted.
    pub async fn pull(&self) -> Result<Vec<FeedbackRecord>, MirrorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Pull(reply_tx))
            .map_err(|_| MirrorError::WorkerStopped)?;
        reply_rx.await.map_err(|_| MirrorError::WorkerStopped)?
    }
}

async fn run_worker(remote: Arc<dyn RemoteMirror>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Apply(event) => {
                let kind = event.kind();
                if let Err(e) = apply(remote.as_ref(), event).await {
                    warn!(kind, "Mirror update dropped: {}", e);
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
            Command::Pull(reply) => {
                let _ = reply.send(remote.list_feedback().await);
            }
        }
    }
    debug!("mirror worker stopped");
}

async fn apply(remote: &dyn RemoteMirror, event: MirrorEvent) -> Result<(), MirrorError> {
    match event {
        MirrorEvent::FeedbackCreated(record) => remote.create_feedback(&record).await,
        MirrorEvent::FeedbackUpdated { id, rating, text } => {
            remote.update_feedback(&id, rating, &text).await
        }
        MirrorEvent::FeedbackDeleted { id } => remote.delete_feedback(&id).await,
        MirrorEvent::SignedUp(request) => remote.sign_up(&request).await,
        MirrorEvent::SignedIn(request) => remote.sign_in(&request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    impl Recorder {
        fn record(&self, what: String) -> Result<(), MirrorError> {
            self.seen.lock().unwrap().push(what);
            if self.fail {
                Err(MirrorError::Status { status: 503 })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RemoteMirror for Recorder {
        async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>, MirrorError> {
            self.record("list".into())?;
            Ok(Vec::new())
        }
        async fn create_feedback(&self, record: &FeedbackRecord) -> Result<(), MirrorError> {
            self.record(format!("create {}", record.id))
        }
        async fn update_feedback(&self, id: &str, rating: Rating, _: &str) -> Result<(), MirrorError> {
            self.record(format!("update {id} {rating}"))
        }
        async fn delete_feedback(&self, id: &str) -> Result<(), MirrorError> {
            self.record(format!("delete {id}"))
        }
        async fn sign_up(&self, request: &SignupRequest) -> Result<(), MirrorError> {
            self.record(format!("signup {}", request.email))
        }
        async fn sign_in(&self, request: &LoginRequest) -> Result<(), MirrorError> {
            self.record(format!("login {}", request.email))
        }
    }

    fn update(id: &str, rating: i64) -> MirrorEvent {
        MirrorEvent::FeedbackUpdated {
            id: id.into(),
            rating: Rating::new(rating).unwrap(),
            text: "x".into(),
        }
    }

    #[tokio::test]
    async fn events_applied_in_order() {
        let remote = Arc::new(Recorder::default());
        let handle = MirrorHandle::spawn(remote.clone()).unwrap();
        handle.send(update("a", 5));
        handle.send(MirrorEvent::FeedbackDeleted { id: "a".into() });
        handle.send(update("b", 2));
        handle.flush().await;
        assert_eq!(
            *remote.seen.lock().unwrap(),
            vec!["update a 5", "delete a", "update b 2"]
        );
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_worker() {
        let remote = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let handle = MirrorHandle::spawn(remote.clone()).unwrap();
        handle.send(MirrorEvent::FeedbackDeleted { id: "1".into() });
        handle.send(MirrorEvent::FeedbackDeleted { id: "2".into() });
        handle.flush().await;
        assert_eq!(remote.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pull_waits_for_queued_events() {
        let remote = Arc::new(Recorder::default());
        let handle = MirrorHandle::spawn(remote.clone()).unwrap();
        handle.send(update("a", 4));
        handle.send(MirrorEvent::FeedbackDeleted { id: "b".into() });
        assert!(handle.pull().await.unwrap().is_empty());
        assert_eq!(
            *remote.seen.lock().unwrap(),
            vec!["update a 4", "delete b", "list"]
        );
    }

    #[test]
    fn spawn_outside_runtime_is_none() {
        assert!(MirrorHandle::spawn(Arc::new(Recorder::default())).is_none());
    }

    #[test]
    fn http_mirror_trims_trailing_slash() {
        let mirror = HttpMirror::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(mirror.url("feedback"), "http://localhost:5000/api/feedback");
    }
}
