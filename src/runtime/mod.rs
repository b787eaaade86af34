//! Delivers lifecycle events to a [`ShellWorker`] the way a browser
//! does: one at a time, each awaited to completion before the next one
//! is taken off the queue.
mod state;
pub use state::WorkerState;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::worker::{
    CacheStorage, Clients, FetchRequest, FetchResponse, Lifecycle, Network, Notification,
    NotificationClickEvent, Notifications, Platform, PushEvent, ShellWorker, WindowClient,
    WorkerConfig,
};

const EVENT_QUEUE_SIZE: usize = 64;

/// Platform services supplied by the host. Lifecycle control belongs to
/// the runtime and is wired in by [`WorkerHandle::spawn`].
#[derive(Clone)]
pub struct Services {
    pub caches: Arc<dyn CacheStorage>,
    pub network: Arc<dyn Network>,
    pub notifications: Arc<dyn Notifications>,
    pub clients: Arc<dyn Clients>,
}

#[derive(Default)]
struct SkipWaiting(AtomicBool);

impl SkipWaiting {
    fn requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Lifecycle for SkipWaiting {
    async fn skip_waiting(&self) -> Result<()> {
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }
}

type Reply<T> = oneshot::Sender<Result<T>>;

enum WorkerEvent {
    Install(Reply<()>),
    Activate(Reply<Vec<String>>),
    Fetch(FetchRequest, Reply<FetchResponse>),
    Push(PushEvent, Reply<Notification>),
    NotificationClick(NotificationClickEvent, Reply<WindowClient>),
}

/// Cheap to clone handle used to deliver events to a running worker.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<WorkerEvent>,
    state: Arc<RwLock<WorkerState>>,
    skip_waiting: Arc<SkipWaiting>,
}

impl WorkerHandle {
    /// Start a worker on its own task. Must be called from within a
    /// tokio runtime.
    pub fn spawn(config: WorkerConfig, services: Services) -> Self {
        let skip_waiting = Arc::new(SkipWaiting::default());
        let platform = Platform {
            caches: services.caches,
            network: services.network,
            notifications: services.notifications,
            clients: services.clients,
            lifecycle: skip_waiting.clone(),
        };
        let state = Arc::new(RwLock::new(WorkerState::Parsed));
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_SIZE);

        let dispatcher = Dispatcher {
            worker: ShellWorker::new(config, platform),
            state: Arc::clone(&state),
            rx,
        };
        tokio::spawn(dispatcher.run());

        Self {
            tx,
            state,
            skip_waiting,
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap()
    }

    async fn send<T>(&self, event: impl FnOnce(Reply<T>) -> WorkerEvent) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(event(reply))
            .await
            .map_err(|_| anyhow!("Worker runtime has stopped"))?;
        rx.await
            .map_err(|_| anyhow!("Worker runtime dropped the event"))?
    }

    pub async fn install(&self) -> Result<()> {
        self.send(WorkerEvent::Install).await
    }

    /// Activate an installed worker. Returns the stale caches it
    /// deleted.
    pub async fn activate(&self) -> Result<Vec<String>> {
        self.send(WorkerEvent::Activate).await
    }

    /// Install, then activate straight away if the worker asked to skip
    /// waiting. Registering an already active worker is a no-op, and a
    /// worker left installed by a failed activation goes straight back
    /// to activating.
    pub async fn register(&self) -> Result<WorkerState> {
        match self.state() {
            WorkerState::Activated => return Ok(WorkerState::Activated),
            WorkerState::Installed => {}
            _ => self.install().await?,
        }
        if self.skip_waiting.requested() {
            self.activate().await?;
        }
        Ok(self.state())
    }

    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.send(|reply| WorkerEvent::Fetch(request, reply)).await
    }

    pub async fn push(&self, data: Option<Vec<u8>>) -> Result<Notification> {
        self.send(|reply| WorkerEvent::Push(PushEvent { data }, reply))
            .await
    }

    pub async fn notification_click(
        &self,
        notification: Notification,
        action: Option<String>,
    ) -> Result<WindowClient> {
        let event = NotificationClickEvent {
            notification,
            action,
        };
        self.send(|reply| WorkerEvent::NotificationClick(event, reply))
            .await
    }
}

struct Dispatcher {
    worker: ShellWorker,
    state: Arc<RwLock<WorkerState>>,
    rx: mpsc::Receiver<WorkerEvent>,
}

impl Dispatcher {
    async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.dispatch(event).await;
        }
        tracing::debug!("All worker handles dropped, stopping dispatch");
    }

    // The receiver may have given up waiting, there's nobody to tell
    // if the reply can't be delivered.
    async fn dispatch(&self, event: WorkerEvent) {
        match event {
            WorkerEvent::Install(reply) => {
                let _ = reply.send(self.install().await);
            }
            WorkerEvent::Activate(reply) => {
                let _ = reply.send(self.activate().await);
            }
            WorkerEvent::Fetch(request, reply) => {
                let _ = reply.send(self.fetch(request).await);
            }
            WorkerEvent::Push(event, reply) => {
                let result = match self.require_active() {
                    Ok(()) => self.worker.on_push(event).await,
                    Err(err) => Err(err),
                };
                let _ = reply.send(result);
            }
            WorkerEvent::NotificationClick(event, reply) => {
                let result = match self.require_active() {
                    Ok(()) => self.worker.on_notification_click(event).await,
                    Err(err) => Err(err),
                };
                let _ = reply.send(result);
            }
        }
    }

    fn state(&self) -> WorkerState {
        *self.state.read().unwrap()
    }

    fn set_state(&self, next: WorkerState) {
        let mut state = self.state.write().unwrap();
        tracing::info!("Worker {} -> {}", *state, next);
        *state = next;
    }

    fn require_active(&self) -> Result<()> {
        let state = self.state();
        if !state.controls_pages() {
            return Err(anyhow!("No active worker, current state is {}", state));
        }
        Ok(())
    }

    async fn install(&self) -> Result<()> {
        let state = self.state();
        if state != WorkerState::Parsed {
            return Err(anyhow!("Can't install a worker that is {}", state));
        }

        self.set_state(WorkerState::Installing);
        match self.worker.on_install().await {
            Ok(()) => {
                self.set_state(WorkerState::Installed);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Install failed: {}", err);
                self.set_state(WorkerState::Redundant);
                Err(err)
            }
        }
    }

    async fn activate(&self) -> Result<Vec<String>> {
        let state = self.state();
        if state != WorkerState::Installed {
            return Err(anyhow!("Can't activate a worker that is {}", state));
        }

        self.set_state(WorkerState::Activating);
        match self.worker.on_activate().await {
            Ok(deleted) => {
                self.set_state(WorkerState::Activated);
                Ok(deleted)
            }
            Err(err) => {
                // Stays installed so activation can be retried later
                tracing::error!("Activation failed: {}", err);
                self.set_state(WorkerState::Installed);
                Err(err)
            }
        }
    }

    /// Pages are only controlled once activation has finished, until then
    /// requests go straight to the network.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        if self.state().controls_pages() {
            self.worker.on_fetch(request).await
        } else {
            self.worker.platform().network.fetch(&request).await
        }
    }
}
