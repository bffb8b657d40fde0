use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    error::LogbookError,
    persist::Logbook,
    qso::{Contact, ContactDraft, ContactFilter, ContactPatch},
    types::ContactId,
};

use super::events::LogbookEvent;

/// Failure of a call made through [`LogbookHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The logbook rejected the operation.
    #[error(transparent)]
    Logbook(#[from] LogbookError),
    /// The worker has shut down.
    #[error("logbook worker is not running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_logbook`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable async front end; all calls are serialised onto one worker.
#[derive(Clone)]
pub struct LogbookHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LogbookEvent>,
}

enum Command {
    Create {
        draft: ContactDraft,
        resp: oneshot::Sender<Result<Contact, LogbookError>>,
    },
    Update {
        id: ContactId,
        patch: ContactPatch,
        resp: oneshot::Sender<Result<Contact, LogbookError>>,
    },
    Get {
        id: ContactId,
        resp: oneshot::Sender<Result<Contact, LogbookError>>,
    },
    List {
        filter: ContactFilter,
        resp: oneshot::Sender<Result<Vec<Contact>, LogbookError>>,
    },
    Delete {
        id: ContactId,
        resp: oneshot::Sender<Result<(), LogbookError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `logbook` onto a blocking worker and returns its handle.
///
/// Must be called from within a tokio runtime.
pub fn spawn_logbook(logbook: Logbook, config: RuntimeConfig) -> LogbookHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<LogbookEvent>(config.event_capacity.max(1));
    let events_tx_loop = events_tx.clone();

    tokio::task::spawn_blocking(move || {
        let mut logbook = logbook;
        while let Some(cmd) = cmd_rx.blocking_recv() {
            if handle_command(cmd, &mut logbook, &events_tx_loop) {
                break;
            }
        }
        log::debug!("logbook worker stopped");
    });

    LogbookHandle { cmd_tx, events_tx }
}

impl LogbookHandle {
    /// Subscribes to events for writes committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<LogbookEvent> {
        self.events_tx.subscribe()
    }

    /// See [`Logbook::create_contact`].
    pub async fn create_contact(&self, draft: ContactDraft) -> Result<Contact, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Create { draft, resp: tx }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// See [`Logbook::update_contact`].
    pub async fn update_contact(
        &self,
        id: ContactId,
        patch: ContactPatch,
    ) -> Result<Contact, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Update { id, patch, resp: tx }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// See [`Logbook::get_contact`].
    pub async fn get_contact(&self, id: ContactId) -> Result<Contact, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Get { id, resp: tx }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// See [`Logbook::list_contacts`].
    pub async fn list_contacts(&self, filter: ContactFilter) -> Result<Vec<Contact>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::List { filter, resp: tx }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// See [`Logbook::delete_contact`].
    pub async fn delete_contact(&self, id: ContactId) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Delete { id, resp: tx }).await?;
        Ok(rx.await.map_err(|_| RuntimeError::ChannelClosed)??)
    }

    /// Stops the worker after pending commands and closes the database.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    logbook: &mut Logbook,
    events_tx: &broadcast::Sender<LogbookEvent>,
) -> bool {
    match cmd {
        Command::Create { draft, resp } => {
            let res = logbook.create_contact(draft);
            if let Ok(contact) = &res {
                let _ = events_tx.send(LogbookEvent::ContactCreated { id: contact.id });
            }
            let _ = resp.send(res);
        }
        Command::Update { id, patch, resp } => {
            let res = logbook.update_contact(id, patch);
            if res.is_ok() {
                let _ = events_tx.send(LogbookEvent::ContactUpdated { id });
            }
            let _ = resp.send(res);
        }
        Command::Get { id, resp } => {
            let _ = resp.send(logbook.get_contact(id));
        }
        Command::List { filter, resp } => {
            let _ = resp.send(logbook.list_contacts(&filter));
        }
        Command::Delete { id, resp } => {
            let res = logbook.delete_contact(id);
            if res.is_ok() {
                let _ = events_tx.send(LogbookEvent::ContactDeleted { id });
            }
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
