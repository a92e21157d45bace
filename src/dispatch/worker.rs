use crate::dispatch::protocol::{DispatchCommand, DispatcherSnapshot};
use crate::dispatch::state::GestureDispatcher;
use crate::error::{PageTurnerError, Result};
use crate::executor::CompletionNotifier;
use crate::input::Action;
use log::debug;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

/// Create the dispatcher command channel.
///
/// The handle is needed before the dispatcher exists so the executor can be
/// given a [`CompletionNotifier`].
pub fn channel() -> (DispatcherHandle, UnboundedReceiver<DispatchCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DispatcherHandle { tx }, rx)
}

/// Run the dispatcher actor until `Shutdown` arrives or the channel closes.
///
/// With `completion_timeout` set, a gesture still in flight after that long is
/// treated as cancelled.
pub async fn dispatcher_loop(
    mut rx: UnboundedReceiver<DispatchCommand>,
    mut dispatcher: GestureDispatcher,
    completion_timeout: Option<Duration>,
) {
    loop {
        let deadline = completion_timeout
            .and_then(|timeout| dispatcher.in_flight_since().map(|since| since + timeout));

        let cmd = match deadline {
            Some(deadline) => {
                tokio::select! {
                    cmd = rx.recv() => cmd,
                    _ = tokio::time::sleep_until(deadline.into()) => {
                        dispatcher.expire(Instant::now());
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        let Some(cmd) = cmd else {
            break;
        };

        match cmd {
            DispatchCommand::Request {
                action,
                received_at,
            } => {
                dispatcher.request(action, received_at, Instant::now());
            }
            DispatchCommand::GestureFinished {
                handle,
                outcome,
                at,
            } => {
                dispatcher.on_gesture_finished(handle, outcome, at);
            }
            DispatchCommand::Snapshot(reply) => {
                let _ = reply.send(dispatcher.snapshot());
            }
            DispatchCommand::Shutdown => break,
        }
    }

    dispatcher.shutdown();
    debug!("dispatcher loop exited");
}

/// Cloneable sender side of the dispatcher actor.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: UnboundedSender<DispatchCommand>,
}

impl DispatcherHandle {
    /// Forward a classified press. Never blocks.
    pub fn request(&self, action: Action, received_at: Instant) -> Result<()> {
        self.send(DispatchCommand::Request {
            action,
            received_at,
        })
    }

    pub fn notifier(&self) -> CompletionNotifier {
        CompletionNotifier::new(self.tx.clone())
    }

    pub async fn snapshot(&self) -> Result<DispatcherSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(DispatchCommand::Snapshot(reply_tx))?;
        reply_rx
            .await
            .map_err(|_| PageTurnerError::DispatcherUnavailable)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(DispatchCommand::Shutdown)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, cmd: DispatchCommand) -> Result<()> {
        self.tx
            .send(cmd)
            .map_err(|_| PageTurnerError::DispatcherUnavailable)
    }
}
