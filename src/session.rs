//! Service session orchestration.
//!
//! One session owns one dispatcher actor for the lifetime of the host service
//! binding. State is in memory only and starts fresh on every session.

use crate::config::Config;
use crate::dispatch::{
    self, dispatcher_loop, DispatcherHandle, DispatcherSnapshot, GestureDispatcher,
};
use crate::error::{PageTurnerError, Result};
use crate::executor::{CompletionNotifier, GestureExecutor};
use crate::gate::{FeatureGate, SettingsStore};
use crate::geometry::GeometryCache;
use crate::input::{InputService, RawInputEvent};
use crate::latency::LatencySink;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// A running page-turner session.
pub struct PageTurnerSession {
    input: InputService,
    dispatcher: DispatcherHandle,
    geometry: Arc<GeometryCache>,
    worker: JoinHandle<()>,
    settings_watch: JoinHandle<()>,
}

impl PageTurnerSession {
    /// Start a session on the current tokio runtime.
    ///
    /// `make_executor` receives the notifier the executor must use to report
    /// gesture results.
    pub fn start<E, F>(
        config: &Config,
        settings: Arc<dyn SettingsStore>,
        geometry: Arc<GeometryCache>,
        sink: Box<dyn LatencySink>,
        make_executor: F,
    ) -> Result<Self>
    where
        E: GestureExecutor + 'static,
        F: FnOnce(CompletionNotifier) -> E,
    {
        config.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| PageTurnerError::other(format!("no async runtime: {err}")))?;

        geometry.invalidate();

        let (handle, rx) = dispatch::channel();
        let executor = make_executor(handle.notifier());
        let dispatcher = GestureDispatcher::new(
            Arc::clone(&geometry),
            Box::new(executor),
            sink,
            config.tap.clone(),
        );
        let worker = runtime.spawn(dispatcher_loop(
            rx,
            dispatcher,
            config.dispatcher.completion_timeout(),
        ));

        let gate = FeatureGate::new(settings, config.settings.clone());
        let changes = gate.store().subscribe();
        gate.reconcile();
        let settings_watch = runtime.spawn(watch_settings(gate.clone(), changes));

        info!("page turner session started");
        Ok(Self {
            input: InputService::new(gate, handle.clone()),
            dispatcher: handle,
            geometry,
            worker,
            settings_watch,
        })
    }

    /// Host key callback. Returns true when the key was consumed.
    pub fn handle_key_event(&self, event: &RawInputEvent) -> bool {
        self.input.handle_key_event(event)
    }

    /// Host layout, orientation or configuration change.
    pub fn on_configuration_changed(&self) {
        debug!("configuration changed, invalidating screen geometry");
        self.geometry.invalidate();
    }

    pub fn input(&self) -> &InputService {
        &self.input
    }

    pub fn gate(&self) -> &FeatureGate {
        self.input.gate()
    }

    pub fn dispatcher(&self) -> &DispatcherHandle {
        &self.dispatcher
    }

    pub async fn snapshot(&self) -> Result<DispatcherSnapshot> {
        self.dispatcher.snapshot().await
    }

    /// End the session. A pending action is dropped and nothing more is issued.
    pub async fn stop(self) -> Result<()> {
        self.settings_watch.abort();
        // Already gone is fine: the loop has exited either way.
        let _ = self.dispatcher.shutdown();
        self.worker
            .await
            .map_err(|err| PageTurnerError::other(format!("dispatcher task failed: {err}")))?;
        info!("page turner session stopped");
        Ok(())
    }
}

async fn watch_settings(gate: FeatureGate, mut changes: broadcast::Receiver<String>) {
    loop {
        match changes.recv().await {
            Ok(key) => {
                debug!("setting changed: {key}");
                gate.reconcile();
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!("missed {skipped} setting changes");
                gate.reconcile();
            }
            Err(RecvError::Closed) => break,
        }
    }
}
