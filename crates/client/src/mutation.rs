//! Mutation layer: one write at a time, followed by ordered completion effects.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use registrar_core::api;
use registrar_core::console::{Effect, MutationStatus};
use tokio::sync::watch;

/// Shared view of a mutation's in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct PendingFlag(Arc<AtomicBool>);

impl PendingFlag {
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raises the flag until the returned guard is dropped.
    fn raise(&self) -> PendingGuard<'_> {
        self.0.store(true, Ordering::SeqCst);
        PendingGuard(&self.0)
    }
}

/// Lowers the pending flag when the request settles or is dropped.
struct PendingGuard<'a>(&'a AtomicBool);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Read-only view of a mutation's status, usable while `run` is awaited.
#[derive(Debug, Clone)]
pub struct MutationMonitor {
    pending: PendingFlag,
    last_error: watch::Receiver<Option<String>>,
}

impl MutationMonitor {
    pub fn status(&self) -> MutationStatus {
        MutationStatus {
            pending: self.pending.is_pending(),
            last_error: self.last_error.borrow().clone(),
        }
    }
}

/// A write operation with its own success effects.
///
/// No retries and no rollback: a failure only records the error.
#[derive(Debug)]
pub struct Mutation {
    name: &'static str,
    on_success: Vec<Effect>,
    pending: PendingFlag,
    last_error: watch::Sender<Option<String>>,
}

impl Mutation {
    pub fn new(name: &'static str, on_success: Vec<Effect>) -> Self {
        Self {
            name,
            on_success,
            pending: PendingFlag::default(),
            last_error: watch::Sender::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn monitor(&self) -> MutationMonitor {
        MutationMonitor {
            pending: self.pending.clone(),
            last_error: self.last_error.subscribe(),
        }
    }

    pub fn status(&self) -> MutationStatus {
        MutationStatus {
            pending: self.pending.is_pending(),
            last_error: self.last_error.borrow().clone(),
        }
    }

    /// Awaits `request` with the pending flag raised.
    ///
    /// On success returns the output together with the effects to run: this
    /// mutation's own effects first, then `call_site` effects.
    pub async fn run<O, F>(
        &mut self,
        request: F,
        call_site: Vec<Effect>,
    ) -> api::Result<(O, Vec<Effect>)>
    where
        F: Future<Output = api::Result<O>>,
    {
        tracing::debug!(mutation = self.name, "Mutation started");
        let result = {
            let _pending = self.pending.raise();
            request.await
        };

        match result {
            Ok(output) => {
                self.last_error.send_replace(None);
                let effects = self.on_success.iter().cloned().chain(call_site).collect();
                tracing::debug!(mutation = self.name, "Mutation succeeded");
                Ok((output, effects))
            }
            Err(err) => {
                tracing::warn!(mutation = self.name, error = %err, "Mutation failed");
                self.last_error.send_replace(Some(err.to_string()));
                Err(err)
            }
        }
    }
}
