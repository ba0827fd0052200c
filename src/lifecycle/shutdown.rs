//! Graceful stop for the gateway.
//!
//! `main` hands a receiver to [`GatewayServer::run`](crate::http::GatewayServer::run)
//! and triggers the coordinator from the signal task. The server then stops
//! accepting connections and lets in-flight requests, including their audit
//! records, finish.

use tokio::sync::broadcast;

/// One-shot stop signal fanned out to every subscriber.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that fires once [`trigger`](Self::trigger) is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscriber. Harmless when nobody listens.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers_is_harmless() {
        Shutdown::default().trigger();
    }
}
