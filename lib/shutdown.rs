use tokio::sync::broadcast;

/// A process-wide shutdown signal. Every clone observes the same broadcast,
/// so any component can trigger shutdown and every server waits on it.
#[derive(Debug)]
pub struct Shutdown {
    /// `true` once this handle has observed the signal.
    shutdown: bool,
    notify: broadcast::Sender<()>,
    watch: broadcast::Receiver<()>,
}

impl Clone for Shutdown {
    fn clone(&self) -> Self {
        Self {
            shutdown: self.shutdown,
            notify: self.notify.clone(),
            watch: self.notify.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        let (notify, watch) = broadcast::channel(1);
        Self {
            shutdown: false,
            notify,
            watch,
        }
    }
}

impl Shutdown {
    /// Waits for the shutdown signal. Returns immediately if it was already
    /// observed by this handle.
    pub async fn recv(&mut self) {
        if self.shutdown {
            return;
        }
        // A value, a lag from repeated broadcasts, or a closed channel all
        // mean shutdown.
        let _ = self.watch.recv().await;
        self.shutdown = true;
    }

    /// Notifies every clone. Calling it again is harmless.
    pub fn broadcast_shutdown(&mut self) {
        // No receivers left means nobody is waiting.
        let _ = self.notify.send(());
    }
}
