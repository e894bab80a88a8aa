//! The "fetch in progress" flag.
//!
//! Only the poller holds a [`LoadingSignal`]; the UI gets a read-only
//! [`LoadingIndicator`].

use tokio::sync::watch;

/// Write half, owned by the poller.
#[derive(Debug)]
pub struct LoadingSignal {
    tx: watch::Sender<bool>,
}

/// Read half, handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    rx: watch::Receiver<bool>,
}

impl LoadingSignal {
    /// Create a cleared flag and its reader.
    pub fn new() -> (Self, LoadingIndicator) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, LoadingIndicator { rx })
    }

    /// A fetch has started.
    pub fn begin(&self) {
        self.tx.send_replace(true);
    }

    /// The current fetch settled, successfully or not.
    pub fn settle(&self) {
        self.tx.send_replace(false);
    }
}

impl LoadingIndicator {
    pub fn is_loading(&self) -> bool {
        *self.rx.borrow()
    }
}
