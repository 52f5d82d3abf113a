//! Fan-in of independent error streams.

use std::fmt::Display;
use tokio::sync::mpsc;

/// Merges any number of receivers into one.
///
/// Each registered source gets a forwarding task holding a clone of the
/// merged sender. The merged receiver returned by [`finish`](Self::finish)
/// closes once every source has closed and its forwarder has exited.
#[derive(Debug)]
pub struct ErrorFanIn<E> {
    tx: mpsc::Sender<E>,
    rx: mpsc::Receiver<E>,
    sources: usize,
}

impl<E: Display + Send + 'static> ErrorFanIn<E> {
    /// Creates an empty fan-in whose merged channel holds `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self { tx, rx, sources: 0 }
    }

    /// Returns the number of registered sources.
    #[must_use]
    pub const fn sources(&self) -> usize {
        self.sources
    }

    /// Starts forwarding `source` into the merged stream.
    ///
    /// If the merged receiver is dropped, the forwarder keeps draining
    /// `source` and logs every remaining item.
    pub fn register(&mut self, mut source: mpsc::Receiver<E>) {
        let tx = self.tx.clone();
        self.sources += 1;
        tokio::spawn(async move {
            let mut merged = Some(tx);
            while let Some(item) = source.recv().await {
                let Some(tx) = &merged else {
                    tracing::warn!(error = %item, "merged error stream closed, logging instead");
                    continue;
                };
                if let Err(mpsc::error::SendError(item)) = tx.send(item).await {
                    tracing::warn!(error = %item, "merged error stream closed, logging instead");
                    merged = None;
                }
            }
        });
    }

    /// Stops accepting sources and returns the merged receiver.
    #[must_use]
    pub fn finish(self) -> mpsc::Receiver<E> {
        self.rx
    }
}

/// Merges `sources` into one receiver that closes after all of them close.
///
/// Items from one source keep their order; across sources there is no
/// ordering guarantee.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn merge_errors<E: Display + Send + 'static>(
    sources: impl IntoIterator<Item = mpsc::Receiver<E>>,
    capacity: usize,
) -> mpsc::Receiver<E> {
    let mut fan_in = ErrorFanIn::new(capacity);
    for source in sources {
        fan_in.register(source);
    }
    fan_in.finish()
}
