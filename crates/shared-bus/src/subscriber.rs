//! # Event Subscriber
//!
//! Listeners rebuild their view of the registry from the committed feed, so
//! a subscriber is never allowed to miss notifications silently. When the
//! channel overruns a slow listener, the next receive reports
//! [`SubscriptionError::Lagged`] with the number of dropped events; the
//! listener resyncs from a snapshot at least as new as
//! [`Subscription::last_committed_version`] and keeps receiving.

use crate::events::{EventFilter, RegistryEvent};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,

    /// The listener fell behind and `missed` events were dropped.
    #[error("Subscriber lagged, {missed} events dropped")]
    Lagged {
        /// Number of events dropped for this subscriber.
        missed: u64,
    },
}

/// A filtered receiver on the registry feed.
pub struct Subscription {
    receiver: broadcast::Receiver<RegistryEvent>,
    filter: EventFilter,
    cursor: FeedCursor,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<RegistryEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            cursor: FeedCursor::default(),
        }
    }

    /// Wait for the next event that passes the filter.
    ///
    /// A `Lagged` error does not end the subscription; the following call
    /// resumes at the oldest event the channel still holds.
    pub async fn recv(&mut self) -> Result<RegistryEvent, SubscriptionError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if let Some(event) = self.cursor.accept(&self.filter, event) {
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return Err(SubscriptionError::Closed),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    return Err(self.cursor.lagged(missed))
                }
            }
        }
    }

    /// Non-blocking variant of [`Subscription::recv`]. `Ok(None)` means no
    /// matching event is buffered right now.
    pub fn try_recv(&mut self) -> Result<Option<RegistryEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(event) = self.cursor.accept(&self.filter, event) {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    return Err(self.cursor.lagged(missed))
                }
            }
        }
    }

    /// The filter this subscription applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Total events dropped for this subscriber so far.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.cursor.missed
    }

    /// State version of the newest `Committed` event delivered.
    #[must_use]
    pub fn last_committed_version(&self) -> Option<u64> {
        self.cursor.last_version
    }

    /// Turn the subscription into a `Stream`.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            filter: self.filter,
            cursor: self.cursor,
        }
    }
}

/// Delivery bookkeeping shared by the polling and stream receivers.
#[derive(Debug, Default, Clone, Copy)]
struct FeedCursor {
    missed: u64,
    last_version: Option<u64>,
}

impl FeedCursor {
    fn accept(&mut self, filter: &EventFilter, event: RegistryEvent) -> Option<RegistryEvent> {
        if !filter.matches(&event) {
            return None;
        }
        if let RegistryEvent::Committed { state_version, .. } = &event {
            self.last_version = Some(*state_version);
        }
        Some(event)
    }

    fn lagged(&mut self, missed: u64) -> SubscriptionError {
        self.missed = self.missed.saturating_add(missed);
        warn!(
            missed,
            total_missed = self.missed,
            last_version = ?self.last_version,
            "Subscriber lagged, registry view must resync"
        );
        SubscriptionError::Lagged { missed }
    }
}

/// `Stream` form of a [`Subscription`].
///
/// Yields `Err(Lagged)` in place of dropped events and ends when the bus
/// is dropped.
pub struct EventStream {
    inner: BroadcastStream<RegistryEvent>,
    filter: EventFilter,
    cursor: FeedCursor,
}

impl EventStream {
    /// The filter this stream applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Total events dropped for this stream so far.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.cursor.missed
    }
}

impl Stream for EventStream {
    type Item = Result<RegistryEvent, SubscriptionError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                None => return Poll::Ready(None),
                Some(Ok(event)) => {
                    if let Some(event) = this.cursor.accept(&this.filter, event) {
                        return Poll::Ready(Some(Ok(event)));
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(missed))) => {
                    return Poll::Ready(Some(Err(this.cursor.lagged(missed))));
                }
            }
        }
    }
}
