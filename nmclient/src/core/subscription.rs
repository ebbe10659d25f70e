//! Notification subscription state.
//!
//! A client holds at most one signal registration at a time. The slot below
//! serializes subscribe/unsubscribe behind an async mutex and hands out
//! cloneable [`Notifications`] handles that all read from the same bounded
//! channel.

use futures::stream::{self, Stream};
use log::debug;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use zvariant::ObjectPath;

use crate::Result;
use crate::api::models::Notification;
use crate::dbus::{SignalFeed, Transport};

struct Shared {
    receiver: Mutex<mpsc::Receiver<Notification>>,
    cancel: CancellationToken,
}

/// Stream of notifications from one signal registration.
///
/// Clones share the registration and its buffer: each notification is
/// delivered to exactly one reader. The stream ends when the client
/// unsubscribes or the bus connection goes away.
#[derive(Clone)]
pub struct Notifications {
    shared: Arc<Shared>,
}

impl Notifications {
    pub(crate) fn new(feed: SignalFeed) -> Self {
        Self {
            shared: Arc::new(Shared {
                receiver: Mutex::new(feed.receiver),
                cancel: feed.cancel,
            }),
        }
    }

    /// Waits for the next notification.
    ///
    /// Returns `None` once the client unsubscribed, or once the listener
    /// stopped and every buffered notification has been read.
    pub async fn recv(&self) -> Option<Notification> {
        let mut receiver = self.shared.receiver.lock().await;
        tokio::select! {
            biased;
            _ = self.shared.cancel.cancelled() => None,
            next = receiver.recv() => next,
        }
    }

    /// Turns the handle into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Notification> + Send + 'static {
        stream::unfold(self, |notifications| async move {
            notifications
                .recv()
                .await
                .map(|notification| (notification, notifications))
        })
    }

    /// Returns `true` once the registration has been cancelled, or its
    /// listener has stopped and the buffer is empty.
    pub fn is_closed(&self) -> bool {
        if self.shared.cancel.is_cancelled() {
            return true;
        }
        // A reader holding the lock is still draining.
        match self.shared.receiver.try_lock() {
            Ok(receiver) => receiver.is_closed() && receiver.is_empty(),
            Err(_) => false,
        }
    }

    /// Returns `true` if both handles read from the same registration.
    pub fn same_registration(&self, other: &Notifications) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) async fn close(&self) {
        self.shared.cancel.cancel();
        self.shared.receiver.lock().await.close();
    }
}

impl std::fmt::Debug for Notifications {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifications")
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[derive(Debug)]
enum SubscriptionState {
    Unsubscribed,
    Subscribed(Notifications),
}

/// The client's single subscription.
#[derive(Debug)]
pub(crate) struct SubscriptionSlot {
    state: Mutex<SubscriptionState>,
}

impl SubscriptionSlot {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SubscriptionState::Unsubscribed),
        }
    }

    /// Returns the live registration, registering one first if needed.
    ///
    /// On failure the slot is left as it was.
    pub(crate) async fn subscribe(
        &self,
        transport: &dyn Transport,
        namespace: &ObjectPath<'_>,
        capacity: usize,
    ) -> Result<Notifications> {
        let mut state = self.state.lock().await;

        if let SubscriptionState::Subscribed(existing) = &*state {
            if !existing.is_closed() {
                debug!("Reusing existing signal registration");
                return Ok(existing.clone());
            }
            debug!("Previous signal registration closed, registering again");
        }

        let feed = transport.subscribe(namespace, capacity).await?;
        let notifications = Notifications::new(feed);
        *state = SubscriptionState::Subscribed(notifications.clone());
        debug!("Subscribed to signals under {namespace}");
        Ok(notifications)
    }

    /// Cancels the registration, if any. Returns whether one existed.
    pub(crate) async fn unsubscribe(&self) -> bool {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, SubscriptionState::Unsubscribed) {
            SubscriptionState::Subscribed(notifications) => {
                notifications.close().await;
                debug!("Unsubscribed from signals");
                true
            }
            SubscriptionState::Unsubscribed => false,
        }
    }

    pub(crate) async fn is_subscribed(&self) -> bool {
        matches!(
            &*self.state.lock().await,
            SubscriptionState::Subscribed(n) if !n.is_closed()
        )
    }
}
