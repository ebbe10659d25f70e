//! The seam between the client and the bus.
//!
//! Every remote interaction of the crate goes through [`Transport`]. The
//! production implementation is [`ZbusTransport`](super::ZbusTransport);
//! tests substitute a scripted double to simulate replies and faults.

use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::Result;
use crate::api::models::Notification;
use crate::dbus::members::Member;

/// Request/reply access to the daemon's objects.
///
/// Every method completes only once the bus has delivered a reply or an
/// error. Implementations must not retry and must not impose timeouts of
/// their own.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Invokes `method` on the object at `path` with positional `args`.
    ///
    /// Returns the positional reply fields (empty for methods without a
    /// return value).
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        method: Member,
        args: Vec<Value<'static>>,
    ) -> Result<Vec<OwnedValue>>;

    /// Reads `property` of the object at `path`.
    async fn get_property(&self, path: &ObjectPath<'_>, property: Member) -> Result<OwnedValue>;

    /// Writes `property` of the object at `path`.
    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        property: Member,
        value: Value<'static>,
    ) -> Result<()>;

    /// Registers interest in every signal emitted under `namespace`.
    ///
    /// The returned feed buffers at most `capacity` notifications. The
    /// registration lives until the feed's token is cancelled.
    async fn subscribe(&self, namespace: &ObjectPath<'_>, capacity: usize) -> Result<SignalFeed>;
}

/// One signal registration as handed out by a [`Transport`].
#[derive(Debug)]
pub struct SignalFeed {
    /// Receiving half of the bounded notification channel.
    pub receiver: mpsc::Receiver<Notification>,
    /// Cancelling this token tears the registration down.
    pub cancel: CancellationToken,
}

impl SignalFeed {
    /// Creates a feed and returns the sending half alongside it.
    ///
    /// Transports keep the sender in their listener and stop forwarding once
    /// `cancel` fires.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Notification>, Self) {
        let (tx, receiver) = mpsc::channel(capacity.max(1));
        let feed = Self {
            receiver,
            cancel: CancellationToken::new(),
        };
        (tx, feed)
    }
}
