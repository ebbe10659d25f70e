//! [`Transport`] over a live zbus connection.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use zbus::message::Type as MessageType;
use zbus::{Connection, MatchRule, Message, MessageStream};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Signature, Structure, StructureBuilder, Value};

use crate::Result;
use crate::api::models::{BusError, BusKind, Notification};
use crate::dbus::members::Member;
use crate::dbus::transport::{SignalFeed, Transport};
use crate::types::constants::{SERVICE, interface};

/// Transport backed by a [`zbus::Connection`].
///
/// Calls are addressed to a single well-known service name. Cloning is cheap;
/// clones share the underlying connection.
#[derive(Debug, Clone)]
pub struct ZbusTransport {
    conn: Connection,
    service: String,
}

impl ZbusTransport {
    /// Wraps an existing connection, addressing NetworkManager's service name.
    pub fn new(conn: Connection) -> Self {
        Self::with_service(conn, SERVICE)
    }

    /// Wraps an existing connection, addressing `service`.
    pub fn with_service(conn: Connection, service: impl Into<String>) -> Self {
        Self {
            conn,
            service: service.into(),
        }
    }

    /// Connects to the bus described by `bus`.
    pub async fn connect(bus: &BusKind, service: impl Into<String>) -> Result<Self> {
        let conn = match bus {
            BusKind::System => Connection::system().await?,
            BusKind::Session => Connection::session().await?,
            BusKind::Address(address) => {
                zbus::connection::Builder::address(address.as_str())?
                    .build()
                    .await?
            }
        };
        debug!("Connected to {bus} bus");
        Ok(Self::with_service(conn, service))
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the service name calls are addressed to.
    pub fn service(&self) -> &str {
        &self.service
    }
}

#[async_trait]
impl Transport for ZbusTransport {
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        method: Member,
        args: Vec<Value<'static>>,
    ) -> Result<Vec<OwnedValue>> {
        let destination = Some(self.service.as_str());
        let reply = if args.is_empty() {
            self.conn
                .call_method(destination, path.clone(), Some(method.interface), method.name, &())
                .await?
        } else {
            let body = args
                .into_iter()
                .fold(StructureBuilder::new(), |builder, arg| builder.append_field(arg))
                .build()
                .map_err(|e| BusError::Encode(format!("arguments for {method}: {e}")))?;
            self.conn
                .call_method(destination, path.clone(), Some(method.interface), method.name, &body)
                .await?
        };

        reply_fields(&reply, method)
    }

    async fn get_property(&self, path: &ObjectPath<'_>, property: Member) -> Result<OwnedValue> {
        let reply = self
            .conn
            .call_method(
                Some(self.service.as_str()),
                path.clone(),
                Some(interface::PROPERTIES),
                "Get",
                &(property.interface, property.name),
            )
            .await?;

        property_value(&reply, property)
    }

    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        property: Member,
        value: Value<'static>,
    ) -> Result<()> {
        self.conn
            .call_method(
                Some(self.service.as_str()),
                path.clone(),
                Some(interface::PROPERTIES),
                "Set",
                &(property.interface, property.name, value),
            )
            .await?;
        Ok(())
    }

    async fn subscribe(&self, namespace: &ObjectPath<'_>, capacity: usize) -> Result<SignalFeed> {
        let rule = MatchRule::builder()
            .msg_type(MessageType::Signal)
            .path_namespace(namespace.clone())?
            .build();
        let stream = MessageStream::for_match_rule(rule, &self.conn, Some(capacity)).await?;
        debug!("Registered signal match rule for namespace {namespace}");

        let (tx, feed) = SignalFeed::channel(capacity);
        tokio::spawn(forward_signals(stream, tx, feed.cancel.clone()));
        Ok(feed)
    }
}

/// Pumps matching messages into the notification channel.
///
/// Dropping `stream` on return removes the match rule from the bus, and
/// dropping `tx` closes the channel once readers have drained it.
async fn forward_signals(
    mut stream: MessageStream,
    tx: mpsc::Sender<Notification>,
    cancel: CancellationToken,
) {
    loop {
        let msg = tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next() => match next {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    warn!("Failed to read signal from bus: {e}");
                    continue;
                }
                None => {
                    debug!("Signal stream ended");
                    break;
                }
            },
        };

        let notification = match notification_from_message(&msg) {
            Ok(n) => n,
            Err(e) => {
                warn!("Dropping undecodable signal: {e}");
                continue;
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = tx.send(notification) => {
                if sent.is_err() {
                    debug!("All notification receivers dropped");
                    break;
                }
            }
        }
    }
    debug!("Signal listener stopped");
}

/// Converts a signal message into a [`Notification`].
fn notification_from_message(msg: &Message) -> Result<Notification> {
    let header = msg.header();
    let missing = |what: &str| BusError::Decode {
        member: "signal".into(),
        reason: format!("signal without {what}"),
    };

    let path = header
        .path()
        .map(|p| OwnedObjectPath::from(p.clone()))
        .ok_or_else(|| missing("path"))?;
    let interface = header
        .interface()
        .map(|i| i.to_string())
        .ok_or_else(|| missing("interface"))?;
    let member = header
        .member()
        .map(|m| m.to_string())
        .ok_or_else(|| missing("member"))?;

    let args = body_fields(msg).map_err(|reason| BusError::Decode {
        member: format!("{interface}.{member}"),
        reason,
    })?;

    Ok(Notification {
        path,
        interface,
        member,
        args,
    })
}

/// Splits a method reply into its positional fields.
fn reply_fields(reply: &Message, method: Member) -> Result<Vec<OwnedValue>> {
    body_fields(reply).map_err(|reason| BusError::Decode {
        member: method.qualified(),
        reason,
    })
}

/// Unwraps the variant carried by a `Properties.Get` reply.
fn property_value(reply: &Message, property: Member) -> Result<OwnedValue> {
    reply
        .body()
        .deserialize::<OwnedValue>()
        .map_err(|e| BusError::decode(property, e))
}

fn body_fields(msg: &Message) -> std::result::Result<Vec<OwnedValue>, String> {
    let body = msg.body();
    if matches!(body.signature(), Signature::Unit) {
        return Ok(Vec::new());
    }

    let fields: Structure<'_> = body.deserialize().map_err(|e| e.to_string())?;
    fields
        .into_fields()
        .into_iter()
        .map(|field| OwnedValue::try_from(field).map_err(|e| e.to_string()))
        .collect()
}
