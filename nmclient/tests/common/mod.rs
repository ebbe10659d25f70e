//! Scripted transport shared by the integration tests.
//!
//! Replies are produced by closures keyed on `(object path, qualified
//! member)`, so every call gets a fresh value. Calls are recorded in order.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use nmclient::dbus::members::device;
use nmclient::{
    BusError, ClientConfig, Member, NetworkManager, Notification, RemoteFault, SignalFeed,
    Transport,
};

pub const ROOT: &str = "/org/freedesktop/NetworkManager";

type MethodHandler = Box<dyn Fn(&[Value<'static>]) -> nmclient::Result<Vec<OwnedValue>> + Send + Sync>;
type PropertyHandler = Box<dyn Fn() -> nmclient::Result<OwnedValue> + Send + Sync>;

/// One call seen by the mock.
#[derive(Debug)]
pub struct RecordedCall {
    pub path: String,
    pub member: String,
    pub args: Vec<Value<'static>>,
}

#[derive(Default)]
pub struct MockTransport {
    methods: Mutex<HashMap<(String, String), MethodHandler>>,
    properties: Mutex<HashMap<(String, String), PropertyHandler>>,
    calls: Mutex<Vec<RecordedCall>>,
    subscriptions: AtomicUsize,
    fail_subscribe: AtomicBool,
    feeds: Mutex<Vec<(mpsc::Sender<Notification>, CancellationToken)>>,
}

impl Debug for MockTransport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport").finish_non_exhaustive()
    }
}

pub fn transport_fault() -> BusError {
    BusError::from(zbus::Error::Failure("connection lost".into()))
}

pub fn owned(value: Value<'static>) -> OwnedValue {
    OwnedValue::try_from(value).expect("value should convert")
}

pub fn object_path(p: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(p.to_string()).expect("valid object path")
}

pub fn path_value(p: &str) -> OwnedValue {
    owned(Value::ObjectPath(
        ObjectPath::try_from(p.to_string()).expect("valid object path"),
    ))
}

pub fn paths_value(list: &[&str]) -> OwnedValue {
    let list: Vec<ObjectPath<'static>> = list
        .iter()
        .map(|p| ObjectPath::try_from(p.to_string()).expect("valid object path"))
        .collect();
    owned(Value::from(list))
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Client over this mock with default configuration.
    pub fn client(self: &Arc<Self>) -> NetworkManager {
        NetworkManager::with_transport(self.clone(), ClientConfig::default())
    }

    pub fn on_call<F>(&self, path: &str, method: Member, handler: F)
    where
        F: Fn(&[Value<'static>]) -> nmclient::Result<Vec<OwnedValue>> + Send + Sync + 'static,
    {
        self.methods
            .lock()
            .unwrap()
            .insert((path.to_string(), method.qualified()), Box::new(handler));
    }

    pub fn on_property<F>(&self, path: &str, property: Member, handler: F)
    where
        F: Fn() -> nmclient::Result<OwnedValue> + Send + Sync + 'static,
    {
        self.properties
            .lock()
            .unwrap()
            .insert((path.to_string(), property.qualified()), Box::new(handler));
    }

    pub fn property_u32(&self, path: &str, property: Member, value: u32) {
        self.on_property(path, property, move || Ok(owned(Value::from(value))));
    }

    pub fn property_bool(&self, path: &str, property: Member, value: bool) {
        self.on_property(path, property, move || Ok(owned(Value::from(value))));
    }

    pub fn property_str(&self, path: &str, property: Member, value: &str) {
        let value = value.to_string();
        self.on_property(path, property, move || Ok(owned(Value::from(value.clone()))));
    }

    pub fn property_path(&self, path: &str, property: Member, value: &str) {
        let value = value.to_string();
        self.on_property(path, property, move || Ok(path_value(&value)));
    }

    pub fn property_paths(&self, path: &str, property: Member, values: &[&str]) {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.on_property(path, property, move || {
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            Ok(paths_value(&refs))
        });
    }

    pub fn fail_property(&self, path: &str, property: Member) {
        self.on_property(path, property, || Err(transport_fault()));
    }

    /// Scripts a device with every property a snapshot reads.
    pub fn add_device(&self, path: &str, device_type: u32, iface: &str, state: u32) {
        self.property_u32(path, device::DEVICE_TYPE, device_type);
        self.property_str(path, device::INTERFACE, iface);
        self.property_u32(path, device::STATE, state);
        self.property_str(path, device::DRIVER, "mockdrv");
        self.property_bool(path, device::MANAGED, true);
        self.property_str(path, device::HW_ADDRESS, "00:11:22:33:44:55");
    }

    pub fn set_fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    /// Number of recorded calls and property reads of `member`.
    pub fn count(&self, member: Member) -> usize {
        let qualified = member.qualified();
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.member == qualified)
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn with_calls<R>(&self, f: impl FnOnce(&[RecordedCall]) -> R) -> R {
        f(&self.calls.lock().unwrap())
    }

    /// Sends `member` from `path` to every live registration.
    pub async fn emit(&self, path: &str, interface: &str, member: &str) {
        let senders: Vec<mpsc::Sender<Notification>> = self
            .feeds
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, cancel)| !cancel.is_cancelled())
            .map(|(tx, _)| tx.clone())
            .collect();

        for tx in senders {
            let notification = Notification {
                path: object_path(path),
                interface: interface.to_string(),
                member: member.to_string(),
                args: vec![owned(Value::from(70u32))],
            };
            let _ = tx.send(notification).await;
        }
    }

    /// Simulates every listener stopping: senders are dropped, buffered
    /// notifications stay readable.
    pub fn drop_registrations(&self) {
        self.feeds.lock().unwrap().clear();
    }

    fn record(&self, path: &ObjectPath<'_>, member: Member, args: Vec<Value<'static>>) {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            member: member.qualified(),
            args,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        path: &ObjectPath<'_>,
        method: Member,
        args: Vec<Value<'static>>,
    ) -> nmclient::Result<Vec<OwnedValue>> {
        let key = (path.to_string(), method.qualified());
        let reply = match self.methods.lock().unwrap().get(&key) {
            Some(handler) => handler(&args),
            None => Err(BusError::Remote(RemoteFault::new(
                "org.freedesktop.DBus.Error.UnknownMethod",
                format!("no reply scripted for {}", key.1),
            ))),
        };
        self.record(path, method, args);
        reply
    }

    async fn get_property(
        &self,
        path: &ObjectPath<'_>,
        property: Member,
    ) -> nmclient::Result<OwnedValue> {
        let key = (path.to_string(), property.qualified());
        let reply = match self.properties.lock().unwrap().get(&key) {
            Some(handler) => handler(),
            None => Err(BusError::Remote(RemoteFault::new(
                "org.freedesktop.DBus.Error.UnknownProperty",
                format!("no value scripted for {}", key.1),
            ))),
        };
        self.record(path, property, Vec::new());
        reply
    }

    async fn set_property(
        &self,
        path: &ObjectPath<'_>,
        property: Member,
        value: Value<'static>,
    ) -> nmclient::Result<()> {
        self.record(path, property, vec![value]);
        Ok(())
    }

    async fn subscribe(
        &self,
        _namespace: &ObjectPath<'_>,
        capacity: usize,
    ) -> nmclient::Result<SignalFeed> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(transport_fault());
        }
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        let (tx, feed) = SignalFeed::channel(capacity);
        self.feeds.lock().unwrap().push((tx, feed.cancel.clone()));
        Ok(feed)
    }
}
