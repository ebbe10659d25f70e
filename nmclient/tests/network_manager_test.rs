//! Client operations against a scripted transport.

mod common;

use common::{MockTransport, ROOT, path_value, paths_value, object_path, owned, transport_fault};
use nmclient::builders::ProfileBuilder;
use nmclient::dbus::members::{access_point, active_connection, device, network_manager, wireless};
use nmclient::{
    ActiveConnectionState, ApSecurityFlags, BusError, DeviceState, DeviceType, NmState,
    RemoteFault,
};
use zvariant::Value;

const WIFI: &str = "/org/freedesktop/NetworkManager/Devices/3";
const ETH: &str = "/org/freedesktop/NetworkManager/Devices/1";
const LO: &str = "/org/freedesktop/NetworkManager/Devices/7";
const AP: &str = "/org/freedesktop/NetworkManager/AccessPoint/12";
const SETTINGS: &str = "/org/freedesktop/NetworkManager/Settings/4";
const ACTIVE: &str = "/org/freedesktop/NetworkManager/ActiveConnection/9";

fn scripted_devices(mock: &MockTransport) {
    mock.add_device(WIFI, 2, "wlan0", 100);
    mock.add_device(ETH, 1, "eth0", 30);
    mock.add_device(LO, 32, "lo", 10);
    mock.on_call(ROOT, network_manager::GET_DEVICES, |_| {
        Ok(vec![paths_value(&[WIFI, ETH, LO])])
    });
}

#[tokio::test]
async fn list_devices_wraps_every_path_in_order() {
    let mock = MockTransport::new();
    scripted_devices(&mock);
    let nm = mock.client();

    let devices = nm.list_devices().await.unwrap();
    let paths: Vec<&str> = devices.iter().map(|d| d.path().as_str()).collect();
    assert_eq!(paths, vec![WIFI, ETH, LO]);

    assert_eq!(devices[0].device_type(), DeviceType::Wifi);
    assert_eq!(
        devices[0].dbus_interface(),
        "org.freedesktop.NetworkManager.Device.Wireless"
    );
    assert_eq!(
        devices[1].dbus_interface(),
        "org.freedesktop.NetworkManager.Device.Wired"
    );
    assert_eq!(devices[2].device_type(), DeviceType::Loopback);
    assert_eq!(
        devices[2].dbus_interface(),
        "org.freedesktop.NetworkManager.Device"
    );
}

#[tokio::test]
async fn list_devices_empty() {
    let mock = MockTransport::new();
    mock.on_call(ROOT, network_manager::GET_DEVICES, |_| Ok(vec![paths_value(&[])]));

    let devices = mock.client().list_devices().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn list_devices_fails_as_a_whole_when_one_wrap_fails() {
    let mock = MockTransport::new();
    scripted_devices(&mock);
    mock.fail_property(ETH, device::DEVICE_TYPE);

    let err = mock.client().list_devices().await.unwrap_err();
    assert!(matches!(err, BusError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn list_devices_rejects_malformed_reply() {
    let mock = MockTransport::new();
    mock.on_call(ROOT, network_manager::GET_DEVICES, |_| {
        Ok(vec![owned(Value::from("not a list"))])
    });

    let err = mock.client().list_devices().await.unwrap_err();
    match err {
        BusError::Decode { member, .. } => {
            assert_eq!(member, "org.freedesktop.NetworkManager.GetDevices")
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn state_maps_defined_codes() {
    let cases = [
        (0, NmState::Unknown),
        (10, NmState::Asleep),
        (20, NmState::Disconnected),
        (30, NmState::Disconnecting),
        (40, NmState::Connecting),
        (50, NmState::ConnectedLocal),
        (60, NmState::ConnectedSite),
        (70, NmState::ConnectedGlobal),
    ];

    for (code, expected) in cases {
        let mock = MockTransport::new();
        mock.property_u32(ROOT, network_manager::STATE, code);
        assert_eq!(mock.client().state().await.unwrap(), expected, "code {code}");
    }
}

#[tokio::test]
async fn state_maps_undefined_codes_to_unknown() {
    for code in [5, 45, 71, 999] {
        let mock = MockTransport::new();
        mock.property_u32(ROOT, network_manager::STATE, code);
        assert_eq!(mock.client().state().await.unwrap(), NmState::Unknown);
    }
}

#[tokio::test]
async fn state_display_names() {
    let mock = MockTransport::new();
    mock.property_u32(ROOT, network_manager::STATE, 0);
    assert_eq!(mock.client().state().await.unwrap().to_string(), "unknown");

    let mock = MockTransport::new();
    mock.property_u32(ROOT, network_manager::STATE, 70);
    assert_eq!(mock.client().state().await.unwrap().to_string(), "connected");
}

#[tokio::test]
async fn state_of_wrong_type_is_a_decode_error() {
    let mock = MockTransport::new();
    mock.property_str(ROOT, network_manager::STATE, "connected");

    let err = mock.client().state().await.unwrap_err();
    assert!(matches!(err, BusError::Decode { .. }));
}

#[tokio::test]
async fn transport_fault_surfaces_and_leaves_client_usable() {
    let mock = MockTransport::new();
    mock.fail_property(ROOT, network_manager::STATE);
    let nm = mock.client();

    let err = nm.state().await.unwrap_err();
    assert!(matches!(err, BusError::Transport(_)), "got {err:?}");
    assert!(!nm.is_subscribed().await);

    mock.property_u32(ROOT, network_manager::STATE, 20);
    assert_eq!(nm.state().await.unwrap(), NmState::Disconnected);
}

#[tokio::test]
async fn active_connections_wraps_paths() {
    let mock = MockTransport::new();
    mock.property_paths(ROOT, network_manager::ACTIVE_CONNECTIONS, &[ACTIVE]);
    mock.property_str(ACTIVE, active_connection::ID, "HomeNetwork");
    mock.property_u32(ACTIVE, active_connection::STATE, 2);
    mock.property_path(ACTIVE, active_connection::CONNECTION, SETTINGS);
    mock.property_path(ACTIVE, active_connection::SPECIFIC_OBJECT, "/");

    let active = mock.client().active_connections().await.unwrap();
    assert_eq!(active.len(), 1);
    let ac = &active[0];
    assert_eq!(ac.path().as_str(), ACTIVE);
    assert_eq!(ac.id().await.unwrap(), "HomeNetwork");
    assert_eq!(ac.state().await.unwrap(), ActiveConnectionState::Activated);
    assert_eq!(ac.connection().await.unwrap().path().as_str(), SETTINGS);
    assert!(ac.specific_object().await.unwrap().is_none());
}

#[tokio::test]
async fn activate_connection_sends_paths_and_wraps_reply() {
    let mock = MockTransport::new();
    mock.add_device(WIFI, 2, "wlan0", 30);
    mock.on_call(ROOT, network_manager::ACTIVATE_CONNECTION, |_| {
        Ok(vec![path_value(ACTIVE)])
    });
    let nm = mock.client();

    let device = nm.device(object_path(WIFI)).await.unwrap();
    let connection = nm.connection(object_path(SETTINGS));
    let ap = nm.access_point(object_path(AP));

    let active = nm
        .activate_connection(&connection, &device, Some(&ap))
        .await
        .unwrap();
    assert_eq!(active.path().as_str(), ACTIVE);

    mock.with_calls(|calls| {
        let call = calls
            .iter()
            .find(|c| c.member == "org.freedesktop.NetworkManager.ActivateConnection")
            .expect("activate call recorded");
        assert_eq!(call.path, ROOT);
        let args: Vec<String> = call.args.iter().map(|a| a.to_string()).collect();
        assert_eq!(args.len(), 3);
        assert!(args[0].contains(SETTINGS));
        assert!(args[1].contains(WIFI));
        assert!(args[2].contains(AP));
    });
}

#[tokio::test]
async fn activate_connection_without_access_point_sends_null_path() {
    let mock = MockTransport::new();
    mock.add_device(ETH, 1, "eth0", 30);
    mock.on_call(ROOT, network_manager::ACTIVATE_CONNECTION, |args| {
        assert_eq!(args[2], Value::ObjectPath("/".try_into().unwrap()));
        Ok(vec![path_value(ACTIVE)])
    });
    let nm = mock.client();

    let device = nm.device(object_path(ETH)).await.unwrap();
    let connection = nm.connection(object_path(SETTINGS));
    nm.activate_connection(&connection, &device, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn activate_connection_surfaces_remote_fault() {
    let mock = MockTransport::new();
    mock.add_device(WIFI, 2, "wlan0", 30);
    mock.on_call(ROOT, network_manager::ACTIVATE_CONNECTION, |_| {
        Err(BusError::Remote(RemoteFault::new(
            "org.freedesktop.NetworkManager.UnknownConnection",
            "Connection not found",
        )))
    });
    let nm = mock.client();

    let device = nm.device(object_path(WIFI)).await.unwrap();
    let connection = nm.connection(object_path(SETTINGS));
    let err = nm
        .activate_connection(&connection, &device, None)
        .await
        .unwrap_err();

    let fault = err.remote_fault().expect("remote fault");
    assert_eq!(fault.name, "org.freedesktop.NetworkManager.UnknownConnection");
    assert_eq!(fault.message.as_deref(), Some("Connection not found"));
}

#[tokio::test]
async fn add_and_activate_returns_the_active_connection() {
    let mock = MockTransport::new();
    mock.add_device(WIFI, 2, "wlan0", 30);
    mock.on_call(ROOT, network_manager::ADD_AND_ACTIVATE_CONNECTION, |args| {
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].value_signature().to_string(), "a{sa{sv}}");
        Ok(vec![path_value(SETTINGS), path_value(ACTIVE)])
    });
    let nm = mock.client();

    let device = nm.device(object_path(WIFI)).await.unwrap();
    let ap = nm.access_point(object_path(AP));
    let profile = ProfileBuilder::new("802-11-wireless", "Cafe")
        .wifi_ssid(b"Cafe")
        .wpa_psk("espresso42")
        .build();

    let active = nm
        .add_and_activate_connection(profile, &device, Some(&ap))
        .await
        .unwrap();
    assert_eq!(active.path().as_str(), ACTIVE);
    assert_ne!(active.path().as_str(), SETTINGS);
}

#[tokio::test]
async fn add_and_activate_rejects_single_path_reply() {
    let mock = MockTransport::new();
    mock.add_device(WIFI, 2, "wlan0", 30);
    mock.on_call(ROOT, network_manager::ADD_AND_ACTIVATE_CONNECTION, |_| {
        Ok(vec![path_value(ACTIVE)])
    });
    let nm = mock.client();

    let device = nm.device(object_path(WIFI)).await.unwrap();
    let profile = ProfileBuilder::new("802-11-wireless", "Cafe").build();
    let err = nm
        .add_and_activate_connection(profile, &device, None)
        .await
        .unwrap_err();
    assert!(matches!(err, BusError::Decode { .. }));
}

#[tokio::test]
async fn deactivate_connection_sends_active_path() {
    let mock = MockTransport::new();
    mock.on_call(ROOT, network_manager::DEACTIVATE_CONNECTION, |args| {
        assert_eq!(args.len(), 1);
        Ok(Vec::new())
    });
    let nm = mock.client();

    nm.deactivate_connection(&nm.active_connection(object_path(ACTIVE)))
        .await
        .unwrap();
    assert_eq!(mock.count(network_manager::DEACTIVATE_CONNECTION), 1);
}

#[tokio::test]
async fn wireless_enabled_round_trip() {
    let mock = MockTransport::new();
    mock.property_bool(ROOT, network_manager::WIRELESS_ENABLED, true);
    let nm = mock.client();

    assert!(nm.wireless_enabled().await.unwrap());
    nm.set_wireless_enabled(false).await.unwrap();

    mock.with_calls(|calls| {
        let last = calls.last().expect("set recorded");
        assert_eq!(last.member, "org.freedesktop.NetworkManager.WirelessEnabled");
        assert_eq!(last.args, vec![Value::from(false)]);
    });
}

#[tokio::test]
async fn invoke_and_get_property_are_raw() {
    let mock = MockTransport::new();
    mock.on_call(ROOT, network_manager::GET_DEVICES, |_| Ok(vec![paths_value(&[ETH])]));
    mock.property_u32(ROOT, network_manager::STATE, 60);
    let nm = mock.client();

    let reply = nm
        .invoke(network_manager::GET_DEVICES, Vec::new())
        .await
        .unwrap();
    assert_eq!(reply.len(), 1);

    let state = nm.get_property(network_manager::STATE).await.unwrap();
    assert_eq!(u32::try_from(state).unwrap(), 60);
}

#[tokio::test]
async fn wireless_device_lists_access_points() {
    let mock = MockTransport::new();
    mock.add_device(WIFI, 2, "wlan0", 100);
    mock.on_call(WIFI, wireless::GET_ALL_ACCESS_POINTS, |_| Ok(vec![paths_value(&[AP])]));
    mock.property_path(WIFI, wireless::ACTIVE_ACCESS_POINT, AP);
    mock.on_property(AP, access_point::SSID, || Ok(owned(Value::from(b"Cafe".to_vec()))));
    mock.on_property(AP, access_point::STRENGTH, || Ok(owned(Value::from(87u8))));
    mock.property_u32(AP, access_point::RSN_FLAGS, 0x188);

    let nm = mock.client();
    let device = nm.device(object_path(WIFI)).await.unwrap();
    assert!(device.is_wireless());

    let aps = device.access_points().await.unwrap();
    assert_eq!(aps.len(), 1);
    assert_eq!(aps[0].ssid_string().await.unwrap(), "Cafe");
    assert_eq!(aps[0].strength().await.unwrap(), 87);
    let rsn = aps[0].rsn_flags().await.unwrap();
    assert!(rsn.contains(ApSecurityFlags::KEY_MGMT_PSK));

    let active = device.active_access_point().await.unwrap();
    assert_eq!(active.as_ref(), Some(&aps[0]));
}

#[tokio::test]
async fn hidden_access_point_has_placeholder_name() {
    let mock = MockTransport::new();
    mock.on_property(AP, access_point::SSID, || Ok(owned(Value::from(Vec::<u8>::new()))));

    let ap = mock.client().access_point(object_path(AP));
    assert_eq!(ap.ssid_string().await.unwrap(), "<Hidden Network>");
}

#[tokio::test]
async fn device_without_active_connection() {
    let mock = MockTransport::new();
    mock.add_device(ETH, 1, "eth0", 30);
    mock.property_path(ETH, device::ACTIVE_CONNECTION, "/");

    let device = mock.client().device(object_path(ETH)).await.unwrap();
    assert_eq!(device.state().await.unwrap(), DeviceState::Disconnected);
    assert!(device.active_connection().await.unwrap().is_none());
}

#[tokio::test]
async fn handles_compare_by_path() {
    let mock = MockTransport::new();
    let nm = mock.client();
    assert_eq!(
        nm.access_point(object_path(AP)),
        nm.access_point(object_path(AP))
    );
    assert_ne!(
        nm.connection(object_path(SETTINGS)),
        nm.connection(object_path("/org/freedesktop/NetworkManager/Settings/5"))
    );
}

#[tokio::test]
async fn snapshot_collects_state_and_devices() {
    let mock = MockTransport::new();
    scripted_devices(&mock);
    mock.property_u32(ROOT, network_manager::STATE, 70);

    let snapshot = mock.client().snapshot().await.unwrap();
    assert_eq!(snapshot.network_state, "connected");
    assert_eq!(snapshot.devices.len(), 3);
    assert_eq!(snapshot.devices[0].interface, "wlan0");
    assert_eq!(snapshot.devices[0].device_type, "Wi-Fi");
    assert_eq!(snapshot.devices[0].state, "Activated");

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["NetworkState"], "connected");
    assert_eq!(json["Devices"][1]["Interface"], "eth0");
    assert_eq!(json["Devices"][1]["Managed"], true);
}

#[tokio::test]
async fn snapshot_fails_without_reading_devices_when_state_fails() {
    let mock = MockTransport::new();
    scripted_devices(&mock);
    mock.fail_property(ROOT, network_manager::STATE);

    let err = mock.client().snapshot().await.unwrap_err();
    assert!(matches!(err, BusError::Transport(_)));
    assert_eq!(mock.count(network_manager::GET_DEVICES), 0);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn snapshot_fails_when_a_device_read_fails() {
    let mock = MockTransport::new();
    scripted_devices(&mock);
    mock.property_u32(ROOT, network_manager::STATE, 70);
    mock.on_property(LO, device::DRIVER, || Err(transport_fault()));

    assert!(mock.client().snapshot().await.is_err());
}
