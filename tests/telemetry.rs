//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::collections::BTreeMap;

use bytes::Bytes;
use isis_lsdb::packet::LspId;
use isis_lsdb::packet::pdu::{Lsp, LspFlags, LspTlvs};
use isis_lsdb::packet::tlv::{ExtIsReachTlv, Neighbor};
use isis_lsdb::telemetry::{
    Notification, Path, RenderArgs, RenderError, TypedValue,
    render_notifications,
};

//
// Helper functions.
//

fn render_args() -> RenderArgs {
    RenderArgs {
        network_instance: "DEFAULT".to_owned(),
        protocol_instance: "15169".to_owned(),
        level: 2,
        timestamp: 1494079200000000000,
        use_path_elems: false,
    }
}

fn decode(bytes: &[u8]) -> Lsp {
    let (lsp, _) = Lsp::decode(Bytes::copy_from_slice(bytes), 0).unwrap();
    lsp
}

// The 16-byte LSP from the decode fixtures: LSP ID 0000.4000.ce39.00-00,
// sequence number 5158, checksum 0x277f.
fn minimal_lsp() -> Lsp {
    decode(&[
        0x00, 0x00, 0x40, 0x00, 0xce, 0x39, 0x00, 0x00, 0x00, 0x00, 0x14,
        0x26, 0x27, 0x7f, 0x03, 0x01,
    ])
}

// Collects the notification updates as a textual path => value map.
fn update_map(notification: &Notification) -> BTreeMap<String, TypedValue> {
    notification
        .updates
        .iter()
        .map(|update| {
            let Path::Text(path) = &update.path else {
                panic!("expected textual update path");
            };
            (path.clone(), update.value.clone())
        })
        .collect()
}

//
// Tests.
//

#[test]
fn test_render_nil_lsp() {
    let result = render_notifications(None, &render_args());
    assert_eq!(result.unwrap_err(), RenderError::NilInput);
}

#[test]
fn test_render_atomic_prefix() {
    let lsp = minimal_lsp();
    let notifications =
        render_notifications(Some(&lsp), &render_args()).unwrap();
    assert_eq!(notifications.len(), 1);

    let notification = &notifications[0];
    assert!(notification.atomic);
    assert_eq!(notification.timestamp, 1494079200000000000);
    assert_eq!(
        notification.prefix,
        Path::Text(
            "/network-instances/network-instance[name=DEFAULT]\
             /protocols/protocol[identifier=ISIS][name=15169]\
             /isis/levels/level[level-number=2]\
             /link-state-database/lsp[lsp-id=0000.4000.ce39.00-00]"
                .to_owned()
        )
    );
}

#[test]
fn test_render_lsp_scalars() {
    let lsp = minimal_lsp();
    let notifications =
        render_notifications(Some(&lsp), &render_args()).unwrap();
    let updates = update_map(&notifications[0]);

    // The list key leaf is paired with its state mirror.
    let lsp_id = TypedValue::String("0000.4000.ce39.00-00".to_owned());
    assert_eq!(updates["lsp-id"], lsp_id);
    assert_eq!(updates["state/lsp-id"], lsp_id);
    assert_eq!(updates["state/sequence-number"], TypedValue::Uint(5158));
    assert_eq!(updates["state/checksum"], TypedValue::Uint(10111));
    // No flags are set, so no flags leaf is emitted.
    assert!(!updates.contains_key("state/flags"));
}

#[test]
fn test_render_lsp_flags() {
    let mut lsp = minimal_lsp();
    lsp.flags = LspFlags::P | LspFlags::OL;
    let notifications =
        render_notifications(Some(&lsp), &render_args()).unwrap();
    let updates = update_map(&notifications[0]);
    assert_eq!(
        updates["state/flags"],
        TypedValue::Array(vec![
            TypedValue::String("PARTITION_REPAIR".to_owned()),
            TypedValue::String("OVERLOAD".to_owned()),
        ])
    );
}

#[test]
fn test_render_path_elems() {
    let lsp = minimal_lsp();
    let mut args = render_args();
    args.use_path_elems = true;
    let notifications = render_notifications(Some(&lsp), &args).unwrap();
    let notification = &notifications[0];

    let Path::Elems(prefix) = &notification.prefix else {
        panic!("expected structured prefix");
    };
    assert_eq!(prefix.len(), 9);
    assert_eq!(prefix[1].name, "network-instance");
    assert_eq!(prefix[1].keys["name"], "DEFAULT");
    assert_eq!(prefix[3].name, "protocol");
    assert_eq!(prefix[3].keys["identifier"], "ISIS");
    assert_eq!(prefix[3].keys["name"], "15169");
    assert_eq!(prefix[8].name, "lsp");
    assert_eq!(prefix[8].keys["lsp-id"], "0000.4000.ce39.00-00");

    // The lsp-id key leaf comes out as a one-element structured path.
    assert!(notification.updates.iter().any(|update| {
        matches!(&update.path, Path::Elems(elems)
            if elems.len() == 1 && elems[0].name == "lsp-id")
    }));
}

#[test]
fn test_render_ext_is_reach() {
    let lsp = Lsp {
        lsp_id: LspId::from([0x00, 0x00, 0x40, 0x00, 0xce, 0x39, 0x00, 0x00]),
        seqno: 1,
        cksum: 0,
        flags: LspFlags::empty(),
        tlvs: LspTlvs {
            ext_is_reach: Some(ExtIsReachTlv {
                neighbors: BTreeMap::from([(
                    [0x00, 0x00, 0x40, 0x00, 0xce, 0x39, 0x00].into(),
                    Neighbor::default(),
                )]),
            }),
            ..Default::default()
        },
    };
    let notifications =
        render_notifications(Some(&lsp), &render_args()).unwrap();
    let updates = update_map(&notifications[0]);

    let tlv = "tlvs/tlv[type=EXTENDED_IS_REACHABILITY]";
    let name = TypedValue::String("EXTENDED_IS_REACHABILITY".to_owned());
    assert_eq!(updates[&format!("{tlv}/type")], name);
    assert_eq!(updates[&format!("{tlv}/state/type")], name);

    let neighbor = format!(
        "{tlv}/extended-is-reachability/neighbors\
         /neighbor[system-id=0000.4000.ce39.00]"
    );
    let system_id = TypedValue::String("0000.4000.ce39.00".to_owned());
    assert_eq!(updates[&format!("{neighbor}/system-id")], system_id);
    assert_eq!(updates[&format!("{neighbor}/state/system-id")], system_id);
}

// Rendering of a decoded LSP carrying an extended IPv4 reachability prefix
// with a Prefix-SID, plus TE sub-TLVs on an IS neighbor.
#[test]
fn test_render_decoded_lsp() {
    let lsp = decode(&[
        0x00, 0x00, 0x40, 0x00, 0xce, 0x39, 0x00, 0x00, 0x00, 0x00, 0x14,
        0x26, 0x27, 0x7f, 0x03, //
        0x87, 0x12, 0x00, 0x00, 0x00, 0x00, 0xe0, 0x64, 0x01, 0x01, 0x0d,
        0x08, 0x03, 0x06, 0x40, 0x00, 0x00, 0x00, 0x00, 0xc8, //
        0x16, 0x17, 0x00, 0x00, 0x40, 0x00, 0xce, 0x39, 0x02, 0x00, 0x00,
        0x1e, 0x0c, 0x06, 0x04, 0xc0, 0xa8, 0xc9, 0x24, 0x09, 0x04, 0x4f,
        0x15, 0x02, 0xf9,
    ]);
    let notifications =
        render_notifications(Some(&lsp), &render_args()).unwrap();
    let updates = update_map(&notifications[0]);

    let prefix = "tlvs/tlv[type=EXTENDED_IPV4_REACHABILITY]\
                  /extended-ipv4-reachability/prefixes\
                  /prefix[prefix=100.1.1.13/32]";
    let key = TypedValue::String("100.1.1.13/32".to_owned());
    assert_eq!(updates[&format!("{prefix}/prefix")], key);
    assert_eq!(updates[&format!("{prefix}/state/prefix")], key);
    assert_eq!(updates[&format!("{prefix}/state/metric")], TypedValue::Uint(0));
    assert_eq!(
        updates[&format!("{prefix}/state/up-down")],
        TypedValue::Bool(true)
    );
    assert_eq!(
        updates[&format!("{prefix}/state/s-bit")],
        TypedValue::Bool(true)
    );

    let sid = format!(
        "{prefix}/subtlvs/subtlv[type=IP_REACHABILITY_PREFIX_SID]\
         /prefix-sids/prefix-sid[value=200]"
    );
    assert_eq!(updates[&format!("{sid}/value")], TypedValue::Uint(200));
    assert_eq!(updates[&format!("{sid}/state/value")], TypedValue::Uint(200));
    assert_eq!(
        updates[&format!("{sid}/state/algorithm")],
        TypedValue::Uint(0)
    );
    assert_eq!(
        updates[&format!("{sid}/state/flags")],
        TypedValue::Array(vec![TypedValue::String("NODE".to_owned())])
    );

    let instance = "tlvs/tlv[type=EXTENDED_IS_REACHABILITY]\
                    /extended-is-reachability/neighbors\
                    /neighbor[system-id=0000.4000.ce39.02]\
                    /instances/instance[id=0]";
    assert_eq!(updates[&format!("{instance}/id")], TypedValue::Uint(0));
    assert_eq!(updates[&format!("{instance}/state/id")], TypedValue::Uint(0));
    assert_eq!(
        updates[&format!("{instance}/state/metric")],
        TypedValue::Uint(30)
    );
    assert_eq!(
        updates[&format!(
            "{instance}/subtlvs\
             /subtlv[type=IS_REACHABILITY_IPV4_INTERFACE_ADDRESS]\
             /ipv4-interface-address/state/address"
        )],
        TypedValue::Array(vec![TypedValue::String(
            "192.168.201.36".to_owned()
        )])
    );
    assert_eq!(
        updates[&format!(
            "{instance}/subtlvs\
             /subtlv[type=IS_REACHABILITY_MAX_LINK_BANDWIDTH]\
             /max-link-bandwidth/state/bandwidth"
        )],
        TypedValue::Bytes(vec![0x4f, 0x15, 0x02, 0xf9])
    );
}
