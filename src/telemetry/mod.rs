//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

pub mod yang;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::packet::consts::{
    NeighborStlvType, PrefixStlvType, RouterCapStlvType, TlvType,
};
use crate::packet::pdu::{Lsp, LspTlvs};
use crate::packet::tlv::{
    Capability, ExtIpv4ReachTlv, ExtIsReachSubTlvs, ExtIsReachTlv,
    Ipv6ReachTlv, PrefixSubTlvs, RouterCapTlv,
};
use crate::telemetry::yang::{ToYang, ToYangBits};

// One element of a structured telemetry path.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PathElem {
    pub name: String,
    pub keys: BTreeMap<String, String>,
}

// A telemetry path, in the representation requested by the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum Path {
    Text(String),
    Elems(Vec<PathElem>),
}

// A single leaf value.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum TypedValue {
    String(String),
    Uint(u64),
    Bool(bool),
    Bytes(Vec<u8>),
    Array(Vec<TypedValue>),
}

// One leaf update, with a path relative to the notification prefix.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Update {
    pub path: Path,
    pub value: TypedValue,
}

// A batch of leaf updates sharing a common prefix and timestamp. LSPs are
// replaced wholesale, so the batch is always marked atomic.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Notification {
    pub timestamp: i64,
    pub prefix: Path,
    pub atomic: bool,
    pub updates: Vec<Update>,
}

// Caller context for rendering one LSP.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RenderArgs {
    // Network instance containing the IS-IS instance.
    pub network_instance: String,
    // Name of the IS-IS protocol instance.
    pub protocol_instance: String,
    // IS-IS level the LSP was flooded in.
    pub level: u8,
    // Timestamp for the generated notification, in nanoseconds.
    pub timestamp: i64,
    // Whether to produce structured path elements instead of textual paths.
    pub use_path_elems: bool,
}

// Telemetry rendering errors.
#[derive(Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum RenderError {
    NilInput,
}

// Accumulates leaf updates relative to the notification prefix.
struct UpdateBuilder {
    use_path_elems: bool,
    updates: Vec<Update>,
}

// ===== impl PathElem =====

impl PathElem {
    fn plain(name: &str) -> Self {
        PathElem {
            name: name.to_owned(),
            keys: Default::default(),
        }
    }

    fn keyed(name: &str, key: &str, value: impl ToString) -> Self {
        PathElem {
            name: name.to_owned(),
            keys: BTreeMap::from([(key.to_owned(), value.to_string())]),
        }
    }
}

// ===== impl Path =====

impl Path {
    fn from_elems(elems: Vec<PathElem>, use_path_elems: bool) -> Self {
        if use_path_elems {
            Path::Elems(elems)
        } else {
            Path::Text(path_to_text(&elems))
        }
    }
}

// ===== impl RenderError =====

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::NilInput => {
                write!(f, "cannot render a nil LSP")
            }
        }
    }
}

impl std::error::Error for RenderError {}

// ===== impl UpdateBuilder =====

impl UpdateBuilder {
    fn push(&mut self, elems: Vec<PathElem>, value: TypedValue) {
        let path = Path::from_elems(elems, self.use_path_elems);
        self.updates.push(Update { path, value });
    }

    // Emits a list key leaf together with its mirror under the entry's
    // state container.
    fn push_key(
        &mut self,
        base: &[PathElem],
        leaf: &str,
        value: TypedValue,
    ) {
        self.push(join(base, &[leaf]), value.clone());
        self.push(join(base, &["state", leaf]), value);
    }
}

// ===== global functions =====

// Renders an LSP as a single atomic notification of per-leaf updates
// anchored under the link-state-database entry identified by the caller
// context.
pub fn render_notifications(
    lsp: Option<&Lsp>,
    args: &RenderArgs,
) -> Result<Vec<Notification>, RenderError> {
    let Some(lsp) = lsp else {
        return Err(RenderError::NilInput);
    };

    let prefix = vec![
        PathElem::plain("network-instances"),
        PathElem::keyed("network-instance", "name", &args.network_instance),
        PathElem::plain("protocols"),
        PathElem {
            name: "protocol".to_owned(),
            keys: BTreeMap::from([
                ("identifier".to_owned(), "ISIS".to_owned()),
                ("name".to_owned(), args.protocol_instance.clone()),
            ]),
        },
        PathElem::plain("isis"),
        PathElem::plain("levels"),
        PathElem::keyed("level", "level-number", args.level),
        PathElem::plain("link-state-database"),
        PathElem::keyed("lsp", "lsp-id", lsp.lsp_id),
    ];
    let prefix = if args.use_path_elems {
        Path::Elems(prefix)
    } else {
        Path::Text(format!("/{}", path_to_text(&prefix)))
    };

    let mut builder = UpdateBuilder {
        use_path_elems: args.use_path_elems,
        updates: vec![],
    };
    render_lsp(lsp, &mut builder);

    Ok(vec![Notification {
        timestamp: args.timestamp,
        prefix,
        atomic: true,
        updates: builder.updates,
    }])
}

// ===== helper functions =====

fn path_to_text(elems: &[PathElem]) -> String {
    let mut text = String::new();
    for (idx, elem) in elems.iter().enumerate() {
        if idx > 0 {
            text.push('/');
        }
        text.push_str(&elem.name);
        for (key, value) in &elem.keys {
            text.push('[');
            text.push_str(key);
            text.push('=');
            text.push_str(value);
            text.push(']');
        }
    }
    text
}

fn join(base: &[PathElem], names: &[&str]) -> Vec<PathElem> {
    let mut elems = base.to_vec();
    elems.extend(names.iter().map(|name| PathElem::plain(name)));
    elems
}

fn join_elem(base: &[PathElem], elem: PathElem) -> Vec<PathElem> {
    let mut elems = base.to_vec();
    elems.push(elem);
    elems
}

fn string_array<T: ToString>(
    values: impl IntoIterator<Item = T>,
) -> TypedValue {
    TypedValue::Array(
        values
            .into_iter()
            .map(|value| TypedValue::String(value.to_string()))
            .collect(),
    )
}

fn flag_array(flags: &impl ToYangBits) -> Option<TypedValue> {
    let flags = flags.to_yang_bits();
    if flags.is_empty() {
        return None;
    }
    Some(string_array(flags))
}

fn render_lsp(lsp: &Lsp, b: &mut UpdateBuilder) {
    b.push_key(&[], "lsp-id", TypedValue::String(lsp.lsp_id.to_string()));
    b.push(
        join(&[], &["state", "sequence-number"]),
        TypedValue::Uint(lsp.seqno.into()),
    );
    b.push(
        join(&[], &["state", "checksum"]),
        TypedValue::Uint(lsp.cksum.into()),
    );
    if let Some(flags) = flag_array(&lsp.flags) {
        b.push(join(&[], &["state", "flags"]), flags);
    }

    render_tlvs(&lsp.tlvs, b);
}

// Emits the `tlv` list entry for one TLV type and returns its base path.
fn tlv_entry(tlv_type: TlvType, b: &mut UpdateBuilder) -> Vec<PathElem> {
    let name = tlv_type.to_yang();
    let base = vec![
        PathElem::plain("tlvs"),
        PathElem::keyed("tlv", "type", &name),
    ];
    b.push_key(&base, "type", TypedValue::String(name.into_owned()));
    base
}

// Emits the `subtlv` list entry for one sub-TLV type and returns its base
// path.
fn subtlv_entry(
    base: &[PathElem],
    name: &str,
    b: &mut UpdateBuilder,
) -> Vec<PathElem> {
    let base = join_elem(
        &join(base, &["subtlvs"]),
        PathElem::keyed("subtlv", "type", name),
    );
    b.push_key(&base, "type", TypedValue::String(name.to_owned()));
    base
}

fn render_tlvs(tlvs: &LspTlvs, b: &mut UpdateBuilder) {
    if let Some(tlv) = &tlvs.area_addrs {
        let base = tlv_entry(TlvType::AreaAddresses, b);
        if !tlv.list.is_empty() {
            b.push(
                join(&base, &["area-address", "state", "address"]),
                string_array(&tlv.list),
            );
        }
    }
    if let Some(tlv) = &tlvs.protocols_supported {
        let base = tlv_entry(TlvType::ProtocolsSupported, b);
        if !tlv.list.is_empty() {
            b.push(
                join(&base, &["nlpid", "state", "nlpid"]),
                string_array(tlv.list.iter().map(|nlpid| nlpid.to_yang())),
            );
        }
    }
    if let Some(tlv) = &tlvs.ipv4_addrs {
        let base = tlv_entry(TlvType::Ipv4Addresses, b);
        if !tlv.list.is_empty() {
            b.push(
                join(
                    &base,
                    &["ipv4-interface-addresses", "state", "address"],
                ),
                string_array(&tlv.list),
            );
        }
    }
    if let Some(tlv) = &tlvs.ipv4_te_router_id {
        let base = tlv_entry(TlvType::Ipv4TeRouterId, b);
        if !tlv.list.is_empty() {
            b.push(
                join(&base, &["ipv4-te-router-id", "state", "router-id"]),
                string_array(&tlv.list),
            );
        }
    }
    if let Some(tlv) = &tlvs.hostname {
        let base = tlv_entry(TlvType::DynamicHostname, b);
        if !tlv.list.is_empty() {
            b.push(
                join(&base, &["hostname", "state", "hostname"]),
                string_array(&tlv.list),
            );
        }
    }
    if let Some(tlv) = &tlvs.ipv6_addrs {
        let base = tlv_entry(TlvType::Ipv6Addresses, b);
        if !tlv.list.is_empty() {
            b.push(
                join(
                    &base,
                    &["ipv6-interface-addresses", "state", "address"],
                ),
                string_array(&tlv.list),
            );
        }
    }
    if let Some(tlv) = &tlvs.ext_is_reach {
        render_ext_is_reach(tlv, b);
    }
    if let Some(tlv) = &tlvs.ext_ipv4_reach {
        render_ext_ipv4_reach(tlv, b);
    }
    if let Some(tlv) = &tlvs.ipv6_reach {
        render_ipv6_reach(tlv, b);
    }
    if let Some(tlv) = &tlvs.router_cap {
        render_router_cap(tlv, b);
    }
}

fn render_ext_is_reach(tlv: &ExtIsReachTlv, b: &mut UpdateBuilder) {
    let base = tlv_entry(TlvType::ExtIsReach, b);
    let base = join(&base, &["extended-is-reachability", "neighbors"]);
    for (neighbor_id, neighbor) in &tlv.neighbors {
        let nbr_base = join_elem(
            &base,
            PathElem::keyed("neighbor", "system-id", neighbor_id),
        );
        b.push_key(
            &nbr_base,
            "system-id",
            TypedValue::String(neighbor_id.to_string()),
        );
        for (instance_id, instance) in &neighbor.instances {
            let inst_base = join_elem(
                &join(&nbr_base, &["instances"]),
                PathElem::keyed("instance", "id", instance_id),
            );
            b.push_key(&inst_base, "id", TypedValue::Uint(*instance_id));
            b.push(
                join(&inst_base, &["state", "metric"]),
                TypedValue::Uint(instance.metric.into()),
            );
            render_is_reach_sub_tlvs(&instance.sub_tlvs, &inst_base, b);
        }
    }
}

fn render_is_reach_sub_tlvs(
    sub_tlvs: &ExtIsReachSubTlvs,
    base: &[PathElem],
    b: &mut UpdateBuilder,
) {
    if !sub_tlvs.admin_groups.is_empty() {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::AdminGroup.to_yang(),
            b,
        );
        b.push(
            join(&stlv_base, &["admin-group", "state", "admin-group"]),
            TypedValue::Array(
                sub_tlvs
                    .admin_groups
                    .iter()
                    .map(|group| TypedValue::Uint(group.get().into()))
                    .collect(),
            ),
        );
    }
    if let Some(link_id) = &sub_tlvs.link_id {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::LinkLocalRemoteIds.to_yang(),
            b,
        );
        b.push(
            join(&stlv_base, &["link-id", "state", "local"]),
            TypedValue::Uint(link_id.local.into()),
        );
        b.push(
            join(&stlv_base, &["link-id", "state", "remote"]),
            TypedValue::Uint(link_id.remote.into()),
        );
    }
    if !sub_tlvs.ipv4_interface_addrs.is_empty() {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::Ipv4InterfaceAddress.to_yang(),
            b,
        );
        b.push(
            join(&stlv_base, &["ipv4-interface-address", "state", "address"]),
            string_array(
                sub_tlvs.ipv4_interface_addrs.iter().map(|stlv| stlv.get()),
            ),
        );
    }
    if !sub_tlvs.ipv4_neighbor_addrs.is_empty() {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::Ipv4NeighborAddress.to_yang(),
            b,
        );
        b.push(
            join(&stlv_base, &["ipv4-neighbor-address", "state", "address"]),
            string_array(
                sub_tlvs.ipv4_neighbor_addrs.iter().map(|stlv| stlv.get()),
            ),
        );
    }
    if let Some(stlv) = &sub_tlvs.max_link_bw {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::MaxLinkBandwidth.to_yang(),
            b,
        );
        b.push(
            join(&stlv_base, &["max-link-bandwidth", "state", "bandwidth"]),
            TypedValue::Bytes(stlv.get().as_bytes().to_vec()),
        );
    }
    if let Some(stlv) = &sub_tlvs.max_resv_link_bw {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::MaxResvLinkBandwidth.to_yang(),
            b,
        );
        b.push(
            join(
                &stlv_base,
                &["max-reservable-link-bandwidth", "state", "bandwidth"],
            ),
            TypedValue::Bytes(stlv.get().as_bytes().to_vec()),
        );
    }
    if let Some(stlv) = &sub_tlvs.unreserved_bw {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::UnreservedBandwidth.to_yang(),
            b,
        );
        for (priority, bw) in stlv.iter() {
            let prio_base = join_elem(
                &join(&stlv_base, &["setup-priorities"]),
                PathElem::keyed("setup-priority", "priority", priority),
            );
            b.push_key(
                &prio_base,
                "priority",
                TypedValue::Uint(priority.into()),
            );
            b.push(
                join(&prio_base, &["state", "bandwidth"]),
                TypedValue::Bytes(bw.as_bytes().to_vec()),
            );
        }
    }
    if !sub_tlvs.adj_sids.is_empty() {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::AdjacencySid.to_yang(),
            b,
        );
        for (value, stlv) in &sub_tlvs.adj_sids {
            let sid_base = join_elem(
                &join(&stlv_base, &["adjacency-sids"]),
                PathElem::keyed("adjacency-sid", "value", value),
            );
            b.push_key(&sid_base, "value", TypedValue::Uint((*value).into()));
            b.push(
                join(&sid_base, &["state", "weight"]),
                TypedValue::Uint(stlv.weight.into()),
            );
            if let Some(flags) = flag_array(&stlv.flags) {
                b.push(join(&sid_base, &["state", "flags"]), flags);
            }
        }
    }
    if !sub_tlvs.lan_adj_sids.is_empty() {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::LanAdjacencySid.to_yang(),
            b,
        );
        for (value, stlv) in &sub_tlvs.lan_adj_sids {
            let sid_base = join_elem(
                &join(&stlv_base, &["lan-adjacency-sids"]),
                PathElem::keyed("lan-adjacency-sid", "value", value),
            );
            b.push_key(&sid_base, "value", TypedValue::Uint((*value).into()));
            b.push(
                join(&sid_base, &["state", "weight"]),
                TypedValue::Uint(stlv.weight.into()),
            );
            b.push(
                join(&sid_base, &["state", "neighbor-id"]),
                TypedValue::String(stlv.neighbor.to_string()),
            );
            if let Some(flags) = flag_array(&stlv.flags) {
                b.push(join(&sid_base, &["state", "flags"]), flags);
            }
        }
    }
    if let Some(stlv) = &sub_tlvs.residual_bw {
        let stlv_base = subtlv_entry(
            base,
            &NeighborStlvType::ResidualBandwidth.to_yang(),
            b,
        );
        b.push(
            join(&stlv_base, &["residual-bandwidth", "state", "bandwidth"]),
            TypedValue::Bytes(stlv.get().as_bytes().to_vec()),
        );
    }
}

fn render_prefix_sub_tlvs(
    sub_tlvs: &PrefixSubTlvs,
    base: &[PathElem],
    b: &mut UpdateBuilder,
) {
    if sub_tlvs.prefix_sids.is_empty() {
        return;
    }
    let stlv_base =
        subtlv_entry(base, &PrefixStlvType::PrefixSid.to_yang(), b);
    for (value, stlv) in &sub_tlvs.prefix_sids {
        let sid_base = join_elem(
            &join(&stlv_base, &["prefix-sids"]),
            PathElem::keyed("prefix-sid", "value", value),
        );
        b.push_key(&sid_base, "value", TypedValue::Uint((*value).into()));
        b.push(
            join(&sid_base, &["state", "algorithm"]),
            TypedValue::Uint(stlv.algo.into()),
        );
        if let Some(flags) = flag_array(&stlv.flags) {
            b.push(join(&sid_base, &["state", "flags"]), flags);
        }
    }
}

fn render_ext_ipv4_reach(tlv: &ExtIpv4ReachTlv, b: &mut UpdateBuilder) {
    let base = tlv_entry(TlvType::ExtIpv4Reach, b);
    let base = join(&base, &["extended-ipv4-reachability", "prefixes"]);
    for (prefix, entry) in &tlv.prefixes {
        let entry_base =
            join_elem(&base, PathElem::keyed("prefix", "prefix", prefix));
        b.push_key(
            &entry_base,
            "prefix",
            TypedValue::String(prefix.to_string()),
        );
        b.push(
            join(&entry_base, &["state", "metric"]),
            TypedValue::Uint(entry.metric.into()),
        );
        b.push(
            join(&entry_base, &["state", "up-down"]),
            TypedValue::Bool(entry.up_down),
        );
        b.push(
            join(&entry_base, &["state", "s-bit"]),
            TypedValue::Bool(entry.s_bit),
        );
        render_prefix_sub_tlvs(&entry.sub_tlvs, &entry_base, b);
    }
}

fn render_ipv6_reach(tlv: &Ipv6ReachTlv, b: &mut UpdateBuilder) {
    let base = tlv_entry(TlvType::Ipv6Reach, b);
    let base = join(&base, &["ipv6-reachability", "prefixes"]);
    for (prefix, entry) in &tlv.prefixes {
        let entry_base =
            join_elem(&base, PathElem::keyed("prefix", "prefix", prefix));
        b.push_key(
            &entry_base,
            "prefix",
            TypedValue::String(prefix.to_string()),
        );
        b.push(
            join(&entry_base, &["state", "metric"]),
            TypedValue::Uint(entry.metric.into()),
        );
        b.push(
            join(&entry_base, &["state", "up-down"]),
            TypedValue::Bool(entry.up_down),
        );
        b.push(
            join(&entry_base, &["state", "x-bit"]),
            TypedValue::Bool(entry.x_bit),
        );
        b.push(
            join(&entry_base, &["state", "s-bit"]),
            TypedValue::Bool(entry.s_bit),
        );
        render_prefix_sub_tlvs(&entry.sub_tlvs, &entry_base, b);
    }
}

fn render_router_cap(tlv: &RouterCapTlv, b: &mut UpdateBuilder) {
    let base = tlv_entry(TlvType::RouterCapability, b);
    let base = join(&base, &["router-capabilities"]);
    for (instance_id, capability) in &tlv.capabilities {
        let cap_base = join_elem(
            &base,
            PathElem::keyed("capability", "instance-number", instance_id),
        );
        b.push_key(
            &cap_base,
            "instance-number",
            TypedValue::Uint((*instance_id).into()),
        );
        b.push(
            join(&cap_base, &["state", "router-id"]),
            TypedValue::String(capability.router_id.to_string()),
        );
        if let Some(flags) = flag_array(&capability.flags) {
            b.push(join(&cap_base, &["state", "flags"]), flags);
        }
        render_capability_sub_tlvs(capability, &cap_base, b);
    }
}

fn render_capability_sub_tlvs(
    capability: &Capability,
    base: &[PathElem],
    b: &mut UpdateBuilder,
) {
    if let Some(stlv) = &capability.sub_tlvs.sr_cap {
        let stlv_base = subtlv_entry(
            base,
            &RouterCapStlvType::SrCapability.to_yang(),
            b,
        );
        let srcap_base = join(&stlv_base, &["segment-routing-capability"]);
        if let Some(flags) = flag_array(&stlv.flags) {
            b.push(join(&srcap_base, &["state", "flags"]), flags);
        }
        for (index, descriptor) in stlv.srgb_descriptors.iter().enumerate() {
            let descr_base = join_elem(
                &join(&srcap_base, &["srgb-descriptors"]),
                PathElem::keyed("srgb-descriptor", "index", index),
            );
            b.push_key(
                &descr_base,
                "index",
                TypedValue::Uint(index as u64),
            );
            b.push(
                join(&descr_base, &["state", "range"]),
                TypedValue::Uint(descriptor.range.into()),
            );
            b.push(
                join(&descr_base, &["state", "label"]),
                TypedValue::Uint(descriptor.value.into()),
            );
        }
    }
    if let Some(stlv) = &capability.sub_tlvs.sr_algo {
        let stlv_base = subtlv_entry(
            base,
            &RouterCapStlvType::SrAlgorithm.to_yang(),
            b,
        );
        if !stlv.get().is_empty() {
            b.push(
                join(
                    &stlv_base,
                    &["segment-routing-algorithms", "state", "algorithm"],
                ),
                string_array(stlv.get().iter().map(|algo| algo.to_yang())),
            );
        }
    }
}
