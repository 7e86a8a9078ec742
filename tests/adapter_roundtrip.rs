// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

//! End-to-end update loop: app snapshot -> model -> edit -> batch -> app
//! snapshot, with the echo-suppression flag in the middle.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use graphbind::adapter::{DiagramAdapter, OverviewAdapter};
use graphbind::graph::GraphModel;
use graphbind::model::{IncrementalData, Key, KeyAccessor, Record};
use graphbind::sync::{sync_link_data, sync_node_data};

fn node(key: i64, text: &str) -> Record {
    Record::new().with("key", key).with("text", text)
}

fn link(key: &str, from: i64, to: i64) -> Record {
    Record::new().with("key", key).with("from", from).with("to", to)
}

/// App-owned state plus an attached adapter whose subscriber logs batches.
struct BoundCtx {
    adapter: DiagramAdapter,
    batches: Arc<Mutex<Vec<IncrementalData>>>,
    node_snapshot: Vec<Record>,
    link_snapshot: Vec<Record>,
}

#[fixture]
fn ctx() -> BoundCtx {
    let mut adapter = DiagramAdapter::new(GraphModel::new);
    let node_snapshot = vec![node(1, "alpha"), node(2, "beta")];
    let link_snapshot = vec![link("l1", 1, 2)];
    adapter.set_node_data(node_snapshot.clone());
    adapter.set_link_data(Some(link_snapshot.clone()));
    adapter.attach().expect("attach");

    let batches: Arc<Mutex<Vec<IncrementalData>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&batches);
    adapter.subscribe_model_change(move |batch| {
        sink.lock().expect("batch lock").push(batch.clone());
    });

    BoundCtx { adapter, batches, node_snapshot, link_snapshot }
}

#[rstest]
fn model_edit_round_trips_into_the_app_snapshot(mut ctx: BoundCtx) {
    ctx.adapter
        .edit("user adds a node and rewires", |m| {
            m.insert_node(node(3, "gamma"))?;
            m.remove_link(&Key::Str("l1".to_owned()))?;
            m.insert_link(link("l2", 1, 3))?;
            Ok(())
        })
        .expect("edit");

    let batches = ctx.batches.lock().expect("batch lock").clone();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];

    // the app folds the batch into its own snapshot...
    let by_key = KeyAccessor::default();
    ctx.node_snapshot = sync_node_data(batch, ctx.node_snapshot, &by_key).expect("sync nodes");
    ctx.link_snapshot = sync_link_data(batch, ctx.link_snapshot, &by_key).expect("sync links");

    assert_eq!(
        ctx.node_snapshot,
        vec![node(1, "alpha"), node(2, "beta"), node(3, "gamma")]
    );
    assert_eq!(ctx.link_snapshot, vec![link("l2", 1, 3)]);

    // ...and hands it back with the skip flag set: the model must not churn
    ctx.adapter.set_skips_model_update(true);
    ctx.adapter.set_node_data(ctx.node_snapshot.clone());
    ctx.adapter.set_link_data(Some(ctx.link_snapshot.clone()));
    ctx.adapter.on_changes().expect("on_changes");
    ctx.adapter.set_skips_model_update(false);
    ctx.adapter.on_changes().expect("on_changes");

    assert_eq!(ctx.adapter.model().node_data(), &ctx.node_snapshot[..]);
    assert_eq!(ctx.adapter.model().link_data(), &ctx.link_snapshot[..]);
    // the round trip itself produced no further batches
    assert_eq!(ctx.batches.lock().expect("batch lock").len(), 1);
}

#[rstest]
fn app_update_reaches_the_model_without_echoing(mut ctx: BoundCtx) {
    ctx.node_snapshot.push(node(3, "gamma"));
    ctx.adapter.set_node_data(ctx.node_snapshot.clone());
    ctx.adapter.on_changes().expect("on_changes");
    ctx.adapter.pump_model_changes();

    assert_eq!(ctx.adapter.model().node_data(), &ctx.node_snapshot[..]);
    assert!(ctx.batches.lock().expect("batch lock").is_empty());
}

#[rstest]
fn overview_mirror_tracks_the_observed_adapter(mut ctx: BoundCtx) {
    let mut overview = OverviewAdapter::new();
    assert!(overview.on_changes(Some(&ctx.adapter)));
    assert_eq!(overview.mirror().node_data, ctx.node_snapshot);

    ctx.adapter
        .edit("rename beta", |m| {
            m.update_node(&Key::Int(2), &node(2, "beta2")).map(|_| ())
        })
        .expect("edit");

    let batches = ctx.batches.lock().expect("batch lock").clone();
    assert_eq!(batches.len(), 1);
    overview
        .apply_model_changes(ctx.adapter.id(), &batches[0])
        .expect("apply");

    assert_eq!(
        overview.mirror().node_data,
        vec![node(1, "alpha"), node(2, "beta2")]
    );
}

#[rstest]
fn batches_survive_the_wire(mut ctx: BoundCtx) {
    ctx.adapter
        .edit("add gamma", |m| m.insert_node(node(3, "gamma")).map(|_| ()))
        .expect("edit");

    let batches = ctx.batches.lock().expect("batch lock").clone();
    let json = serde_json::to_string(&batches[0]).expect("serialize");
    let back: IncrementalData = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(back, batches[0]);
    let by_key = KeyAccessor::default();
    let synced = sync_node_data(&back, ctx.node_snapshot.clone(), &by_key).expect("sync");
    assert_eq!(synced.len(), 3);
}
