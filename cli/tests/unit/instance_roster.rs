//! Instance roster tests: ordering, per-row probes and probe cancellation.

#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use provctl_cli::application::ports::RosterRefresh;
use provctl_cli::application::services::cache_admin;
use provctl_cli::application::services::instance_roster::{
    InstanceRoster, ROSTER_UNAVAILABLE, probe,
};
use provctl_cli::domain::{BannerKind, Liveness};
use provctl_common::ClearCacheResponse;

use crate::helpers::{RecordingView, ScriptedApi, ViewEvent, record};

type Fixture = (
    Arc<ScriptedApi>,
    Arc<RecordingView>,
    InstanceRoster<ScriptedApi, RecordingView>,
);

fn roster(api: ScriptedApi) -> Fixture {
    let api = Arc::new(api);
    let view = Arc::new(RecordingView::default());
    let roster = InstanceRoster::new(Arc::clone(&api), Arc::clone(&view), "instances.local");
    (api, view, roster)
}

#[tokio::test]
async fn rows_are_newest_first_and_settle() {
    let (api, view, roster) = roster(
        ScriptedApi::new()
            .instances(vec![record("1", "web1"), record("2", "web2")])
            .ping("web1", true)
            .ping("web2", false),
    );

    let rows = roster.reload().await.expect("list fetched");
    assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["2", "1"]);
    assert!(rows.iter().all(|r| r.liveness == Liveness::Checking));
    assert_eq!(rows[0].hostname, "web2.instances.local");

    roster.settle().await;

    let settled = view.rows();
    assert_eq!(settled[0].liveness, Liveness::Offline);
    assert_eq!(settled[1].liveness, Liveness::Online);
    assert_eq!(api.count("ping"), 2);
    assert_eq!(roster.pending_probes(), 0);
}

#[tokio::test]
async fn duplicate_ids_settle_every_row() {
    let (api, view, roster) = roster(
        ScriptedApi::new()
            .instances(vec![record("1", "web1"), record("1", "web2")])
            .ping("web1", true)
            .ping("web2", false),
    );

    roster.reload().await.expect("list fetched");
    roster.settle().await;

    let settled: Vec<_> = view
        .rows()
        .into_iter()
        .map(|r| (r.prefix, r.liveness))
        .collect();
    assert_eq!(
        settled,
        [
            ("web2".to_string(), Liveness::Offline),
            ("web1".to_string(), Liveness::Online),
        ]
    );
    assert_eq!(api.count("ping"), 2);
    assert_eq!(view.liveness_updates(), 2);
}

#[tokio::test]
async fn empty_roster_renders_placeholder_without_probes() {
    let (api, view, roster) = roster(ScriptedApi::new().instances(Vec::new()));

    roster.refresh().await;
    roster.settle().await;

    assert_eq!(view.events(), [ViewEvent::Empty]);
    assert_eq!(api.count("ping"), 0);
}

#[tokio::test]
async fn probe_error_settles_as_error() {
    let (_api, view, roster) = roster(
        ScriptedApi::new()
            .instances(vec![record("7", "db1")])
            .ping_error("db1"),
    );

    roster.refresh().await;
    roster.settle().await;

    assert_eq!(view.rows()[0].liveness, Liveness::Error);
}

#[tokio::test]
async fn fetch_failure_renders_error() {
    let (_api, view, roster) = roster(ScriptedApi::new().instances_error());

    assert!(roster.reload().await.is_err());
    roster.refresh().await;

    assert_eq!(
        view.events().last(),
        Some(&ViewEvent::Error(ROSTER_UNAVAILABLE.to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn refresh_aborts_outstanding_probes() {
    let (_api, view, roster) = roster(
        ScriptedApi::new()
            .instances(vec![record("1", "web1"), record("2", "web2")])
            .ping("web1", true)
            .ping("web2", true)
            .ping_delay(Duration::from_secs(10)),
    );

    roster.reload().await.expect("first");
    assert_eq!(roster.pending_probes(), 2);
    roster.reload().await.expect("second");
    roster.settle().await;

    // Only the second generation of probes reported back.
    assert_eq!(view.liveness_updates(), 2);
    assert!(view.rows().iter().all(|r| r.liveness == Liveness::Online));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_roster_aborts_probes() {
    let (_api, view, roster) = roster(
        ScriptedApi::new()
            .instances(vec![record("1", "web1")])
            .ping("web1", true)
            .ping_delay(Duration::from_secs(10)),
    );

    roster.reload().await.expect("fetched");
    drop(roster);
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(view.liveness_updates(), 0);
}

#[tokio::test]
async fn single_probe_maps_reachability() {
    let api = ScriptedApi::new().ping("up", true).ping("down", false);
    assert_eq!(probe(&api, "up").await, Liveness::Online);
    assert_eq!(probe(&api, "down").await, Liveness::Offline);
    assert_eq!(probe(&api, "unscripted").await, Liveness::Error);
}

#[tokio::test]
async fn clear_cache_reports_backend_answer() {
    let api = ScriptedApi::new().clear(ClearCacheResponse {
        success: true,
        message: Some("Cache cleared".into()),
    });
    let banner = cache_admin::clear_cache(&api).await;
    assert_eq!(banner.kind, BannerKind::Success);
    assert_eq!(banner.message, "Cache cleared");

    let api = ScriptedApi::new().clear_error();
    let banner = cache_admin::clear_cache(&api).await;
    assert_eq!(banner.kind, BannerKind::Failure);
}
