//! Data provider lifecycle tests.
//!
//! Timer tests run on a paused Tokio clock, so sleeps advance virtual time
//! instantly once every task is idle.

use crate::helpers::{
    FailingSource, FlakySource, SlowSource, StaticSource, as_source, ids, sheet_rows,
};
use sensor_dashboard::data::sample_records;
use sensor_dashboard::provider::{DataProvider, ProviderConfig, ProviderPhase, RefreshOutcome};
use std::sync::Arc;
use std::time::Duration;

fn config(refresh_interval_ms: i64) -> ProviderConfig {
    ProviderConfig {
        refresh_interval_ms,
        fetch_timeout: Duration::from_secs(30),
    }
}

// ============================================================================
// Refresh outcomes
// ============================================================================

#[tokio::test]
async fn test_failing_source_falls_back_to_sample() -> anyhow::Result<()> {
    let sample = sample_records();
    let provider = DataProvider::new(
        as_source(&FailingSource::new("sheet unreachable")),
        Arc::clone(&sample),
        config(0),
    );

    let outcome = provider.refresh().await;
    assert_eq!(outcome, RefreshOutcome::FallbackAfterError);

    let snapshot = provider.snapshot();
    assert!(Arc::ptr_eq(&snapshot.records, &sample));
    assert_eq!(snapshot.error.as_deref(), Some("sheet unreachable"));
    assert!(!snapshot.is_connected);
    assert!(!snapshot.is_loading);
    assert!(snapshot.using_fallback);
    assert_eq!(
        snapshot.phase,
        ProviderPhase::Ready {
            connected: false,
            using_fallback: true,
        }
    );
    assert_eq!(provider.timings().failures, 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_source_uses_sample_without_error() -> anyhow::Result<()> {
    let sample = sample_records();
    let provider = DataProvider::new(None, Arc::clone(&sample), config(0));
    let before = provider.last_updated();

    assert_eq!(provider.refresh().await, RefreshOutcome::Fallback);
    assert!(Arc::ptr_eq(&provider.records(), &sample));
    assert_eq!(provider.error(), None);
    assert!(!provider.is_connected());
    assert!(!provider.is_loading());
    assert!(provider.last_updated() >= before);
    Ok(())
}

#[tokio::test]
async fn test_successful_fetch_replaces_records() -> anyhow::Result<()> {
    let source = StaticSource::new(sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(0));

    assert_eq!(provider.refresh().await, RefreshOutcome::Live { records: 2 });

    let snapshot = provider.snapshot();
    assert_eq!(ids(snapshot.records.iter()), vec!["S-1", "S-2"]);
    assert!(snapshot.is_connected);
    assert!(!snapshot.using_fallback);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.stats().live, 1);
    assert_eq!(snapshot.vocabulary().customers, vec!["Acme", "Beta"]);
    assert_eq!(source.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_recovery_clears_error() -> anyhow::Result<()> {
    let source = FlakySource::new(sheet_rows(), true);
    let provider = DataProvider::new(as_source(&source), sample_records(), config(0));

    assert_eq!(provider.refresh().await, RefreshOutcome::FallbackAfterError);
    let error = provider.error().unwrap_or_default();
    assert!(error.contains("503"), "unexpected error: {error}");

    source.set_failing(false);
    assert_eq!(provider.refresh().await, RefreshOutcome::Live { records: 2 });
    assert_eq!(provider.error(), None);
    assert!(provider.is_connected());

    // A later failure swaps the live rows back out for the sample
    source.set_failing(true);
    provider.refresh().await;
    assert_eq!(provider.records().len(), sample_records().len());
    assert!(!provider.is_connected());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_fetch_timeout_falls_back() -> anyhow::Result<()> {
    let source = SlowSource::new(Duration::from_secs(60), sheet_rows());
    let provider = DataProvider::new(
        as_source(&source),
        sample_records(),
        ProviderConfig {
            refresh_interval_ms: 0,
            fetch_timeout: Duration::from_secs(1),
        },
    );

    assert_eq!(provider.refresh().await, RefreshOutcome::FallbackAfterError);
    let error = provider.error().unwrap_or_default();
    assert!(error.contains("timed out"), "unexpected error: {error}");
    assert!(!provider.is_loading());
    Ok(())
}

#[tokio::test]
async fn test_subscribers_see_each_commit() -> anyhow::Result<()> {
    let provider = DataProvider::new(
        as_source(&StaticSource::new(sheet_rows())),
        sample_records(),
        config(0),
    );
    let mut changes = provider.subscribe();
    assert!(!changes.has_changed()?);

    provider.refresh().await;
    assert!(changes.has_changed()?);
    // Loading, then ready
    assert_eq!(*changes.borrow_and_update(), 2);
    assert_eq!(provider.snapshot().generation, 2);
    Ok(())
}

// ============================================================================
// Timer & cancellation
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_timer_refreshes_on_interval() -> anyhow::Result<()> {
    let source = StaticSource::new(sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(1_000));

    provider.start().await;
    assert_eq!(source.calls(), 1);
    assert!(provider.is_polling());

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(source.calls(), 2);

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(source.calls(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_non_positive_interval_disables_timer() -> anyhow::Result<()> {
    let source = StaticSource::new(sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(0));

    provider.start().await;
    assert!(!provider.is_polling());
    tokio::time::sleep(Duration::from_secs(3_600)).await;
    assert_eq!(source.calls(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_manual_refresh_keeps_schedule() -> anyhow::Result<()> {
    let source = StaticSource::new(sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(1_000));

    provider.start().await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    provider.refresh().await;
    assert_eq!(source.calls(), 2);

    // The tick still lands one period after start, not after the manual call
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(source.calls(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reconfiguring_interval_replaces_timer() -> anyhow::Result<()> {
    let source = StaticSource::new(sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(0));

    // Not started yet: only stored
    assert_eq!(provider.set_refresh_interval(5_000).await, None);
    assert_eq!(source.calls(), 0);

    provider.start().await;
    assert_eq!(
        provider.set_refresh_interval(1_000).await,
        Some(RefreshOutcome::Live { records: 2 })
    );
    assert_eq!(source.calls(), 2);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(source.calls(), 3);

    provider.set_refresh_interval(-1).await;
    assert!(!provider.is_polling());
    let calls = source.calls();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(source.calls(), calls);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_discards_in_flight_result() -> anyhow::Result<()> {
    let sample = sample_records();
    let source = SlowSource::new(Duration::from_secs(10), sheet_rows());
    let provider = Arc::new(DataProvider::new(
        as_source(&source),
        Arc::clone(&sample),
        config(0),
    ));

    let task = tokio::spawn({
        let provider = Arc::clone(&provider);
        async move { provider.refresh().await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(provider.is_loading());
    assert_eq!(provider.phase(), ProviderPhase::Loading);

    provider.shutdown();
    assert_eq!(task.await?, RefreshOutcome::Cancelled);

    let snapshot = provider.snapshot();
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.phase, ProviderPhase::Uninitialized);
    assert!(Arc::ptr_eq(&snapshot.records, &sample));
    assert!(!snapshot.is_connected);
    assert_eq!(snapshot.error, None);
    assert_eq!(provider.refresh().await, RefreshOutcome::Cancelled);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_timer() -> anyhow::Result<()> {
    let source = StaticSource::new(sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(1_000));
    provider.start().await;
    drop(provider);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(source.calls(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_fetches_never_overlap() -> anyhow::Result<()> {
    let source = SlowSource::new(Duration::from_secs(5), sheet_rows());
    let provider = DataProvider::new(as_source(&source), sample_records(), config(1_000));

    provider.start().await;
    let (first, second) = tokio::join!(provider.refresh(), provider.refresh());
    assert_eq!(first, RefreshOutcome::Live { records: 2 });
    assert_eq!(second, RefreshOutcome::Live { records: 2 });

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(source.calls() >= 3);
    assert_eq!(source.max_in_flight(), 1);
    Ok(())
}
