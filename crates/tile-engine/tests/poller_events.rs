use std::sync::Arc;

use tile_engine::{
    DragState, EngineConfig, MockWindowOps, Poller, ReconcileEvent, Reconciler, TickOutcome, Tiler,
};
use tile_geom::{Rect, Screen};
use tile_ids::{ScreenId, WindowId};
use tile_layout::{Side, WindowSnapshot};
use tokio::sync::broadcast::Receiver;

const A: WindowId = WindowId::new(1);
const B: WindowId = WindowId::new(2);

fn desktop() -> Arc<MockWindowOps> {
    let ops = Arc::new(MockWindowOps::new());
    ops.set_screens(vec![Screen::full(
        ScreenId::new(1),
        Rect::new(0.0, 0.0, 1000.0, 1000.0),
    )]);
    ops.set_windows(vec![
        WindowSnapshot::new(A, Rect::new(0.0, 0.0, 500.0, 1000.0), ScreenId::new(1)),
        WindowSnapshot::new(B, Rect::new(500.0, 0.0, 500.0, 1000.0), ScreenId::new(1)),
    ]);
    ops.set_pressed(true);
    ops
}

/// Next event that is not a layout change.
async fn next_tick(rx: &mut Receiver<ReconcileEvent>) -> ReconcileEvent {
    loop {
        match rx.recv().await {
            Ok(ReconcileEvent::LayoutChanged { .. }) => continue,
            Ok(ev) => return ev,
            Err(e) => panic!("event channel failed: {e}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn polling_reconciles_and_publishes() {
    let ops = desktop();
    let poller = Poller::new(Reconciler::new(ops.clone(), EngineConfig::default()));
    let mut rx = poller.subscribe();

    poller.start().await;
    assert!(poller.is_polling());
    assert_eq!(rx.recv().await.unwrap(), ReconcileEvent::Started);
    assert_eq!(next_tick(&mut rx).await, ReconcileEvent::Tick(TickOutcome::NoDrag));

    ops.set_frame(A, Rect::new(50.0, 0.0, 500.0, 1000.0));
    let ReconcileEvent::Tick(TickOutcome::Reconciled(report)) = next_tick(&mut rx).await else {
        panic!("expected a reconciled tick");
    };
    assert_eq!(report.dragged, A);
    assert_eq!(report.applied, vec![B]);

    let ReconcileEvent::LayoutChanged { frames } = rx.recv().await.unwrap() else {
        panic!("expected a layout change");
    };
    assert_eq!(frames.get(&B), Some(&Rect::new(525.0, 0.0, 475.0, 1000.0)));

    poller.stop().await;
    assert!(!poller.is_polling());
    let mut saw_stopped = false;
    while let Ok(ev) = rx.try_recv() {
        saw_stopped |= ev == ReconcileEvent::Stopped;
    }
    assert!(saw_stopped);
    assert_eq!(poller.reconciler().lock().await.state(), &DragState::new());
}

#[tokio::test(start_paused = true)]
async fn quiet_ticks_do_not_report_layout_changes() {
    let ops = desktop();
    ops.set_pressed(false);
    let poller = Poller::new(Reconciler::new(ops, EngineConfig::default()));
    let mut rx = poller.subscribe();
    poller.start().await;

    assert_eq!(rx.recv().await.unwrap(), ReconcileEvent::Started);
    assert_eq!(rx.recv().await.unwrap(), ReconcileEvent::Tick(TickOutcome::NoDrag));
    // First tick: the tracked set grew from nothing.
    assert!(matches!(rx.recv().await.unwrap(), ReconcileEvent::LayoutChanged { .. }));
    assert_eq!(rx.recv().await.unwrap(), ReconcileEvent::Tick(TickOutcome::NoDrag));
    assert_eq!(rx.recv().await.unwrap(), ReconcileEvent::Tick(TickOutcome::NoDrag));
    poller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_when_idle_is_silent_and_restart_resets() {
    let ops = desktop();
    let poller = Poller::new(Reconciler::new(ops, EngineConfig::default()));
    let mut rx = poller.subscribe();
    poller.stop().await;
    assert!(rx.try_recv().is_err());

    poller.start().await;
    next_tick(&mut rx).await;
    next_tick(&mut rx).await;
    poller.start().await;
    assert!(poller.is_polling());
    poller.stop().await;
    assert!(!poller.is_polling());
}

#[tokio::test(start_paused = true)]
async fn tiler_layout_resets_drag_history() {
    let ops = desktop();
    ops.set_pressed(false);
    let tiler = Tiler::new(ops.clone(), EngineConfig::default());
    tiler.poller().reconciler().lock().await.tick().await;
    assert_eq!(tiler.poller().reconciler().lock().await.state().previous.len(), 2);

    let out = tiler.primary_stacked(Side::Left).await.unwrap().unwrap();
    assert_eq!(out.primary, A);
    assert_eq!(ops.frame(A), Some(Rect::new(0.0, 0.0, 500.0, 1000.0)));
    assert_eq!(ops.frame(B), Some(Rect::new(500.0, 0.0, 500.0, 1000.0)));
    assert_eq!(tiler.poller().reconciler().lock().await.state(), &DragState::new());

    let next = tiler.primary_only().await.unwrap().unwrap();
    assert_eq!(next.primary, B);
    assert_eq!(ops.frame(B), Some(Rect::new(0.0, 0.0, 1000.0, 1000.0)));
}
