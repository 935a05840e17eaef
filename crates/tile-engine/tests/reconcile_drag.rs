use std::sync::Arc;

use tile_engine::{EngineConfig, MockCall, MockWindowOps, Reconciler, TickOutcome, WindowOps};
use tile_geom::{Point, Rect, Screen, Size};
use tile_ids::{ScreenId, WindowId};
use tile_layout::WindowSnapshot;

const A: WindowId = WindowId::new(1);
const B: WindowId = WindowId::new(2);

/// Two side-by-side windows on a 1000x1000 screen with the button held.
fn side_by_side() -> (Arc<MockWindowOps>, Reconciler) {
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
    let r = Reconciler::new(ops.clone(), EngineConfig::default());
    (ops, r)
}

/// Move A horizontally, keeping its other edges.
fn drag_a_to(ops: &MockWindowOps, x: f64) {
    if let Some(mut f) = ops.frame(A) {
        f.x = x;
        ops.set_frame(A, f);
    }
}

/// Run the first tick, then drag A 50 units right and run the second.
async fn drag_a(ops: &MockWindowOps, r: &mut Reconciler) -> TickOutcome {
    assert_eq!(r.tick().await, TickOutcome::NoDrag);
    drag_a_to(ops, 50.0);
    r.tick().await
}

#[tokio::test(start_paused = true)]
async fn dragged_window_is_anchor_and_neighbour_follows() {
    let (ops, mut r) = side_by_side();
    let TickOutcome::Reconciled(report) = drag_a(&ops, &mut r).await else {
        panic!("expected a reconciled tick");
    };
    assert_eq!(report.dragged, A);
    assert_eq!(report.applied, vec![B]);
    assert!(report.failed.is_empty());
    assert_eq!(report.plan.target(A), Some(Rect::new(0.0, 0.0, 525.0, 1000.0)));
    assert_eq!(report.plan.target(B), Some(Rect::new(525.0, 0.0, 475.0, 1000.0)));

    assert_eq!(
        ops.mutations(),
        vec![
            MockCall::SetSize(B, Size::new(475.0, 1000.0)),
            MockCall::SetPosition(B, Point::new(525.0, 0.0)),
            MockCall::SetSize(B, Size::new(475.0, 1000.0)),
        ]
    );
    assert_eq!(ops.frame(A), Some(Rect::new(50.0, 0.0, 500.0, 1000.0)));
    assert_eq!(ops.frame(B), Some(Rect::new(525.0, 0.0, 475.0, 1000.0)));
    assert_eq!(r.state().locked, Some(A));
}

#[tokio::test(start_paused = true)]
async fn neighbour_creeps_then_settles() {
    let (ops, mut r) = side_by_side();
    drag_a(&ops, &mut r).await;
    // A overlaps B, so each pass splits between centers and B creeps right
    // until the cut stops moving.
    let mut xs = vec![ops.frame(B).map(|f| f.x)];
    for _ in 0..10 {
        let TickOutcome::Reconciled(report) = r.tick().await else {
            panic!("expected a reconciled tick");
        };
        assert_eq!(report.dragged, A);
        if report.applied.is_empty() {
            break;
        }
        assert_eq!(report.applied, vec![B]);
        xs.push(ops.frame(B).map(|f| f.x));
    }
    assert_eq!(xs, vec![Some(525.0), Some(531.0), Some(533.0)]);
    assert_eq!(ops.frame(B), Some(Rect::new(533.0, 0.0, 467.0, 1000.0)));
    assert_eq!(ops.frame(A), Some(Rect::new(50.0, 0.0, 500.0, 1000.0)));

    ops.clear_calls();
    let TickOutcome::Reconciled(report) = r.tick().await else {
        panic!("expected a reconciled tick");
    };
    assert!(report.applied.is_empty());
    assert!(ops.mutations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn lock_holds_while_another_window_moves_more() {
    let (ops, mut r) = side_by_side();
    drag_a(&ops, &mut r).await;
    // B jumps far further than A moved; A stays the drag target.
    ops.set_frame(B, Rect::new(900.0, 0.0, 100.0, 1000.0));
    let TickOutcome::Reconciled(report) = r.tick().await else {
        panic!("expected a reconciled tick");
    };
    assert_eq!(report.dragged, A);
    assert!(!ops.mutations().iter().any(|c| match c {
        MockCall::SetPosition(id, _) | MockCall::SetSize(id, _) => *id == A,
        MockCall::Focus(_) => false,
    }));
}

#[tokio::test(start_paused = true)]
async fn release_during_tick_clears_lock() {
    let (ops, mut r) = side_by_side();
    assert_eq!(r.tick().await, TickOutcome::NoDrag);
    ops.set_frame(A, Rect::new(50.0, 0.0, 500.0, 1000.0));
    // Held when the tick starts, released by the time it finishes.
    ops.script_pressed([true, false]);
    ops.set_pressed(false);
    assert!(matches!(r.tick().await, TickOutcome::Reconciled(_)));
    assert_eq!(r.state().locked, None);
    assert_eq!(r.tick().await, TickOutcome::NoDrag);
}

#[tokio::test(start_paused = true)]
async fn vanished_lock_is_dropped() {
    let (ops, mut r) = side_by_side();
    drag_a(&ops, &mut r).await;
    ops.remove_window(A);
    ops.clear_calls();
    assert_eq!(r.tick().await, TickOutcome::NoDrag);
    assert_eq!(r.state().locked, None);
    assert!(ops.mutations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn focused_window_stands_in_without_locking() {
    let (ops, mut r) = side_by_side();
    ops.set_focused(Some(B));
    let TickOutcome::Reconciled(report) = r.tick().await else {
        panic!("expected a reconciled tick");
    };
    assert_eq!(report.dragged, B);
    assert!(report.applied.is_empty());
    assert_eq!(r.state().locked, None);
}

#[tokio::test(start_paused = true)]
async fn window_that_ignores_requests_is_retried() {
    let (ops, mut r) = side_by_side();
    ops.set_frozen(B, true);
    drag_a(&ops, &mut r).await;
    assert_eq!(ops.frame(B), Some(Rect::new(500.0, 0.0, 500.0, 1000.0)));

    ops.clear_calls();
    let TickOutcome::Reconciled(report) = r.tick().await else {
        panic!("expected a reconciled tick");
    };
    assert_eq!(report.applied, vec![B]);
    assert_eq!(ops.mutations().len(), 3);

    ops.set_frozen(B, false);
    r.tick().await;
    assert_eq!(ops.frame(B), Some(Rect::new(525.0, 0.0, 475.0, 1000.0)));
}

#[tokio::test(start_paused = true)]
async fn windows_on_other_screens_are_untouched() {
    let (ops, mut r) = side_by_side();
    ops.set_screens(vec![
        Screen::full(ScreenId::new(1), Rect::new(0.0, 0.0, 1000.0, 1000.0)),
        Screen::full(ScreenId::new(2), Rect::new(1000.0, 0.0, 1000.0, 1000.0)),
    ]);
    let c = WindowId::new(3);
    let mut wins = ops.list_windows();
    wins.push(WindowSnapshot::new(
        c,
        Rect::new(1200.0, 100.0, 300.0, 300.0),
        ScreenId::new(2),
    ));
    ops.set_windows(wins);

    let TickOutcome::Reconciled(report) = drag_a(&ops, &mut r).await else {
        panic!("expected a reconciled tick");
    };
    assert_eq!(report.screen, ScreenId::new(1));
    assert_eq!(report.plan.target(c), None);
    assert_eq!(ops.frame(c), Some(Rect::new(1200.0, 100.0, 300.0, 300.0)));
    assert_eq!(
        r.state().previous.get(&c),
        Some(&Rect::new(1200.0, 600.0, 300.0, 300.0))
    );
}

/// The visible frame excludes a strip along the top of the screen.
#[tokio::test(start_paused = true)]
async fn producer_frames_are_flipped_against_desktop_top() {
    let ops = Arc::new(MockWindowOps::new());
    ops.set_screens(vec![Screen {
        id: ScreenId::new(1),
        frame: Rect::new(0.0, 0.0, 1000.0, 1000.0),
        visible_frame: Rect::new(0.0, 0.0, 1000.0, 900.0),
    }]);
    ops.set_windows(vec![
        WindowSnapshot::new(A, Rect::new(0.0, 100.0, 500.0, 900.0), ScreenId::new(1)),
        WindowSnapshot::new(B, Rect::new(500.0, 100.0, 500.0, 900.0), ScreenId::new(1)),
    ]);
    ops.set_pressed(true);
    let mut r = Reconciler::new(ops.clone(), EngineConfig::default());

    assert_eq!(r.tick().await, TickOutcome::NoDrag);
    assert_eq!(
        r.state().previous.get(&A),
        Some(&Rect::new(0.0, 0.0, 500.0, 900.0))
    );
    drag_a_to(&ops, 50.0);
    r.tick().await;
    assert_eq!(ops.frame(B), Some(Rect::new(525.0, 100.0, 475.0, 900.0)));
}
