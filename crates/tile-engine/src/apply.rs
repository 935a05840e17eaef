//! Frame mutation sequences with settle delays.
//!
//! The window server applies requests asynchronously, and a read straight
//! after a write can return the old frame. Every helper here therefore sleeps
//! for the settle delay after each request. All rectangles are in producer
//! space.

use std::time::Duration;

use tile_geom::{Point, Rect};
use tile_ids::WindowId;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{debug, trace};

use crate::{Result, ops::WindowOps};

/// Size, position, then size again.
///
/// Some windows reposition themselves while resizing; the second size request
/// undoes any size change the move caused.
pub async fn apply_frame(
    ops: &dyn WindowOps,
    id: WindowId,
    target: Rect,
    settle: Duration,
) -> Result<()> {
    trace!(id = %id, target = %target, "apply_frame");
    ops.set_size(id, target.size())?;
    sleep(settle).await;
    ops.set_position(id, target.origin())?;
    sleep(settle).await;
    ops.set_size(id, target.size())?;
    sleep(settle).await;
    Ok(())
}

/// Position, then size.
pub async fn move_frame(
    ops: &dyn WindowOps,
    id: WindowId,
    target: Rect,
    settle: Duration,
) -> Result<()> {
    trace!(id = %id, target = %target, "move_frame");
    ops.set_position(id, target.origin())?;
    sleep(settle).await;
    ops.set_size(id, target.size())?;
    sleep(settle).await;
    Ok(())
}

/// Cubic ease-in-out over `t` in `[0, 1]`.
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Glide `id` to the target origin over `duration`, one position request per
/// `frame`, then settle and set the size.
///
/// Falls back to [`move_frame`] when the duration is zero, the window asks for
/// reduced motion, or its current frame cannot be read.
pub async fn animate_frame(
    ops: &dyn WindowOps,
    id: WindowId,
    target: Rect,
    duration: Duration,
    frame: Duration,
    settle: Duration,
) -> Result<()> {
    let start = if duration.is_zero() || ops.prefers_reduced_motion() {
        None
    } else {
        ops.window_frame(id).map(|f| f.origin())
    };
    let Some(start) = start else {
        return move_frame(ops, id, target, settle).await;
    };
    trace!(id = %id, target = %target, ?duration, "animate_frame");

    let end = target.origin();
    let began = Instant::now();
    let mut ticks = interval_at(began + frame, frame);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticks.tick().await;
        let raw = (began.elapsed().as_secs_f64() / duration.as_secs_f64()).min(1.0);
        let t = ease_in_out(raw);
        let pos = Point::new(
            start.x + (end.x - start.x) * t,
            start.y + (end.y - start.y) * t,
        );
        ops.set_position(id, pos)?;
        if raw >= 1.0 {
            break;
        }
    }
    sleep(settle).await;
    ops.set_size(id, target.size())?;
    sleep(settle).await;
    Ok(())
}

/// Focus `id`, let it settle, then [`move_frame`] it.
pub async fn focus_and_move(
    ops: &dyn WindowOps,
    id: WindowId,
    target: Rect,
    settle: Duration,
) -> Result<()> {
    ops.focus_window(id)?;
    sleep(settle).await;
    move_frame(ops, id, target, settle).await
}

/// Re-read the applied width of `id` until two consecutive reads agree or
/// `attempts` reads have been made, sleeping the settle delay between reads.
/// Falls back to `requested` if the window cannot be read at all.
pub async fn measure_width(
    ops: &dyn WindowOps,
    id: WindowId,
    requested: f64,
    attempts: u32,
    settle: Duration,
) -> f64 {
    let mut last: Option<f64> = None;
    for attempt in 0..attempts.max(1) {
        let Some(frame) = ops.window_frame(id) else {
            debug!(id = %id, "measure_width: window unreadable");
            break;
        };
        if last.is_some_and(|w| (w - frame.w).abs() < f64::EPSILON) {
            return frame.w;
        }
        last = Some(frame.w);
        if attempt + 1 < attempts {
            sleep(settle).await;
        }
    }
    last.unwrap_or(requested)
}
