//! In-memory window server backing every simulation.
//!
//! Frames are stored the way a real window server reports them (row-down,
//! anchored on the top of the topmost screen); scenario input and report
//! output are converted at the edges.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tile_engine::{Error as EngineError, Result as EngineResult, WindowOps};
use tile_geom::{CoordinateSpace, Point, Rect, Screen, Size, screen_for_frame};
use tile_ids::{ScreenId, WindowId};
use tile_layout::WindowSnapshot;
use tracing::trace;

use crate::{
    error::{Error, Result},
    scenario::Scenario,
};

/// One simulated window.
#[derive(Clone, Debug)]
struct SimWindow {
    /// Snapshot with a producer-space frame.
    snapshot: WindowSnapshot,
    /// Smallest width the window accepts.
    min_width: f64,
    /// Lives on another space.
    off_space: bool,
}

/// Mutable desktop state.
#[derive(Debug, Default)]
struct State {
    /// Windows in enumeration order.
    windows: Vec<SimWindow>,
    /// Focused window.
    focused: Option<WindowId>,
    /// Screen under the mouse.
    mouse: Option<ScreenId>,
    /// Primary button state.
    pressed: bool,
}

/// A scripted desktop that applies frame requests immediately.
pub struct SimDesktop {
    /// Displays, row-up.
    screens: Vec<Screen>,
    /// Conversion for `screens`.
    space: CoordinateSpace,
    /// Windows and input state.
    state: Mutex<State>,
}

impl SimDesktop {
    /// Build a desktop from a validated scenario.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        let screens = scenario.screens();
        let space = CoordinateSpace::from_screens(&screens);
        let mut windows = Vec::with_capacity(scenario.windows.len());
        for w in &scenario.windows {
            let screen = match w.screen {
                Some(s) => s,
                None => screen_for_frame(&screens, &w.frame)
                    .map(|s| s.id)
                    .ok_or_else(|| Error::scenario(format!("window {} is on no screen", w.id)))?,
            };
            let snapshot = WindowSnapshot::new(w.id, space.to_producer(w.frame), screen)
                .with_label(w.label.clone());
            windows.push(SimWindow {
                snapshot,
                min_width: w.min_width,
                off_space: w.off_space,
            });
        }
        Ok(Self {
            screens,
            space,
            state: Mutex::new(State {
                windows,
                focused: scenario.focused,
                mouse: scenario.mouse,
                pressed: false,
            }),
        })
    }

    /// Set the primary button state.
    pub fn set_pressed(&self, pressed: bool) {
        self.state.lock().pressed = pressed;
    }

    /// Put the mouse over a screen.
    pub fn set_mouse(&self, screen: ScreenId) {
        self.state.lock().mouse = Some(screen);
    }

    /// Move a window to a row-up frame, reassigning its screen.
    pub fn move_window(&self, id: WindowId, frame: Rect) {
        let screen = screen_for_frame(&self.screens, &frame).map(|s| s.id);
        let producer = self.space.to_producer(frame);
        let mut st = self.state.lock();
        if let Some(w) = st.windows.iter_mut().find(|w| w.snapshot.id == id) {
            w.snapshot.frame = producer;
            if let Some(s) = screen {
                w.snapshot.screen = s;
            }
        }
    }

    /// Current frames, row-up.
    pub fn frames(&self) -> BTreeMap<WindowId, Rect> {
        self.state
            .lock()
            .windows
            .iter()
            .map(|w| (w.snapshot.id, self.space.to_consumer(w.snapshot.frame)))
            .collect()
    }

    /// Active-space windows with row-up frames, as the partitioner sees them.
    pub fn consumer_snapshots(&self) -> Vec<WindowSnapshot> {
        self.state
            .lock()
            .windows
            .iter()
            .filter(|w| !w.off_space)
            .map(|w| {
                let mut snap = w.snapshot.clone();
                snap.frame = self.space.to_consumer(snap.frame);
                snap
            })
            .collect()
    }

    /// Labels for windows that have one.
    pub fn labels(&self) -> BTreeMap<WindowId, String> {
        self.state
            .lock()
            .windows
            .iter()
            .filter(|w| !w.snapshot.label.is_empty())
            .map(|w| (w.snapshot.id, w.snapshot.label.clone()))
            .collect()
    }

    /// Apply `f` to a window's producer frame. Windows on another space
    /// refuse to move.
    fn update(&self, id: WindowId, f: impl FnOnce(&mut SimWindow)) -> EngineResult<()> {
        let mut st = self.state.lock();
        let w = st
            .windows
            .iter_mut()
            .find(|w| w.snapshot.id == id)
            .ok_or(EngineError::WindowGone(id))?;
        if w.off_space {
            return Err(EngineError::Rejected {
                id,
                reason: "window is on another space".into(),
            });
        }
        f(w);
        Ok(())
    }
}

impl WindowOps for SimDesktop {
    fn screens(&self) -> Vec<Screen> {
        self.screens.clone()
    }

    fn list_windows(&self) -> Vec<WindowSnapshot> {
        self.state
            .lock()
            .windows
            .iter()
            .map(|w| w.snapshot.clone())
            .collect()
    }

    fn focused_window(&self) -> Option<WindowSnapshot> {
        let st = self.state.lock();
        let id = st.focused?;
        st.windows
            .iter()
            .find(|w| w.snapshot.id == id)
            .map(|w| w.snapshot.clone())
    }

    fn screen_under_mouse(&self) -> Option<Screen> {
        let id = self.state.lock().mouse?;
        self.screens.iter().find(|s| s.id == id).copied()
    }

    fn is_on_active_space(&self, id: WindowId) -> bool {
        self.state
            .lock()
            .windows
            .iter()
            .any(|w| w.snapshot.id == id && !w.off_space)
    }

    fn is_primary_button_pressed(&self) -> bool {
        self.state.lock().pressed
    }

    fn window_frame(&self, id: WindowId) -> Option<Rect> {
        self.state
            .lock()
            .windows
            .iter()
            .find(|w| w.snapshot.id == id)
            .map(|w| w.snapshot.frame)
    }

    fn focus_window(&self, id: WindowId) -> EngineResult<()> {
        let mut st = self.state.lock();
        if !st.windows.iter().any(|w| w.snapshot.id == id) {
            return Err(EngineError::WindowGone(id));
        }
        st.focused = Some(id);
        trace!(id = %id, "focus");
        Ok(())
    }

    fn set_position(&self, id: WindowId, pos: Point) -> EngineResult<()> {
        trace!(id = %id, x = pos.x, y = pos.y, "set_position");
        self.update(id, |w| {
            w.snapshot.frame = w.snapshot.frame.with_origin(pos);
        })
    }

    fn set_size(&self, id: WindowId, size: Size) -> EngineResult<()> {
        trace!(id = %id, w = size.w, h = size.h, "set_size");
        self.update(id, |w| {
            let clamped = Size::new(size.w.max(w.min_width), size.h);
            w.snapshot.frame = w.snapshot.frame.with_size(clamped);
        })
    }
}
