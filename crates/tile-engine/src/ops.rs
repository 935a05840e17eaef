//! The seam between the engine and the window server.
//!
//! Everything the engine knows about live windows comes through
//! [`WindowOps`]. Screens are reported in consumer space (row-up); window
//! frames, positions and sizes are in producer space (row-down, anchored on
//! the top of the topmost screen).

use tile_geom::{Point, Rect, Screen, Size};
use tile_ids::WindowId;
use tile_layout::WindowSnapshot;

use crate::Result;

/// Trait abstraction over window discovery, input state and frame mutation.
pub trait WindowOps: Send + Sync {
    /// All known screens.
    fn screens(&self) -> Vec<Screen>;
    /// Every on-screen window, frames in producer space.
    fn list_windows(&self) -> Vec<WindowSnapshot>;
    /// The focused window, if any.
    fn focused_window(&self) -> Option<WindowSnapshot>;
    /// The screen currently under the mouse cursor.
    fn screen_under_mouse(&self) -> Option<Screen>;
    /// Whether `id` lives on the active space.
    fn is_on_active_space(&self, id: WindowId) -> bool;
    /// Whether the primary mouse button is currently held.
    fn is_primary_button_pressed(&self) -> bool;
    /// Re-read a window's frame, producer space.
    fn window_frame(&self, id: WindowId) -> Option<Rect>;
    /// Raise and focus a window.
    fn focus_window(&self, id: WindowId) -> Result<()>;
    /// Request a new top-left position, producer space.
    fn set_position(&self, id: WindowId, pos: Point) -> Result<()>;
    /// Request a new size.
    fn set_size(&self, id: WindowId, size: Size) -> Result<()>;
    /// Whether the user asked for reduced motion. Animated moves jump straight
    /// to their target when this is set.
    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockCall, MockWindowOps};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::{
        collections::{HashMap, HashSet, VecDeque},
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    };

    use parking_lot::Mutex;
    use tile_geom::{Point, Rect, Screen, Size};
    use tile_ids::{ScreenId, WindowId};
    use tile_layout::WindowSnapshot;

    use super::WindowOps;
    use crate::{Error, Result};

    /// A call recorded by [`MockWindowOps`].
    #[derive(Clone, Debug, PartialEq)]
    pub enum MockCall {
        /// `focus_window`.
        Focus(WindowId),
        /// `set_position`.
        SetPosition(WindowId, Point),
        /// `set_size`.
        SetSize(WindowId, Size),
    }

    impl MockCall {
        /// True for position and size requests.
        pub fn is_mutation(&self) -> bool {
            !matches!(self, Self::Focus(_))
        }
    }

    /// In-memory window server for tests (enabled with the `test-utils`
    /// feature). Mutations update the stored frames unless the window is
    /// frozen, and sizes respect per-window minimum widths.
    #[derive(Clone, Default)]
    pub struct MockWindowOps {
        /// Recorded focus and mutation calls.
        calls: Arc<Mutex<Vec<MockCall>>>,
        /// Screens, consumer space.
        screens: Arc<Mutex<Vec<Screen>>>,
        /// Windows, producer space.
        windows: Arc<Mutex<Vec<WindowSnapshot>>>,
        /// Focused window.
        focused: Arc<Mutex<Option<WindowId>>>,
        /// Screen under the mouse.
        mouse_screen: Arc<Mutex<Option<ScreenId>>>,
        /// Steady button state.
        pressed: Arc<AtomicBool>,
        /// Button states returned before the steady state.
        press_script: Arc<Mutex<VecDeque<bool>>>,
        /// Windows on another space.
        off_space: Arc<Mutex<HashSet<WindowId>>>,
        /// Windows that ignore mutations.
        frozen: Arc<Mutex<HashSet<WindowId>>>,
        /// Per-window minimum widths.
        min_width: Arc<Mutex<HashMap<WindowId, f64>>>,
        /// Reduced-motion preference.
        reduced_motion: Arc<AtomicBool>,
    }

    impl MockWindowOps {
        /// Empty desktop.
        pub fn new() -> Self {
            Self::default()
        }

        /// Replace the screen list.
        pub fn set_screens(&self, screens: Vec<Screen>) {
            *self.screens.lock() = screens;
        }

        /// Replace the window list. Frames are in producer space.
        pub fn set_windows(&self, wins: Vec<WindowSnapshot>) {
            *self.windows.lock() = wins;
        }

        /// Move or resize a window as if the user did it.
        pub fn set_frame(&self, id: WindowId, frame: Rect) {
            if let Some(w) = self.windows.lock().iter_mut().find(|w| w.id == id) {
                w.frame = frame;
            }
        }

        /// Remove a window.
        pub fn remove_window(&self, id: WindowId) {
            self.windows.lock().retain(|w| w.id != id);
        }

        /// Current stored frame.
        pub fn frame(&self, id: WindowId) -> Option<Rect> {
            self.windows.lock().iter().find(|w| w.id == id).map(|w| w.frame)
        }

        /// Set the focused window.
        pub fn set_focused(&self, id: Option<WindowId>) {
            *self.focused.lock() = id;
        }

        /// Set which screen the mouse is over.
        pub fn set_mouse_screen(&self, id: Option<ScreenId>) {
            *self.mouse_screen.lock() = id;
        }

        /// Set the steady primary button state.
        pub fn set_pressed(&self, v: bool) {
            self.pressed.store(v, Ordering::SeqCst);
        }

        /// Queue button states returned by successive reads before falling back
        /// to the steady state.
        pub fn script_pressed(&self, states: impl IntoIterator<Item = bool>) {
            self.press_script.lock().extend(states);
        }

        /// Mark a window as living on another space.
        pub fn set_off_space(&self, id: WindowId, off: bool) {
            let mut g = self.off_space.lock();
            if off {
                g.insert(id);
            } else {
                g.remove(&id);
            }
        }

        /// Make a window ignore position and size requests.
        pub fn set_frozen(&self, id: WindowId, frozen: bool) {
            let mut g = self.frozen.lock();
            if frozen {
                g.insert(id);
            } else {
                g.remove(&id);
            }
        }

        /// Clamp requested widths for a window to at least `w`.
        pub fn set_min_width(&self, id: WindowId, w: f64) {
            self.min_width.lock().insert(id, w);
        }

        /// Set the reduced-motion preference.
        pub fn set_reduced_motion(&self, v: bool) {
            self.reduced_motion.store(v, Ordering::SeqCst);
        }

        /// Every recorded call, oldest first.
        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().clone()
        }

        /// Recorded position and size requests.
        pub fn mutations(&self) -> Vec<MockCall> {
            self.calls.lock().iter().filter(|c| c.is_mutation()).cloned().collect()
        }

        /// Forget recorded calls.
        pub fn clear_calls(&self) {
            self.calls.lock().clear();
        }

        /// Record a call.
        fn note(&self, call: MockCall) {
            self.calls.lock().push(call);
        }

        /// Apply `f` to a window's frame unless it is frozen.
        fn update(&self, id: WindowId, f: impl FnOnce(&mut Rect)) -> Result<()> {
            let frozen = self.frozen.lock().contains(&id);
            let mut wins = self.windows.lock();
            let w = wins
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or(Error::WindowGone(id))?;
            if !frozen {
                f(&mut w.frame);
            }
            Ok(())
        }
    }

    impl WindowOps for MockWindowOps {
        fn screens(&self) -> Vec<Screen> {
            self.screens.lock().clone()
        }

        fn list_windows(&self) -> Vec<WindowSnapshot> {
            self.windows.lock().clone()
        }

        fn focused_window(&self) -> Option<WindowSnapshot> {
            let id = (*self.focused.lock())?;
            self.windows.lock().iter().find(|w| w.id == id).cloned()
        }

        fn screen_under_mouse(&self) -> Option<Screen> {
            let id = (*self.mouse_screen.lock())?;
            self.screens.lock().iter().find(|s| s.id == id).copied()
        }

        fn is_on_active_space(&self, id: WindowId) -> bool {
            !self.off_space.lock().contains(&id)
        }

        fn is_primary_button_pressed(&self) -> bool {
            self.press_script
                .lock()
                .pop_front()
                .unwrap_or_else(|| self.pressed.load(Ordering::SeqCst))
        }

        fn window_frame(&self, id: WindowId) -> Option<Rect> {
            self.frame(id)
        }

        fn focus_window(&self, id: WindowId) -> Result<()> {
            self.note(MockCall::Focus(id));
            if self.frame(id).is_none() {
                return Err(Error::WindowGone(id));
            }
            *self.focused.lock() = Some(id);
            Ok(())
        }

        fn set_position(&self, id: WindowId, pos: Point) -> Result<()> {
            self.note(MockCall::SetPosition(id, pos));
            self.update(id, |r| {
                r.x = pos.x;
                r.y = pos.y;
            })
        }

        fn set_size(&self, id: WindowId, size: Size) -> Result<()> {
            self.note(MockCall::SetSize(id, size));
            let min_w = self.min_width.lock().get(&id).copied().unwrap_or(0.0);
            self.update(id, |r| {
                r.w = size.w.max(min_w);
                r.h = size.h;
            })
        }

        fn prefers_reduced_motion(&self) -> bool {
            self.reduced_motion.load(Ordering::SeqCst)
        }
    }
}
