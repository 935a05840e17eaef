//! Scripted desktops in RON.
//!
//! A scenario names the screens, the windows on them and, for drag runs, a
//! list of steps. All frames are in the row-up space screens use.
//!
//! ```ron
//! (
//!     screens: [(id: 1, frame: (x: 0.0, y: 0.0, w: 1000.0, h: 1000.0))],
//!     windows: [
//!         (id: 1, frame: (x: 0.0, y: 0.0, w: 500.0, h: 1000.0)),
//!         (id: 2, frame: (x: 500.0, y: 0.0, w: 500.0, h: 1000.0), label: "editor"),
//!     ],
//!     steps: [Press, Tick, Move(id: 1, frame: (x: 50.0, y: 0.0, w: 500.0, h: 1000.0)), Tick],
//! )
//! ```

use std::{collections::HashSet, fs, path::Path};

use ron::{Options, extensions::Extensions};
use serde::Deserialize;
use tile_geom::{Rect, Screen};
use tile_ids::{ScreenId, WindowId};

use crate::error::{Error, Result};

/// A display in a scenario. The visible frame defaults to the full frame.
#[derive(Clone, Debug, Deserialize)]
pub struct ScreenSpec {
    /// Display identifier.
    pub id: ScreenId,
    /// Full frame.
    pub frame: Rect,
    /// Usable area, if smaller than the frame.
    #[serde(default)]
    pub visible: Option<Rect>,
}

impl ScreenSpec {
    /// The engine's view of this display.
    pub fn screen(&self) -> Screen {
        Screen {
            id: self.id,
            frame: self.frame,
            visible_frame: self.visible.unwrap_or(self.frame),
        }
    }
}

/// A window in a scenario.
#[derive(Clone, Debug, Deserialize)]
pub struct WindowSpec {
    /// Window identifier.
    pub id: WindowId,
    /// Initial frame.
    pub frame: Rect,
    /// Owning screen; inferred from the frame when absent.
    #[serde(default)]
    pub screen: Option<ScreenId>,
    /// Label for output.
    #[serde(default)]
    pub label: String,
    /// Smallest width the window accepts.
    #[serde(default)]
    pub min_width: f64,
    /// The window lives on another space.
    #[serde(default)]
    pub off_space: bool,
}

/// One scripted input for drag runs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum Step {
    /// Hold the primary button.
    Press,
    /// Release the primary button.
    Release,
    /// Focus a window.
    Focus(WindowId),
    /// Move the mouse onto a screen.
    Mouse(ScreenId),
    /// Move or resize a window as the user would.
    Move {
        /// Window to move.
        id: WindowId,
        /// New frame.
        frame: Rect,
    },
    /// Run one reconciliation pass.
    Tick,
    /// Run several reconciliation passes.
    Ticks(u32),
}

/// A complete scripted desktop.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    /// Displays.
    pub screens: Vec<ScreenSpec>,
    /// Windows in enumeration order.
    pub windows: Vec<WindowSpec>,
    /// Initially focused window.
    #[serde(default)]
    pub focused: Option<WindowId>,
    /// Screen initially under the mouse.
    #[serde(default)]
    pub mouse: Option<ScreenId>,
    /// Inputs for drag runs.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parse and validate a scenario document.
    pub fn from_ron(s: &str) -> Result<Self> {
        let options = Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
        let scenario: Self = options.from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read, parse and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_ron(&s)
    }

    /// Engine screens.
    pub fn screens(&self) -> Vec<Screen> {
        self.screens.iter().map(ScreenSpec::screen).collect()
    }

    /// Reject duplicate ids, dangling references and empty screens.
    fn validate(&self) -> Result<()> {
        let mut screen_ids = HashSet::new();
        for s in &self.screens {
            if !screen_ids.insert(s.id) {
                return Err(Error::scenario(format!("duplicate screen {}", s.id)));
            }
            if s.screen().visible_frame.is_empty() {
                return Err(Error::scenario(format!("screen {} has no area", s.id)));
            }
        }

        let mut window_ids = HashSet::new();
        for w in &self.windows {
            if !window_ids.insert(w.id) {
                return Err(Error::scenario(format!("duplicate window {}", w.id)));
            }
            if let Some(s) = w.screen
                && !screen_ids.contains(&s)
            {
                return Err(Error::scenario(format!("window {} names unknown screen {s}", w.id)));
            }
        }

        let known_window = |id: &WindowId| window_ids.contains(id);
        let known_screen = |id: &ScreenId| screen_ids.contains(id);
        if let Some(id) = self.focused.filter(|id| !known_window(id)) {
            return Err(Error::scenario(format!("focused window {id} is unknown")));
        }
        if let Some(id) = self.mouse.filter(|id| !known_screen(id)) {
            return Err(Error::scenario(format!("mouse screen {id} is unknown")));
        }
        for (i, step) in self.steps.iter().enumerate() {
            let ok = match step {
                Step::Focus(id) | Step::Move { id, .. } => known_window(id),
                Step::Mouse(id) => known_screen(id),
                Step::Press | Step::Release | Step::Tick | Step::Ticks(_) => true,
            };
            if !ok {
                return Err(Error::scenario(format!("step {i} references an unknown id")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_UP: &str = r#"(
        screens: [(id: 1, frame: (x: 0.0, y: 0.0, w: 1000.0, h: 1000.0))],
        windows: [
            (id: 1, frame: (x: 0.0, y: 0.0, w: 500.0, h: 1000.0)),
            (id: 2, frame: (x: 500.0, y: 0.0, w: 500.0, h: 1000.0), label: "editor", min_width: 520.0),
        ],
        focused: 2,
        steps: [Press, Tick, Move(id: 1, frame: (x: 50.0, y: 0.0, w: 500.0, h: 1000.0)), Ticks(2)],
    )"#;

    #[test]
    fn parses_scenario_with_defaults() {
        let s = Scenario::from_ron(TWO_UP).unwrap();
        assert_eq!(s.screens().len(), 1);
        assert_eq!(s.screens()[0].visible_frame, s.screens[0].frame);
        assert_eq!(s.windows[1].label, "editor");
        assert_eq!(s.windows[1].min_width, 520.0);
        assert_eq!(s.windows[0].screen, None);
        assert_eq!(s.focused, Some(WindowId::new(2)));
        assert_eq!(s.steps.len(), 4);
        assert_eq!(s.steps[3], Step::Ticks(2));
    }

    #[test]
    fn rejects_dangling_references() {
        let bad = TWO_UP.replace("focused: 2", "focused: 7");
        assert!(matches!(Scenario::from_ron(&bad), Err(Error::Scenario(_))));
        let bad = TWO_UP.replace("(id: 2, frame", "(id: 1, frame");
        assert!(matches!(Scenario::from_ron(&bad), Err(Error::Scenario(_))));
    }

    #[test]
    fn bundled_scenarios_parse() {
        for src in [
            include_str!("../scenarios/drag-two-up.ron"),
            include_str!("../scenarios/bands.ron"),
            include_str!("../scenarios/stack-three.ron"),
        ] {
            Scenario::from_ron(src).unwrap();
        }
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        assert!(matches!(Scenario::from_ron("(screens: 3)"), Err(Error::Ron(_))));
    }
}
