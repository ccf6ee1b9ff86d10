//! Pointer drag tracking.
//!
//! Raw press / move / release events become the semantic gestures the view
//! state understands: a primary-button drag is a zoom selection, a
//! secondary-button drag pans, and a press released in place is a click.

use serde::{Deserialize, Serialize};

use fractview_core::SelectionRegion;

/// Movement (in pixels, on either axis) below which a press-release pair
/// still counts as a click.
pub const CLICK_SLOP: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Press { button: PointerButton, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Release { x: f64, y: f64 },
}

/// A completed interaction ready for the view state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerGesture {
    /// Incremental pan by a pixel delta.
    Pan { dx: f64, dy: f64 },
    /// A finished selection rectangle.
    Select(SelectionRegion),
    Click { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        button: PointerButton,
        start: (f64, f64),
        last: (f64, f64),
        moved: bool,
    },
}

#[derive(Debug, Default)]
pub struct DragTracker {
    state: DragState,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The in-progress selection, for drawing a rubber band.
    pub fn selection_rect(&self) -> Option<SelectionRegion> {
        match self.state {
            DragState::Dragging {
                button: PointerButton::Primary,
                start,
                last,
                moved: true,
            } => Some(SelectionRegion::from_corners(start, last)),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<PointerGesture> {
        match (self.state, event) {
            (DragState::Idle, PointerEvent::Press { button, x, y }) => {
                self.state = DragState::Dragging {
                    button,
                    start: (x, y),
                    last: (x, y),
                    moved: false,
                };
                None
            }
            // A second button while dragging is ignored; so is motion
            // or release with nothing pressed.
            (DragState::Dragging { .. }, PointerEvent::Press { .. }) => None,
            (DragState::Idle, _) => None,

            (
                DragState::Dragging {
                    button,
                    start,
                    last,
                    moved,
                },
                PointerEvent::Move { x, y },
            ) => {
                let moved = moved || beyond_slop(start, (x, y));
                // Until the slop is exceeded the drag stays anchored at `start`,
                // so the first pan delta includes the initial jitter.
                self.state = DragState::Dragging {
                    button,
                    start,
                    last: if moved { (x, y) } else { last },
                    moved,
                };
                match button {
                    PointerButton::Secondary if moved => pan_between(last, (x, y)),
                    _ => None,
                }
            }

            (
                DragState::Dragging {
                    button,
                    start,
                    last,
                    moved,
                },
                PointerEvent::Release { x, y },
            ) => {
                self.state = DragState::Idle;
                let moved = moved || beyond_slop(start, (x, y));
                match (button, moved) {
                    (_, false) => Some(PointerGesture::Click {
                        x: start.0,
                        y: start.1,
                    }),
                    (PointerButton::Primary, true) => Some(PointerGesture::Select(
                        SelectionRegion::from_corners(start, (x, y)),
                    )),
                    (PointerButton::Secondary, true) => pan_between(last, (x, y)),
                }
            }
        }
    }
}

fn beyond_slop(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() > CLICK_SLOP || (a.1 - b.1).abs() > CLICK_SLOP
}

fn pan_between(from: (f64, f64), to: (f64, f64)) -> Option<PointerGesture> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    (dx != 0.0 || dy != 0.0).then_some(PointerGesture::Pan { dx, dy })
}
