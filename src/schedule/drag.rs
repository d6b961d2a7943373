//! Pointer-driven move and resize of calendar items.
//!
//! `DragController` is a plain state machine owned by whoever receives
//! pointer events. It never touches the schedule: a finished gesture comes
//! back as a [`DragOutcome`] and the caller applies it.
//!
//! ```text
//! Idle --down on item--> Pressed --moved > threshold--> Dragging
//!   ^                       |                               |
//!   +------ up (click) -----+------ up (commit/reject) -----+
//! ```

use tracing::debug;

use super::dropzone::{resolve_drop_zone, PointerPosition, ViewportGeometry};
use super::item::ItemKind;
use super::model::TimeChange;
use super::overlap::Span;
use super::time::{snap_minutes, MINUTES_PER_DAY};
use super::week::{ItemRect, WeekLayout};
use crate::error::CommitRejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(SurfacePoint),
    Move(SurfacePoint),
    Up(SurfacePoint),
}

/// Pointer position in whole surface units (pixels or cells).
///
/// Events carry integers so they compare exactly; [`SurfacePoint::center`]
/// gives the point used for geometry on character grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfacePoint {
    pub x: i32,
    pub y: i32,
}

impl SurfacePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Exact coordinates, for pixel surfaces.
    pub fn point(&self) -> PointerPosition {
        PointerPosition::new(self.x as f32, self.y as f32)
    }

    /// Middle of the cell, for character-cell surfaces.
    pub fn center(&self) -> PointerPosition {
        PointerPosition::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Distance the pointer must travel before a press becomes a drag.
    pub threshold: f32,
    /// Height of the resize grip at the top and bottom of an item.
    pub handle_size: f32,
    /// Sample events at cell centers rather than exact coordinates.
    pub cell_surface: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            handle_size: 15.0,
            cell_surface: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grab {
    pub item_id: String,
    pub kind: ItemKind,
    pub draggable: bool,
    pub day: usize,
    pub span: Span,
    pub mode: DragMode,
    pub origin: PointerPosition,
    /// Snapped minutes between the item's start and the press point.
    pub offset_minutes: i32,
    pub rect: ItemRect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed(Grab),
    Dragging {
        grab: Grab,
        current: PointerPosition,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Event consumed or ignored with no visible effect.
    None,
    Pressed { item_id: String, mode: DragMode },
    Started { item_id: String, mode: DragMode },
    Moved,
    /// Released before the threshold: open the editor for this item.
    Click { item_id: String, kind: ItemKind },
    Committed(TimeChange),
    Rejected {
        item_id: String,
        reason: CommitRejection,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    config: DragConfig,
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }

    fn locate(&self, key: SurfacePoint) -> PointerPosition {
        if self.config.cell_surface {
            key.center()
        } else {
            key.point()
        }
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        layout: &WeekLayout,
        viewport: &ViewportGeometry,
    ) -> DragOutcome {
        let state = std::mem::take(&mut self.state);
        let (next, outcome) = match (state, event) {
            (DragState::Idle, PointerEvent::Down(key)) => {
                let pointer = self.locate(key);
                match self.press(pointer, layout, viewport) {
                    Some(grab) => {
                        let outcome = DragOutcome::Pressed {
                            item_id: grab.item_id.clone(),
                            mode: grab.mode,
                        };
                        (DragState::Pressed(grab), outcome)
                    }
                    None => (DragState::Idle, DragOutcome::None),
                }
            }
            (DragState::Idle, _) => (DragState::Idle, DragOutcome::None),

            (DragState::Pressed(grab), PointerEvent::Move(key)) => {
                let pointer = self.locate(key);
                if grab.draggable && grab.origin.distance_to(pointer) > self.config.threshold {
                    debug!(item = %grab.item_id, mode = ?grab.mode, "drag started");
                    let outcome = DragOutcome::Started {
                        item_id: grab.item_id.clone(),
                        mode: grab.mode,
                    };
                    (
                        DragState::Dragging {
                            grab,
                            current: pointer,
                        },
                        outcome,
                    )
                } else {
                    (DragState::Pressed(grab), DragOutcome::None)
                }
            }
            (DragState::Pressed(grab), PointerEvent::Up(_)) => {
                let outcome = DragOutcome::Click {
                    item_id: grab.item_id,
                    kind: grab.kind,
                };
                (DragState::Idle, outcome)
            }
            // a drag is already in progress
            (state @ DragState::Pressed(_), PointerEvent::Down(_)) => (state, DragOutcome::None),

            (DragState::Dragging { grab, .. }, PointerEvent::Move(key)) => {
                let current = self.locate(key);
                (DragState::Dragging { grab, current }, DragOutcome::Moved)
            }
            (DragState::Dragging { grab, .. }, PointerEvent::Up(key)) => {
                let pointer = self.locate(key);
                let outcome = match propose(&grab, pointer, layout, viewport) {
                    Ok(change) => {
                        debug!(
                            item = %change.item_id,
                            start = change.start_minutes,
                            end = change.end_minutes,
                            "drag committed"
                        );
                        DragOutcome::Committed(change)
                    }
                    Err(reason) => {
                        debug!(item = %grab.item_id, %reason, "drag rejected");
                        DragOutcome::Rejected {
                            item_id: grab.item_id,
                            reason,
                        }
                    }
                };
                (DragState::Idle, outcome)
            }
            (state @ DragState::Dragging { .. }, PointerEvent::Down(_)) => {
                (state, DragOutcome::None)
            }
        };
        self.state = next;
        outcome
    }

    /// Where the dragged item would land if released now.
    pub fn preview(
        &self,
        layout: &WeekLayout,
        viewport: &ViewportGeometry,
    ) -> Option<Result<TimeChange, CommitRejection>> {
        match &self.state {
            DragState::Dragging { grab, current } => {
                Some(propose(grab, *current, layout, viewport))
            }
            _ => None,
        }
    }

    fn press(
        &self,
        pointer: PointerPosition,
        layout: &WeekLayout,
        viewport: &ViewportGeometry,
    ) -> Option<Grab> {
        let hit = layout.hit_test(viewport, pointer)?;
        let offset_y = pointer.y - hit.rect.y;
        let handle = self.config.handle_size;
        let mode = if offset_y < handle {
            DragMode::ResizeStart
        } else if offset_y > hit.rect.height - handle {
            DragMode::ResizeEnd
        } else {
            DragMode::Move
        };
        let offset_minutes = snap_minutes(
            viewport.grid.minutes_for_height(offset_y).round() as i32,
            viewport.snap_minutes,
        );
        debug!(item = %hit.item_id, ?mode, "pressed");
        Some(Grab {
            item_id: hit.item_id,
            kind: hit.kind,
            draggable: hit.draggable,
            day: hit.day,
            span: hit.span,
            mode,
            origin: pointer,
            offset_minutes,
            rect: hit.rect,
        })
    }
}

/// Turn a release point into new item bounds.
pub fn propose(
    grab: &Grab,
    pointer: PointerPosition,
    layout: &WeekLayout,
    viewport: &ViewportGeometry,
) -> Result<TimeChange, CommitRejection> {
    let zone = resolve_drop_zone(pointer, viewport).ok_or(CommitRejection::OutsideGrid)?;
    let start = grab.span.start as i32;
    let end = grab.span.end as i32;

    let (day, new_start, new_end) = match grab.mode {
        DragMode::Move => {
            let new_start = snap_minutes(zone.minutes as i32 - grab.offset_minutes, viewport.snap_minutes);
            let delta = new_start - start;
            (zone.day, new_start, end + delta)
        }
        DragMode::ResizeStart => (grab.day, zone.minutes as i32, end),
        DragMode::ResizeEnd => (grab.day, start, zone.minutes as i32),
    };

    if new_end <= new_start {
        return Err(CommitRejection::InvertedRange);
    }
    if new_start < 0 || new_end > MINUTES_PER_DAY as i32 {
        return Err(CommitRejection::OutOfDay);
    }
    let date = layout.date_of(day).ok_or(CommitRejection::OutsideGrid)?;

    Ok(TimeChange {
        item_id: grab.item_id.clone(),
        date,
        start_minutes: new_start as u16,
        end_minutes: new_end as u16,
    })
}
