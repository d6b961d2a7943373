pub mod drag;
pub mod dropzone;
pub mod geometry;
pub mod item;
pub mod model;
pub mod overlap;
pub mod recurrence;
pub mod rota;
pub mod ticket;
pub mod time;
pub mod week;

pub use drag::{DragController, DragMode, DragOutcome, PointerEvent, SurfacePoint};
pub use dropzone::{resolve_drop_zone, DropZone, PointerPosition, ViewportGeometry};
pub use geometry::{GridGeometry, Position};
pub use item::{CalendarItem, ItemKind};
pub use model::{Employee, Schedule, TimeChange, TimeOffRequest};
pub use overlap::{assign_columns, ColumnRules, ColumnSlot, Span};
pub use recurrence::{occurs_on, RecurrenceRule};
pub use rota::{AssignmentStatus, RotaChange, StaffDrag};
pub use ticket::Ticket;
pub use week::{ViewMode, WeekLayout};
