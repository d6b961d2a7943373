use chrono::{Duration, Local, NaiveDate};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tracing::{info, warn};

use crate::components::detail_popup::DetailTarget;
use crate::components::rota_board::{region_at, BoardRegion, BoardTarget};
use crate::components::week_view::GridPlacement;
use crate::config::Config;
use crate::schedule::drag::{DragController, DragOutcome, DragState, PointerEvent, SurfacePoint};
use crate::schedule::model::Schedule;
use crate::schedule::rota::{RotaChange, StaffDrag};
use crate::schedule::time::minutes_to_time;
use crate::schedule::week::{self, ViewMode, WeekLayout};
use crate::store::Persister;
use crate::theme::Theme;

/// Which page is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Week calendar with events and every shift.
    Schedule,
    /// Week calendar with events, standalone shifts and staff names.
    Rota,
    /// Staff list plus per-day shift cards for assigning people.
    Staff,
}

impl Screen {
    pub fn view_mode(self) -> ViewMode {
        match self {
            Screen::Schedule => ViewMode::Schedule,
            Screen::Rota | Screen::Staff => ViewMode::Rota,
        }
    }
}

pub struct App {
    pub running: bool,
    pub screen: Screen,
    pub week_start: NaiveDate,
    pub today: NaiveDate,
    pub schedule: Schedule,
    pub layout: WeekLayout,
    pub config: Config,
    pub theme: Theme,
    pub drag: DragController,
    /// Grid placement from the last frame; mouse input maps through it.
    pub placement: Option<GridPlacement>,
    pub board_regions: Vec<BoardRegion>,
    pub staff_drag: Option<StaffDrag>,
    pub detail: Option<DetailTarget>,
    pub scroll_rows: u16,
    pub show_help: bool,
    pub status_message: Option<String>,
    persister: Option<Persister>,
}

impl App {
    pub fn new(
        config: Config,
        schedule: Schedule,
        persister: Option<Persister>,
        week_of: Option<NaiveDate>,
        screen: Screen,
    ) -> Self {
        let today = Local::now().date_naive();
        let week_start = week::week_start(week_of.unwrap_or(today));
        let theme = Theme::from_config(&config.theme);
        let layout = WeekLayout::build(
            &schedule,
            week_start,
            screen.view_mode(),
            config.layout.grid(),
            config.layout.column_rules(),
        );
        let mut app = Self {
            running: true,
            screen,
            week_start,
            today,
            schedule,
            layout,
            drag: DragController::new(config.layout.drag()),
            config,
            theme,
            placement: None,
            board_regions: Vec::new(),
            staff_drag: None,
            detail: None,
            scroll_rows: 0,
            show_help: false,
            status_message: None,
            persister,
        };
        app.refresh_layout();
        app
    }

    /// Rebuild the week layout after the schedule, week or screen changed.
    pub fn refresh_layout(&mut self) {
        self.layout = WeekLayout::build(
            &self.schedule,
            self.week_start,
            self.screen.view_mode(),
            self.config.layout.grid(),
            self.config.layout.column_rules(),
        );
        let skipped = self.layout.skipped().count();
        if skipped > 0 {
            self.status_message = Some(format!("{} item(s) with bad times not shown", skipped));
        }
    }

    /// The day one-off items without a date are shown on.
    pub fn reference_day(&self) -> NaiveDate {
        self.week_start + Duration::days(2)
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.cancel_interaction();
            self.screen = screen;
            self.refresh_layout();
        }
    }

    pub fn next_week(&mut self) {
        self.change_week(self.week_start + Duration::weeks(1));
    }

    pub fn prev_week(&mut self) {
        self.change_week(self.week_start - Duration::weeks(1));
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.change_week(week::week_start(self.today));
    }

    fn change_week(&mut self, start: NaiveDate) {
        self.cancel_interaction();
        self.week_start = start;
        self.refresh_layout();
    }

    pub fn scroll_down(&mut self) {
        let max = self.max_scroll();
        self.scroll_rows = (self.scroll_rows + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_rows = self.scroll_rows.saturating_sub(1);
    }

    fn max_scroll(&self) -> u16 {
        let total = self.config.layout.grid().total_height() as u16;
        let visible = self.placement.map_or(0, |p| p.body.height);
        total.saturating_sub(visible)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Drop any drag in progress without changing anything.
    pub fn cancel_interaction(&mut self) {
        self.drag.cancel();
        self.staff_drag = None;
    }

    pub fn is_interacting(&self) -> bool {
        self.drag.is_active() || self.staff_drag.is_some()
    }

    /// Surface a background write failure, if one happened.
    pub fn tick(&mut self) {
        if let Some(err) = self.persister.as_ref().and_then(Persister::take_failure) {
            self.status_message = Some(format!("Save failed: {}", err));
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(mut persister) = self.persister.take() {
            persister.shutdown();
        }
    }

    fn persist(&mut self) {
        let Some(persister) = self.persister.as_ref() else {
            return;
        };
        if let Err(e) = persister.submit(self.schedule.clone()) {
            warn!(error = %e, "could not queue save");
            self.status_message = Some(format!("Save failed: {}", e));
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help || self.detail.is_some() {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.show_help = false;
                self.detail = None;
            }
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_down(),
            MouseEventKind::ScrollUp => self.scroll_up(),
            _ => match self.screen {
                Screen::Schedule | Screen::Rota => self.grid_mouse(mouse),
                Screen::Staff => self.board_mouse(mouse),
            },
        }
    }

    fn grid_mouse(&mut self, mouse: MouseEvent) {
        let Some(placement) = self.placement else {
            return;
        };
        let inside = placement.contains(mouse.column, mouse.row);
        let point = if inside {
            SurfacePoint::new(mouse.column as i32, mouse.row as i32)
        } else {
            // off the visible grid; any release here is refused
            SurfacePoint::new(-1, -1)
        };
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => PointerEvent::Down(point),
            MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Move(point),
            MouseEventKind::Up(MouseButton::Left) => PointerEvent::Up(point),
            _ => return,
        };

        let pressed_day = match self.drag.state() {
            DragState::Pressed(grab) => Some(grab.day),
            _ => None,
        };
        match self.drag.handle(event, &self.layout, &placement.viewport) {
            DragOutcome::Click { item_id, .. } => {
                let date = pressed_day
                    .and_then(|d| self.layout.date_of(d))
                    .unwrap_or(self.week_start);
                self.detail = Some(DetailTarget { item_id, date });
            }
            DragOutcome::Committed(change) => match self.schedule.apply(&change) {
                Ok(()) => {
                    let title = self
                        .schedule
                        .item(&change.item_id)
                        .map_or(change.item_id.clone(), |i| i.title.clone());
                    info!(item = %change.item_id, date = %change.date, "item rescheduled");
                    self.status_message = Some(format!(
                        "{} now {} - {}",
                        title,
                        minutes_to_time(change.start_minutes),
                        minutes_to_time(change.end_minutes)
                    ));
                    self.refresh_layout();
                    self.persist();
                }
                Err(reason) => self.status_message = Some(format!("Not moved: {}", reason)),
            },
            DragOutcome::Rejected { reason, .. } => {
                self.status_message = Some(format!("Not moved: {}", reason));
            }
            DragOutcome::Started { .. } => self.status_message = None,
            DragOutcome::None | DragOutcome::Pressed { .. } | DragOutcome::Moved => {}
        }
    }

    fn board_mouse(&mut self, mouse: MouseEvent) {
        let target = region_at(&self.board_regions, mouse.column, mouse.row).map(|r| r.target.clone());
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.staff_drag = match target {
                    Some(BoardTarget::Staff { employee_id }) => Some(StaffDrag {
                        employee_id,
                        from_shift: None,
                    }),
                    Some(BoardTarget::Assigned {
                        employee_id,
                        shift_id,
                        ..
                    }) => Some(StaffDrag {
                        employee_id,
                        from_shift: Some(shift_id),
                    }),
                    _ => None,
                };
                if let Some(drag) = &self.staff_drag {
                    self.status_message = Some(format!("Moving {}", self.employee_name(&drag.employee_id)));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(drag) = self.staff_drag.take() {
                    self.drop_staff(drag, target);
                }
            }
            _ => {}
        }
    }

    fn drop_staff(&mut self, drag: StaffDrag, target: Option<BoardTarget>) {
        let name = self.employee_name(&drag.employee_id);
        let changes = match target {
            Some(BoardTarget::Shift { shift_id, date })
            | Some(BoardTarget::Assigned { shift_id, date, .. }) => {
                if !self.schedule.can_assign(&drag.employee_id, date) {
                    self.status_message = Some(format!("{} is on leave {}", name, date.format("%a %-d %b")));
                    return;
                }
                self.schedule.drop_staff(&drag, &shift_id, date)
            }
            // dragged off a shift and let go elsewhere: take them off it
            _ => match drag.from_shift {
                Some(shift_id) => vec![RotaChange::Unassign {
                    shift_id,
                    employee_id: drag.employee_id.clone(),
                }],
                None => Vec::new(),
            },
        };
        if changes.is_empty() {
            self.status_message = None;
            return;
        }
        for change in &changes {
            self.schedule.apply_rota(change);
        }
        info!(employee = %drag.employee_id, changes = changes.len(), "rota updated");
        self.status_message = Some(match changes.last() {
            Some(RotaChange::Assign { shift_id, .. }) => {
                format!("{} assigned to {}", name, self.item_title(shift_id))
            }
            Some(RotaChange::Unassign { shift_id, .. }) => {
                format!("{} removed from {}", name, self.item_title(shift_id))
            }
            None => String::new(),
        });
        self.refresh_layout();
        self.persist();
    }

    fn employee_name(&self, id: &str) -> String {
        self.schedule
            .employee(id)
            .map_or_else(|| id.to_string(), |e| e.name.clone())
    }

    fn item_title(&self, id: &str) -> String {
        self.schedule
            .item(id)
            .map_or_else(|| id.to_string(), |i| i.title.clone())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    use super::*;
    use crate::schedule::model::{ApprovalStatus, TimeOffKind, TimeOffRequest};
    use crate::store::demo_schedule;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn app(screen: Screen) -> App {
        let config = Config::default();
        let mut app = App::new(config, demo_schedule(), None, Some(monday()), screen);
        app.placement = Some(GridPlacement::compute(
            Rect::new(0, 0, 76, 80),
            0,
            &app.config.layout,
        ));
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    // Monday: Show Host 07:30 takes lane 0, Morning Show 08:00-11:00 lane 1,
    // so the show covers columns 11..16 and rows 9..21.
    #[test]
    fn dragging_the_show_down_an_hour() {
        let mut app = app(Screen::Schedule);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 13));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 17));
        assert!(app.drag.is_dragging());
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12, 17));

        let show = app.schedule.item("1").unwrap();
        assert_eq!(show.start_time, "09:00");
        assert_eq!(show.end_time, "12:00");
        assert!(show.recurrence.is_recurring());
        assert!(!app.drag.is_active());
    }

    #[test]
    fn click_opens_detail_for_that_day() {
        let mut app = app(Screen::Schedule);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 13));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12, 13));
        assert_eq!(
            app.detail,
            Some(DetailTarget {
                item_id: "1".into(),
                date: monday()
            })
        );
        assert_eq!(app.schedule, demo_schedule());
    }

    #[test]
    fn release_off_grid_changes_nothing() {
        let mut app = app(Screen::Schedule);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 13));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 17));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 2, 17));
        assert_eq!(app.schedule, demo_schedule());
        assert!(app.status_message.unwrap().starts_with("Not moved"));
    }

    #[test]
    fn week_navigation_cancels_drag() {
        let mut app = app(Screen::Schedule);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 13));
        assert!(app.drag.is_active());
        app.next_week();
        assert!(!app.drag.is_active());
        assert_eq!(app.week_start, monday() + Duration::weeks(1));
    }

    #[test]
    fn rota_screen_hides_attached_shifts() {
        let app = app(Screen::Rota);
        let ids: Vec<&str> = app.layout.days[0]
            .occurrences
            .iter()
            .map(|o| o.item_id.as_str())
            .collect();
        assert!(ids.contains(&"1"));
        assert!(!ids.contains(&"s1"));
    }

    fn board(app: &mut App) {
        let wednesday = monday() + Duration::days(2);
        app.board_regions = vec![
            BoardRegion {
                rect: Rect::new(0, 0, 20, 2),
                target: BoardTarget::Staff {
                    employee_id: "e4".into(),
                },
            },
            BoardRegion {
                rect: Rect::new(30, 5, 10, 3),
                target: BoardTarget::Shift {
                    shift_id: "s3".into(),
                    date: wednesday,
                },
            },
            BoardRegion {
                rect: Rect::new(30, 7, 10, 1),
                target: BoardTarget::Assigned {
                    employee_id: "e3".into(),
                    shift_id: "s3".into(),
                    date: wednesday,
                },
            },
        ];
    }

    #[test]
    fn staff_dropped_on_shift_is_assigned() {
        let mut app = app(Screen::Staff);
        board(&mut app);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 32, 5));
        let shift = app.schedule.item("s3").unwrap();
        assert_eq!(shift.assigned_staff, vec!["e3".to_string(), "e4".to_string()]);
    }

    #[test]
    fn staff_on_leave_is_refused() {
        let mut app = app(Screen::Staff);
        app.schedule.time_off.push(TimeOffRequest {
            employee_id: "e4".into(),
            start_date: monday(),
            end_date: monday() + Duration::days(4),
            kind: TimeOffKind::Vacation,
            status: ApprovalStatus::Approved,
        });
        board(&mut app);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 32, 5));
        assert_eq!(app.schedule.item("s3").unwrap().assigned_staff, vec!["e3".to_string()]);
        assert!(app.status_message.unwrap().contains("on leave"));
    }

    #[test]
    fn staff_dragged_off_shift_is_removed() {
        let mut app = app(Screen::Staff);
        board(&mut app);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 32, 7));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 60, 30));
        assert!(app.schedule.item("s3").unwrap().assigned_staff.is_empty());
    }
}
