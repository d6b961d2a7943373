use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::LayoutConfig;
use crate::error::CommitRejection;
use crate::schedule::dropzone::ViewportGeometry;
use crate::schedule::item::ItemKind;
use crate::schedule::model::{Schedule, TimeChange};
use crate::schedule::time::{format_hour, minutes_to_time};
use crate::schedule::week::{ItemRect, ViewMode, WeekLayout, DAYS_PER_WEEK};
use crate::theme::Theme;

const TIME_COL_W: u16 = 6;

/// Screen placement of the week grid for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlacement {
    pub viewport: ViewportGeometry,
    /// Visible part of the grid (day columns only, below the header row).
    pub body: Rect,
    pub time_col: Rect,
    pub header: Rect,
}

impl GridPlacement {
    pub fn compute(inner: Rect, scroll_rows: u16, layout: &LayoutConfig) -> Self {
        let day_w = (inner.width.saturating_sub(TIME_COL_W) / DAYS_PER_WEEK as u16).max(1);
        let grid_x = inner.x + TIME_COL_W;
        let body_y = inner.y + 1;
        let body = Rect::new(
            grid_x,
            body_y,
            (day_w * DAYS_PER_WEEK as u16).min(inner.width.saturating_sub(TIME_COL_W)),
            inner.height.saturating_sub(1),
        );
        let viewport = ViewportGeometry {
            origin_x: grid_x as f32,
            origin_y: body_y as f32 - scroll_rows as f32,
            day_width: day_w as f32,
            days: DAYS_PER_WEEK,
            grid: layout.grid(),
            snap_minutes: layout.snap_minutes,
        };
        Self {
            viewport,
            body,
            time_col: Rect::new(inner.x, body_y, TIME_COL_W.min(inner.width), body.height),
            header: Rect::new(grid_x, inner.y, body.width, 1.min(inner.height)),
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.body.x
            && column < self.body.right()
            && row >= self.body.y
            && row < self.body.bottom()
    }

    /// Cell rectangle for a float rect, clipped to the visible body.
    fn cells(&self, r: ItemRect) -> Option<Rect> {
        let x0 = r.x.floor() as i32;
        let x1 = (r.x + r.width).floor() as i32;
        let y0 = r.y.round() as i32;
        let y1 = ((r.y + r.height).round() as i32).max(y0 + 1);
        let bx0 = self.body.x as i32;
        let by0 = self.body.y as i32;
        let bx1 = self.body.right() as i32;
        let by1 = self.body.bottom() as i32;
        let (cx0, cx1) = (x0.max(bx0), x1.min(bx1));
        let (cy0, cy1) = (y0.max(by0), y1.min(by1));
        if cx1 <= cx0 || cy1 <= cy0 {
            return None;
        }
        Some(Rect::new(cx0 as u16, cy0 as u16, (cx1 - cx0) as u16, (cy1 - cy0) as u16))
    }
}

/// Drag feedback drawn over the grid.
pub enum DragPreview<'a> {
    Landing(&'a TimeChange),
    Invalid(&'a CommitRejection),
}

pub struct WeekView;

impl WeekView {
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        placement: &GridPlacement,
        layout: &WeekLayout,
        schedule: &Schedule,
        mode: ViewMode,
        today: NaiveDate,
        preview: Option<DragPreview<'_>>,
        theme: &Theme,
    ) {
        let title = match mode {
            ViewMode::Schedule => format!(" Schedule: week of {} ", layout.week_start.format("%B %-d, %Y")),
            ViewMode::Rota => format!(" Rota: week of {} ", layout.week_start.format("%B %-d, %Y")),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);
        frame.render_widget(block, area);

        if placement.body.width < DAYS_PER_WEEK as u16 || placement.body.height == 0 {
            return;
        }

        render_day_headers(frame, placement, layout, today, theme);
        render_time_labels(frame, placement, theme);

        for (day, day_layout) in layout.days.iter().enumerate() {
            for occ in &day_layout.occurrences {
                let Some(item) = schedule.item(&occ.item_id) else {
                    continue;
                };
                let Some(cells) = placement.cells(layout.rect_of(&placement.viewport, day, occ))
                else {
                    continue;
                };
                let style = theme.item_style(item.kind, item.color.as_deref());
                let marker = match item.kind {
                    ItemKind::Event => "\u{25cf}",
                    ItemKind::Shift => "\u{25b8}",
                };
                let repeat = if item.recurrence.is_recurring() { " \u{21bb}" } else { "" };
                let mut lines = vec![Line::from(Span::styled(
                    format!("{} {}{}", marker, item.title, repeat),
                    style.add_modifier(Modifier::BOLD),
                ))];
                lines.push(Line::from(Span::styled(item.time_range_display(), style)));
                if !item.facility.is_empty() {
                    lines.push(Line::from(Span::styled(item.facility.clone(), style)));
                }
                if mode == ViewMode::Rota && !item.assigned_staff.is_empty() {
                    let names: Vec<&str> = item
                        .assigned_staff
                        .iter()
                        .map(|id| schedule.employee(id).map_or(id.as_str(), |e| e.name.as_str()))
                        .collect();
                    lines.push(Line::from(Span::styled(format!("Staff: {}", names.join(", ")), style)));
                }
                frame.render_widget(Clear, cells);
                frame.render_widget(Paragraph::new(lines).style(style), cells);
            }
        }

        match preview {
            Some(DragPreview::Landing(change)) => {
                render_landing(frame, placement, layout, change, theme);
            }
            Some(DragPreview::Invalid(reason)) => {
                let msg = format!(" {} ", reason);
                let w = (msg.len() as u16).min(placement.body.width);
                let r = Rect::new(placement.body.x, placement.body.bottom().saturating_sub(1), w, 1);
                frame.render_widget(Paragraph::new(msg).style(theme.rejected), r);
            }
            None => {}
        }
    }
}

fn render_day_headers(
    frame: &mut Frame,
    placement: &GridPlacement,
    layout: &WeekLayout,
    today: NaiveDate,
    theme: &Theme,
) {
    let day_w = placement.viewport.day_width as u16;
    for (i, day) in layout.days.iter().enumerate() {
        let x = placement.header.x + i as u16 * day_w;
        let cell = Rect::new(x, placement.header.y, day_w, placement.header.height);
        let label = if day_w >= 10 {
            day.date.format("%a %-d %b").to_string()
        } else if day_w >= 5 {
            day.date.format("%a").to_string()
        } else {
            day.date.format("%d").to_string()
        };
        let style = if day.date == today { theme.today } else { theme.header };
        let para = Paragraph::new(Line::from(Span::styled(
            format!("{:^width$}", label, width = day_w as usize),
            style,
        )));
        frame.render_widget(para, cell);
    }
}

fn render_time_labels(frame: &mut Frame, placement: &GridPlacement, theme: &Theme) {
    let grid = placement.viewport.grid;
    let hour_rows = grid.hour_height as i32;
    if hour_rows <= 0 {
        return;
    }
    let first_hour = grid.start_minutes / 60;
    for h in 0..grid.hours {
        let y = placement.viewport.origin_y as i32 + h as i32 * hour_rows;
        if y < placement.time_col.y as i32 || y >= placement.time_col.bottom() as i32 {
            continue;
        }
        let label = Paragraph::new(Span::styled(
            format!("{:>5} ", format_hour(first_hour + h)),
            theme.dim,
        ));
        frame.render_widget(label, Rect::new(placement.time_col.x, y as u16, placement.time_col.width, 1));

        // faint hour rule across the day columns
        let rule = "\u{2508}".repeat(placement.body.width as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(rule, Style::default().patch(theme.dim))),
            Rect::new(placement.body.x, y as u16, placement.body.width, 1),
        );
    }
}

fn render_landing(
    frame: &mut Frame,
    placement: &GridPlacement,
    layout: &WeekLayout,
    change: &TimeChange,
    theme: &Theme,
) {
    let Some(day) = layout.days.iter().position(|d| d.date == change.date) else {
        return;
    };
    let pos = layout.grid.position(change.start_minutes, change.end_minutes);
    let rect = ItemRect {
        x: placement.viewport.day_left(day),
        y: placement.viewport.origin_y + pos.top,
        width: placement.viewport.day_width,
        height: pos.height,
    };
    let Some(cells) = placement.cells(rect) else {
        return;
    };
    frame.render_widget(Clear, cells);
    frame.render_widget(Paragraph::new(landing_label(change)).style(theme.preview), cells);
}

fn landing_label(change: &TimeChange) -> String {
    format!(
        "{} - {}",
        minutes_to_time(change.start_minutes),
        minutes_to_time(change.end_minutes)
    )
}
