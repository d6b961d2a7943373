use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::schedule::item::{CalendarItem, ItemKind};
use crate::schedule::model::Schedule;
use crate::theme::Theme;

/// Item the user clicked, and the day it was clicked on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTarget {
    pub item_id: String,
    pub date: NaiveDate,
}

pub fn render_detail_popup(
    frame: &mut Frame,
    area: Rect,
    target: &DetailTarget,
    schedule: &Schedule,
    reference_day: NaiveDate,
    theme: &Theme,
) {
    let Some(item) = schedule.item(&target.item_id) else {
        return;
    };
    let popup_w = area.width.clamp(30, 60).min(area.width);
    let popup_h = area.height.clamp(8, 18).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let accent = theme.item_style(item.kind, item.color.as_deref());
    let block = Block::default()
        .title(format!(" {} ", item.title))
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(accent);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = detail_lines(item, target.date, schedule, reference_day, theme);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn field<'a>(label: &'a str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, theme.dim),
        Span::styled(value, Style::default()),
    ])
}

fn detail_lines<'a>(
    item: &'a CalendarItem,
    date: NaiveDate,
    schedule: &'a Schedule,
    reference_day: NaiveDate,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let kind = match item.kind {
        ItemKind::Event => "Event",
        ItemKind::Shift => "Shift",
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ", theme.item_style(item.kind, item.color.as_deref())),
            Span::raw(format!(" {}", kind)),
        ]),
        Line::from(""),
        field("Time: ", item.time_range_display(), theme),
        field("Date: ", date.format("%A, %B %d, %Y").to_string(), theme),
        field("Repeats: ", item.recurrence.label(), theme),
    ];
    if !item.facility.is_empty() {
        lines.push(field("Facility: ", item.facility.clone(), theme));
    }
    if !item.exceptions.is_empty() {
        lines.push(field("Skipped dates: ", item.exceptions.len().to_string(), theme));
    }

    match item.kind {
        ItemKind::Event => {
            let shifts: Vec<&CalendarItem> = schedule.shifts_of(&item.id).collect();
            if !shifts.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Shifts", theme.header)));
                for shift in shifts {
                    lines.push(Line::from(format!(
                        "  {} ({})",
                        shift.title,
                        shift.time_range_display()
                    )));
                }
            }
        }
        ItemKind::Shift => {
            if let Some(event) = item.event_id.as_deref().and_then(|id| schedule.item(id)) {
                lines.push(field("For: ", event.title.clone(), theme));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Staff", theme.header)));
            if item.assigned_staff.is_empty() {
                lines.push(Line::from(Span::styled("  (unstaffed)", theme.dim)));
            }
            for employee_id in &item.assigned_staff {
                let status = schedule.assignment_status(employee_id, item, date, reference_day);
                let name = schedule
                    .employee(employee_id)
                    .map_or(employee_id.as_str(), |e| e.name.as_str());
                lines.push(Line::from(Span::styled(
                    format!("  {}", name),
                    theme.staff_style(status),
                )));
            }
        }
    }
    lines
}
