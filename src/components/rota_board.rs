use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::schedule::model::{EmployeeStatus, Schedule};
use crate::schedule::week::{week_days, DAYS_PER_WEEK};
use crate::theme::Theme;

const STAFF_PANEL_W: u16 = 24;

/// Something on the board that accepts a press or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardTarget {
    /// Entry in the staff list.
    Staff { employee_id: String },
    /// A shift card on a given day.
    Shift { shift_id: String, date: NaiveDate },
    /// An employee already assigned to a shift.
    Assigned {
        employee_id: String,
        shift_id: String,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRegion {
    pub rect: Rect,
    pub target: BoardTarget,
}

/// Most specific region under a cell. Assigned chips sit inside their shift
/// card, so later (inner) regions win.
pub fn region_at(regions: &[BoardRegion], column: u16, row: u16) -> Option<&BoardRegion> {
    regions.iter().rev().find(|r| {
        column >= r.rect.x && column < r.rect.right() && row >= r.rect.y && row < r.rect.bottom()
    })
}

pub struct RotaBoard;

impl RotaBoard {
    /// Draw the board and return its interactive regions.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        schedule: &Schedule,
        week_start: NaiveDate,
        today: NaiveDate,
        dragging: Option<&str>,
        theme: &Theme,
    ) -> Vec<BoardRegion> {
        let mut regions = Vec::new();
        let cols = Layout::horizontal([Constraint::Length(STAFF_PANEL_W), Constraint::Min(14)]).split(area);
        let days = week_days(week_start);

        render_staff(frame, cols[0], schedule, &days, dragging, theme, &mut regions);

        let block = Block::default()
            .title(format!(" Rota: week of {} ", week_start.format("%B %-d, %Y")))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(cols[1]);
        frame.render_widget(block, cols[1]);
        if inner.width < DAYS_PER_WEEK as u16 || inner.height < 2 {
            return regions;
        }

        let day_w = inner.width / DAYS_PER_WEEK as u16;
        let reference_day = days[2];
        for (i, date) in days.iter().enumerate() {
            let col = Rect::new(inner.x + i as u16 * day_w, inner.y, day_w, inner.height);
            render_day(frame, col, schedule, *date, reference_day, today, theme, &mut regions);
        }
        regions
    }
}

fn render_staff(
    frame: &mut Frame,
    area: Rect,
    schedule: &Schedule,
    days: &[NaiveDate],
    dragging: Option<&str>,
    theme: &Theme,
    regions: &mut Vec<BoardRegion>,
) {
    let block = Block::default()
        .title(" Staff ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut y = inner.y;
    for emp in schedule
        .employees
        .iter()
        .filter(|e| e.status == EmployeeStatus::Active)
    {
        if y + 1 >= inner.bottom() {
            break;
        }
        let away = days.iter().any(|d| schedule.time_off_for(&emp.id, *d).is_some());
        let name_style = if dragging == Some(emp.id.as_str()) {
            theme.selected
        } else if away {
            theme.staff_leave
        } else {
            theme.header
        };
        let mut name = vec![Span::styled(emp.name.clone(), name_style)];
        if away {
            name.push(Span::styled(" (leave)", theme.staff_leave));
        }
        let lines = vec![
            Line::from(name),
            Line::from(Span::styled(format!("  {}", emp.position), theme.dim)),
        ];
        let rect = Rect::new(inner.x, y, inner.width, 2);
        frame.render_widget(Paragraph::new(lines), rect);
        regions.push(BoardRegion {
            rect,
            target: BoardTarget::Staff {
                employee_id: emp.id.clone(),
            },
        });
        y += 2;
    }
}

#[allow(clippy::too_many_arguments)]
fn render_day(
    frame: &mut Frame,
    area: Rect,
    schedule: &Schedule,
    date: NaiveDate,
    reference_day: NaiveDate,
    today: NaiveDate,
    theme: &Theme,
    regions: &mut Vec<BoardRegion>,
) {
    let header_style = if date == today { theme.today } else { theme.header };
    let label = date.format("%a %-d").to_string();
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{:^width$}", label, width = area.width as usize),
            header_style,
        )),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let mut y = area.y + 1;
    for shift in schedule.shifts_for_day(date, reference_day) {
        let card_h = 2 + shift.assigned_staff.len().max(1) as u16;
        if y + card_h > area.bottom() {
            break;
        }
        let card = Rect::new(area.x, y, area.width.saturating_sub(1), card_h);
        let style = theme.item_style(shift.kind, shift.color.as_deref());
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(shift.title.clone(), style.add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(shift.time_range_display(), style)),
            ])
            .style(style),
            card,
        );
        regions.push(BoardRegion {
            rect: card,
            target: BoardTarget::Shift {
                shift_id: shift.id.clone(),
                date,
            },
        });

        if shift.assigned_staff.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("(unstaffed)", style.add_modifier(Modifier::ITALIC))),
                Rect::new(card.x, y + 2, card.width, 1),
            );
        }
        for (row, employee_id) in shift.assigned_staff.iter().enumerate() {
            let status = schedule.assignment_status(employee_id, shift, date, reference_day);
            let name = schedule
                .employee(employee_id)
                .map_or(employee_id.as_str(), |e| e.name.as_str());
            let chip = Rect::new(card.x, y + 2 + row as u16, card.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", name), theme.staff_style(status))),
                chip,
            );
            regions.push(BoardRegion {
                rect: chip,
                target: BoardTarget::Assigned {
                    employee_id: employee_id.clone(),
                    shift_id: shift.id.clone(),
                    date,
                },
            });
        }
        y += card_h + 1;
    }
}
