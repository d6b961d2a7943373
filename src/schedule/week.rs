use chrono::{Datelike, Duration, NaiveDate};
use tracing::warn;

use super::dropzone::{PointerPosition, ViewportGeometry};
use super::geometry::{GridGeometry, Position};
use super::item::{CalendarItem, ItemKind};
use super::model::Schedule;
use super::overlap::{assign_columns, ColumnRules, ColumnSlot, Span};
use crate::error::TimeError;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Events with their attached shifts.
    #[default]
    Schedule,
    /// Events and standalone shifts only; staffing happens in the rota panel.
    Rota,
}

/// One day's rendered instance of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub item_id: String,
    pub kind: ItemKind,
    pub draggable: bool,
    pub span: Span,
    pub position: Position,
    pub slot: ColumnSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub occurrences: Vec<Occurrence>,
    /// Items that should have shown but carry unusable times.
    pub skipped: Vec<(String, TimeError)>,
}

/// Surface rectangle of an occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ItemRect {
    pub fn contains(&self, p: PointerPosition) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// What sits under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub day: usize,
    pub item_id: String,
    pub kind: ItemKind,
    pub draggable: bool,
    pub span: Span,
    pub rect: ItemRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekLayout {
    pub week_start: NaiveDate,
    pub grid: GridGeometry,
    pub days: Vec<DayLayout>,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn week_days(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..DAYS_PER_WEEK as i64)
        .map(|i| week_start + Duration::days(i))
        .collect()
}

/// Items visible on `date`, in draw order: each event followed by its
/// attached shifts (schedule mode only), then standalone shifts.
pub fn items_for_date<'a>(
    schedule: &'a Schedule,
    date: NaiveDate,
    reference_day: NaiveDate,
    mode: ViewMode,
) -> Vec<&'a CalendarItem> {
    let mut out = Vec::new();
    for event in schedule.events() {
        if !event.occurs_on(date, reference_day) {
            continue;
        }
        out.push(event);
        if mode == ViewMode::Schedule {
            out.extend(schedule.shifts_of(&event.id));
        }
    }
    out.extend(
        schedule
            .standalone_shifts()
            .filter(|shift| shift.occurs_on(date, reference_day)),
    );
    out
}

impl DayLayout {
    pub fn build(
        items: &[&CalendarItem],
        date: NaiveDate,
        grid: &GridGeometry,
        rules: ColumnRules,
    ) -> Self {
        let mut placed: Vec<(&CalendarItem, Span)> = Vec::with_capacity(items.len());
        let mut skipped = Vec::new();
        for item in items {
            match item.span() {
                Ok(span) => placed.push((item, span)),
                Err(err) => {
                    warn!(item = %item.id, %date, error = %err, "skipping item with bad times");
                    skipped.push((item.id.clone(), err));
                }
            }
        }

        let spans: Vec<Span> = placed.iter().map(|(_, span)| *span).collect();
        let slots = assign_columns(&spans, rules);

        let occurrences = placed
            .into_iter()
            .zip(slots)
            .map(|((item, span), slot)| Occurrence {
                item_id: item.id.clone(),
                kind: item.kind,
                draggable: item.is_draggable(),
                span,
                position: grid.position(span.start, span.end),
                slot,
            })
            .collect();

        Self {
            date,
            occurrences,
            skipped,
        }
    }

    pub fn column_count(&self) -> usize {
        self.occurrences
            .first()
            .map(|o| o.slot.total_columns)
            .unwrap_or(0)
    }
}

impl WeekLayout {
    pub fn build(
        schedule: &Schedule,
        week_start: NaiveDate,
        mode: ViewMode,
        grid: GridGeometry,
        rules: ColumnRules,
    ) -> Self {
        let dates = week_days(week_start);
        let reference_day = dates[2];
        let days = dates
            .iter()
            .map(|&date| {
                let items = items_for_date(schedule, date, reference_day, mode);
                DayLayout::build(&items, date, &grid, rules)
            })
            .collect();
        Self {
            week_start,
            grid,
            days,
        }
    }

    pub fn date_of(&self, day: usize) -> Option<NaiveDate> {
        self.days.get(day).map(|d| d.date)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &(String, TimeError)> {
        self.days.iter().flat_map(|d| d.skipped.iter())
    }

    pub fn rect_of(&self, viewport: &ViewportGeometry, day: usize, occ: &Occurrence) -> ItemRect {
        let lane_width = viewport.day_width / occ.slot.total_columns.max(1) as f32;
        ItemRect {
            x: viewport.day_left(day) + occ.slot.layer_index as f32 * lane_width,
            y: viewport.origin_y + occ.position.top,
            width: lane_width,
            height: occ.position.height,
        }
    }

    /// Topmost occurrence under the pointer; later occurrences draw on top.
    pub fn hit_test(&self, viewport: &ViewportGeometry, pointer: PointerPosition) -> Option<Hit> {
        let day = viewport.day_at(pointer.x)?;
        let layout = self.days.get(day)?;
        layout.occurrences.iter().rev().find_map(|occ| {
            let rect = self.rect_of(viewport, day, occ);
            rect.contains(pointer).then(|| Hit {
                day,
                item_id: occ.item_id.clone(),
                kind: occ.kind,
                draggable: occ.draggable,
                span: occ.span,
                rect,
            })
        })
    }
}
