use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::overlap::Span;
use super::recurrence::{occurs_on, RecurrenceRule};
use super::time::{parse_end_time, time_to_minutes};
use crate::error::TimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Event,
    Shift,
}

/// An event or shift definition. One item may produce many occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", rename_all = "camelCase")]
pub struct CalendarItem {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub facility: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub recurrence: RecurrenceRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_staff: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Wire shape; accepts the legacy `isRecurring` flag alongside `recurrence`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: String,
    title: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    facility: String,
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    is_recurring: Option<bool>,
    #[serde(default)]
    anchor_date: Option<NaiveDate>,
    #[serde(default)]
    exceptions: Vec<NaiveDate>,
    #[serde(default)]
    assigned_staff: Vec<String>,
    #[serde(default)]
    color: Option<String>,
}

impl From<ItemRecord> for CalendarItem {
    fn from(r: ItemRecord) -> Self {
        let recurrence = r
            .recurrence
            .unwrap_or_else(|| RecurrenceRule::from_legacy_flag(r.is_recurring.unwrap_or(false)));
        Self {
            id: r.id,
            title: r.title,
            start_time: r.start_time,
            end_time: r.end_time,
            facility: r.facility,
            kind: r.kind,
            event_id: r.event_id,
            recurrence,
            anchor_date: r.anchor_date,
            exceptions: r.exceptions,
            assigned_staff: r.assigned_staff,
            color: r.color,
        }
    }
}

impl CalendarItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ItemKind,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            facility: String::new(),
            kind,
            event_id: None,
            recurrence: RecurrenceRule::None,
            anchor_date: None,
            exceptions: Vec::new(),
            assigned_staff: Vec::new(),
            color: None,
        }
    }

    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = facility.into();
        self
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = rule;
        self
    }

    pub fn with_anchor(mut self, date: NaiveDate) -> Self {
        self.anchor_date = Some(date);
        self
    }

    pub fn attached_to(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_staff(mut self, staff: &[&str]) -> Self {
        self.assigned_staff = staff.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Events can be dragged; shifts are click-only on the calendar.
    pub fn is_draggable(&self) -> bool {
        self.kind == ItemKind::Event
    }

    pub fn is_standalone_shift(&self) -> bool {
        self.kind == ItemKind::Shift && self.event_id.is_none()
    }

    /// Start and end in minutes, rejecting malformed or inverted ranges.
    pub fn span(&self) -> Result<Span, TimeError> {
        let start = time_to_minutes(&self.start_time)?;
        let end = parse_end_time(&self.end_time)?;
        if end <= start {
            return Err(TimeError::OutOfRange(format!(
                "{}-{}",
                self.start_time, self.end_time
            )));
        }
        Ok(Span::new(start, end))
    }

    /// Occurrence test; `fallback_anchor` stands in for a missing anchor date.
    pub fn occurs_on(&self, date: NaiveDate, fallback_anchor: NaiveDate) -> bool {
        let anchor = match (&self.recurrence, self.anchor_date) {
            (_, Some(anchor)) => anchor,
            (RecurrenceRule::None, None) => fallback_anchor,
            // repeating rules without an anchor have always applied
            (_, None) => NaiveDate::MIN,
        };
        occurs_on(&self.recurrence, date, anchor, &self.exceptions)
    }

    pub fn time_range_display(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_flag_maps_to_rule() {
        let item: CalendarItem = serde_json::from_str(
            r#"{"id":"1","title":"Morning Show","startTime":"08:00","endTime":"11:00",
                "facility":"Studio A","type":"event","isRecurring":true}"#,
        )
        .unwrap();
        assert_eq!(item.recurrence, RecurrenceRule::weekdays());
        assert!(item.is_draggable());
    }

    #[test]
    fn explicit_rule_wins_and_survives_a_write() {
        let item = CalendarItem::new("s3", "Technical Support", ItemKind::Shift, "09:00", "17:00")
            .with_recurrence(RecurrenceRule::Daily)
            .with_staff(&["e3"]);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""type":"shift""#));
        assert!(json.contains(r#""assignedStaff":["e3"]"#));
        let back: CalendarItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn span_rejects_inverted_and_malformed() {
        let ok = CalendarItem::new("a", "A", ItemKind::Event, "22:00", "24:00");
        assert_eq!(ok.span(), Ok(Span::new(1320, 1440)));
        let inverted = CalendarItem::new("b", "B", ItemKind::Event, "10:00", "09:00");
        assert!(inverted.span().is_err());
        let bad = CalendarItem::new("c", "C", ItemKind::Event, "9am", "10:00");
        assert!(matches!(bad.span(), Err(TimeError::Malformed(_))));
    }

    #[test]
    fn one_off_without_anchor_uses_fallback() {
        let wed = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let thu = wed.succ_opt().unwrap();
        let item = CalendarItem::new("x", "X", ItemKind::Shift, "09:00", "10:00");
        assert!(item.occurs_on(wed, wed));
        assert!(!item.occurs_on(thu, wed));
    }
}
