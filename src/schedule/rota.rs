//! Staff assignment for the rota panel.

use chrono::NaiveDate;
use tracing::debug;

use super::item::{CalendarItem, ItemKind};
use super::model::{ApprovalStatus, Schedule, TimeOffRequest};
use super::overlap::Span;

/// How an assigned employee sits on a shift for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    OnLeave,
    Conflict,
    Ok,
}

/// A staff member being dragged, either from the staff list or off a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffDrag {
    pub employee_id: String,
    pub from_shift: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotaChange {
    Assign { shift_id: String, employee_id: String },
    Unassign { shift_id: String, employee_id: String },
}

fn spans_overlap(a: Span, b: Span) -> bool {
    a.start < b.end && a.end > b.start
}

impl Schedule {
    /// Shifts on `date`, sorted by start time.
    pub fn shifts_for_day(&self, date: NaiveDate, reference_day: NaiveDate) -> Vec<&CalendarItem> {
        let mut shifts: Vec<&CalendarItem> = self
            .items
            .iter()
            .filter(|i| i.kind == ItemKind::Shift)
            .filter(|shift| self.shift_occurs_on(shift, date, reference_day))
            .collect();
        // unparseable times sort last
        shifts.sort_by_key(|s| s.span().map_or(u16::MAX, |span| span.start));
        shifts
    }

    /// Attached shifts follow their event; others follow their own rule.
    fn shift_occurs_on(&self, shift: &CalendarItem, date: NaiveDate, reference_day: NaiveDate) -> bool {
        match shift.event_id.as_deref().and_then(|id| self.item(id)) {
            Some(event) => event.occurs_on(date, reference_day),
            None => shift.occurs_on(date, reference_day),
        }
    }

    pub fn time_off_for(&self, employee_id: &str, date: NaiveDate) -> Option<&TimeOffRequest> {
        self.time_off.iter().find(|r| {
            r.employee_id == employee_id && r.status == ApprovalStatus::Approved && r.covers(date)
        })
    }

    /// Another shift that day already has this employee at an overlapping time.
    pub fn has_conflict(
        &self,
        employee_id: &str,
        shift: &CalendarItem,
        date: NaiveDate,
        reference_day: NaiveDate,
    ) -> bool {
        let Ok(target) = shift.span() else {
            return false;
        };
        self.shifts_for_day(date, reference_day)
            .into_iter()
            .filter(|other| other.id != shift.id)
            .filter(|other| other.assigned_staff.iter().any(|s| s == employee_id))
            .filter_map(|other| other.span().ok())
            .any(|span| spans_overlap(span, target))
    }

    /// Conflicts are allowed (and highlighted); approved leave is not.
    pub fn can_assign(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.time_off_for(employee_id, date).is_none()
    }

    pub fn assignment_status(
        &self,
        employee_id: &str,
        shift: &CalendarItem,
        date: NaiveDate,
        reference_day: NaiveDate,
    ) -> AssignmentStatus {
        if self.time_off_for(employee_id, date).is_some() {
            AssignmentStatus::OnLeave
        } else if self.has_conflict(employee_id, shift, date, reference_day) {
            AssignmentStatus::Conflict
        } else {
            AssignmentStatus::Ok
        }
    }

    /// Changes produced by dropping a dragged staff member onto a shift.
    /// Empty when the drop is refused or changes nothing.
    pub fn drop_staff(&self, drag: &StaffDrag, target_shift: &str, date: NaiveDate) -> Vec<RotaChange> {
        let Some(target) = self.item(target_shift).filter(|i| i.kind == ItemKind::Shift) else {
            return Vec::new();
        };
        if !self.can_assign(&drag.employee_id, date) {
            debug!(employee = %drag.employee_id, shift = %target_shift, "drop refused: on leave");
            return Vec::new();
        }
        let mut changes = Vec::new();
        if let Some(from) = drag.from_shift.as_deref() {
            if from != target_shift {
                changes.push(RotaChange::Unassign {
                    shift_id: from.to_string(),
                    employee_id: drag.employee_id.clone(),
                });
            }
        }
        if !target.assigned_staff.contains(&drag.employee_id) {
            changes.push(RotaChange::Assign {
                shift_id: target_shift.to_string(),
                employee_id: drag.employee_id.clone(),
            });
        }
        changes
    }

    pub fn apply_rota(&mut self, change: &RotaChange) {
        match change {
            RotaChange::Assign {
                shift_id,
                employee_id,
            } => {
                if let Some(shift) = self.item_mut(shift_id) {
                    if !shift.assigned_staff.contains(employee_id) {
                        shift.assigned_staff.push(employee_id.clone());
                    }
                }
            }
            RotaChange::Unassign {
                shift_id,
                employee_id,
            } => {
                if let Some(shift) = self.item_mut(shift_id) {
                    shift.assigned_staff.retain(|s| s != employee_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::model::{Employee, EmployeeStatus, TimeOffKind};
    use crate::schedule::recurrence::RecurrenceRule;

    fn wed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn schedule() -> Schedule {
        Schedule {
            items: vec![
                CalendarItem::new("1", "Morning Show", ItemKind::Event, "08:00", "11:00")
                    .with_recurrence(RecurrenceRule::weekdays()),
                CalendarItem::new("s1", "Show Host", ItemKind::Shift, "07:30", "11:30")
                    .attached_to("1")
                    .with_staff(&["e1"]),
                CalendarItem::new("s3", "Technical Support", ItemKind::Shift, "09:00", "17:00")
                    .with_staff(&["e3"]),
                CalendarItem::new("s4", "Late Desk", ItemKind::Shift, "17:00", "23:00")
                    .with_recurrence(RecurrenceRule::Daily),
            ],
            employees: vec![
                Employee {
                    id: "e1".into(),
                    name: "John Doe".into(),
                    position: "Presenter".into(),
                    department: "On Air".into(),
                    status: EmployeeStatus::Active,
                },
                Employee {
                    id: "e3".into(),
                    name: "Mike Johnson".into(),
                    position: "Engineer".into(),
                    department: "Engineering".into(),
                    status: EmployeeStatus::Active,
                },
            ],
            time_off: vec![TimeOffRequest {
                employee_id: "e3".into(),
                start_date: wed(),
                end_date: wed(),
                kind: TimeOffKind::Vacation,
                status: ApprovalStatus::Approved,
            }],
            tickets: Vec::new(),
        }
    }

    #[test]
    fn day_shifts_sorted_by_start() {
        let s = schedule();
        let ids: Vec<&str> = s.shifts_for_day(wed(), wed()).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3", "s4"]);
        let sat = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let ids: Vec<&str> = s.shifts_for_day(sat, wed()).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["s4"]);
    }

    #[test]
    fn one_digit_hours_sort_by_time() {
        let s = Schedule {
            items: vec![
                CalendarItem::new("late", "Late Desk", ItemKind::Shift, "17:00", "20:00")
                    .with_anchor(wed()),
                CalendarItem::new("early", "Early Desk", ItemKind::Shift, "9:00", "12:00")
                    .with_anchor(wed()),
                CalendarItem::new("broken", "Broken", ItemKind::Shift, "noon", "13:00")
                    .with_anchor(wed()),
            ],
            ..Default::default()
        };
        let ids: Vec<&str> = s.shifts_for_day(wed(), wed()).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "broken"]);
    }

    #[test]
    fn overlapping_assignment_is_a_conflict() {
        let mut s = schedule();
        s.apply_rota(&RotaChange::Assign {
            shift_id: "s3".into(),
            employee_id: "e1".into(),
        });
        let tech = s.item("s3").unwrap().clone();
        assert!(s.has_conflict("e1", &tech, wed(), wed()));
        let late = s.item("s4").unwrap().clone();
        assert!(!s.has_conflict("e1", &late, wed(), wed()));
        assert_eq!(s.assignment_status("e1", &tech, wed(), wed()), AssignmentStatus::Conflict);
        assert_eq!(s.assignment_status("e3", &tech, wed(), wed()), AssignmentStatus::OnLeave);
    }

    #[test]
    fn moving_between_shifts_unassigns_first() {
        let s = schedule();
        let drag = StaffDrag {
            employee_id: "e1".into(),
            from_shift: Some("s1".into()),
        };
        assert_eq!(
            s.drop_staff(&drag, "s4", wed()),
            vec![
                RotaChange::Unassign {
                    shift_id: "s1".into(),
                    employee_id: "e1".into()
                },
                RotaChange::Assign {
                    shift_id: "s4".into(),
                    employee_id: "e1".into()
                },
            ]
        );
        // dropping back on the same shift changes nothing
        assert!(s.drop_staff(&drag, "s1", wed()).is_empty());
    }

    #[test]
    fn leave_blocks_drop() {
        let s = schedule();
        let drag = StaffDrag {
            employee_id: "e3".into(),
            from_shift: None,
        };
        assert!(s.drop_staff(&drag, "s4", wed()).is_empty());
        let thu = wed().succ_opt().unwrap();
        assert_eq!(s.drop_staff(&drag, "s4", thu).len(), 1);
    }
}
