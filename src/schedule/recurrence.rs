use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How an item repeats across calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "pattern", rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// A single occurrence on the anchor date.
    #[default]
    None,
    Daily,
    Weekly { days: Vec<Weekday> },
    Monthly {
        #[serde(rename = "dayOfMonth")]
        day_of_month: u32,
    },
}

pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

impl RecurrenceRule {
    /// Monday to Friday, the rule behind the legacy `isRecurring` flag.
    pub fn weekdays() -> Self {
        RecurrenceRule::Weekly {
            days: WEEKDAYS.to_vec(),
        }
    }

    pub fn from_legacy_flag(is_recurring: bool) -> Self {
        if is_recurring {
            Self::weekdays()
        } else {
            RecurrenceRule::None
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceRule::None)
    }

    pub fn label(&self) -> String {
        match self {
            RecurrenceRule::None => "Once".to_string(),
            RecurrenceRule::Daily => "Daily".to_string(),
            RecurrenceRule::Weekly { days } if days.as_slice() == WEEKDAYS.as_slice() => {
                "Weekdays".to_string()
            }
            RecurrenceRule::Weekly { days } => {
                let names: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                format!("Weekly ({})", names.join(", "))
            }
            RecurrenceRule::Monthly { day_of_month } => format!("Monthly on day {}", day_of_month),
        }
    }
}

/// Whether a rule produces an occurrence on `date`.
///
/// `anchor` is the single date for [`RecurrenceRule::None`] and the first
/// eligible date for repeating rules. `exceptions` suppress occurrences of any
/// rule.
pub fn occurs_on(
    rule: &RecurrenceRule,
    date: NaiveDate,
    anchor: NaiveDate,
    exceptions: &[NaiveDate],
) -> bool {
    if exceptions.contains(&date) {
        return false;
    }
    match rule {
        RecurrenceRule::None => date == anchor,
        RecurrenceRule::Daily => date >= anchor,
        RecurrenceRule::Weekly { days } => date >= anchor && days.contains(&date.weekday()),
        // months shorter than day_of_month are skipped
        RecurrenceRule::Monthly { day_of_month } => {
            date >= anchor && date.day() == *day_of_month
        }
    }
}

/// The original fixed predicate: recurring items on weekdays, one-off items
/// on the third day of the displayed week.
pub fn should_show_on_date(date: NaiveDate, is_recurring: bool, week_days: &[NaiveDate]) -> bool {
    if is_recurring {
        return WEEKDAYS.contains(&date.weekday());
    }
    week_days.get(2).is_some_and(|reference| *reference == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn week_of(monday: NaiveDate) -> Vec<NaiveDate> {
        (0..7).map(|i| monday + chrono::Duration::days(i)).collect()
    }

    #[test]
    fn legacy_predicate() {
        // 2026-10-12 is a Monday
        let week = week_of(d(2026, 10, 12));
        assert!(should_show_on_date(week[0], true, &week));
        assert!(should_show_on_date(week[4], true, &week));
        assert!(!should_show_on_date(week[5], true, &week));
        assert!(should_show_on_date(week[2], false, &week));
        assert!(!should_show_on_date(week[3], false, &week));
    }

    #[test]
    fn legacy_matches_rule_encoding() {
        let week = week_of(d(2026, 10, 12));
        let anchor = week[2];
        for date in &week {
            for flag in [true, false] {
                let rule = RecurrenceRule::from_legacy_flag(flag);
                let rule_anchor = if flag { week[0] } else { anchor };
                assert_eq!(
                    occurs_on(&rule, *date, rule_anchor, &[]),
                    should_show_on_date(*date, flag, &week),
                    "{date} recurring={flag}"
                );
            }
        }
    }

    #[test]
    fn monthly_skips_short_months() {
        let rule = RecurrenceRule::Monthly { day_of_month: 31 };
        let anchor = d(2026, 1, 1);
        assert!(occurs_on(&rule, d(2026, 1, 31), anchor, &[]));
        assert!(!occurs_on(&rule, d(2026, 2, 28), anchor, &[]));
        assert!(occurs_on(&rule, d(2026, 3, 31), anchor, &[]));
    }

    #[test]
    fn nothing_before_anchor_and_exceptions_skip() {
        let anchor = d(2026, 10, 14);
        assert!(!occurs_on(&RecurrenceRule::Daily, d(2026, 10, 13), anchor, &[]));
        assert!(occurs_on(&RecurrenceRule::Daily, d(2026, 10, 15), anchor, &[]));
        assert!(!occurs_on(
            &RecurrenceRule::Daily,
            d(2026, 10, 15),
            anchor,
            &[d(2026, 10, 15)]
        ));
    }

    #[test]
    fn serde_shape() {
        let rule: RecurrenceRule =
            serde_json::from_str(r#"{"pattern":"weekly","days":["Sat","Sun"]}"#).unwrap();
        assert_eq!(
            rule,
            RecurrenceRule::Weekly {
                days: vec![Weekday::Sat, Weekday::Sun]
            }
        );
        let none: RecurrenceRule = serde_json::from_str(r#"{"pattern":"none"}"#).unwrap();
        assert_eq!(none, RecurrenceRule::None);
    }
}
