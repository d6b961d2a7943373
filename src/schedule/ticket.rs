use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    Submitted,
    Approved,
    Rejected,
    Implemented,
}

/// A ticket from one of the station's queues. Each kind carries only the
/// fields that make sense for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Ticket {
    #[serde(rename_all = "camelCase")]
    Incident {
        id: String,
        title: String,
        priority: Priority,
        status: IncidentStatus,
        #[serde(default)]
        facility: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Service {
        id: String,
        title: String,
        #[serde(default)]
        service_type: Option<String>,
        status: ServiceStatus,
        #[serde(default)]
        due_date: Option<NaiveDate>,
    },
    #[serde(rename_all = "camelCase")]
    Change {
        id: String,
        title: String,
        change_type: String,
        priority: Priority,
        status: ChangeStatus,
        #[serde(default)]
        proposed_date: Option<NaiveDate>,
        impact_assessment: String,
    },
    #[serde(rename_all = "camelCase")]
    Report {
        id: String,
        title: String,
        period_start: NaiveDate,
        period_end: NaiveDate,
        #[serde(default)]
        facility: Option<String>,
    },
}

impl Ticket {
    pub fn id(&self) -> &str {
        match self {
            Ticket::Incident { id, .. }
            | Ticket::Service { id, .. }
            | Ticket::Change { id, .. }
            | Ticket::Report { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Ticket::Incident { title, .. }
            | Ticket::Service { title, .. }
            | Ticket::Change { title, .. }
            | Ticket::Report { title, .. } => title,
        }
    }

    /// Reports are records, never open work.
    pub fn is_open(&self) -> bool {
        match self {
            Ticket::Incident { status, .. } => {
                matches!(status, IncidentStatus::Open | IncidentStatus::InProgress)
            }
            Ticket::Service { status, .. } => {
                matches!(status, ServiceStatus::Open | ServiceStatus::InProgress)
            }
            Ticket::Change { status, .. } => {
                matches!(status, ChangeStatus::Submitted | ChangeStatus::Approved)
            }
            Ticket::Report { .. } => false,
        }
    }

    pub fn priority(&self) -> Option<Priority> {
        match self {
            Ticket::Incident { priority, .. } | Ticket::Change { priority, .. } => Some(*priority),
            Ticket::Service { .. } | Ticket::Report { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_kind() {
        let tickets: Vec<Ticket> = serde_json::from_str(
            r#"[
                {"kind":"incident","id":"i1","title":"Transmitter alarm","priority":"Critical","status":"In Progress","facility":"Tower"},
                {"kind":"service","id":"v1","title":"Replace headset","status":"Completed"},
                {"kind":"change","id":"c1","title":"Router firmware","changeType":"Network","priority":"High",
                 "status":"Submitted","impactAssessment":"Ten minute outage on the studio LAN"},
                {"kind":"report","id":"r1","title":"September rota","periodStart":"2026-09-01","periodEnd":"2026-09-30"}
            ]"#,
        )
        .unwrap();
        assert_eq!(tickets.len(), 4);
        assert_eq!(tickets[0].priority(), Some(Priority::Critical));
        let open: Vec<&str> = tickets.iter().filter(|t| t.is_open()).map(|t| t.id()).collect();
        assert_eq!(open, vec!["i1", "c1"]);
    }

    #[test]
    fn service_ticket_requires_status() {
        let err = serde_json::from_str::<Ticket>(
            r#"{"kind":"service","id":"v2","title":"x","priority":"Low"}"#,
        );
        assert!(err.is_err());
    }
}
