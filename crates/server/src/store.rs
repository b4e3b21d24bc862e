use std::cmp::Reverse;

use grievance_common::api::complaints::{ComplaintQuery, ComplaintSort};
use grievance_common::types::Complaint;
use grievance_common::{GrievanceError, Result};

/// In-memory complaint store standing in for the persistence layer.
///
/// Complaints are kept in submission order. The embedded analysis is never
/// modified after insert; resolution only touches status and notes.
#[derive(Default)]
pub struct ComplaintStore {
    complaints: Vec<Complaint>,
}

impl ComplaintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.complaints.len()
    }

    pub fn insert(&mut self, complaint: Complaint) {
        self.complaints.push(complaint);
    }

    /// Look up a complaint by its citizen-facing docket number.
    pub fn get_by_docket(&self, docket: &str) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id.matches_docket(docket))
    }

    /// Complaints matching `query`, newest first unless priority order is asked for.
    pub fn list(&self, query: &ComplaintQuery) -> Vec<Complaint> {
        // Reverse submission order so equal timestamps still list newest first.
        let mut matches: Vec<Complaint> = self
            .complaints
            .iter()
            .rev()
            .filter(|c| {
                query
                    .citizen_id
                    .as_deref()
                    .map_or(true, |id| c.citizen_id == id)
            })
            .filter(|c| query.department.map_or(true, |d| c.analysis.department == d))
            .filter(|c| query.resolved.map_or(true, |r| c.status.is_resolved() == r))
            .cloned()
            .collect();

        match query.sort {
            ComplaintSort::Newest => matches.sort_by_key(|c| Reverse(c.created_at)),
            ComplaintSort::Priority => matches
                .sort_by_key(|c| (Reverse(c.analysis.escalation_score), Reverse(c.created_at))),
        }
        matches
    }

    /// Mark the complaint behind `docket` resolved with the officer's notes.
    pub fn resolve(&mut self, docket: &str, notes: &str) -> Result<Complaint> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(GrievanceError::InvalidInput(
                "resolution notes must not be empty".into(),
            ));
        }

        let complaint = self
            .complaints
            .iter_mut()
            .find(|c| c.id.matches_docket(docket))
            .ok_or_else(|| GrievanceError::NotFound(format!("complaint {}", docket)))?;

        if complaint.status.is_resolved() {
            return Err(GrievanceError::InvalidInput(format!(
                "complaint {} is already resolved",
                complaint.docket_id
            )));
        }

        complaint.resolve(notes.to_string());
        Ok(complaint.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use grievance_common::types::{ComplaintStatus, Department};
    use grievance_engine::Classifier;

    fn complaint(citizen: &str, text: &str, minutes_ago: i64) -> Complaint {
        let analysis = Classifier::default().analyze(text).unwrap();
        let mut c = Complaint::new(citizen.into(), text.into(), analysis);
        c.created_at = Utc::now() - Duration::minutes(minutes_ago);
        c
    }

    fn seeded() -> ComplaintStore {
        let mut store = ComplaintStore::new();
        store.insert(complaint("user_1", "pothole on the ring road", 120));
        store.insert(complaint("user_2", "live wire fell on the sidewalk, danger", 30));
        store.insert(complaint("user_1", "garbage not collected", 60));
        store.insert(complaint("user_3", "broken road near school", 5));
        store
    }

    #[test]
    fn test_newest_first() {
        let store = seeded();
        let all = store.list(&ComplaintQuery::default());
        let descriptions: Vec<&str> = all.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "broken road near school",
                "live wire fell on the sidewalk, danger",
                "garbage not collected",
                "pothole on the ring road",
            ]
        );
    }

    #[test]
    fn test_priority_order() {
        let store = seeded();
        let queue = store.list(&ComplaintQuery {
            sort: ComplaintSort::Priority,
            ..ComplaintQuery::default()
        });
        let scores: Vec<u8> = queue.iter().map(|c| c.analysis.escalation_score).collect();
        assert_eq!(scores, vec![100, 40, 40, 35]);
        // Equal scores fall back to newest first.
        assert_eq!(queue[1].description, "broken road near school");
    }

    #[test]
    fn test_filters() {
        let store = seeded();

        let mine = store.list(&ComplaintQuery {
            citizen_id: Some("user_1".into()),
            ..ComplaintQuery::default()
        });
        assert_eq!(mine.len(), 2);

        let roads = store.list(&ComplaintQuery {
            department: Some(Department::Roads),
            ..ComplaintQuery::default()
        });
        assert_eq!(roads.len(), 2);
        assert!(roads.iter().all(|c| c.analysis.department == Department::Roads));
    }

    #[test]
    fn test_resolve_moves_to_archive() {
        let mut store = seeded();
        let docket = store.list(&ComplaintQuery::default())[0].docket_id.clone();

        let resolved = store.resolve(&docket.to_lowercase(), "  Patched  ").unwrap();
        assert_eq!(resolved.status, ComplaintStatus::Resolved);
        assert_eq!(resolved.resolution_notes.as_deref(), Some("Patched"));
        assert!(resolved.resolved_at.is_some());

        let open = store.list(&ComplaintQuery {
            resolved: Some(false),
            ..ComplaintQuery::default()
        });
        assert_eq!(open.len(), 3);
        let archive = store.list(&ComplaintQuery {
            resolved: Some(true),
            ..ComplaintQuery::default()
        });
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].docket_id, docket);
    }

    #[test]
    fn test_resolve_errors() {
        let mut store = seeded();
        let docket = store.list(&ComplaintQuery::default())[0].docket_id.clone();

        assert!(matches!(
            store.resolve(&docket, "   "),
            Err(GrievanceError::InvalidInput(_))
        ));
        assert!(matches!(
            store.resolve("00000000", "done"),
            Err(GrievanceError::NotFound(_))
        ));

        store.resolve(&docket, "done").unwrap();
        assert!(matches!(
            store.resolve(&docket, "again"),
            Err(GrievanceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_get_by_docket() {
        let store = seeded();
        let all = store.list(&ComplaintQuery::default());
        let first = &all[0];
        let found = store.get_by_docket(&first.docket_id).unwrap();
        assert_eq!(found.id, first.id);
        assert!(store.get_by_docket("").is_none());
    }
}
