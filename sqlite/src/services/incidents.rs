use std::collections::BTreeMap;

use dashboard_core::{Incident, IncidentStatus, Row, Severity};

use super::change;
use crate::connection::ConnectionProvider;
use crate::crud::Crud;
use crate::error::Result;

/// Security incident operations.
pub struct IncidentService<'p> {
    crud: Crud<'p, Incident>,
}

impl<'p> IncidentService<'p> {
    /// Service over the `incidents` table.
    pub fn new(provider: &'p ConnectionProvider) -> Self {
        Self {
            crud: Crud::new(provider),
        }
    }

    /// Records a new incident.
    pub fn create(&self, incident: &Incident) -> Result<()> {
        self.crud.insert(incident)
    }

    /// The incident with `incident_id`, if any.
    pub fn get(&self, incident_id: &str) -> Result<Option<Incident>> {
        self.crud.fetch_by_id(incident_id)
    }

    /// All incidents, ordered by id.
    pub fn list(&self) -> Result<Vec<Incident>> {
        self.crud.fetch_all()
    }

    /// Incidents in the given status.
    pub fn list_by_status(&self, status: IncidentStatus) -> Result<Vec<Incident>> {
        self.list_where(|i| i.status == status)
    }

    /// Incidents with the given severity.
    pub fn list_by_severity(&self, severity: Severity) -> Result<Vec<Incident>> {
        self.list_where(|i| i.severity == severity)
    }

    /// Incidents that are not closed.
    pub fn list_open(&self) -> Result<Vec<Incident>> {
        self.list_where(|i| i.status != IncidentStatus::Closed)
    }

    /// Moves an incident to `status`.
    pub fn update_status(&self, incident_id: &str, status: IncidentStatus) -> Result<Incident> {
        self.crud.update(incident_id, change("status", status))
    }

    /// Changes the severity of an incident.
    pub fn update_severity(&self, incident_id: &str, severity: Severity) -> Result<Incident> {
        self.crud.update(incident_id, change("severity", severity))
    }

    /// Applies an arbitrary partial update.
    pub fn update(&self, incident_id: &str, changes: Row) -> Result<Incident> {
        self.crud.update(incident_id, changes)
    }

    /// Returns whether the incident existed.
    pub fn delete(&self, incident_id: &str) -> Result<bool> {
        self.crud.delete(incident_id)
    }

    /// Number of incidents per severity, including severities with none.
    pub fn severity_breakdown(&self) -> Result<BTreeMap<Severity, usize>> {
        let mut counts: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|s| (*s, 0)).collect();
        for incident in self.list()? {
            *counts.entry(incident.severity).or_default() += 1;
        }
        Ok(counts)
    }

    fn list_where(&self, keep: impl Fn(&Incident) -> bool) -> Result<Vec<Incident>> {
        Ok(self.list()?.into_iter().filter(|i| keep(i)).collect())
    }
}
