//! Record types for the four tables of the dashboard store.
//!
//! Every type implements [`Record`] with a static field list. Enumerated
//! columns are modelled as Rust enums whose canonical text form
//! (lowercase, hyphenated) is what gets stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::{FieldSpec, FieldValue, Row, normalize_choice};
use crate::record::{
    Record, optional_integer, optional_real, optional_text, required_choice, required_text,
};
use crate::validate::{Result, ValidationError};

/// Role given to accounts created without an explicit one.
pub const DEFAULT_ROLE: &str = "user";

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident for $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in ascending order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical stored forms, in the same order as [`Self::ALL`].
            pub const CHOICES: &'static [&'static str] = &[$($text),+];

            /// Canonical stored form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match normalize_choice(s).as_str() {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(ValidationError::InvalidChoice {
                        field: $field.to_string(),
                        value: s.to_string(),
                        allowed: Self::CHOICES.join(", "),
                    }),
                }
            }
        }

        impl From<$name> for FieldValue {
            fn from(value: $name) -> Self {
                FieldValue::Text(value.as_str().to_string())
            }
        }
    };
}

choice_enum! {
    /// How bad a security incident is.
    Severity for "severity" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

choice_enum! {
    /// Lifecycle state of a security incident.
    IncidentStatus for "status" {
        Open => "open",
        InProgress => "in-progress",
        Closed => "closed",
    }
}

choice_enum! {
    /// Sensitivity label of a dataset.
    Classification for "classification" {
        Public => "public",
        Internal => "internal",
        Confidential => "confidential",
        Restricted => "restricted",
    }
}

choice_enum! {
    /// Urgency of an IT ticket.
    Priority for "priority" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

choice_enum! {
    /// Lifecycle state of an IT ticket.
    TicketStatus for "status" {
        Open => "open",
        InProgress => "in-progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A dashboard account.
///
/// The password is only ever held as an Argon2 PHC string; it is skipped
/// when the user is serialized for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("username").required(),
    FieldSpec::text("password_hash").required(),
    FieldSpec::text("role").required(),
    FieldSpec::text("created_at").required(),
];

impl Record for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn primary_key_field() -> &'static str {
        "username"
    }

    fn field_list() -> &'static [FieldSpec] {
        USER_FIELDS
    }

    fn key(&self) -> &str {
        &self.username
    }

    fn to_row(&self) -> Row {
        Row::from([
            ("username".to_string(), self.username.as_str().into()),
            ("password_hash".to_string(), self.password_hash.as_str().into()),
            ("role".to_string(), self.role.as_str().into()),
            ("created_at".to_string(), self.created_at.as_str().into()),
        ])
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            username: required_text::<Self>(row, "username")?,
            password_hash: required_text::<Self>(row, "password_hash")?,
            role: required_text::<Self>(row, "role")?,
            created_at: required_text::<Self>(row, "created_at")?,
        })
    }
}

// ---------------------------------------------------------------------------
// incidents
// ---------------------------------------------------------------------------

/// A reported security incident.
///
/// # Examples
///
/// ```
/// use dashboard_core::*;
///
/// let incident = Incident::new("INC-1", "Credential stuffing", "Brute force", Severity::High, "2024-05-01")
///     .with_assignee("soc-team");
/// assert_eq!(incident.status, IncidentStatus::Open);
/// assert_eq!(incident.assigned_to.as_deref(), Some("soc-team"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub title: String,
    pub category: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub created_at: String,
    pub assigned_to: Option<String>,
    pub resolved_at: Option<String>,
    pub description: Option<String>,
}

impl Incident {
    /// Creates an open incident with no assignee.
    pub fn new(
        incident_id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            incident_id: incident_id.into(),
            title: title.into(),
            category: category.into(),
            severity,
            status: IncidentStatus::Open,
            created_at: created_at.into(),
            assigned_to: None,
            resolved_at: None,
            description: None,
        }
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

const INCIDENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("incident_id").required(),
    FieldSpec::text("title").required(),
    FieldSpec::text("category").required(),
    FieldSpec::choice("severity", Severity::CHOICES).required(),
    FieldSpec::choice("status", IncidentStatus::CHOICES).required(),
    FieldSpec::text("created_at").required(),
    FieldSpec::text("assigned_to"),
    FieldSpec::text("resolved_at"),
    FieldSpec::text("description"),
];

impl Record for Incident {
    fn table_name() -> &'static str {
        "incidents"
    }

    fn primary_key_field() -> &'static str {
        "incident_id"
    }

    fn field_list() -> &'static [FieldSpec] {
        INCIDENT_FIELDS
    }

    fn key(&self) -> &str {
        &self.incident_id
    }

    fn to_row(&self) -> Row {
        Row::from([
            ("incident_id".to_string(), self.incident_id.as_str().into()),
            ("title".to_string(), self.title.as_str().into()),
            ("category".to_string(), self.category.as_str().into()),
            ("severity".to_string(), self.severity.into()),
            ("status".to_string(), self.status.into()),
            ("created_at".to_string(), self.created_at.as_str().into()),
            ("assigned_to".to_string(), self.assigned_to.clone().into()),
            ("resolved_at".to_string(), self.resolved_at.clone().into()),
            ("description".to_string(), self.description.clone().into()),
        ])
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            incident_id: required_text::<Self>(row, "incident_id")?,
            title: required_text::<Self>(row, "title")?,
            category: required_text::<Self>(row, "category")?,
            severity: required_choice::<Self, _>(row, "severity")?,
            status: required_choice::<Self, _>(row, "status")?,
            created_at: required_text::<Self>(row, "created_at")?,
            assigned_to: optional_text(row, "assigned_to")?,
            resolved_at: optional_text(row, "resolved_at")?,
            description: optional_text(row, "description")?,
        })
    }
}

// ---------------------------------------------------------------------------
// datasets
// ---------------------------------------------------------------------------

/// Metadata describing a dataset held by the organisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_id: String,
    pub name: String,
    pub owner: String,
    pub classification: Classification,
    pub description: Option<String>,
    pub source_system: Option<String>,
    pub size_mb: Option<f64>,
    pub row_count: Option<i64>,
    pub created_at: Option<String>,
}

impl Dataset {
    pub fn new(
        dataset_id: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        classification: Classification,
    ) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            name: name.into(),
            owner: owner.into(),
            classification,
            description: None,
            source_system: None,
            size_mb: None,
            row_count: None,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets size in megabytes and number of rows.
    pub fn with_size(mut self, size_mb: f64, row_count: i64) -> Self {
        self.size_mb = Some(size_mb);
        self.row_count = Some(row_count);
        self
    }
}

const DATASET_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("dataset_id").required(),
    FieldSpec::text("name").required(),
    FieldSpec::text("owner").required(),
    FieldSpec::choice("classification", Classification::CHOICES).required(),
    FieldSpec::text("description"),
    FieldSpec::text("source_system"),
    FieldSpec::real("size_mb"),
    FieldSpec::integer("row_count"),
    FieldSpec::text("created_at"),
];

impl Record for Dataset {
    fn table_name() -> &'static str {
        "datasets"
    }

    fn primary_key_field() -> &'static str {
        "dataset_id"
    }

    fn field_list() -> &'static [FieldSpec] {
        DATASET_FIELDS
    }

    fn key(&self) -> &str {
        &self.dataset_id
    }

    fn to_row(&self) -> Row {
        Row::from([
            ("dataset_id".to_string(), self.dataset_id.as_str().into()),
            ("name".to_string(), self.name.as_str().into()),
            ("owner".to_string(), self.owner.as_str().into()),
            ("classification".to_string(), self.classification.into()),
            ("description".to_string(), self.description.clone().into()),
            ("source_system".to_string(), self.source_system.clone().into()),
            ("size_mb".to_string(), self.size_mb.into()),
            ("row_count".to_string(), self.row_count.into()),
            ("created_at".to_string(), self.created_at.clone().into()),
        ])
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            dataset_id: required_text::<Self>(row, "dataset_id")?,
            name: required_text::<Self>(row, "name")?,
            owner: required_text::<Self>(row, "owner")?,
            classification: required_choice::<Self, _>(row, "classification")?,
            description: optional_text(row, "description")?,
            source_system: optional_text(row, "source_system")?,
            size_mb: optional_real(row, "size_mb")?,
            row_count: optional_integer(row, "row_count")?,
            created_at: optional_text(row, "created_at")?,
        })
    }
}

// ---------------------------------------------------------------------------
// tickets
// ---------------------------------------------------------------------------

/// An IT support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub title: String,
    pub priority: Priority,
    pub category: String,
    pub status: TicketStatus,
    pub created_at: String,
    pub assigned_to: Option<String>,
    pub closed_at: Option<String>,
}

impl Ticket {
    /// Creates an open, unassigned ticket.
    pub fn new(
        ticket_id: impl Into<String>,
        title: impl Into<String>,
        priority: Priority,
        category: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            title: title.into(),
            priority,
            category: category.into(),
            status: TicketStatus::Open,
            created_at: created_at.into(),
            assigned_to: None,
            closed_at: None,
        }
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }
}

const TICKET_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("ticket_id").required(),
    FieldSpec::text("title").required(),
    FieldSpec::choice("priority", Priority::CHOICES).required(),
    FieldSpec::text("category").required(),
    FieldSpec::choice("status", TicketStatus::CHOICES).required(),
    FieldSpec::text("created_at").required(),
    FieldSpec::text("assigned_to"),
    FieldSpec::text("closed_at"),
];

impl Record for Ticket {
    fn table_name() -> &'static str {
        "tickets"
    }

    fn primary_key_field() -> &'static str {
        "ticket_id"
    }

    fn field_list() -> &'static [FieldSpec] {
        TICKET_FIELDS
    }

    fn key(&self) -> &str {
        &self.ticket_id
    }

    fn to_row(&self) -> Row {
        Row::from([
            ("ticket_id".to_string(), self.ticket_id.as_str().into()),
            ("title".to_string(), self.title.as_str().into()),
            ("priority".to_string(), self.priority.into()),
            ("category".to_string(), self.category.as_str().into()),
            ("status".to_string(), self.status.into()),
            ("created_at".to_string(), self.created_at.as_str().into()),
            ("assigned_to".to_string(), self.assigned_to.clone().into()),
            ("closed_at".to_string(), self.closed_at.clone().into()),
        ])
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            ticket_id: required_text::<Self>(row, "ticket_id")?,
            title: required_text::<Self>(row, "title")?,
            priority: required_choice::<Self, _>(row, "priority")?,
            category: required_text::<Self>(row, "category")?,
            status: required_choice::<Self, _>(row, "status")?,
            created_at: required_text::<Self>(row, "created_at")?,
            assigned_to: optional_text(row, "assigned_to")?,
            closed_at: optional_text(row, "closed_at")?,
        })
    }
}
