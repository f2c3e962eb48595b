//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs are
//! hyphenated lowercase strings, and enums are stored as their upper-case
//! labels.

use std::str::FromStr;

use cepex_core::{
  family::FamilyTag,
  lifecycle::{ApplicationRecord, ApplicationStatus},
  opportunity::{
    AssistantshipPosting, AssistantshipStatus, ExtensionProject, Opportunity,
    ProjectStatus, ResearchProject, SelectionType,
  },
  user::{User, UserRole},
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(|d| d.format("%Y-%m-%d").to_string())
}

fn decode_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.map(|s| {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
      .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
  })
  .transpose()
}

/// Parse an enum stored as its label.
fn decode_label<T: FromStr>(what: &str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::Decode(format!("unknown {what}: {s:?}")))
}

// ─── Family tables ───────────────────────────────────────────────────────────

pub fn application_table(family: FamilyTag) -> &'static str {
  match family {
    FamilyTag::Assistantship => "assistantship_applications",
    FamilyTag::Research => "research_applications",
    FamilyTag::Extension => "extension_applications",
  }
}

/// The `SELECT ... FROM ... LEFT JOIN ...` head for one family, plus the
/// qualified key column and the insertion-order column.
pub fn opportunity_select(
  family: FamilyTag,
) -> (&'static str, &'static str, &'static str) {
  match family {
    FamilyTag::Assistantship => {
      (ASSISTANTSHIP_SELECT, "a.posting_id", "a.rowid")
    }
    FamilyTag::Research => (RESEARCH_SELECT, "r.project_id", "r.rowid"),
    FamilyTag::Extension => (EXTENSION_SELECT, "e.project_id", "e.rowid"),
  }
}

const ASSISTANTSHIP_SELECT: &str = "
  SELECT a.posting_id, a.title, a.description, a.remote, a.location,
         a.vacancies, a.workload_hours, a.starts_on, a.ends_on,
         a.enrollment_opens_on, a.enrollment_closes_on, a.selection,
         a.status, a.professor_id, a.discipline_id,
         u.login AS supervisor_login,
         d.name  AS discipline_name,
         p.first_name AS supervisor_first_name
  FROM assistantships a
  LEFT JOIN professors  p ON p.professor_id  = a.professor_id
  LEFT JOIN users       u ON u.user_id       = p.user_id
  LEFT JOIN disciplines d ON d.discipline_id = a.discipline_id";

const RESEARCH_SELECT: &str = "
  SELECT r.project_id, r.title, r.description, r.starts_on, r.ends_on,
         r.status, r.lead_researcher_id, u.login AS lead_researcher_login,
         r.research_line
  FROM research_projects r
  LEFT JOIN users u ON u.user_id = r.lead_researcher_id";

const EXTENSION_SELECT: &str = "
  SELECT e.project_id, e.title, e.description, e.location,
         e.target_beneficiaries, e.starts_on, e.ends_on, e.status,
         e.coordinator_id, u.login AS coordinator_login
  FROM extension_projects e
  LEFT JOIN users u ON u.user_id = e.coordinator_id";

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub login:      String,
  pub email:      String,
  pub active:     bool,
  pub role:       String,
  pub created_at: String,
}

impl RawUser {
  pub const COLUMNS: &'static str =
    "user_id, login, email, active, role, created_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      login:      row.get(1)?,
      email:      row.get(2)?,
      active:     row.get(3)?,
      role:       row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      login:      self.login,
      email:      self.email,
      active:     self.active,
      role:       decode_label::<UserRole>("role", &self.role)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawAssistantship {
  pub posting_id:           String,
  pub title:                String,
  pub description:          Option<String>,
  pub remote:               bool,
  pub location:             Option<String>,
  pub vacancies:            u32,
  pub workload_hours:       u32,
  pub starts_on:            Option<String>,
  pub ends_on:              Option<String>,
  pub enrollment_opens_on:  Option<String>,
  pub enrollment_closes_on: Option<String>,
  pub selection:            String,
  pub status:               String,
  pub professor_id:         Option<String>,
  pub discipline_id:        Option<String>,
  pub supervisor_login:     Option<String>,
  pub discipline_name:      Option<String>,
  pub supervisor_first_name: Option<String>,
}

impl RawAssistantship {
  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      posting_id:           row.get(0)?,
      title:                row.get(1)?,
      description:          row.get(2)?,
      remote:               row.get(3)?,
      location:             row.get(4)?,
      vacancies:            row.get(5)?,
      workload_hours:       row.get(6)?,
      starts_on:            row.get(7)?,
      ends_on:              row.get(8)?,
      enrollment_opens_on:  row.get(9)?,
      enrollment_closes_on: row.get(10)?,
      selection:            row.get(11)?,
      status:               row.get(12)?,
      professor_id:         row.get(13)?,
      discipline_id:        row.get(14)?,
      supervisor_login:     row.get(15)?,
      discipline_name:      row.get(16)?,
      supervisor_first_name: row.get(17)?,
    })
  }

  fn into_posting(self) -> Result<AssistantshipPosting> {
    Ok(AssistantshipPosting {
      posting_id:           decode_uuid(&self.posting_id)?,
      title:                self.title,
      description:          self.description,
      remote:               self.remote,
      location:             self.location,
      vacancies:            self.vacancies,
      workload_hours:       self.workload_hours,
      starts_on:            decode_date(self.starts_on)?,
      ends_on:              decode_date(self.ends_on)?,
      enrollment_opens_on:  decode_date(self.enrollment_opens_on)?,
      enrollment_closes_on: decode_date(self.enrollment_closes_on)?,
      selection:            decode_label::<SelectionType>(
        "selection type",
        &self.selection,
      )?,
      status:               decode_label::<AssistantshipStatus>(
        "assistantship status",
        &self.status,
      )?,
      professor_id:         decode_opt_uuid(self.professor_id)?,
      discipline_id:        decode_opt_uuid(self.discipline_id)?,
      supervisor_login:     self.supervisor_login,
      discipline_name:      self.discipline_name,
      supervisor_first_name: self.supervisor_first_name,
    })
  }
}

pub struct RawResearch {
  pub project_id:            String,
  pub title:                 String,
  pub description:           Option<String>,
  pub starts_on:             Option<String>,
  pub ends_on:               Option<String>,
  pub status:                String,
  pub lead_researcher_id:    Option<String>,
  pub lead_researcher_login: Option<String>,
  pub research_line:         Option<String>,
}

impl RawResearch {
  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      project_id:            row.get(0)?,
      title:                 row.get(1)?,
      description:           row.get(2)?,
      starts_on:             row.get(3)?,
      ends_on:               row.get(4)?,
      status:                row.get(5)?,
      lead_researcher_id:    row.get(6)?,
      lead_researcher_login: row.get(7)?,
      research_line:         row.get(8)?,
    })
  }

  fn into_project(self) -> Result<ResearchProject> {
    Ok(ResearchProject {
      project_id:            decode_uuid(&self.project_id)?,
      title:                 self.title,
      description:           self.description,
      starts_on:             decode_date(self.starts_on)?,
      ends_on:               decode_date(self.ends_on)?,
      status:                decode_label::<ProjectStatus>(
        "project status",
        &self.status,
      )?,
      lead_researcher_id:    decode_opt_uuid(self.lead_researcher_id)?,
      lead_researcher_login: self.lead_researcher_login,
      research_line:         self.research_line,
    })
  }
}

pub struct RawExtension {
  pub project_id:           String,
  pub title:                String,
  pub description:          Option<String>,
  pub location:             Option<String>,
  pub target_beneficiaries: Option<String>,
  pub starts_on:            Option<String>,
  pub ends_on:              Option<String>,
  pub status:               String,
  pub coordinator_id:       Option<String>,
  pub coordinator_login:    Option<String>,
}

impl RawExtension {
  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      project_id:           row.get(0)?,
      title:                row.get(1)?,
      description:          row.get(2)?,
      location:             row.get(3)?,
      target_beneficiaries: row.get(4)?,
      starts_on:            row.get(5)?,
      ends_on:              row.get(6)?,
      status:               row.get(7)?,
      coordinator_id:       row.get(8)?,
      coordinator_login:    row.get(9)?,
    })
  }

  fn into_project(self) -> Result<ExtensionProject> {
    Ok(ExtensionProject {
      project_id:           decode_uuid(&self.project_id)?,
      title:                self.title,
      description:          self.description,
      location:             self.location,
      target_beneficiaries: self.target_beneficiaries,
      starts_on:            decode_date(self.starts_on)?,
      ends_on:              decode_date(self.ends_on)?,
      status:               decode_label::<ProjectStatus>(
        "project status",
        &self.status,
      )?,
      coordinator_id:       decode_opt_uuid(self.coordinator_id)?,
      coordinator_login:    self.coordinator_login,
    })
  }
}

/// One opportunity row of any family, still undecoded.
pub enum RawOpportunity {
  Assistantship(RawAssistantship),
  Research(RawResearch),
  Extension(RawExtension),
}

impl RawOpportunity {
  /// Read a row produced by [`opportunity_select`] for `family`.
  pub fn from_row(family: FamilyTag, row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(match family {
      FamilyTag::Assistantship => {
        Self::Assistantship(RawAssistantship::from_row(row)?)
      }
      FamilyTag::Research => Self::Research(RawResearch::from_row(row)?),
      FamilyTag::Extension => Self::Extension(RawExtension::from_row(row)?),
    })
  }

  pub fn into_opportunity(self) -> Result<Opportunity> {
    Ok(match self {
      Self::Assistantship(raw) => {
        Opportunity::Assistantship(raw.into_posting()?)
      }
      Self::Research(raw) => Opportunity::Research(raw.into_project()?),
      Self::Extension(raw) => Opportunity::Extension(raw.into_project()?),
    })
  }
}

/// Raw strings read directly from an `*_applications` row.
pub struct RawApplication {
  pub application_id: String,
  pub opportunity_id: String,
  pub candidate_id:   String,
  pub status:         String,
  pub applied_at:     String,
}

impl RawApplication {
  pub const COLUMNS: &'static str =
    "application_id, opportunity_id, candidate_id, status, applied_at";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id: row.get(0)?,
      opportunity_id: row.get(1)?,
      candidate_id:   row.get(2)?,
      status:         row.get(3)?,
      applied_at:     row.get(4)?,
    })
  }

  pub fn into_record(self, family: FamilyTag) -> Result<ApplicationRecord> {
    Ok(ApplicationRecord {
      application_id: decode_uuid(&self.application_id)?,
      family,
      opportunity_id: decode_uuid(&self.opportunity_id)?,
      candidate_id: decode_uuid(&self.candidate_id)?,
      status: decode_label::<ApplicationStatus>(
        "application status",
        &self.status,
      )?,
      applied_at: decode_dt(&self.applied_at)?,
    })
  }
}
