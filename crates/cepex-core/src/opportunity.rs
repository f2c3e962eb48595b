//! Opportunity types: the three things a candidate can apply to.
//!
//! Each family has its own status enumeration and its own notion of "awaiting
//! a decision". Relation labels (`supervisor_login`, `discipline_name`, ...)
//! are resolved by the store on read and ignored on write.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::family::FamilyTag;

// ─── Status enumerations ─────────────────────────────────────────────────────

/// Returned when a status string matches no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised status: {0:?}")]
pub struct UnknownStatus(pub String);

/// Lifecycle of an assistantship posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssistantshipStatus {
  Pending,
  Approved,
  Rejected,
  Cancelled,
}

impl AssistantshipStatus {
  pub const fn label(self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::Approved => "APPROVED",
      Self::Rejected => "REJECTED",
      Self::Cancelled => "CANCELLED",
    }
  }
}

impl fmt::Display for AssistantshipStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for AssistantshipStatus {
  type Err = UnknownStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "PENDING" => Ok(Self::Pending),
      "APPROVED" => Ok(Self::Approved),
      "REJECTED" => Ok(Self::Rejected),
      "CANCELLED" => Ok(Self::Cancelled),
      _ => Err(UnknownStatus(s.to_owned())),
    }
  }
}

/// Lifecycle shared by research and extension projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
  Open,
  InReview,
  Completed,
  Cancelled,
}

impl ProjectStatus {
  pub const fn label(self) -> &'static str {
    match self {
      Self::Open => "OPEN",
      Self::InReview => "IN_REVIEW",
      Self::Completed => "COMPLETED",
      Self::Cancelled => "CANCELLED",
    }
  }
}

impl fmt::Display for ProjectStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for ProjectStatus {
  type Err = UnknownStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "OPEN" => Ok(Self::Open),
      "IN_REVIEW" => Ok(Self::InReview),
      "COMPLETED" => Ok(Self::Completed),
      "CANCELLED" => Ok(Self::Cancelled),
      _ => Err(UnknownStatus(s.to_owned())),
    }
  }
}

/// How candidates to an assistantship posting are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionType {
  #[default]
  Interview,
  TranscriptReview,
  InterviewAndTranscriptReview,
}

impl SelectionType {
  pub const fn label(self) -> &'static str {
    match self {
      Self::Interview => "INTERVIEW",
      Self::TranscriptReview => "TRANSCRIPT_REVIEW",
      Self::InterviewAndTranscriptReview => "INTERVIEW_AND_TRANSCRIPT_REVIEW",
    }
  }
}

impl FromStr for SelectionType {
  type Err = UnknownStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "INTERVIEW" => Ok(Self::Interview),
      "TRANSCRIPT_REVIEW" => Ok(Self::TranscriptReview),
      "INTERVIEW_AND_TRANSCRIPT_REVIEW" => {
        Ok(Self::InterviewAndTranscriptReview)
      }
      _ => Err(UnknownStatus(s.to_owned())),
    }
  }
}

// ─── Families ────────────────────────────────────────────────────────────────

/// A teaching-assistantship ("monitoria") posting offered by a professor for
/// one discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantshipPosting {
  pub posting_id:           Uuid,
  pub title:                String,
  pub description:          Option<String>,
  pub remote:               bool,
  pub location:             Option<String>,
  pub vacancies:            u32,
  pub workload_hours:       u32,
  pub starts_on:            Option<NaiveDate>,
  pub ends_on:              Option<NaiveDate>,
  pub enrollment_opens_on:  Option<NaiveDate>,
  pub enrollment_closes_on: Option<NaiveDate>,
  pub selection:            SelectionType,
  pub status:               AssistantshipStatus,
  pub professor_id:         Option<Uuid>,
  pub discipline_id:        Option<Uuid>,
  /// Login of the supervising professor's user account.
  #[serde(default)]
  pub supervisor_login:     Option<String>,
  #[serde(default)]
  pub discipline_name:      Option<String>,
  #[serde(default)]
  pub supervisor_first_name: Option<String>,
}

impl AssistantshipPosting {
  /// A fresh posting awaiting review, with every optional field empty.
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      posting_id:           Uuid::new_v4(),
      title:                title.into(),
      description:          None,
      remote:               false,
      location:             None,
      vacancies:            1,
      workload_hours:       0,
      starts_on:            None,
      ends_on:              None,
      enrollment_opens_on:  None,
      enrollment_closes_on: None,
      selection:            SelectionType::default(),
      status:               AssistantshipStatus::Pending,
      professor_id:         None,
      discipline_id:        None,
      supervisor_login:     None,
      discipline_name:      None,
      supervisor_first_name: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProject {
  pub project_id:            Uuid,
  pub title:                 String,
  pub description:           Option<String>,
  pub starts_on:             Option<NaiveDate>,
  pub ends_on:               Option<NaiveDate>,
  pub status:                ProjectStatus,
  pub lead_researcher_id:    Option<Uuid>,
  #[serde(default)]
  pub lead_researcher_login: Option<String>,
  pub research_line:         Option<String>,
}

impl ResearchProject {
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      project_id:            Uuid::new_v4(),
      title:                 title.into(),
      description:           None,
      starts_on:             None,
      ends_on:               None,
      status:                ProjectStatus::Open,
      lead_researcher_id:    None,
      lead_researcher_login: None,
      research_line:         None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionProject {
  pub project_id:           Uuid,
  pub title:                String,
  pub description:          Option<String>,
  pub location:             Option<String>,
  pub target_beneficiaries: Option<String>,
  pub starts_on:            Option<NaiveDate>,
  pub ends_on:              Option<NaiveDate>,
  pub status:               ProjectStatus,
  pub coordinator_id:       Option<Uuid>,
  #[serde(default)]
  pub coordinator_login:    Option<String>,
}

impl ExtensionProject {
  pub fn new(title: impl Into<String>) -> Self {
    Self {
      project_id:           Uuid::new_v4(),
      title:                title.into(),
      description:          None,
      location:             None,
      target_beneficiaries: None,
      starts_on:            None,
      ends_on:              None,
      status:               ProjectStatus::Open,
      coordinator_id:       None,
      coordinator_login:    None,
    }
  }
}

// ─── Family-erased ───────────────────────────────────────────────────────────

/// Any opportunity, as passed across the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Opportunity {
  Assistantship(AssistantshipPosting),
  Research(ResearchProject),
  Extension(ExtensionProject),
}

impl Opportunity {
  pub fn family(&self) -> FamilyTag {
    match self {
      Self::Assistantship(_) => FamilyTag::Assistantship,
      Self::Research(_) => FamilyTag::Research,
      Self::Extension(_) => FamilyTag::Extension,
    }
  }

  pub fn id(&self) -> Uuid {
    match self {
      Self::Assistantship(p) => p.posting_id,
      Self::Research(p) => p.project_id,
      Self::Extension(p) => p.project_id,
    }
  }

  pub fn title(&self) -> &str {
    match self {
      Self::Assistantship(p) => &p.title,
      Self::Research(p) => &p.title,
      Self::Extension(p) => &p.title,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn project_status_accepts_lowercase() {
    assert_eq!("in_review".parse::<ProjectStatus>(), Ok(ProjectStatus::InReview));
    assert_eq!(
      "cancelled".parse::<AssistantshipStatus>(),
      Ok(AssistantshipStatus::Cancelled)
    );
  }

  #[test]
  fn status_serialises_screaming() {
    let json = serde_json::to_string(&ProjectStatus::InReview).unwrap();
    assert_eq!(json, "\"IN_REVIEW\"");
  }

  #[test]
  fn unknown_status_is_rejected() {
    assert!("OPEN".parse::<AssistantshipStatus>().is_err());
    assert!("PENDING".parse::<ProjectStatus>().is_err());
  }
}
