//! Opportunity families and the capability interface shared by all three.
//!
//! Assistantship postings, research projects, and extension projects are
//! stored separately and carry different descriptive fields. The lifecycle
//! and approval services are written once, generic over a [`Family`] marker,
//! and reach the concrete opportunity only through [`OpportunityRecord`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  opportunity::{
    AssistantshipPosting, AssistantshipStatus, ExtensionProject, Opportunity,
    ProjectStatus, ResearchProject,
  },
};

// ─── Tag ─────────────────────────────────────────────────────────────────────

/// The closed set of opportunity families. This is the only polymorphism the
/// approval boundary accepts: callers pass back the tag they received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyTag {
  Assistantship,
  Research,
  Extension,
}

impl FamilyTag {
  /// Queue order: assistantships first, then research, then extension.
  pub const ALL: [FamilyTag; 3] =
    [Self::Assistantship, Self::Research, Self::Extension];

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Assistantship => "ASSISTANTSHIP",
      Self::Research => "RESEARCH",
      Self::Extension => "EXTENSION",
    }
  }
}

impl fmt::Display for FamilyTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for FamilyTag {
  type Err = Error;

  /// Case-insensitive. The legacy tags `MONITORIA`, `PESQUISA` and `EXTENSAO`
  /// are still sent by older front-ends and map onto the same families.
  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_uppercase().as_str() {
      "ASSISTANTSHIP" | "MONITORIA" => Ok(Self::Assistantship),
      "RESEARCH" | "PESQUISA" => Ok(Self::Research),
      "EXTENSION" | "EXTENSAO" => Ok(Self::Extension),
      _ => Err(Error::UnknownFamily(s.to_owned())),
    }
  }
}

// ─── Capability interface ────────────────────────────────────────────────────

/// What the generic services need from a concrete opportunity.
pub trait OpportunityRecord: Clone + fmt::Debug + Send + Sync + 'static {
  type Status: Copy
    + Eq
    + fmt::Debug
    + fmt::Display
    + FromStr
    + Send
    + Sync
    + 'static;

  fn id(&self) -> Uuid;
  fn title(&self) -> &str;
  fn status(&self) -> Self::Status;
  fn set_status(&mut self, status: Self::Status);

  /// Whether a reviewer still has to approve or reject this opportunity.
  fn awaiting_decision(&self) -> bool;
}

/// Type-level marker for one opportunity family.
pub trait Family: Send + Sync + 'static {
  const TAG: FamilyTag;

  type Opportunity: OpportunityRecord;

  fn wrap(opportunity: Self::Opportunity) -> Opportunity;

  /// Narrow a family-erased opportunity returned by the store.
  fn narrow(opportunity: Opportunity) -> Result<Self::Opportunity>;
}

fn mismatch(expected: FamilyTag, found: &Opportunity) -> Error {
  Error::FamilyMismatch { expected, found: found.family() }
}

// ─── Markers ─────────────────────────────────────────────────────────────────

/// Teaching-assistantship postings.
#[derive(Debug, Clone, Copy)]
pub enum Assistantship {}

/// Research projects.
#[derive(Debug, Clone, Copy)]
pub enum Research {}

/// Extension projects.
#[derive(Debug, Clone, Copy)]
pub enum Extension {}

impl Family for Assistantship {
  const TAG: FamilyTag = FamilyTag::Assistantship;

  type Opportunity = AssistantshipPosting;

  fn wrap(opportunity: AssistantshipPosting) -> Opportunity {
    Opportunity::Assistantship(opportunity)
  }

  fn narrow(opportunity: Opportunity) -> Result<AssistantshipPosting> {
    match opportunity {
      Opportunity::Assistantship(posting) => Ok(posting),
      other => Err(mismatch(Self::TAG, &other)),
    }
  }
}

impl Family for Research {
  const TAG: FamilyTag = FamilyTag::Research;

  type Opportunity = ResearchProject;

  fn wrap(opportunity: ResearchProject) -> Opportunity {
    Opportunity::Research(opportunity)
  }

  fn narrow(opportunity: Opportunity) -> Result<ResearchProject> {
    match opportunity {
      Opportunity::Research(project) => Ok(project),
      other => Err(mismatch(Self::TAG, &other)),
    }
  }
}

impl Family for Extension {
  const TAG: FamilyTag = FamilyTag::Extension;

  type Opportunity = ExtensionProject;

  fn wrap(opportunity: ExtensionProject) -> Opportunity {
    Opportunity::Extension(opportunity)
  }

  fn narrow(opportunity: Opportunity) -> Result<ExtensionProject> {
    match opportunity {
      Opportunity::Extension(project) => Ok(project),
      other => Err(mismatch(Self::TAG, &other)),
    }
  }
}

// ─── OpportunityRecord impls ─────────────────────────────────────────────────

impl OpportunityRecord for AssistantshipPosting {
  type Status = AssistantshipStatus;

  fn id(&self) -> Uuid { self.posting_id }

  fn title(&self) -> &str { &self.title }

  fn status(&self) -> AssistantshipStatus { self.status }

  fn set_status(&mut self, status: AssistantshipStatus) { self.status = status; }

  fn awaiting_decision(&self) -> bool {
    self.status == AssistantshipStatus::Pending
  }
}

impl OpportunityRecord for ResearchProject {
  type Status = ProjectStatus;

  fn id(&self) -> Uuid { self.project_id }

  fn title(&self) -> &str { &self.title }

  fn status(&self) -> ProjectStatus { self.status }

  fn set_status(&mut self, status: ProjectStatus) { self.status = status; }

  fn awaiting_decision(&self) -> bool { self.status == ProjectStatus::Open }
}

impl OpportunityRecord for ExtensionProject {
  type Status = ProjectStatus;

  fn id(&self) -> Uuid { self.project_id }

  fn title(&self) -> &str { &self.title }

  fn status(&self) -> ProjectStatus { self.status }

  fn set_status(&mut self, status: ProjectStatus) { self.status = status; }

  fn awaiting_decision(&self) -> bool { self.status == ProjectStatus::Open }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tag_parsing_is_case_insensitive() {
    assert_eq!(
      "assistantship".parse::<FamilyTag>().unwrap(),
      FamilyTag::Assistantship
    );
    assert_eq!(" Research ".parse::<FamilyTag>().unwrap(), FamilyTag::Research);
    assert_eq!("EXTENSION".parse::<FamilyTag>().unwrap(), FamilyTag::Extension);
  }

  #[test]
  fn legacy_tags_are_accepted() {
    assert_eq!(
      "monitoria".parse::<FamilyTag>().unwrap(),
      FamilyTag::Assistantship
    );
    assert_eq!("PESQUISA".parse::<FamilyTag>().unwrap(), FamilyTag::Research);
    assert_eq!("Extensao".parse::<FamilyTag>().unwrap(), FamilyTag::Extension);
  }

  #[test]
  fn unknown_tag_is_invalid_argument() {
    let err = "PROJECT".parse::<FamilyTag>().unwrap_err();
    assert!(matches!(err, Error::UnknownFamily(ref s) if s == "PROJECT"));
    assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
  }

  #[test]
  fn narrow_keeps_matching_family() {
    let project = ResearchProject::new("Graph mining");
    let narrowed = Research::narrow(Research::wrap(project.clone())).unwrap();
    assert_eq!(narrowed, project);
  }

  #[test]
  fn narrow_reports_family_mismatch() {
    let wrapped = Extension::wrap(ExtensionProject::new("Food bank"));
    let err = Research::narrow(wrapped).unwrap_err();
    assert!(matches!(
      err,
      Error::FamilyMismatch {
        expected: FamilyTag::Research,
        found:    FamilyTag::Extension,
      }
    ));
    assert_eq!(err.kind(), crate::ErrorKind::Internal);
  }
}
