//! Demo data for a fresh store.

use anyhow::Context as _;
use cepex_core::{
  family::FamilyTag,
  opportunity::{
    AssistantshipPosting, ExtensionProject, Opportunity, ResearchProject,
    SelectionType,
  },
  store::AcademicStore,
  user::{NewProfessor, NewUser, UserRole},
};
use cepex_store_sqlite::SqliteStore;
use chrono::NaiveDate;
use tracing::info;

/// Seed users, one professor, one discipline and one opportunity per family.
/// Does nothing if any assistantship already exists.
pub async fn seed_demo(store: &SqliteStore) -> anyhow::Result<()> {
  let existing = store
    .list_opportunities(FamilyTag::Assistantship)
    .await
    .context("failed to inspect store")?;
  if !existing.is_empty() {
    info!("store already populated, skipping demo seed");
    return Ok(());
  }

  let mut users = Vec::new();
  for (login, role) in [
    ("admin", UserRole::Admin),
    ("secretaria", UserRole::Secretary),
    ("prof.silva", UserRole::Professor),
    ("ana", UserRole::Student),
  ] {
    let user = store
      .add_user(NewUser {
        login: login.into(),
        email: format!("{login}@cepex.example.edu"),
        role,
      })
      .await
      .with_context(|| format!("failed to seed user {login}"))?;
    info!(%user.user_id, login, %role, "seeded user");
    users.push(user);
  }

  let professor_user = &users[2];
  let professor = store
    .add_professor(NewProfessor {
      user_id:    professor_user.user_id,
      first_name: "Maria".into(),
      last_name:  "Silva".into(),
    })
    .await
    .context("failed to seed professor")?;
  let discipline = store
    .add_discipline("Algorithms".into())
    .await
    .context("failed to seed discipline")?;

  let mut posting = AssistantshipPosting::new("Algorithms teaching assistant");
  posting.professor_id = Some(professor.professor_id);
  posting.discipline_id = Some(discipline.discipline_id);
  posting.vacancies = 2;
  posting.workload_hours = 12;
  posting.selection = SelectionType::InterviewAndTranscriptReview;
  posting.starts_on = NaiveDate::from_ymd_opt(2025, 3, 1);

  let mut research = ResearchProject::new("Graph mining for course analytics");
  research.lead_researcher_id = Some(professor_user.user_id);
  research.research_line = Some("Data science".into());

  let mut extension = ExtensionProject::new("Programming for high schoolers");
  extension.coordinator_id = Some(professor_user.user_id);
  extension.location = Some("Campus library".into());

  for opportunity in [
    Opportunity::Assistantship(posting),
    Opportunity::Research(research),
    Opportunity::Extension(extension),
  ] {
    let saved = store
      .save_opportunity(opportunity)
      .await
      .context("failed to seed opportunity")?;
    info!(
      family = %saved.family(),
      id = %saved.id(),
      title = saved.title(),
      "seeded opportunity"
    );
  }
  Ok(())
}
