//! Service tests against an in-memory `AcademicStore`.


use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  opportunity::{
    AssistantshipPosting, AssistantshipStatus, ExtensionProject, Opportunity,
    ProjectStatus, ResearchProject,
  },
  store::AcademicStore,
  user::{Caller, NewUser, User, UserRole},
};

pub(crate) use memory::MemoryStore;

fn store() -> Arc<MemoryStore> { Arc::new(MemoryStore::default()) }

async fn user(store: &MemoryStore, login: &str, role: UserRole) -> User {
  store
    .add_user(NewUser {
      login: login.into(),
      email: format!("{login}@example.edu"),
      role,
    })
    .await
    .unwrap()
}

fn caller(user: &User) -> Caller { Caller::new(user.user_id, user.role) }

fn reviewer() -> Caller { Caller::new(Uuid::new_v4(), UserRole::Coordination) }

async fn posting(
  store: &MemoryStore,
  title: &str,
  status: AssistantshipStatus,
) -> AssistantshipPosting {
  let mut p = AssistantshipPosting::new(title);
  p.status = status;
  p.supervisor_login = Some("prof.silva".into());
  p.discipline_name = Some("Algorithms".into());
  p.supervisor_first_name = Some("Maria".into());
  p.starts_on = NaiveDate::from_ymd_opt(2025, 3, 1);
  match store.save_opportunity(Opportunity::Assistantship(p)).await.unwrap() {
    Opportunity::Assistantship(p) => p,
    other => panic!("unexpected {other:?}"),
  }
}

async fn research(
  store: &MemoryStore,
  title: &str,
  status: ProjectStatus,
) -> ResearchProject {
  let mut p = ResearchProject::new(title);
  p.status = status;
  p.lead_researcher_login = Some("dr.costa".into());
  p.research_line = Some("Machine learning".into());
  match store.save_opportunity(Opportunity::Research(p)).await.unwrap() {
    Opportunity::Research(p) => p,
    other => panic!("unexpected {other:?}"),
  }
}

async fn extension(
  store: &MemoryStore,
  title: &str,
  status: ProjectStatus,
) -> ExtensionProject {
  let mut p = ExtensionProject::new(title);
  p.status = status;
  match store.save_opportunity(Opportunity::Extension(p)).await.unwrap() {
    Opportunity::Extension(p) => p,
    other => panic!("unexpected {other:?}"),
  }
}
