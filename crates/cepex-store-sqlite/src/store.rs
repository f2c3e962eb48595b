//! [`SqliteStore`], the SQLite implementation of [`AcademicStore`].

use std::path::Path;

use cepex_core::{
  family::FamilyTag,
  lifecycle::{self, ApplicationRecord, EnrollmentAction},
  opportunity::{
    AssistantshipPosting, ExtensionProject, Opportunity, ResearchProject,
  },
  store::{AcademicStore, ApplicationQuery},
  user::{Discipline, NewProfessor, NewUser, Professor, User},
};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawApplication, RawOpportunity, RawUser, application_table, encode_date,
    encode_dt, encode_uuid, opportunity_select,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An academic store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is shared.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run one family's joined `SELECT`, optionally narrowed to a single id.
  async fn query_opportunities(
    &self,
    family: FamilyTag,
    id: Option<Uuid>,
  ) -> Result<Vec<Opportunity>> {
    let id_str = id.map(encode_uuid);

    let raws: Vec<RawOpportunity> = self
      .conn
      .call(move |conn| {
        let (select, key, order) = opportunity_select(family);
        let sql = format!(
          "{select}
           WHERE (?1 IS NULL OR {key} = ?1)
           ORDER BY {order}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            RawOpportunity::from_row(family, row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOpportunity::into_opportunity).collect()
  }

  async fn upsert_assistantship(&self, p: AssistantshipPosting) -> Result<()> {
    let id_str = encode_uuid(p.posting_id);
    let professor_str = p.professor_id.map(encode_uuid);
    let discipline_str = p.discipline_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assistantships (
             posting_id, title, description, remote, location, vacancies,
             workload_hours, starts_on, ends_on, enrollment_opens_on,
             enrollment_closes_on, selection, status, professor_id,
             discipline_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15)
           ON CONFLICT (posting_id) DO UPDATE SET
             title                = excluded.title,
             description          = excluded.description,
             remote               = excluded.remote,
             location             = excluded.location,
             vacancies            = excluded.vacancies,
             workload_hours       = excluded.workload_hours,
             starts_on            = excluded.starts_on,
             ends_on              = excluded.ends_on,
             enrollment_opens_on  = excluded.enrollment_opens_on,
             enrollment_closes_on = excluded.enrollment_closes_on,
             selection            = excluded.selection,
             status               = excluded.status,
             professor_id         = excluded.professor_id,
             discipline_id        = excluded.discipline_id",
          rusqlite::params![
            id_str,
            p.title,
            p.description,
            p.remote,
            p.location,
            p.vacancies,
            p.workload_hours,
            encode_date(p.starts_on),
            encode_date(p.ends_on),
            encode_date(p.enrollment_opens_on),
            encode_date(p.enrollment_closes_on),
            p.selection.label(),
            p.status.label(),
            professor_str,
            discipline_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_research(&self, p: ResearchProject) -> Result<()> {
    let id_str = encode_uuid(p.project_id);
    let lead_str = p.lead_researcher_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO research_projects (
             project_id, title, description, starts_on, ends_on, status,
             lead_researcher_id, research_line
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT (project_id) DO UPDATE SET
             title              = excluded.title,
             description        = excluded.description,
             starts_on          = excluded.starts_on,
             ends_on            = excluded.ends_on,
             status             = excluded.status,
             lead_researcher_id = excluded.lead_researcher_id,
             research_line      = excluded.research_line",
          rusqlite::params![
            id_str,
            p.title,
            p.description,
            encode_date(p.starts_on),
            encode_date(p.ends_on),
            p.status.label(),
            lead_str,
            p.research_line,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_extension(&self, p: ExtensionProject) -> Result<()> {
    let id_str = encode_uuid(p.project_id);
    let coordinator_str = p.coordinator_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO extension_projects (
             project_id, title, description, location, target_beneficiaries,
             starts_on, ends_on, status, coordinator_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
           ON CONFLICT (project_id) DO UPDATE SET
             title                = excluded.title,
             description          = excluded.description,
             location             = excluded.location,
             target_beneficiaries = excluded.target_beneficiaries,
             starts_on            = excluded.starts_on,
             ends_on              = excluded.ends_on,
             status               = excluded.status,
             coordinator_id       = excluded.coordinator_id",
          rusqlite::params![
            id_str,
            p.title,
            p.description,
            p.location,
            p.target_beneficiaries,
            encode_date(p.starts_on),
            encode_date(p.ends_on),
            p.status.label(),
            coordinator_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AcademicStore impl ──────────────────────────────────────────────────────

impl AcademicStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      login:      input.login,
      email:      input.email,
      active:     true,
      role:       input.role,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let login    = user.login.clone();
    let email    = user.email.clone();
    let role_str = user.role.label();
    let at_str   = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, login, email, active, role, created_at)
           VALUES (?1, ?2, ?3, 1, ?4, ?5)",
          rusqlite::params![id_str, login, email, role_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM users WHERE user_id = ?1",
                RawUser::COLUMNS
              ),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn add_professor(&self, input: NewProfessor) -> Result<Professor> {
    let professor = Professor {
      professor_id: Uuid::new_v4(),
      user_id:      input.user_id,
      first_name:   input.first_name,
      last_name:    input.last_name,
    };

    let id_str      = encode_uuid(professor.professor_id);
    let user_id_str = encode_uuid(professor.user_id);
    let first       = professor.first_name.clone();
    let last        = professor.last_name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO professors (professor_id, user_id, first_name, last_name)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, user_id_str, first, last],
        )?;
        Ok(())
      })
      .await?;

    Ok(professor)
  }

  async fn add_discipline(&self, name: String) -> Result<Discipline> {
    let discipline = Discipline { discipline_id: Uuid::new_v4(), name };

    let id_str = encode_uuid(discipline.discipline_id);
    let name   = discipline.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO disciplines (discipline_id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(discipline)
  }

  // ── Opportunities ─────────────────────────────────────────────────────────

  async fn get_opportunity(
    &self,
    family: FamilyTag,
    id: Uuid,
  ) -> Result<Option<Opportunity>> {
    Ok(self.query_opportunities(family, Some(id)).await?.into_iter().next())
  }

  async fn list_opportunities(
    &self,
    family: FamilyTag,
  ) -> Result<Vec<Opportunity>> {
    self.query_opportunities(family, None).await
  }

  async fn save_opportunity(
    &self,
    opportunity: Opportunity,
  ) -> Result<Opportunity> {
    let family = opportunity.family();
    let id = opportunity.id();

    match opportunity {
      Opportunity::Assistantship(p) => self.upsert_assistantship(p).await?,
      Opportunity::Research(p) => self.upsert_research(p).await?,
      Opportunity::Extension(p) => self.upsert_extension(p).await?,
    }

    // Re-read so relation labels reflect what is actually stored.
    self.get_opportunity(family, id).await?.ok_or_else(|| {
      Error::Core(cepex_core::Error::OpportunityNotFound { family, id })
    })
  }

  // ── Application records ───────────────────────────────────────────────────

  async fn find_application(
    &self,
    family: FamilyTag,
    opportunity_id: Uuid,
    candidate_id: Uuid,
  ) -> Result<Option<ApplicationRecord>> {
    let table    = application_table(family);
    let opp_str  = encode_uuid(opportunity_id);
    let cand_str = encode_uuid(candidate_id);

    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM {table}
                 WHERE opportunity_id = ?1 AND candidate_id = ?2",
                RawApplication::COLUMNS
              ),
              rusqlite::params![opp_str, cand_str],
              RawApplication::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|r| r.into_record(family)).transpose()
  }

  async fn list_applications(
    &self,
    family: FamilyTag,
    query: ApplicationQuery,
  ) -> Result<Vec<ApplicationRecord>> {
    let table      = application_table(family);
    let opp_str    = query.opportunity_id.map(encode_uuid);
    let cand_str   = query.candidate_id.map(encode_uuid);
    let status_str = query.status.map(|s| s.label());

    let raws: Vec<RawApplication> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM {table}
           WHERE (?1 IS NULL OR opportunity_id = ?1)
             AND (?2 IS NULL OR candidate_id   = ?2)
             AND (?3 IS NULL OR status         = ?3)
           ORDER BY rowid",
          RawApplication::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![opp_str, cand_str, status_str],
            RawApplication::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_record(family)).collect()
  }

  async fn transition_application(
    &self,
    family: FamilyTag,
    action: EnrollmentAction,
    opportunity_id: Uuid,
    candidate_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<ApplicationRecord> {
    let table    = application_table(family);
    let opp_str  = encode_uuid(opportunity_id);
    let cand_str = encode_uuid(candidate_id);

    // The outer result is the database; the inner one is the decision. A
    // refused transition drops the transaction without committing.
    let outcome: Result<ApplicationRecord> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            &format!(
              "SELECT {} FROM {table}
               WHERE opportunity_id = ?1 AND candidate_id = ?2",
              RawApplication::COLUMNS
            ),
            rusqlite::params![opp_str, cand_str],
            RawApplication::from_row,
          )
          .optional()?;
        let existing = match raw.map(|r| r.into_record(family)).transpose() {
          Ok(existing) => existing,
          Err(err) => return Ok(Err(err)),
        };

        let next = match lifecycle::next_record(
          action,
          family,
          opportunity_id,
          candidate_id,
          existing.as_ref(),
          now,
        ) {
          Ok(next) => next,
          Err(err) => return Ok(Err(Error::Core(err))),
        };

        let status_str = next.status.label();
        let at_str = encode_dt(next.applied_at);
        if existing.is_some() {
          tx.execute(
            &format!(
              "UPDATE {table} SET status = ?1, applied_at = ?2
               WHERE application_id = ?3"
            ),
            rusqlite::params![
              status_str,
              at_str,
              encode_uuid(next.application_id)
            ],
          )?;
        } else {
          tx.execute(
            &format!(
              "INSERT INTO {table} ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
              RawApplication::COLUMNS
            ),
            rusqlite::params![
              encode_uuid(next.application_id),
              opp_str,
              cand_str,
              status_str,
              at_str
            ],
          )?;
        }

        tx.commit()?;
        Ok(Ok(next))
      })
      .await?;

    outcome
  }
}
