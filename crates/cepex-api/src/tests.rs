//! Router tests driven through `tower::ServiceExt::oneshot` against an
//! in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use cepex_core::{
  opportunity::{
    AssistantshipPosting, AssistantshipStatus, ExtensionProject, Opportunity,
    ResearchProject,
  },
  store::AcademicStore,
  user::{Caller, NewUser, User, UserRole},
};
use cepex_store_sqlite::SqliteStore;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  api_router,
  caller::{USER_ID_HEADER, USER_ROLE_HEADER},
};

// ─── Harness ──────────────────────────────────────────────────────────────────

struct Harness {
  store: Arc<SqliteStore>,
}

impl Harness {
  async fn new() -> Self {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");
    Self { store: Arc::new(store) }
  }

  fn app(&self) -> Router { api_router(self.store.clone()) }

  async fn user(&self, login: &str, role: UserRole) -> User {
    self
      .store
      .add_user(NewUser {
        login: login.into(),
        email: format!("{login}@example.edu"),
        role,
      })
      .await
      .unwrap()
  }

  async fn save(&self, opportunity: Opportunity) -> Uuid {
    self.store.save_opportunity(opportunity).await.unwrap().id()
  }

  async fn send(
    &self,
    method: &str,
    uri: &str,
    caller: Option<Caller>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
      builder = builder
        .header(USER_ID_HEADER, caller.user_id.to_string())
        .header(USER_ROLE_HEADER, caller.role.label());
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };

    let resp = self.app().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }
}

fn as_caller(user: &User) -> Caller { Caller::new(user.user_id, user.role) }

fn secretary() -> Caller { Caller::new(Uuid::new_v4(), UserRole::Secretary) }

// ─── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_caller_headers_are_401() {
  let h = Harness::new().await;
  let (status, body) = h.send("GET", "/approvals/pending", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["kind"], "unauthorized");
}

#[tokio::test]
async fn unknown_family_is_400() {
  let h = Harness::new().await;
  let (status, body) = h
    .send("GET", "/opportunities/sabbatical", Some(secretary()), None)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "invalid_argument");
}

// ─── Enrollment ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_status_cancel_round() {
  let h = Harness::new().await;
  let ana = h.user("ana", UserRole::Student).await;
  let id = h.save(Opportunity::Research(ResearchProject::new("Graphs"))).await;
  let me = Some(as_caller(&ana));
  let base = format!("/opportunities/research/{id}/enrollment");

  let (status, record) = h.send("POST", &base, me, None).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(record["status"], "PENDING");
  assert_eq!(record["family"], "RESEARCH");
  assert_eq!(record["candidate_id"], ana.user_id.to_string());

  let (status, body) = h.send("POST", &base, me, None).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "conflict");

  let status_uri = format!("{base}/status");
  let (_, active) = h.send("GET", &status_uri, me, None).await;
  assert_eq!(active, json!(true));

  let (status, body) = h.send("DELETE", &base, me, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);

  let (_, active) = h.send("GET", &status_uri, me, None).await;
  assert_eq!(active, json!(false));

  let (status, _) = h.send("DELETE", &base, me, None).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn apply_to_missing_opportunity_is_404() {
  let h = Harness::new().await;
  let ana = h.user("ana", UserRole::Student).await;
  let uri = format!("/opportunities/extension/{}/enrollment", Uuid::new_v4());
  let (status, body) =
    h.send("POST", &uri, Some(as_caller(&ana)), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn student_cannot_apply_for_someone_else() {
  let h = Harness::new().await;
  let ana = h.user("ana", UserRole::Student).await;
  let bia = h.user("bia", UserRole::Student).await;
  let id = h
    .save(Opportunity::Extension(ExtensionProject::new("Food bank")))
    .await;
  let uri = format!(
    "/opportunities/extension/{id}/enrollment?candidate_id={}",
    bia.user_id
  );

  let (status, body) =
    h.send("POST", &uri, Some(as_caller(&ana)), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["kind"], "forbidden");
}

#[tokio::test]
async fn listings_respect_roles() {
  let h = Harness::new().await;
  let ana = h.user("ana", UserRole::Student).await;
  let prof = h.user("prof.silva", UserRole::Professor).await;
  let id = h.save(Opportunity::Research(ResearchProject::new("Graphs"))).await;
  h.send(
    "POST",
    &format!("/opportunities/research/{id}/enrollment"),
    Some(as_caller(&ana)),
    None,
  )
  .await;

  let by_opp = format!("/opportunities/research/{id}/applications");
  let (status, _) = h.send("GET", &by_opp, Some(as_caller(&ana)), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, records) =
    h.send("GET", &by_opp, Some(as_caller(&prof)), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(records.as_array().unwrap().len(), 1);

  let mine = format!("/candidates/{}/applications/pesquisa", ana.user_id);
  let (status, records) =
    h.send("GET", &mine, Some(as_caller(&ana)), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(records[0]["opportunity_id"], id.to_string());
}

// ─── Approvals ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn approve_posting_by_legacy_tag() {
  let h = Harness::new().await;
  let mut posting = AssistantshipPosting::new("Calculus TA");
  posting.starts_on = NaiveDate::from_ymd_opt(2025, 3, 1);
  let id = h.save(Opportunity::Assistantship(posting)).await;

  let (status, queue) =
    h.send("GET", "/approvals/pending", Some(secretary()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(queue[0]["id"], id.to_string());
  assert_eq!(queue[0]["type"], "ASSISTANTSHIP");
  assert_eq!(queue[0]["creator"], "N/A");
  assert_eq!(queue[0]["status"], "PENDING");

  let uri = format!("/approvals/{id}/approve?type=monitoria");
  let (status, decided) = h.send("PUT", &uri, Some(secretary()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(decided["family"], "ASSISTANTSHIP");
  assert_eq!(decided["status"], "APPROVED");

  let (_, queue) =
    h.send("GET", "/approvals/pending", Some(secretary()), None).await;
  assert_eq!(queue, json!([]));
}

#[tokio::test]
async fn reject_project_moves_it_to_cancelled() {
  let h = Harness::new().await;
  let id = h.save(Opportunity::Research(ResearchProject::new("Graphs"))).await;

  let uri = format!("/approvals/{id}/reject?type=RESEARCH");
  let (status, decided) = h.send("PUT", &uri, Some(secretary()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(decided["status"], "CANCELLED");
}

#[tokio::test]
async fn decision_requires_type_and_reviewer() {
  let h = Harness::new().await;
  let id = h.save(Opportunity::Research(ResearchProject::new("Graphs"))).await;

  let (status, _) = h
    .send("PUT", &format!("/approvals/{id}/approve"), Some(secretary()), None)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let prof = Caller::new(Uuid::new_v4(), UserRole::Professor);
  let (status, _) = h
    .send(
      "PUT",
      &format!("/approvals/{id}/approve?type=research"),
      Some(prof),
      None,
    )
    .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_lists_and_publishes() {
  let h = Harness::new().await;
  let mut approved = AssistantshipPosting::new("Calculus I");
  approved.status = AssistantshipStatus::Approved;
  h.save(Opportunity::Assistantship(approved)).await;
  h.save(Opportunity::Assistantship(AssistantshipPosting::new("Calculus II")))
    .await;
  let ana = Some(Caller::new(Uuid::new_v4(), UserRole::Student));

  let (status, all) = h
    .send("GET", "/opportunities/assistantship?search=calc", ana, None)
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, pending) = h
    .send("GET", "/opportunities/assistantship?status=pending", ana, None)
    .await;
  assert_eq!(pending.as_array().unwrap().len(), 1);
  assert_eq!(pending[0]["title"], "Calculus II");

  let (status, published) = h
    .send("GET", "/opportunities/assistantship/published", ana, None)
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(published.as_array().unwrap().len(), 1);
  assert_eq!(published[0]["title"], "Calculus I");
}

#[tokio::test]
async fn status_override_via_patch() {
  let h = Harness::new().await;
  let id = h
    .save(Opportunity::Extension(ExtensionProject::new("Food bank")))
    .await;
  let uri = format!("/opportunities/extension/{id}/status");

  let (status, updated) = h
    .send("PATCH", &uri, Some(secretary()), Some(json!({"status": "completed"})))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["status"], "COMPLETED");

  let (status, body) = h
    .send("PATCH", &uri, Some(secretary()), Some(json!({"status": "gone"})))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "invalid_argument");
}

// ─── Statistics ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn statistics_for_reviewers_only() {
  let h = Harness::new().await;
  let ana = h.user("ana", UserRole::Student).await;
  let id = h
    .save(Opportunity::Assistantship(AssistantshipPosting::new("Calculus TA")))
    .await;
  h.send(
    "POST",
    &format!("/opportunities/assistantship/{id}/enrollment"),
    Some(as_caller(&ana)),
    None,
  )
  .await;

  let uri = "/statistics/assistantships";
  let (status, _) = h.send("GET", uri, Some(as_caller(&ana)), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, stats) = h.send("GET", uri, Some(secretary()), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    stats,
    json!({
      "open_count": 1,
      "active_assistant_count": 0,
      "pending_candidate_count": 1,
    })
  );
}
