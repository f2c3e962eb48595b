//! Opportunity listings and the administrative status override.
//!
//! Listing filters are lenient: a status filter that does not parse is treated
//! as no filter at all. The override is strict and rejects unknown statuses.

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  approval::Reviewable,
  family::{Assistantship, Family, OpportunityRecord},
  opportunity::{AssistantshipPosting, AssistantshipStatus},
  store::{AcademicStore, StoreResultExt as _},
  user::Caller,
};

/// Interpret an optional status query parameter.
///
/// Missing, blank, `ALL`, `TODOS` (any case) and unrecognised values all mean
/// "do not filter".
pub fn parse_status_filter<T: std::str::FromStr>(
  raw: Option<&str>,
) -> Option<T> {
  let raw = raw?.trim();
  if raw.is_empty()
    || raw.eq_ignore_ascii_case("ALL")
    || raw.eq_ignore_ascii_case("TODOS")
  {
    return None;
  }
  raw.parse().ok()
}

fn matches_search<O: Reviewable>(
  opportunity: &O,
  needle: Option<&str>,
) -> bool {
  let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
    return true;
  };
  let needle = needle.to_lowercase();
  let hit = |label: &str| label.to_lowercase().contains(&needle);
  hit(opportunity.title())
    || opportunity.creator_label().is_some_and(hit)
    || opportunity.search_labels().into_iter().any(hit)
}

/// List one family's opportunities, optionally narrowed by a free-text search
/// over title and creator and by a status filter.
pub async fn list_opportunities<S, F>(
  store: &S,
  search: Option<&str>,
  status: Option<&str>,
) -> Result<Vec<F::Opportunity>>
where
  S: AcademicStore,
  F: Family,
  F::Opportunity: Reviewable,
{
  let wanted: Option<<F::Opportunity as OpportunityRecord>::Status> =
    parse_status_filter(status);
  let all = store.list_opportunities(F::TAG).await.lift()?;

  let mut out = Vec::new();
  for opportunity in all {
    let opportunity = F::narrow(opportunity)?;
    if wanted.is_some_and(|s| opportunity.status() != s) {
      continue;
    }
    if matches_search(&opportunity, search) {
      out.push(opportunity);
    }
  }
  debug!(family = %F::TAG, count = out.len(), ?search, "catalog listed");
  Ok(out)
}

/// The student-facing posting list: approved postings only.
pub async fn published_assistantships<S: AcademicStore>(
  store: &S,
  search: Option<&str>,
) -> Result<Vec<AssistantshipPosting>> {
  list_opportunities::<S, Assistantship>(
    store,
    search,
    Some(AssistantshipStatus::Approved.label()),
  )
  .await
}

/// Set an explicit status on an opportunity. Reviewers only.
pub async fn override_status<S, F>(
  store: &S,
  caller: &Caller,
  id: Uuid,
  status: &str,
) -> Result<F::Opportunity>
where
  S: AcademicStore,
  F: Family,
{
  caller.require_reviewer("override opportunity status")?;
  let target: <F::Opportunity as OpportunityRecord>::Status =
    status.parse().map_err(|_| Error::InvalidStatus {
      family: F::TAG,
      value:  status.to_owned(),
    })?;

  let found = store.get_opportunity(F::TAG, id).await.lift()?;
  let mut opportunity = match found {
    Some(found) => F::narrow(found)?,
    None => return Err(Error::OpportunityNotFound { family: F::TAG, id }),
  };
  let previous = opportunity.status();
  opportunity.set_status(target);
  let saved = store.save_opportunity(F::wrap(opportunity)).await.lift()?;

  info!(
    family = %F::TAG,
    %id,
    from = %previous,
    to = %target,
    caller = %caller.user_id,
    "opportunity status overridden"
  );
  F::narrow(saved)
}
