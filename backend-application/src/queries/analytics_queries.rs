use std::collections::HashMap;

use chrono::Duration;

use backend_domain::{
    Actor, Dashboard, DashboardOverview, DashboardQuery, DateKey, DateRange, HistoryQuery,
    ItemEvent, ItemId, Role, UserActivityDay, UserActivitySummary, UserId, UserUsageSummary,
};

use super::parse_optional;
use crate::access::{require_role, ADMIN_OR_OWNER};
use crate::{AppError, AppState};

const DASHBOARD_ROW_LIMIT: usize = 50;
const RECENT_ACTIVITY_LIMIT: usize = 20;
const ITEM_HISTORY_LIMIT: usize = 100;
const USER_ACTIVITY_LIMIT: usize = 30;
const MAX_LIMIT: usize = 1000;

pub async fn dashboard(
    state: &AppState,
    actor: &Actor,
    query: DashboardQuery,
) -> Result<Dashboard, AppError> {
    require_role(actor, ADMIN_OR_OWNER)?;
    let now = state.clock.now();
    let date = parse_optional::<DateKey>(query.date)?.unwrap_or_else(|| DateKey::from_timestamp(now));

    let (items, floor_users, pending_requests, activity, usage, recent_activity) = tokio::try_join!(
        state.item_repo.count_by_status(),
        state.user_repo.count_by_role(Role::FloorUser),
        state.request_repo.count_pending(),
        state.activity_repo.list_for_date(date, DASHBOARD_ROW_LIMIT),
        state.usage_repo.list_for_date(date, DASHBOARD_ROW_LIMIT),
        state
            .event_repo
            .list_since(now - Duration::hours(24), RECENT_ACTIVITY_LIMIT),
    )?;

    let names = user_names(
        state,
        activity
            .iter()
            .map(|aggregate| &aggregate.user_id)
            .chain(usage.iter().map(|snapshot| &snapshot.user_id)),
    )
    .await?;

    let today_activity = activity
        .into_iter()
        .map(|aggregate| UserActivitySummary {
            user_name: names.get(&aggregate.user_id).cloned(),
            user_id: aggregate.user_id,
            total_actions: aggregate.total_actions,
            last_activity_at: aggregate.last_activity_at,
        })
        .collect();
    let today_usage = usage
        .into_iter()
        .map(|snapshot| UserUsageSummary {
            user_name: names.get(&snapshot.user_id).cloned(),
            items_used: snapshot.items_used.len(),
            total_duration_minutes: snapshot.total_duration_minutes,
            user_id: snapshot.user_id,
        })
        .collect();

    Ok(Dashboard {
        date,
        overview: DashboardOverview {
            items,
            floor_users,
            pending_requests,
        },
        today_activity,
        today_usage,
        recent_activity,
    })
}

/// Event log for one item, newest first.
pub async fn item_history(
    state: &AppState,
    actor: &Actor,
    item_id: &ItemId,
    query: HistoryQuery,
) -> Result<Vec<ItemEvent>, AppError> {
    require_role(actor, ADMIN_OR_OWNER)?;
    let range = date_range(query.start_date, query.end_date)?;
    let limit = clamp_limit(query.limit, ITEM_HISTORY_LIMIT);
    Ok(state.event_repo.list_for_item(item_id, range, limit).await?)
}

/// Daily activity aggregates for one user, newest day first.
pub async fn user_activity(
    state: &AppState,
    actor: &Actor,
    user_id: &UserId,
    query: HistoryQuery,
) -> Result<Vec<UserActivityDay>, AppError> {
    require_role(actor, ADMIN_OR_OWNER)?;
    let range = date_range(query.start_date, query.end_date)?;
    let limit = clamp_limit(query.limit, USER_ACTIVITY_LIMIT);
    let aggregates = state.activity_repo.list_for_user(user_id, range, limit).await?;
    Ok(aggregates
        .into_iter()
        .map(|aggregate| UserActivityDay {
            date: aggregate.date_key,
            total_actions: aggregate.total_actions,
            last_activity_at: aggregate.last_activity_at,
            activities: aggregate.activities,
        })
        .collect())
}

fn date_range(start: Option<String>, end: Option<String>) -> Result<DateRange, AppError> {
    let range = DateRange {
        start: parse_optional(start)?,
        end: parse_optional(end)?,
    };
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            return Err(AppError::BadRequest(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
    }
    Ok(range)
}

fn clamp_limit(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_LIMIT)
}

async fn user_names<'a>(
    state: &AppState,
    user_ids: impl Iterator<Item = &'a UserId>,
) -> Result<HashMap<UserId, String>, AppError> {
    let mut names = HashMap::new();
    for user_id in user_ids {
        if names.contains_key(user_id) {
            continue;
        }
        if let Some(user) = state.user_repo.get(user_id).await? {
            names.insert(user_id.clone(), user.name);
        }
    }
    Ok(names)
}
