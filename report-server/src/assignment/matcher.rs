//! 排班匹配规则
//!
//! 优先级（先命中者胜）：
//! 1. 作业编号完全一致
//! 2. 现场名 + 地点（规范化后）完全一致
//! 3. 现场名（规范化后）完全一致
//! 4. 现场名互相包含（任一方向）
//! 5. 未分配

use shared::models::{Assignment, AssignmentQuery, AssignmentRow, MatchRule};
use shared::util::normalize_key;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn resolve(rows: &[AssignmentRow], query: &AssignmentQuery) -> Assignment {
    let site = normalize_key(&query.site_name);
    let location = non_empty(query.location.as_deref()).map(normalize_key);

    let hit = |row: &AssignmentRow, rule: MatchRule| Assignment::Assigned {
        staff_name: row.staff_name.clone(),
        matched_by: rule,
    };

    if let Some(job_id) = non_empty(query.job_id.as_deref())
        && let Some(row) = rows
            .iter()
            .find(|r| non_empty(r.job_id.as_deref()) == Some(job_id))
    {
        return hit(row, MatchRule::JobId);
    }

    if site.is_empty() {
        return Assignment::Unassigned;
    }

    if let Some(location) = &location
        && let Some(row) = rows.iter().find(|r| {
            normalize_key(&r.site_name) == site
                && r.location.as_deref().map(normalize_key).as_ref() == Some(location)
        })
    {
        return hit(row, MatchRule::SiteAndLocation);
    }

    if let Some(row) = rows.iter().find(|r| normalize_key(&r.site_name) == site) {
        return hit(row, MatchRule::SiteName);
    }

    rows.iter()
        .find(|r| {
            let candidate = normalize_key(&r.site_name);
            !candidate.is_empty() && (candidate.contains(&site) || site.contains(&candidate))
        })
        .map(|row| hit(row, MatchRule::Fuzzy))
        .unwrap_or(Assignment::Unassigned)
}
