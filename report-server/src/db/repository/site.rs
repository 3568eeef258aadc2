//! Site Master Repository

use super::RepoResult;
use shared::models::Site;
use sqlx::SqliteExecutor;

pub async fn find_by_name_key<'e, E>(exec: E, name_key: &str) -> RepoResult<Option<Site>>
where
    E: SqliteExecutor<'e>,
{
    let site = sqlx::query_as::<_, Site>("SELECT * FROM site WHERE name_key = ?")
        .bind(name_key)
        .fetch_optional(exec)
        .await?;
    Ok(site)
}

pub async fn find_by_code<'e, E>(exec: E, code: &str) -> RepoResult<Option<Site>>
where
    E: SqliteExecutor<'e>,
{
    let site = sqlx::query_as::<_, Site>("SELECT * FROM site WHERE code = ?")
        .bind(code)
        .fetch_optional(exec)
        .await?;
    Ok(site)
}

pub async fn insert<'e, E>(
    exec: E,
    code: Option<&str>,
    name: &str,
    name_key: &str,
    location: Option<&str>,
) -> RepoResult<Site>
where
    E: SqliteExecutor<'e>,
{
    let site = sqlx::query_as::<_, Site>(
        "INSERT INTO site (code, name, name_key, location) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(code)
    .bind(name)
    .bind(name_key)
    .bind(location)
    .fetch_one(exec)
    .await?;
    Ok(site)
}
