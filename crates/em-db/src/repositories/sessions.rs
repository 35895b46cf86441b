use anyhow::Context;
use sqlx::{Executor, PgPool, Postgres};

use em_planner::ExamSession;

use crate::models::SessionRow;

/// Load the full persisted session set, oldest first.
pub async fn load_all<'e, E>(executor: E) -> anyhow::Result<Vec<ExamSession>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<SessionRow> = sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course, exam_date, is_passed, payload, created_at, updated_at
            FROM exam_sessions
            ORDER BY created_at
        "#,
    )
    .fetch_all(executor)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            ExamSession::try_from(row).with_context(|| format!("corrupt payload for session {id}"))
        })
        .collect()
}

/// Persist the full session set, replacing whatever was stored before.
///
/// The save contract is whole-list: the scheduler always returns the complete
/// post-rebalance set, so the previous rows are cleared and rewritten in one
/// transaction. Partially persisted sets are never observable.
pub async fn replace_all(pool: &PgPool, sessions: &[ExamSession]) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        // language=PostgreSQL
        r#"DELETE FROM exam_sessions"#,
    )
    .execute(&mut *tx)
    .await?;

    for session in sessions {
        let payload = serde_json::to_value(session)
            .with_context(|| format!("failed to serialize session {}", session.id))?;

        sqlx::query(
            // language=PostgreSQL
            r#"
                INSERT INTO exam_sessions (id, course, exam_date, is_passed, payload, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(session.id)
        .bind(&session.course)
        .bind(session.exam_date)
        .bind(session.is_passed)
        .bind(&payload)
        .bind(session.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// Number of stored sessions.
pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let (count,): (i64,) = sqlx::query_as(
        // language=PostgreSQL
        r#"SELECT COUNT(*) FROM exam_sessions"#,
    )
    .fetch_one(executor)
    .await?;

    Ok(count)
}
