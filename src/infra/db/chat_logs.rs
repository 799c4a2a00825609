use async_trait::async_trait;
use time::{Date, Duration, OffsetDateTime};

use crate::application::repos::{ChatLogsRepo, RepoError};
use crate::domain::entities::{ChatTotals, DailyMessageCount};

use super::{PostgresRepositories, count_to_u64, map_sqlx_error};

#[derive(Debug, sqlx::FromRow)]
struct ChatTotalsRow {
    total_messages: i64,
    total_sessions: i64,
    messages_last_24h: i64,
    messages_last_7d: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct DailyCountRow {
    day: Date,
    count: i64,
}

#[async_trait]
impl ChatLogsRepo for PostgresRepositories {
    async fn chat_totals(&self, now: OffsetDateTime) -> Result<ChatTotals, RepoError> {
        let row = sqlx::query_as::<_, ChatTotalsRow>(
            r#"
            SELECT
                COUNT(*) AS total_messages,
                COUNT(DISTINCT session_id) AS total_sessions,
                COUNT(*) FILTER (WHERE created_at >= $1) AS messages_last_24h,
                COUNT(*) FILTER (WHERE created_at >= $2) AS messages_last_7d
            FROM chat_logs
            "#,
        )
        .bind(now - Duration::hours(24))
        .bind(now - Duration::days(7))
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(ChatTotals {
            total_messages: count_to_u64(row.total_messages),
            total_sessions: count_to_u64(row.total_sessions),
            messages_last_24h: count_to_u64(row.messages_last_24h),
            messages_last_7d: count_to_u64(row.messages_last_7d),
        })
    }

    async fn daily_message_counts(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<DailyMessageCount>, RepoError> {
        let rows = sqlx::query_as::<_, DailyCountRow>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
            FROM chat_logs
            WHERE created_at >= $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(since)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| DailyMessageCount {
                date: row.day,
                count: count_to_u64(row.count),
            })
            .collect())
    }
}
