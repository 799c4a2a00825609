//! Chat usage statistics shown on the admin dashboard and exposed as JSON.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use time::{
    Date, Duration, OffsetDateTime, UtcOffset, format_description::FormatItem,
    macros::format_description,
};

use crate::application::repos::{ChatLogsRepo, RepoError};

const DAY_KEY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Number of calendar days (including today) covered by the daily series.
pub const DAILY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatStats {
    pub total_messages: u64,
    pub total_sessions: u64,
    pub messages_last_24h: u64,
    pub messages_last_7d: u64,
    pub average_messages_per_session: f64,
    pub daily: Vec<DailyMessages>,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMessages {
    pub date: String,
    pub count: u64,
}

#[derive(Clone)]
pub struct ChatStatsService {
    logs: Arc<dyn ChatLogsRepo>,
}

impl ChatStatsService {
    pub fn new(logs: Arc<dyn ChatLogsRepo>) -> Self {
        Self { logs }
    }

    pub async fn stats(&self) -> Result<ChatStats, RepoError> {
        self.stats_at(OffsetDateTime::now_utc()).await
    }

    pub async fn stats_at(&self, now: OffsetDateTime) -> Result<ChatStats, RepoError> {
        let now = now.to_offset(UtcOffset::UTC);
        let first_day = now.date() - Duration::days(DAILY_WINDOW_DAYS - 1);
        let since = first_day.midnight().assume_utc();

        let totals = self.logs.chat_totals(now).await?;
        let counts: HashMap<Date, u64> = self
            .logs
            .daily_message_counts(since)
            .await?
            .into_iter()
            .map(|entry| (entry.date, entry.count))
            .collect();

        let daily = (0..DAILY_WINDOW_DAYS)
            .map(|offset| {
                let date = first_day + Duration::days(offset);
                DailyMessages {
                    date: format_date(date),
                    count: counts.get(&date).copied().unwrap_or(0),
                }
            })
            .collect();

        Ok(ChatStats {
            total_messages: totals.total_messages,
            total_sessions: totals.total_sessions,
            messages_last_24h: totals.messages_last_24h,
            messages_last_7d: totals.messages_last_7d,
            average_messages_per_session: average(totals.total_messages, totals.total_sessions),
            daily,
            generated_at: now,
        })
    }
}

fn average(messages: u64, sessions: u64) -> f64 {
    if sessions == 0 {
        return 0.0;
    }
    let raw = messages as f64 / sessions as f64;
    (raw * 100.0).round() / 100.0
}

fn format_date(date: Date) -> String {
    date.format(DAY_KEY_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}
