use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;

use keystone_model::prelude::{
    ActivityKind, ActivityUser, DashboardStats, RecentActivity,
};

use crate::infra::api_client::ApiClient;
use crate::infra::errors::ApiResult;

pub const STATS_ENDPOINT: &str = "/dashboard/stats";
pub const ACTIVITY_ENDPOINT: &str = "/dashboard/activity";

const SAMPLE_STATS_DELAY: Duration = Duration::from_millis(800);
const SAMPLE_ACTIVITY_DELAY: Duration = Duration::from_millis(600);

/// Where dashboard data comes from
#[derive(Debug, Clone)]
pub enum DashboardSource {
    /// Fixed sample data served after the given delays
    Sample {
        stats_delay: Duration,
        activity_delay: Duration,
    },
    Api(ApiClient),
}

impl Default for DashboardSource {
    fn default() -> Self {
        DashboardSource::Sample {
            stats_delay: SAMPLE_STATS_DELAY,
            activity_delay: SAMPLE_ACTIVITY_DELAY,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardService {
    source: DashboardSource,
}

impl DashboardService {
    pub fn new(source: DashboardSource) -> Self {
        Self { source }
    }

    /// Sample data without artificial delays
    pub fn instant() -> Self {
        Self::new(DashboardSource::Sample {
            stats_delay: Duration::ZERO,
            activity_delay: Duration::ZERO,
        })
    }

    pub async fn stats(&self) -> ApiResult<DashboardStats> {
        match &self.source {
            DashboardSource::Sample { stats_delay, .. } => {
                simulate_latency(*stats_delay).await;
                Ok(sample_stats())
            }
            DashboardSource::Api(api) => api.get(STATS_ENDPOINT).await,
        }
    }

    /// Newest entries first
    pub async fn recent_activity(&self) -> ApiResult<Vec<RecentActivity>> {
        match &self.source {
            DashboardSource::Sample { activity_delay, .. } => {
                simulate_latency(*activity_delay).await;
                Ok(sample_activity(Utc::now()))
            }
            DashboardSource::Api(api) => api.get(ACTIVITY_ENDPOINT).await,
        }
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        debug!("[DashboardService] Simulating {:?} latency", delay);
        tokio::time::sleep(delay).await;
    }
}

fn sample_stats() -> DashboardStats {
    DashboardStats {
        total_users: 120,
        active_users: 42,
        total_posts: 328,
        total_comments: 1423,
    }
}

fn sample_activity(now: DateTime<Utc>) -> Vec<RecentActivity> {
    let entry = |id: &str,
                 kind: ActivityKind,
                 user: (&str, &str),
                 content: &str,
                 minutes_ago: i64| RecentActivity {
        id: id.to_string(),
        kind,
        user: ActivityUser {
            id: user.0.to_string(),
            name: user.1.to_string(),
            avatar: None,
        },
        content: content.to_string(),
        timestamp: now - chrono::Duration::minutes(minutes_ago),
    };

    vec![
        entry(
            "1",
            ActivityKind::Post,
            ("user1", "John Doe"),
            "Created a new post: \"Getting Started with React\"",
            5,
        ),
        entry(
            "2",
            ActivityKind::Comment,
            ("user2", "Jane Smith"),
            "Commented on \"TypeScript Tips and Tricks\"",
            25,
        ),
        entry(
            "3",
            ActivityKind::Like,
            ("user3", "Mike Johnson"),
            "Liked \"Building Modern UIs with Tailwind\"",
            120,
        ),
    ]
}
