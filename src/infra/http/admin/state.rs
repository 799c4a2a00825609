use std::sync::Arc;

use crate::application::admin::{
    chrome::AdminChromeService, dashboard::AdminDashboardService, vectors::AdminVectorService,
    videos::AdminVideoService,
};
use crate::application::{session::SessionService, stats::ChatStatsService};
use crate::config::AuthSettings;

use super::rate_limit::LoginThrottle;

#[derive(Clone)]
pub struct AdminState {
    pub chrome: Arc<AdminChromeService>,
    pub dashboard: Arc<AdminDashboardService>,
    pub videos: Arc<AdminVideoService>,
    pub vectors: Arc<AdminVectorService>,
    pub stats: Arc<ChatStatsService>,
    pub sessions: Arc<SessionService>,
    pub auth: Arc<AuthSettings>,
    pub login_throttle: LoginThrottle,
}
