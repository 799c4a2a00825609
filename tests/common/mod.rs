#![allow(dead_code)]

use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use cinder::application::admin::{
    chrome::AdminChromeService, dashboard::AdminDashboardService, vectors::AdminVectorService,
    videos::AdminVideoService,
};
use cinder::application::blog::BlogService;
use cinder::application::repos::{
    AdminUsersRepo, BlogPostsRepo, ChatLogsRepo, CreateAdminUserParams, CreateSessionParams,
    CreateVideoParams, HealthRepo, RepoError, SessionsRepo, VectorQueryFilter, VectorsRepo,
    VideosRepo,
};
use cinder::application::session::{CreateAdminUserCommand, SessionService};
use cinder::application::stats::ChatStatsService;
use cinder::config::{AuthSettings, DeploymentEnvironment, DeploymentSettings};
use cinder::domain::entities::{
    AdminUserRecord, BlogPostRecord, ChatTotals, DailyMessageCount, SessionRecord,
    VectorDocumentRecord, VectorSourceCount, VideoRecord,
};
use cinder::domain::types::{BlogPostStatus, UserRole, VideoProvider};
use cinder::infra::http::{AdminState, HttpState, LoginThrottle, RouterState, build_app};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";
pub const COOKIE_NAME: &str = "cinder_session";

/// In-memory stand-in for every repository trait.
#[derive(Default)]
pub struct MemoryStore {
    pub posts: Mutex<Vec<BlogPostRecord>>,
    pub videos: Mutex<Vec<VideoRecord>>,
    pub vectors: Mutex<Vec<VectorDocumentRecord>>,
    pub users: Mutex<Vec<AdminUserRecord>>,
    pub sessions: Mutex<Vec<SessionRecord>>,
    pub chat_totals: Mutex<ChatTotals>,
    pub daily: Mutex<Vec<DailyMessageCount>>,
    pub fail_stats: AtomicBool,
    pub post_lookups: AtomicUsize,
}

fn stats_failure() -> RepoError {
    RepoError::Persistence("chat_logs unavailable".to_string())
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl BlogPostsRepo for MemoryStore {
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<BlogPostRecord>, RepoError> {
        self.post_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl ChatLogsRepo for MemoryStore {
    async fn chat_totals(&self, _now: OffsetDateTime) -> Result<ChatTotals, RepoError> {
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(stats_failure());
        }
        Ok(*self.chat_totals.lock().unwrap())
    }

    async fn daily_message_counts(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<DailyMessageCount>, RepoError> {
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(stats_failure());
        }
        Ok(self
            .daily
            .lock()
            .unwrap()
            .iter()
            .filter(|day| day.date >= since.date())
            .copied()
            .collect())
    }
}

#[async_trait]
impl VideosRepo for MemoryStore {
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, RepoError> {
        let mut videos = self.videos.lock().unwrap().clone();
        videos.sort_by_key(|video| (video.sort_order, video.created_at));
        Ok(videos)
    }

    async fn count_videos(&self, published: Option<bool>) -> Result<u64, RepoError> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .iter()
            .filter(|video| published.is_none_or(|flag| video.published == flag))
            .count() as u64)
    }

    async fn find_video(&self, id: Uuid) -> Result<Option<VideoRecord>, RepoError> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .iter()
            .find(|video| video.id == id)
            .cloned())
    }

    async fn create_video(&self, params: CreateVideoParams) -> Result<VideoRecord, RepoError> {
        let mut videos = self.videos.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let record = VideoRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            provider: params.provider,
            video_id: params.video_id,
            published: params.published,
            sort_order: videos.iter().map(|v| v.sort_order + 1).max().unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        videos.push(record.clone());
        Ok(record)
    }

    async fn set_video_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<VideoRecord, RepoError> {
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .iter_mut()
            .find(|video| video.id == id)
            .ok_or(RepoError::NotFound)?;
        video.published = published;
        video.updated_at = OffsetDateTime::now_utc();
        Ok(video.clone())
    }

    async fn delete_video(&self, id: Uuid) -> Result<(), RepoError> {
        let mut videos = self.videos.lock().unwrap();
        let before = videos.len();
        videos.retain(|video| video.id != id);
        if videos.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

impl MemoryStore {
    fn filtered_vectors(&self, filter: &VectorQueryFilter) -> Vec<VectorDocumentRecord> {
        let mut docs: Vec<_> = self
            .vectors
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| filter.source.as_deref().is_none_or(|s| doc.source == s))
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        docs
    }
}

#[async_trait]
impl VectorsRepo for MemoryStore {
    async fn list_documents(
        &self,
        filter: &VectorQueryFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<VectorDocumentRecord>, RepoError> {
        Ok(self
            .filtered_vectors(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_documents(&self, filter: &VectorQueryFilter) -> Result<u64, RepoError> {
        Ok(self.filtered_vectors(filter).len() as u64)
    }

    async fn source_counts(&self) -> Result<Vec<VectorSourceCount>, RepoError> {
        let mut counts: Vec<VectorSourceCount> = Vec::new();
        for doc in self.vectors.lock().unwrap().iter() {
            match counts.iter_mut().find(|entry| entry.source == doc.source) {
                Some(entry) => entry.count += 1,
                None => counts.push(VectorSourceCount {
                    source: doc.source.clone(),
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.source.cmp(&b.source)));
        Ok(counts)
    }

    async fn delete_document(&self, id: Uuid) -> Result<(), RepoError> {
        let mut docs = self.vectors.lock().unwrap();
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        if docs.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_source(&self, source: &str) -> Result<u64, RepoError> {
        let mut docs = self.vectors.lock().unwrap();
        let before = docs.len();
        docs.retain(|doc| doc.source != source);
        Ok((before - docs.len()) as u64)
    }
}

#[async_trait]
impl AdminUsersRepo for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUserRecord>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(
        &self,
        params: CreateAdminUserParams,
    ) -> Result<AdminUserRecord, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(&params.email))
        {
            return Err(RepoError::Duplicate {
                constraint: "admin_users_email_key".to_string(),
            });
        }
        let record = AdminUserRecord {
            id: Uuid::new_v4(),
            email: params.email,
            password_hash: params.password_hash,
            role: params.role,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl SessionsRepo for MemoryStore {
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<SessionRecord, RepoError> {
        let user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == params.user_id)
            .cloned()
            .ok_or(RepoError::InvalidInput {
                message: "unknown user".to_string(),
            })?;
        let record = SessionRecord {
            id: Uuid::new_v4(),
            prefix: params.prefix,
            hashed_secret: params.hashed_secret,
            user_id: user.id,
            email: user.email,
            role: user.role,
            expires_at: params.expires_at,
            created_at: OffsetDateTime::now_utc(),
        };
        self.sessions.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_session_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Option<SessionRecord>, RepoError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|session| session.prefix == prefix)
            .cloned())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|session| session.id != id);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: OffsetDateTime) -> Result<u64, RepoError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|session| session.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub sessions: Arc<SessionService>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_login_limit(5)
    }

    pub fn with_login_limit(max_attempts: u32) -> Self {
        let store = Arc::new(MemoryStore::default());

        let sessions = Arc::new(
            SessionService::new(store.clone(), store.clone(), time::Duration::hours(1))
                .with_hash_cost(4),
        );
        let stats = Arc::new(ChatStatsService::new(store.clone()));
        let deployment = DeploymentSettings {
            base_url: "https://cinder.example".to_string(),
            environment: DeploymentEnvironment::Preview,
        };
        let auth = AuthSettings {
            login_max_attempts: NonZeroU32::new(max_attempts).expect("non-zero"),
            ..AuthSettings::default()
        };

        let state = RouterState {
            http: HttpState {
                blog: Arc::new(BlogService::new(store.clone())),
                health: store.clone(),
            },
            admin: AdminState {
                chrome: Arc::new(AdminChromeService::new(deployment.base_url.clone())),
                dashboard: Arc::new(AdminDashboardService::new(
                    stats.clone(),
                    store.clone(),
                    store.clone(),
                    deployment,
                )),
                videos: Arc::new(AdminVideoService::new(store.clone())),
                vectors: Arc::new(AdminVectorService::new(store.clone())),
                stats,
                sessions: sessions.clone(),
                login_throttle: LoginThrottle::new(
                    StdDuration::from_secs(900),
                    auth.login_max_attempts.get(),
                ),
                auth: Arc::new(auth),
            },
        };

        Self {
            store,
            sessions,
            router: build_app(state),
        }
    }

    pub async fn seed_user(&self, email: &str, password: &str, role: UserRole) {
        self.sessions
            .create_user(CreateAdminUserCommand {
                email: email.to_string(),
                password: password.to_string(),
                role,
            })
            .await
            .expect("seed user");
    }

    /// Seed the default admin and return a `Cookie` header value for its session.
    pub async fn admin_cookie(&self) -> String {
        self.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin)
            .await;
        self.login_cookie(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn login_cookie(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        set_cookie_pair(&response).expect("session cookie")
    }

    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", email)
            .append_pair("password", password)
            .finish();
        self.send(form_request("/admin/login", &body, None)).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(form_request(uri, body, cookie)).await
    }
}

pub fn form_request(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

/// `name=value` of the first `Set-Cookie` header.
pub fn set_cookie_pair(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|pair| pair.trim().to_string())
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}

pub fn blog_post(slug: &str, status: BlogPostStatus) -> BlogPostRecord {
    let now = OffsetDateTime::now_utc();
    BlogPostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: format!("Post {slug}"),
        excerpt: Some("A short summary".to_string()),
        content: "# Heading\n\nBody".to_string(),
        author: Some("Cinder Team".to_string()),
        tags: vec!["rust".to_string(), "admin".to_string()],
        status,
        published_at: status.is_public().then_some(now),
        created_at: now,
        updated_at: now,
    }
}

pub fn video(title: &str, provider: VideoProvider, video_id: &str, published: bool) -> VideoRecord {
    let now = OffsetDateTime::now_utc();
    VideoRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        provider,
        video_id: video_id.to_string(),
        published,
        sort_order: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn vector_document(source: &str, content: &str, age_minutes: i64) -> VectorDocumentRecord {
    VectorDocumentRecord {
        id: Uuid::new_v4(),
        source: source.to_string(),
        content: content.to_string(),
        metadata: serde_json::json!({ "chunk": age_minutes }),
        dimensions: 1536,
        created_at: OffsetDateTime::now_utc() - time::Duration::minutes(age_minutes),
    }
}
