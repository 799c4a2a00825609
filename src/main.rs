use std::{process, str::FromStr, sync::Arc};

use cinder::{
    application::{
        admin::{
            chrome::AdminChromeService, dashboard::AdminDashboardService,
            vectors::AdminVectorService, videos::AdminVideoService,
        },
        blog::BlogService,
        error::AppError,
        repos::{
            AdminUsersRepo, BlogPostsRepo, ChatLogsRepo, HealthRepo, SessionsRepo, VectorsRepo,
            VideosRepo,
        },
        session::{CreateAdminUserCommand, SessionService},
        stats::ChatStatsService,
    },
    config,
    domain::types::UserRole,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState, LoginThrottle, RouterState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::CreateAdmin(args) => run_create_admin(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let router_state = build_router_state(repositories, &settings)?;
    let app = http::build_app(router_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "cinder::serve",
        addr = %settings.server.addr,
        base_url = %settings.deployment.base_url,
        environment = settings.deployment.environment.as_str(),
        "listening"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))
}

async fn run_create_admin(
    settings: config::Settings,
    args: config::CreateAdminArgs,
) -> Result<(), AppError> {
    let role = UserRole::from_str(args.role.trim())
        .map_err(|_| AppError::validation(format!("unknown role `{}`", args.role)))?;

    let repositories = init_repositories(&settings).await?;
    let sessions = build_session_service(&repositories, &settings)?;

    let record = sessions
        .create_user(CreateAdminUserCommand {
            email: args.email,
            password: args.password,
            role,
        })
        .await
        .map_err(|err| AppError::validation(err.to_string()))?;

    info!(
        target = "cinder::create_admin",
        user_id = %record.id,
        email = %record.email,
        role = %record.role,
        "user created"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::migration(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_session_service(
    repositories: &Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<SessionService, AppError> {
    let users_repo: Arc<dyn AdminUsersRepo> = repositories.clone();
    let sessions_repo: Arc<dyn SessionsRepo> = repositories.clone();
    let ttl = time::Duration::try_from(settings.auth.session_ttl)
        .map_err(|err| AppError::from(InfraError::configuration(err.to_string())))?;

    Ok(SessionService::new(users_repo, sessions_repo, ttl))
}

fn build_router_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<RouterState, AppError> {
    let posts_repo: Arc<dyn BlogPostsRepo> = repositories.clone();
    let chat_logs_repo: Arc<dyn ChatLogsRepo> = repositories.clone();
    let videos_repo: Arc<dyn VideosRepo> = repositories.clone();
    let vectors_repo: Arc<dyn VectorsRepo> = repositories.clone();
    let health_repo: Arc<dyn HealthRepo> = repositories.clone();

    let stats = Arc::new(ChatStatsService::new(chat_logs_repo));
    let sessions = Arc::new(build_session_service(&repositories, settings)?);

    let http_state = HttpState {
        blog: Arc::new(BlogService::new(posts_repo)),
        health: health_repo,
    };

    let admin_state = AdminState {
        chrome: Arc::new(AdminChromeService::new(
            settings.deployment.base_url.clone(),
        )),
        dashboard: Arc::new(AdminDashboardService::new(
            stats.clone(),
            videos_repo.clone(),
            vectors_repo.clone(),
            settings.deployment.clone(),
        )),
        videos: Arc::new(AdminVideoService::new(videos_repo)),
        vectors: Arc::new(AdminVectorService::new(vectors_repo)),
        stats,
        sessions,
        auth: Arc::new(settings.auth.clone()),
        login_throttle: LoginThrottle::new(
            settings.auth.login_window,
            settings.auth.login_max_attempts.get(),
        ),
    };

    Ok(RouterState {
        http: http_state,
        admin: admin_state,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            target = "cinder::serve",
            error = %err,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
    info!(target = "cinder::serve", "shutdown signal received");
}
