use std::{process, sync::Arc};

use quill::{
    application::{
        admin::{
            categories::AdminCategoryService, dashboard::AdminDashboardService,
            posts::AdminPostService, tags::AdminTagService,
        },
        auth::{AuthService, PasswordHasher, SessionCodec},
        blog::BlogService,
        error::AppError,
        repos::{
            CategoriesRepo, CategoriesWriteRepo, DashboardRepo, HealthRepo, PostsRepo,
            PostsWriteRepo, TagsRepo, TagsWriteRepo, UsersRepo, UsersWriteRepo,
        },
        uploads::{ImageUploadService, MediaHost},
    },
    config,
    infra::{
        auth::{BcryptHasher, JwtSessionCodec},
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState, CookieSettings},
        media::CloudinaryClient,
        telemetry,
    },
};
use tokio::sync::Notify;
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
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_api_state(repositories, &settings)?;
    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
    info!(target = "quill::migrate", "migrations applied");
    Ok(())
}

async fn connect(settings: &config::Settings) -> Result<sqlx::PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = connect(settings).await?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_api_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<ApiState, AppError> {
    let session_secret = settings
        .auth
        .session_secret
        .as_deref()
        .ok_or_else(|| InfraError::configuration("auth.session_secret is not configured"))
        .map_err(AppError::from)?;

    let users_repo: Arc<dyn UsersRepo> = repositories.clone();
    let users_write_repo: Arc<dyn UsersWriteRepo> = repositories.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = repositories.clone();
    let tags_repo: Arc<dyn TagsRepo> = repositories.clone();
    let tags_write_repo: Arc<dyn TagsWriteRepo> = repositories.clone();
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let dashboard_repo: Arc<dyn DashboardRepo> = repositories.clone();
    let health_repo: Arc<dyn HealthRepo> = repositories;

    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(settings.auth.bcrypt_cost));
    let sessions: Arc<dyn SessionCodec> = Arc::new(JwtSessionCodec::new(
        session_secret.as_bytes(),
        settings.auth.session_ttl,
    ));

    let media = CloudinaryClient::new(&settings.media).map_err(AppError::from)?;
    if settings.media.cloud_name.is_none() || settings.media.upload_preset.is_none() {
        warn!(
            target = "quill::media",
            "media host credentials are missing; image uploads will fail"
        );
    }
    let media: Arc<dyn MediaHost> = Arc::new(media);

    let max_upload_bytes = usize::try_from(settings.media.max_request_bytes.get())
        .map_err(|_| InfraError::configuration("media.max_request_bytes does not fit in memory"))
        .map_err(AppError::from)?;

    Ok(ApiState {
        auth: Arc::new(AuthService::new(
            users_repo,
            users_write_repo,
            hasher,
            sessions,
        )),
        categories: Arc::new(AdminCategoryService::new(
            categories_repo.clone(),
            categories_write_repo,
        )),
        tags: Arc::new(AdminTagService::new(tags_repo, tags_write_repo)),
        posts: Arc::new(AdminPostService::new(posts_repo.clone(), posts_write_repo)),
        blog: Arc::new(BlogService::new(posts_repo, categories_repo)),
        dashboard: Arc::new(AdminDashboardService::new(dashboard_repo)),
        uploads: Arc::new(ImageUploadService::new(media)),
        health: health_repo,
        cookies: CookieSettings {
            secure: settings.site.public_url.scheme() == "https",
            max_age: time::Duration::try_from(settings.auth.session_ttl)
                .unwrap_or(time::Duration::MAX),
        },
        max_upload_bytes,
    })
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(
        target = "quill::http",
        addr = %settings.server.addr,
        "listening"
    );

    // In-flight requests get `graceful_shutdown` to finish once a signal arrives.
    let grace = settings.server.graceful_shutdown;
    let stopping = Arc::new(Notify::new());
    let signalled = stopping.clone();

    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            signalled.notify_one();
        },
    );
    let deadline = async move {
        stopping.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        () = deadline => {
            warn!(
                target = "quill::http",
                grace_secs = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    info!(target = "quill::http", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target = "quill::http", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(target = "quill::http", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!(target = "quill::http", "shutdown signal received");
}
