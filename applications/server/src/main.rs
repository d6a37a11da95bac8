/// Roster Server - user directory service
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use roster_core::{
    validation::{validate_signup, SignupInput},
    NewMicropost, NewUser, PageRequest, RosterStorage,
};
use roster_server::{config::ServerConfig, router, services::AuthService, state::AppState};
use roster_storage::LocalStorage;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SEED_PASSWORD: &str = "foobar";
const SEED_CONTENT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "Roster user directory server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a user account
    AddUser {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Grant the admin flag
        #[arg(long)]
        admin: bool,
    },
    /// List one page of users
    ListUsers {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Fill the database with sample users and microposts
    Seed {
        /// Number of users; the first one is an admin
        #[arg(long, default_value_t = 100)]
        users: u32,
        /// Microposts for each of the first six users
        #[arg(long, default_value_t = 50)]
        microposts: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            name,
            email,
            password,
            admin,
        } => add_user(&config, name, email, password, admin).await?,
        Commands::ListUsers { page } => list_users(&config, page).await?,
        Commands::Seed { users, microposts } => seed(&config, users, microposts).await?,
    }

    Ok(())
}

/// Open the configured database, creating its directory if needed
async fn open_storage(config: &ServerConfig) -> anyhow::Result<LocalStorage> {
    let url = &config.storage.database_url;
    if let Some(path) = url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or_default();
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
    }

    let storage = LocalStorage::connect(url).await?;
    tracing::info!("Database connected");
    Ok(storage)
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.session_expiration_hours,
        config.auth.bcrypt_cost,
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Roster Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let storage = open_storage(&config).await?;

    let purged = storage.purge_expired_sessions(Utc::now()).await?;
    if purged > 0 {
        tracing::info!("Purged {} expired sessions", purged);
    }

    let auth_service = Arc::new(auth_service(&config));
    let app_state = AppState::new(Arc::new(storage), auth_service, config.pagination);
    let app = router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Operator account creation; the only way to create an admin
async fn add_user(
    config: &ServerConfig,
    name: String,
    email: String,
    password: String,
    admin: bool,
) -> anyhow::Result<()> {
    let input = SignupInput {
        name,
        email,
        password_confirmation: password.clone(),
        password,
    };
    let errors = validate_signup(&input);
    if !errors.is_empty() {
        anyhow::bail!("{}", errors);
    }

    let storage = open_storage(config).await?;
    let password_digest = auth_service(config).hash_password(&input.password)?;

    let user = storage
        .create_user(NewUser {
            name: input.name,
            email: input.email,
            password_digest,
            admin,
        })
        .await?;

    tracing::info!(user_id = %user.id, admin = user.admin, "User created");
    println!("Created user {} <{}> (id {})", user.name, user.email, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig, page: u32) -> anyhow::Result<()> {
    let storage = open_storage(config).await?;
    let request = PageRequest::new(page, config.pagination.users_per_page)?;
    let users = storage.list_users(request).await?;

    println!(
        "Users (page {} of {}, {} total):",
        users.page,
        users.total_pages().max(1),
        users.total_count
    );
    for user in &users.items {
        let marker = if user.admin { " [admin]" } else { "" };
        println!("  {} - {} <{}>{}", user.id, user.name, user.email, marker);
    }

    Ok(())
}

/// Sample data for local development
///
/// Users that already exist are left alone, so seeding twice is harmless.
async fn seed(config: &ServerConfig, users: u32, microposts: u32) -> anyhow::Result<()> {
    let storage = open_storage(config).await?;
    // Every seeded account shares one password; hash it once
    let password_digest = auth_service(config).hash_password(SEED_PASSWORD)?;

    let mut authors = Vec::new();
    let mut created = 0;
    for n in 0..users {
        let (name, email) = if n == 0 {
            ("Example User".to_string(), "example@roster.dev".to_string())
        } else {
            (format!("Sample User {n}"), format!("example-{n}@roster.dev"))
        };

        let user = match storage.find_user_by_email(&email).await? {
            Some(existing) => existing,
            None => {
                created += 1;
                storage
                    .create_user(NewUser {
                        name,
                        email,
                        password_digest: password_digest.clone(),
                        admin: n == 0,
                    })
                    .await?
            }
        };

        if authors.len() < 6 {
            authors.push(user);
        }
    }

    for _ in 0..microposts {
        for author in &authors {
            storage
                .create_micropost(NewMicropost {
                    user_id: author.id,
                    content: SEED_CONTENT.to_string(),
                })
                .await?;
        }
    }

    tracing::info!(
        users = created,
        microposts = microposts as usize * authors.len(),
        "Seeded database"
    );
    println!("Seeded {created} users (password \"{SEED_PASSWORD}\")");

    Ok(())
}
