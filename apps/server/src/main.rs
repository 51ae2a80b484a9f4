use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use parley_auth::{AuthError, Registration};
use parley_chats::entities::SendMessageRequest;
use parley_chats::{ActionOutcome, AddMemberRequest, MemberService, MessageService, RoomService};
use parley_config::{load as load_config, AppConfig};
use parley_gateway::{create_router, GatewayState};
use parley_runtime::{telemetry, BackendServices};
use serde_json::json;
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

const DEMO_PASSWORD: &str = "parley-demo";

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley chat server (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Print users, rooms, members and messages
    DumpData,
    /// Delete all rooms and messages
    ClearData,
    /// Create demo users, rooms and messages
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Migrate => migrate(config).await,
        Commands::DumpData => dump_data(config).await,
        Commands::ClearData => clear_data(config).await,
        Commands::SeedData => seed_data(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting Parley");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(
        services.db_pool.clone(),
        services.authenticator.clone(),
        config.rooms.clone(),
    );
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(parley_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.db_pool.close().await;
    info!("server shut down");
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(&services.db_pool)
        .await
        .context("failed to read migration history")?;

    println!("Database {} is up to date ({applied} migrations applied)", config.database.url);
    Ok(())
}

async fn dump_data(config: AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;
    let pool = &services.db_pool;

    println!("=== USERS ===");
    let users = sqlx::query("SELECT id, name, created_at FROM user_profile ORDER BY created_at ASC")
        .fetch_all(pool)
        .await
        .context("failed to fetch users")?;
    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!("{:<38} {:<30} {:<30}", "ID", "Name", "Created At");
        println!("{}", "-".repeat(100));
        for user in users {
            let id: String = user.get("id");
            let name: String = user.get("name");
            let created_at: String = user.get("created_at");
            println!("{:<38} {:<30} {:<30}", id, name, created_at);
        }
    }

    println!("\n=== ROOMS ===");
    let rooms = sqlx::query(
        r#"
        SELECT r.id, r.name, r.is_public, r.created_at,
               (SELECT COUNT(*) FROM chat_room_member cm WHERE cm.chat_room_id = r.id) AS members,
               (SELECT COUNT(*) FROM message m WHERE m.chat_room_id = r.id) AS messages
        FROM chat_room r
        ORDER BY r.created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch rooms")?;
    if rooms.is_empty() {
        println!("No rooms found in database");
    } else {
        println!(
            "{:<38} {:<30} {:<8} {:<8} {:<9} {:<30}",
            "ID", "Name", "Public", "Members", "Messages", "Created At"
        );
        println!("{}", "-".repeat(128));
        for room in rooms {
            let id: String = room.get("id");
            let name: String = room.get("name");
            let is_public: bool = room.get("is_public");
            let members: i64 = room.get("members");
            let messages: i64 = room.get("messages");
            let created_at: String = room.get("created_at");
            println!(
                "{:<38} {:<30} {:<8} {:<8} {:<9} {:<30}",
                id, name, is_public, members, messages, created_at
            );
        }
    }

    println!("\n=== MESSAGES ===");
    let messages = sqlx::query(
        r#"
        SELECT m.created_at, r.name AS room_name, u.name AS author_name, m.text
        FROM message m
        LEFT JOIN chat_room r ON r.id = m.chat_room_id
        LEFT JOIN user_profile u ON u.id = m.author_id
        ORDER BY m.created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch messages")?;
    if messages.is_empty() {
        println!("No messages found in database");
    } else {
        for message in messages {
            let created_at: String = message.get("created_at");
            let room_name: Option<String> = message.get("room_name");
            let author_name: Option<String> = message.get("author_name");
            let text: String = message.get("text");

            let text_display = if text.chars().count() > 60 {
                format!("{}...", text.chars().take(57).collect::<String>())
            } else {
                text
            };

            println!(
                "{} [{}] {}: {}",
                created_at,
                room_name.as_deref().unwrap_or("deleted room"),
                author_name.as_deref().unwrap_or("deleted user"),
                text_display
            );
        }
    }

    Ok(())
}

async fn clear_data(config: AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let mut tx = services.db_pool.begin().await?;

    let messages_deleted = sqlx::query("DELETE FROM message")
        .execute(&mut *tx)
        .await
        .context("failed to delete messages")?;

    // memberships go with their rooms
    let rooms_deleted = sqlx::query("DELETE FROM chat_room")
        .execute(&mut *tx)
        .await
        .context("failed to delete rooms")?;

    tx.commit().await?;

    println!("Database cleared:");
    println!("- {} messages deleted", messages_deleted.rows_affected());
    println!("- {} rooms deleted", rooms_deleted.rows_affected());
    Ok(())
}

async fn seed_data(config: AppConfig) -> anyhow::Result<()> {
    info!("seeding database with demo data");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;
    let pool = services.db_pool.clone();

    let mut users = Vec::new();
    for (login, name) in [("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")] {
        let registration = Registration {
            login: login.to_string(),
            password: DEMO_PASSWORD.to_string(),
            name: name.to_string(),
            image_url: None,
        };
        match services.authenticator.register(&registration).await {
            Ok(user) => users.push(user),
            Err(AuthError::UserExists) => {
                println!("Demo users already exist; nothing to seed");
                return Ok(());
            }
            Err(err) => return Err(err).context("failed to register demo user"),
        }
    }

    let rooms = RoomService::new(pool.clone(), config.rooms.clone());
    let members = MemberService::new(pool.clone());
    let messages = MessageService::new(pool, config.rooms.clone());

    let (alice, bob, carol) = (&users[0], &users[1], &users[2]);

    let lobby = create_room(&rooms, &alice.id, "Lobby", true).await?;
    let planning = create_room(&rooms, &bob.id, "Planning", false).await?;

    members.join_room(&bob.id, &lobby).await?;
    members.join_room(&carol.id, &lobby).await?;
    let invited = members
        .add_user_to_room(
            Some(&bob.id),
            AddMemberRequest {
                room_id: planning.clone(),
                user_id: alice.id.clone(),
            },
        )
        .await;
    if invited.error {
        return Err(anyhow!("failed to invite demo member: {}", invited.message));
    }

    let script = [
        (&alice.id, &lobby, "Welcome to Parley!"),
        (&bob.id, &lobby, "Hi Alice, glad to be here."),
        (&carol.id, &lobby, "Is there a room for release planning?"),
        (&bob.id, &planning, "Release planning starts Monday."),
        (&alice.id, &planning, "I will bring the release notes."),
    ];
    for (author, room, text) in script {
        messages
            .send_message(author, room, SendMessageRequest { text: text.to_string() })
            .await
            .context("failed to post demo message")?;
    }

    println!("Seeded {} users, 2 rooms and {} messages", users.len(), script.len());
    println!("Demo logins: alice, bob, carol (password: {DEMO_PASSWORD})");
    Ok(())
}

async fn create_room(
    rooms: &RoomService,
    owner_id: &str,
    name: &str,
    is_public: bool,
) -> anyhow::Result<String> {
    let outcome = rooms
        .create_room(Some(owner_id), json!({ "name": name, "isPublic": is_public }))
        .await;

    match outcome {
        ActionOutcome::Redirect(target) => target
            .rsplit('/')
            .next()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("unexpected redirect target {target}")),
        ActionOutcome::Completed(result) => Err(anyhow!("failed to create room: {}", result.message)),
    }
}
