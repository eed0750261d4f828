use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use marketplace_client::app::MarketplaceApp;
use marketplace_client::config::ClientConfig;
use marketplace_client::error::ApiError;
use marketplace_client::net::types::{
    CreateItemRequest, ImageUpload, LoginCredentials, RegisterData, UpdateEmailRequest, UpdatePasswordRequest,
    UpdateUsernameRequest,
};
use marketplace_client::query::bindings::{self, EmailParams, ItemIdParams};
use marketplace_client::query::{Fetched, Query};
use marketplace_client::router::NavigationDecision;
use marketplace_client::router::guard::post_login_location;
use marketplace_client::state::session::LogoutOutcome;
use marketplace_client::util::i18n::Msg;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("{message}: {}", .source.user_message())]
    Action { message: &'static str, source: ApiError },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    WriteFile { path: PathBuf, source: std::io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "marketplace", about = "Marketplace REST client")]
struct Cli {
    #[arg(long, env = "MARKETPLACE_API_URL")]
    api_url: Option<String>,

    /// Directory for the persisted cookie and favorites.
    #[arg(long, env = "MARKETPLACE_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login(AuthArgs),
    Register(AuthArgs),
    Logout,
    Whoami,
    Items(ItemsCommand),
    Favorite(FavoriteCommand),
    Profile(ProfileCommand),
    Admin(AdminCommand),
    Categories,
    Conversations,
    Conversation {
        item_id: i64,
        receiver_id: i64,
    },
    /// Resolve a client route through the auth guard.
    Navigate {
        location: String,
    },
}

#[derive(Args, Debug)]
struct AuthArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "MARKETPLACE_PASSWORD")]
    password: String,
    /// Login route the user came from, e.g. `/login?redirect=%2Ffavorites`.
    #[arg(long, default_value = "/login")]
    from: String,
}

#[derive(Args, Debug)]
struct ItemsCommand {
    #[command(subcommand)]
    command: ItemsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemsSubcommand {
    List {
        #[arg(long)]
        category: Option<i64>,
    },
    Mine,
    Show {
        id: i64,
    },
    Create {
        /// `itemData` JSON object.
        #[arg(long)]
        data: String,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    Delete {
        id: i64,
    },
    Reserve {
        id: i64,
    },
    CancelReservation {
        id: i64,
    },
    Image {
        filename: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct FavoriteCommand {
    #[command(subcommand)]
    command: FavoriteSubcommand,
}

#[derive(Subcommand, Debug)]
enum FavoriteSubcommand {
    List,
    Add { id: i64 },
    Remove { id: i64 },
    Check { id: i64 },
    /// Toggle the locally stored favorite flag without calling the server.
    Toggle { id: i64 },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    /// Print the signed-in user's name and email as the server reports them.
    Show,
    SetUsername {
        new_username: String,
    },
    SetEmail {
        new_email: String,
    },
    SetPassword {
        #[arg(long, env = "MARKETPLACE_PASSWORD")]
        current: String,
        #[arg(long, env = "MARKETPLACE_NEW_PASSWORD")]
        new: String,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Show { email: String },
    Grant { email: String },
    Revoke { email: String },
    Delete { email: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_base_url(url)?;
    }
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = Some(dir);
    }

    let app = MarketplaceApp::new(config)?;
    app.boot().await;

    match cli.command {
        Command::Login(args) => run_login(&app, args).await,
        Command::Register(args) => run_register(&app, args).await,
        Command::Logout => run_logout(&app).await,
        Command::Whoami => run_whoami(&app).await,
        Command::Items(items) => run_items(&app, items).await,
        Command::Favorite(favorite) => run_favorite(&app, favorite).await,
        Command::Profile(profile) => run_profile(&app, profile).await,
        Command::Admin(admin) => run_admin(&app, admin).await,
        Command::Categories => run_query(&app, bindings::get_categories(&app.api)).await,
        Command::Conversations => run_query(&app, bindings::get_conversations(&app.api)).await,
        Command::Conversation { item_id, receiver_id } => {
            run_query(&app, bindings::get_conversation(&app.api, item_id, receiver_id)).await
        }
        Command::Navigate { location } => run_navigate(&app, &location).await,
    }
}

async fn run_login(app: &MarketplaceApp, args: AuthArgs) -> Result<(), CliError> {
    let locale = app.locale();
    let credentials = LoginCredentials { username: args.username, email: args.email, password: args.password };
    let user = app
        .session
        .login(&credentials)
        .await
        .map_err(|source| CliError::Action { message: locale.text(Msg::LoginFailed), source })?;
    println!("{} {}", locale.text(Msg::LoggedInAs), user.username);

    // Follow the login route's redirect, as the login view would.
    if let NavigationDecision::Proceed(route) = app.navigate(&args.from).await {
        let target = post_login_location(&route);
        describe_navigation(app, &app.navigate(&target).await);
    }
    Ok(())
}

async fn run_register(app: &MarketplaceApp, args: AuthArgs) -> Result<(), CliError> {
    let locale = app.locale();
    let data = RegisterData { username: args.username, email: args.email, password: args.password };
    let user = app
        .session
        .register(&data)
        .await
        .map_err(|source| CliError::Action { message: locale.text(Msg::RegisterFailed), source })?;
    println!("{} {}", locale.text(Msg::LoggedInAs), user.username);
    Ok(())
}

async fn run_logout(app: &MarketplaceApp) -> Result<(), CliError> {
    if let LogoutOutcome::ServerFailed(err) = app.session.logout().await {
        eprintln!("warning: {}", err.user_message());
    }
    println!("{}", app.locale().text(Msg::LoggedOut));
    Ok(())
}

async fn run_whoami(app: &MarketplaceApp) -> Result<(), CliError> {
    let locale = app.locale();
    match app.session.user().await {
        Some(user) => println!(
            "{} {} <{}> [{}]",
            locale.text(Msg::LoggedInAs),
            user.username,
            user.email,
            user.roles.join(",")
        ),
        None => println!("{}", locale.text(Msg::NotLoggedIn)),
    }
    Ok(())
}

async fn run_items(app: &MarketplaceApp, items: ItemsCommand) -> Result<(), CliError> {
    match items.command {
        ItemsSubcommand::List { category: None } => run_query(app, bindings::get_all_items(&app.api)).await,
        ItemsSubcommand::List { category: Some(id) } => {
            run_query(app, bindings::get_items_by_category(&app.api, id)).await
        }
        ItemsSubcommand::Mine => run_query(app, bindings::get_user_items(&app.api)).await,
        ItemsSubcommand::Show { id } => run_query(app, bindings::get_item_by_id(&app.api, id)).await,
        ItemsSubcommand::Create { data, images } => {
            let request = serde_json::from_str::<CreateItemRequest>(&data)?;
            let mut uploads = Vec::with_capacity(images.len());
            for path in images {
                let bytes = tokio::fs::read(&path).await.map_err(|source| CliError::ReadFile { path: path.clone(), source })?;
                let filename = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                uploads.push(ImageUpload::new(filename, bytes));
            }
            let created = app.items.add_item(&request, &uploads).await?;
            print_json(&serde_json::to_value(created)?)
        }
        ItemsSubcommand::Delete { id } => {
            app.queries.mutate(&bindings::delete_item(&app.api), ItemIdParams { id }).await?;
            Ok(())
        }
        ItemsSubcommand::Reserve { id } => {
            let item = app.queries.mutate(&bindings::reserve_item(&app.api), ItemIdParams { id }).await?;
            print_json(&serde_json::to_value(item)?)
        }
        ItemsSubcommand::CancelReservation { id } => {
            let body = app.queries.mutate(&bindings::cancel_reservation(&app.api), ItemIdParams { id }).await?;
            print_json(&body)
        }
        ItemsSubcommand::Image { filename, out } => {
            let query = bindings::get_item_image(&app.api, &filename);
            let Some(bytes) = app.queries.fetch_query(&query).await?.into_data() else {
                return Ok(());
            };
            tokio::fs::write(&out, bytes).await.map_err(|source| CliError::WriteFile { path: out.clone(), source })
        }
    }
}

async fn run_favorite(app: &MarketplaceApp, favorite: FavoriteCommand) -> Result<(), CliError> {
    let locale = app.locale();
    match favorite.command {
        FavoriteSubcommand::List => run_query(app, bindings::get_user_favorites(&app.api)).await,
        FavoriteSubcommand::Add { id } => {
            let mutation = bindings::add_to_favorites(&app.api);
            app.queries.mutate(&mutation, ItemIdParams { id }).await?;
            println!("{}", locale.text(Msg::FavoriteAdded));
            Ok(())
        }
        FavoriteSubcommand::Remove { id } => {
            let mutation = bindings::remove_from_favorites(&app.api);
            app.queries.mutate(&mutation, ItemIdParams { id }).await?;
            println!("{}", locale.text(Msg::FavoriteRemoved));
            Ok(())
        }
        FavoriteSubcommand::Check { id } => run_query(app, bindings::is_item_favorited(&app.api, id)).await,
        FavoriteSubcommand::Toggle { id } => {
            let msg = if app.items.toggle_favorite(id).await { Msg::FavoriteAdded } else { Msg::FavoriteRemoved };
            println!("{}", locale.text(msg));
            Ok(())
        }
    }
}

async fn run_profile(app: &MarketplaceApp, profile: ProfileCommand) -> Result<(), CliError> {
    let confirmation = match profile.command {
        ProfileSubcommand::Show => {
            let name = app.queries.fetch_query(&bindings::get_user_name(&app.api)).await?.into_data();
            let email = app.queries.fetch_query(&bindings::get_user_email(&app.api)).await?.into_data();
            return print_json(&serde_json::json!({ "username": name, "email": email }));
        }
        ProfileSubcommand::SetUsername { new_username } => {
            let request = UpdateUsernameRequest { new_username };
            app.queries.mutate(&bindings::update_username(&app.api), request).await?
        }
        ProfileSubcommand::SetEmail { new_email } => {
            let request = UpdateEmailRequest { new_email };
            app.queries.mutate(&bindings::update_email(&app.api), request).await?
        }
        ProfileSubcommand::SetPassword { current, new } => {
            let request = UpdatePasswordRequest { current_password: current, new_password: new };
            app.queries.mutate(&bindings::update_password(&app.api), request).await?
        }
    };
    println!("{confirmation}");
    Ok(())
}

async fn run_admin(app: &MarketplaceApp, admin: AdminCommand) -> Result<(), CliError> {
    let confirmation = match admin.command {
        AdminSubcommand::Show { email } => return run_query(app, bindings::get_user_by_email(&app.api, &email)).await,
        AdminSubcommand::Grant { email } => {
            app.queries.mutate(&bindings::make_user_admin(&app.api), EmailParams { email }).await?
        }
        AdminSubcommand::Revoke { email } => {
            app.queries.mutate(&bindings::remove_admin_role(&app.api), EmailParams { email }).await?
        }
        AdminSubcommand::Delete { email } => {
            app.queries.mutate(&bindings::delete_user(&app.api), EmailParams { email }).await?
        }
    };
    println!("{confirmation}");
    Ok(())
}

async fn run_navigate(app: &MarketplaceApp, location: &str) -> Result<(), CliError> {
    let decision = app.navigate(location).await;
    describe_navigation(app, &decision);
    Ok(())
}

fn describe_navigation(app: &MarketplaceApp, decision: &NavigationDecision) {
    let locale = app.locale();
    match decision {
        NavigationDecision::Proceed(route) => println!("{} ({})", route.name.as_str(), route.full_path),
        NavigationDecision::Redirect { location } => println!("{} {location}", locale.text(Msg::RedirectedTo)),
        NavigationDecision::NotFound { location } => println!("{}: {location}", locale.text(Msg::PageNotFound)),
    }
}

async fn run_query<T>(app: &MarketplaceApp, query: Query<T>) -> Result<(), CliError>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    match app.queries.fetch_query(&query).await? {
        Fetched::Disabled => {
            tracing::warn!(key = %query.key, "query disabled by an empty parameter");
            print_json(&Value::Null)
        }
        Fetched::Fresh(value) | Fetched::Cached(value) => print_json(&serde_json::to_value(value)?),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
