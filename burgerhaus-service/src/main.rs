use anyhow::Context;
use burgerhaus_service::{
    auth::hash_password,
    build_pool,
    config::{AppConfig, Cli, Commands, CreateAdminArgs, DatabaseArgs, ServeArgs},
    handlers, logging,
    models::NewUser,
    run_migrations, store, AppState,
};
use burgerhaus_types::users::Role;
use clap::Parser;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Serve(args) => serve(&cli.database, args).await,
        Commands::Migrate => {
            run_migrations(&cli.database.database_url).await?;
            info!("migrations applied");
            Ok(())
        }
        Commands::CreateAdmin(args) => create_admin(&cli.database, args).await,
    }
}

async fn serve(database: &DatabaseArgs, args: &ServeArgs) -> anyhow::Result<()> {
    run_migrations(&database.database_url).await?;
    let pool = build_pool(&database.database_url, database.pool_size)
        .context("cannot build connection pool")?;

    let state = AppState::new(pool, AppConfig::from(args));
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(args.bind_addr).await?;
    info!("Burgerhaus listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_admin(database: &DatabaseArgs, args: &CreateAdminArgs) -> anyhow::Result<()> {
    run_migrations(&database.database_url).await?;
    let mut conn = AsyncPgConnection::establish(&database.database_url).await?;

    let user = NewUser {
        username: args.username.clone(),
        password: hash_password(&args.password)?,
        firstname: args.firstname.clone(),
        lastname: args.lastname.clone(),
        address: None,
        role: Role::Admin.into(),
        cardnumber: None,
        phone_number: None,
        email: None,
        avatar: None,
    };
    let user = store::users::insert(&mut conn, &user)
        .await
        .with_context(|| format!("cannot create admin `{}`", args.username))?;
    info!(user_id = user.id, username = %user.username, "created admin");
    Ok(())
}
