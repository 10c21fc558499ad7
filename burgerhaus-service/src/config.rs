use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Burgerhaus ordering and reservation service")]
pub struct Cli {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pending migrations and serve the HTTP API
    Serve(ServeArgs),
    /// Run pending migrations and exit
    Migrate,
    /// Create an account with the admin role
    CreateAdmin(CreateAdminArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub pool_size: usize,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3001")]
    pub bind_addr: SocketAddr,

    /// HMAC secret for issued tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    #[arg(long, env = "TOKEN_TTL_HOURS", default_value_t = 24)]
    pub token_ttl_hours: i64,

    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Frontend bundle served under /api/v1
    #[arg(long, env = "STATIC_DIR", default_value = "Code")]
    pub static_dir: PathBuf,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 5 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

#[derive(Args, Debug, Clone)]
pub struct CreateAdminArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub firstname: String,
    #[arg(long)]
    pub lastname: String,
}

/// Runtime settings of the HTTP application, independent of how they were
/// collected.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret_key: String,
    pub token_ttl_hours: i64,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl From<&ServeArgs> for AppConfig {
    fn from(args: &ServeArgs) -> Self {
        AppConfig {
            secret_key: args.secret_key.clone(),
            token_ttl_hours: args.token_ttl_hours,
            upload_dir: args.upload_dir.clone(),
            static_dir: args.static_dir.clone(),
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from([
            "burgerhaus-service",
            "--database-url",
            "postgres://localhost/burgerhaus",
            "serve",
            "--secret-key",
            "s3cr3t",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = AppConfig::from(&args);
        assert_eq!(args.bind_addr.port(), 3001);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.static_dir, PathBuf::from("Code"));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_create_admin_requires_names() {
        let result = Cli::try_parse_from([
            "burgerhaus-service",
            "--database-url",
            "postgres://localhost/burgerhaus",
            "create-admin",
            "--username",
            "root",
        ]);
        assert!(result.is_err());
    }
}
