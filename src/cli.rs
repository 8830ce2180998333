use clap::{Parser, Subcommand};

use crate::auth::rbac::{ROLE_ADMIN, ROLE_STAFF};
use crate::config::AppConfig;
use crate::database::users::{self, UserChanges};
use crate::database::Database;

#[derive(Parser, Debug)]
#[command(name = "staffdesk-api")]
#[command(about = "Staff, activity and product backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Directory for rotated log files (overrides LOG_DIR)")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Set a user's role tier, e.g. to bootstrap the first admin")]
    SetRole {
        #[arg(long, help = "Email of the user to change")]
        email: String,
        #[arg(long, help = "Role tier: 1 staff, 2 editor, 3 admin")]
        role: i32,
    },
}

impl Cli {
    /// Flags win over environment and preset values
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.log_dir {
            config.logging.dir = dir.clone();
        }
    }
}

pub async fn set_role(config: &AppConfig, email: &str, role: i32) -> anyhow::Result<()> {
    if !(ROLE_STAFF..=ROLE_ADMIN).contains(&role) {
        anyhow::bail!("role must be between {ROLE_STAFF} and {ROLE_ADMIN}");
    }

    let db = Database::connect(&config.database).await?;
    let result = async {
        let user = users::find_by_email(db.pool(), email)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no user with email {email}"))?;
        users::update(
            db.pool(),
            user.id,
            UserChanges {
                username: None,
                role: Some(role),
            },
        )
        .await?;
        tracing::info!(user_id = %user.id, role, "Role updated");
        anyhow::Ok(())
    }
    .await;

    db.close().await;
    result
}
