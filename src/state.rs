use std::sync::Arc;

use crate::auth::{rbac::PermissionTable, TokenService};
use crate::config::AppConfig;
use crate::database::Database;
use crate::services::mailer::Mailer;

/// Shared, read-only application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub permissions: Arc<PermissionTable>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenService, mailer: Arc<dyn Mailer>, config: AppConfig) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            permissions: Arc::new(PermissionTable::standard()),
            mailer,
            config: Arc::new(config),
        }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        self.db.pool()
    }
}
