use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::{
    captcha::CaptchaClient,
    config::AppConfig,
    web::auth::{self, Role},
};

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    config: Arc<AppConfig>,
    captcha: CaptchaClient,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let captcha = CaptchaClient::new(config.recaptcha_secret.clone())
            .context("failed to initialize captcha client")?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        Ok(Self {
            pool,
            config: Arc::new(config),
            captcha,
        })
    }

    /// Creates the configured super admin account on first boot so a fresh
    /// install is reachable. Skipped when the email already exists.
    pub async fn ensure_seed_admin(&self) -> Result<()> {
        let (Some(email), Some(password)) = (
            self.config.admin_email.as_deref(),
            self.config.admin_password.as_deref(),
        ) else {
            return Ok(());
        };
        let email = email.to_lowercase();

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&email)
                .fetch_one(&self.pool)
                .await
                .context("failed to verify admin presence")?;

        if !exists {
            let password_hash = auth::hash_password(password)
                .map_err(|err| anyhow!("failed to hash seed admin password: {err}"))?;

            sqlx::query(
                "INSERT INTO users (id, email, full_name, password_hash, role) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(&email)
            .bind("Super Admin")
            .bind(password_hash)
            .bind(Role::SuperAdmin.as_str())
            .execute(&self.pool)
            .await
            .context("failed to insert seed admin user")?;

            info!(%email, "seeded super admin account");
        }

        Ok(())
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    pub fn pool_ref(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn captcha(&self) -> &CaptchaClient {
        &self.captcha
    }
}
