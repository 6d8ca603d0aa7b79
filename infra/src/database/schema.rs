//! Table definitions for users and their persistent tokens.
//!
//! Applied at startup with `CREATE TABLE IF NOT EXISTS`; there is no
//! migration history.

use sqlx::MySqlPool;

use crate::InfrastructureError;

pub const CREATE_USER_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS app_user (
        id CHAR(36) NOT NULL PRIMARY KEY,
        login VARCHAR(50) NOT NULL,
        email VARCHAR(191) NULL,
        activated BOOLEAN NOT NULL DEFAULT FALSE,
        reset_key VARCHAR(20) NULL,
        reset_date TIMESTAMP NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT ux_user_login UNIQUE (login)
    )
"#;

/// Series and values compare byte for byte, independent of the server's
/// default collation.
pub const CREATE_PERSISTENT_TOKEN_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS persistent_token (
        series VARCHAR(20) CHARACTER SET ascii COLLATE ascii_bin NOT NULL PRIMARY KEY,
        user_id CHAR(36) NOT NULL,
        token_value VARCHAR(20) CHARACTER SET ascii COLLATE ascii_bin NOT NULL,
        token_date DATE NOT NULL,
        ip_address VARCHAR(39) NULL,
        user_agent VARCHAR(255) NULL,
        INDEX idx_persistent_token_user_id (user_id),
        INDEX idx_persistent_token_date (token_date),
        CONSTRAINT fk_persistent_token_user FOREIGN KEY (user_id)
            REFERENCES app_user (id) ON DELETE CASCADE
    )
"#;

/// Statements in dependency order
pub const STATEMENTS: [&str; 2] = [CREATE_USER_TABLE, CREATE_PERSISTENT_TOKEN_TABLE];

/// Create every table that does not exist yet
pub async fn apply(pool: &MySqlPool) -> Result<(), InfrastructureError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
