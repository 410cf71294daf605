//! Account creation and listing.

use norma_core::{hash_password, validate_password_strength};
use norma_models::{USER_COLUMNS, User, UserRole};
use sqlx::PgPool;

use crate::CliResult;

/// Details for a new account.
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
}

/// What happened to the admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Created,
    /// An existing user with that email was made an admin.
    Promoted,
    AlreadyAdmin,
}

fn check_password(password: &str) -> CliResult<()> {
    validate_password_strength(password).map_err(|e| {
        e.message
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Password is too weak".to_string())
    })?;
    Ok(())
}

/// Promotes the user with `account.email` to admin, or creates a new admin
/// when no such user exists.
pub async fn create_or_promote_admin(db: &PgPool, account: &NewAccount) -> CliResult<AdminOutcome> {
    let email = account.email.trim().to_lowercase();

    let existing = sqlx::query_as::<_, (i64, UserRole)>("SELECT id, role FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(db)
        .await?;

    match existing {
        Some((_, UserRole::Admin)) => Ok(AdminOutcome::AlreadyAdmin),
        Some((id, UserRole::User)) => {
            sqlx::query("UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2")
                .bind(UserRole::Admin)
                .bind(id)
                .execute(db)
                .await?;
            Ok(AdminOutcome::Promoted)
        }
        None => {
            insert_account(db, account, UserRole::Admin).await?;
            Ok(AdminOutcome::Created)
        }
    }
}

/// Creates a regular user. Fails when the email is taken.
pub async fn create_user(db: &PgPool, account: &NewAccount) -> CliResult<User> {
    insert_account(db, account, UserRole::User).await
}

async fn insert_account(db: &PgPool, account: &NewAccount, role: UserRole) -> CliResult<User> {
    check_password(&account.password)?;
    let password_hash = hash_password(&account.password).map_err(|e| e.error.to_string())?;

    let mut tx = db.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, password_hash, first_name, last_name, company, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (email) DO NOTHING
         RETURNING {USER_COLUMNS}"
    ))
    .bind(account.email.trim().to_lowercase())
    .bind(&password_hash)
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(&account.company)
    .bind(role)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(user) = user else {
        tx.rollback().await?;
        return Err("A user with this email already exists".into());
    };

    sqlx::query("INSERT INTO user_settings (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(user)
}

pub async fn list_users(db: &PgPool) -> CliResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id"
    ))
    .fetch_all(db)
    .await?;
    Ok(users)
}

/// One line per user for `list-users`.
pub fn format_user_row(user: &User) -> String {
    format!(
        "{:>6}  {:<40}  {:<5}  {}",
        user.id.into_inner(),
        user.email,
        user.role.as_str(),
        user.full_name()
    )
}
