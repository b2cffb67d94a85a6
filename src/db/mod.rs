mod models;

pub use models::*;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use crate::error::ApiError;
use crate::ident::generate_learning_id;

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Inserts a new certificate with a freshly generated learning id.
///
/// Required fields are checked here so an invalid record is never
/// persisted. A learning-id collision trips the UNIQUE constraint and
/// comes back as `ApiError::Duplicate`; callers may retry with a fresh id.
pub async fn create_certificate(
    pool: &PgPool,
    candidate_name: &str,
    course_name: &str,
) -> Result<Certificate, ApiError> {
    let candidate_name = candidate_name.trim();
    let course_name = course_name.trim();
    validate_required(candidate_name, course_name)?;

    let learning_id = generate_learning_id();

    let certificate = sqlx::query_as::<_, Certificate>(
        r#"
        INSERT INTO certificates (candidate_name, course_name, learning_id)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(candidate_name)
    .bind(course_name)
    .bind(&learning_id)
    .fetch_one(pool)
    .await?;

    Ok(certificate)
}

/// Required-field check; runs before anything touches the database so an
/// invalid record is never persisted.
fn validate_required(candidate_name: &str, course_name: &str) -> Result<(), ApiError> {
    if candidate_name.is_empty() {
        return Err(ApiError::Validation("candidateName is required".into()));
    }
    if course_name.is_empty() {
        return Err(ApiError::Validation("courseName is required".into()));
    }
    Ok(())
}

pub async fn get_certificate_by_learning_id(
    pool: &PgPool,
    learning_id: &str,
) -> Result<Option<Certificate>, ApiError> {
    let certificate = sqlx::query_as::<_, Certificate>(
        "SELECT * FROM certificates WHERE learning_id = $1",
    )
    .bind(learning_id)
    .fetch_optional(pool)
    .await?;

    Ok(certificate)
}

pub async fn list_certificates(pool: &PgPool) -> Result<Vec<Certificate>, ApiError> {
    let certificates =
        sqlx::query_as::<_, Certificate>("SELECT * FROM certificates ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(certificates)
}

/// Updates only the fields that were supplied. The learning id and
/// creation date are never touched.
pub async fn update_certificate(
    pool: &PgPool,
    id: i32,
    candidate_name: Option<&str>,
    course_name: Option<&str>,
) -> Result<Option<Certificate>, ApiError> {
    let candidate_name = candidate_name.map(str::trim);
    let course_name = course_name.map(str::trim);

    if candidate_name == Some("") {
        return Err(ApiError::Validation("candidateName must not be empty".into()));
    }
    if course_name == Some("") {
        return Err(ApiError::Validation("courseName must not be empty".into()));
    }

    let certificate = sqlx::query_as::<_, Certificate>(
        r#"
        UPDATE certificates
        SET candidate_name = COALESCE($2, candidate_name),
            course_name = COALESCE($3, course_name)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(candidate_name)
    .bind(course_name)
    .fetch_optional(pool)
    .await?;

    Ok(certificate)
}

pub async fn delete_certificate(pool: &PgPool, id: i32) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn insert_admin(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<(), ApiError> {
    sqlx::query("INSERT INTO admins (username, password_hash) VALUES ($1, $2)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_admin_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Admin>, ApiError> {
    let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_candidate_name_is_rejected() {
        assert!(matches!(
            validate_required("", "Systems Design"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn empty_course_name_is_rejected() {
        assert!(matches!(
            validate_required("Jane Doe", ""),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn present_names_pass() {
        assert!(validate_required("Jane Doe", "Systems Design").is_ok());
    }
}
