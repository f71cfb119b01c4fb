/// PostgreSQL store
///
/// Refresh tokens are persisted as SHA-256 digests; the plaintext only ever
/// lives with the client. Lookups hash the presented token first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::domain::{
    Administrator, AdministratorChanges, NewAdministrator, Page, PageRequest, RefreshTokenRecord,
    Role, Vehicle, VehicleData, VehicleFilter,
};
use crate::error::{AppError, DatabaseError};
use crate::store::{AdministratorStore, CredentialStore, VehicleStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Hash a refresh token using SHA-256
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(sqlx::FromRow)]
struct AdministratorRow {
    id: i64,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    created_by: Option<String>,
    updated_by: Option<String>,
}

impl TryFrom<AdministratorRow> for Administrator {
    type Error = AppError;

    fn try_from(row: AdministratorRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|_| {
            AppError::Database(DatabaseError::QueryExecution(format!(
                "administrator {} has unknown role",
                row.id
            )))
        })?;

        Ok(Administrator {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    jwt_id: String,
    administrator_id: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used: bool,
    invalid: bool,
}

#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: i64,
    name: String,
    brand: String,
    year: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    created_by: Option<String>,
    updated_by: Option<String>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Vehicle {
            id: row.id,
            name: row.name,
            brand: row.brand,
            year: row.year,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        }
    }
}

const ADMINISTRATOR_COLUMNS: &str =
    "id, email, password_hash, role, is_active, created_at, updated_at, created_by, updated_by";

const VEHICLE_COLUMNS: &str =
    "id, name, brand, year, is_active, created_at, updated_at, created_by, updated_by";

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_administrator_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Administrator>, AppError> {
        let query = format!("SELECT {} FROM administrators WHERE email = $1", ADMINISTRATOR_COLUMNS);
        sqlx::query_as::<_, AdministratorRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(Administrator::try_from)
            .transpose()
    }

    async fn find_administrator_by_id(&self, id: i64) -> Result<Option<Administrator>, AppError> {
        let query = format!("SELECT {} FROM administrators WHERE id = $1", ADMINISTRATOR_COLUMNS);
        sqlx::query_as::<_, AdministratorRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Administrator::try_from)
            .transpose()
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT jwt_id, administrator_id, created_at, expires_at, used, invalid
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| RefreshTokenRecord {
            token: token.to_string(),
            jwt_id: row.jwt_id,
            administrator_id: row.administrator_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
            used: row.used,
            invalid: row.invalid,
        }))
    }

    async fn save_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens
                (token_hash, jwt_id, administrator_id, created_at, expires_at, used, invalid)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(hash_token(&record.token))
        .bind(&record.jwt_id)
        .bind(record.administrator_id)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.used)
        .bind(record.invalid)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_refresh_token_used(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET used = true
            WHERE token_hash = $1 AND used = false AND invalid = false AND expires_at > $2
            "#,
        )
        .bind(hash_token(token))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn invalidate_refresh_token(&self, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET invalid = true
            WHERE token_hash = $1 AND used = false AND invalid = false
            "#,
        )
        .bind(hash_token(token))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl AdministratorStore for PgStore {
    async fn list_administrators(
        &self,
        page: PageRequest,
    ) -> Result<Vec<Administrator>, AppError> {
        let query = format!(
            "SELECT {} FROM administrators WHERE is_active = true ORDER BY id LIMIT $1 OFFSET $2",
            ADMINISTRATOR_COLUMNS
        );
        sqlx::query_as::<_, AdministratorRow>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Administrator::try_from)
            .collect()
    }

    async fn insert_administrator(
        &self,
        administrator: NewAdministrator,
        actor: &str,
    ) -> Result<Administrator, AppError> {
        let query = format!(
            r#"
            INSERT INTO administrators (email, password_hash, role, is_active, created_at, created_by)
            VALUES ($1, $2, $3, true, $4, $5)
            RETURNING {}
            "#,
            ADMINISTRATOR_COLUMNS
        );
        let row = sqlx::query_as::<_, AdministratorRow>(&query)
            .bind(&administrator.email)
            .bind(&administrator.password_hash)
            .bind(administrator.role.as_str())
            .bind(Utc::now())
            .bind(actor)
            .fetch_one(&self.pool)
            .await?;

        Administrator::try_from(row)
    }

    async fn update_administrator(
        &self,
        id: i64,
        changes: AdministratorChanges,
        actor: &str,
    ) -> Result<Option<Administrator>, AppError> {
        let query = format!(
            r#"
            UPDATE administrators
            SET email = $2,
                role = $3,
                password_hash = COALESCE($4, password_hash),
                updated_at = $5,
                updated_by = $6
            WHERE id = $1 AND is_active = true
            RETURNING {}
            "#,
            ADMINISTRATOR_COLUMNS
        );
        sqlx::query_as::<_, AdministratorRow>(&query)
            .bind(id)
            .bind(&changes.email)
            .bind(changes.role.as_str())
            .bind(changes.password_hash.as_deref())
            .bind(Utc::now())
            .bind(actor)
            .fetch_optional(&self.pool)
            .await?
            .map(Administrator::try_from)
            .transpose()
    }

    async fn deactivate_administrator(&self, id: i64, actor: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE administrators
            SET is_active = false, updated_at = $2, updated_by = $3
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl VehicleStore for PgStore {
    async fn list_vehicles(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, AppError> {
        let predicate = r#"
            is_active = true
            AND ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\')
            AND ($2::TEXT IS NULL OR brand ILIKE $2 ESCAPE '\')
        "#;
        let name = filter.name.as_deref().map(like_pattern);
        let brand = filter.brand.as_deref().map(like_pattern);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM vehicles WHERE {}", predicate))
                .bind(name.as_deref())
                .bind(brand.as_deref())
                .fetch_one(&self.pool)
                .await?;

        let query = format!(
            "SELECT {} FROM vehicles WHERE {} ORDER BY id LIMIT $3 OFFSET $4",
            VEHICLE_COLUMNS, predicate
        );
        let items = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(name.as_deref())
            .bind(brand.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Vehicle::from)
            .collect();

        Ok(Page::new(items, page, total))
    }

    async fn find_vehicle(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let query = format!(
            "SELECT {} FROM vehicles WHERE id = $1 AND is_active = true",
            VEHICLE_COLUMNS
        );
        let row = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Vehicle::from))
    }

    async fn insert_vehicle(&self, vehicle: VehicleData, actor: &str) -> Result<Vehicle, AppError> {
        let query = format!(
            r#"
            INSERT INTO vehicles (name, brand, year, is_active, created_at, created_by)
            VALUES ($1, $2, $3, true, $4, $5)
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        );
        let row = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(&vehicle.name)
            .bind(&vehicle.brand)
            .bind(vehicle.year)
            .bind(Utc::now())
            .bind(actor)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn update_vehicle(
        &self,
        id: i64,
        vehicle: VehicleData,
        actor: &str,
    ) -> Result<Option<Vehicle>, AppError> {
        let query = format!(
            r#"
            UPDATE vehicles
            SET name = $2, brand = $3, year = $4, updated_at = $5, updated_by = $6
            WHERE id = $1 AND is_active = true
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        );
        let row = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(id)
            .bind(&vehicle.name)
            .bind(&vehicle.brand)
            .bind(vehicle.year)
            .bind(Utc::now())
            .bind(actor)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Vehicle::from))
    }

    async fn deactivate_vehicle(&self, id: i64, actor: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET is_active = false, updated_at = $2, updated_by = $3
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Substring pattern for `ILIKE ... ESCAPE '\'` that matches `value` literally
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("civ"), "%civ%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn test_token_hashing() {
        let hash1 = hash_token("refresh-token");
        let hash2 = hash_token("refresh-token");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, "refresh-token");
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_tokens_different_hashes() {
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }
}
