/// Persistence seams
///
/// `CredentialStore` is what the auth core consumes. The administrator and
/// vehicle stores back the CRUD routes. Both backends implement all three.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Administrator, AdministratorChanges, NewAdministrator, Page, PageRequest, RefreshTokenRecord,
    Vehicle, VehicleData, VehicleFilter,
};
use crate::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Administrator and refresh-token lookups used by login and rotation.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive email match. Returns inactive accounts too.
    async fn find_administrator_by_email(&self, email: &str)
        -> Result<Option<Administrator>, AppError>;

    /// Returns inactive accounts too.
    async fn find_administrator_by_id(&self, id: i64) -> Result<Option<Administrator>, AppError>;

    async fn find_refresh_token(&self, token: &str)
        -> Result<Option<RefreshTokenRecord>, AppError>;

    async fn save_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;

    /// Compare-and-set `used = true`, guarded by `used = false`,
    /// `invalid = false` and `expires_at > now`. Returns whether the
    /// transition was applied; of concurrent callers at most one sees `true`.
    async fn mark_refresh_token_used(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    /// Compare-and-set `invalid = true` on a record that is neither used
    /// nor invalid. Returns whether the transition was applied.
    async fn invalidate_refresh_token(&self, token: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AdministratorStore: Send + Sync {
    /// Active administrators ordered by id.
    async fn list_administrators(&self, page: PageRequest)
        -> Result<Vec<Administrator>, AppError>;

    /// Fails with `DatabaseError::UniqueConstraintViolation` on a taken email.
    async fn insert_administrator(
        &self,
        administrator: NewAdministrator,
        actor: &str,
    ) -> Result<Administrator, AppError>;

    /// `None` when no active administrator has this id.
    async fn update_administrator(
        &self,
        id: i64,
        changes: AdministratorChanges,
        actor: &str,
    ) -> Result<Option<Administrator>, AppError>;

    /// Soft delete. `false` when no active administrator has this id.
    async fn deactivate_administrator(&self, id: i64, actor: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Active vehicles matching the filter, ordered by id.
    async fn list_vehicles(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, AppError>;

    /// Active vehicle by id.
    async fn find_vehicle(&self, id: i64) -> Result<Option<Vehicle>, AppError>;

    async fn insert_vehicle(&self, vehicle: VehicleData, actor: &str)
        -> Result<Vehicle, AppError>;

    async fn update_vehicle(
        &self,
        id: i64,
        vehicle: VehicleData,
        actor: &str,
    ) -> Result<Option<Vehicle>, AppError>;

    async fn deactivate_vehicle(&self, id: i64, actor: &str) -> Result<bool, AppError>;
}
