/// In-process store
///
/// Keeps everything in a single mutex-guarded state. Each trait call takes
/// the lock once, so compare-and-set operations are atomic with respect to
/// each other. Used by the test suites and local runs without PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{
    Administrator, AdministratorChanges, NewAdministrator, Page, PageRequest, RefreshTokenRecord,
    Vehicle, VehicleData, VehicleFilter,
};
use crate::error::{AppError, DatabaseError};
use crate::store::{AdministratorStore, CredentialStore, VehicleStore};

#[derive(Default)]
struct MemoryState {
    next_administrator_id: i64,
    next_vehicle_id: i64,
    administrators: Vec<Administrator>,
    vehicles: Vec<Vehicle>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::Database(DatabaseError::ConnectionPool("store lock poisoned".to_string())))
    }

    /// Number of refresh-token records currently held.
    pub fn refresh_token_count(&self) -> Result<usize, AppError> {
        Ok(self.state()?.refresh_tokens.len())
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_administrator_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Administrator>, AppError> {
        let state = self.state()?;
        Ok(state.administrators.iter().find(|a| a.email == email).cloned())
    }

    async fn find_administrator_by_id(&self, id: i64) -> Result<Option<Administrator>, AppError> {
        let state = self.state()?;
        Ok(state.administrators.iter().find(|a| a.id == id).cloned())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let state = self.state()?;
        Ok(state.refresh_tokens.get(token).cloned())
    }

    async fn save_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        let mut state = self.state()?;
        if state.refresh_tokens.contains_key(&record.token) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "refresh token already exists".to_string(),
            )));
        }
        state.refresh_tokens.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn mark_refresh_token_used(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut state = self.state()?;
        match state.refresh_tokens.get_mut(token) {
            Some(record) if record.is_redeemable_at(now) => {
                record.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate_refresh_token(&self, token: &str) -> Result<bool, AppError> {
        let mut state = self.state()?;
        match state.refresh_tokens.get_mut(token) {
            Some(record) if !record.used && !record.invalid => {
                record.invalid = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AdministratorStore for InMemoryStore {
    async fn list_administrators(
        &self,
        page: PageRequest,
    ) -> Result<Vec<Administrator>, AppError> {
        let state = self.state()?;
        let active: Vec<_> = state
            .administrators
            .iter()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        Ok(paginate(&active, page))
    }

    async fn insert_administrator(
        &self,
        administrator: NewAdministrator,
        actor: &str,
    ) -> Result<Administrator, AppError> {
        let mut state = self.state()?;
        if state.administrators.iter().any(|a| a.email == administrator.email) {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already registered".to_string(),
            )));
        }

        state.next_administrator_id += 1;
        let created = Administrator {
            id: state.next_administrator_id,
            email: administrator.email,
            password_hash: administrator.password_hash,
            role: administrator.role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            created_by: Some(actor.to_string()),
            updated_by: None,
        };
        state.administrators.push(created.clone());
        Ok(created)
    }

    async fn update_administrator(
        &self,
        id: i64,
        changes: AdministratorChanges,
        actor: &str,
    ) -> Result<Option<Administrator>, AppError> {
        let mut state = self.state()?;
        if state
            .administrators
            .iter()
            .any(|a| a.id != id && a.email == changes.email)
        {
            return Err(AppError::Database(DatabaseError::UniqueConstraintViolation(
                "Email already registered".to_string(),
            )));
        }

        let Some(existing) = state
            .administrators
            .iter_mut()
            .find(|a| a.id == id && a.is_active)
        else {
            return Ok(None);
        };

        existing.email = changes.email;
        existing.role = changes.role;
        if let Some(password_hash) = changes.password_hash {
            existing.password_hash = password_hash;
        }
        existing.updated_at = Some(Utc::now());
        existing.updated_by = Some(actor.to_string());
        Ok(Some(existing.clone()))
    }

    async fn deactivate_administrator(&self, id: i64, actor: &str) -> Result<bool, AppError> {
        let mut state = self.state()?;
        match state
            .administrators
            .iter_mut()
            .find(|a| a.id == id && a.is_active)
        {
            Some(existing) => {
                existing.is_active = false;
                existing.updated_at = Some(Utc::now());
                existing.updated_by = Some(actor.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl VehicleStore for InMemoryStore {
    async fn list_vehicles(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Page<Vehicle>, AppError> {
        let state = self.state()?;
        let matching: Vec<_> = state
            .vehicles
            .iter()
            .filter(|v| v.is_active && filter.matches(v))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        Ok(Page::new(paginate(&matching, page), page, total))
    }

    async fn find_vehicle(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let state = self.state()?;
        Ok(state
            .vehicles
            .iter()
            .find(|v| v.id == id && v.is_active)
            .cloned())
    }

    async fn insert_vehicle(&self, vehicle: VehicleData, actor: &str) -> Result<Vehicle, AppError> {
        let mut state = self.state()?;
        state.next_vehicle_id += 1;
        let created = Vehicle {
            id: state.next_vehicle_id,
            name: vehicle.name,
            brand: vehicle.brand,
            year: vehicle.year,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            created_by: Some(actor.to_string()),
            updated_by: None,
        };
        state.vehicles.push(created.clone());
        Ok(created)
    }

    async fn update_vehicle(
        &self,
        id: i64,
        vehicle: VehicleData,
        actor: &str,
    ) -> Result<Option<Vehicle>, AppError> {
        let mut state = self.state()?;
        let Some(existing) = state.vehicles.iter_mut().find(|v| v.id == id && v.is_active) else {
            return Ok(None);
        };

        existing.name = vehicle.name;
        existing.brand = vehicle.brand;
        existing.year = vehicle.year;
        existing.updated_at = Some(Utc::now());
        existing.updated_by = Some(actor.to_string());
        Ok(Some(existing.clone()))
    }

    async fn deactivate_vehicle(&self, id: i64, actor: &str) -> Result<bool, AppError> {
        let mut state = self.state()?;
        match state.vehicles.iter_mut().find(|v| v.id == id && v.is_active) {
            Some(existing) => {
                existing.is_active = false;
                existing.updated_at = Some(Utc::now());
                existing.updated_by = Some(actor.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
