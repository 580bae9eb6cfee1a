use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use sentra_types::{
    AiSystem, Operator, OperationalStatus, PolicyScope, StatusChangeRecord, SystemId, Tenant,
    TenantId,
};

use crate::error::EngineError;
use crate::status::validate_transition;

/// Source of truth for tenants, systems and operational status.
///
/// `get_system` is tenant-scoped: a lookup with the wrong tenant returns
/// the same `NotFound` as a lookup for a system that does not exist.
/// Status reads and writes go through the same store, so an enforcement
/// call never observes a stale operational status.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn get_system(
        &self,
        system_id: SystemId,
        tenant_id: TenantId,
    ) -> Result<AiSystem, EngineError>;

    async fn get_tenant_policy(&self, tenant_id: TenantId) -> Result<PolicyScope, EngineError>;

    /// Validate and apply one status transition, appending it to the
    /// system's status history.
    async fn update_operational_status(
        &self,
        system_id: SystemId,
        tenant_id: TenantId,
        target: OperationalStatus,
        reason: &str,
        operator: &Operator,
    ) -> Result<StatusChangeRecord, EngineError>;

    /// Append-only transition history for one system, oldest first.
    async fn status_history(
        &self,
        system_id: SystemId,
    ) -> Result<Vec<StatusChangeRecord>, EngineError>;
}

/// In-process registry backed by read-write-locked maps.
pub struct InMemoryRegistry {
    tenants: RwLock<HashMap<TenantId, Tenant>>,
    systems: RwLock<HashMap<SystemId, AiSystem>>,
    history: RwLock<Vec<StatusChangeRecord>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            systems: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
        }
    }

    pub fn register_tenant(&self, tenant: Tenant) {
        self.tenants.write().insert(tenant.id, tenant);
    }

    /// Register a system under an existing tenant.
    pub fn register_system(&self, system: AiSystem) -> Result<(), EngineError> {
        if !self.tenants.read().contains_key(&system.tenant_id) {
            return Err(EngineError::NotFound);
        }
        self.systems.write().insert(system.id, system);
        Ok(())
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn get_system(
        &self,
        system_id: SystemId,
        tenant_id: TenantId,
    ) -> Result<AiSystem, EngineError> {
        let systems = self.systems.read();
        match systems.get(&system_id) {
            Some(system) if system.tenant_id == tenant_id => Ok(system.clone()),
            // Wrong tenant and absent system are indistinguishable.
            _ => Err(EngineError::NotFound),
        }
    }

    async fn get_tenant_policy(&self, tenant_id: TenantId) -> Result<PolicyScope, EngineError> {
        self.tenants
            .read()
            .get(&tenant_id)
            .map(|t| t.policy.clone())
            .ok_or(EngineError::NotFound)
    }

    async fn update_operational_status(
        &self,
        system_id: SystemId,
        tenant_id: TenantId,
        target: OperationalStatus,
        reason: &str,
        operator: &Operator,
    ) -> Result<StatusChangeRecord, EngineError> {
        // Current status is read and replaced under one write lock, so a
        // concurrent enforcement call sees either the old or the new value,
        // never a torn intermediate.
        let mut systems = self.systems.write();
        let system = match systems.get_mut(&system_id) {
            Some(system) if system.tenant_id == tenant_id => system,
            _ => return Err(EngineError::NotFound),
        };

        let from = system.operational_status;
        validate_transition(from, target, operator)?;
        system.operational_status = target;

        let record = StatusChangeRecord {
            id: Uuid::new_v4(),
            system_id,
            from,
            to: target,
            reason: reason.to_string(),
            operator_id: operator.id.clone(),
            changed_at: Utc::now(),
        };
        self.history.write().push(record.clone());

        info!(
            system_id = %system_id,
            from = %from,
            to = %target,
            operator_id = %operator.id,
            "operational status changed"
        );
        Ok(record)
    }

    async fn status_history(
        &self,
        system_id: SystemId,
    ) -> Result<Vec<StatusChangeRecord>, EngineError> {
        Ok(self
            .history
            .read()
            .iter()
            .filter(|r| r.system_id == system_id)
            .cloned()
            .collect())
    }
}
