//! Vehicle service: the business rule engine
//!
//! Orchestrates structural validation, uniqueness and owner-protection checks
//! around the record store. Every operation opens at most one store session
//! and drops it before returning; validation failures return before a session
//! is opened.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::RulesConfig;
use crate::engine::rules::{RuleContext, RuleViolation};
use crate::engine::Validator;
use crate::error::{Result, ValidationError};
use crate::model::{eq_ignore_case, plate_key, NewVehicle, Vehicle, VehicleDraft, VehicleId};
use crate::notify::{Notifier, TracingNotifier};
use crate::store::RecordStore;

/// Business rule engine for vehicle records
#[derive(Clone)]
pub struct VehicleService {
    store: Arc<dyn RecordStore>,
    validator: Validator,
    config: Arc<RulesConfig>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl VehicleService {
    /// Create a service with the default rules built from `config`, the
    /// system clock and log notifications
    pub fn new(store: Arc<dyn RecordStore>, config: RulesConfig) -> Self {
        Self {
            store,
            validator: Validator::from_config(&config),
            config: Arc::new(config),
            notifier: Arc::new(TracingNotifier),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the rule set (rules still run in registration order)
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    fn context(&self) -> RuleContext {
        RuleContext::new(self.clock.current_year())
    }

    /// All records, newest first
    pub fn list_all(&self) -> Result<Vec<Vehicle>> {
        let session = self.store.session()?;
        let vehicles = session.list_all()?;
        tracing::debug!(count = vehicles.len(), "listed vehicles");
        Ok(vehicles)
    }

    /// The record with `id`, or `None` when it does not exist
    pub fn find_by_id(&self, id: VehicleId) -> Result<Option<Vehicle>> {
        let session = self.store.session()?;
        Ok(session.find_by_id(id)?)
    }

    /// Run structural validation and return the fields to persist
    pub fn validate(&self, draft: &VehicleDraft) -> std::result::Result<NewVehicle, ValidationError> {
        if let Err(violation) = self.validator.first_violation(draft, &self.context()) {
            tracing::info!(
                rule = %violation.rule_id,
                category = %violation.category,
                reason = %violation.error,
                "vehicle rejected"
            );
            return Err(violation.error);
        }
        NewVehicle::try_from(draft)
    }

    /// Every structural rule the draft fails, in rule order
    pub fn violations(&self, draft: &VehicleDraft) -> Vec<RuleViolation> {
        self.validator.violations(draft, &self.context())
    }

    /// Validate and insert a new record
    pub fn create(&self, draft: &VehicleDraft) -> Result<Vehicle> {
        let vehicle = self.validate(draft)?;

        let mut session = self.store.session()?;
        if session.exists_by_plate(&vehicle.plate)? {
            tracing::info!(plate = %vehicle.plate, "duplicate plate rejected");
            return Err(ValidationError::PlateAlreadyRegistered.into());
        }
        let id = session.insert(&vehicle)?;
        drop(session);

        let created = vehicle.into_vehicle(id);
        tracing::debug!(id, plate = %created.plate, "vehicle created");

        if self.is_notify_brand(&created.brand) {
            self.notifier.brand_registered(&created);
        }
        Ok(created)
    }

    /// Validate and overwrite the record with `id`
    pub fn update(&self, id: VehicleId, draft: &VehicleDraft) -> Result<()> {
        let vehicle = self.validate(draft)?;

        let mut session = self.store.session()?;
        let Some(current) = session.find_by_id(id)? else {
            return Err(ValidationError::RecordNotFound { id }.into());
        };

        let plate_changed = plate_key(&current.plate) != plate_key(&vehicle.plate);
        if plate_changed && session.exists_by_plate(&vehicle.plate)? {
            tracing::info!(id, plate = %vehicle.plate, "duplicate plate rejected");
            return Err(ValidationError::PlateAlreadyRegistered.into());
        }

        session.update_by_id(id, &vehicle)?;
        tracing::debug!(id, "vehicle updated");
        Ok(())
    }

    /// Delete the record with `id`; deleting a missing record is a no-op
    pub fn delete(&self, id: VehicleId) -> Result<()> {
        let mut session = self.store.session()?;
        let Some(current) = session.find_by_id(id)? else {
            tracing::debug!(id, "delete of missing vehicle ignored");
            return Ok(());
        };

        if eq_ignore_case(current.owner.trim(), self.config.protected_owner.trim()) {
            tracing::info!(id, owner = %current.owner, "protected owner delete rejected");
            return Err(ValidationError::ProtectedOwner.into());
        }

        session.delete_by_id(id)?;
        tracing::debug!(id, "vehicle deleted");
        Ok(())
    }

    fn is_notify_brand(&self, brand: &str) -> bool {
        eq_ignore_case(brand.trim(), self.config.notify_brand.trim())
    }
}
