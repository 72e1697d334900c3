//! Garage Core
//!
//! Business rule engine for the garage vehicle catalog.
//!
//! ## Architecture
//!
//! 1. **Model** (`model`): stored records, candidate drafts and validated fields.
//! 2. **Engine** (`engine`): ordered structural validation rules.
//! 3. **Service** (`service`): create, update, delete, list and lookup,
//!    coordinating the rules with the record store.
//! 4. **Store** (`store`): the record store contract implemented by
//!    `garage-storage`.
//! 5. **Config** (`config`): rule thresholds, palette, protected owner,
//!    notification brand and denylist.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use garage_core::{RecordStore, RulesConfig, VehicleDraft, VehicleService};
//!
//! fn register(store: Arc<dyn RecordStore>) -> garage_core::Result<()> {
//!     let service = VehicleService::new(store, RulesConfig::default());
//!     let draft = VehicleDraft::new()
//!         .plate("ABC123")
//!         .brand("Toyota")
//!         .model_year("2019")
//!         .color("Rojo")
//!         .owner("Maria Lopez");
//!     let created = service.create(&draft)?;
//!     println!("registered #{}", created.id);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ColorEntry, ConfigError, RulesConfig};
pub use engine::rules::{Rule, RuleCategory, RuleContext, RuleViolation};
pub use engine::Validator;
pub use error::{EngineError, Result, StorageError, ValidationError};
pub use model::{plate_key, Field, NewVehicle, Vehicle, VehicleDraft, VehicleId};
pub use notify::{Notifier, TracingNotifier};
pub use service::VehicleService;
pub use store::{RecordStore, StoreSession};
