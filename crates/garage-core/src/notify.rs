//! Observational notifications
//!
//! Notifications are a side channel: they return nothing and cannot fail the
//! operation that triggered them.

use crate::model::Vehicle;

pub trait Notifier: Send + Sync {
    /// A vehicle of the watched brand was registered
    fn brand_registered(&self, vehicle: &Vehicle);
}

/// Writes notifications to the log under the `garage::notify` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn brand_registered(&self, vehicle: &Vehicle) {
        tracing::info!(
            target: "garage::notify",
            id = vehicle.id,
            plate = %vehicle.plate,
            brand = %vehicle.brand,
            "[NOTIFICATION] {} registered, plate {}",
            vehicle.brand,
            vehicle.plate
        );
    }
}
