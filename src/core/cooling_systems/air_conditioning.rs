//! This module provides the configuration for the thermostat-controlled air
//! conditioning system acting on a thermal zone.

use crate::errors::{configuration_error, CoolsimError};
use serde::Deserialize;

/// Caller-supplied configuration of the cooling system. Read-only for the
/// duration of one simulation run; the compressor on/off state lives in the
/// controller, not here.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoolingSetup {
    pub enabled: bool,
    /// First minute of the simulation window at which the system may operate.
    pub on_time_minute: usize,
    /// Minute of the simulation window from which the system is forced off
    /// (half-open interval, so the system may run in [on_time, off_time)).
    pub off_time_minute: usize,
    /// Thermostat set point, in deg C.
    pub set_point: f64,
    /// Signed heat flow contributed while the compressor runs, in W.
    /// Negative for net cooling.
    pub cooling_power: f64,
}

impl CoolingSetup {
    /// Check the configuration against the simulation window it will run in.
    ///
    /// Arguments:
    /// * `window_length_minutes` - length of the simulation window the
    ///   operating times must fall within
    pub fn validate(&self, window_length_minutes: usize) -> Result<(), CoolsimError> {
        if self.on_time_minute > self.off_time_minute {
            return Err(configuration_error(format!(
                "cooling on time (minute {}) is after off time (minute {})",
                self.on_time_minute, self.off_time_minute
            )));
        }
        if self.off_time_minute > window_length_minutes {
            return Err(configuration_error(format!(
                "cooling off time (minute {}) is outside the {window_length_minutes}-minute simulation window",
                self.off_time_minute
            )));
        }
        if !self.set_point.is_finite() {
            return Err(configuration_error(format!(
                "cooling set point must be finite, was {}",
                self.set_point
            )));
        }
        if !self.cooling_power.is_finite() {
            return Err(configuration_error(format!(
                "cooling power must be finite, was {}",
                self.cooling_power
            )));
        }

        Ok(())
    }

    /// Whether the system is allowed to operate at the given minute of the
    /// simulation window.
    pub(crate) fn is_within_operating_time(&self, minute_of_window: usize) -> bool {
        minute_of_window >= self.on_time_minute && minute_of_window < self.off_time_minute
    }

    pub(crate) fn operating_minutes(&self) -> usize {
        self.off_time_minute - self.on_time_minute
    }
}
