//! This module provides the lumped-capacitance thermal model of a room: the
//! whole air volume is treated as a single uniform-temperature mass exchanging
//! heat with the outdoors through the four vertical walls, with an optional
//! thermostat-controlled cooling contribution. The governing ODE
//!
//!     dT/dt = (U * A * (T_outside(t) - T) + Q_cooling(t, T)) / (m * cp)
//!
//! is integrated with classic fixed-step RK4.

use crate::core::controls::hysteresis::CompressorController;
use crate::core::cooling_systems::air_conditioning::CoolingSetup;
use crate::core::units::{
    air_density_at, celsius_to_kelvin, SECONDS_PER_MINUTE, SPECIFIC_HEAT_CAPACITY_AIR,
};
use crate::errors::{invalid_input, CoolsimError};
use crate::simulation_time::INTEGRATION_STEP_SECONDS;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomGeometry {
    /// Width of the room, in m.
    pub width: f64,
    /// Height of the room, in m.
    pub height: f64,
    /// Depth of the room, in m.
    pub depth: f64,
}

impl RoomGeometry {
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self, CoolsimError> {
        let geometry = Self {
            width,
            height,
            depth,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub(crate) fn validate(&self) -> Result<(), CoolsimError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !(value > 0.) || !value.is_finite() {
                return Err(invalid_input(format!(
                    "room {name} must be a positive length, was {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    /// Heat-loss surface area: the four vertical walls only, floor and
    /// ceiling excluded.
    pub fn heat_loss_area(&self) -> f64 {
        2. * self.height * (self.width + self.depth)
    }
}

/// A room prepared for simulation, with its thermal mass derived from the
/// geometry and the initial conditions. Stateless between simulation runs.
#[derive(Clone, Debug)]
pub struct ThermalZone {
    wall_conductance: f64,
    heat_loss_area: f64,
    air_mass: f64,
    initial_indoor_temp: f64,
}

/// Result of one simulation run: three parallel sequences with one entry per
/// recorded minute. Immutable once produced.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Elapsed time at each sample, in minutes.
    pub time_minutes: Vec<f64>,
    /// Indoor air temperature at each sample, in deg C.
    pub indoor_temps: Vec<f64>,
    /// Whether the compressor was running at each sample.
    pub compressor_running: Vec<bool>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.time_minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_minutes.is_empty()
    }
}

impl ThermalZone {
    /// Construct a ThermalZone object
    ///
    /// Arguments:
    /// * `geometry` - room dimensions, in m
    /// * `wall_conductance` - conductance coefficient of the walls, in W/(m2.K)
    /// * `initial_indoor_temp` - indoor air temperature at the start of the
    ///   window, in deg C; also the reference temperature for the air density
    pub fn new(
        geometry: RoomGeometry,
        wall_conductance: f64,
        initial_indoor_temp: f64,
    ) -> Result<Self, CoolsimError> {
        geometry.validate()?;
        if !(wall_conductance > 0.) || !wall_conductance.is_finite() {
            return Err(invalid_input(format!(
                "wall conductance must be positive, was {wall_conductance}"
            )));
        }
        if !initial_indoor_temp.is_finite() {
            return Err(invalid_input(format!(
                "initial indoor temperature must be finite, was {initial_indoor_temp}"
            )));
        }

        let reference_temp_k = celsius_to_kelvin(initial_indoor_temp)?;
        let air_mass = air_density_at(reference_temp_k) * geometry.volume();

        Ok(Self {
            wall_conductance,
            heat_loss_area: geometry.heat_loss_area(),
            air_mass,
            initial_indoor_temp,
        })
    }

    /// Integrate the heat-balance ODE over the window covered by the outdoor
    /// trace and record the indoor temperature and compressor state once per
    /// simulated minute (sample-then-advance, so each sample reflects the
    /// state just before that minute's first integration step).
    ///
    /// Arguments:
    /// * `outside_temps` - dense outdoor temperature trace, one entry per
    ///   minute, in deg C
    /// * `cooling` - optional cooling system configuration; `None` or a
    ///   disabled setup yields a passive response with an all-false
    ///   compressor trace
    pub fn run_simulation(
        &self,
        outside_temps: &[f64],
        cooling: Option<&CoolingSetup>,
    ) -> Result<SimulationResult, CoolsimError> {
        if outside_temps.is_empty() {
            return Err(invalid_input(
                "outdoor temperature trace must not be empty",
            ));
        }

        let setup = match cooling {
            Some(setup) if setup.enabled => {
                setup.validate(outside_temps.len())?;
                Some(setup)
            }
            _ => None,
        };
        let mut controller = setup.map(|setup| CompressorController::new(self.initial_indoor_temp, setup));

        let total_minutes = outside_temps.len();
        let total_seconds = total_minutes as f64 * SECONDS_PER_MINUTE as f64;
        let dt = INTEGRATION_STEP_SECONDS;
        let steps = (total_seconds / dt) as usize;

        let mut time_minutes = Vec::with_capacity(total_minutes);
        let mut indoor_temps = Vec::with_capacity(total_minutes);
        let mut compressor_running = Vec::with_capacity(total_minutes);

        let mut current_temp = self.initial_indoor_temp;
        let mut next_record_time = 0.;

        for step in 0..steps {
            let t = step as f64 * dt;

            if t >= next_record_time {
                let minute_of_window = (next_record_time / SECONDS_PER_MINUTE as f64) as usize;
                // record the effective running state: the stored flag only
                // counts while the operating window allows cooling
                let running = match (&controller, setup) {
                    (Some(c), Some(s)) => {
                        c.is_on() && s.is_within_operating_time(minute_of_window)
                    }
                    _ => false,
                };
                time_minutes.push(next_record_time / SECONDS_PER_MINUTE as f64);
                indoor_temps.push(current_temp);
                compressor_running.push(running);
                next_record_time += SECONDS_PER_MINUTE as f64;
            }

            // The controller state is updated inside every derivative
            // evaluation, so it can transition up to four times per step,
            // following the integrator's intermediate temperature estimates.
            let k1 = self.derivative(t, current_temp, outside_temps, setup, controller.as_mut());
            let k2 = self.derivative(
                t + dt / 2.,
                current_temp + dt * k1 / 2.,
                outside_temps,
                setup,
                controller.as_mut(),
            );
            let k3 = self.derivative(
                t + dt / 2.,
                current_temp + dt * k2 / 2.,
                outside_temps,
                setup,
                controller.as_mut(),
            );
            let k4 = self.derivative(
                t + dt,
                current_temp + dt * k3,
                outside_temps,
                setup,
                controller.as_mut(),
            );
            current_temp += (dt / 6.) * (k1 + 2. * k2 + 2. * k3 + k4);
        }

        Ok(SimulationResult {
            time_minutes,
            indoor_temps,
            compressor_running,
        })
    }

    /// Right-hand side of the heat-balance ODE at elapsed time `t` seconds.
    fn derivative(
        &self,
        t: f64,
        indoor_temp: f64,
        outside_temps: &[f64],
        setup: Option<&CoolingSetup>,
        controller: Option<&mut CompressorController>,
    ) -> f64 {
        let minute_of_window = (t / SECONDS_PER_MINUTE as f64) as usize;
        // clamp to the last entry if the final step reads past the trace
        let outside_temp = outside_temps[minute_of_window.min(outside_temps.len() - 1)];

        let mut heat_flow =
            self.wall_conductance * self.heat_loss_area * (outside_temp - indoor_temp);

        if let (Some(setup), Some(controller)) = (setup, controller) {
            controller.update(minute_of_window, indoor_temp, setup);
            heat_flow += controller.cooling_contribution(minute_of_window, setup);
        }

        heat_flow / (self.air_mass * SPECIFIC_HEAT_CAPACITY_AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_time::SIMULATION_WINDOW_MINUTES;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub fn geometry() -> RoomGeometry {
        RoomGeometry::new(5., 3., 4.).unwrap()
    }

    #[fixture]
    pub fn zone(geometry: RoomGeometry) -> ThermalZone {
        ThermalZone::new(geometry, 0.1, 30.0).unwrap()
    }

    #[fixture]
    pub fn cooling_setup() -> CoolingSetup {
        CoolingSetup {
            enabled: true,
            on_time_minute: 300,
            off_time_minute: 720,
            set_point: 25.0,
            cooling_power: -3000.0,
        }
    }

    #[rstest]
    fn should_derive_volume_and_wall_area_from_geometry(geometry: RoomGeometry) {
        assert_relative_eq!(geometry.volume(), 60.0);
        // four vertical walls only: 2 * 3 * (5 + 4)
        assert_relative_eq!(geometry.heat_loss_area(), 54.0);
    }

    #[rstest]
    fn should_reject_non_positive_geometry() {
        assert!(RoomGeometry::new(0., 3., 4.).is_err());
        assert!(RoomGeometry::new(5., -3., 4.).is_err());
        assert!(RoomGeometry::new(5., 3., f64::NAN).is_err());
    }

    #[rstest]
    fn should_reject_non_positive_conductance(geometry: RoomGeometry) {
        assert!(ThermalZone::new(geometry, 0., 30.).is_err());
        assert!(ThermalZone::new(geometry, -0.1, 30.).is_err());
    }

    #[rstest]
    fn should_reject_empty_outdoor_trace(zone: ThermalZone) {
        assert!(matches!(
            zone.run_simulation(&[], None),
            Err(CoolsimError::InvalidInput(_))
        ));
    }

    #[rstest]
    fn should_record_one_sample_per_minute(zone: ThermalZone, cooling_setup: CoolingSetup) {
        let outside = vec![33.0; SIMULATION_WINDOW_MINUTES];
        for cooling in [None, Some(&cooling_setup)] {
            let result = zone.run_simulation(&outside, cooling).unwrap();
            assert_eq!(result.len(), SIMULATION_WINDOW_MINUTES);
            assert_eq!(result.indoor_temps.len(), result.time_minutes.len());
            assert_eq!(result.compressor_running.len(), result.time_minutes.len());
            assert_eq!(result.time_minutes[0], 0.);
            assert_eq!(result.time_minutes[839], 839.);
        }
    }

    #[rstest]
    fn should_stay_at_equilibrium_with_matching_outdoor_trace(zone: ThermalZone) {
        // 5m x 3m x 4m room at 30 deg C with a constant 30 deg C outside:
        // zero net heat flow, so the indoor trace holds the initial value
        let outside = vec![30.0; SIMULATION_WINDOW_MINUTES];
        let result = zone.run_simulation(&outside, None).unwrap();
        for (minute, temp) in result.indoor_temps.iter().enumerate() {
            assert_relative_eq!(*temp, 30.0, epsilon = 1e-6);
            assert!(!result.compressor_running[minute]);
        }
    }

    #[rstest]
    fn should_relax_towards_outdoor_temperature(zone: ThermalZone) {
        let outside = vec![35.0; SIMULATION_WINDOW_MINUTES];
        let result = zone.run_simulation(&outside, None).unwrap();
        // passive response: monotonically approaches the outdoor temperature
        // without overshooting it
        for pair in result.indoor_temps.windows(2) {
            assert!(pair[1] >= pair[0]);
            assert!(pair[1] <= 35.0);
        }
        assert!(*result.indoor_temps.last().unwrap() > 30.0);
    }

    #[rstest]
    fn should_run_compressor_for_whole_window_under_sustained_heat(
        zone: ThermalZone,
        mut cooling_setup: CoolingSetup,
    ) {
        // outdoor trace held far above set point + band for the whole day,
        // with a cooling power too weak to pull the room down: the compressor
        // must be on for every minute inside the operating window and off
        // outside it
        cooling_setup.cooling_power = -50.0;
        let outside = vec![45.0; SIMULATION_WINDOW_MINUTES];
        let result = zone
            .run_simulation(&outside, Some(&cooling_setup))
            .unwrap();
        for (minute, running) in result.compressor_running.iter().enumerate() {
            let within_window = minute >= 300 && minute < 720;
            assert_eq!(
                *running, within_window,
                "unexpected compressor state at minute {minute}"
            );
        }
    }

    #[rstest]
    fn should_yield_all_false_compressor_trace_when_cooling_disabled(
        zone: ThermalZone,
        mut cooling_setup: CoolingSetup,
    ) {
        cooling_setup.enabled = false;
        let outside = vec![40.0; SIMULATION_WINDOW_MINUTES];
        let result = zone
            .run_simulation(&outside, Some(&cooling_setup))
            .unwrap();
        assert!(result.compressor_running.iter().all(|on| !on));
    }

    #[rstest]
    fn should_respect_hysteresis_band_in_recorded_trace(
        zone: ThermalZone,
        cooling_setup: CoolingSetup,
    ) {
        // strong cooling against a hot day produces on/off cycling; whenever
        // the recorded state flips, the temperature must have crossed the
        // relevant band edge (checked against the sample just before the flip)
        let outside = vec![38.0; SIMULATION_WINDOW_MINUTES];
        let result = zone
            .run_simulation(&outside, Some(&cooling_setup))
            .unwrap();
        let lower = cooling_setup.set_point - 1.5;
        let upper = cooling_setup.set_point + 1.5;
        for minute in 1..result.len() {
            let (was_on, is_on) = (
                result.compressor_running[minute - 1],
                result.compressor_running[minute],
            );
            if !cooling_setup.is_within_operating_time(minute) {
                continue;
            }
            // intermediate RK4 stage estimates trigger the switch, so allow
            // some slack around the band edges
            if was_on && !is_on {
                // the sample just after an off-flip sits at the lower band
                // edge plus a fraction of a minute of passive warming
                assert!(
                    result.indoor_temps[minute] <= lower + 0.1,
                    "compressor switched off at minute {minute} with temp {}",
                    result.indoor_temps[minute]
                );
            }
            if !was_on && is_on && minute > cooling_setup.on_time_minute + 1 {
                // an on-flip is approached by slow passive warming, so the
                // sample just before it sits close under the upper band edge
                assert!(
                    result.indoor_temps[minute - 1] >= upper - 0.2,
                    "compressor switched on at minute {minute} with previous temp {}",
                    result.indoor_temps[minute - 1]
                );
            }
        }
        // the cycling scenario must actually exercise both transitions
        assert!(result.compressor_running[300..720].iter().any(|on| *on));
        assert!(result.compressor_running[300..720].iter().any(|on| !on));
    }

    #[rstest]
    fn should_hold_indoor_temperature_near_set_point_with_adequate_cooling(
        zone: ThermalZone,
        cooling_setup: CoolingSetup,
    ) {
        let outside = vec![38.0; SIMULATION_WINDOW_MINUTES];
        let result = zone
            .run_simulation(&outside, Some(&cooling_setup))
            .unwrap();
        // once the controller has settled, temperatures stay within the dead
        // band (plus integration slack) during the operating window
        for minute in 360..720 {
            let temp = result.indoor_temps[minute];
            assert!(
                temp > 23.0 && temp < 27.0,
                "temperature {temp} out of band at minute {minute}"
            );
        }
    }
}
