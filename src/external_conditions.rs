//! This module turns a sparse hourly outdoor-temperature forecast into the
//! dense per-minute trace the thermal model integrates against. The hourly
//! samples are interpolated with a cubic Hermite curve using Catmull-Rom
//! tangents, eased near hour boundaries, and finished with a truncated
//! Gaussian smoothing pass.

use crate::core::units::MINUTES_PER_HOUR;
use crate::errors::{invalid_input, CoolsimError};
use crate::simulation_time::SIMULATION_WINDOW_MINUTES;

/// Minutes either side of an hour boundary over which the Hermite value is
/// blended towards the 4-point control-point average.
const EDGE_EASE_MINUTES: usize = 5;
/// Maximum weight of that blend, reached at the boundary itself.
const EDGE_EASE_MAX_BLEND: f64 = 0.3;
/// Half-width of the final Gaussian smoothing window, in minutes.
const SMOOTHING_HALF_WIDTH: usize = 30;

/// Dense outdoor conditions covering one simulation window: exactly one air
/// temperature per simulated minute. Built once per simulation request and
/// treated as read-only afterwards.
#[derive(Clone, Debug)]
pub struct ExternalConditions {
    air_temps: Vec<f64>,
}

impl ExternalConditions {
    /// Build the dense trace from hourly forecast samples spanning the
    /// simulation window.
    ///
    /// Arguments:
    /// * `hourly_temps` - ordered hourly temperature samples, in deg C
    ///   (length >= 1; an empty forecast is rejected)
    pub fn from_hourly_forecast(hourly_temps: &[f64]) -> Result<Self, CoolsimError> {
        Ok(Self {
            air_temps: build_minutely_trace(hourly_temps)?,
        })
    }

    /// Use an already-dense per-minute trace as-is, e.g. a synthetic trace in
    /// a test harness or data prepared by an external collaborator.
    pub fn from_minutely(air_temps: Vec<f64>) -> Result<Self, CoolsimError> {
        if air_temps.is_empty() {
            return Err(invalid_input("outdoor temperature trace must not be empty"));
        }
        if let Some(bad) = air_temps.iter().find(|temp| !temp.is_finite()) {
            return Err(invalid_input(format!(
                "outdoor temperature trace contains non-finite value {bad}"
            )));
        }
        Ok(Self { air_temps })
    }

    pub fn air_temps(&self) -> &[f64] {
        &self.air_temps
    }

    /// Air temperature at the given minute of the window, clamped to the last
    /// entry past the end of the trace.
    pub fn air_temp(&self, minute_of_window: usize) -> f64 {
        self.air_temps[minute_of_window.min(self.air_temps.len() - 1)]
    }
}

/// Interpolate hourly samples to a fixed-length per-minute sequence. At each
/// hour boundary the output reproduces the input sample for that hour (up to
/// the attenuation of the final smoothing pass); intermediate minutes follow
/// a shape-preserving cubic through the samples.
pub fn build_minutely_trace(hourly_temps: &[f64]) -> Result<Vec<f64>, CoolsimError> {
    if hourly_temps.is_empty() {
        return Err(invalid_input(
            "hourly temperature forecast must contain at least one sample",
        ));
    }
    if let Some(bad) = hourly_temps.iter().find(|temp| !temp.is_finite()) {
        return Err(invalid_input(format!(
            "hourly temperature forecast contains non-finite value {bad}"
        )));
    }

    let expanded = pad_with_synthetic_endpoints(hourly_temps);

    let minutes_per_hour = MINUTES_PER_HOUR as usize;
    let mut minutely_temps = Vec::with_capacity(SIMULATION_WINDOW_MINUTES);

    for minute in 0..SIMULATION_WINDOW_MINUTES {
        let hour_index = minute / minutes_per_hour;
        let minute_of_hour = minute % minutes_per_hour;

        // at or past the last interior segment: clamp to the final sample,
        // no extrapolation past the data
        if hour_index >= hourly_temps.len() - 1 {
            minutely_temps.push(hourly_temps[hourly_temps.len() - 1]);
            continue;
        }

        let frac = minute_of_hour as f64 / minutes_per_hour as f64;

        // four control points around the segment, offset by the two
        // synthetic points prepended to the series
        let idx = hour_index + 2;
        let p0 = expanded[idx - 1];
        let p1 = expanded[idx];
        let p2 = expanded[idx + 1];
        let p3 = expanded[idx + 2];

        let mut interpolated = hermite(p0, p1, p2, p3, frac);

        // ease out visible kinks at hour transitions by blending towards the
        // moving average of the four control points; interior segments only,
        // so sampled-hour values at the series edges are untouched
        let ease_start = minutes_per_hour - EDGE_EASE_MINUTES;
        if minute_of_hour < EDGE_EASE_MINUTES || minute_of_hour > ease_start {
            if hour_index > 0 && hour_index < hourly_temps.len() - 2 {
                let window_avg = (p0 + p1 + p2 + p3) / 4.;
                let blend_factor = if minute_of_hour < EDGE_EASE_MINUTES {
                    1. - minute_of_hour as f64 / EDGE_EASE_MINUTES as f64
                } else {
                    (minute_of_hour - ease_start) as f64 / EDGE_EASE_MINUTES as f64
                };
                interpolated = interpolated * (1. - blend_factor * EDGE_EASE_MAX_BLEND)
                    + window_avg * (blend_factor * EDGE_EASE_MAX_BLEND);
            }
        }

        minutely_temps.push(interpolated);
    }

    Ok(gaussian_smooth(&minutely_temps))
}

/// Pad the hourly series with two synthetic points at each end, extrapolated
/// linearly from the first/last observed interval (or repeating the boundary
/// value when only one sample exists), so every interpolated segment has four
/// control points.
fn pad_with_synthetic_endpoints(hourly_temps: &[f64]) -> Vec<f64> {
    let mut expanded = Vec::with_capacity(hourly_temps.len() + 4);

    let first = hourly_temps[0];
    let last = hourly_temps[hourly_temps.len() - 1];

    if hourly_temps.len() >= 2 {
        let slope = hourly_temps[1] - hourly_temps[0];
        expanded.push(first - 2. * slope);
        expanded.push(first - slope);
    } else {
        expanded.push(first);
        expanded.push(first);
    }

    expanded.extend_from_slice(hourly_temps);

    if hourly_temps.len() >= 2 {
        let slope = last - hourly_temps[hourly_temps.len() - 2];
        expanded.push(last + slope);
        expanded.push(last + 2. * slope);
    } else {
        expanded.push(last);
        expanded.push(last);
    }

    expanded
}

/// Cubic Hermite basis evaluated with uniform Catmull-Rom tangents.
fn hermite(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2. * t3 - 3. * t2 + 1.;
    let h10 = t3 - 2. * t2 + t;
    let h01 = -2. * t3 + 3. * t2;
    let h11 = t3 - t2;

    let m0 = 0.5 * (p2 - p0);
    let m1 = 0.5 * (p3 - p1);

    h00 * p1 + h10 * m0 + h01 * p2 + h11 * m1
}

/// Truncated Gaussian convolution over the interior of the trace. The first
/// and last half-window minutes have no full neighbourhood and are left as
/// interpolated; this is an accepted boundary trade-off.
fn gaussian_smooth(minutely_temps: &[f64]) -> Vec<f64> {
    let mut smoothed = minutely_temps.to_vec();

    let window = SMOOTHING_HALF_WIDTH as isize;
    // integer division, giving sigma = 10 for the 30-minute half-width
    let sigma = (SMOOTHING_HALF_WIDTH / 3) as f64;

    for i in SMOOTHING_HALF_WIDTH..minutely_temps.len().saturating_sub(SMOOTHING_HALF_WIDTH) {
        let (sum, weight_sum) = (-window..=window)
            .map(|j| {
                let weight = (-((j * j) as f64) / (2. * sigma * sigma)).exp();
                (minutely_temps[(i as isize + j) as usize] * weight, weight)
            })
            .fold((0., 0.), |(sum, weight_sum), (value, weight)| {
                (sum + value, weight_sum + weight)
            });
        smoothed[i] = sum / weight_sum;
    }

    smoothed
}
