//! This module contains the tiered (block) electricity rate schedule and the
//! cost estimation for the cooling system's energy consumption.

use crate::core::cooling_systems::air_conditioning::CoolingSetup;
use crate::core::units::{MINUTES_PER_HOUR, WATTS_PER_KILOWATT};
use crate::errors::{invalid_input, CoolsimError};
use itertools::Itertools;
use serde::Deserialize;

/// A tiered residential rate schedule: consumption is charged block by block
/// at increasing unit prices, with a fuel-adjustment (FT) surcharge per kWh,
/// a flat monthly service fee and tax on top. Loaded as a constant
/// configuration and never mutated.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffSchedule {
    /// Upper bound of each block, in kWh, monotonically increasing. The last
    /// block is unbounded (conceptually infinite).
    block_upper_bounds_kwh: Vec<f64>,
    /// Unit rate charged within each block, in currency/kWh.
    block_rates: Vec<f64>,
    /// Flat monthly service fee, in currency.
    service_fee: f64,
    /// Fuel-adjustment surcharge, in currency/kWh.
    ft_rate: f64,
    /// Tax applied to the subtotal, in percent.
    vat_percent: f64,
}

/// Cost of running the cooling system at three aggregation levels, in the
/// schedule's currency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperatingCostBreakdown {
    pub hourly: f64,
    pub daily: f64,
    pub monthly: f64,
}

impl TariffSchedule {
    pub fn new(
        block_upper_bounds_kwh: Vec<f64>,
        block_rates: Vec<f64>,
        service_fee: f64,
        ft_rate: f64,
        vat_percent: f64,
    ) -> Result<Self, CoolsimError> {
        if block_upper_bounds_kwh.is_empty() {
            return Err(invalid_input("rate schedule must contain at least one block"));
        }
        if block_upper_bounds_kwh.len() != block_rates.len() {
            return Err(invalid_input(format!(
                "rate schedule has {} block bounds but {} rates",
                block_upper_bounds_kwh.len(),
                block_rates.len()
            )));
        }
        if !block_upper_bounds_kwh
            .iter()
            .tuple_windows()
            .all(|(lower, upper)| lower < upper)
        {
            return Err(invalid_input(
                "rate schedule block bounds must be monotonically increasing",
            ));
        }

        Ok(Self {
            block_upper_bounds_kwh,
            block_rates,
            service_fee,
            ft_rate,
            vat_percent,
        })
    }

    /// The 2024 residential electricity rate, in THB.
    pub fn residential_2024() -> Self {
        Self {
            block_upper_bounds_kwh: vec![15., 25., 35., 100., 150., 400., f64::INFINITY],
            block_rates: vec![2.3488, 2.9882, 3.2405, 3.6237, 3.7171, 4.2218, 4.4217],
            service_fee: 38.22,
            ft_rate: 0.6889,
            vat_percent: 7.0,
        }
    }

    /// Walk the blocks, charging each consumed slice at its block rate until
    /// the total consumption is used up.
    pub(crate) fn energy_charge(&self, total_kwh: f64) -> f64 {
        let mut energy_charge = 0.;
        let mut remaining_kwh = total_kwh;

        for (i, rate) in self.block_rates.iter().enumerate() {
            let block_kwh = if i == 0 {
                remaining_kwh.min(self.block_upper_bounds_kwh[i])
            } else if i < self.block_rates.len() - 1 {
                remaining_kwh
                    .min(self.block_upper_bounds_kwh[i] - self.block_upper_bounds_kwh[i - 1])
            } else {
                // last block absorbs whatever is left
                remaining_kwh
            };

            if block_kwh <= 0. {
                break;
            }

            energy_charge += block_kwh * rate;
            remaining_kwh -= block_kwh;
        }

        energy_charge
    }

    /// Estimate the monthly cost attributable to the cooling system.
    ///
    /// The energy charge for the household's total consumption is computed
    /// from the tiered blocks and then attributed to the cooling load in
    /// proportion to its share of that total. The flat service fee is
    /// prorated by the same share, which is dimensionally odd for a fixed
    /// fee but preserved deliberately for compatibility with the established
    /// estimates.
    ///
    /// Arguments:
    /// * `cooling` - the cooling configuration the compressor trace was
    ///   produced with; a disabled or absent configuration costs nothing
    /// * `days_in_month` - days the daily profile is scaled over
    /// * `existing_usage_kwh` - monthly household consumption before the
    ///   cooling system is added, in kWh
    /// * `compressor_trace` - minute-by-minute compressor state from the
    ///   simulation
    pub fn estimate_monthly_cost(
        &self,
        cooling: Option<&CoolingSetup>,
        days_in_month: u32,
        existing_usage_kwh: f64,
        compressor_trace: &[bool],
    ) -> f64 {
        let setup = match cooling {
            Some(setup) if setup.enabled && !compressor_trace.is_empty() => setup,
            _ => return 0.,
        };

        let active_minutes = compressor_trace.iter().filter(|running| **running).count();

        let daily_kwh = (setup.cooling_power.abs() / WATTS_PER_KILOWATT as f64)
            * (active_minutes as f64 / MINUTES_PER_HOUR as f64);
        let monthly_kwh = daily_kwh * days_in_month as f64;
        let total_monthly_kwh = existing_usage_kwh + monthly_kwh;

        if total_monthly_kwh <= 0. {
            return 0.;
        }

        let energy_charge = self.energy_charge(total_monthly_kwh);

        let ac_proportion = monthly_kwh / total_monthly_kwh;
        let ac_energy_charge = energy_charge * ac_proportion;
        let ft_charge = monthly_kwh * self.ft_rate;
        let service_charge = self.service_fee * ac_proportion;

        let subtotal = ac_energy_charge + ft_charge + service_charge;
        let vat = subtotal * (self.vat_percent / 100.);

        subtotal + vat
    }

    /// Break the monthly estimate down to daily and per-operating-hour cost.
    pub fn estimate_operating_cost(
        &self,
        cooling: Option<&CoolingSetup>,
        days_in_month: u32,
        existing_usage_kwh: f64,
        compressor_trace: &[bool],
    ) -> OperatingCostBreakdown {
        let monthly =
            self.estimate_monthly_cost(cooling, days_in_month, existing_usage_kwh, compressor_trace);
        let daily = if days_in_month > 0 {
            monthly / days_in_month as f64
        } else {
            0.
        };

        let operating_hours = cooling
            .map(|setup| setup.operating_minutes() as f64 / MINUTES_PER_HOUR as f64)
            .unwrap_or_default();
        let hourly = if operating_hours > 0. {
            daily / operating_hours
        } else {
            0.
        };

        OperatingCostBreakdown {
            hourly,
            daily,
            monthly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub fn rate() -> TariffSchedule {
        TariffSchedule::residential_2024()
    }

    #[fixture]
    pub fn setup() -> CoolingSetup {
        CoolingSetup {
            enabled: true,
            on_time_minute: 300,
            off_time_minute: 720,
            set_point: 25.0,
            cooling_power: -3000.0,
        }
    }

    fn trace_with_active_minutes(active: usize) -> Vec<bool> {
        let mut trace = vec![false; 840];
        for running in trace.iter_mut().take(active) {
            *running = true;
        }
        trace
    }

    #[rstest]
    fn should_reject_mismatched_blocks_and_rates() {
        assert!(TariffSchedule::new(vec![15., 25.], vec![2.3], 38.22, 0.6889, 7.0).is_err());
    }

    #[rstest]
    fn should_reject_non_monotonic_block_bounds() {
        assert!(
            TariffSchedule::new(vec![25., 15.], vec![2.3, 2.9], 38.22, 0.6889, 7.0).is_err()
        );
    }

    #[rstest]
    fn should_charge_first_block_rate_for_small_consumption(rate: TariffSchedule) {
        assert_relative_eq!(rate.energy_charge(10.), 10. * 2.3488, max_relative = 1e-12);
    }

    #[rstest]
    fn should_charge_across_blocks(rate: TariffSchedule) {
        // 30 kWh: 15 @ 2.3488, 10 @ 2.9882, 5 @ 3.2405
        let expected = 15. * 2.3488 + 10. * 2.9882 + 5. * 3.2405;
        assert_relative_eq!(rate.energy_charge(30.), expected, max_relative = 1e-12);
    }

    #[rstest]
    fn should_charge_top_block_for_unbounded_remainder(rate: TariffSchedule) {
        let expected = 15. * 2.3488
            + 10. * 2.9882
            + 10. * 3.2405
            + 65. * 3.6237
            + 50. * 3.7171
            + 250. * 4.2218
            + 100. * 4.4217;
        assert_relative_eq!(rate.energy_charge(500.), expected, max_relative = 1e-12);
    }

    #[rstest]
    fn should_cost_nothing_without_active_cooling(rate: TariffSchedule, mut setup: CoolingSetup) {
        assert_eq!(rate.estimate_monthly_cost(None, 30, 100., &[true; 840]), 0.);
        assert_eq!(
            rate.estimate_monthly_cost(Some(&setup), 30, 100., &[]),
            0.
        );
        setup.enabled = false;
        assert_eq!(
            rate.estimate_monthly_cost(Some(&setup), 30, 100., &[true; 840]),
            0.
        );
    }

    #[rstest]
    fn should_cost_nothing_for_all_false_trace_and_no_existing_usage(
        rate: TariffSchedule,
        setup: CoolingSetup,
    ) {
        assert_eq!(
            rate.estimate_monthly_cost(Some(&setup), 30, 0., &vec![false; 840]),
            0.
        );
    }

    #[rstest]
    fn should_match_hand_calculated_monthly_cost(rate: TariffSchedule, setup: CoolingSetup) {
        // 3 kW compressor running 420 minutes a day: 21 kWh/day, 630 kWh over
        // a 30-day month, on top of 100 kWh existing usage
        let trace = trace_with_active_minutes(420);
        let monthly_kwh = 3.0 * 7.0 * 30.;
        let total_kwh = 100. + monthly_kwh;
        let energy_charge = rate.energy_charge(total_kwh);
        let proportion = monthly_kwh / total_kwh;
        let subtotal =
            energy_charge * proportion + monthly_kwh * 0.6889 + 38.22 * proportion;
        let expected = subtotal * 1.07;

        assert_relative_eq!(
            rate.estimate_monthly_cost(Some(&setup), 30, 100., &trace),
            expected,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_never_cost_less_as_existing_usage_grows(rate: TariffSchedule, setup: CoolingSetup) {
        let trace = trace_with_active_minutes(420);
        let costs: Vec<f64> = [0., 50., 100., 250., 500., 1000.]
            .iter()
            .map(|existing| rate.estimate_monthly_cost(Some(&setup), 30, *existing, &trace))
            .collect();
        for pair in costs.windows(2) {
            assert!(
                pair[1] >= pair[0],
                "cost decreased from {} to {} as existing usage grew",
                pair[0],
                pair[1]
            );
        }
    }

    #[rstest]
    fn should_scale_breakdown_from_monthly_cost(rate: TariffSchedule, setup: CoolingSetup) {
        let trace = trace_with_active_minutes(420);
        let breakdown = rate.estimate_operating_cost(Some(&setup), 30, 100., &trace);
        assert_relative_eq!(breakdown.daily, breakdown.monthly / 30., max_relative = 1e-12);
        // 420 operating minutes = 7 hours a day
        assert_relative_eq!(
            breakdown.hourly,
            breakdown.daily / 7.,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_report_zero_hourly_cost_for_empty_operating_window(
        rate: TariffSchedule,
        mut setup: CoolingSetup,
    ) {
        setup.on_time_minute = 400;
        setup.off_time_minute = 400;
        let breakdown =
            rate.estimate_operating_cost(Some(&setup), 30, 100., &trace_with_active_minutes(0));
        assert_eq!(breakdown.hourly, 0.);
    }
}
