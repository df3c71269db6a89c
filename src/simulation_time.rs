use crate::core::units::MINUTES_PER_HOUR;

/// Number of minutes in the fixed daily simulation window. The window covers
/// 05:00 to 19:00 local time, so minute 0 of the simulation corresponds to
/// 05:00 and minute 839 to 18:59.
pub const SIMULATION_WINDOW_MINUTES: usize = 840;

/// Hour of day at which the simulation window opens.
pub const WINDOW_START_HOUR: u32 = 5;

/// Length of one integration step of the thermal model, in seconds.
pub(crate) const INTEGRATION_STEP_SECONDS: f64 = 10.;

/// Iterator over the whole minutes of the simulation window, used when
/// traces are sampled or written out one row per minute.
#[derive(Clone, Debug)]
pub struct SimulationWindowIterator {
    current_minute: usize,
    total_minutes: usize,
}

impl SimulationWindowIterator {
    pub fn new() -> Self {
        Self::with_length(SIMULATION_WINDOW_MINUTES)
    }

    pub(crate) fn with_length(total_minutes: usize) -> Self {
        Self {
            current_minute: 0,
            total_minutes,
        }
    }
}

impl Default for SimulationWindowIterator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationMinute {
    /// Whole minutes elapsed since the window opened.
    pub index: usize,
}

impl SimulationMinute {
    pub fn hour_of_window(&self) -> usize {
        self.index / MINUTES_PER_HOUR as usize
    }

    pub fn minute_of_hour(&self) -> usize {
        self.index % MINUTES_PER_HOUR as usize
    }

    /// Wall-clock label for this minute, e.g. minute 30 renders as "05:30".
    pub fn clock_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            WINDOW_START_HOUR as usize + self.hour_of_window(),
            self.minute_of_hour()
        )
    }
}

impl Iterator for SimulationWindowIterator {
    type Item = SimulationMinute;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_minute < self.total_minutes {
            let minute = SimulationMinute {
                index: self.current_minute,
            };
            self.current_minute += 1;
            Some(minute)
        } else {
            None
        }
    }
}
