use crate::core::thermal_zone::SimulationResult;
use crate::external_conditions::ExternalConditions;
use crate::simulation_time::SimulationWindowIterator;
use itertools::izip;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf) -> Self {
        Self { directory_path }
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        Ok(BufWriter::new(File::create(
            self.directory_path.join(format!("{location_key}.csv")),
        )?))
    }
}

impl Output for &FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_location_key(self, location_key)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Write the minute-by-minute traces of one simulation run as CSV: a heading
/// row, a units row and one row per recorded minute.
pub fn write_simulation_results_file(
    output: impl Output,
    external_conditions: &ExternalConditions,
    result: &SimulationResult,
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }

    let writer = output.writer_for_location_key("results")?;
    let mut writer = csv::WriterBuilder::new().from_writer(writer);

    writer.write_record(["Minute", "Clock time", "Outdoor temp", "Indoor temp", "Compressor"])?;
    writer.write_record(["[count]", "[hh:mm]", "[deg C]", "[deg C]", "[on/off]"])?;

    for (minute, time, indoor_temp, running) in izip!(
        SimulationWindowIterator::with_length(result.len()),
        &result.time_minutes,
        &result.indoor_temps,
        &result.compressor_running,
    ) {
        writer.write_record([
            time.to_string(),
            minute.clock_label(),
            external_conditions.air_temp(minute.index).to_string(),
            indoor_temp.to_string(),
            if *running { "on" } else { "off" }.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
