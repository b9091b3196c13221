//! The external transient-solver contract: `is_available`
//! / `run_simulation`, with a [`ShellNgspiceRunner`] that shells out to the
//! `ngspice` binary via `/bin/bash`, and a [`FakeNgspiceRunner`] for tests
//! that do not require the binary to be installed.

use std::collections::HashMap;
use std::process::Command;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::rawfile::parse_ascii_rawfile;
use crate::templates::{write_run_script, RunScriptContext};

/// Per-call simulation configuration.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    /// The excitation's fundamental frequency, used to decide how many
    /// periods of the solver's output to keep if `extract_one_period` is
    /// set.
    pub frequency: f64,
    /// Whether to truncate the returned series to the solver's last full
    /// period (used when the caller wants exactly one steady-state cycle).
    pub extract_one_period: bool,
    /// How many periods the underlying `.tran` analysis covered.
    pub number_of_periods: u32,
}

/// The outcome of one `run_simulation` call.
#[derive(Debug, Clone, Default)]
pub struct SimulationResult {
    /// Whether the solver completed without error.
    pub success: bool,
    /// The solver's textual error message, when `!success`.
    pub error: Option<String>,
    /// Every saved signal's name and sample series, in solver output
    /// order (including `"time"` itself).
    pub waveforms: Vec<(String, Vec<f64>)>,
    /// Wall-clock duration of the solver invocation.
    pub simulation_time: Duration,
}

impl SimulationResult {
    /// Looks up a named signal's samples.
    pub fn signal(&self, name: &str) -> Option<&[f64]> {
        self.waveforms.iter().find(|(signal, _)| signal == name).map(|(_, samples)| samples.as_slice())
    }

    /// Truncates every signal to its last `number_of_periods`-th of the
    /// series, i.e. the final period, per `extract_one_period`.
    pub fn extract_last_period(&self, number_of_periods: u32) -> SimulationResult {
        let divisor = number_of_periods.max(1) as usize;
        let waveforms = self
            .waveforms
            .iter()
            .map(|(name, samples)| {
                let one_period_len = (samples.len() / divisor).max(1);
                let start = samples.len().saturating_sub(one_period_len);
                (name.clone(), samples[start..].to_vec())
            })
            .collect();
        SimulationResult { success: self.success, error: self.error.clone(), waveforms, simulation_time: self.simulation_time }
    }
}

/// The external transient-solver contract. A single process may invoke
/// this from multiple threads concurrently so long as each call uses a
/// distinct working directory; [`ShellNgspiceRunner`]
/// satisfies this by creating a fresh [`tempfile::TempDir`] per call.
pub trait NgspiceRunner {
    /// Whether the underlying solver is installed and runnable.
    fn is_available(&self) -> bool;

    /// Runs `netlist` (a complete SPICE deck, including its own `.save`
    /// and `wrdata` directives) and returns the named series it produced.
    fn run_simulation(&self, netlist: &str, config: &SimulationConfig) -> Result<SimulationResult>;
}

/// Shells out to a real `ngspice` binary.
#[derive(Debug, Clone)]
pub struct ShellNgspiceRunner {
    /// The `ngspice` executable to invoke (default `"ngspice"`, resolved
    /// via `$PATH`).
    pub ngspice_binary: String,
    /// How long to wait for the solver before killing it and reporting
    /// [`Error::RunFailed`].
    pub timeout: Duration,
}

impl Default for ShellNgspiceRunner {
    fn default() -> Self {
        Self { ngspice_binary: "ngspice".to_string(), timeout: Duration::from_secs(60) }
    }
}

impl NgspiceRunner for ShellNgspiceRunner {
    fn is_available(&self) -> bool {
        Command::new(&self.ngspice_binary).arg("-v").output().map(|out| out.status.success()).unwrap_or(false)
    }

    fn run_simulation(&self, netlist: &str, config: &SimulationConfig) -> Result<SimulationResult> {
        if !self.is_available() {
            return Err(Error::NotAvailable);
        }

        let work_dir = tempfile::tempdir()?;
        let netlist_path = work_dir.path().join("netlist.spice");
        std::fs::write(&netlist_path, netlist)?;

        let log_path = work_dir.path().join("ngspice.log");
        let run_script_path = work_dir.path().join("simulate.sh");
        write_run_script(
            RunScriptContext { ngspice_binary: &self.ngspice_binary, netlist: &netlist_path, log_path: &log_path },
            &run_script_path,
        )?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = std::fs::metadata(&run_script_path)?.permissions();
            permissions.set_mode(0o744);
            std::fs::set_permissions(&run_script_path, permissions)?;
        }

        let started = Instant::now();
        let mut child = Command::new("/bin/bash").arg(&run_script_path).current_dir(work_dir.path()).spawn()?;

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() > self.timeout {
                let _ = child.kill();
                return Err(Error::RunFailed(format!("ngspice did not finish within {:?}", self.timeout)));
            }
            std::thread::sleep(Duration::from_millis(25));
        };
        let simulation_time = started.elapsed();

        if !status.success() {
            let log = std::fs::read_to_string(&log_path).unwrap_or_default();
            return Ok(SimulationResult { success: false, error: Some(log), waveforms: Vec::new(), simulation_time });
        }

        let output_path = work_dir.path().join("output.data");
        let output_contents = std::fs::read_to_string(&output_path)?;
        let waveforms = parse_ascii_rawfile(&output_contents)?;

        let result = SimulationResult { success: true, error: None, waveforms, simulation_time };
        Ok(if config.extract_one_period { result.extract_last_period(config.number_of_periods) } else { result })
    }
}

/// Returns canned series regardless of the netlist, for tests that should
/// not depend on an installed `ngspice` binary.
#[derive(Debug, Clone, Default)]
pub struct FakeNgspiceRunner {
    /// The result every call returns.
    pub canned: HashMap<String, SimulationResult>,
    /// The result returned when no entry in `canned` matches; falls back
    /// to a first-entry default if also absent.
    pub default_result: Option<SimulationResult>,
}

impl FakeNgspiceRunner {
    /// Creates a runner that always returns `result`, regardless of the
    /// netlist text.
    pub fn always(result: SimulationResult) -> Self {
        Self { canned: HashMap::new(), default_result: Some(result) }
    }
}

impl NgspiceRunner for FakeNgspiceRunner {
    fn is_available(&self) -> bool {
        true
    }

    fn run_simulation(&self, netlist: &str, config: &SimulationConfig) -> Result<SimulationResult> {
        let result = self
            .canned
            .iter()
            .find(|(key, _)| netlist.contains(key.as_str()))
            .map(|(_, result)| result.clone())
            .or_else(|| self.default_result.clone())
            .ok_or_else(|| Error::RunFailed("no canned result configured for this netlist".into()))?;
        Ok(if config.extract_one_period { result.extract_last_period(config.number_of_periods) } else { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canned_result() -> SimulationResult {
        SimulationResult {
            success: true,
            error: None,
            waveforms: vec![
                ("time".to_string(), vec![0.0, 1.0, 2.0, 3.0]),
                ("v(out)".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ],
            simulation_time: Duration::from_millis(1),
        }
    }

    #[test]
    fn fake_runner_returns_canned_result() {
        let runner = FakeNgspiceRunner::always(canned_result());
        let config = SimulationConfig { frequency: 100_000.0, extract_one_period: false, number_of_periods: 1 };
        let result = runner.run_simulation("* anything", &config).unwrap();
        assert_eq!(result.signal("v(out)"), Some(&[1.0, 2.0, 3.0, 4.0][..]));
    }

    #[test]
    fn extract_one_period_truncates_to_the_final_fraction() {
        let result = canned_result();
        let extracted = result.extract_last_period(2);
        assert_eq!(extracted.signal("v(out)"), Some(&[3.0, 4.0][..]));
    }
}
