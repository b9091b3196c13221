//! Topology-independent sanity checks run before synthesis.

use om_core::dim::DimWithTol;
use om_core::error::{Error, Result};

/// Implemented by every per-topology request so [`TopologyChecks::run_checks`]
/// can be shared across topologies.
pub trait TopologyChecks {
    /// How many topology-specific operating points were requested.
    fn number_of_operating_points(&self) -> usize;
    /// The requested input-voltage range.
    fn input_voltage(&self) -> &DimWithTol;
    /// The number of outputs each requested operating point declares.
    /// Non-isolated topologies (one implicit output) return a vector of
    /// `1`s; isolated topologies return each point's secondary count.
    fn outputs_per_operating_point(&self) -> Vec<usize>;

    /// Reports whether this request is well-formed: at least one operating
    /// point, an input voltage with at least one of
    /// minimum/nominal/maximum present, and (for multi-output topologies)
    /// every operating point declaring the same number of outputs.
    ///
    /// When `assert` is `true`, a failing check raises
    /// [`Error::InvalidDesignRequirements`] instead of returning `false`.
    fn run_checks(&self, assert: bool) -> Result<bool> {
        let mut failures = Vec::new();

        if self.number_of_operating_points() == 0 {
            failures.push("no operating points defined".to_string());
        }

        let input_voltage = self.input_voltage();
        if input_voltage.minimum.is_none() && input_voltage.nominal.is_none() && input_voltage.maximum.is_none() {
            failures.push("input voltage has no nominal/minimum/maximum".to_string());
        }

        let outputs = self.outputs_per_operating_point();
        if let Some(&first) = outputs.first() {
            if outputs.iter().any(|&count| count != first) {
                failures.push("operating points specify different numbers of outputs".to_string());
            }
        }

        if failures.is_empty() {
            Ok(true)
        } else if assert {
            Err(Error::InvalidDesignRequirements(failures.join("; ")))
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        operating_points: usize,
        input_voltage: DimWithTol,
        outputs: Vec<usize>,
    }

    impl TopologyChecks for Sample {
        fn number_of_operating_points(&self) -> usize {
            self.operating_points
        }
        fn input_voltage(&self) -> &DimWithTol {
            &self.input_voltage
        }
        fn outputs_per_operating_point(&self) -> Vec<usize> {
            self.outputs.clone()
        }
    }

    #[test]
    fn flags_no_operating_points() {
        let sample = Sample {
            operating_points: 0,
            input_voltage: DimWithTol::from_nominal(24.0),
            outputs: vec![],
        };
        assert_eq!(sample.run_checks(false).unwrap(), false);
        assert!(sample.run_checks(true).is_err());
    }

    #[test]
    fn flags_mismatched_output_counts() {
        let sample = Sample {
            operating_points: 2,
            input_voltage: DimWithTol::from_nominal(24.0),
            outputs: vec![2, 3],
        };
        assert_eq!(sample.run_checks(false).unwrap(), false);
    }

    #[test]
    fn accepts_well_formed_request() {
        let sample = Sample {
            operating_points: 2,
            input_voltage: DimWithTol::from_range(20.0, 240.0).unwrap(),
            outputs: vec![2, 2],
        };
        assert!(sample.run_checks(true).unwrap());
    }
}
