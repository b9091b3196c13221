//! A minimal parser for ngspice's ASCII rawfile format (`.options
//! filetype=ascii`), used by [`crate::runner::ShellNgspiceRunner`] to turn
//! a completed transient run into named sample series.
//!
//! The binary nutmeg rawfile format that ngspice also supports is out of
//! scope: the adapter always forces ASCII output via the run-script
//! template, so only that variant needs to be understood here.

use crate::error::{Error, Result};

/// One parsed variable declaration: its column index and name.
struct VariableDecl {
    name: String,
}

/// Parses an ngspice ASCII rawfile, returning one `(name, samples)` pair
/// per declared variable (including `time` itself), in declaration order.
pub fn parse_ascii_rawfile(contents: &str) -> Result<Vec<(String, Vec<f64>)>> {
    let mut lines = contents.lines();

    let mut number_variables = None;
    let mut number_points = None;
    let mut variables: Vec<VariableDecl> = Vec::new();

    loop {
        let Some(line) = lines.next() else {
            return Err(Error::RawfileParse("rawfile ended before a Values: section".into()));
        };
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("No. Variables:") {
            number_variables = Some(rest.trim().parse::<usize>().map_err(|e| Error::RawfileParse(e.to_string()))?);
        } else if let Some(rest) = trimmed.strip_prefix("No. Points:") {
            number_points = Some(rest.trim().parse::<usize>().map_err(|e| Error::RawfileParse(e.to_string()))?);
        } else if trimmed == "Variables:" {
            let count = number_variables
                .ok_or_else(|| Error::RawfileParse("Variables: section before No. Variables:".into()))?;
            for _ in 0..count {
                let decl_line = lines
                    .next()
                    .ok_or_else(|| Error::RawfileParse("truncated Variables: section".into()))?;
                let mut fields = decl_line.split_whitespace();
                let _index = fields.next();
                let name = fields
                    .next()
                    .ok_or_else(|| Error::RawfileParse("malformed variable declaration".into()))?;
                variables.push(VariableDecl { name: name.to_string() });
            }
        } else if trimmed == "Values:" {
            break;
        }
    }

    let number_points = number_points.ok_or_else(|| Error::RawfileParse("missing No. Points:".into()))?;
    let mut series: Vec<Vec<f64>> = variables.iter().map(|_| Vec::with_capacity(number_points)).collect();

    for point in 0..number_points {
        let header_line = lines
            .next()
            .ok_or_else(|| Error::RawfileParse(format!("truncated Values: section at point {point}")))?;
        let mut fields = header_line.trim().split_whitespace();
        let _index = fields.next();
        let first_value: f64 = fields
            .next()
            .ok_or_else(|| Error::RawfileParse("missing first value in Values: row".into()))?
            .parse()
            .map_err(|e: std::num::ParseFloatError| Error::RawfileParse(e.to_string()))?;
        series[0].push(first_value);

        for variable_series in series.iter_mut().skip(1) {
            let value_line = lines
                .next()
                .ok_or_else(|| Error::RawfileParse(format!("truncated Values: section at point {point}")))?;
            let value: f64 = value_line
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| Error::RawfileParse(e.to_string()))?;
            variable_series.push(value);
        }
    }

    Ok(variables.into_iter().map(|decl| decl.name).zip(series).collect())
}
