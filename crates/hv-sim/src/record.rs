//! Per-cycle loop traces.

use crate::error::SimResult;
use hv_controls::PidTerms;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// One control cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: usize,
    /// Sample time on the loop clock (seconds)
    pub time_s: f64,
    /// Process variable fed to the controller
    pub pv: f64,
    /// Airflow commanded from this cycle's output, if the loop drives a terminal
    pub airflow_cfm: Option<f64>,
    pub terms: PidTerms,
}

/// Trace of a whole loop run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopRecord {
    pub cycles: Vec<CycleRecord>,
}

/// Upper bound on cycles reserved up front; longer runs grow on push.
const MAX_RESERVED_CYCLES: usize = 4096;

impl LoopRecord {
    /// Empty record sized for `n` cycles, reserving at most
    /// `MAX_RESERVED_CYCLES` up front.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            cycles: Vec::with_capacity(n.min(MAX_RESERVED_CYCLES)),
        }
    }

    pub fn push(&mut self, record: CycleRecord) {
        self.cycles.push(record);
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CycleRecord> {
        self.cycles.iter()
    }

    pub fn mean_pv(&self) -> Option<f64> {
        if self.cycles.is_empty() {
            return None;
        }
        Some(self.cycles.iter().map(|c| c.pv).sum::<f64>() / self.cycles.len() as f64)
    }

    pub fn final_pv(&self) -> Option<f64> {
        self.cycles.last().map(|c| c.pv)
    }

    pub fn outputs(&self) -> Vec<f64> {
        self.cycles.iter().map(|c| c.terms.output).collect()
    }

    /// Cycles whose unclamped output hit a limit.
    pub fn saturated_cycles(&self) -> usize {
        self.cycles.iter().filter(|c| c.terms.is_saturated()).count()
    }

    pub fn to_csv(&self) -> String {
        let mut csv = String::from("cycle,time_s,pv,error,p,i,d,output,airflow_cfm\n");
        for c in &self.cycles {
            let airflow = c.airflow_cfm.map(|q| q.to_string()).unwrap_or_default();
            // Writing into a String cannot fail.
            let _ = writeln!(
                csv,
                "{},{},{},{},{},{},{},{},{}",
                c.cycle,
                c.time_s,
                c.pv,
                c.terms.error,
                c.terms.proportional,
                c.terms.integral,
                c.terms.derivative,
                c.terms.output,
                airflow
            );
        }
        csv
    }

    pub fn write_csv(&self, path: &Path) -> SimResult<()> {
        std::fs::write(path, self.to_csv())?;
        Ok(())
    }
}
