//! Simulation history and summary

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::robot_model::JointVector;
use crate::singularity::SingularityReport;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-step record of a simulation run.
///
/// All sequences have one entry per simulated step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryLog {
    /// Simulated time of each step.
    ///
    /// Units: seconds
    pub time_s: Vec<f64>,

    /// Desired joint positions
    pub q_des: Vec<JointVector>,

    /// Desired joint velocities
    pub qd_des: Vec<JointVector>,

    /// Achieved joint positions, after the step's integration
    pub q: Vec<JointVector>,

    /// Control effort applied during the step
    pub tau: Vec<JointVector>,

    /// Tracking error at the start of the step
    pub error: Vec<JointVector>,

    /// Singularity analysis of the configuration at the start of the step
    pub singularity: Vec<SingularityReport>,
}

/// A single step of the history, flattened for CSV archiving.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistoryRecord {
    pub time_s: f64,
    pub q_des_1_rad: f64,
    pub q_des_2_rad: f64,
    pub q_des_3_m: f64,
    pub q_1_rad: f64,
    pub q_2_rad: f64,
    pub q_3_m: f64,
    pub error_1_rad: f64,
    pub error_2_rad: f64,
    pub error_3_m: f64,
    pub tau_1_nm: f64,
    pub tau_2_nm: f64,
    pub tau_3_n: f64,
    pub singular: bool,
    pub rank: usize,
    pub det_linear: f64,
}

/// Summary of a complete simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSummary {
    pub num_steps: usize,
    pub num_singular: usize,

    /// Units: percent
    pub singular_percent: f64,

    pub final_q: JointVector,
    pub final_error: JointVector,

    /// Largest absolute tracking error of each joint over the run
    pub max_abs_error: JointVector,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl HistoryLog {
    /// Number of steps recorded.
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    /// Flattened record of the step at `index`, if it exists.
    pub fn record(&self, index: usize) -> Option<HistoryRecord> {
        if index >= self.len() {
            return None;
        }

        let (q_des, q, error, tau) = (
            self.q_des[index],
            self.q[index],
            self.error[index],
            self.tau[index],
        );
        let sing = self.singularity[index];

        Some(HistoryRecord {
            time_s: self.time_s[index],
            q_des_1_rad: q_des[0],
            q_des_2_rad: q_des[1],
            q_des_3_m: q_des[2],
            q_1_rad: q[0],
            q_2_rad: q[1],
            q_3_m: q[2],
            error_1_rad: error[0],
            error_2_rad: error[1],
            error_3_m: error[2],
            tau_1_nm: tau[0],
            tau_2_nm: tau[1],
            tau_3_n: tau[2],
            singular: sing.singular,
            rank: sing.rank,
            det_linear: sing.det_linear,
        })
    }

    /// Number of steps flagged as singular.
    pub fn num_singular(&self) -> usize {
        self.singularity.iter().filter(|s| s.singular).count()
    }

    /// Summarise the run, or `None` if nothing was recorded.
    pub fn summary(&self) -> Option<SimSummary> {
        let num_steps = self.len();
        let final_q = *self.q.last()?;
        let final_error = *self.error.last()?;

        let num_singular = self.num_singular();
        let singular_percent = 100.0 * (num_singular as f64) / (num_steps as f64);

        let max_abs_error = self
            .error
            .iter()
            .fold(JointVector::zeros(), |acc, e| acc.sup(&e.abs()));

        Some(SimSummary {
            num_steps,
            num_singular,
            singular_percent,
            final_q,
            final_error,
            max_abs_error,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn report(singular: bool) -> SingularityReport {
        SingularityReport {
            singular,
            rank: if singular { 2 } else { 3 },
            det_linear: 0.0,
        }
    }

    fn push(log: &mut HistoryLog, t: f64, error: JointVector, singular: bool) {
        log.time_s.push(t);
        log.q_des.push(JointVector::zeros());
        log.qd_des.push(JointVector::zeros());
        log.q.push(JointVector::repeat(t));
        log.tau.push(JointVector::zeros());
        log.error.push(error);
        log.singularity.push(report(singular));
    }

    #[test]
    fn test_summary() {
        let mut log = HistoryLog::default();
        assert!(log.summary().is_none());
        assert!(log.record(0).is_none());

        push(&mut log, 0.0, JointVector::new(0.1, -0.4, 0.0), false);
        push(&mut log, 0.01, JointVector::new(-0.3, 0.2, 0.05), true);
        push(&mut log, 0.02, JointVector::new(0.0, 0.1, -0.01), false);
        push(&mut log, 0.03, JointVector::new(0.02, 0.0, 0.0), true);

        let summary = log.summary().unwrap();
        assert_eq!(summary.num_steps, 4);
        assert_eq!(summary.num_singular, 2);
        assert!((summary.singular_percent - 50.0).abs() < 1e-12);
        assert_eq!(summary.final_q, JointVector::repeat(0.03));
        assert_eq!(summary.final_error, JointVector::new(0.02, 0.0, 0.0));
        assert_eq!(summary.max_abs_error, JointVector::new(0.3, 0.4, 0.05));

        let rec = log.record(1).unwrap();
        assert_eq!(rec.time_s, 0.01);
        assert_eq!(rec.error_1_rad, -0.3);
        assert!(rec.singular);
        assert_eq!(rec.rank, 2);
    }

    #[test]
    fn test_summary_json() {
        let mut log = HistoryLog::default();
        push(&mut log, 0.0, JointVector::new(0.1, 0.0, 0.0), true);

        let json = serde_json::to_value(log.summary().unwrap()).unwrap();
        assert_eq!(json["num_steps"], 1);
        assert_eq!(json["num_singular"], 1);
        assert_eq!(json["singular_percent"], 100.0);
        assert_eq!(json["final_q"], serde_json::json!([0.0, 0.0, 0.0]));
        assert_eq!(json["max_abs_error"], serde_json::json!([0.1, 0.0, 0.0]));
    }
}
