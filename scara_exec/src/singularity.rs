//! # Singularity analysis
//!
//! A configuration is singular when the geometric Jacobian loses rank, i.e.
//! the tool can no longer move instantaneously in every direction the joints
//! would otherwise allow. The determinant of the positional (top 3x3) block
//! of the Jacobian is reported alongside the rank as a diagnostic, but it is
//! not the singularity criterion: it can vanish while the full Jacobian keeps
//! its rank.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix3, SVD};
use serde::Serialize;

use crate::robot_model::{JointVector, RobotModel};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Result of analysing a single configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SingularityReport {
    /// True if the Jacobian is rank deficient.
    pub singular: bool,

    /// Numerical rank of the Jacobian.
    pub rank: usize,

    /// Determinant of the positional block of the Jacobian.
    pub det_linear: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur during singularity analysis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SingularityError {
    #[error("The joint configuration must have {expected} elements, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Analyse the configuration `q` of the given model for singularity.
///
/// `q` must have exactly as many elements as the model has joints.
pub fn analyse<M>(q: &[f64], model: &M) -> Result<SingularityReport, SingularityError>
where
    M: RobotModel + ?Sized,
{
    let num_joints = model.num_joints();
    if q.len() != num_joints {
        return Err(SingularityError::DimensionMismatch {
            expected: num_joints,
            found: q.len(),
        });
    }

    let jac = model.jacobian(&JointVector::from_column_slice(q));

    // Numerical rank, with the tolerance scaled by the largest singular value
    // and the matrix size
    let svd = SVD::new(jac, false, false);
    let tol = svd.singular_values.amax()
        * (jac.nrows().max(jac.ncols()) as f64)
        * std::f64::EPSILON;
    let rank = svd.rank(tol);

    let det_linear = Matrix3::from_fn(|r, c| jac[(r, c)]).determinant();

    Ok(SingularityReport {
        singular: rank < num_joints,
        rank,
        det_linear,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::robot_model::{Jacobian, JointMatrix, ScaraModel};
    use nalgebra::Isometry3;
    use std::f64::consts::PI;

    fn scara() -> ScaraModel {
        ScaraModel::new(util::params::from_str(include_str!("../../params/robot.toml")).unwrap())
    }

    /// Stand-in model returning a fixed Jacobian
    struct FixedJacobian(Jacobian);

    impl RobotModel for FixedJacobian {
        fn forward_kinematics(&self, _q: &JointVector) -> Isometry3<f64> {
            Isometry3::identity()
        }

        fn jacobian(&self, _q: &JointVector) -> Jacobian {
            self.0
        }

        fn mass_matrix(&self, _q: &JointVector) -> JointMatrix {
            JointMatrix::identity()
        }

        fn coriolis_matrix(&self, _q: &JointVector, _qd: &JointVector) -> JointMatrix {
            JointMatrix::zeros()
        }

        fn gravity_load(&self, _q: &JointVector) -> JointVector {
            JointVector::zeros()
        }
    }

    #[test]
    fn test_scara_keeps_full_rank() {
        let model = scara();

        // Stretched, folded and bent configurations all keep rank 3 thanks to
        // the angular rows, even where the positional determinant vanishes.
        for q2 in &[0.0, -PI, -PI / 2.0, -1.0] {
            let report = analyse(&[0.3, *q2, 0.1], &model).unwrap();

            assert_eq!(report.rank, 3);
            assert!(!report.singular);
            assert!((report.det_linear + 0.15 * q2.sin()).abs() < 1e-12);
        }

        let stretched = analyse(&[0.0, 0.0, 0.0], &model).unwrap();
        assert!(stretched.det_linear.abs() < 1e-12);
        assert!(!stretched.singular);
    }

    #[test]
    fn test_rank_deficient_is_singular() {
        // Two identical columns
        #[rustfmt::skip]
        let model = FixedJacobian(Jacobian::new(
            1.0, 1.0, 0.0,
            2.0, 2.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, 0.0, 0.0,
            0.0, 0.0, 0.0,
            1.0, 1.0, 0.0,
        ));
        let report = analyse(&[0.0, 0.0, 0.0], &model).unwrap();
        assert_eq!(report.rank, 2);
        assert!(report.singular);
        assert_eq!(report.singular, report.rank < 3);

        // Zero Jacobian
        let report = analyse(&[0.0, 0.0, 0.0], &FixedJacobian(Jacobian::zeros())).unwrap();
        assert_eq!(report.rank, 0);
        assert!(report.singular);
    }

    #[test]
    fn test_singular_flag_ignores_determinant() {
        // Full rank with a zero positional determinant (orientation rows keep
        // the rank)
        #[rustfmt::skip]
        let full_rank = FixedJacobian(Jacobian::new(
            1.0, 0.0, 0.0,
            0.0, 0.0, 0.0,
            0.0, 0.0, 1.0,
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ));
        let report = analyse(&[0.0, 0.0, 0.0], &full_rank).unwrap();
        assert_eq!(report.det_linear, 0.0);
        assert_eq!(report.rank, 3);
        assert!(!report.singular);

        // A tiny determinant on its own does not make a configuration singular
        #[rustfmt::skip]
        let small_det = FixedJacobian(Jacobian::new(
            1e-3, 0.0,  0.0,
            0.0,  1e-3, 0.0,
            0.0,  0.0,  1e-3,
            0.0,  0.0,  0.0,
            0.0,  0.0,  0.0,
            0.0,  0.0,  0.0,
        ));
        let report = analyse(&[0.0, 0.0, 0.0], &small_det).unwrap();
        assert!(report.det_linear.abs() < 1e-8);
        assert_eq!(report.rank, 3);
        assert!(!report.singular);
        assert_eq!(report.singular, report.rank < 3);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = scara();

        assert_eq!(
            analyse(&[0.0, 0.0], &model),
            Err(SingularityError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            analyse(&[0.0; 4], &model),
            Err(SingularityError::DimensionMismatch {
                expected: 3,
                found: 4
            })
        );
    }
}
