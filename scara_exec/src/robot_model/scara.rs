//! Closed form SCARA model
//!
//! Both revolute axes are parallel to the base frame's +Z axis. The prismatic
//! joint drives the tool along -Z, so that an extension `q3` puts the tool at
//! `z = -q3`. The links are modelled as point masses at their centres of mass
//! plus an optional inertia about the vertical axis, with the prismatic link
//! carried at the tool.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use std::f64::consts::PI;

// Internal
use super::{Jacobian, JointMatrix, JointVector, Params, RobotModel};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Analytic model of a 2R + 1P SCARA manipulator.
#[derive(Debug, Clone)]
pub struct ScaraModel {
    params: Params,

    /// Constant part of M11.
    inertia_a: f64,

    /// M22, also the constant part of M12.
    inertia_b: f64,

    /// Coupling coefficient of the two revolute links.
    inertia_h: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScaraModel {
    /// Build a new model from the given parameters.
    pub fn new(params: Params) -> Self {
        let (l1, l2) = (params.l1(), params.l2());
        let [m1, m2, m3] = params.link_masses_kg;
        let [lc1, lc2, _] = params.link_com_offsets_m;
        let [i1, i2, _] = params.link_inertias_kgm2;

        let inertia_a = i1
            + i2
            + m1 * lc1.powi(2)
            + m2 * (l1.powi(2) + lc2.powi(2))
            + m3 * (l1.powi(2) + l2.powi(2));
        let inertia_b = i2 + m2 * lc2.powi(2) + m3 * l2.powi(2);
        let inertia_h = l1 * (m2 * lc2 + m3 * l2);

        Self {
            params,
            inertia_a,
            inertia_b,
            inertia_h,
        }
    }

    /// The parameters this model was built from.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl RobotModel for ScaraModel {
    fn forward_kinematics(&self, q: &JointVector) -> Isometry3<f64> {
        let (l1, l2) = (self.params.l1(), self.params.l2());
        let q12 = q[0] + q[1];

        let translation = Translation3::new(
            l1 * q[0].cos() + l2 * q12.cos(),
            l1 * q[0].sin() + l2 * q12.sin(),
            -q[2],
        );

        // Tool Z points down the prismatic axis
        let rotation = UnitQuaternion::from_euler_angles(PI, 0.0, q12);

        Isometry3::from_parts(translation, rotation)
    }

    fn jacobian(&self, q: &JointVector) -> Jacobian {
        let (l1, l2) = (self.params.l1(), self.params.l2());
        let q12 = q[0] + q[1];
        let (s1, c1) = q[0].sin_cos();
        let (s12, c12) = q12.sin_cos();

        #[rustfmt::skip]
        let jac = Jacobian::new(
            -l1 * s1 - l2 * s12, -l2 * s12,  0.0,
             l1 * c1 + l2 * c12,  l2 * c12,  0.0,
             0.0,                 0.0,      -1.0,
             0.0,                 0.0,       0.0,
             0.0,                 0.0,       0.0,
             1.0,                 1.0,       0.0,
        );

        jac
    }

    fn mass_matrix(&self, q: &JointVector) -> JointMatrix {
        let c2 = q[1].cos();
        let m3 = self.params.link_masses_kg[2];

        let m11 = self.inertia_a + 2.0 * self.inertia_h * c2;
        let m12 = self.inertia_b + self.inertia_h * c2;

        #[rustfmt::skip]
        let mass = JointMatrix::new(
            m11, m12,             0.0,
            m12, self.inertia_b,  0.0,
            0.0, 0.0,             m3,
        );

        mass
    }

    fn coriolis_matrix(&self, q: &JointVector, qd: &JointVector) -> JointMatrix {
        let hs2 = self.inertia_h * q[1].sin();

        #[rustfmt::skip]
        let coriolis = JointMatrix::new(
            -hs2 * qd[1], -hs2 * (qd[0] + qd[1]), 0.0,
             hs2 * qd[0],  0.0,                   0.0,
             0.0,          0.0,                   0.0,
        );

        coriolis
    }

    fn gravity_load(&self, _q: &JointVector) -> JointVector {
        // Only the prismatic joint works against gravity. Extending it lowers
        // the carried mass, so the load is negative.
        JointVector::new(
            0.0,
            0.0,
            -self.params.link_masses_kg[2] * self.params.gravity_ms2,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    fn reference_params() -> Params {
        util::params::from_str(include_str!("../../../params/robot.toml")).unwrap()
    }

    #[test]
    fn test_forward_kinematics() {
        let model = ScaraModel::new(reference_params());

        // Fully stretched along X
        let pose = model.forward_kinematics(&JointVector::new(0.0, 0.0, 0.1));
        assert!((pose.translation.vector - Vector3::new(0.8, 0.0, -0.1)).norm() < 1e-12);

        // Tool axis points down
        let tool_z = pose.rotation * Vector3::z();
        assert!((tool_z - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);

        // Elbow bent back by 90 degrees from the home position
        let pose = model.forward_kinematics(&JointVector::new(0.0, -PI / 2.0, 0.0));
        assert!((pose.translation.vector - Vector3::new(0.5, -0.3, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_jacobian_matches_fk() {
        let model = ScaraModel::new(reference_params());
        let q = JointVector::new(0.4, -1.1, 0.07);
        let jac = model.jacobian(&q);

        // Central differences of the FK position give the linear block
        let step = 1e-6;
        for j in 0..3 {
            let mut dq = JointVector::zeros();
            dq[j] = step;
            let fwd = model.forward_kinematics(&(q + dq)).translation.vector;
            let bwd = model.forward_kinematics(&(q - dq)).translation.vector;
            let deriv = (fwd - bwd) / (2.0 * step);

            for i in 0..3 {
                assert!(
                    (jac[(i, j)] - deriv[i]).abs() < 1e-6,
                    "J[{}, {}] = {}, expected {}",
                    i,
                    j,
                    jac[(i, j)],
                    deriv[i]
                );
            }
        }

        // Positional determinant is -L1 L2 sin(q2)
        let jac_v = JointMatrix::from_fn(|r, c| jac[(r, c)]);
        assert!((jac_v.determinant() + 0.5 * 0.3 * (-1.1f64).sin()).abs() < 1e-12);
    }

    #[test]
    fn test_mass_matrix() {
        let model = ScaraModel::new(reference_params());

        for q2 in &[-PI, -2.0, -PI / 2.0, -0.3, 0.0] {
            let mass = model.mass_matrix(&JointVector::new(0.2, *q2, 0.1));

            assert_eq!(mass, mass.transpose());
            assert!(mass.cholesky().is_some());
            assert_eq!(mass[(2, 2)], 0.5);
        }

        // Hand computed at q2 = -pi/2, where the coupling vanishes
        let mass = model.mass_matrix(&JointVector::new(0.0, -PI / 2.0, 0.0));
        assert!((mass[(0, 0)] - 0.53625).abs() < 1e-12);
        assert!((mass[(0, 1)] - 0.0675).abs() < 1e-12);
        assert!((mass[(1, 1)] - 0.0675).abs() < 1e-12);
    }

    #[test]
    fn test_coriolis_skew_symmetry() {
        // Mdot - 2C must be skew symmetric for a consistent C
        let model = ScaraModel::new(reference_params());
        let q = JointVector::new(0.3, -0.9, 0.05);
        let qd = JointVector::new(0.7, -1.3, 0.2);

        let step = 1e-6;
        let mass_dot = (model.mass_matrix(&(q + qd * step))
            - model.mass_matrix(&(q - qd * step)))
            / (2.0 * step);
        let n = mass_dot - 2.0 * model.coriolis_matrix(&q, &qd);

        assert!((n + n.transpose()).amax() < 1e-6);
    }

    #[test]
    fn test_gravity_load() {
        let model = ScaraModel::new(reference_params());
        let g = model.gravity_load(&JointVector::new(1.0, -1.0, 0.1));

        assert_eq!(g[0], 0.0);
        assert_eq!(g[1], 0.0);
        assert!((g[2] + 0.5 * 9.81).abs() < 1e-12);
    }
}
