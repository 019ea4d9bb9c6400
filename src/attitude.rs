// attitude.rs — Pure computation layer for the orientation pipeline
//
// Everything in this module is independent of:
//   - the platform sensor framework
//   - engine subscription state, recording, logging
//
// It takes rotation-vector samples in, produces remapped rotation matrices
// and Euler angles out. This means the whole pipeline can be unit-tested
// with recorded data and replayed offline without touching the engine shell.

use nalgebra::Matrix3;

use crate::types::{RotationSample, ScreenRotation};

// ─── Matrix builder ──────────────────────────────────────────────────────────

/// Convert a rotation-vector sample into a 3×3 rotation matrix.
///
/// Three-component samples carry the quaternion scalar implicitly; it is
/// reconstructed as `sqrt(1 − x² − y² − z²)` with the argument clamped at
/// zero so rounding overshoot in normalized inputs cannot produce NaN.
pub fn rotation_matrix_from_vector(sample: &RotationSample) -> Matrix3<f64> {
    let (x, y, z) = (sample.x, sample.y, sample.z);
    let w = sample
        .w
        .unwrap_or_else(|| (1.0 - x * x - y * y - z * z).max(0.0).sqrt());

    let sq_x = 2.0 * x * x;
    let sq_y = 2.0 * y * y;
    let sq_z = 2.0 * z * z;
    let xy = 2.0 * x * y;
    let zw = 2.0 * z * w;
    let xz = 2.0 * x * z;
    let yw = 2.0 * y * w;
    let yz = 2.0 * y * z;
    let xw = 2.0 * x * w;

    Matrix3::new(
        1.0 - sq_y - sq_z,
        xy - zw,
        xz + yw,
        xy + zw,
        1.0 - sq_x - sq_z,
        yz - xw,
        xz - yw,
        yz + xw,
        1.0 - sq_x - sq_y,
    )
}

// ─── Axis remapper ───────────────────────────────────────────────────────────

/// One of the six signed device axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignedAxis {
    X,
    MinusX,
    Y,
    MinusY,
    Z,
    MinusZ,
}

impl SignedAxis {
    fn index(self) -> usize {
        match self {
            SignedAxis::X | SignedAxis::MinusX => 0,
            SignedAxis::Y | SignedAxis::MinusY => 1,
            SignedAxis::Z | SignedAxis::MinusZ => 2,
        }
    }

    fn sign(self) -> f64 {
        match self {
            SignedAxis::X | SignedAxis::Y | SignedAxis::Z => 1.0,
            SignedAxis::MinusX | SignedAxis::MinusY | SignedAxis::MinusZ => -1.0,
        }
    }

    fn direction(self) -> (i32, i32, i32) {
        match self {
            SignedAxis::X => (1, 0, 0),
            SignedAxis::MinusX => (-1, 0, 0),
            SignedAxis::Y => (0, 1, 0),
            SignedAxis::MinusY => (0, -1, 0),
            SignedAxis::Z => (0, 0, 1),
            SignedAxis::MinusZ => (0, 0, -1),
        }
    }

    fn from_direction(direction: (i32, i32, i32)) -> Self {
        match direction {
            (1, 0, 0) => SignedAxis::X,
            (-1, 0, 0) => SignedAxis::MinusX,
            (0, 1, 0) => SignedAxis::Y,
            (0, -1, 0) => SignedAxis::MinusY,
            (0, 0, 1) => SignedAxis::Z,
            (0, 0, -1) => SignedAxis::MinusZ,
            // cross products of two distinct signed axes always land on a
            // signed axis; `AxisRemap::new` rejects parallel inputs
            _ => unreachable!("direction {direction:?} is not a signed axis"),
        }
    }
}

/// Which source axes the remapped frame reports as world X and world Z.
///
/// World Y is always the implicit third axis, chosen right-handed, so every
/// remap is a proper signed permutation and orthonormal input stays
/// orthonormal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisRemap {
    world_x: SignedAxis,
    world_z: SignedAxis,
}

impl AxisRemap {
    /// The two axes must name different device axes.
    pub fn new(world_x: SignedAxis, world_z: SignedAxis) -> Self {
        assert!(
            world_x.index() != world_z.index(),
            "remap axes must name different device axes"
        );
        Self { world_x, world_z }
    }

    /// Display-compensation table: which source axes stand in for world X
    /// and world Z at each physical screen rotation.
    pub fn for_screen_rotation(rotation: ScreenRotation) -> Self {
        let (world_x, world_z) = match rotation {
            ScreenRotation::Rot0 | ScreenRotation::Rot90 => (SignedAxis::X, SignedAxis::Z),
            ScreenRotation::Rot180 => (SignedAxis::MinusX, SignedAxis::Z),
            ScreenRotation::Rot270 => (SignedAxis::X, SignedAxis::MinusZ),
        };
        Self::new(world_x, world_z)
    }

    pub fn world_x(&self) -> SignedAxis {
        self.world_x
    }

    pub fn world_z(&self) -> SignedAxis {
        self.world_z
    }

    /// The implicit third axis: worldY = worldZ × worldX.
    pub fn world_y(&self) -> SignedAxis {
        let (zx, zy, zz) = self.world_z.direction();
        let (xx, xy, xz) = self.world_x.direction();
        SignedAxis::from_direction((zy * xz - zz * xy, zz * xx - zx * xz, zx * xy - zy * xx))
    }
}

/// Re-express `matrix` in the display-aligned frame described by `remap`.
///
/// Implemented as a signed permutation of the matrix columns — select and
/// optionally negate — never a general matrix multiply, so orthonormality
/// survives exactly up to rounding.
pub fn remap_coordinate_system(matrix: &Matrix3<f64>, remap: &AxisRemap) -> Matrix3<f64> {
    let mut out = Matrix3::zeros();
    let targets = [
        (0, remap.world_x()),
        (1, remap.world_y()),
        (2, remap.world_z()),
    ];
    for (target, axis) in targets {
        let sign = axis.sign();
        let source = axis.index();
        for row in 0..3 {
            out[(row, target)] = sign * matrix[(row, source)];
        }
    }
    out
}

// ─── Angle extractor ─────────────────────────────────────────────────────────

/// Decompose a remapped orthonormal matrix into (azimuth, pitch, roll) in
/// radians.
///
/// The asin argument is clamped to [−1, 1]: near ±90° pitch the matrix entry
/// can overshoot unity by a few ulps and asin would go NaN. No further
/// gimbal-lock handling — yaw and roll are underdetermined at the poles and
/// the caller gets whatever branch atan2 picks.
pub fn orientation_from_matrix(m: &Matrix3<f64>) -> (f64, f64, f64) {
    let azimuth = m[(0, 1)].atan2(m[(1, 1)]);
    let pitch = (-m[(2, 1)]).clamp(-1.0, 1.0).asin();
    let roll = (-m[(2, 0)]).atan2(m[(2, 2)]);
    (azimuth, pitch, roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation3, UnitQuaternion, Vector3};

    fn assert_orthonormal(m: &Matrix3<f64>) {
        let gram = m * m.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (gram[(i, j)] - expected).abs() < 1e-6,
                    "gram[({i},{j})] = {} not orthonormal",
                    gram[(i, j)]
                );
            }
        }
    }

    fn sample_from_quaternion(q: &UnitQuaternion<f64>) -> RotationSample {
        RotationSample::new(q.i, q.j, q.k, 0.0).with_scalar(q.w)
    }

    /// Matrix whose extracted angles are exactly (yaw, pitch, roll).
    fn matrix_from_angles(yaw: f64, pitch: f64, roll: f64) -> Matrix3<f64> {
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), -yaw);
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), -pitch);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), roll);
        (rz * rx * ry).into_inner()
    }

    #[test]
    fn test_builder_matches_quaternion_rotation() {
        let q = UnitQuaternion::from_euler_angles(0.3, -0.5, 1.2);
        let m = rotation_matrix_from_vector(&sample_from_quaternion(&q));
        let expected = q.to_rotation_matrix().into_inner();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(m[(i, j)], expected[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_builder_output_is_orthonormal() {
        let cases = [
            UnitQuaternion::from_euler_angles(0.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(1.1, 0.2, -2.4),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2),
        ];
        for q in cases {
            let m = rotation_matrix_from_vector(&sample_from_quaternion(&q));
            assert_orthonormal(&m);
        }
    }

    #[test]
    fn test_builder_reconstructs_implicit_scalar() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.4);
        // scalar left implicit; 0.4 rad keeps it positive so the
        // reconstruction is unambiguous
        let sample = RotationSample::new(q.i, q.j, q.k, 0.0);
        let m = rotation_matrix_from_vector(&sample);
        let expected = q.to_rotation_matrix().into_inner();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(m[(i, j)], expected[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_builder_clamps_oversized_vector() {
        // components sum past unity; implicit scalar clamps to zero instead
        // of producing NaN
        let sample = RotationSample::new(0.8, 0.7, 0.6, 0.0);
        let m = rotation_matrix_from_vector(&sample);
        assert!(m.iter().all(|v| v.is_finite()));
        let (azimuth, pitch, roll) = orientation_from_matrix(&m);
        assert!(azimuth.is_finite() && pitch.is_finite() && roll.is_finite());
    }

    #[test]
    fn test_remap_rot0_is_identity() {
        let identity = Matrix3::identity();
        let remap = AxisRemap::for_screen_rotation(ScreenRotation::Rot0);
        assert_eq!(remap_coordinate_system(&identity, &remap), identity);
    }

    #[test]
    fn test_remap_table() {
        let expectations = [
            (ScreenRotation::Rot0, SignedAxis::X, SignedAxis::Z),
            (ScreenRotation::Rot90, SignedAxis::X, SignedAxis::Z),
            (ScreenRotation::Rot180, SignedAxis::MinusX, SignedAxis::Z),
            (ScreenRotation::Rot270, SignedAxis::X, SignedAxis::MinusZ),
        ];
        for (rotation, world_x, world_z) in expectations {
            let remap = AxisRemap::for_screen_rotation(rotation);
            assert_eq!(remap.world_x(), world_x, "{rotation:?}");
            assert_eq!(remap.world_z(), world_z, "{rotation:?}");
        }
    }

    #[test]
    fn test_remap_sign_pattern_on_identity() {
        let identity = Matrix3::identity();

        let rot180 = AxisRemap::for_screen_rotation(ScreenRotation::Rot180);
        let m = remap_coordinate_system(&identity, &rot180);
        assert_eq!(m, Matrix3::from_diagonal(&Vector3::new(-1.0, -1.0, 1.0)));

        let rot270 = AxisRemap::for_screen_rotation(ScreenRotation::Rot270);
        let m = remap_coordinate_system(&identity, &rot270);
        assert_eq!(m, Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0)));
    }

    #[test]
    fn test_remap_preserves_orthonormality() {
        let q = UnitQuaternion::from_euler_angles(0.7, -1.3, 2.1);
        let m = rotation_matrix_from_vector(&sample_from_quaternion(&q));
        for rotation in [
            ScreenRotation::Rot0,
            ScreenRotation::Rot90,
            ScreenRotation::Rot180,
            ScreenRotation::Rot270,
        ] {
            let remap = AxisRemap::for_screen_rotation(rotation);
            let remapped = remap_coordinate_system(&m, &remap);
            assert_orthonormal(&remapped);
            // proper rotation, not a reflection
            assert_relative_eq!(remapped.determinant(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_angle_round_trip_interior() {
        let cases: [(f64, f64, f64); 4] = [
            (0.0, 0.0, 0.0),
            (25.0, -35.0, 60.0),
            (-130.0, 45.0, -10.0),
            (170.0, -80.0, 120.0),
        ];
        for (yaw, pitch, roll) in cases {
            let m = matrix_from_angles(yaw.to_radians(), pitch.to_radians(), roll.to_radians());
            let (az, p, r) = orientation_from_matrix(&m);
            assert_relative_eq!(az.to_degrees(), yaw, epsilon = 1e-3);
            assert_relative_eq!(p.to_degrees(), pitch, epsilon = 1e-3);
            assert_relative_eq!(r.to_degrees(), roll, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_pitch_clamped_at_pole() {
        let mut m = matrix_from_angles(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        // push the asin argument past unity the way accumulated rounding does
        m[(2, 1)] = -1.000_000_2;
        let (az, pitch, roll) = orientation_from_matrix(&m);
        assert!(pitch.is_finite());
        assert_relative_eq!(pitch.to_degrees(), 90.0, epsilon = 1e-6);
        assert!(az.is_finite() && roll.is_finite());
    }

    #[test]
    fn test_identity_sample_zero_angles() {
        let sample = RotationSample::new(0.0, 0.0, 0.0, 0.0).with_scalar(1.0);
        let m = rotation_matrix_from_vector(&sample);
        let remap = AxisRemap::for_screen_rotation(ScreenRotation::Rot0);
        let (az, pitch, roll) = orientation_from_matrix(&remap_coordinate_system(&m, &remap));
        assert_relative_eq!(az, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pitch, 0.0, epsilon = 1e-9);
        assert_relative_eq!(roll, 0.0, epsilon = 1e-9);
    }
}
