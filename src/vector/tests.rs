#[cfg(test)]
mod units {
    use super::super::Vec3;

    #[test]
    fn normalize_very_small_vector() {
        let v = Vec3::new(1e-20, 1e-20, 1e-20);
        let normalized = v.normalize();
        assert_eq!(normalized, Vec3::zero());
    }

    #[test]
    fn normalize_unit_magnitude() {
        let v = Vec3::new(3.0, 4.0, 12.0);
        let n = v.normalize();
        assert!((n.norm() - 1.0).abs() < f64::EPSILON);
        // Direction preserved
        assert!(n.approx_eq(&(v / 13.0), 1e-12));
    }

    #[test]
    fn dot_product() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(&b), 32.0);

        // Perpendicular vectors
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.dot(&y), 0.0);
    }

    #[test]
    fn approx_eq() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(1.0000001, 2.0000001, 3.0000001);
        let v3 = Vec3::new(1.1, 2.1, 3.1);

        assert!(v1.approx_eq(&v2, 1e-6));
        assert!(!v1.approx_eq(&v2, 1e-8));
        assert!(!v1.approx_eq(&v3, 1e-6));
        assert!(v1.approx_eq(&v3, 0.2));
    }

    #[test]
    fn wrap_box_into_range() {
        let wrapped = Vec3::new(41.5, -0.5, 39.999).wrap_box(40.0);
        assert!(wrapped.approx_eq(&Vec3::new(1.5, 39.5, 39.999), 1e-12));

        // Already in range is untouched
        let inside = Vec3::new(0.0, 20.0, 39.0);
        assert_eq!(inside.wrap_box(40.0), inside);
    }

    #[test]
    fn wrap_box_never_reaches_box_size() {
        // A tiny negative coordinate wraps to just under the box length,
        // which can round to exactly box_size; the result must stay in
        // [0, L).
        let wrapped = Vec3::new(-1e-18, 0.0, 0.0).wrap_box(40.0);
        assert!(wrapped.x >= 0.0 && wrapped.x < 40.0);
    }

    #[test]
    fn min_image_folds_long_displacements() {
        let delta = Vec3::new(39.0, -39.0, 0.0).min_image(40.0);
        assert_eq!(delta, Vec3::new(-1.0, 1.0, 0.0));

        // Short displacements are untouched
        let short = Vec3::new(3.0, -4.0, 19.0);
        assert_eq!(short.min_image(40.0), short);

        // Exactly half the box is left as-is
        let half = Vec3::new(20.0, 0.0, 0.0);
        assert_eq!(half.min_image(40.0), half);
    }

    #[test]
    fn zero_scalar_multiplication() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v * 0.0, Vec3::zero());
    }

    #[test]
    fn negative_scalar_multiplication() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v * -1.0, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn assign_operators() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v += Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(v, Vec3::new(1.5, 2.5, 3.5));
        v -= Vec3::new(1.5, 2.5, 3.5);
        assert_eq!(v, Vec3::zero());
    }

    #[test]
    fn vector_properties() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);
        let v3 = Vec3::new(7.0, 8.0, 9.0);

        // Associativity of addition
        assert_eq!((v1 + v2) + v3, v1 + (v2 + v3));

        // Commutativity of addition
        assert_eq!(v1 + v2, v2 + v1);

        // Identity element
        assert_eq!(v1 + Vec3::zero(), v1);

        // Distributivity
        let scalar = 2.5;
        assert!((scalar * (v1 + v2)).approx_eq(&(scalar * v1 + scalar * v2), f64::EPSILON));
    }
}
