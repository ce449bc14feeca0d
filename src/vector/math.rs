//! Vector math operations for Vec3
//! Provides norms, dot product, normalization, approximate comparison, and
//! the periodic-boundary helpers (box wrap and minimum-image displacement).

use super::Vec3;

impl Vec3 {
    /// Calculates the squared magnitude of the vector.
    ///
    /// More efficient than `norm()` as it avoids the square root; the
    /// contact test compares squared distances for exactly this reason.
    ///
    /// # Examples
    /// ```
    /// # use kinetics_lib::vector::Vec3;
    /// let v = Vec3::new(3.0, 4.0, 0.0);
    /// assert_eq!(v.norm_squared(), 25.0);
    /// ```
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculates the magnitude of the vector: √(x² + y² + z²).
    ///
    /// # Examples
    /// ```
    /// # use kinetics_lib::vector::Vec3;
    /// let v = Vec3::new(3.0, 4.0, 0.0);
    /// assert_eq!(v.norm(), 5.0);
    /// ```
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Returns a unit vector in the same direction as this vector.
    ///
    /// If the vector has near-zero magnitude (within floating-point
    /// epsilon), returns the zero vector to avoid division by zero.
    ///
    /// # Examples
    /// ```
    /// # use kinetics_lib::vector::Vec3;
    /// let v = Vec3::new(3.0, 4.0, 0.0);
    /// assert!((v.normalize().norm() - 1.0).abs() < f64::EPSILON);
    /// assert_eq!(Vec3::zero().normalize(), Vec3::zero());
    /// ```
    pub fn normalize(&self) -> Self {
        let norm_sq = self.norm_squared();
        if norm_sq > f64::EPSILON * f64::EPSILON {
            let inv_norm = norm_sq.sqrt().recip();
            Vec3 {
                x: self.x * inv_norm,
                y: self.y * inv_norm,
                z: self.z * inv_norm,
            }
        } else {
            Vec3::zero()
        }
    }

    /// Calculates the dot product with another vector.
    ///
    /// The collision math projects relative velocities onto the contact
    /// normal with this.
    ///
    /// # Examples
    /// ```
    /// # use kinetics_lib::vector::Vec3;
    /// let a = Vec3::new(1.0, 2.0, 3.0);
    /// let b = Vec3::new(4.0, 5.0, 6.0);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component-wise approximate equality within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }

    /// Wraps each component into `[0, box_size)`.
    ///
    /// Uses the non-negative remainder, with a fold-back guard for the case
    /// where rounding lands the remainder exactly on `box_size`.
    ///
    /// # Examples
    /// ```
    /// # use kinetics_lib::vector::Vec3;
    /// let v = Vec3::new(41.0, -1.0, 12.0).wrap_box(40.0);
    /// assert_eq!(v, Vec3::new(1.0, 39.0, 12.0));
    /// ```
    #[inline]
    pub fn wrap_box(&self, box_size: f64) -> Self {
        #[inline]
        fn wrap(value: f64, length: f64) -> f64 {
            let r = value.rem_euclid(length);
            if r >= length { r - length } else { r }
        }
        Vec3 {
            x: wrap(self.x, box_size),
            y: wrap(self.y, box_size),
            z: wrap(self.z, box_size),
        }
    }

    /// Minimum-image form of a displacement vector.
    ///
    /// Shifts each component by ±`box_size` so that it lies within
    /// `(-box_size/2, box_size/2]`, giving the shortest displacement across
    /// periodic boundaries.
    ///
    /// # Examples
    /// ```
    /// # use kinetics_lib::vector::Vec3;
    /// let delta = Vec3::new(39.0, -39.0, 0.0).min_image(40.0);
    /// assert_eq!(delta, Vec3::new(-1.0, 1.0, 0.0));
    /// ```
    #[inline]
    pub fn min_image(&self, box_size: f64) -> Self {
        #[inline]
        fn fold(mut value: f64, length: f64) -> f64 {
            let half = length * 0.5;
            if value > half {
                value -= length;
            } else if value < -half {
                value += length;
            }
            value
        }
        Vec3 {
            x: fold(self.x, box_size),
            y: fold(self.y, box_size),
            z: fold(self.z, box_size),
        }
    }
}
