//! Geometry Primitives
//!
//! Integer and real 2D points plus the axis abstraction used by layout.
//!
//! # Design
//!
//! Integer points are always floor-truncated when written from real values,
//! so layout arithmetic that produces fractions (centering, relative sizing)
//! lands on the same cell no matter which code path computed it.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// One of the two layout axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, horizontal first
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// The perpendicular axis
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// A value stored once per axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerAxis<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PerAxis<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn splat(value: T) -> Self {
        Self { x: value, y: value }
    }

    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

// ============================================================================
// IntPoint
// ============================================================================

/// A point or size on the character grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

impl IntPoint {
    pub const ZERO: IntPoint = IntPoint { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build from real components, flooring each
    pub fn floor(x: f64, y: f64) -> Self {
        Self {
            x: floor_to_i32(x),
            y: floor_to_i32(y),
        }
    }

    pub fn splat(value: i32) -> Self {
        Self { x: value, y: value }
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Write a real value to one axis, flooring it
    pub fn set_floor(&mut self, axis: Axis, value: f64) {
        self.set(axis, floor_to_i32(value));
    }

    /// Component-wise maximum with zero
    #[must_use]
    pub fn clamp_non_negative(self) -> Self {
        Self {
            x: self.x.max(0),
            y: self.y.max(0),
        }
    }

    /// Number of cells covered when used as a size
    pub fn area(&self) -> usize {
        if self.x <= 0 || self.y <= 0 {
            0
        } else {
            self.x as usize * self.y as usize
        }
    }

    pub fn to_real(self) -> RealPoint {
        RealPoint::new(f64::from(self.x), f64::from(self.y))
    }
}

impl Add for IntPoint {
    type Output = IntPoint;

    fn add(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for IntPoint {
    type Output = IntPoint;

    fn sub(self, rhs: IntPoint) -> IntPoint {
        IntPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

fn floor_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.floor().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

// ============================================================================
// RealPoint / NormPoint
// ============================================================================

/// A sub-cell position, used for pointer coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RealPoint {
    pub x: f64,
    pub y: f64,
}

impl RealPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

impl Add for RealPoint {
    type Output = RealPoint;

    fn add(self, rhs: RealPoint) -> RealPoint {
        RealPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for RealPoint {
    type Output = RealPoint;

    fn sub(self, rhs: RealPoint) -> RealPoint {
        RealPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<IntPoint> for RealPoint {
    type Output = RealPoint;

    fn sub(self, rhs: IntPoint) -> RealPoint {
        self - rhs.to_real()
    }
}

/// A point with both components clamped to `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormPoint {
    x: f64,
    y: f64,
}

impl NormPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Clamp to `[0, 1]`, mapping NaN to zero
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_point_floors_reals() {
        assert_eq!(IntPoint::floor(3.3, 2.9), IntPoint::new(3, 2));
        assert_eq!(IntPoint::floor(-0.5, 0.0), IntPoint::new(-1, 0));

        let mut p = IntPoint::ZERO;
        p.set_floor(Axis::Y, 7.99);
        assert_eq!(p, IntPoint::new(0, 7));
    }

    #[test]
    fn test_point_arithmetic() {
        let a = IntPoint::new(4, 5);
        let b = IntPoint::new(1, 7);
        assert_eq!(a + b, IntPoint::new(5, 12));
        assert_eq!(a - b, IntPoint::new(3, -2));
        assert_eq!((a - b).clamp_non_negative(), IntPoint::new(3, 0));
    }

    #[test]
    fn test_norm_point_clamps() {
        let p = NormPoint::new(1.5, -0.2);
        assert_eq!(p.x(), 1.0);
        assert_eq!(p.y(), 0.0);
        assert_eq!(NormPoint::new(f64::NAN, 0.25).get(Axis::Y), 0.25);
    }

    #[test]
    fn test_axis_other() {
        assert_eq!(Axis::X.other(), Axis::Y);
        assert_eq!(Axis::Y.other(), Axis::X);
    }

    #[test]
    fn test_area_of_degenerate_size() {
        assert_eq!(IntPoint::new(0, 5).area(), 0);
        assert_eq!(IntPoint::new(-1, 5).area(), 0);
        assert_eq!(IntPoint::new(3, 5).area(), 15);
    }
}
