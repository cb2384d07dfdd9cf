use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Sub, SubAssign};

/// Plain 3-component vector. Axis `0`, `1`, `2` map to `x`, `y`, `z`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct F64x3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl F64x3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        F64x3 { x, y, z }
    }

    pub const fn zero() -> Self {
        F64x3 { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub const fn splat(v: f64) -> Self {
        F64x3 { x: v, y: v, z: v }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm_sqr(self) -> f64 {
        self.dot(self)
    }

    pub fn norm(self) -> f64 {
        f64::sqrt(self.norm_sqr())
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        F64x3 {
            x: f64::min(self.x, other.x),
            y: f64::min(self.y, other.y),
            z: f64::min(self.z, other.z),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        F64x3 {
            x: f64::max(self.x, other.x),
            y: f64::max(self.y, other.y),
            z: f64::max(self.z, other.z),
        }
    }
}

impl From<[f64; 3]> for F64x3 {
    fn from(a: [f64; 3]) -> Self {
        F64x3::new(a[0], a[1], a[2])
    }
}

impl From<F64x3> for [f64; 3] {
    fn from(v: F64x3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl Index<usize> for F64x3 {
    type Output = f64;
    fn index(&self, dim: usize) -> &f64 {
        match dim {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("F64x3 axis out of range: {}", dim),
        }
    }
}

impl IndexMut<usize> for F64x3 {
    fn index_mut(&mut self, dim: usize) -> &mut f64 {
        match dim {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("F64x3 axis out of range: {}", dim),
        }
    }
}

impl Add for F64x3 {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        F64x3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl AddAssign for F64x3 {
    fn add_assign(&mut self, o: Self) {
        self.x += o.x;
        self.y += o.y;
        self.z += o.z;
    }
}

impl Sub for F64x3 {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        F64x3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl SubAssign for F64x3 {
    fn sub_assign(&mut self, o: Self) {
        self.x -= o.x;
        self.y -= o.y;
        self.z -= o.z;
    }
}

impl Mul<f64> for F64x3 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        F64x3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Div<f64> for F64x3 {
    type Output = Self;
    fn div(self, s: f64) -> Self {
        F64x3::new(self.x / s, self.y / s, self.z / s)
    }
}

#[cfg(test)]
mod tests {
    use super::F64x3;

    #[test]
    fn arithmetic() {
        let a = F64x3::new(1.0, 2.0, 3.0);
        let b = F64x3::new(-1.0, 0.5, 4.0);
        assert_eq!(a + b, F64x3::new(0.0, 2.5, 7.0));
        assert_eq!(a - b, F64x3::new(2.0, 1.5, -1.0));
        assert_eq!(a * 2.0, F64x3::new(2.0, 4.0, 6.0));
        assert_eq!(a / 2.0, F64x3::new(0.5, 1.0, 1.5));
        assert_eq!(a.dot(b), -1.0 + 1.0 + 12.0);
        assert_eq!(F64x3::new(3.0, 4.0, 0.0).norm(), 5.0);
    }

    #[test]
    fn min_max_and_index() {
        let a = F64x3::new(1.0, -2.0, 3.0);
        let b = F64x3::new(0.0, 5.0, 3.5);
        assert_eq!(a.min(b), F64x3::new(0.0, -2.0, 3.0));
        assert_eq!(a.max(b), F64x3::new(1.0, 5.0, 3.5));

        let mut c = F64x3::zero();
        for dim in 0..3 {
            c[dim] = a[dim] * 10.0;
        }
        assert_eq!(c, F64x3::new(10.0, -20.0, 30.0));
    }

    #[test]
    #[should_panic]
    fn index_out_of_range() {
        let _ = F64x3::zero()[3];
    }
}
