use std::{
    fmt,
    ops::{Add, Mul, Sub},
    time::Duration,
};

/// Screen-space position in pixels. Only the presentation cares about it; match logic never
/// looks at it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Vec2 { x: 0.0, y: 0.0 };

    /// Positions closer than this are considered the same spot.
    pub const EPSILON: f32 = 1e-3;

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    pub fn approx_eq(self, other: Self) -> bool {
        (self.x - other.x).abs() < Self::EPSILON && (self.y - other.y).abs() < Self::EPSILON
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    CubicInOut,
    BounceOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto eased progress. Both ends are fixed points.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BounceOut => {
                const N: f32 = 7.5625;
                const D: f32 = 2.75;

                if t < 1.0 / D {
                    N * t * t
                } else if t < 2.0 / D {
                    let t = t - 1.5 / D;
                    N * t * t + 0.75
                } else if t < 2.5 / D {
                    let t = t - 2.25 / D;
                    N * t * t + 0.9375
                } else {
                    let t = t - 2.625 / D;
                    N * t * t + 0.984375
                }
            }
        }
    }
}

/// A single timed interpolation between two screen positions.
///
/// Completion is decided by elapsed time alone, so a move always finishes after
/// `delay + duration` no matter how the easing curve lands.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    from: Vec2,
    to: Vec2,
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Motion {
    pub fn new(from: Vec2, to: Vec2, delay: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            delay,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.to
    }

    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.total()
    }

    /// Advances the clock by `dt` and returns the interpolated position.
    pub fn advance(&mut self, dt: Duration) -> Vec2 {
        self.elapsed = (self.elapsed + dt).min(self.total());

        if self.is_finished() {
            return self.to;
        }

        let Some(active) = self.elapsed.checked_sub(self.delay) else {
            return self.from;
        };

        let t = if self.duration.is_zero() {
            1.0
        } else {
            active.as_secs_f32() / self.duration.as_secs_f32()
        };

        self.from.lerp(self.to, self.easing.apply(t))
    }
}
