//! Membership function shapes.
//!
//! Every shape keeps its control points sorted ascending by x, no matter the
//! order they were supplied in, and is flat beyond its outermost points.

use crate::error::ConfigError;
use crate::math::{lerp, midpoint};

/// A control point of a membership function
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

impl Coords {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Interpolates along the line through `c1` and `c2`. Not bounded to the segment.
    pub fn lerp(c1: Coords, c2: Coords, x: f64) -> f64 {
        lerp(c1.y, c2.y, c1.x, c2.x, x)
    }
}

fn sort_points<const N: usize>(mut points: [Coords; N]) -> [Coords; N] {
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}

/// A ramp between two plateaus, bounded by the universe's `min_x` and `max_x`.
///
/// ```text
/// ----------\                          /----------
///            \          or            /
///             \------          ------/
/// min_x  p0  p1  max_x    min_x   p0  p1  max_x
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shoulder {
    min_x: f64,
    max_x: f64,
    points: [Coords; 2],
}

impl Shoulder {
    pub fn new(min_x: f64, p0: Coords, p1: Coords, max_x: f64) -> Self {
        Self {
            min_x,
            max_x,
            points: sort_points([p0, p1]),
        }
    }

    pub fn set_points(&mut self, p0: Coords, p1: Coords) {
        self.points = sort_points([p0, p1]);
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn points(&self) -> &[Coords; 2] {
        &self.points
    }

    pub fn fx(&self, x: f64) -> f64 {
        let [p0, p1] = self.points;

        if x <= p0.x {
            return p0.y;
        }
        if x >= p1.x {
            return p1.y;
        }

        Coords::lerp(p0, p1, x)
    }

    /// Middle of the plateau side, never of the slope.
    pub fn representative_value(&self) -> f64 {
        let [p0, p1] = self.points;

        if p0.y > p1.y {
            midpoint(self.min_x, p0.x)
        } else {
            midpoint(p1.x, self.max_x)
        }
    }
}

/// Triangular membership function.
///
/// ```text
///              p1
///              /\
///             /  \
///            /    \
/// ----------/      \----------
///          p0      p2
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangular {
    points: [Coords; 3],
}

impl Triangular {
    pub fn new(p0: Coords, p1: Coords, p2: Coords) -> Self {
        Self {
            points: sort_points([p0, p1, p2]),
        }
    }

    pub fn set_points(&mut self, p0: Coords, p1: Coords, p2: Coords) {
        self.points = sort_points([p0, p1, p2]);
    }

    pub fn points(&self) -> &[Coords; 3] {
        &self.points
    }

    pub fn fx(&self, x: f64) -> f64 {
        let [p0, p1, p2] = self.points;

        if x <= p0.x {
            p0.y
        } else if x >= p2.x {
            p2.y
        } else if x == p1.x {
            p1.y
        } else if x < p1.x {
            Coords::lerp(p0, p1, x)
        } else {
            Coords::lerp(p1, p2, x)
        }
    }

    /// The peak
    pub fn representative_value(&self) -> f64 {
        self.points[1].x
    }
}

/// Trapezoidal membership function. `p1` and `p2` bound a flat plateau.
///
/// ```text
///          p1______p2
///           /      \
/// ---------/        \---------
///         p0        p3
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trapezoidal {
    points: [Coords; 4],
}

impl Trapezoidal {
    pub fn new(p0: Coords, p1: Coords, p2: Coords, p3: Coords) -> Result<Self, ConfigError> {
        Ok(Self {
            points: Self::checked_points([p0, p1, p2, p3])?,
        })
    }

    /// Replaces the control points. On error the previous points are kept.
    pub fn set_points(&mut self, p0: Coords, p1: Coords, p2: Coords, p3: Coords) -> Result<(), ConfigError> {
        self.points = Self::checked_points([p0, p1, p2, p3])?;

        Ok(())
    }

    fn checked_points(points: [Coords; 4]) -> Result<[Coords; 4], ConfigError> {
        let points = sort_points(points);

        if points[1].y != points[2].y {
            return Err(ConfigError::PlateauMismatch {
                p1_y: points[1].y,
                p2_y: points[2].y,
            });
        }

        Ok(points)
    }

    pub fn points(&self) -> &[Coords; 4] {
        &self.points
    }

    pub fn fx(&self, x: f64) -> f64 {
        let [p0, p1, p2, p3] = self.points;

        if x <= p0.x {
            p0.y
        } else if x >= p3.x {
            p3.y
        } else if x >= p1.x && x <= p2.x {
            p1.y
        } else if x < p1.x {
            Coords::lerp(p0, p1, x)
        } else {
            Coords::lerp(p2, p3, x)
        }
    }

    /// Middle of the plateau
    pub fn representative_value(&self) -> f64 {
        midpoint(self.points[1].x, self.points[2].x)
    }
}

/// Any of the supported membership function shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MembershipFunction {
    Shoulder(Shoulder),
    Triangular(Triangular),
    Trapezoidal(Trapezoidal),
}

impl MembershipFunction {
    /// Degree of membership of `x`. In `[0, 1]` as long as the control points are.
    pub fn fx(&self, x: f64) -> f64 {
        match self {
            Self::Shoulder(f) => f.fx(x),
            Self::Triangular(f) => f.fx(x),
            Self::Trapezoidal(f) => f.fx(x),
        }
    }

    /// The crisp value standing in for the whole shape during defuzzification.
    pub fn representative_value(&self) -> f64 {
        match self {
            Self::Shoulder(f) => f.representative_value(),
            Self::Triangular(f) => f.representative_value(),
            Self::Trapezoidal(f) => f.representative_value(),
        }
    }
}

impl From<Shoulder> for MembershipFunction {
    fn from(f: Shoulder) -> Self {
        Self::Shoulder(f)
    }
}

impl From<Triangular> for MembershipFunction {
    fn from(f: Triangular) -> Self {
        Self::Triangular(f)
    }
}

impl From<Trapezoidal> for MembershipFunction {
    fn from(f: Trapezoidal) -> Self {
        Self::Trapezoidal(f)
    }
}

#[test]
fn test_triangular() {
    let c0 = Coords::new(2.5, 0.);
    let c1 = Coords::new(5., 1.);
    let c2 = Coords::new(7.5, 0.25);
    let triangle = Triangular::new(c1, c0, c2);

    assert_eq!(triangle.points(), &[c0, c1, c2]);
    assert_eq!(triangle.fx(0.), 0.);
    assert_eq!(triangle.fx(2.5), 0.);
    assert_eq!(triangle.fx(3.75), 0.5);
    assert_eq!(triangle.fx(5.), 1.);
    assert_eq!(triangle.fx(6.25), 0.625);
    assert_eq!(triangle.fx(7.5), 0.25);
    assert_eq!(triangle.fx(10.), 0.25);
    assert_eq!(triangle.representative_value(), 5.);
}

#[test]
fn test_triangular_monotone_between_points() {
    let triangle = Triangular::new(Coords::new(25., 0.), Coords::new(50., 1.), Coords::new(75., 0.));
    let rising: Vec<_> = (25..=50).map(|x| triangle.fx(x as f64)).collect();
    let falling: Vec<_> = (50..=75).map(|x| triangle.fx(x as f64)).collect();

    assert!(rising.windows(2).all(|w| w[0] <= w[1]));
    assert!(falling.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(triangle.fx(-1000.), 0.);
    assert_eq!(triangle.fx(1000.), 0.);
}

#[test]
fn test_fuzzification_temperature() {
    let cold = Triangular::new(Coords::new(-270., 1.), Coords::new(5., 1.), Coords::new(20., 0.));
    let warm = Triangular::new(Coords::new(5., 0.), Coords::new(20., 1.), Coords::new(30., 0.));
    let hot = Triangular::new(Coords::new(20., 0.), Coords::new(30., 1.), Coords::new(100., 1.));

    assert_eq!(cold.fx(0.), 1.);
    assert_eq!(warm.fx(0.), 0.);
    assert_eq!(hot.fx(0.), 0.);

    assert!(cold.fx(30.).abs() < 5e-6);
    assert!(warm.fx(30.).abs() < 5e-6);
    assert!((hot.fx(30.) - 1.).abs() < 5e-6);

    assert!((cold.fx(10.) - 2. / 3.).abs() < 5e-6);
    assert!((warm.fx(10.) - 1. / 3.).abs() < 5e-6);
    assert!(hot.fx(10.).abs() < 5e-6);
}

#[test]
fn test_shoulder() {
    let close = Shoulder::new(0., Coords::new(150., 0.), Coords::new(25., 1.), 400.);

    assert_eq!(close.points(), &[Coords::new(25., 1.), Coords::new(150., 0.)]);
    assert_eq!(close.fx(0.), 1.);
    assert_eq!(close.fx(25.), 1.);
    assert_eq!(close.fx(87.5), 0.5);
    assert_eq!(close.fx(150.), 0.);
    assert_eq!(close.fx(400.), 0.);
    assert_eq!(close.representative_value(), 12.5);

    let far = Shoulder::new(0., Coords::new(150., 0.), Coords::new(300., 1.), 400.);

    assert_eq!(far.fx(100.), 0.);
    assert!((far.fx(200.) - 1. / 3.).abs() < 1e-12);
    assert_eq!(far.fx(350.), 1.);
    assert_eq!(far.representative_value(), 350.);
}

#[test]
fn test_trapezoidal() {
    let trapezoid = Trapezoidal::new(
        Coords::new(30., 0.),
        Coords::new(10., 1.),
        Coords::new(0., 0.),
        Coords::new(20., 1.),
    )
    .unwrap();

    assert_eq!(trapezoid.fx(-5.), 0.);
    assert_eq!(trapezoid.fx(5.), 0.5);
    assert_eq!(trapezoid.fx(10.), 1.);
    assert_eq!(trapezoid.fx(15.), 1.);
    assert_eq!(trapezoid.fx(20.), 1.);
    assert_eq!(trapezoid.fx(25.), 0.5);
    assert_eq!(trapezoid.fx(35.), 0.);
    assert_eq!(trapezoid.representative_value(), 15.);
}

#[test]
fn test_trapezoidal_plateau_mismatch() {
    let err = Trapezoidal::new(
        Coords::new(0., 0.),
        Coords::new(10., 1.),
        Coords::new(20., 0.8),
        Coords::new(30., 0.),
    )
    .unwrap_err();

    assert_eq!(err, ConfigError::PlateauMismatch { p1_y: 1., p2_y: 0.8 });

    let mut trapezoid = Trapezoidal::new(
        Coords::new(0., 0.),
        Coords::new(10., 1.),
        Coords::new(20., 1.),
        Coords::new(30., 0.),
    )
    .unwrap();
    let before = trapezoid;

    assert!(trapezoid
        .set_points(Coords::new(0., 0.), Coords::new(1., 0.5), Coords::new(2., 1.), Coords::new(3., 0.))
        .is_err());
    assert_eq!(trapezoid, before);
}

#[test]
fn test_membership_function_dispatch() {
    let desirable: MembershipFunction =
        Triangular::new(Coords::new(25., 0.), Coords::new(50., 1.), Coords::new(75., 0.)).into();
    let very_desirable: MembershipFunction =
        Shoulder::new(0., Coords::new(50., 0.), Coords::new(75., 1.), 100.).into();

    assert_eq!(desirable.fx(37.5), 0.5);
    assert_eq!(desirable.representative_value(), 50.);
    assert_eq!(very_desirable.fx(62.5), 0.5);
    assert_eq!(very_desirable.representative_value(), 87.5);
}
