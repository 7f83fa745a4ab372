//! Geometry of an analog clock face.
//!
//! Everything is expressed relative to the face center in surface pixels, with
//! angles in radians measured clockwise from 12 o'clock. The renderer turns
//! these shapes into drawing calls; nothing here touches a surface.

use std::f64::consts::{FRAC_PI_2, PI};

use super::value_objects::HandAngles;

/// Gap between the face edge and the surface edge.
const FACE_INSET: f64 = 3.0;

pub mod palette {
    pub const FACE: &str = "#fff";
    pub const RIM: &str = "#d6d6d6";
    pub const HOUR_TICK: &str = "#222";
    pub const MINUTE_TICK: &str = "#aaa";
    pub const NUMERAL: &str = "#222";
    pub const HAND: &str = "#222";
    pub const SECOND_HAND: &str = "#d31c1c";
    pub const CAP_FILL: &str = "#fff";
    pub const CAP_RIM: &str = "#bbb";
}

/// Radial line drawn after rotating about the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub angle: f64,
    pub inner: f64,
    pub outer: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Numeral {
    pub text: String,
    /// Offset from the center
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKind {
    Hour,
    Minute,
    Second,
}

/// A hand runs from `tail` pixels behind the pivot to `length` pixels in front of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandStroke {
    pub kind: HandKind,
    pub angle: f64,
    pub tail: f64,
    pub length: f64,
    pub width: f64,
    pub color: &'static str,
}

/// Size-derived layout of one face. Cheap to build; rebuilt when the diameter changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockFaceGeometry {
    diameter: f64,
}

impl ClockFaceGeometry {
    pub fn new(diameter: f64) -> Option<Self> {
        (diameter.is_finite() && diameter > 0.0).then_some(Self { diameter })
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn center(&self) -> f64 {
        self.radius()
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn face_radius(&self) -> f64 {
        self.radius() - FACE_INSET
    }

    pub fn rim_width(&self) -> f64 {
        self.diameter * 0.018
    }

    pub fn hour_ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        (0..12).map(move |i| Tick {
            angle: f64::from(i) * PI / 6.0,
            inner: self.radius() * 0.78,
            outer: self.radius() * 0.90,
            width: self.diameter * 0.018,
        })
    }

    /// The 48 minute marks that do not sit under an hour tick.
    pub fn minute_ticks(&self) -> impl Iterator<Item = Tick> + '_ {
        (0..60).filter(|i| i % 5 != 0).map(move |i| Tick {
            angle: f64::from(i) * PI / 30.0,
            inner: self.radius() * 0.84,
            outer: self.radius() * 0.90,
            width: self.diameter * 0.008,
        })
    }

    pub fn numeral_font(&self) -> String {
        format!("{}px Arial", self.diameter * 0.11)
    }

    pub fn numerals(&self) -> Vec<Numeral> {
        let ring = self.radius() * 0.64;
        (1..=12)
            .map(|n: i32| {
                // screen angle: 3 o'clock is zero, so shift back a quarter turn
                let angle = f64::from(n) * PI / 6.0 - FRAC_PI_2;
                Numeral { text: n.to_string(), dx: angle.cos() * ring, dy: angle.sin() * ring }
            })
            .collect()
    }

    pub fn hands(&self, angles: &HandAngles) -> [HandStroke; 3] {
        let radius = self.radius();
        [
            HandStroke {
                kind: HandKind::Hour,
                angle: angles.hour.radians(),
                tail: 10.0,
                length: radius * 0.46,
                width: self.diameter * 0.045,
                color: palette::HAND,
            },
            HandStroke {
                kind: HandKind::Minute,
                angle: angles.minute.radians(),
                tail: 14.0,
                length: radius * 0.68,
                width: self.diameter * 0.025,
                color: palette::HAND,
            },
            HandStroke {
                kind: HandKind::Second,
                angle: angles.second.radians(),
                tail: 18.0,
                length: radius * 0.77,
                width: self.diameter * 0.01,
                color: palette::SECOND_HAND,
            },
        ]
    }

    pub fn cap_radius(&self) -> f64 {
        self.diameter * 0.025
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_diameter() {
        assert!(ClockFaceGeometry::new(0.0).is_none());
        assert!(ClockFaceGeometry::new(-10.0).is_none());
        assert!(ClockFaceGeometry::new(f64::NAN).is_none());
    }

    #[test]
    fn twelve_sits_on_top() {
        let geometry = ClockFaceGeometry::new(180.0).unwrap();
        let twelve = geometry.numerals().into_iter().find(|n| n.text == "12").unwrap();
        assert!(twelve.dx.abs() < 1e-9);
        assert!((twelve.dy + 90.0 * 0.64).abs() < 1e-9);
    }
}
