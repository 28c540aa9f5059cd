//! Circle sizes and render snapshots

use super::TransitionKind;

/// Resting outer radius as a fraction of half the control width
const OUTER_FRACTION: f32 = 0.75;
/// Inner radius as a fraction of the outer one
const INNER_FRACTION: f32 = 0.75;
const EXPANDED_OUTER_SCALE: f32 = 1.33;
const EXPANDED_INNER_SCALE: f32 = 0.7;

/// Outer and inner circle radii
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Radii {
    pub outer: f32,
    pub inner: f32,
}

impl Radii {
    /// Linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, to: Radii, t: f32) -> Radii {
        if t >= 1.0 {
            return to;
        }
        let t = t.max(0.0);
        Radii {
            outer: self.outer + (to.outer - self.outer) * t,
            inner: self.inner + (to.inner - self.inner) * t,
        }
    }
}

/// Resting and expanded sizes of the button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonGeometry {
    resting: Radii,
    expanded: Radii,
}

impl ButtonGeometry {
    pub fn for_width(width: f32) -> Self {
        let outer = width / 2.0 * OUTER_FRACTION;
        let inner = outer * INNER_FRACTION;
        Self {
            resting: Radii { outer, inner },
            expanded: Radii {
                outer: outer * EXPANDED_OUTER_SCALE,
                inner: inner * EXPANDED_INNER_SCALE,
            },
        }
    }

    pub fn resting(&self) -> Radii {
        self.resting
    }

    pub fn expanded(&self) -> Radii {
        self.expanded
    }

    /// Start and end radii of a transition
    pub fn endpoints(&self, kind: TransitionKind) -> (Radii, Radii) {
        match kind {
            TransitionKind::Expand => (self.resting, self.expanded),
            TransitionKind::Collapse => (self.expanded, self.resting),
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    pub radii: Radii,
    /// Progress arc, clockwise from 12 o'clock
    pub sweep_degrees: f32,
}

/// Map progress onto a full circle
pub fn sweep_degrees(progress_ms: f64, max_ms: f64) -> f32 {
    if max_ms <= 0.0 {
        return 0.0;
    }
    ((progress_ms / max_ms).clamp(0.0, 1.0) * 360.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_for_width() {
        let g = ButtonGeometry::for_width(200.0);
        assert_eq!(g.resting(), Radii { outer: 75.0, inner: 56.25 });
        assert!((g.expanded().outer - 99.75).abs() < 1e-4);
        assert!((g.expanded().inner - 39.375).abs() < 1e-4);
    }

    #[test]
    fn test_endpoints_are_mirrored() {
        let g = ButtonGeometry::for_width(120.0);
        let (a, b) = g.endpoints(TransitionKind::Expand);
        assert_eq!(g.endpoints(TransitionKind::Collapse), (b, a));
    }

    #[test]
    fn test_lerp_clamps() {
        let a = Radii { outer: 10.0, inner: 0.0 };
        let b = Radii { outer: 20.0, inner: 10.0 };
        assert_eq!(a.lerp(b, 0.5), Radii { outer: 15.0, inner: 5.0 });
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn test_sweep() {
        assert_eq!(sweep_degrees(0.0, 10_000.0), 0.0);
        assert_eq!(sweep_degrees(5_000.0, 10_000.0), 180.0);
        assert_eq!(sweep_degrees(12_000.0, 10_000.0), 360.0);
        assert_eq!(sweep_degrees(1.0, 0.0), 0.0);
    }
}
