use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Closed interval `[min, max]` with finite bounds.
/// Constructed via `Segment::new` which enforces `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "SegmentRaw")]
pub struct Segment {
    min: f64,
    max: f64,
}

#[derive(Deserialize, JsonSchema)]
struct SegmentRaw {
    min: f64,
    max: f64,
}

impl TryFrom<SegmentRaw> for Segment {
    type Error = GraphError;
    fn try_from(raw: SegmentRaw) -> Result<Self, GraphError> {
        Segment::new(raw.min, raw.max)
    }
}

impl Segment {
    pub const UNIT: Segment = Segment { min: 0.0, max: 1.0 };

    /// For bounds known to be valid where they are written.
    pub(crate) const fn from_const(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn new(min: f64, max: f64) -> Result<Self, GraphError> {
        if min.is_finite() && max.is_finite() && min <= max {
            Ok(Self { min, max })
        } else {
            Err(GraphError::InvalidSegment { min, max })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.min && t <= self.max
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn valid_segment() {
        let s = Segment::new(0.05, 0.9).unwrap();
        assert!((s.length() - 0.85).abs() < 1e-12);
        assert!(s.contains(0.05));
        assert!(s.contains(0.9));
        assert!(!s.contains(0.95));
    }

    #[test]
    fn point_segment_is_allowed() {
        let s = Segment::new(1.0, 1.0).unwrap();
        assert_eq!(s.length(), 0.0);
    }

    #[test]
    fn rejects_inverted_or_infinite() {
        assert!(Segment::new(1.0, 0.0).is_err());
        assert!(Segment::new(f64::NEG_INFINITY, 0.0).is_err());
        assert!(Segment::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn deserialize_checks_bounds() {
        let s: Segment = serde_json::from_str(r#"{"min":0.0,"max":0.95}"#).unwrap();
        assert_eq!(s.max(), 0.95);
        assert!(serde_json::from_str::<Segment>(r#"{"min":2.0,"max":1.0}"#).is_err());
    }
}
