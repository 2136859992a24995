//! Rolling stock type and corrective scale inferred from model size.
//!
//! Two heuristic families are available as selectable policies:
//!
//! - [`ScalePolicy::LengthBands`]: classify the running length into
//!   coach / locomotive / wagon bands, then scale to the midpoint of that
//!   type's canonical OO length range.
//! - [`ScalePolicy::AbsoluteSize`]: judge the raw size against OO-gauge
//!   expectations. Oversized and undersized models are rescaled so their
//!   running length becomes [`ABSOLUTE_SIZE_TARGET_M`]; everything else is
//!   left at scale 1.
//!
//! An explicit type hint overrides both and always scales to the hinted
//! type's canonical length. The returned scale factor is always > 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bounds::ModelBounds;
use crate::config::{
    ABSOLUTE_SIZE_TARGET_M, COACH_LENGTH_MM, COACH_MIN_LENGTH_M, CORRECT_BELOW_MM,
    LOCOMOTIVE_LENGTH_MM, LOCOMOTIVE_MIN_LENGTH_M, OVERSIZED_ABOVE_MM, UNDERSIZED_BELOW_MM,
    WAGON_LENGTH_MM,
};
use crate::params::PlacementParams;

pub const HINT_CONFIDENCE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingStockType {
    Locomotive,
    Coach,
    Wagon,
}

impl RollingStockType {
    pub fn label(self) -> &'static str {
        match self {
            RollingStockType::Locomotive => "locomotive",
            RollingStockType::Coach => "coach",
            RollingStockType::Wagon => "wagon",
        }
    }

    /// Parse a user-supplied hint. Case-insensitive.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "locomotive" | "loco" => Some(RollingStockType::Locomotive),
            "coach" | "carriage" => Some(RollingStockType::Coach),
            "wagon" => Some(RollingStockType::Wagon),
            _ => None,
        }
    }
}

impl fmt::Display for RollingStockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    #[default]
    LengthBands,
    AbsoluteSize,
}

/// Canonical model length range for one rolling stock type, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min_mm: f32,
    pub max_mm: f32,
}

impl LengthRange {
    pub const fn new(range: (f32, f32)) -> Self {
        Self {
            min_mm: range.0,
            max_mm: range.1,
        }
    }

    /// Midpoint of the range, in metres.
    pub fn midpoint_m(&self) -> f32 {
        (self.min_mm + self.max_mm) * 0.5 / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthRanges {
    pub locomotive: LengthRange,
    pub coach: LengthRange,
    pub wagon: LengthRange,
}

impl Default for LengthRanges {
    fn default() -> Self {
        Self {
            locomotive: LengthRange::new(LOCOMOTIVE_LENGTH_MM),
            coach: LengthRange::new(COACH_LENGTH_MM),
            wagon: LengthRange::new(WAGON_LENGTH_MM),
        }
    }
}

impl LengthRanges {
    pub fn for_type(&self, kind: RollingStockType) -> LengthRange {
        match kind {
            RollingStockType::Locomotive => self.locomotive,
            RollingStockType::Coach => self.coach,
            RollingStockType::Wagon => self.wagon,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for kind in [
            RollingStockType::Locomotive,
            RollingStockType::Coach,
            RollingStockType::Wagon,
        ] {
            let r = self.for_type(kind);
            if !(r.min_mm.is_finite() && r.max_mm.is_finite()) || r.min_mm <= 0.0 || r.min_mm > r.max_mm {
                return Err(format!(
                    "length range for {kind} must satisfy 0 < min <= max, got {}..{} mm",
                    r.min_mm, r.max_mm
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of the absolute-size heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBand {
    /// Above 500 mm: authored at or near full size.
    Oversized,
    /// 100-500 mm: plausible OO rolling stock, left alone.
    Intermediate,
    /// 20-100 mm: already at OO scale.
    AlreadyScaled,
    /// Below 20 mm.
    Undersized,
}

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleBasis {
    TypeHint,
    LengthBand,
    AbsoluteSize(SizeBand),
    /// Length was zero, negative or not finite; scale left at 1.
    InvalidLength,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleClassifierResult {
    pub scale_factor: f32,
    pub detected_type: Option<RollingStockType>,
    pub confidence: f32,
    pub basis: ScaleBasis,
    /// Unscaled running length the decision was based on, in metres.
    pub length: f32,
}

impl ScaleClassifierResult {
    pub fn changes_scale(&self) -> bool {
        (self.scale_factor - 1.0).abs() > f32::EPSILON
    }

    /// Short message suitable for a user-facing notification.
    pub fn notification(&self) -> String {
        let kind = self
            .detected_type
            .map(|t| t.label())
            .unwrap_or("model");
        let confidence = (self.confidence * 100.0).round() as u32;
        match self.basis {
            ScaleBasis::InvalidLength => {
                format!("Could not measure {kind}; scale left unchanged")
            }
            _ if !self.changes_scale() => {
                format!("{kind} size looks right for OO gauge ({confidence}% confidence)")
            }
            _ => format!(
                "Scaled {kind} by {:.4}x ({confidence}% confidence)",
                self.scale_factor
            ),
        }
    }
}

/// Band by running length in metres: > 0.5 coach, 0.3-0.5 locomotive, < 0.3 wagon.
pub fn classify_by_length_band(length_m: f32) -> RollingStockType {
    if length_m > COACH_MIN_LENGTH_M {
        RollingStockType::Coach
    } else if length_m >= LOCOMOTIVE_MIN_LENGTH_M {
        RollingStockType::Locomotive
    } else {
        RollingStockType::Wagon
    }
}

/// Band by absolute size relative to OO-gauge expectations.
pub fn classify_by_absolute_size(length_m: f32) -> SizeBand {
    let mm = length_m * 1000.0;
    if mm > OVERSIZED_ABOVE_MM {
        SizeBand::Oversized
    } else if mm < UNDERSIZED_BELOW_MM {
        SizeBand::Undersized
    } else if mm <= CORRECT_BELOW_MM {
        SizeBand::AlreadyScaled
    } else {
        SizeBand::Intermediate
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleClassifier {
    pub policy: ScalePolicy,
    pub ranges: LengthRanges,
}

impl ScaleClassifier {
    pub fn new(policy: ScalePolicy, ranges: LengthRanges) -> Self {
        Self { policy, ranges }
    }

    pub fn from_params(params: &PlacementParams) -> Self {
        Self::new(params.scale_policy, params.length_ranges)
    }

    pub fn classify(
        &self,
        bounds: &ModelBounds,
        hint: Option<RollingStockType>,
    ) -> ScaleClassifierResult {
        self.classify_length(bounds.max_horizontal_extent(), hint)
    }

    /// Classify from the running length (max of width and depth) in metres.
    pub fn classify_length(
        &self,
        length: f32,
        hint: Option<RollingStockType>,
    ) -> ScaleClassifierResult {
        if !length.is_finite() || length <= 0.0 {
            return ScaleClassifierResult {
                scale_factor: 1.0,
                detected_type: hint,
                confidence: 0.0,
                basis: ScaleBasis::InvalidLength,
                length,
            };
        }

        let (scale_factor, detected_type, confidence, basis) = match (hint, self.policy) {
            (Some(kind), _) => (
                self.ranges.for_type(kind).midpoint_m() / length,
                Some(kind),
                HINT_CONFIDENCE,
                ScaleBasis::TypeHint,
            ),
            (None, ScalePolicy::LengthBands) => {
                let kind = classify_by_length_band(length);
                let confidence = match kind {
                    RollingStockType::Locomotive => 0.6,
                    RollingStockType::Coach | RollingStockType::Wagon => 0.7,
                };
                (
                    self.ranges.for_type(kind).midpoint_m() / length,
                    Some(kind),
                    confidence,
                    ScaleBasis::LengthBand,
                )
            }
            (None, ScalePolicy::AbsoluteSize) => {
                let band = classify_by_absolute_size(length);
                let (scale, confidence) = match band {
                    SizeBand::Oversized | SizeBand::Undersized => {
                        (ABSOLUTE_SIZE_TARGET_M / length, 0.6)
                    }
                    SizeBand::AlreadyScaled => (1.0, 0.7),
                    SizeBand::Intermediate => (1.0, 0.5),
                };
                (scale, None, confidence, ScaleBasis::AbsoluteSize(band))
            }
        };

        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };

        ScaleClassifierResult {
            scale_factor,
            detected_type,
            confidence,
            basis,
            length,
        }
    }
}
