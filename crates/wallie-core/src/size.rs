use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// T-shirt size of a story.
///
/// `Unsized` is a story nobody has estimated yet. `Unknown` is the explicit
/// "can't estimate" answer, stored in the tracker as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Unsized,
    ExtraSmall,
    Small,
    Medium,
    Large,
    ExtraLarge,
    ExtraExtraLarge,
    Unknown,
}

/// Display order of the backlog columns.
pub const BUCKETS: [Size; 7] = [
    Size::Unsized,
    Size::ExtraSmall,
    Size::Small,
    Size::Medium,
    Size::Large,
    Size::ExtraLarge,
    Size::ExtraExtraLarge,
];

/// Sizes offered by the estimation dialogue.
pub const SELECTABLE: [Size; 6] = [
    Size::ExtraSmall,
    Size::Small,
    Size::Medium,
    Size::Large,
    Size::ExtraLarge,
    Size::ExtraExtraLarge,
];

const UNKNOWN_POINTS: i64 = -1;

impl Size {
    /// Short label used in forms and `data-size` attributes.
    pub fn label(self) -> &'static str {
        match self {
            Size::Unsized => "Unsized",
            Size::ExtraSmall => "XS",
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
            Size::ExtraLarge => "XL",
            Size::ExtraExtraLarge => "XXL",
            Size::Unknown => "Unknown",
        }
    }

    /// Column heading on the boards.
    pub fn heading(self) -> &'static str {
        match self {
            Size::Unsized => "To Estimate",
            other => other.label(),
        }
    }

    pub fn from_label(label: &str) -> Option<Size> {
        match label.trim() {
            "Unsized" => Some(Size::Unsized),
            "XS" => Some(Size::ExtraSmall),
            "S" => Some(Size::Small),
            "M" => Some(Size::Medium),
            "L" => Some(Size::Large),
            "XL" => Some(Size::ExtraLarge),
            "XXL" => Some(Size::ExtraExtraLarge),
            "U" | "Unknown" => Some(Size::Unknown),
            _ => None,
        }
    }

    /// Maps a tracker estimate to a size.
    ///
    /// Both point schemes are accepted on input; anything that is not one of
    /// the known integer codes is `Unsized`.
    pub fn from_points(points: f64) -> Size {
        let Some(code) = integer_code(points) else {
            return Size::Unsized;
        };
        match code {
            UNKNOWN_POINTS => Size::Unknown,
            1 => Size::ExtraSmall,
            2 => Size::Small,
            3 => Size::Medium,
            5 => Size::Large,
            8 | 10 => Size::ExtraLarge,
            13 | 20 => Size::ExtraExtraLarge,
            _ => Size::Unsized,
        }
    }

    pub fn to_points(self, scheme: PointScheme) -> f64 {
        scheme.code(self) as f64
    }

    /// Column this size is listed under. `Unknown` has no column of its own.
    pub fn bucket(self) -> Size {
        match self {
            Size::Unknown => Size::Unsized,
            other => other,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn integer_code(points: f64) -> Option<i64> {
    if !points.is_finite() || points.fract() != 0.0 {
        return None;
    }
    if points.abs() > i64::MAX as f64 {
        return None;
    }
    Some(points as i64)
}

// ---------------------------------------------------------------------------
// PointScheme
// ---------------------------------------------------------------------------

/// Numeric scheme written back to the tracker.
///
/// `Fibonacci` (XL = 8, XXL = 13) is the current scheme. `Legacy`
/// (XL = 10, XXL = 20) exists for projects whose history was estimated
/// before the switch. Reading accepts both regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointScheme {
    #[default]
    Fibonacci,
    Legacy,
}

impl PointScheme {
    fn code(self, size: Size) -> i64 {
        match (self, size) {
            (_, Size::Unsized) => 0,
            (_, Size::Unknown) => UNKNOWN_POINTS,
            (_, Size::ExtraSmall) => 1,
            (_, Size::Small) => 2,
            (_, Size::Medium) => 3,
            (_, Size::Large) => 5,
            (PointScheme::Fibonacci, Size::ExtraLarge) => 8,
            (PointScheme::Fibonacci, Size::ExtraExtraLarge) => 13,
            (PointScheme::Legacy, Size::ExtraLarge) => 10,
            (PointScheme::Legacy, Size::ExtraExtraLarge) => 20,
        }
    }
}

pub fn label_from_points(points: f64) -> Size {
    Size::from_points(points)
}

/// Unrecognised labels map to `0`, the tracker's "no estimate".
pub fn points_from_label(label: &str, scheme: PointScheme) -> f64 {
    Size::from_label(label)
        .map(|size| size.to_points(scheme))
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_points_map_to_sizes() {
        let cases = [
            (1.0, Size::ExtraSmall),
            (2.0, Size::Small),
            (3.0, Size::Medium),
            (5.0, Size::Large),
            (8.0, Size::ExtraLarge),
            (13.0, Size::ExtraExtraLarge),
        ];
        for (points, size) in cases {
            assert_eq!(label_from_points(points), size, "points {points}");
        }
    }

    #[test]
    fn legacy_points_are_still_recognised() {
        assert_eq!(label_from_points(10.0), Size::ExtraLarge);
        assert_eq!(label_from_points(20.0), Size::ExtraExtraLarge);
    }

    #[test]
    fn zero_fractional_and_odd_points_are_unsized() {
        for points in [0.0, 0.5, 4.0, 21.0, f64::NAN, f64::INFINITY] {
            assert_eq!(label_from_points(points), Size::Unsized, "points {points}");
        }
    }

    #[test]
    fn negative_one_is_unknown() {
        assert_eq!(label_from_points(-1.0), Size::Unknown);
        assert_eq!(Size::Unknown.to_points(PointScheme::Fibonacci), -1.0);
    }

    #[test]
    fn round_trip_lands_in_same_bucket() {
        for scheme in [PointScheme::Fibonacci, PointScheme::Legacy] {
            for size in SELECTABLE {
                let points = points_from_label(size.label(), scheme);
                assert_eq!(label_from_points(points), size, "{scheme:?} {size}");
            }
        }
    }

    #[test]
    fn schemes_differ_only_for_the_large_end() {
        assert_eq!(Size::ExtraLarge.to_points(PointScheme::Fibonacci), 8.0);
        assert_eq!(Size::ExtraLarge.to_points(PointScheme::Legacy), 10.0);
        assert_eq!(Size::ExtraExtraLarge.to_points(PointScheme::Fibonacci), 13.0);
        assert_eq!(Size::ExtraExtraLarge.to_points(PointScheme::Legacy), 20.0);
        assert_eq!(Size::Medium.to_points(PointScheme::Legacy), 3.0);
    }

    #[test]
    fn unrecognised_label_is_zero_points() {
        assert_eq!(points_from_label("huge", PointScheme::Fibonacci), 0.0);
        assert_eq!(points_from_label("", PointScheme::Fibonacci), 0.0);
        assert_eq!(Size::from_label("xs"), None);
    }

    #[test]
    fn unknown_size_shares_the_unsized_column() {
        assert_eq!(Size::Unknown.bucket(), Size::Unsized);
        assert_eq!(Size::Large.bucket(), Size::Large);
    }

    #[test]
    fn scheme_deserializes_from_lowercase() {
        let scheme: PointScheme = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(scheme, PointScheme::Legacy);
        assert_eq!(PointScheme::default(), PointScheme::Fibonacci);
    }
}
