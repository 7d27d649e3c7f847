use serde::{Deserialize, Serialize};
use shadow_core::ShadowError;
use std::fmt;
use std::str::FromStr;

/// Slider granularity for quest points.
pub const POINTS_STEP: u32 = 5;

/// Quest tier, `S` highest through `E` lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
    E,
}

/// Inclusive points bounds for a rank, plus the value a rank change resets to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsRange {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl PointsRange {
    pub fn contains(&self, points: u32) -> bool {
        (self.min..=self.max).contains(&points)
    }

    pub fn clamp(&self, points: u32) -> u32 {
        points.clamp(self.min, self.max)
    }

    /// Rounds to the nearest slider step, then clamps into range.
    pub fn snap(&self, points: u32) -> u32 {
        let stepped = (points.saturating_add(POINTS_STEP / 2) / POINTS_STEP) * POINTS_STEP;
        self.clamp(stepped)
    }
}

const RANK_TABLE: [(Rank, PointsRange); 6] = [
    (Rank::S, PointsRange { min: 200, max: 500, default: 300 }),
    (Rank::A, PointsRange { min: 100, max: 200, default: 150 }),
    (Rank::B, PointsRange { min: 70, max: 120, default: 100 }),
    (Rank::C, PointsRange { min: 40, max: 80, default: 60 }),
    (Rank::D, PointsRange { min: 20, max: 50, default: 30 }),
    (Rank::E, PointsRange { min: 5, max: 30, default: 15 }),
];

impl Rank {
    pub const ALL: [Rank; 6] = [Rank::S, Rank::A, Rank::B, Rank::C, Rank::D, Rank::E];

    pub fn points_range(self) -> PointsRange {
        RANK_TABLE
            .iter()
            .find(|(rank, _)| *rank == self)
            .map(|(_, range)| *range)
            .unwrap_or(RANK_TABLE[5].1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
            Rank::E => "E",
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::E
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Rank::S),
            "A" => Ok(Rank::A),
            "B" => Ok(Rank::B),
            "C" => Ok(Rank::C),
            "D" => Ok(Rank::D),
            "E" => Ok(Rank::E),
            other => Err(ShadowError::Validation(format!(
                "Invalid rank '{}', expected one of S, A, B, C, D, E",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table() {
        assert_eq!(
            Rank::S.points_range(),
            PointsRange { min: 200, max: 500, default: 300 }
        );
        assert_eq!(Rank::A.points_range().default, 150);
        assert_eq!(Rank::B.points_range().default, 100);
        assert_eq!(Rank::C.points_range().default, 60);
        assert_eq!(Rank::D.points_range().default, 30);
        assert_eq!(
            Rank::E.points_range(),
            PointsRange { min: 5, max: 30, default: 15 }
        );
    }

    #[test]
    fn test_defaults_lie_within_ranges() {
        for rank in Rank::ALL {
            let range = rank.points_range();
            assert!(range.contains(range.default), "rank {}", rank);
            assert_eq!(range.default % POINTS_STEP, 0);
        }
    }

    #[test]
    fn test_snap_to_step_and_range() {
        let range = Rank::S.points_range();
        assert_eq!(range.snap(0), 200);
        assert_eq!(range.snap(333), 335);
        assert_eq!(range.snap(331), 330);
        assert_eq!(range.snap(9999), 500);
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!("s".parse::<Rank>().unwrap(), Rank::S);
        assert_eq!(" E ".parse::<Rank>().unwrap(), Rank::E);
        assert!("F".parse::<Rank>().is_err());
    }

    #[test]
    fn test_rank_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Rank::B).unwrap(), "\"B\"");
        let rank: Rank = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(rank, Rank::A);
    }
}
