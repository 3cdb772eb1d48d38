use std::fmt;
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Pixel size of an ad image, width x height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Dimensions { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// The three placements the mod renders ads into.
///
/// Each slot accepts exactly one pixel size; there is no scaling tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdSlot {
    Banner,
    Square,
    Skyscraper,
}

impl AdSlot {
    /// Exact pixel dimensions an image must have for this slot.
    pub fn required_dimensions(self) -> Dimensions {
        match self {
            AdSlot::Banner => Dimensions::new(1456, 180),
            AdSlot::Square => Dimensions::new(1456, 1456),
            AdSlot::Skyscraper => Dimensions::new(180, 1456),
        }
    }

    /// Numeric code the ads backend stores for this slot.
    pub fn type_code(self) -> u8 {
        match self {
            AdSlot::Banner => 1,
            AdSlot::Square => 2,
            AdSlot::Skyscraper => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdSlot::Banner => "banner",
            AdSlot::Square => "square",
            AdSlot::Skyscraper => "skyscraper",
        }
    }
}

impl fmt::Display for AdSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Invalid ad type: {_0}")]
pub struct UnknownSlot(pub String);

impl FromStr for AdSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banner" => Ok(AdSlot::Banner),
            "square" => Ok(AdSlot::Square),
            "skyscraper" => Ok(AdSlot::Skyscraper),
            other => Err(UnknownSlot(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_dimensions_match_the_slot_table() {
        assert_eq!(AdSlot::Banner.required_dimensions(), Dimensions::new(1456, 180));
        assert_eq!(AdSlot::Square.required_dimensions(), Dimensions::new(1456, 1456));
        assert_eq!(AdSlot::Skyscraper.required_dimensions(), Dimensions::new(180, 1456));
    }

    #[test]
    fn type_codes_match_backend_numbering() {
        assert_eq!(AdSlot::Banner.type_code(), 1);
        assert_eq!(AdSlot::Square.type_code(), 2);
        assert_eq!(AdSlot::Skyscraper.type_code(), 3);
    }

    #[test]
    fn wire_names_round_trip() {
        for slot in [AdSlot::Banner, AdSlot::Square, AdSlot::Skyscraper] {
            assert_eq!(slot.as_str().parse::<AdSlot>(), Ok(slot));
        }
        assert!("leaderboard".parse::<AdSlot>().is_err());
    }
}
