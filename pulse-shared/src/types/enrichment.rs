//! Enrichment output types.
//!
//! These are the values the pipeline stages attach to a record: normalized
//! coordinates, a coarse region bucket, and a sentiment score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalized coordinates, indexed as a geo point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Coarse region bucket derived from coordinates.
///
/// The mapping is a deliberate approximation that carves the world into six
/// longitude/latitude quadrants. It mislabels some coastlines but is stable,
/// cheap, and good enough for dashboard aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    #[serde(rename = "Europe")]
    Europe,
    #[serde(rename = "Africa")]
    Africa,
    #[serde(rename = "Asia")]
    Asia,
    #[serde(rename = "Oceania")]
    Oceania,
}

impl Region {
    /// Bucket a coordinate pair into a region.
    ///
    /// Longitude picks the column (west of -30, -30 to 60, east of 60) and
    /// latitude above 30 picks the northern row.
    ///
    /// # Example
    ///
    /// ```
    /// use pulse_shared::Region;
    ///
    /// assert_eq!(Region::from_coordinates(40.71, -74.01), Region::NorthAmerica);
    /// assert_eq!(Region::from_coordinates(-33.87, 151.21), Region::Oceania);
    /// ```
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        if lon < -30.0 {
            if lat > 30.0 {
                Region::NorthAmerica
            } else {
                Region::SouthAmerica
            }
        } else if lon < 60.0 {
            if lat > 30.0 {
                Region::Europe
            } else {
                Region::Africa
            }
        } else if lat > 30.0 {
            Region::Asia
        } else {
            Region::Oceania
        }
    }

    /// The name stored in the index, e.g. `"North America"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Europe => "Europe",
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north america" => Ok(Region::NorthAmerica),
            "south america" => Ok(Region::SouthAmerica),
            "europe" => Ok(Region::Europe),
            "africa" => Ok(Region::Africa),
            "asia" => Ok(Region::Asia),
            "oceania" => Ok(Region::Oceania),
            other => Err(format!("unknown region: {other}")),
        }
    }
}

/// Sentiment classification label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a polarity score. Scores within 0.1 of zero are neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.1 {
            SentimentLabel::Positive
        } else if polarity < -0.1 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// Sentiment stage output.
///
/// `polarity` runs from -1.0 (negative) to 1.0 (positive) and `subjectivity`
/// from 0.0 (objective) to 1.0 (subjective).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
    pub label: SentimentLabel,
}

impl Sentiment {
    /// Build a sentiment from raw scores, deriving the label from polarity.
    pub fn from_scores(polarity: f64, subjectivity: f64) -> Self {
        Self {
            polarity,
            subjectivity,
            label: SentimentLabel::from_polarity(polarity),
        }
    }

    /// The sentiment attached to records with no scorable text.
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}
