use crate::error::ProviderError;
use derive_more::Display;
use geo::Point;
use std::str::FromStr;

/// WGS84 bounds, written as `west,south,east,north`.
#[derive(Debug, Clone, Copy, PartialEq, Display)]
#[display("{west},{south},{east},{north}")]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ProviderError> {
        let invalid = |reason| ProviderError::BoundingBox {
            input: format!("{west},{south},{east},{north}"),
            reason,
        };

        if ![west, south, east, north].iter().all(|value| value.is_finite()) {
            return Err(invalid("coordinates must be finite"));
        }

        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(invalid("longitudes must be within -180 and 180"));
        }

        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(invalid("latitudes must be within -90 and 90"));
        }

        if west >= east {
            return Err(invalid("west must be less than east"));
        }

        if south >= north {
            return Err(invalid("south must be less than north"));
        }

        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Inclusive of the edges.
    pub fn contains(&self, point: &Point) -> bool {
        (self.west..=self.east).contains(&point.x()) && (self.south..=self.north).contains(&point.y())
    }
}

impl FromStr for BoundingBox {
    type Err = ProviderError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ProviderError::BoundingBox {
            input: input.to_owned(),
            reason,
        };

        let values = input
            .split(',')
            .map(|value| value.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid("expected numbers"))?;

        match values.as_slice() {
            [west, south, east, north] => Self::new(*west, *south, *east, *north),
            _ => Err(invalid("expected west,south,east,north")),
        }
    }
}
