/// Which ways make up a road network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKind {
    /// Public roads a car may drive on.
    Drive,
    /// Everything a bicycle may ride on, including roads.
    Bike,
}

impl NetworkKind {
    /// Returns true when a way with these tags belongs to the network.
    /// Every admitted way carries a `highway` tag.
    pub fn admits<'a>(self, tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> bool {
        let mut highway = false;

        for tag in tags {
            if self.excludes(tag) {
                return false;
            }

            if tag.0 == "highway" {
                highway = true;
            }
        }

        highway
    }

    fn excludes(self, pair: (&str, &str)) -> bool {
        if excluded_everywhere(pair) {
            return true;
        }

        match self {
            NetworkKind::Drive => matches!(
                pair,
                (
                    "highway",
                    "bridleway"
                        | "cycleway"
                        | "path"
                        | "pedestrian"
                        | "service"
                        | "track"
                        | "footway"
                        | "steps"
                ) | ("motor_vehicle", "no")
                    | ("motorcar", "no")
                    | (
                        "service",
                        "alley" | "driveway" | "emergency_access" | "parking" | "parking_aisle"
                    )
            ),
            NetworkKind::Bike => matches!(
                pair,
                ("highway", "footway" | "motor" | "steps") | ("bicycle", "no")
            ),
        }
    }
}

/// Tags that keep a way out of every network.
fn excluded_everywhere(pair: (&str, &str)) -> bool {
    matches!(
        pair,
        (
            "highway",
            "abandoned"
                | "bus_guideway"
                | "construction"
                | "corridor"
                | "elevator"
                | "escalator"
                | "no"
                | "planned"
                | "platform"
                | "proposed"
                | "raceway"
                | "razed"
        ) | ("area", "yes")
            | ("access", "private")
            | ("service", "private")
    )
}

/// Directions a way may be travelled in, relative to its node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oneway {
    Forward,
    Backward,
    Both,
}

impl Oneway {
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut oneway = None;
        let mut roundabout = false;

        for tag in tags {
            match tag {
                ("oneway", "yes" | "true" | "1") => oneway = Some(Oneway::Forward),
                ("oneway", "-1" | "reverse") => oneway = Some(Oneway::Backward),
                ("oneway", "no" | "false" | "0") => oneway = Some(Oneway::Both),
                ("junction", "roundabout") => roundabout = true,
                _ => {}
            }
        }

        oneway.unwrap_or(if roundabout {
            Oneway::Forward
        } else {
            Oneway::Both
        })
    }

    pub fn forward(self) -> bool {
        matches!(self, Oneway::Forward | Oneway::Both)
    }

    pub fn backward(self) -> bool {
        matches!(self, Oneway::Backward | Oneway::Both)
    }
}
