use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How one tag key is matched: present with any value, or one of some values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagMatch {
    Present(bool),
    One(String),
    Many(Vec<String>),
}

impl TagMatch {
    pub fn many<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        TagMatch::Many(values.into_iter().map(str::to_owned).collect())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            TagMatch::Present(present) => *present,
            TagMatch::One(expected) => expected == value,
            TagMatch::Many(expected) => expected.iter().any(|expected| expected == value),
        }
    }
}

/// Selects features carrying at least one matching tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagFilter(IndexMap<String, TagMatch>);

impl TagFilter {
    pub fn matches<'a>(&self, tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> bool {
        tags.into_iter().any(|(key, value)| {
            self.0
                .get(key)
                .is_some_and(|tag_match| tag_match.matches(value))
        })
    }

    pub fn green() -> Self {
        Self::from_iter([
            (
                "landuse",
                TagMatch::many([
                    "village_green",
                    "grass",
                    "forest",
                    "cemetary",
                    "greenfield",
                    "meadow",
                    "orchard",
                    "vineyard",
                    "allotments",
                    "farmland",
                    "plant_nursery",
                    "recreation_ground",
                ]),
            ),
            (
                "leisure",
                TagMatch::many(["park", "garden", "golf_course", "nature_reserve"]),
            ),
            (
                "natural",
                TagMatch::many([
                    "shrubbery",
                    "scrub",
                    "fell",
                    "grassland",
                    "wood",
                    "heath",
                    "tree",
                    "tree_row",
                    "tundra",
                ]),
            ),
            ("tourism", TagMatch::One("camp_site".into())),
            ("amenity", TagMatch::One("grave_yard".into())),
            ("place", TagMatch::One("farm".into())),
        ])
    }

    pub fn water() -> Self {
        Self::from_iter([
            ("water", TagMatch::Present(true)),
            (
                "natural",
                TagMatch::many(["water", "bay", "spring", "strait", "wetland"]),
            ),
            ("place", TagMatch::many(["sea", "ocean"])),
            (
                "waterway",
                TagMatch::many([
                    "river",
                    "riverbank",
                    "stream",
                    "tidal_channel",
                    "canal",
                    "drain",
                    "ditch",
                    "fairway",
                ]),
            ),
        ])
    }

    pub fn railways() -> Self {
        Self::from_iter([(
            "railway",
            TagMatch::many([
                "disused",
                "funicular",
                "light_rail",
                "monorail",
                "narrow_gauge",
                "preserved",
                "rail",
                "tram",
            ]),
        )])
    }

    pub fn buildings() -> Self {
        Self::from_iter([
            ("building", TagMatch::Present(true)),
            ("landuse", TagMatch::One("construction".into())),
        ])
    }
}

impl<K: Into<String>> FromIterator<(K, TagMatch)> for TagFilter {
    fn from_iter<T: IntoIterator<Item = (K, TagMatch)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Buildings,
    Roads,
    Cycleways,
    Water,
    Railways,
    Green,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Buildings,
        Layer::Roads,
        Layer::Cycleways,
        Layer::Water,
        Layer::Railways,
        Layer::Green,
    ];

    /// Tags selecting this layer's features, `None` for the road network layers.
    pub fn tag_filter(self) -> Option<TagFilter> {
        match self {
            Layer::Buildings => Some(TagFilter::buildings()),
            Layer::Water => Some(TagFilter::water()),
            Layer::Railways => Some(TagFilter::railways()),
            Layer::Green => Some(TagFilter::green()),
            Layer::Roads | Layer::Cycleways => None,
        }
    }
}

/// Which layers to load for an area. Values are never changed in place;
/// overrides produce a new selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layers {
    pub buildings: bool,
    pub roads: bool,
    pub cycleways: bool,
    pub water: bool,
    pub railways: bool,
    pub green: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            buildings: false,
            roads: true,
            cycleways: true,
            water: true,
            railways: true,
            green: false,
        }
    }
}

impl Layers {
    pub fn contains(&self, layer: Layer) -> bool {
        match layer {
            Layer::Buildings => self.buildings,
            Layer::Roads => self.roads,
            Layer::Cycleways => self.cycleways,
            Layer::Water => self.water,
            Layer::Railways => self.railways,
            Layer::Green => self.green,
        }
    }

    pub fn with(mut self, layer: Layer, enabled: bool) -> Self {
        let flag = match layer {
            Layer::Buildings => &mut self.buildings,
            Layer::Roads => &mut self.roads,
            Layer::Cycleways => &mut self.cycleways,
            Layer::Water => &mut self.water,
            Layer::Railways => &mut self.railways,
            Layer::Green => &mut self.green,
        };
        *flag = enabled;
        self
    }

    /// Later overrides win over earlier ones for the same layer.
    pub fn merged(self, overrides: impl IntoIterator<Item = (Layer, bool)>) -> Self {
        overrides
            .into_iter()
            .fold(self, |layers, (layer, enabled)| layers.with(layer, enabled))
    }

    pub fn enabled(self) -> impl Iterator<Item = Layer> {
        Layer::ALL
            .into_iter()
            .filter(move |layer| self.contains(*layer))
    }
}
