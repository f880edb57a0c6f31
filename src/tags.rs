use crate::network::{Edge, TagValue, Tags};

pub trait IsCycleway {
    fn is_cycleway(&self) -> bool;
}

/// Any `cycleway` tag, whatever its value, or `highway=cycleway`.
impl IsCycleway for Tags {
    fn is_cycleway(&self) -> bool {
        self.contains_key("cycleway")
            || matches!(
                self.get("highway").and_then(TagValue::as_text),
                Some("cycleway")
            )
    }
}

impl IsCycleway for Edge {
    fn is_cycleway(&self) -> bool {
        self.tags.is_cycleway()
    }
}
