use crate::TrackletId;
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON-style node attributes, the label type of graphs built by [`crate::lineage_graph`].
pub type NodeAttrs = serde_json::Map<String, Value>;

pub const DEFAULT_TRACKLET_ID_KEY: &str = "tracklet_id";

/// Node labels that can carry a tracklet id under a named attribute.
pub trait TrackletLabel {
    /// Returns `None` when the attribute is absent or not a non-negative integer.
    fn tracklet_id(&self, key: &str) -> Option<TrackletId>;

    fn set_tracklet_id(&mut self, key: &str, id: TrackletId);
}

impl TrackletLabel for NodeAttrs {
    fn tracklet_id(&self, key: &str) -> Option<TrackletId> {
        self.get(key).and_then(Value::as_u64)
    }

    fn set_tracklet_id(&mut self, key: &str, id: TrackletId) {
        self.insert(key.to_string(), Value::from(id));
    }
}

impl TrackletLabel for BTreeMap<String, TrackletId> {
    fn tracklet_id(&self, key: &str) -> Option<TrackletId> {
        self.get(key).copied()
    }

    fn set_tracklet_id(&mut self, key: &str, id: TrackletId) {
        self.insert(key.to_string(), id);
    }
}
