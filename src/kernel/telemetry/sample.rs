use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::kernel::event::ImageRef;

/// One recorded value. Image payloads serialize as their frame id only.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Image(ImageRef),
    Float(f32),
    Str(String),
}

/// One fully-populated sample for a single tick.
///
/// Field order matches the session schema exactly; created fresh each tick
/// and owned by the persistence layer after hand-off, never mutated.
#[derive(Debug, Clone)]
pub struct Sample {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Sample {
    pub fn new(fields: Vec<(&'static str, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
