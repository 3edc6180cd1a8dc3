use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;

/// Storage type of one recorded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Image,
    Float,
    Str,
}

/// One (name, type) entry of the sample layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleField {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl SampleField {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// The ordered field list defining one recordable sample.
///
/// Base fields, then pilot outputs when recording during autonomy is
/// enabled, then noise values when noise injection is enabled, then the
/// final fused command last. Deterministic given the same flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSchema {
    fields: Vec<SampleField>,
}

impl SampleSchema {
    pub fn build(cfg: &DriveConfig) -> Self {
        let mut fields = vec![
            SampleField::new("cam/image_array", FieldKind::Image),
            SampleField::new("user/angle", FieldKind::Float),
            SampleField::new("user/throttle", FieldKind::Float),
            SampleField::new("user/mode", FieldKind::Str),
        ];

        if cfg.record_during_ai {
            fields.push(SampleField::new("pilot/angle", FieldKind::Float));
            fields.push(SampleField::new("pilot/throttle", FieldKind::Float));
        }

        if cfg.control_noise {
            fields.push(SampleField::new("user/angle_noise", FieldKind::Float));
            fields.push(SampleField::new("user/throttle_noise", FieldKind::Float));
        }

        fields.push(SampleField::new("angle", FieldKind::Float));
        fields.push(SampleField::new("throttle", FieldKind::Float));

        Self { fields }
    }

    pub fn fields(&self) -> &[SampleField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}
