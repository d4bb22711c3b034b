use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PortfolioResult;
use crate::gallery::GalleryParams;
use crate::particles::FieldParams;
use crate::viewer::ViewerParams;
use crate::wave::WaveParams;

/// Tunables for both visualizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizConfig {
    pub viewer: ViewerParams,
    pub wave: WaveParams,
    pub inner: FieldParams,
    pub outer: FieldParams,
    pub gallery: GalleryParams,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            viewer: ViewerParams::default(),
            wave: WaveParams::default(),
            inner: FieldParams::inner(),
            outer: FieldParams::outer(),
            gallery: GalleryParams::default(),
        }
    }
}

impl VizConfig {
    /// Apply a partial JSON object on top of the defaults. Only the keys it
    /// names change, at any depth.
    pub fn from_json(json: &str) -> PortfolioResult<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, overrides);
        Ok(serde_json::from_value(merged)?)
    }

    /// Parse an optional `data-config` override, falling back to defaults on
    /// bad input.
    pub fn from_attribute(attr: Option<&str>) -> Self {
        match attr.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(json) => Self::from_json(json).unwrap_or_else(|err| {
                log::error!("ignoring data-config: {err}");
                Self::default()
            }),
        }
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
