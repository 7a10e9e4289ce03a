/// How a linear animation's heading changes at a control point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMode {
    /// Add the unsigned angle between consecutive segment directions.
    #[default]
    Accumulated,
    /// Point along the new segment: `atan2(dx, dz)`.
    Absolute,
}

/// Build and traversal options.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphOpts {
    /// Heading rule for every linear animation instantiated by the build.
    pub heading_mode: HeadingMode,
    /// Deepest component nesting the traversal accepts.
    pub max_depth: usize,
    /// Used when `scene.axis_length` is missing or unparseable.
    pub default_axis_length: f64,
    /// Substituted for a colour channel that is missing or outside `[0, 1]`.
    pub default_channel: f64,
}

impl Default for GraphOpts {
    fn default() -> Self {
        Self {
            heading_mode: HeadingMode::Accumulated,
            max_depth: 256,
            default_axis_length: 10.0,
            default_channel: 0.3,
        }
    }
}

impl GraphOpts {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> crate::SceneResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| crate::SceneError::serde(format!("parse graph options JSON: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/opts.rs"]
mod tests;
