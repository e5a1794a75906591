//! Configuration for tracing, layout, rendering and animation.
//!
//! Every config is a plain serde struct with `#[serde(default)]`, so a
//! partial JSON document only overrides the fields it names.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default delay between animation frames.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 1000;

/// Load a config from JSON, falling back to defaults for missing fields.
pub trait JsonConfig: DeserializeOwned + Default {
    /// Parse from a JSON string.
    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Tracer behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Record the source location of every `capture` call.
    pub track_code_lines: bool,
}

impl TracerConfig {
    /// Enable source location tracking.
    pub fn with_code_lines(mut self) -> Self {
        self.track_code_lines = true;
        self
    }
}

impl JsonConfig for TracerConfig {}

/// Playback parameters of an animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fixed delay between frames, in milliseconds.
    pub interval_ms: u64,
    /// Whether playback loops after the last frame.
    pub repeat: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            repeat: false,
        }
    }
}

impl AnimationConfig {
    /// Set the inter-frame delay.
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Loop playback.
    pub fn looping(mut self) -> Self {
        self.repeat = true;
        self
    }
}

impl JsonConfig for AnimationConfig {}

/// Parameters of the layout algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Force-directed iterations.
    pub iterations: usize,
    /// Seed for force-directed initial positions. `None` draws from entropy.
    pub seed: Option<u64>,
    /// Positions are scaled into `[-scale, scale]`.
    pub scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            seed: None,
            scale: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Seed the force-directed layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl JsonConfig for LayoutConfig {}

/// Colors used by the renderers, as color names or hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Plain list / dictionary cell.
    pub cell: String,
    /// Highlighted index or key.
    pub index_highlight: String,
    /// Highlighted value.
    pub value_highlight: String,
    /// Stack cell.
    pub stack_cell: String,
    /// Queue cell.
    pub queue_cell: String,
    /// Stack top / queue front and rear.
    pub boundary: String,
    /// Graph or tree node.
    pub node: String,
    /// Highlighted node.
    pub node_highlight: String,
    /// Graph or tree edge.
    pub edge: String,
    /// Highlighted edge and list range outline.
    pub edge_highlight: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            cell: "#f0f0f0".to_string(),
            index_highlight: "#ffcf75".to_string(),
            value_highlight: "#8dc7f3".to_string(),
            stack_cell: "lightblue".to_string(),
            queue_cell: "lightgreen".to_string(),
            boundary: "yellow".to_string(),
            node: "#aed9e6".to_string(),
            node_highlight: "#ff7f7f".to_string(),
            edge: "#666666".to_string(),
            edge_highlight: "red".to_string(),
        }
    }
}

/// Renderer options shared by all variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Colors.
    pub palette: Palette,
    /// Show element indices under list cells.
    pub show_indices: bool,
    /// Attach the step's code panel to each frame.
    pub show_code: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            show_indices: true,
            show_code: false,
        }
    }
}

impl RenderConfig {
    /// Attach code panels to frames.
    pub fn with_code(mut self) -> Self {
        self.show_code = true;
        self
    }
}

impl JsonConfig for RenderConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json(r#"{"show_code": true, "palette": {"node": "blue"}}"#)
            .unwrap();

        assert!(config.show_code);
        assert!(config.show_indices);
        assert_eq!(config.palette.node, "blue");
        assert_eq!(config.palette.edge, "#666666");
    }

    #[test]
    fn test_animation_defaults() {
        let config = AnimationConfig::from_json("{}").unwrap();
        assert_eq!(config.interval_ms, DEFAULT_FRAME_INTERVAL_MS);
        assert!(!config.repeat);
    }

    #[test]
    fn test_layout_seed() {
        let config = LayoutConfig::from_json(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.iterations, 50);
    }
}
