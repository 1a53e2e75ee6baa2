use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            limits: LimitsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Die size in cells. The canonical session is a 60x60 grid (the original
/// 480px canvas at tile size 8).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_grid_width")]
    pub width: i32,
    #[serde(default = "default_grid_height")]
    pub height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_width(),
            height: default_grid_height(),
        }
    }
}

/// Range the clamped inputs (data width, register count, ALU count) are
/// sanitized into.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_limit_min")]
    pub min: i32,
    #[serde(default = "default_limit_max")]
    pub max: i32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min: default_limit_min(),
            max: default_limit_max(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_image_path")]
    pub image: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image: default_image_path(),
        }
    }
}

fn default_grid_width() -> i32 {
    60
}

fn default_grid_height() -> i32 {
    60
}

fn default_limit_min() -> i32 {
    1
}

fn default_limit_max() -> i32 {
    99
}

fn default_image_path() -> String {
    "output/layout.png".to_string()
}
