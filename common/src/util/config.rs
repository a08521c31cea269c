use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_pairs_file")]
    pub pairs_file: String,
    #[serde(default = "default_output_report")]
    pub output_report: String,
    #[serde(default = "default_output_image")]
    pub output_image: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pairs_file: default_pairs_file(),
            output_report: default_output_report(),
            output_image: default_output_image(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_verify")]
    pub verify: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            verify: default_verify(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            margin: default_margin(),
        }
    }
}

fn default_pairs_file() -> String {
    "inputs/pairs.txt".to_string()
}

fn default_output_report() -> String {
    "output/routes.txt".to_string()
}

fn default_output_image() -> String {
    "output/channel.png".to_string()
}

fn default_verify() -> bool {
    true
}

fn default_cell_size() -> u32 {
    24
}

fn default_margin() -> u32 {
    12
}
