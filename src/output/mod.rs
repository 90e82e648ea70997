// Output module - Output formatting (JSON, Terminal)

pub mod json;
pub mod terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    JsonPretty,
}

impl OutputFormat {
    /// Pick the format from the global CLI flags; pretty wins over compact
    pub fn from_flags(json: bool, json_pretty: bool) -> Self {
        if json_pretty {
            OutputFormat::JsonPretty
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        }
    }

    pub fn is_json(&self) -> bool {
        !matches!(self, OutputFormat::Terminal)
    }
}
