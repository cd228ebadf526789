use kissan_core::models::Plot;
use kissan_tools::ToolDefinition;
use serde::Serialize;
use tabled::Tabled;

/// Output for the image command
#[derive(Debug, Serialize)]
pub struct ImageOutput {
    pub provider: String,
    pub utm_epsg: Option<u32>,
    pub exported_to: Option<String>,
    #[serde(flatten)]
    pub summary: serde_json::Value,
}

/// One row of `kissan tools`
#[derive(Debug, Serialize, Tabled)]
pub struct ToolRow {
    pub name: String,
    pub arguments: String,
    pub description: String,
}

impl From<&ToolDefinition> for ToolRow {
    fn from(definition: &ToolDefinition) -> Self {
        let required: Vec<&str> = definition.parameters["required"]
            .as_array()
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default();
        Self {
            name: definition.name.clone(),
            arguments: required.join(", "),
            description: definition.description.clone(),
        }
    }
}

/// One row of `kissan farm list-plots`
#[derive(Debug, Serialize, Tabled)]
pub struct PlotRow {
    pub id: i64,
    pub name: String,
    pub boundary: String,
}

impl From<Plot> for PlotRow {
    fn from(plot: Plot) -> Self {
        Self { id: plot.id, name: plot.name, boundary: plot.boundary }
    }
}

/// One row of `kissan config`
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    pub key: String,
    pub value: String,
    pub source: String,
}

/// Result of one `kissan doctor` check
#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
    pub hint: Option<String>,
}

impl DoctorCheck {
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { name: name.into(), passed: true, detail: detail.into(), hint: None }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self { name: name.into(), passed: false, detail: detail.into(), hint: Some(hint.into()) }
    }
}
