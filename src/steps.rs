use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the step definition file, relative to the working directory.
pub const DEFAULT_STEPS_FILE: &str = "list_of_steps.yaml";

/// A step whose outcomes are tallied.
///
/// The optional behaviours default to off, so a bare step name in the
/// definition file only contributes to the statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub name: String,
    /// Zero-based position in the definition file; also the display order.
    pub order: usize,
    pub download_logs: bool,
    /// Marker that opens the log region of interest. Only consulted when
    /// `download_logs` is set.
    pub search_string: String,
    pub show_url: bool,
}

impl StepDefinition {
    /// Marker to scan for when a failure log should be extracted.
    pub fn log_search(&self) -> Option<&str> {
        if self.download_logs && !self.search_string.is_empty() {
            Some(&self.search_string)
        } else {
            None
        }
    }
}

/// One entry of the step definition file: either a bare name or an object
/// carrying per-step flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StepEntry {
    Name(String),
    Detailed(DetailedEntry),
}

#[derive(Debug, Clone, Deserialize)]
struct DetailedEntry {
    name: String,
    #[serde(default, alias = "download_logs_on_failure")]
    download_logs: bool,
    #[serde(default)]
    search_string: Option<String>,
    #[serde(default, alias = "show_url_on_failure")]
    show_url: bool,
}

/// TOML has no top-level arrays, so the list lives under `steps`.
#[derive(Debug, Deserialize)]
struct TomlSteps {
    #[serde(default)]
    steps: Vec<StepEntry>,
}

/// Ordered set of configured steps, keyed by step name.
#[derive(Debug, Clone, Default)]
pub struct StepCatalog {
    steps: IndexMap<String, StepDefinition>,
}

impl StepCatalog {
    /// Loads the catalog, degrading to an empty one when the file is
    /// missing or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => {
                info!("Loaded {} steps from {}", catalog.len(), path.display());
                catalog
            }
            Err(err) => {
                warn!("Could not load {}: {err:#}", path.display());
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read step file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        Self::parse(&contents, extension)
            .with_context(|| format!("Failed to parse step file: {}", path.display()))
    }

    /// Parses file contents, choosing the format from the file extension.
    fn parse(contents: &str, extension: &str) -> Result<Self> {
        let entries: Vec<StepEntry> = match extension {
            "json" => serde_json::from_str(contents)?,
            "toml" => toml::from_str::<TomlSteps>(contents)?.steps,
            "yaml" | "yml" => parse_yaml(contents)?,
            _ => parse_yaml(contents).or_else(|_| serde_json::from_str(contents))?,
        };

        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: Vec<StepEntry>) -> Self {
        let mut steps = IndexMap::new();

        for entry in entries {
            let (name, download_logs, search_string, show_url) = match entry {
                StepEntry::Name(name) => (name, false, String::new(), false),
                StepEntry::Detailed(detailed) => (
                    detailed.name,
                    detailed.download_logs,
                    detailed.search_string.unwrap_or_default(),
                    detailed.show_url,
                ),
            };

            if steps.contains_key(&name) {
                warn!("Ignoring duplicate step definition: {name}");
                continue;
            }

            let order = steps.len();
            steps.insert(
                name.clone(),
                StepDefinition {
                    name,
                    order,
                    download_logs,
                    search_string,
                    show_url,
                },
            );
        }

        Self { steps }
    }

    pub fn get(&self, name: &str) -> Option<&StepDefinition> {
        self.steps.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.values()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step asks for failure logs to be downloaded.
    pub fn wants_logs(&self) -> bool {
        self.iter().any(|step| step.log_search().is_some())
    }
}

/// An empty YAML document deserializes to `null`; treat it as no steps.
fn parse_yaml(contents: &str) -> Result<Vec<StepEntry>> {
    let entries: Option<Vec<StepEntry>> = serde_yaml::from_str(contents)?;
    Ok(entries.unwrap_or_default())
}

#[cfg(test)]
impl StepCatalog {
    pub fn from_names(names: &[&str]) -> Self {
        Self::from_entries(
            names
                .iter()
                .map(|name| StepEntry::Name((*name).to_string()))
                .collect(),
        )
    }

    pub fn from_yaml(contents: &str) -> Self {
        Self::parse(contents, "yaml").unwrap()
    }
}
