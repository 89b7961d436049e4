use crate::domain::panel::{PanelFilter, PanelSize, PanelValue};
use serde::Deserialize;
use std::collections::HashMap;

const ENV_PREFIX: &str = "PANELS";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
    /// Tag holding the project id on every stored point
    #[serde(default = "default_project_tag")]
    pub project_tag: String,
}

fn default_project_tag() -> String {
    "project".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardsConfig {
    #[serde(default)]
    pub dashboards: Vec<DashboardConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PanelKindConfig {
    Plot,
    Counter,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub id: Option<String>,
    pub title: String,
    pub kind: PanelKindConfig,
    #[serde(default)]
    pub size: PanelSize,
    #[serde(default)]
    pub filter: PanelFilter,
    pub plot_type: Option<String>,
    #[serde(default)]
    pub values: Vec<PanelValue>,
    pub agg: Option<String>,
    pub value: Option<PanelValue>,
    pub text: Option<String>,
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    read_server_config(config::File::with_name("config/server"), environment())
}

/// `PANELS_INFLUX__TOKEN` overrides `influx.token`
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn read_server_config<S>(file: S, env: config::Environment) -> anyhow::Result<ServerConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_dashboards_config() -> anyhow::Result<DashboardsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboards"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in one left-to-right pass.
///
/// Substituted text is never scanned again; unknown placeholders are kept.
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(query.len());
    let mut rest = query;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };
        match vars.get(&after[..end]) {
            Some(value) => result.push_str(value),
            None => result.push_str(&rest[start..start + end + 3]),
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    result
}
