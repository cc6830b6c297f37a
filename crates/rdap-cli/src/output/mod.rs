//! Output formatting for different formats.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Print a value as JSON or YAML.
///
/// Returns `false` for [`OutputFormat::Pretty`], leaving rendering to the caller.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> anyhow::Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Pretty => return Ok(false),
    }
    Ok(true)
}

// ============================================================================
// RDAP payload summaries
// ============================================================================

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Event")]
    action: String,
    #[tabled(rename = "Date")]
    date: String,
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Handle")]
    handle: String,
    #[tabled(rename = "Roles")]
    roles: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// The fields worth showing from an RDAP object, whatever its class.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RdapSummary {
    pub object_class: Option<String>,
    pub handle: Option<String>,
    pub name: Option<String>,
    pub range: Option<String>,
    pub country: Option<String>,
    pub status: Vec<String>,
    pub nameservers: Vec<String>,
    pub events: Vec<(String, String)>,
    pub entities: Vec<(String, String, String)>,
    pub port43: Option<String>,
}

impl RdapSummary {
    /// Pull the common RDAP members out of a payload.
    pub fn from_payload(payload: &Value) -> Self {
        let range = match (str_field(payload, "startAddress"), str_field(payload, "endAddress")) {
            (Some(start), Some(end)) => Some(format!("{start} - {end}")),
            _ => match (payload.get("startAutnum"), payload.get("endAutnum")) {
                (Some(start), Some(end)) => Some(format!("AS{start} - AS{end}")),
                _ => None,
            },
        };

        Self {
            object_class: str_field(payload, "objectClassName"),
            handle: str_field(payload, "handle"),
            name: str_field(payload, "ldhName").or_else(|| str_field(payload, "name")),
            range,
            country: str_field(payload, "country"),
            status: strings(payload.get("status")),
            nameservers: array(payload, "nameservers")
                .filter_map(|ns| str_field(ns, "ldhName"))
                .collect(),
            events: array(payload, "events")
                .filter_map(|event| {
                    Some((str_field(event, "eventAction")?, str_field(event, "eventDate")?))
                })
                .collect(),
            entities: array(payload, "entities")
                .map(|entity| {
                    (
                        str_field(entity, "handle").unwrap_or_default(),
                        strings(entity.get("roles")).join(", "),
                        vcard_name(entity).unwrap_or_default(),
                    )
                })
                .collect(),
            port43: str_field(payload, "port43"),
        }
    }

    /// Print the summary with colors and tables.
    pub fn print(&self, query: &str) {
        let class = self.object_class.as_deref().unwrap_or("object");
        println!("{} {} {}", "RDAP".bold(), class.bold(), query.cyan().bold());
        println!();

        let fields = [
            ("Handle:", &self.handle),
            ("Name:", &self.name),
            ("Range:", &self.range),
            ("Country:", &self.country),
            ("WHOIS:", &self.port43),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                println!("  {} {}", label.bold(), value);
            }
        }
        if !self.status.is_empty() {
            println!("  {} {}", "Status:".bold(), self.status.join(", ").yellow());
        }
        if !self.nameservers.is_empty() {
            println!("  {} {}", "Nameservers:".bold(), self.nameservers.join(", "));
        }

        if !self.events.is_empty() {
            println!();
            println!("{}", "Events:".bold().underline());
            let rows: Vec<EventRow> = self
                .events
                .iter()
                .map(|(action, date)| EventRow {
                    action: action.clone(),
                    date: date.clone(),
                })
                .collect();
            println!("{}", Table::new(&rows).with(Style::rounded()));
        }

        if !self.entities.is_empty() {
            println!();
            println!("{}", "Entities:".bold().underline());
            let rows: Vec<EntityRow> = self
                .entities
                .iter()
                .map(|(handle, roles, name)| EntityRow {
                    handle: handle.clone(),
                    roles: roles.clone(),
                    name: name.clone(),
                })
                .collect();
            println!("{}", Table::new(&rows).with(Style::rounded()));
        }
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn array<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// The `fn` property of a jCard: `["vcard", [["fn", {}, "text", "Name"], ...]]`
fn vcard_name(entity: &Value) -> Option<String> {
    entity
        .get("vcardArray")?
        .get(1)?
        .as_array()?
        .iter()
        .find(|property| property.get(0).and_then(Value::as_str) == Some("fn"))?
        .get(3)?
        .as_str()
        .map(str::to_string)
}
