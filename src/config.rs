//! Science program and site configuration.
//!
//! Programs are JSON documents describing one follow-up proposal: who runs
//! it, how urgent it is, which alert types it subscribes to, its cut
//! registry and the observability requirements of its windows. Loading a
//! program needs the plugin registry, so every custom cut is resolved at
//! load and a bad registry entry never reaches alert processing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use qtty::{Degrees, Hours};
use serde_json::Value as Json;

use crate::cuts::value::{Dimension, Value};
use crate::cuts::CutCollection;
use crate::models::{ObservabilityConfig, Site};
use crate::plugins::PluginRegistry;

/// Administrative proposal details, carried through for reporting.
#[derive(Debug, Clone)]
pub struct ProposalDetails {
    pub id: String,
    pub principal_investigator: String,
    pub title: String,
    pub proposal_type: String,
}

/// One alert type a program subscribes to.
#[derive(Debug, Clone)]
pub struct AllowedAlertType {
    pub experiment: String,
    pub alert_type: String,
}

/// How accepted observations are pointed.
#[derive(Debug, Clone, Copy)]
pub enum PointingMode {
    /// Symmetric wobble around the target with the given offset.
    Wobble { offset: Degrees, angle: Degrees },
    /// Single on-source pointing.
    OnSource,
}

/// Scheduling parameters of a program's observations.
#[derive(Debug, Clone)]
pub struct ObservationConfig {
    pub priority: i64,
    pub intended_action: String,
    pub urgency: String,
    pub use_custom_coords: bool,
    pub max_exposure: Hours,
    pub number_blocks: usize,
    pub pointing_mode: PointingMode,
}

/// Which channels are told about received and accepted alerts.
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    pub scheduler_on_received: bool,
    pub scheduler_on_accepted: bool,
    pub operators_on_received: bool,
    pub operators_on_accepted: bool,
}

impl NotificationOptions {
    pub fn any_on_received(&self) -> bool {
        self.scheduler_on_received || self.operators_on_received
    }

    pub fn any_on_accepted(&self) -> bool {
        self.scheduler_on_accepted || self.operators_on_accepted
    }
}

/// One loaded science follow-up program.
#[derive(Debug, Clone)]
pub struct ScienceConfig {
    pub name: String,
    pub proposal: ProposalDetails,
    pub observation: ObservationConfig,
    pub allowed_alert_types: Vec<AllowedAlertType>,
    pub cuts: CutCollection,
    pub window_requirements: ObservabilityConfig,
    pub notifications: NotificationOptions,
    pub detections_public: bool,
    pub followup_public: bool,
}

impl ScienceConfig {
    /// Parse one program document. `plugins` resolves the custom cuts.
    pub fn from_json(data: &Json, plugins: &PluginRegistry) -> Result<Self> {
        let name = str_field(data, "Name")?.to_string();

        let proposal = data
            .get("ProposalDetails")
            .with_context(|| format!("program '{name}': missing 'ProposalDetails'"))?;
        let proposal = ProposalDetails {
            id: str_field(proposal, "ID")?.to_string(),
            principal_investigator: str_field(proposal, "PI")?.to_string(),
            title: str_field(proposal, "Title")?.to_string(),
            proposal_type: str_field(proposal, "Type")?.to_string(),
        };

        let observation = data
            .get("ObservationConfig")
            .with_context(|| format!("program '{name}': missing 'ObservationConfig'"))?;
        let observation = parse_observation(observation)
            .with_context(|| format!("program '{name}': bad 'ObservationConfig'"))?;

        let allowed_alert_types = parse_allowed_alert_types(data)
            .with_context(|| format!("program '{name}': bad 'AllowedAlertTypes'"))?;

        let cut_registry = data
            .get("ProcessingCuts")
            .with_context(|| format!("program '{name}': missing 'ProcessingCuts'"))?;
        let cuts = CutCollection::from_registry(cut_registry, plugins)
            .with_context(|| format!("program '{name}': bad cut registry"))?;

        let requirements = data
            .get("ObservationWindowRequirements")
            .with_context(|| format!("program '{name}': missing 'ObservationWindowRequirements'"))?;
        let window_requirements = parse_window_requirements(requirements)
            .with_context(|| format!("program '{name}': bad window requirements"))?;

        let notifications = parse_notifications(data.get("Notifications"));

        Ok(ScienceConfig {
            name,
            proposal,
            observation,
            allowed_alert_types,
            cuts,
            window_requirements,
            notifications,
            detections_public: bool_field_or(data, "DetectionsPublic", false),
            followup_public: bool_field_or(data, "ActionPublic", false),
        })
    }

    pub fn from_path(path: &Path, plugins: &PluginRegistry) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading program config {}", path.display()))?;
        let data: Json = serde_json::from_str(&text)
            .with_context(|| format!("parsing program config {}", path.display()))?;
        Self::from_json(&data, plugins)
    }

    /// Whether this program subscribes to the alert identified by `ivorn`.
    pub fn accepts_alert_type(&self, ivorn: &str) -> bool {
        self.allowed_alert_types
            .iter()
            .any(|allowed| ivorn.contains(&allowed.alert_type))
    }
}

/// Site-level configuration: where we observe and where program documents
/// live.
#[derive(Debug, Clone)]
pub struct SiteConfiguration {
    pub site: Site,
    pub science_config_dir: PathBuf,
    pub allowed_alerts: Vec<String>,
}

impl SiteConfiguration {
    pub fn from_json(data: &Json) -> Result<Self> {
        let section = data.get("SiteConfig").context("missing 'SiteConfig'")?;
        let site_name = str_field(section, "site")?;
        let site = Site::by_name(site_name)
            .with_context(|| format!("unknown site '{site_name}'"))?;
        let science_config_dir = PathBuf::from(str_field(section, "science_config_path")?);
        let allowed_alerts = section
            .get("allowed_alerts")
            .and_then(Json::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Json::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(SiteConfiguration {
            site,
            science_config_dir,
            allowed_alerts,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading site config {}", path.display()))?;
        let data: Json = serde_json::from_str(&text)
            .with_context(|| format!("parsing site config {}", path.display()))?;
        Self::from_json(&data)
    }

    /// Load every `.json` program document under the configured directory.
    pub fn load_science_configs(&self, plugins: &PluginRegistry) -> Result<Vec<ScienceConfig>> {
        let mut programs = Vec::new();
        let entries = fs::read_dir(&self.science_config_dir).with_context(|| {
            format!(
                "listing program configs in {}",
                self.science_config_dir.display()
            )
        })?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                programs.push(ScienceConfig::from_path(&path, plugins)?);
            }
        }
        log::info!(
            "loaded {} science program(s) from {}",
            programs.len(),
            self.science_config_dir.display()
        );
        Ok(programs)
    }
}

fn parse_observation(data: &Json) -> Result<ObservationConfig> {
    let pointing_mode = match data.get("PointingMode") {
        Some(section) => {
            let wobble = section
                .get("Wobble")
                .context("only 'Wobble' pointing is supported")?;
            PointingMode::Wobble {
                offset: parse_angle(wobble.get("Offset").context("missing 'Offset'")?)?,
                angle: parse_angle(wobble.get("Angle").context("missing 'Angle'")?)?,
            }
        }
        None => PointingMode::OnSource,
    };

    Ok(ObservationConfig {
        priority: data
            .get("Priority")
            .and_then(Json::as_i64)
            .context("missing or non-integer 'Priority'")?,
        intended_action: str_field(data, "IntendedAction")?.to_string(),
        urgency: str_field(data, "Urgency")?.to_string(),
        use_custom_coords: bool_field_or(data, "UseCustomCoords", false),
        max_exposure: parse_duration(
            data.get("MaxExposure").context("missing 'MaxExposure'")?,
        )?,
        number_blocks: data
            .get("NumberBlocks")
            .and_then(Json::as_u64)
            .context("missing or non-integer 'NumberBlocks'")? as usize,
        pointing_mode,
    })
}

fn parse_allowed_alert_types(data: &Json) -> Result<Vec<AllowedAlertType>> {
    let entries = data
        .get("AllowedAlertTypes")
        .and_then(Json::as_object)
        .context("missing 'AllowedAlertTypes'")?;
    let mut allowed = Vec::new();
    for (experiment, types) in entries {
        let types = types
            .as_array()
            .with_context(|| format!("alert types of '{experiment}' must be an array"))?;
        for alert_type in types {
            let alert_type = alert_type
                .as_str()
                .with_context(|| format!("alert types of '{experiment}' must be strings"))?;
            allowed.push(AllowedAlertType {
                experiment: experiment.clone(),
                alert_type: alert_type.to_string(),
            });
        }
    }
    Ok(allowed)
}

fn parse_window_requirements(data: &Json) -> Result<ObservabilityConfig> {
    let mut config = ObservabilityConfig::new(
        parse_angle(data.get("MaxZenithAngle").context("missing 'MaxZenithAngle'")?)?,
        parse_duration(data.get("MaxDelay").context("missing 'MaxDelay'")?)?,
        parse_duration(data.get("MinDuration").context("missing 'MinDuration'")?)?,
    );
    if let Some(sky) = data.get("SkyQuality") {
        if let Some(min_nsb) = sky.get("MinNSBRange").and_then(Json::as_f64) {
            config.min_nsb = min_nsb;
        }
        if let Some(max_nsb) = sky.get("MaxNSBRange").and_then(Json::as_f64) {
            config.max_nsb = max_nsb;
        }
        if let Some(illumination) = sky.get("Illumination").and_then(Json::as_f64) {
            config.illumination = illumination;
        }
    }
    if let Some(limit) = data.get("SunAltitudeLimit") {
        config.sun_altitude_limit = parse_angle(limit)?;
    }
    if let Some(limit) = data.get("MoonAltitudeLimit") {
        config.moon_altitude_limit = parse_angle(limit)?;
    }
    Ok(config)
}

fn parse_notifications(data: Option<&Json>) -> NotificationOptions {
    let Some(data) = data else {
        return NotificationOptions::default();
    };
    let flag = |section: &str, key: &str| {
        data.get(section)
            .and_then(|s| s.get(key))
            .and_then(Json::as_bool)
            .unwrap_or(false)
    };
    NotificationOptions {
        scheduler_on_received: flag("Scheduler", "OnReceived"),
        scheduler_on_accepted: flag("Scheduler", "OnAccepted"),
        operators_on_received: flag("Operators", "OnReceived"),
        operators_on_accepted: flag("Operators", "OnAccepted"),
    }
}

/// Parse a `[magnitude, unit]` pair or a `"<magnitude> <unit>"` string
/// into a typed value.
fn parse_quantity_field(data: &Json) -> Result<Value> {
    let value = match data {
        Json::Array(pair) if pair.len() == 2 => {
            let magnitude = pair[0]
                .as_f64()
                .context("quantity magnitude must be a number")?;
            let unit = pair[1].as_str().context("quantity unit must be a string")?;
            Value::quantity(magnitude, unit)
                .with_context(|| format!("unknown unit '{unit}'"))?
        }
        Json::String(s) => Value::coerce_str(s),
        other => bail!("expected a [magnitude, unit] pair, got {other}"),
    };
    Ok(value)
}

fn parse_angle(data: &Json) -> Result<Degrees> {
    match parse_quantity_field(data)? {
        Value::Quantity {
            magnitude,
            dimension: Dimension::Angle,
        } => Ok(Degrees::new(magnitude)),
        other => bail!("expected an angle, got {other}"),
    }
}

fn parse_duration(data: &Json) -> Result<Hours> {
    match parse_quantity_field(data)? {
        Value::Quantity {
            magnitude,
            dimension: Dimension::Time,
        } => Ok(Hours::new(magnitude / 3600.0)),
        other => bail!("expected a duration, got {other}"),
    }
}

fn str_field<'a>(data: &'a Json, key: &str) -> Result<&'a str> {
    data.get(key)
        .and_then(Json::as_str)
        .with_context(|| format!("missing or non-string '{key}'"))
}

fn bool_field_or(data: &Json, key: &str, default: bool) -> bool {
    data.get(key).and_then(Json::as_bool).unwrap_or(default)
}
