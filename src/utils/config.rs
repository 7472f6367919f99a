use crate::algorithms::field::ring_mirrors;
use crate::algorithms::projection::{project, ProjectionValidator};
use crate::core::{
    FieldConfiguration, GeoPoint, DEFAULT_FOCAL_HEIGHT_OFFSET_M, MAX_FLAT_EARTH_EXTENT_M,
    MIN_TARGET_DISTANCE_M,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete on-disk configuration for a heliostat field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeliostatConfig {
    /// Tower base position; its height is the tower top above ground
    pub tower: GeoPoint,
    /// Focal point height above the tower top (meters)
    pub focal_height_offset: f64,
    /// Mirror placement
    pub layout: MirrorLayout,
    /// Tick scheduling
    #[serde(default)]
    pub tracking: TrackingConfig,
}

/// How mirrors are placed around the tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MirrorLayout {
    /// Evenly spaced ring centered on the tower, first mirror due north
    Ring {
        count: usize,
        radius_m: f64,
        mirror_height: f64,
    },
    /// Explicit mirror positions, in field order
    Explicit { mirrors: Vec<GeoPoint> },
}

/// Scheduler timing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Delay between ticks (milliseconds)
    pub interval_ms: u64,
    /// Stop after this many ticks; run indefinitely when absent
    pub max_ticks: Option<u64>,
    /// Abort the run on the first failed tick instead of reporting and continuing
    #[serde(default)]
    pub stop_on_error: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 10_000,
            max_ticks: None,
            stop_on_error: false,
        }
    }
}

impl Default for HeliostatConfig {
    fn default() -> Self {
        Self {
            tower: GeoPoint::new(35.6892, 51.3890, 100.0),
            focal_height_offset: DEFAULT_FOCAL_HEIGHT_OFFSET_M,
            layout: MirrorLayout::Ring {
                count: 20,
                radius_m: 200.0,
                mirror_height: 5.0,
            },
            tracking: TrackingConfig::default(),
        }
    }
}

impl HeliostatConfig {
    /// Mirror positions described by the layout
    pub fn mirrors(&self) -> Vec<GeoPoint> {
        match &self.layout {
            MirrorLayout::Ring {
                count,
                radius_m,
                mirror_height,
            } => ring_mirrors(&self.tower, *count, *radius_m, *mirror_height),
            MirrorLayout::Explicit { mirrors } => mirrors.clone(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
    /// Field geometry rejected
    GeometryValidation { reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, value, reason } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
            ConfigError::GeometryValidation { reason } => {
                write!(f, "Geometry validation error: {}", reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_result(self) -> Result<Vec<String>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }
}

/// Loads, validates and persists the field configuration
pub struct ConfigurationManager {
    config: HeliostatConfig,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a manager holding the default field
    pub fn new() -> Self {
        Self {
            config: HeliostatConfig::default(),
            is_modified: false,
        }
    }

    /// Create a manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &HeliostatConfig {
        &self.config
    }

    /// Replace the configuration after validation
    pub fn update_config(&mut self, config: HeliostatConfig) -> Result<(), ConfigError> {
        for warning in Self::validate_config(&config).into_result()? {
            warn!("{}", warning);
        }

        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: HeliostatConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        for warning in Self::validate_config(&config).into_result()? {
            warn!("{}: {}", path_str, warning);
        }

        info!("loaded field configuration from {}", path_str);
        self.config = config;
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            }
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        info!("saved field configuration to {}", path_str);
        self.is_modified = false;
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Change the tick interval, returning the previous value
    pub fn set_tracking_interval(&mut self, interval_ms: u64) -> Result<u64, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "tracking.interval_ms".to_string(),
                value: interval_ms.to_string(),
                reason: "Tick interval must be positive".to_string(),
            });
        }

        let old_value = self.config.tracking.interval_ms;
        self.config.tracking.interval_ms = interval_ms;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Build the immutable field described by the current configuration
    pub fn build_field(&self) -> Result<FieldConfiguration, ConfigError> {
        FieldConfiguration::new(
            self.config.tower,
            self.config.focal_height_offset,
            self.config.mirrors(),
        )
        .map_err(|e| ConfigError::GeometryValidation {
            reason: e.to_string(),
        })
    }

    /// Validate a configuration without applying it
    pub fn validate_config(config: &HeliostatConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(reason) = ProjectionValidator::validate_geo(&config.tower) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "tower".to_string(),
                value: format!("{:?}", config.tower),
                reason: reason.to_string(),
            });
        }

        if !config.focal_height_offset.is_finite() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "focal_height_offset".to_string(),
                value: config.focal_height_offset.to_string(),
                reason: "Focal height offset must be finite".to_string(),
            });
        } else if config.focal_height_offset < 0.0 {
            warnings.push("Focal point sits below the tower top".to_string());
        }

        match &config.layout {
            MirrorLayout::Ring {
                count,
                radius_m,
                mirror_height,
            } => {
                if *count == 0 {
                    errors.push(ConfigError::InvalidParameter {
                        parameter: "layout.count".to_string(),
                        value: count.to_string(),
                        reason: "At least one mirror is required".to_string(),
                    });
                }
                if !radius_m.is_finite() || *radius_m < MIN_TARGET_DISTANCE_M {
                    errors.push(ConfigError::InvalidParameter {
                        parameter: "layout.radius_m".to_string(),
                        value: radius_m.to_string(),
                        reason: "Ring radius must keep mirrors clear of the tower axis".to_string(),
                    });
                } else if *radius_m > MAX_FLAT_EARTH_EXTENT_M {
                    warnings.push(format!(
                        "Ring radius {} m exceeds the flat-earth validity region",
                        radius_m
                    ));
                }
                if !mirror_height.is_finite() {
                    errors.push(ConfigError::InvalidParameter {
                        parameter: "layout.mirror_height".to_string(),
                        value: mirror_height.to_string(),
                        reason: "Mirror height must be finite".to_string(),
                    });
                }
            }
            MirrorLayout::Explicit { mirrors } => {
                if mirrors.is_empty() {
                    errors.push(ConfigError::InvalidParameter {
                        parameter: "layout.mirrors".to_string(),
                        value: "[]".to_string(),
                        reason: "At least one mirror is required".to_string(),
                    });
                }
                for (index, mirror) in mirrors.iter().enumerate() {
                    if let Err(reason) = ProjectionValidator::validate_geo(mirror) {
                        errors.push(ConfigError::InvalidParameter {
                            parameter: format!("layout.mirrors[{}]", index),
                            value: format!("{:?}", mirror),
                            reason: reason.to_string(),
                        });
                        continue;
                    }
                    if ProjectionValidator::validate_separation(
                        mirror,
                        &config.tower,
                        MIN_TARGET_DISTANCE_M,
                    )
                    .is_err()
                    {
                        errors.push(ConfigError::GeometryValidation {
                            reason: format!("Mirror {} stands on the tower's footprint", index),
                        });
                        continue;
                    }
                    let local = project(mirror, &config.tower);
                    if ProjectionValidator::validate_extent(&local, MAX_FLAT_EARTH_EXTENT_M).is_err() {
                        warnings.push(format!(
                            "Mirror {} lies outside the flat-earth validity region",
                            index
                        ));
                    }
                }
            }
        }

        if config.tracking.interval_ms == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "tracking.interval_ms".to_string(),
                value: config.tracking.interval_ms.to_string(),
                reason: "Tick interval must be positive".to_string(),
            });
        } else if config.tracking.interval_ms < 1000 {
            warnings.push("Tick interval under one second may overload the ephemeris service".to_string());
        }

        ValidationResult {
            errors,
            warnings,
        }
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}
