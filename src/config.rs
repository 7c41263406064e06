// Settings for the Milwaukee window and scene.
//
// Everything has a default; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use crate::error::Error;
use crate::tracer::{Light, Sphere, SphereScene, Viewport};

/// Directional light as it appears in the settings file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub intensity: f32,
    /// Points toward the light; normalized on load.
    pub direction: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self { intensity: 0.8, direction: [1.0, 4.0, -4.0] }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub window_width: usize,
    pub window_height: usize,
    /// Canvas size as a fraction of the window, per axis.
    pub canvas_fraction: f32,
    /// World units per second for keyboard movement.
    pub move_speed: f32,
    /// Color of rays that hit nothing.
    pub background: [f32; 3],
    /// Frame target clear color (RGB).
    pub target_clear: [f32; 3],
    pub light: LightConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Milwaukee".to_string(),
            window_width: 1280,
            window_height: 720,
            canvas_fraction: 0.5,
            move_speed: 2.0,
            background: [1.0, 1.0, 1.0],
            target_clear: [0.05, 0.05, 0.08],
            light: LightConfig::default(),
        }
    }
}

impl Config {
    /// Parse settings from a JSON string; missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read settings from `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no {} found, using default settings", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::Config(format!("{}: {e}", path.display()))),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(Error::Config("window size must be non-zero".into()));
        }
        if !(self.canvas_fraction > 0.0 && self.canvas_fraction <= 1.0) {
            return Err(Error::Config(format!("canvas_fraction {} not in (0, 1]", self.canvas_fraction)));
        }
        if Vec3::from(self.light.direction).length_squared() == 0.0 {
            return Err(Error::Config("light direction must be non-zero".into()));
        }
        Ok(())
    }

    /// Canvas size for a given window size.
    pub fn canvas_size(&self, window_width: usize, window_height: usize) -> (usize, usize) {
        let w = (window_width as f32 * self.canvas_fraction) as usize;
        let h = (window_height as f32 * self.canvas_fraction) as usize;
        (w.max(1), h.max(1))
    }

    /// The starting scene: three shiny spheres and a large floor sphere.
    pub fn initial_scene(&self) -> SphereScene {
        SphereScene {
            camera: Vec3::ZERO,
            spheres: vec![
                Sphere { center: Vec3::new(0.0, -1.0, 3.0), radius: 1.0, color: Vec3::new(1.0, 0.0, 0.0), specular: 50.0 },
                Sphere { center: Vec3::new(2.0, 0.0, 4.0), radius: 1.0, color: Vec3::new(0.0, 0.0, 1.0), specular: 50.0 },
                Sphere { center: Vec3::new(-2.0, 0.0, 4.0), radius: 1.0, color: Vec3::new(0.0, 1.0, 0.0), specular: 50.0 },
                Sphere { center: Vec3::new(0.0, -5001.0, 0.0), radius: 5000.0, color: Vec3::new(1.0, 1.0, 0.0), specular: 50.0 },
            ],
            light: Light {
                intensity: self.light.intensity,
                direction: Vec3::from(self.light.direction).normalize(),
            },
            background: Vec3::from(self.background),
            viewport: Viewport::default(),
        }
    }
}
