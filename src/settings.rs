//! Functions for loading settings.
//!
//! A structure containing configuration data, which are used to specify hardware
//! setup stuff to create the window and other context information. Every field
//! has a default, so an empty JSON object is a valid settings file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowParams,
    pub video: VideoParams,
    /// Runs without an OS window, against the software backend.
    pub headless: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: [u32; 2],
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    /// Specifies whether should we have vsync.
    pub vsync: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Hello World!".to_owned(),
            size: [800, 600],
            multisample: 0,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoParams {
    /// The color used to clear the default framebuffer at the start of every frame.
    pub clear_color: [f32; 4],
}

impl Default for VideoParams {
    fn default() -> Self {
        VideoParams {
            clear_color: [0.2, 0.3, 0.5, 1.0],
        }
    }
}

impl Settings {
    /// Parses settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Reads and parses a JSON settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|err| Error::Asset(format!("{}: {}", path.display(), err)))?;

        let settings = Self::from_json(&json)?;
        info!("Loads settings from {}.", path.display());
        Ok(settings)
    }
}
