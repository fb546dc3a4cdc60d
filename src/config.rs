use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use crate::time::{Signature, SnapGrid, Tempo, TimeError, PPQ};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Project {
  pub name: String,
  pub bpm: f64,
  pub signature: [u8; 2],
}

impl Default for Project {
  fn default() -> Project {
    Project {
      name: "New Project".to_string(),
      bpm: 120.0,
      signature: [4, 4],
    }
  }
}

impl Project {
  pub fn tempo(&self) -> Result<Tempo, TimeError> {
    Tempo::new(self.bpm)
  }

  pub fn time_signature(&self) -> Result<Signature, TimeError> {
    Signature::new(self.signature[0], self.signature[1])
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Editor {
  pub snap: SnapGrid,
  pub pixels_per_bar: f64,
  pub lane_height: f64,
  pub row_height: f64,
  pub min_length_ticks: u64,
}

impl Default for Editor {
  fn default() -> Editor {
    Editor {
      snap: SnapGrid::Sixteenth,
      pixels_per_bar: 60.0,
      lane_height: 96.0,
      row_height: 20.0,
      min_length_ticks: PPQ / 4,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
  pub project: Project,
  pub editor: Editor,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      project: Project::default(),
      editor: Editor::default(),
    }
  }
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
