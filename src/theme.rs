use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;
use std::error::Error;

static THEME_DIR: Dir = include_dir!("src/themes");

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Theme {
    Fruits,
    Animals,
    Objects,
}

impl Theme {
    pub fn catalog(&self) -> Catalog {
        read_catalog_from_file(format!("{}.json", self.to_string().to_lowercase())).unwrap()
    }
}

/// Icon set for one theme: the icons dealt onto the board plus the canonical
/// lowercase name each icon answers to.
#[derive(Deserialize, Clone, Debug)]
pub struct Catalog {
    pub name: String,
    pub icons: Vec<String>,
    pub names: HashMap<String, String>,
}

impl Catalog {
    /// Canonical name for an icon, if the table carries one.
    pub fn icon_name(&self, icon: &str) -> Option<&str> {
        self.names.get(icon).map(String::as_str)
    }
}

fn read_catalog_from_file(file_name: String) -> Result<Catalog, Box<dyn Error>> {
    let file = THEME_DIR.get_file(file_name).expect("Theme file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret file as a string");

    let catalog = from_str(file_as_str).expect("Unable to deserialize theme json");

    Ok(catalog)
}
