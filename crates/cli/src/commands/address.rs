//! Canned address lookup

use anyhow::{bail, Result};
use clap::Args;
use peex_fixtures::AddressPreset;
use serde::Serialize;

use crate::output::{print_item, print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct AddressArgs {
    /// Preset name (valid, invalid, street-precision, city-precision, foreign)
    pub preset: Option<String>,

    /// List every preset
    #[arg(long, conflicts_with = "preset")]
    pub all: bool,
}

#[derive(Serialize)]
pub struct AddressDisplay {
    pub preset: String,
    pub address: String,
    pub country_code: String,
    pub coordinates: String,
    pub precision: String,
}

impl From<AddressPreset> for AddressDisplay {
    fn from(preset: AddressPreset) -> Self {
        let address = preset.address();
        let coordinates = match (address.latitude, address.longitude) {
            (Some(lat), Some(lng)) => format!("{lat}, {lng}"),
            _ => "-".to_string(),
        };
        Self {
            preset: preset.name().to_string(),
            address: address.one_line(),
            country_code: address.country_code.clone(),
            coordinates,
            precision: address
                .precision
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl TableDisplay for AddressDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Preset", "Address", "Country", "Coordinates", "Precision"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.preset.clone(),
            self.address.clone(),
            self.country_code.clone(),
            self.coordinates.clone(),
            self.precision.clone(),
        ]
    }
}

pub fn execute(args: AddressArgs, format: OutputFormat) -> Result<()> {
    if args.all {
        let rows: Vec<AddressDisplay> = AddressPreset::ALL
            .into_iter()
            .map(AddressDisplay::from)
            .collect();
        print_list(&rows, format);
        return Ok(());
    }

    let Some(name) = args.preset else {
        bail!("give a preset name or --all");
    };
    let preset: AddressPreset = name.parse()?;
    match format {
        OutputFormat::Table => print_item(&AddressDisplay::from(preset), format),
        _ => crate::output::print_serialized(&preset.address(), format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_of_ungeocoded_preset() {
        let display = AddressDisplay::from(AddressPreset::Invalid);
        assert_eq!(display.coordinates, "-");
        assert_eq!(display.precision, "-");
        assert_eq!(display.row().len(), AddressDisplay::headers().len());
    }

    #[test]
    fn test_missing_preset_is_an_error() {
        let args = AddressArgs {
            preset: None,
            all: false,
        };
        assert!(execute(args, OutputFormat::Json).is_err());
    }
}
