//! Candidate fixture generation

use anyhow::Result;
use clap::Args;
use peex_common::EnvironmentData;
use peex_fixtures::{Candidate, CandidateBuilder, ContractType, Gender};
use serde::Serialize;

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct CandidateArgs {
    /// Gender (M or F)
    #[arg(short, long)]
    pub gender: Option<String>,

    /// Contract types to select (cdd, freelance, interim); repeatable
    #[arg(short, long = "contract")]
    pub contracts: Vec<String>,

    /// Candidate owns a vehicle
    #[arg(long)]
    pub vehicle: bool,
}

/// Flattened candidate for display
#[derive(Serialize)]
pub struct CandidateDisplay {
    pub name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub birthday: String,
    pub address: String,
    pub contracts: String,
    pub nationality: String,
}

impl From<&Candidate> for CandidateDisplay {
    fn from(c: &Candidate) -> Self {
        Self {
            name: c.full_name(),
            gender: c.gender.code().to_string(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            password: c.password.clone(),
            birthday: c.birthday.to_string(),
            address: c.address.one_line(),
            contracts: c
                .contract_types()
                .iter()
                .map(ContractType::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            nationality: c.nationality.clone(),
        }
    }
}

impl TableDisplay for CandidateDisplay {
    fn headers() -> Vec<&'static str> {
        vec![
            "Name", "Gender", "Email", "Phone", "Password", "Birthday", "Address", "Contracts",
            "Nationality",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.gender.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.password.clone(),
            self.birthday.clone(),
            self.address.clone(),
            self.contracts.clone(),
            self.nationality.clone(),
        ]
    }
}

pub fn build(args: &CandidateArgs, env: &EnvironmentData) -> Result<Candidate> {
    let mut builder = CandidateBuilder::new(env).vehicle(args.vehicle);
    if let Some(gender) = &args.gender {
        builder = builder.gender(gender.parse::<Gender>()?);
    }
    for contract in &args.contracts {
        builder = builder.contract(contract.parse::<ContractType>()?);
    }
    Ok(builder.build()?)
}

pub fn execute(args: CandidateArgs, env: &EnvironmentData, format: OutputFormat) -> Result<()> {
    let candidate = build(&args, env)?;
    match format {
        // Full fixture, every field
        OutputFormat::Json | OutputFormat::Yaml => {
            crate::output::print_serialized(&candidate, format)
        }
        OutputFormat::Table => print_item(&CandidateDisplay::from(&candidate), format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(gender: Option<&str>, contracts: &[&str]) -> CandidateArgs {
        CandidateArgs {
            gender: gender.map(str::to_string),
            contracts: contracts.iter().map(|c| c.to_string()).collect(),
            vehicle: false,
        }
    }

    #[test]
    fn test_build_with_contracts() {
        let candidate = build(&args(Some("M"), &["interim", "cdd"]), &EnvironmentData::default())
            .unwrap();
        let display = CandidateDisplay::from(&candidate);
        assert_eq!(display.gender, "M");
        assert_eq!(display.contracts, "cdd, interim");
        assert_eq!(display.row().len(), CandidateDisplay::headers().len());
    }

    #[test]
    fn test_build_rejects_bad_input() {
        let env = EnvironmentData::default();
        assert!(build(&args(None, &[]), &env).is_err());
        assert!(build(&args(Some("X"), &["cdd"]), &env).is_err());
        assert!(build(&args(None, &["permanent"]), &env).is_err());
    }
}
