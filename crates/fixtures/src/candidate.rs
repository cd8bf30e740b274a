//! Candidate fixture and its builder

use chrono::{Datelike, Duration, NaiveDate, Utc};
use peex_common::EnvironmentData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use crate::address::{Address, AddressPreset};
use crate::document::{IdentityDocument, SocialSecurityDocument};
use crate::error::{FixtureError, FixtureResult};
use crate::helpers;
use crate::job::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            other => Err(FixtureError::InvalidGender(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Cdd,
    Freelance,
    Interim,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Cdd => "cdd",
            ContractType::Freelance => "freelance",
            ContractType::Interim => "interim",
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cdd" => Ok(ContractType::Cdd),
            "freelance" => Ok(ContractType::Freelance),
            "interim" => Ok(ContractType::Interim),
            _ => Err(FixtureError::UnknownContractType(s.to_string())),
        }
    }
}

/// A candidate account as the tests drive it through the app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub uuid: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub phone: String,
    pub phone_without_code: String,
    pub email: String,
    pub password: String,
    pub address: Address,
    pub birthday: NaiveDate,
    /// Two-digit year then two-digit month of birth
    pub ssn_dob: String,
    pub is_news_mailing_enabled: bool,
    pub is_terms_accepted: bool,
    pub contract_cdd: bool,
    pub contract_freelance: bool,
    pub contract_interim: bool,
    pub interim_tea_uuid: Option<Uuid>,
    pub has_vehicle: bool,
    pub token: Option<String>,
    pub nationality: String,
    pub social_security: Option<SocialSecurityDocument>,
    pub identity_justification: Option<IdentityDocument>,
    pub work_agreements: Vec<Uuid>,
    pub last_wa_uuid: Option<Uuid>,
    pub last_proposal_uuid: Option<Uuid>,
    pub maiden_name: Option<String>,
    pub desired_job: Option<Job>,
}

impl Candidate {
    /// Random candidate with the default field values
    pub fn generate(env: &EnvironmentData) -> Self {
        let phone = format!("{}1{}", env.phone_prefix, helpers::generate_digits(8));
        let birthday = Utc::now().date_naive() - Duration::days(366 * 18);

        Self {
            uuid: None,
            first_name: format!("{}{}", helpers::first_name(), helpers::generate_digits(4)),
            last_name: helpers::last_name(),
            gender: Gender::Female,
            phone_without_code: strip_prefix(&phone, &env.phone_prefix),
            phone,
            email: helpers::generate_email(&env.email_domain),
            password: env.default_password.clone(),
            address: AddressPreset::Valid.address(),
            ssn_dob: ssn_dob(birthday),
            birthday,
            is_news_mailing_enabled: false,
            is_terms_accepted: true,
            contract_cdd: false,
            contract_freelance: false,
            contract_interim: false,
            interim_tea_uuid: None,
            has_vehicle: false,
            token: None,
            nationality: env.country_id.clone(),
            social_security: None,
            identity_justification: None,
            work_agreements: Vec::new(),
            last_wa_uuid: None,
            last_proposal_uuid: None,
            maiden_name: None,
            desired_job: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// First name and last initial, as shown to companies
    pub fn anonymized_name(&self) -> String {
        match self.last_name.chars().next() {
            Some(initial) => format!("{} {}.", self.first_name, initial),
            None => self.first_name.clone(),
        }
    }

    /// Selected contract types, in cdd, freelance, interim order
    pub fn contract_types(&self) -> Vec<ContractType> {
        [
            (self.contract_cdd, ContractType::Cdd),
            (self.contract_freelance, ContractType::Freelance),
            (self.contract_interim, ContractType::Interim),
        ]
        .into_iter()
        .filter_map(|(selected, kind)| selected.then_some(kind))
        .collect()
    }

    pub fn has_contract_type(&self) -> bool {
        self.contract_cdd || self.contract_freelance || self.contract_interim
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Candidate: {} {}", self.full_name(), self.email)
    }
}

fn strip_prefix(phone: &str, prefix: &str) -> String {
    phone.strip_prefix(prefix).unwrap_or(phone).to_string()
}

fn ssn_dob(birthday: NaiveDate) -> String {
    format!("{:02}{:02}", birthday.year().rem_euclid(100), birthday.month())
}

/// Fluent builder over a generated candidate
#[derive(Debug, Clone)]
pub struct CandidateBuilder {
    candidate: Candidate,
    phone_prefix: String,
}

impl CandidateBuilder {
    pub fn new(env: &EnvironmentData) -> Self {
        Self {
            candidate: Candidate::generate(env),
            phone_prefix: env.phone_prefix.clone(),
        }
    }

    pub fn name(mut self, first_name: impl Into<String>) -> Self {
        self.candidate.first_name = first_name.into();
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.candidate.last_name = last_name.into();
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.candidate.gender = gender;
        self
    }

    /// Also updates the number without its country code
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        let phone = phone.into();
        self.candidate.phone_without_code = strip_prefix(&phone, &self.phone_prefix);
        self.candidate.phone = phone;
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.candidate.email = email.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.candidate.password = password.into();
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.candidate.address = address;
        self
    }

    /// Also updates `ssn_dob`
    pub fn birthday(mut self, birthday: NaiveDate) -> Self {
        self.candidate.ssn_dob = ssn_dob(birthday);
        self.candidate.birthday = birthday;
        self
    }

    pub fn news_mailing(mut self, enabled: bool) -> Self {
        self.candidate.is_news_mailing_enabled = enabled;
        self
    }

    pub fn terms_accepted(mut self, accepted: bool) -> Self {
        self.candidate.is_terms_accepted = accepted;
        self
    }

    /// Select a contract type
    pub fn contract(self, kind: ContractType) -> Self {
        self.contract_flag(kind, true)
    }

    pub fn contract_flag(mut self, kind: ContractType, selected: bool) -> Self {
        match kind {
            ContractType::Cdd => self.candidate.contract_cdd = selected,
            ContractType::Freelance => self.candidate.contract_freelance = selected,
            ContractType::Interim => self.candidate.contract_interim = selected,
        }
        self
    }

    pub fn interim_tea_uuid(mut self, uuid: Uuid) -> Self {
        self.candidate.interim_tea_uuid = Some(uuid);
        self
    }

    pub fn vehicle(mut self, has_vehicle: bool) -> Self {
        self.candidate.has_vehicle = has_vehicle;
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.candidate.token = Some(token.into());
        self
    }

    pub fn nationality(mut self, country_id: impl Into<String>) -> Self {
        self.candidate.nationality = country_id.into();
        self
    }

    pub fn social_security(mut self, document: SocialSecurityDocument) -> Self {
        self.candidate.social_security = Some(document);
        self
    }

    pub fn identity_justification(mut self, document: IdentityDocument) -> Self {
        self.candidate.identity_justification = Some(document);
        self
    }

    /// Append a work agreement; it becomes the last one
    pub fn work_agreement(mut self, uuid: Uuid) -> Self {
        self.candidate.work_agreements.push(uuid);
        self.candidate.last_wa_uuid = Some(uuid);
        self
    }

    pub fn proposal(mut self, uuid: Uuid) -> Self {
        self.candidate.last_proposal_uuid = Some(uuid);
        self
    }

    pub fn maiden_name(mut self, maiden_name: impl Into<String>) -> Self {
        self.candidate.maiden_name = Some(maiden_name.into());
        self
    }

    pub fn desired_job(mut self, job: Job) -> Self {
        self.candidate.desired_job = Some(job);
        self
    }

    /// Finish the candidate. At least one contract type must be selected.
    pub fn build(self) -> FixtureResult<Candidate> {
        if !self.candidate.has_contract_type() {
            return Err(FixtureError::NoContractType);
        }
        debug!("Built {}", self.candidate);
        Ok(self.candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> EnvironmentData {
        EnvironmentData::default()
    }

    #[test]
    fn test_generated_defaults() {
        let candidate = Candidate::generate(&env());
        assert_eq!(candidate.gender, Gender::Female);
        assert_eq!(candidate.password, "11111111");
        assert_eq!(candidate.nationality, "FR");
        assert!(candidate.phone.starts_with("+331"));
        assert_eq!(candidate.phone.len(), "+331".len() + 8);
        assert_eq!(format!("+33{}", candidate.phone_without_code), candidate.phone);
        assert!(candidate.is_terms_accepted);
        assert!(!candidate.is_news_mailing_enabled);
        assert!(candidate.contract_types().is_empty());
        assert_eq!(candidate.address, AddressPreset::Valid.address());

        let suffix = &candidate.first_name[candidate.first_name.len() - 4..];
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_ssn_dob_from_birthday() {
        let date = NaiveDate::from_ymd_opt(2004, 7, 1).unwrap();
        assert_eq!(ssn_dob(date), "0407");
    }

    #[test]
    fn test_names() {
        let candidate = CandidateBuilder::new(&env())
            .name("Camille")
            .last_name("Durand")
            .contract(ContractType::Cdd)
            .build()
            .unwrap();
        assert_eq!(candidate.full_name(), "Camille Durand");
        assert_eq!(candidate.anonymized_name(), "Camille D.");
        assert_eq!(
            candidate.to_string(),
            format!("Candidate: Camille Durand {}", candidate.email)
        );
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("M".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!(
            "X".parse::<Gender>(),
            Err(FixtureError::InvalidGender("X".to_string()))
        );
    }

    #[test]
    fn test_work_agreements_track_last() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let candidate = CandidateBuilder::new(&env())
            .work_agreement(first)
            .work_agreement(second)
            .contract(ContractType::Interim)
            .build()
            .unwrap();
        assert_eq!(candidate.work_agreements, vec![first, second]);
        assert_eq!(candidate.last_wa_uuid, Some(second));
    }
}
