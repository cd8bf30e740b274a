//! Documents a candidate uploads during onboarding

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, Gender};
use crate::helpers::generate_digits;

/// Paris department code used for generated numbers
const DEPARTMENT: &str = "75";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityDocument {
    /// 13 digits followed by the 2-digit control key
    pub number: String,
    pub file_name: String,
}

impl SocialSecurityDocument {
    /// Number consistent with the candidate's gender and birth month
    pub fn for_candidate(candidate: &Candidate) -> Self {
        let sex = match candidate.gender {
            Gender::Male => '1',
            Gender::Female => '2',
        };
        let mut rng = rand::thread_rng();
        let commune = rng.gen_range(101..=120u16);
        let order = rng.gen_range(1..=999u16);
        let base = format!("{sex}{}{DEPARTMENT}{commune:03}{order:03}", candidate.ssn_dob);

        Self {
            number: format!("{base}{:02}", control_key(&base)),
            file_name: "social_security.pdf".to_string(),
        }
    }
}

/// `97 - (n mod 97)` over the 13-digit base
fn control_key(base: &str) -> u64 {
    let n: u64 = base
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0, |acc, b| (acc * 10 + u64::from(b - b'0')) % 97);
    97 - n
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    IdCard,
    Passport,
    ResidencePermit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub kind: IdentityKind,
    pub number: String,
    pub expires_on: NaiveDate,
}

impl IdentityDocument {
    /// Document expiring five years from today
    pub fn valid(kind: IdentityKind) -> Self {
        let number = match kind {
            IdentityKind::IdCard => generate_digits(12),
            IdentityKind::Passport => format!("{}PX{}", generate_digits(2), generate_digits(5)),
            IdentityKind::ResidencePermit => format!("FR{}", generate_digits(8)),
        };

        Self {
            kind,
            number,
            expires_on: Utc::now().date_naive() + Duration::days(5 * 365),
        }
    }

    /// Document that expired yesterday
    pub fn expired(kind: IdentityKind) -> Self {
        Self {
            expires_on: Utc::now().date_naive() - Duration::days(1),
            ..Self::valid(kind)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_on < Utc::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateBuilder;
    use crate::ContractType;
    use chrono::NaiveDate;
    use peex_common::EnvironmentData;

    #[test]
    fn test_control_key_known_value() {
        assert_eq!(control_key("1841275116001"), 26);
    }

    #[test]
    fn test_ssn_matches_candidate() {
        let candidate = CandidateBuilder::new(&EnvironmentData::default())
            .gender(Gender::Male)
            .birthday(NaiveDate::from_ymd_opt(1995, 3, 14).unwrap())
            .contract(ContractType::Interim)
            .build()
            .unwrap();

        let doc = SocialSecurityDocument::for_candidate(&candidate);
        assert_eq!(doc.number.len(), 15);
        assert!(doc.number.starts_with("19503"));
        let (base, key) = doc.number.split_at(13);
        assert_eq!(key.parse::<u64>().unwrap(), control_key(base));
    }

    #[test]
    fn test_identity_validity() {
        assert!(!IdentityDocument::valid(IdentityKind::Passport).is_expired());
        assert!(IdentityDocument::expired(IdentityKind::IdCard).is_expired());
        assert_eq!(IdentityDocument::valid(IdentityKind::IdCard).number.len(), 12);
    }
}
