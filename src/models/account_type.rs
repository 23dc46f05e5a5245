use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    JobSeeker,
    Employer,
    BusinessOwner,
    Contributor,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::JobSeeker => "job_seeker",
            AccountType::Employer => "employer",
            AccountType::BusinessOwner => "business_owner",
            AccountType::Contributor => "contributor",
        }
    }

    /// Employer and Business Owner accounts complete the company section.
    pub fn is_employer_like(&self) -> bool {
        matches!(self, AccountType::Employer | AccountType::BusinessOwner)
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job_seeker" => Ok(AccountType::JobSeeker),
            "employer" => Ok(AccountType::Employer),
            "business_owner" => Ok(AccountType::BusinessOwner),
            "contributor" => Ok(AccountType::Contributor),
            other => Err(format!("Unknown account type '{}'", other)),
        }
    }
}
