use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Developer,
    Recruiter,
    Investor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "developer",
            Role::Recruiter => "recruiter",
            Role::Investor => "investor",
        }
    }

    pub fn profile_collection(&self) -> Collection {
        match self {
            Role::Developer => Collection::Developers,
            Role::Recruiter => Collection::Recruiters,
            Role::Investor => Collection::Investors,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "developer" | "dev" => Ok(Role::Developer),
            "recruiter" | "founder" => Ok(Role::Recruiter),
            "investor" => Ok(Role::Investor),
            other => Err(format!(
                "unknown role '{}' (expected developer, recruiter or investor)",
                other
            )),
        }
    }
}

// --- Profiles ---

/// A role-specific profile document keyed by the external identity id.
pub trait Profile: Serialize + serde::de::DeserializeOwned {
    const ROLE: Role;

    fn uid(&self) -> &str;
    fn display_name(&self) -> String;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeveloperProfile {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: String,
    pub github: String,
    pub experience: String, // years, free text
    pub skills: String,     // comma separated
    pub bio: String,
    pub university: String,
    pub degree: String,
    pub graduation_year: String,
}

impl Profile for DeveloperProfile {
    const ROLE: Role = Role::Developer;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecruiterProfile {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub company_name: String,
    pub company_website: String,
    pub company_size: String,
    pub funding_stage: String,
    pub equity_range: String,
    pub salary_range: String,
    pub role_description: String,
    pub tech_stack: String,
    pub experience_required: String,
}

impl Profile for RecruiterProfile {
    const ROLE: Role = Role::Recruiter;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestorProfile {
    pub uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub photo_url: String,
    pub net_worth: String, // free text, e.g. "500k-1m" or "1200000"
    pub investment_interests: String,
    pub past_investments: String,
    pub portfolio_value: f64,
    pub investment_history: Vec<String>,
}

impl Profile for InvestorProfile {
    const ROLE: Role = Role::Investor;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

// --- Postings ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    #[default]
    Active,
    Closed,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Active => "active",
            PostingStatus::Closed => "closed",
        }
    }
}

/// An idea posted by a founder, carrying a copy of the founder's company fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Posting {
    pub id: String,
    pub recruiter_id: String,
    pub company_name: String,
    pub company_website: String,
    pub company_size: String,
    pub email: String,
    pub photo_url: String,
    pub funding_stage: String,
    pub equity_range: String,
    pub salary_range: String,
    pub role_description: String,
    pub tech_stack: String, // comma separated
    pub experience_required: String,
    pub cofounder_role: String,
    pub idea_description: String,
    pub responsibilities: String,
    pub ideal_candidate: String,
    pub status: PostingStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Posting {
    pub fn tech_stack_list(&self) -> Vec<String> {
        split_list(&self.tech_stack)
    }
}

// --- Applications ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A founder's verdict on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Decisions a founder may still take. Accepted and rejected are terminal.
    pub fn decisions(&self) -> &'static [Decision] {
        match self {
            ApplicationStatus::Pending => &[Decision::Accept, Decision::Reject],
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => &[],
        }
    }
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Reject => "reject",
        }
    }

    pub fn outcome(&self) -> ApplicationStatus {
        match self {
            Decision::Accept => ApplicationStatus::Accepted,
            Decision::Reject => ApplicationStatus::Rejected,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" | "accepted" => Ok(Decision::Accept),
            "reject" | "rejected" => Ok(Decision::Reject),
            other => Err(format!("unknown decision '{}' (expected accept or reject)", other)),
        }
    }
}

/// A submission against an idea, stored in a per-applicant-role collection.
pub trait Submission: Serialize + serde::de::DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn applicant_id(&self) -> &str;
}

/// A developer's application to an idea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub id: String,
    pub idea_id: String,
    pub developer_id: String,
    pub recruiter_id: String,
    pub cover_letter: String,
    pub resume: String, // link
    pub whatsapp_number: String,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Submission for Application {
    const COLLECTION: Collection = Collection::Applications;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn applicant_id(&self) -> &str {
        &self.developer_id
    }
}

/// An investor's interest in an idea.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentInterest {
    pub id: String,
    pub idea_id: String,
    pub investor_id: String,
    pub recruiter_id: String,
    pub cover_letter: String,
    pub whatsapp_number: String,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Submission for InvestmentInterest {
    const COLLECTION: Collection = Collection::InvestmentInterests;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn applicant_id(&self) -> &str {
        &self.investor_id
    }
}

/// Splits a comma separated field into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" React, Node.js ,,Python "),
            vec!["React", "Node.js", "Python"]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_pending_offers_both_decisions() {
        assert_eq!(
            ApplicationStatus::Pending.decisions(),
            &[Decision::Accept, Decision::Reject]
        );
    }

    #[test]
    fn test_terminal_states_offer_nothing() {
        assert!(ApplicationStatus::Accepted.decisions().is_empty());
        assert!(ApplicationStatus::Rejected.decisions().is_empty());
    }

    #[test]
    fn test_missing_fields_read_as_defaults() {
        let app: Application =
            serde_json::from_str(r#"{"idea_id": "i1", "developer_id": "d1"}"#).unwrap();
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.cover_letter, "");

        let idea: Posting = serde_json::from_str(r#"{"company_name": "Acme"}"#).unwrap();
        assert_eq!(idea.status, PostingStatus::Active);
    }

    #[test]
    fn test_display_name_joins_first_and_last() {
        let dev = DeveloperProfile {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        };
        assert_eq!(dev.display_name(), "Ada Lovelace");

        let investor = InvestorProfile {
            first_name: "Solo".into(),
            ..Default::default()
        };
        assert_eq!(investor.display_name(), "Solo");
    }

    #[test]
    fn test_role_parse_accepts_founder_alias() {
        assert_eq!("founder".parse::<Role>().unwrap(), Role::Recruiter);
        assert_eq!("Investor".parse::<Role>().unwrap(), Role::Investor);
        assert!("admin".parse::<Role>().is_err());
    }
}
