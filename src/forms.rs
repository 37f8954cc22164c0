//! Signup and idea-post forms.

use crate::auth::IdentityAssertion;
use crate::error::FormError;
use crate::models::{DeveloperProfile, InvestorProfile, Posting, PostingStatus, RecruiterProfile};
use crate::store::now_timestamp;

fn split_name(full: &str) -> (String, String) {
    let mut parts = full.trim().splitn(2, ' ');
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.next().unwrap_or_default().trim().to_string();
    (first, last)
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), FormError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FormError::MissingFields(missing))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeveloperSignup {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub experience: String,
    pub skills: String,
    pub bio: String,
    pub github: Option<String>,
    pub university: String,
    pub degree: String,
    pub graduation_year: String,
}

impl DeveloperSignup {
    pub fn build(self, identity: &IdentityAssertion) -> Result<DeveloperProfile, FormError> {
        let (first, last) = split_name(&identity.name);
        let profile = DeveloperProfile {
            uid: identity.uid.clone(),
            first_name: self.first_name.unwrap_or(first),
            last_name: self.last_name.unwrap_or(last),
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            github: self.github.unwrap_or_else(|| identity.github.clone()),
            experience: self.experience,
            skills: self.skills,
            bio: self.bio,
            university: self.university,
            degree: self.degree,
            graduation_year: self.graduation_year,
        };
        require(&[
            ("first_name", profile.first_name.as_str()),
            ("experience", profile.experience.as_str()),
            ("skills", profile.skills.as_str()),
        ])?;
        Ok(profile)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecruiterSignup {
    pub name: Option<String>,
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

impl RecruiterSignup {
    pub fn build(self, identity: &IdentityAssertion) -> Result<RecruiterProfile, FormError> {
        let profile = RecruiterProfile {
            uid: identity.uid.clone(),
            name: self.name.unwrap_or_else(|| identity.name.clone()),
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            company_name: self.company_name,
            company_website: self.company_website,
            company_size: self.company_size,
            funding_stage: self.funding_stage,
            equity_range: self.equity_range,
            salary_range: self.salary_range,
            role_description: self.role_description,
            tech_stack: self.tech_stack,
            experience_required: self.experience_required,
        };
        require(&[("name", profile.name.as_str()), ("company_name", profile.company_name.as_str())])?;
        Ok(profile)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvestorSignup {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub net_worth: String,
    pub investment_interests: String,
    pub past_investments: String,
    pub portfolio_value: f64,
}

impl InvestorSignup {
    pub fn build(self, identity: &IdentityAssertion) -> Result<InvestorProfile, FormError> {
        let (first, last) = split_name(&identity.name);
        let profile = InvestorProfile {
            uid: identity.uid.clone(),
            first_name: self.first_name.unwrap_or(first),
            last_name: self.last_name.unwrap_or(last),
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            net_worth: self.net_worth,
            investment_interests: self.investment_interests,
            past_investments: self.past_investments,
            portfolio_value: self.portfolio_value,
            investment_history: Vec::new(),
        };
        require(&[
            ("first_name", profile.first_name.as_str()),
            ("net_worth", profile.net_worth.as_str()),
            ("investment_interests", profile.investment_interests.as_str()),
        ])?;
        Ok(profile)
    }
}

/// A founder's new idea. Unset compensation and stack fields fall back to
/// the founder's profile.
#[derive(Debug, Clone, Default)]
pub struct IdeaPost {
    pub cofounder_role: String,
    pub idea_description: String,
    pub responsibilities: String,
    pub ideal_candidate: String,
    pub salary_range: Option<String>,
    pub equity_range: Option<String>,
    pub tech_stack: Option<String>,
    pub experience_required: Option<String>,
}

impl IdeaPost {
    pub fn validate(&self) -> Result<(), FormError> {
        require(&[
            ("cofounder_role", self.cofounder_role.as_str()),
            ("idea_description", self.idea_description.as_str()),
            ("responsibilities", self.responsibilities.as_str()),
            ("ideal_candidate", self.ideal_candidate.as_str()),
        ])
    }

    pub fn build(self, founder: &RecruiterProfile) -> Result<Posting, FormError> {
        self.validate()?;
        Ok(Posting {
            id: String::new(),
            recruiter_id: founder.uid.clone(),
            company_name: founder.company_name.clone(),
            company_website: founder.company_website.clone(),
            company_size: founder.company_size.clone(),
            email: founder.email.clone(),
            photo_url: founder.photo_url.clone(),
            funding_stage: founder.funding_stage.clone(),
            equity_range: self.equity_range.unwrap_or_else(|| founder.equity_range.clone()),
            salary_range: self.salary_range.unwrap_or_else(|| founder.salary_range.clone()),
            role_description: founder.role_description.clone(),
            tech_stack: self.tech_stack.unwrap_or_else(|| founder.tech_stack.clone()),
            experience_required: self
                .experience_required
                .unwrap_or_else(|| founder.experience_required.clone()),
            cofounder_role: self.cofounder_role,
            idea_description: self.idea_description,
            responsibilities: self.responsibilities,
            ideal_candidate: self.ideal_candidate,
            status: PostingStatus::Active,
            created_at: now_timestamp(),
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity() -> IdentityAssertion {
        IdentityAssertion {
            uid: "u1".into(),
            name: "Ada King Lovelace".into(),
            email: "ada@example.com".into(),
            photo_url: "https://img".into(),
            github: "ada".into(),
        }
    }

    #[test]
    fn test_developer_signup_prefills_from_identity() {
        let profile = DeveloperSignup {
            experience: "3".into(),
            skills: "Rust, Python".into(),
            ..Default::default()
        }
        .build(&identity())
        .unwrap();
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "King Lovelace");
        assert_eq!(profile.github, "ada");
        assert_eq!(profile.email, "ada@example.com");
    }

    #[test]
    fn test_developer_signup_reports_missing_fields() {
        let err = DeveloperSignup::default().build(&identity()).unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["experience", "skills"]));
    }

    #[test]
    fn test_recruiter_and_investor_signup() {
        let recruiter = RecruiterSignup {
            company_name: "Acme".into(),
            ..Default::default()
        }
        .build(&identity())
        .unwrap();
        assert_eq!(recruiter.name, "Ada King Lovelace");

        let err = InvestorSignup {
            net_worth: "over 1m".into(),
            ..Default::default()
        }
        .build(&identity())
        .unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["investment_interests"]));
    }

    #[test]
    fn test_idea_post_requires_core_fields() {
        let post = IdeaPost {
            cofounder_role: "CTO".into(),
            idea_description: "   ".into(),
            ..Default::default()
        };
        let err = post.validate().unwrap_err();
        assert_eq!(
            err,
            FormError::MissingFields(vec!["idea_description", "responsibilities", "ideal_candidate"])
        );
        assert!(err.to_string().starts_with("Please fill in all required fields"));
    }

    #[test]
    fn test_idea_post_copies_founder_fields() {
        let founder = RecruiterProfile {
            uid: "r1".into(),
            company_name: "Acme".into(),
            tech_stack: "React,Node.js".into(),
            salary_range: "100-120k".into(),
            ..Default::default()
        };
        let posting = IdeaPost {
            cofounder_role: "CTO".into(),
            idea_description: "Rockets".into(),
            responsibilities: "Everything".into(),
            ideal_candidate: "You".into(),
            tech_stack: Some("Rust".into()),
            ..Default::default()
        }
        .build(&founder)
        .unwrap();

        assert_eq!(posting.recruiter_id, "r1");
        assert_eq!(posting.company_name, "Acme");
        assert_eq!(posting.tech_stack, "Rust");
        assert_eq!(posting.salary_range, "100-120k");
        assert_eq!(posting.status, PostingStatus::Active);
        assert!(!posting.created_at.is_empty());
    }
}
