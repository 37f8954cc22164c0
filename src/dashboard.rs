//! Dashboard loaders.
//!
//! Application records are fetched per collection, their applicants' profiles
//! are fetched in one batch, and the two are merged into denormalized views.

use std::collections::HashMap;
use tracing::warn;

use crate::error::StoreResult;
use crate::models::{
    split_list, Application, ApplicationStatus, DeveloperProfile, InvestmentInterest,
    InvestorProfile, Posting, PostingStatus, Profile, RecruiterProfile,
};
use crate::repo::{ApplicationStore, PostingStore, ProfileStore};
use crate::store::DocumentStore;

/// A developer application joined with the applicant's profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateView {
    pub id: String,
    pub developer_id: String,
    pub idea_id: String,
    pub name: String,
    pub email: String,
    pub github: String,
    pub photo_url: String,
    pub experience: String,
    pub skills: Vec<String>,
    pub university: String,
    pub degree: String,
    pub graduation_year: String,
    pub cover_letter: String,
    pub resume: String,
    pub whatsapp_number: String,
    pub status: ApplicationStatus,
    pub applied_date: String,
}

/// An investor interest joined with the investor's profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestorView {
    pub id: String,
    pub investor_id: String,
    pub idea_id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub net_worth: String,
    pub investment_interests: String,
    pub past_investments: String,
    pub portfolio_value: f64,
    pub investment_history: Vec<String>,
    pub cover_letter: String,
    pub whatsapp_number: String,
    pub status: ApplicationStatus,
    pub applied_date: String,
}

/// The date part of a stored timestamp.
fn applied_date(created_at: &str) -> String {
    created_at.split('T').next().unwrap_or_default().to_string()
}

pub fn merge_candidates(
    applications: Vec<Application>,
    developers: &HashMap<String, DeveloperProfile>,
) -> Vec<CandidateView> {
    applications
        .into_iter()
        .filter_map(|app| {
            let Some(dev) = developers.get(&app.developer_id) else {
                warn!(developer = %app.developer_id, application = %app.id, "developer profile not found");
                return None;
            };
            Some(CandidateView {
                name: dev.display_name(),
                email: dev.email.clone(),
                github: dev.github.clone(),
                photo_url: dev.photo_url.clone(),
                experience: dev.experience.clone(),
                skills: split_list(&dev.skills),
                university: dev.university.clone(),
                degree: dev.degree.clone(),
                graduation_year: dev.graduation_year.clone(),
                applied_date: applied_date(&app.created_at),
                id: app.id,
                developer_id: app.developer_id,
                idea_id: app.idea_id,
                cover_letter: app.cover_letter,
                resume: app.resume,
                whatsapp_number: app.whatsapp_number,
                status: app.status,
            })
        })
        .collect()
}

pub fn merge_investors(
    interests: Vec<InvestmentInterest>,
    investors: &HashMap<String, InvestorProfile>,
) -> Vec<InvestorView> {
    interests
        .into_iter()
        .filter_map(|interest| {
            let Some(inv) = investors.get(&interest.investor_id) else {
                warn!(investor = %interest.investor_id, application = %interest.id, "investor profile not found");
                return None;
            };
            Some(InvestorView {
                name: inv.display_name(),
                email: inv.email.clone(),
                photo_url: inv.photo_url.clone(),
                net_worth: inv.net_worth.clone(),
                investment_interests: inv.investment_interests.clone(),
                past_investments: inv.past_investments.clone(),
                portfolio_value: inv.portfolio_value,
                investment_history: inv.investment_history.clone(),
                applied_date: applied_date(&interest.created_at),
                id: interest.id,
                investor_id: interest.investor_id,
                idea_id: interest.idea_id,
                cover_letter: interest.cover_letter,
                whatsapp_number: interest.whatsapp_number,
                status: interest.status,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RecruiterDashboard {
    pub profile: Option<RecruiterProfile>,
    pub ideas: Vec<Posting>,
    pub candidates: Vec<CandidateView>,
    pub investors: Vec<InvestorView>,
}

impl RecruiterDashboard {
    pub fn load(store: &dyn DocumentStore, uid: &str) -> StoreResult<Self> {
        let profiles = ProfileStore::new(store);
        let applications = ApplicationStore::new(store);

        let profile = profiles.get::<RecruiterProfile>(uid)?;
        let ideas = PostingStore::new(store).list_by_recruiter(uid)?;

        let dev_apps: Vec<Application> = applications.list_for_recruiter(uid)?;
        let dev_ids: Vec<&str> = dev_apps.iter().map(|a| a.developer_id.as_str()).collect();
        let developers = profiles.get_many::<DeveloperProfile>(&dev_ids)?;
        let candidates = merge_candidates(dev_apps, &developers);

        let interests: Vec<InvestmentInterest> = applications.list_for_recruiter(uid)?;
        let inv_ids: Vec<&str> = interests.iter().map(|i| i.investor_id.as_str()).collect();
        let investor_profiles = profiles.get_many::<InvestorProfile>(&inv_ids)?;
        let investors = merge_investors(interests, &investor_profiles);

        Ok(Self {
            profile,
            ideas,
            candidates,
            investors,
        })
    }

    /// One-line summary of the founder's company and ideas.
    pub fn headline(&self) -> String {
        let company = self
            .profile
            .as_ref()
            .map(|p| p.company_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("No company profile");
        let active = self
            .ideas
            .iter()
            .filter(|idea| idea.status == PostingStatus::Active)
            .count();
        format!("{} | {} ideas, {} active", company, self.ideas.len(), active)
    }

    pub fn candidate_mut(&mut self, id: &str) -> Option<&mut CandidateView> {
        self.candidates.iter_mut().find(|c| c.id == id)
    }

    pub fn investor_mut(&mut self, id: &str) -> Option<&mut InvestorView> {
        self.investors.iter_mut().find(|i| i.id == id)
    }
}

/// Profile plus the active ideas, shared by the developer and investor views.
#[derive(Debug, Clone)]
pub struct BrowseDashboard<P> {
    pub profile: Option<P>,
    pub ideas: Vec<Posting>,
}

impl<P: Profile> BrowseDashboard<P> {
    pub fn load(store: &dyn DocumentStore, uid: &str) -> StoreResult<Self> {
        Ok(Self {
            profile: ProfileStore::new(store).get::<P>(uid)?,
            ideas: PostingStore::new(store).list_active()?,
        })
    }
}
