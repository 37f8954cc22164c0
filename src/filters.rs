//! Client-side filter and sort pipelines for the dashboards.
//!
//! Postings are filtered for developers and investors; joined application
//! views are filtered for founders. All matching is over in-memory lists.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::dashboard::{CandidateView, InvestorView};
use crate::models::{ApplicationStatus, Posting};

// --- Shared selectors ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExperienceBucket {
    #[default]
    All,
    ZeroToOne,
    OneToThree,
    ThreeToFive,
    FivePlus,
}

impl ExperienceBucket {
    pub const CYCLE: [ExperienceBucket; 5] = [
        ExperienceBucket::All,
        ExperienceBucket::ZeroToOne,
        ExperienceBucket::OneToThree,
        ExperienceBucket::ThreeToFive,
        ExperienceBucket::FivePlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBucket::All => "all",
            ExperienceBucket::ZeroToOne => "0-1",
            ExperienceBucket::OneToThree => "1-3",
            ExperienceBucket::ThreeToFive => "3-5",
            ExperienceBucket::FivePlus => "5+",
        }
    }

    /// Inclusive bounds, so a boundary value such as 1 sits in two buckets.
    /// Unparseable experience only passes the `All` bucket.
    pub fn contains(&self, raw_years: &str) -> bool {
        if *self == ExperienceBucket::All {
            return true;
        }
        let Some(years) = parse_leading_int(raw_years) else {
            return false;
        };
        match self {
            ExperienceBucket::All => true,
            ExperienceBucket::ZeroToOne => (0..=1).contains(&years),
            ExperienceBucket::OneToThree => (1..=3).contains(&years),
            ExperienceBucket::ThreeToFive => (3..=5).contains(&years),
            ExperienceBucket::FivePlus => years >= 5,
        }
    }

    pub fn next(&self) -> Self {
        cycle_next(&Self::CYCLE, self)
    }
}

impl FromStr for ExperienceBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .iter()
            .find(|b| b.label() == s.trim())
            .copied()
            .ok_or_else(|| format!("unknown experience bucket '{}' (all, 0-1, 1-3, 3-5, 5+)", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Newest,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort '{}' (newest, oldest)", other)),
        }
    }
}

fn cycle_next<T: Copy + PartialEq>(all: &[T], current: &T) -> T {
    let idx = all.iter().position(|c| c == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

/// `parseInt`-style parse: optional sign and leading digits, rest ignored.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let run = &digits[..end];
    if run.is_empty() {
        return None;
    }
    // an all-digit run only fails to parse on overflow
    let n = run.parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * n)
}

/// Milliseconds since the epoch, or 0 when missing or unparseable.
pub fn timestamp_millis(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.and_utc().timestamp_millis();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp_millis();
        }
    }
    0
}

fn sort_by_timestamp<T>(items: &mut [T], order: SortOrder, stamp: impl Fn(&T) -> &str) {
    // sort_by_key is stable, so equal timestamps keep their input order
    match order {
        SortOrder::Newest => items.sort_by_key(|item| std::cmp::Reverse(timestamp_millis(stamp(item)))),
        SortOrder::Oldest => items.sort_by_key(|item| timestamp_millis(stamp(item))),
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// --- Postings (developer/investor facing) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostingTab {
    #[default]
    All,
    Saved,
    /// No applied tracking exists yet, so this tab is always empty.
    Applied,
}

impl PostingTab {
    pub const CYCLE: [PostingTab; 3] = [PostingTab::All, PostingTab::Saved, PostingTab::Applied];

    pub fn label(&self) -> &'static str {
        match self {
            PostingTab::All => "all",
            PostingTab::Saved => "saved",
            PostingTab::Applied => "applied",
        }
    }

    pub fn next(&self) -> Self {
        cycle_next(&Self::CYCLE, self)
    }
}

impl FromStr for PostingTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .iter()
            .find(|t| t.label() == s.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| format!("unknown tab '{}' (all, saved, applied)", s))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostingQuery {
    pub tab: PostingTab,
    pub saved: HashSet<String>,
    pub search: String,
    pub experience: ExperienceBucket,
    pub skills: Vec<String>,
    pub sort: SortOrder,
}

impl PostingQuery {
    fn tab_allows(&self, posting: &Posting) -> bool {
        match self.tab {
            PostingTab::All => true,
            PostingTab::Saved => self.saved.contains(&posting.id),
            PostingTab::Applied => false,
        }
    }

    fn search_allows(&self, posting: &Posting) -> bool {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        contains_ci(&posting.company_name, &query)
            || contains_ci(&posting.cofounder_role, &query)
            || contains_ci(&posting.idea_description, &query)
            || contains_ci(&posting.tech_stack, &query)
    }

    fn skills_allow(&self, posting: &Posting) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        let stack = posting.tech_stack_list();
        self.skills.iter().any(|skill| stack.contains(skill))
    }

    pub fn matches(&self, posting: &Posting) -> bool {
        self.tab_allows(posting)
            && self.search_allows(posting)
            && self.experience.contains(&posting.experience_required)
            && self.skills_allow(posting)
    }

    pub fn apply<'a>(&self, postings: &'a [Posting]) -> Vec<&'a Posting> {
        let mut out: Vec<&Posting> = postings.iter().filter(|p| self.matches(p)).collect();
        sort_by_timestamp(&mut out, self.sort, |p| p.created_at.as_str());
        out
    }
}

// --- Applications (founder facing) ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTab {
    #[default]
    All,
    Pending,
    Accepted,
    Rejected,
}

impl StatusTab {
    pub const CYCLE: [StatusTab; 4] = [
        StatusTab::All,
        StatusTab::Pending,
        StatusTab::Accepted,
        StatusTab::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatusTab::All => "all",
            StatusTab::Pending => "pending",
            StatusTab::Accepted => "accepted",
            StatusTab::Rejected => "rejected",
        }
    }

    pub fn allows(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Pending => status == ApplicationStatus::Pending,
            StatusTab::Accepted => status == ApplicationStatus::Accepted,
            StatusTab::Rejected => status == ApplicationStatus::Rejected,
        }
    }

    pub fn next(&self) -> Self {
        cycle_next(&Self::CYCLE, self)
    }
}

impl FromStr for StatusTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .iter()
            .find(|t| t.label() == s.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| format!("unknown status '{}' (all, pending, accepted, rejected)", s))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidateQuery {
    pub status: StatusTab,
    pub search: String,
    pub experience: ExperienceBucket,
    pub skills: Vec<String>,
    pub sort: SortOrder,
}

impl CandidateQuery {
    pub fn matches(&self, candidate: &CandidateView) -> bool {
        if !self.status.allows(candidate.status) {
            return false;
        }
        let query = self.search.trim().to_lowercase();
        if !query.is_empty()
            && !contains_ci(&candidate.name, &query)
            && !candidate.skills.iter().any(|s| contains_ci(s, &query))
        {
            return false;
        }
        if !self.experience.contains(&candidate.experience) {
            return false;
        }
        self.skills.is_empty() || self.skills.iter().any(|s| candidate.skills.contains(s))
    }

    pub fn apply<'a>(&self, candidates: &'a [CandidateView]) -> Vec<&'a CandidateView> {
        let mut out: Vec<&CandidateView> = candidates.iter().filter(|c| self.matches(c)).collect();
        sort_by_timestamp(&mut out, self.sort, |c| c.applied_date.as_str());
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetWorthBucket {
    #[default]
    All,
    Under100k,
    From100kTo500k,
    From500kTo1m,
    Over1m,
}

fn first_number_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d,.]+").expect("static pattern"))
}

/// Longest prefix that parses as a float, like `parseFloat`.
fn parse_leading_float(raw: &str) -> Option<f64> {
    (1..=raw.len())
        .rev()
        .filter(|&end| raw.is_char_boundary(end))
        .find_map(|end| raw[..end].parse::<f64>().ok())
}

impl NetWorthBucket {
    pub const CYCLE: [NetWorthBucket; 5] = [
        NetWorthBucket::All,
        NetWorthBucket::Under100k,
        NetWorthBucket::From100kTo500k,
        NetWorthBucket::From500kTo1m,
        NetWorthBucket::Over1m,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NetWorthBucket::All => "all",
            NetWorthBucket::Under100k => "under100k",
            NetWorthBucket::From100kTo500k => "100k-500k",
            NetWorthBucket::From500kTo1m => "500k-1m",
            NetWorthBucket::Over1m => "over1m",
        }
    }

    pub fn next(&self) -> Self {
        cycle_next(&Self::CYCLE, self)
    }

    /// Best-effort numeric reading of a free-text net worth. Any `k` in the
    /// text scales by a thousand and any `m` by a million.
    pub fn numeric_value(lowered: &str) -> f64 {
        let Some(run) = first_number_run().find(lowered) else {
            return 0.0;
        };
        let mut value = parse_leading_float(&run.as_str().replace(',', "")).unwrap_or(0.0);
        if lowered.contains('k') {
            value *= 1_000.0;
        }
        if lowered.contains('m') {
            value *= 1_000_000.0;
        }
        value
    }

    /// A record is included when either the keyword branch or the numeric
    /// branch matches, even if the two disagree.
    pub fn matches(&self, net_worth: &str) -> bool {
        let text = net_worth.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| text.contains(n));
        let value = Self::numeric_value(&text);
        match self {
            NetWorthBucket::All => true,
            NetWorthBucket::Under100k => {
                has(&["under 100", "<100", "less than 100"]) || (value > 0.0 && value < 100_000.0)
            }
            NetWorthBucket::From100kTo500k => {
                has(&["100k-500k", "100-500"]) || (100_000.0..=500_000.0).contains(&value)
            }
            NetWorthBucket::From500kTo1m => {
                has(&["500k-1m", "500-1"]) || (500_000.0..=1_000_000.0).contains(&value)
            }
            NetWorthBucket::Over1m => {
                has(&["over 1m", ">1m", "more than 1m"])
                    || (text.contains('m') && value > 1.0)
                    || value > 1_000_000.0
            }
        }
    }
}

impl FromStr for NetWorthBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .iter()
            .find(|b| b.label() == s.trim().to_ascii_lowercase())
            .copied()
            .ok_or_else(|| {
                format!(
                    "unknown net worth bucket '{}' (all, under100k, 100k-500k, 500k-1m, over1m)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvestorQuery {
    pub status: StatusTab,
    pub search: String,
    pub net_worth: NetWorthBucket,
    pub interests: Vec<String>,
    pub sort: SortOrder,
}

impl InvestorQuery {
    pub fn matches(&self, investor: &InvestorView) -> bool {
        if !self.status.allows(investor.status) {
            return false;
        }
        let query = self.search.trim().to_lowercase();
        if !query.is_empty()
            && !contains_ci(&investor.name, &query)
            && !contains_ci(&investor.investment_interests, &query)
        {
            return false;
        }
        if !self.net_worth.matches(&investor.net_worth) {
            return false;
        }
        if self.interests.is_empty() {
            return true;
        }
        let interests = investor.investment_interests.to_lowercase();
        self.interests
            .iter()
            .any(|i| interests.contains(&i.to_lowercase()))
    }

    pub fn apply<'a>(&self, investors: &'a [InvestorView]) -> Vec<&'a InvestorView> {
        let mut out: Vec<&InvestorView> = investors.iter().filter(|i| self.matches(i)).collect();
        sort_by_timestamp(&mut out, self.sort, |i| i.applied_date.as_str());
        out
    }
}
