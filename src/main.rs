mod auth;
mod config;
mod dashboard;
mod db;
mod error;
mod filters;
mod forms;
mod logging;
mod models;
mod notice;
mod repo;
mod review;
mod store;
mod theme;
mod tui;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::error;

use auth::{ClaimsFileProvider, ProviderKind, Session};
use config::Config;
use dashboard::{BrowseDashboard, RecruiterDashboard};
use db::Database;
use error::{AuthError, FormError, ReviewError, StoreError};
use filters::{
    CandidateQuery, ExperienceBucket, InvestorQuery, NetWorthBucket, PostingQuery, PostingTab,
    SortOrder, StatusTab,
};
use forms::{DeveloperSignup, IdeaPost, InvestorSignup, RecruiterSignup};
use models::{
    split_list, Application, ApplicationStatus, Decision, DeveloperProfile, InvestmentInterest,
    InvestorProfile, Posting, PostingStatus, Profile, RecruiterProfile, Role,
};
use notice::Notice;
use repo::{ApplicationStore, PostingStore, ProfileStore};
use review::ApplicantKind;
use store::{now_timestamp, DocumentStore};
use theme::Preferences;

#[derive(Parser)]
#[command(name = "cofound")]
#[command(about = "Match founders with co-founders and investors")]
struct Cli {
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Sign in with an identity provider
    Login {
        /// Role to act as (developer, recruiter/founder, investor)
        #[arg(short, long)]
        role: Role,

        /// Identity provider (google, github)
        #[arg(short, long, default_value = "google")]
        provider: ProviderKind,

        /// Claims file exported from the provider's sign-in flow
        #[arg(short, long)]
        claims: PathBuf,
    },

    /// Forget the signed-in identity
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// Create the profile for the signed-in role
    Signup {
        #[command(subcommand)]
        command: SignupCommands,
    },

    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse, bookmark and post ideas
    Ideas {
        #[command(subcommand)]
        command: IdeaCommands,
    },

    /// Apply to an idea as a developer
    Apply {
        /// Idea ID
        idea_id: String,

        #[arg(long, default_value = "")]
        cover_letter: String,

        /// Link to your resume
        #[arg(long, default_value = "")]
        resume: String,

        #[arg(long, default_value = "")]
        whatsapp: String,
    },

    /// Register investment interest in an idea
    Invest {
        /// Idea ID
        idea_id: String,

        #[arg(long, default_value = "")]
        cover_letter: String,

        #[arg(long, default_value = "")]
        whatsapp: String,
    },

    /// List applications to your ideas (founders)
    Applications {
        /// Show investor interest instead of developer applications
        #[arg(long)]
        investors: bool,

        /// Filter by status (all, pending, accepted, rejected)
        #[arg(long, default_value = "all")]
        status: StatusTab,

        /// Match applicant name, skills or investment interests
        #[arg(short, long, default_value = "")]
        search: String,

        /// Experience bucket for developers (all, 0-1, 1-3, 3-5, 5+)
        #[arg(short, long, default_value = "all")]
        experience: ExperienceBucket,

        /// Required skill (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Net worth bucket for investors (all, under100k, 100k-500k, 500k-1m, over1m)
        #[arg(long, default_value = "all")]
        net_worth: NetWorthBucket,

        /// Investment interest (repeatable)
        #[arg(long = "interest")]
        interests: Vec<String>,

        #[arg(long, default_value = "newest")]
        sort: SortOrder,
    },

    /// Accept or reject a pending application
    Review {
        /// Application ID
        id: String,

        /// accept or reject
        decision: Decision,

        /// The ID refers to an investor's interest
        #[arg(long)]
        investor: bool,
    },

    /// Open the interactive dashboard for your role
    Browse {
        /// Required skill (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,
    },

    /// Light/dark theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

#[derive(Subcommand)]
enum SignupCommands {
    /// Developer profile
    Developer {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Years of experience
        #[arg(long, default_value = "")]
        experience: String,
        /// Comma separated skills
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value = "")]
        bio: String,
        /// GitHub handle (defaults to the GitHub sign-in name)
        #[arg(long)]
        github: Option<String>,
        #[arg(long, default_value = "")]
        university: String,
        #[arg(long, default_value = "")]
        degree: String,
        #[arg(long, default_value = "")]
        graduation_year: String,
    },

    /// Founder profile
    Recruiter {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        company_name: String,
        #[arg(long, default_value = "")]
        company_website: String,
        #[arg(long, default_value = "")]
        company_size: String,
        #[arg(long, default_value = "")]
        funding_stage: String,
        #[arg(long, default_value = "")]
        equity_range: String,
        #[arg(long, default_value = "")]
        salary_range: String,
        #[arg(long, default_value = "")]
        role_description: String,
        /// Comma separated technologies
        #[arg(long, default_value = "")]
        tech_stack: String,
        #[arg(long, default_value = "")]
        experience_required: String,
    },

    /// Investor profile
    Investor {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Free text, e.g. "500k-1m" or "1200000"
        #[arg(long, default_value = "")]
        net_worth: String,
        #[arg(long, default_value = "")]
        investment_interests: String,
        #[arg(long, default_value = "")]
        past_investments: String,
        #[arg(long, default_value_t = 0.0)]
        portfolio_value: f64,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,

    /// Set one profile field
    Set {
        /// Field name, e.g. skills or company_name
        field: String,
        value: String,
    },
}

#[derive(Subcommand)]
enum IdeaCommands {
    /// List ideas
    List {
        /// all, saved, applied
        #[arg(short, long, default_value = "all")]
        tab: PostingTab,

        /// Match company, role, description or tech stack
        #[arg(short, long, default_value = "")]
        search: String,

        /// Required experience bucket (all, 0-1, 1-3, 3-5, 5+)
        #[arg(short, long, default_value = "all")]
        experience: ExperienceBucket,

        /// Required technology (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        #[arg(long, default_value = "newest")]
        sort: SortOrder,
    },

    /// Show an idea
    Show {
        /// Idea ID
        id: String,
    },

    /// Bookmark an idea, or remove the bookmark
    Save {
        /// Idea ID
        id: String,
    },

    /// Post a new idea (founders)
    Post {
        /// Co-founder role you are looking for
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        responsibilities: String,
        #[arg(long, default_value = "")]
        ideal_candidate: String,
        /// Defaults to your profile's salary range
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        equity: Option<String>,
        #[arg(long)]
        tech_stack: Option<String>,
        #[arg(long)]
        experience: Option<String>,
    },

    /// Stop accepting applications for one of your ideas
    Close {
        /// Idea ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
}

struct App {
    config: Config,
    db: Database,
}

impl App {
    fn open() -> Result<Self> {
        let config = Config::load()?;
        let db = Database::open(&config.db_path())
            .with_context(|| format!("Failed to open {}", config.db_path().display()))?;
        Ok(Self { config, db })
    }

    fn session(&self) -> Result<Session> {
        Ok(Session::require(&self.config.session_path())?)
    }

    fn session_as(&self, role: Role) -> Result<Session> {
        let session = self.session()?;
        session.require_role(role)?;
        Ok(session)
    }

    fn store(&self) -> &dyn DocumentStore {
        &self.db
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{}", report(&err));
        std::process::exit(1);
    }
}

/// Logs a failed command with its full context chain and returns the notice
/// to show the user.
fn report(err: &anyhow::Error) -> Notice {
    error!(error = %format!("{:#}", err), "command failed");
    notice_for(err)
}

/// Typed errors get their tailored notice; anything else is reported with its
/// context chain.
fn notice_for(err: &anyhow::Error) -> Notice {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<AuthError>() {
            return Notice::from(e);
        }
        if let Some(e) = cause.downcast_ref::<FormError>() {
            return Notice::from(e);
        }
        if let Some(e) = cause.downcast_ref::<ReviewError>() {
            return Notice::from(e);
        }
        if let Some(e) = cause.downcast_ref::<StoreError>() {
            return Notice::from(e);
        }
    }
    Notice::error("Error", format!("{:#}", err))
}

fn run(cli: Cli) -> Result<()> {
    let app = App::open()?;

    match cli.command {
        Commands::Init => {
            app.db.init()?;
            println!("Database initialized at {}", app.db.path().display());
        }

        Commands::Login {
            role,
            provider,
            claims,
        } => {
            app.db.ensure_initialized()?;
            let provider = ClaimsFileProvider::from_path(provider, &claims)
                .with_context(|| format!("Failed to read claims file: {}", claims.display()))?;
            let identity = auth::authenticate(&provider)?;
            let session = Session::new(role, identity);
            session.save(&app.config.session_path())?;

            println!(
                "{}",
                Notice::info("Success", format!("Signed in as {} ({})", display_identity(&session), role))
            );
            if !has_profile(app.store(), &session)? {
                println!("No {} profile yet. Run: cofound signup {}", role, role);
            }
        }

        Commands::Logout => {
            if Session::clear(&app.config.session_path())? {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }

        Commands::Whoami => match Session::load(&app.config.session_path())? {
            Some(session) => {
                println!("UID:   {}", session.uid());
                println!("Name:  {}", display_identity(&session));
                println!("Email: {}", session.identity.email);
                println!("Role:  {}", session.role);
                if !session.identity.github.is_empty() {
                    println!("GitHub: {}", session.identity.github);
                }
                println!("Saved ideas: {}", session.saved_ideas.len());
            }
            None => println!("Not signed in."),
        },

        Commands::Signup { command } => {
            app.db.ensure_initialized()?;
            signup(&app, command)?;
        }

        Commands::Profile { command } => {
            app.db.ensure_initialized()?;
            let session = app.session()?;
            match command {
                ProfileCommands::Show => match session.role {
                    Role::Developer => show_profile::<DeveloperProfile>(app.store(), &session)?,
                    Role::Recruiter => show_profile::<RecruiterProfile>(app.store(), &session)?,
                    Role::Investor => show_profile::<InvestorProfile>(app.store(), &session)?,
                },
                ProfileCommands::Set { field, value } => {
                    let uid = session.uid();
                    match session.role {
                        Role::Developer => {
                            set_profile_field::<DeveloperProfile>(app.store(), uid, &field, &value)?
                        }
                        Role::Recruiter => {
                            set_profile_field::<RecruiterProfile>(app.store(), uid, &field, &value)?
                        }
                        Role::Investor => {
                            set_profile_field::<InvestorProfile>(app.store(), uid, &field, &value)?
                        }
                    }
                    println!("{}", Notice::info("Success", format!("Updated {}", field)));
                }
            }
        }

        Commands::Ideas { command } => {
            app.db.ensure_initialized()?;
            ideas(&app, command)?;
        }

        Commands::Apply {
            idea_id,
            cover_letter,
            resume,
            whatsapp,
        } => {
            app.db.ensure_initialized()?;
            let session = app.session_as(Role::Developer)?;
            let posting = open_posting(app.store(), &idea_id)?;
            require_profile::<DeveloperProfile>(app.store(), &session)?;
            let created = ApplicationStore::new(app.store()).create(&Application {
                idea_id: posting.id.clone(),
                developer_id: session.uid().to_string(),
                recruiter_id: posting.recruiter_id.clone(),
                cover_letter,
                resume,
                whatsapp_number: whatsapp,
                status: ApplicationStatus::Pending,
                created_at: now_timestamp(),
                ..Default::default()
            })?;
            println!(
                "{}",
                Notice::info(
                    "Success",
                    format!("Applied to {} at {} (application {})", posting.cofounder_role, posting.company_name, created.id)
                )
            );
        }

        Commands::Invest {
            idea_id,
            cover_letter,
            whatsapp,
        } => {
            app.db.ensure_initialized()?;
            let session = app.session_as(Role::Investor)?;
            let posting = open_posting(app.store(), &idea_id)?;
            require_profile::<InvestorProfile>(app.store(), &session)?;
            let created = ApplicationStore::new(app.store()).create(&InvestmentInterest {
                idea_id: posting.id.clone(),
                investor_id: session.uid().to_string(),
                recruiter_id: posting.recruiter_id.clone(),
                cover_letter,
                whatsapp_number: whatsapp,
                status: ApplicationStatus::Pending,
                created_at: now_timestamp(),
                ..Default::default()
            })?;
            println!(
                "{}",
                Notice::info(
                    "Success",
                    format!("Interest registered in {} (application {})", posting.company_name, created.id)
                )
            );
        }

        Commands::Applications {
            investors,
            status,
            search,
            experience,
            skills,
            net_worth,
            interests,
            sort,
        } => {
            app.db.ensure_initialized()?;
            let session = app.session_as(Role::Recruiter)?;
            let dashboard = RecruiterDashboard::load(app.store(), session.uid())?;
            println!("{}\n", dashboard.headline());
            if investors {
                let query = InvestorQuery {
                    status,
                    search,
                    net_worth,
                    interests,
                    sort,
                };
                list_investors(&dashboard, &query);
            } else {
                let query = CandidateQuery {
                    status,
                    search,
                    experience,
                    skills,
                    sort,
                };
                list_candidates(&dashboard, &query);
            }
        }

        Commands::Review {
            id,
            decision,
            investor,
        } => {
            app.db.ensure_initialized()?;
            let session = app.session_as(Role::Recruiter)?;
            let mut dashboard = RecruiterDashboard::load(app.store(), session.uid())?;
            let kind = if investor {
                ApplicantKind::Investor
            } else {
                ApplicantKind::Developer
            };
            let status = review::decide(app.store(), &mut dashboard, kind, &id, decision)?;
            println!("{}", Notice::reviewed(status));
        }

        Commands::Browse { skills } => {
            app.db.ensure_initialized()?;
            let session = app.session()?;
            let prefs = Preferences::load_or_init(&app.config.preferences_path())?;
            browse(&app, session, skills, prefs)?;
        }

        Commands::Theme { command } => {
            let path = app.config.preferences_path();
            let mut prefs = Preferences::load_or_init(&path)?;
            if let ThemeCommands::Toggle = command {
                prefs.theme = prefs.theme.toggled();
                prefs.save(&path)?;
            }
            println!("Theme: {}", prefs.theme.as_str());
        }
    }

    Ok(())
}

fn display_identity(session: &Session) -> String {
    if session.identity.name.is_empty() {
        session.identity.email.clone()
    } else {
        session.identity.name.clone()
    }
}

fn has_profile(store: &dyn DocumentStore, session: &Session) -> Result<bool> {
    let profiles = ProfileStore::new(store);
    let uid = session.uid();
    Ok(match session.role {
        Role::Developer => profiles.get::<DeveloperProfile>(uid)?.is_some(),
        Role::Recruiter => profiles.get::<RecruiterProfile>(uid)?.is_some(),
        Role::Investor => profiles.get::<InvestorProfile>(uid)?.is_some(),
    })
}

fn require_profile<P: Profile>(store: &dyn DocumentStore, session: &Session) -> Result<P> {
    ProfileStore::new(store)
        .get::<P>(session.uid())?
        .ok_or_else(|| anyhow!("No {} profile found. Run: cofound signup {}", P::ROLE, P::ROLE))
}

fn open_posting(store: &dyn DocumentStore, id: &str) -> Result<Posting> {
    let posting = PostingStore::new(store)
        .get(id)?
        .ok_or_else(|| anyhow!("Idea '{}' not found", id))?;
    if posting.status != PostingStatus::Active {
        bail!("Idea '{}' is no longer accepting applications", id);
    }
    Ok(posting)
}

fn signup(app: &App, command: SignupCommands) -> Result<()> {
    let profiles = ProfileStore::new(app.store());
    let name = match command {
        SignupCommands::Developer {
            first_name,
            last_name,
            experience,
            skills,
            bio,
            github,
            university,
            degree,
            graduation_year,
        } => {
            let session = app.session_as(Role::Developer)?;
            let profile = DeveloperSignup {
                first_name,
                last_name,
                experience,
                skills,
                bio,
                github,
                university,
                degree,
                graduation_year,
            }
            .build(&session.identity)?;
            profiles.create(&profile)?;
            profile.display_name()
        }
        SignupCommands::Recruiter {
            name,
            company_name,
            company_website,
            company_size,
            funding_stage,
            equity_range,
            salary_range,
            role_description,
            tech_stack,
            experience_required,
        } => {
            let session = app.session_as(Role::Recruiter)?;
            let profile = RecruiterSignup {
                name,
                company_name,
                company_website,
                company_size,
                funding_stage,
                equity_range,
                salary_range,
                role_description,
                tech_stack,
                experience_required,
            }
            .build(&session.identity)?;
            profiles.create(&profile)?;
            profile.display_name()
        }
        SignupCommands::Investor {
            first_name,
            last_name,
            net_worth,
            investment_interests,
            past_investments,
            portfolio_value,
        } => {
            let session = app.session_as(Role::Investor)?;
            let profile = InvestorSignup {
                first_name,
                last_name,
                net_worth,
                investment_interests,
                past_investments,
                portfolio_value,
            }
            .build(&session.identity)?;
            profiles.create(&profile)?;
            profile.display_name()
        }
    };
    println!("{}", Notice::info("Success", format!("Profile created for {}", name)));
    Ok(())
}

fn print_document<T: Serialize>(value: &T) -> Result<()> {
    let body = serde_json::to_value(value)?;
    let Some(fields) = body.as_object() else {
        bail!("profile is not a JSON object");
    };
    for (key, value) in fields {
        let shown = match value {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            other => other.to_string(),
        };
        println!("{:<22} {}", key, shown);
    }
    Ok(())
}

fn show_profile<P: Profile>(store: &dyn DocumentStore, session: &Session) -> Result<()> {
    let profile = require_profile::<P>(store, session)?;
    println!("{} profile: {}", P::ROLE, profile.display_name());
    println!("{}", "-".repeat(40));
    print_document(&profile)
}

/// Replaces one field of the stored profile. The value is coerced to the
/// field's current JSON type.
fn set_profile_field<P: Profile>(
    store: &dyn DocumentStore,
    uid: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    if matches!(key, "uid" | "email") {
        bail!("'{}' comes from your sign-in and cannot be changed", key);
    }
    let profiles = ProfileStore::new(store);
    let profile = profiles
        .get::<P>(uid)?
        .ok_or_else(|| anyhow!("No {} profile found. Run: cofound signup {}", P::ROLE, P::ROLE))?;

    let mut body = serde_json::to_value(&profile)?;
    let slot = body
        .as_object_mut()
        .and_then(|fields| fields.get_mut(key))
        .ok_or_else(|| anyhow!("Unknown {} profile field '{}'", P::ROLE, key))?;
    let replacement = match slot {
        Value::Number(_) => {
            let number: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("'{}' expects a number", key))?;
            json!(number)
        }
        Value::Array(_) => json!(split_list(value)),
        _ => Value::String(value.to_string()),
    };
    *slot = replacement;

    let updated: P = serde_json::from_value(body)?;
    profiles.update(&updated)?;
    Ok(())
}

fn ideas(app: &App, command: IdeaCommands) -> Result<()> {
    match command {
        IdeaCommands::List {
            tab,
            search,
            experience,
            skills,
            sort,
        } => {
            let session = app.session()?;
            let postings = PostingStore::new(app.store());
            let all = match session.role {
                Role::Recruiter => postings.list_by_recruiter(session.uid())?,
                Role::Developer | Role::Investor => postings.list_active()?,
            };
            let query = PostingQuery {
                tab,
                saved: session.saved_ideas.iter().cloned().collect(),
                search,
                experience,
                skills,
                sort,
            };
            let visible = query.apply(&all);
            if visible.is_empty() {
                println!("No ideas found.");
                return Ok(());
            }
            println!(
                "{:<1} {:<20} {:<24} {:<20} {:<10} {:<8} {:<10}",
                "", "ID", "ROLE", "COMPANY", "EXPERIENCE", "STATUS", "POSTED"
            );
            println!("{}", "-".repeat(98));
            for p in visible {
                let mark = if session.saved_ideas.contains(&p.id) { "*" } else { "" };
                println!(
                    "{:<1} {:<20} {:<24} {:<20} {:<10} {:<8} {:<10}",
                    mark,
                    p.id,
                    truncate(&p.cofounder_role, 22),
                    truncate(&p.company_name, 18),
                    truncate(&p.experience_required, 10),
                    p.status.as_str(),
                    p.created_at.split('T').next().unwrap_or_default()
                );
            }
        }

        IdeaCommands::Show { id } => {
            let posting = PostingStore::new(app.store())
                .get(&id)?
                .ok_or_else(|| anyhow!("Idea '{}' not found", id))?;
            print_posting(&posting);
        }

        IdeaCommands::Save { id } => {
            let mut session = app.session()?;
            if PostingStore::new(app.store()).get(&id)?.is_none() {
                bail!("Idea '{}' not found", id);
            }
            let saved = session.toggle_saved(&id);
            session.save(&app.config.session_path())?;
            if saved {
                println!("Saved idea {}.", id);
            } else {
                println!("Removed idea {} from saved ideas.", id);
            }
        }

        IdeaCommands::Post {
            role,
            description,
            responsibilities,
            ideal_candidate,
            salary,
            equity,
            tech_stack,
            experience,
        } => {
            let session = app.session_as(Role::Recruiter)?;
            let founder = require_profile::<RecruiterProfile>(app.store(), &session)?;
            let posting = IdeaPost {
                cofounder_role: role,
                idea_description: description,
                responsibilities,
                ideal_candidate,
                salary_range: salary,
                equity_range: equity,
                tech_stack,
                experience_required: experience,
            }
            .build(&founder)?;
            let created = PostingStore::new(app.store()).create(&posting)?;
            println!("{}", Notice::info("Success", format!("Posted idea {}", created.id)));
        }

        IdeaCommands::Close { id } => {
            let session = app.session_as(Role::Recruiter)?;
            let postings = PostingStore::new(app.store());
            let posting = postings
                .get(&id)?
                .ok_or_else(|| anyhow!("Idea '{}' not found", id))?;
            if posting.recruiter_id != session.uid() {
                bail!("Idea '{}' belongs to another founder", id);
            }
            postings.set_status(&id, PostingStatus::Closed)?;
            println!("Closed idea {}.", id);
        }
    }
    Ok(())
}

fn print_posting(p: &Posting) {
    println!("Idea {}", p.id);
    println!("Role: {}", p.cofounder_role);
    println!("Company: {}", p.company_name);
    println!("Status: {}", p.status.as_str());
    for (label, value) in [
        ("Website", &p.company_website),
        ("Company size", &p.company_size),
        ("Funding stage", &p.funding_stage),
        ("Salary", &p.salary_range),
        ("Equity", &p.equity_range),
        ("Tech stack", &p.tech_stack),
        ("Experience", &p.experience_required),
        ("Contact", &p.email),
    ] {
        if !value.is_empty() {
            println!("{}: {}", label, value);
        }
    }
    println!("Posted: {}", p.created_at);
    for (title, body) in [
        ("Idea", &p.idea_description),
        ("Responsibilities", &p.responsibilities),
        ("Ideal candidate", &p.ideal_candidate),
        ("About the role", &p.role_description),
    ] {
        if !body.trim().is_empty() {
            println!("\n--- {} ---\n{}", title, textwrap::fill(body, 78));
        }
    }
}

fn decisions_label(status: ApplicationStatus) -> String {
    let offered: Vec<&str> = status.decisions().iter().map(Decision::as_str).collect();
    if offered.is_empty() {
        "-".to_string()
    } else {
        offered.join("/")
    }
}

fn list_candidates(dashboard: &RecruiterDashboard, query: &CandidateQuery) {
    let visible = query.apply(&dashboard.candidates);
    if visible.is_empty() {
        println!("No developer applications found.");
        return;
    }
    println!(
        "{:<20} {:<9} {:<22} {:<6} {:<24} {:<10} {:<13}",
        "ID", "STATUS", "NAME", "EXP", "SKILLS", "APPLIED", "ACTIONS"
    );
    println!("{}", "-".repeat(110));
    for c in visible {
        println!(
            "{:<20} {:<9} {:<22} {:<6} {:<24} {:<10} {:<13}",
            c.id,
            c.status.as_str(),
            truncate(&c.name, 20),
            truncate(&c.experience, 6),
            truncate(&c.skills.join(", "), 22),
            c.applied_date,
            decisions_label(c.status)
        );
    }
}

fn list_investors(dashboard: &RecruiterDashboard, query: &InvestorQuery) {
    let visible = query.apply(&dashboard.investors);
    if visible.is_empty() {
        println!("No investor applications found.");
        return;
    }
    println!(
        "{:<20} {:<9} {:<22} {:<14} {:<22} {:<10} {:<13}",
        "ID", "STATUS", "NAME", "NET WORTH", "INTERESTS", "APPLIED", "ACTIONS"
    );
    println!("{}", "-".repeat(116));
    for i in visible {
        println!(
            "{:<20} {:<9} {:<22} {:<14} {:<22} {:<10} {:<13}",
            i.id,
            i.status.as_str(),
            truncate(&i.name, 20),
            truncate(&i.net_worth, 14),
            truncate(&i.investment_interests, 20),
            i.applied_date,
            decisions_label(i.status)
        );
    }
}

fn browse(app: &App, session: Session, skills: Vec<String>, prefs: Preferences) -> Result<()> {
    match session.role {
        Role::Recruiter => {
            let dashboard = RecruiterDashboard::load(app.store(), session.uid())?;
            if dashboard.candidates.is_empty() && dashboard.investors.is_empty() {
                println!("No applications yet.");
                return Ok(());
            }
            let candidates = CandidateQuery {
                skills,
                ..Default::default()
            };
            let mut screen = tui::ReviewScreen::new(dashboard, candidates, InvestorQuery::default());
            tui::run(app.store(), &mut screen, prefs.theme)
        }
        Role::Developer => {
            let dashboard = BrowseDashboard::<DeveloperProfile>::load(app.store(), session.uid())?;
            let heading = dashboard
                .profile
                .as_ref()
                .map(|p| p.display_name())
                .unwrap_or_else(|| display_identity(&session));
            browse_ideas(app, session, heading, dashboard.ideas, skills, prefs)
        }
        Role::Investor => {
            let dashboard = BrowseDashboard::<InvestorProfile>::load(app.store(), session.uid())?;
            let heading = dashboard
                .profile
                .as_ref()
                .map(|p| p.display_name())
                .unwrap_or_else(|| display_identity(&session));
            browse_ideas(app, session, heading, dashboard.ideas, skills, prefs)
        }
    }
}

fn browse_ideas(
    app: &App,
    session: Session,
    heading: String,
    ideas: Vec<Posting>,
    skills: Vec<String>,
    prefs: Preferences,
) -> Result<()> {
    if ideas.is_empty() {
        println!("No ideas posted yet.");
        return Ok(());
    }
    let query = PostingQuery {
        skills,
        ..Default::default()
    };
    let mut screen = tui::BrowseScreen::new(heading, ideas, query, session, app.config.session_path());
    tui::run(app.store(), &mut screen, prefs.theme)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            BufferWriter(Arc::clone(&self.0))
        }
    }

    impl io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut guard = self
                .0
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
            guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_set_profile_field_coerces_types() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);
        profiles
            .create(&InvestorProfile {
                uid: "v1".into(),
                first_name: "Val".into(),
                net_worth: "1m".into(),
                ..Default::default()
            })
            .unwrap();

        set_profile_field::<InvestorProfile>(&store, "v1", "portfolio_value", "2500000").unwrap();
        set_profile_field::<InvestorProfile>(&store, "v1", "investment_history", "Acme, Globex").unwrap();
        set_profile_field::<InvestorProfile>(&store, "v1", "net_worth", "over 1m").unwrap();

        let stored: InvestorProfile = profiles.get("v1").unwrap().unwrap();
        assert_eq!(stored.portfolio_value, 2_500_000.0);
        assert_eq!(stored.investment_history, vec!["Acme".to_string(), "Globex".to_string()]);
        assert_eq!(stored.net_worth, "over 1m");
    }

    #[test]
    fn test_set_profile_field_rejects_unknown_and_identity_fields() {
        let store = MemoryStore::new();
        ProfileStore::new(&store)
            .create(&DeveloperProfile {
                uid: "d1".into(),
                ..Default::default()
            })
            .unwrap();

        assert!(set_profile_field::<DeveloperProfile>(&store, "d1", "uid", "x").is_err());
        assert!(set_profile_field::<DeveloperProfile>(&store, "d1", "shoe_size", "9").is_err());
        assert!(set_profile_field::<DeveloperProfile>(&store, "missing", "bio", "x").is_err());
    }

    #[test]
    fn test_typed_errors_become_tailored_notices() {
        let err = anyhow::Error::from(AuthError::MissingIdentity);
        let notice = notice_for(&err);
        assert_eq!(notice.message, "User ID not found. Please try logging in again.");

        let err = anyhow::Error::from(FormError::MissingFields(vec!["skills"])).context("signup failed");
        assert_eq!(notice_for(&err).title, "Validation Error");

        let err = anyhow!("plain failure");
        assert_eq!(notice_for(&err).to_string(), "Error: plain failure");
    }

    #[test]
    fn test_failed_command_is_logged_at_error_level() {
        let sink = SharedBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .json()
            .finish();

        let err = anyhow::Error::from(StoreError::NotFound {
            collection: Collection::Ideas,
            id: "i9".into(),
        })
        .context("Failed to submit application");
        let notice = tracing::subscriber::with_default(subscriber, || report(&err));
        assert_eq!(notice.title, "Error");

        let bytes = sink.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).unwrap();
        let line = text.lines().find(|l| !l.trim().is_empty()).unwrap();
        let parsed: Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["fields"]["message"], "command failed");
        assert_eq!(
            parsed["fields"]["error"],
            "Failed to submit application: ideas document 'i9' not found"
        );
    }

    #[test]
    fn test_decisions_label_follows_status() {
        assert_eq!(decisions_label(ApplicationStatus::Pending), "accept/reject");
        assert_eq!(decisions_label(ApplicationStatus::Rejected), "-");
    }
}
