//! Per-entity repositories over a [`DocumentStore`].
//!
//! Presentation code goes through these instead of touching collections
//! directly, so the backend can be swapped without changing callers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::models::{ApplicationStatus, Posting, PostingStatus, Profile, Submission};
use crate::store::{new_id, now_timestamp, Collection, Document, DocumentStore};

fn decode<T: DeserializeOwned>(collection: Collection, doc: Document) -> StoreResult<T> {
    serde_json::from_value(doc.body).map_err(|source| StoreError::Malformed {
        collection,
        id: doc.id,
        source,
    })
}

fn encode<T: Serialize>(value: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(value)?)
}

// --- Profiles ---

pub struct ProfileStore<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProfileStore<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn get<P: Profile>(&self, uid: &str) -> StoreResult<Option<P>> {
        let collection = P::ROLE.profile_collection();
        self.store
            .get(collection, uid)?
            .map(|doc| decode(collection, doc))
            .transpose()
    }

    /// Fetches the profiles for `uids` in one store read, keyed by uid.
    /// Uids without a profile are absent from the map.
    pub fn get_many<P: Profile>(&self, uids: &[&str]) -> StoreResult<HashMap<String, P>> {
        let collection = P::ROLE.profile_collection();
        let distinct: Vec<&str> = uids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let found = self
            .store
            .get_many(collection, &distinct)?
            .into_iter()
            .map(|doc| -> StoreResult<(String, P)> { Ok((doc.id.clone(), decode(collection, doc)?)) })
            .collect::<StoreResult<HashMap<String, P>>>()?;
        debug!(
            role = %P::ROLE,
            requested = uids.len(),
            found = found.len(),
            "batch profile fetch"
        );
        Ok(found)
    }

    /// Writes the full profile document keyed by its uid.
    pub fn create<P: Profile>(&self, profile: &P) -> StoreResult<()> {
        let collection = P::ROLE.profile_collection();
        self.store.put(collection, profile.uid(), &encode(profile)?)?;
        info!(role = %P::ROLE, uid = profile.uid(), "profile created");
        Ok(())
    }

    /// Replaces the stored fields of an existing profile with `profile`'s.
    pub fn update<P: Profile>(&self, profile: &P) -> StoreResult<()> {
        let collection = P::ROLE.profile_collection();
        self.store.update(collection, profile.uid(), &encode(profile)?)
    }
}

// --- Postings ---

pub struct PostingStore<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> PostingStore<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Posting>> {
        self.store
            .get(Collection::Ideas, id)?
            .map(|doc| Self::decode_posting(doc))
            .transpose()
    }

    pub fn list_active(&self) -> StoreResult<Vec<Posting>> {
        self.store
            .find_by(Collection::Ideas, "status", &json!(PostingStatus::Active.as_str()))?
            .into_iter()
            .map(Self::decode_posting)
            .collect()
    }

    pub fn list_by_recruiter(&self, recruiter_id: &str) -> StoreResult<Vec<Posting>> {
        self.store
            .find_by(Collection::Ideas, "recruiter_id", &json!(recruiter_id))?
            .into_iter()
            .map(Self::decode_posting)
            .collect()
    }

    /// Stores a new posting under a fresh id and returns it.
    pub fn create(&self, posting: &Posting) -> StoreResult<Posting> {
        let mut posting = posting.clone();
        posting.id = new_id();
        self.store.put(Collection::Ideas, &posting.id, &encode(&posting)?)?;
        info!(id = %posting.id, recruiter = %posting.recruiter_id, "idea posted");
        Ok(posting)
    }

    pub fn set_status(&self, id: &str, status: PostingStatus) -> StoreResult<()> {
        self.store.update(
            Collection::Ideas,
            id,
            &json!({ "status": status.as_str(), "updated_at": now_timestamp() }),
        )
    }

    fn decode_posting(doc: Document) -> StoreResult<Posting> {
        let id = doc.id.clone();
        let mut posting: Posting = decode(Collection::Ideas, doc)?;
        posting.id = id;
        Ok(posting)
    }
}

// --- Applications ---

/// Repository for one submission collection (developer applications or
/// investor interests, picked by the type parameter).
pub struct ApplicationStore<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ApplicationStore<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn get<S: Submission>(&self, id: &str) -> StoreResult<Option<S>> {
        self.store
            .get(S::COLLECTION, id)?
            .map(Self::decode_submission)
            .transpose()
    }

    pub fn list_for_recruiter<S: Submission>(&self, recruiter_id: &str) -> StoreResult<Vec<S>> {
        self.store
            .find_by(S::COLLECTION, "recruiter_id", &json!(recruiter_id))?
            .into_iter()
            .map(Self::decode_submission)
            .collect()
    }

    /// Stores a submission under a fresh id. Repeat submissions to the same
    /// idea are allowed.
    pub fn create<S: Submission + Clone>(&self, submission: &S) -> StoreResult<S> {
        let mut submission = submission.clone();
        submission.set_id(new_id());
        self.store
            .put(S::COLLECTION, submission.id(), &encode(&submission)?)?;
        info!(
            collection = %S::COLLECTION,
            id = submission.id(),
            applicant = submission.applicant_id(),
            "submission created"
        );
        Ok(submission)
    }

    /// Sets the status and update timestamp in a single document update.
    pub fn update_status<S: Submission>(&self, id: &str, status: ApplicationStatus) -> StoreResult<()> {
        self.store.update(
            S::COLLECTION,
            id,
            &json!({ "status": status.as_str(), "updated_at": now_timestamp() }),
        )
    }

    fn decode_submission<S: Submission>(doc: Document) -> StoreResult<S> {
        let id = doc.id.clone();
        let mut submission: S = decode(S::COLLECTION, doc)?;
        submission.set_id(id);
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Application, DeveloperProfile, InvestmentInterest, RecruiterProfile};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn developer(uid: &str, first: &str) -> DeveloperProfile {
        DeveloperProfile {
            uid: uid.into(),
            first_name: first.into(),
            last_name: "Dev".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_profile_create_get_update() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);

        let mut dev = developer("u1", "Ada");
        profiles.create(&dev).unwrap();
        assert_eq!(profiles.get::<DeveloperProfile>("u1").unwrap(), Some(dev.clone()));
        assert!(profiles.get::<RecruiterProfile>("u1").unwrap().is_none());

        dev.skills = "Rust, Go".into();
        profiles.update(&dev).unwrap();
        let stored: DeveloperProfile = profiles.get("u1").unwrap().unwrap();
        assert_eq!(stored.skills, "Rust, Go");
    }

    #[test]
    fn test_profile_update_requires_existing_document() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);
        assert!(profiles.update(&developer("ghost", "No")).is_err());
    }

    #[test]
    fn test_get_many_skips_missing_and_dedups() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);
        profiles.create(&developer("u1", "Ada")).unwrap();
        profiles.create(&developer("u2", "Linus")).unwrap();

        let found: HashMap<String, DeveloperProfile> =
            profiles.get_many(&["u1", "u1", "u3", "u2"]).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found["u2"].first_name, "Linus");
    }

    #[test]
    fn test_posting_create_assigns_id_and_lists_active() {
        let store = MemoryStore::new();
        let postings = PostingStore::new(&store);

        let created = postings
            .create(&Posting {
                recruiter_id: "r1".into(),
                company_name: "Acme".into(),
                ..Default::default()
            })
            .unwrap();
        assert!(!created.id.is_empty());

        let other = postings
            .create(&Posting {
                recruiter_id: "r2".into(),
                ..Default::default()
            })
            .unwrap();
        postings.set_status(&other.id, PostingStatus::Closed).unwrap();

        let active = postings.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, created.id);
        assert_eq!(postings.list_by_recruiter("r2").unwrap().len(), 1);
        assert_eq!(
            postings.get(&other.id).unwrap().unwrap().status,
            PostingStatus::Closed
        );
    }

    #[test]
    fn test_duplicate_applications_are_allowed() {
        let store = MemoryStore::new();
        let apps = ApplicationStore::new(&store);
        let app = Application {
            idea_id: "i1".into(),
            developer_id: "d1".into(),
            recruiter_id: "r1".into(),
            ..Default::default()
        };
        let first = apps.create(&app).unwrap();
        let second = apps.create(&app).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(apps.list_for_recruiter::<Application>("r1").unwrap().len(), 2);
        assert!(apps.list_for_recruiter::<InvestmentInterest>("r1").unwrap().is_empty());
    }

    #[test]
    fn test_update_status_persists() {
        let store = MemoryStore::new();
        let apps = ApplicationStore::new(&store);
        let interest = apps
            .create(&InvestmentInterest {
                investor_id: "v1".into(),
                recruiter_id: "r1".into(),
                ..Default::default()
            })
            .unwrap();

        apps.update_status::<InvestmentInterest>(&interest.id, ApplicationStatus::Accepted)
            .unwrap();
        let stored: InvestmentInterest = apps.get(&interest.id).unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Accepted);
        assert!(stored.updated_at.is_some());
    }
}
