use tracing::info;

use crate::core::error::TrackError;
use crate::core::form::JobForm;
use crate::core::job::JobRecord;
use crate::core::ops;
use crate::core::stage::StageId;
use crate::core::storage::KeyValueStore;
use crate::core::store::{Store, Theme};

/// The tracker state (collection + theme) together with its store.
/// Every mutation replaces the collection and writes it through; a failed
/// write is returned but the in-memory state keeps the change.
#[derive(Debug)]
pub struct Tracker<S> {
    store: Store<S>,
    jobs: Vec<JobRecord>,
    theme: Theme,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn open(backend: S) -> Self {
        let store = Store::new(backend);
        let jobs = store.load();
        let theme = store.load_theme();
        info!(count = jobs.len(), theme = %theme, "tracker opened");
        Self { store, jobs, theme }
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn find(&self, id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Validates the form, then prepends a record under a fresh id.
    pub fn create(&mut self, form: JobForm) -> Result<String, TrackError> {
        form.validate()?;
        let id = ops::new_id(&self.jobs);
        let next = ops::create(&self.jobs, form, id.clone());
        info!(id = %id, "created job");
        self.commit(next)?;
        Ok(id)
    }

    /// Returns whether a record with `id` existed.
    pub fn update(&mut self, id: &str, form: JobForm) -> Result<bool, TrackError> {
        form.validate()?;
        let found = self.find(id).is_some();
        let next = ops::update(&self.jobs, id, &form);
        info!(id, found, "updated job");
        self.commit(next)?;
        Ok(found)
    }

    pub fn set_status(&mut self, id: &str, status: StageId) -> Result<bool, TrackError> {
        let found = self.find(id).is_some();
        let next = ops::set_status(&self.jobs, id, status);
        info!(id, status = %status, found, "changed job status");
        self.commit(next)?;
        Ok(found)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool, TrackError> {
        let found = self.find(id).is_some();
        let next = ops::delete(&self.jobs, id);
        info!(id, found, "deleted job");
        self.commit(next)?;
        Ok(found)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, TrackError> {
        self.theme = theme;
        info!(theme = %theme, "theme changed");
        self.store.persist_theme(theme)?;
        Ok(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, TrackError> {
        self.set_theme(self.theme.toggled())
    }

    fn commit(&mut self, jobs: Vec<JobRecord>) -> Result<(), TrackError> {
        self.jobs = jobs;
        self.store.persist(&self.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::seed;
    use crate::core::stats::summarize;
    use crate::core::storage::MemoryStore;
    use crate::core::store::{JOBS_KEY, THEME_KEY};

    fn persisted(tracker: &Tracker<MemoryStore>) -> Vec<JobRecord> {
        let raw = tracker.store().backend().get(JOBS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn form(company: &str, role: &str) -> JobForm {
        JobForm {
            company: company.to_string(),
            role: role.to_string(),
            applied_date: "2024-05-20".to_string(),
            ..JobForm::default()
        }
    }

    #[test]
    fn opens_on_seed_when_storage_is_empty() {
        let tracker = Tracker::open(MemoryStore::new());
        assert_eq!(tracker.jobs(), seed().as_slice());
        assert_eq!(tracker.theme(), Theme::Light);
    }

    #[test]
    fn create_prepends_and_persists() {
        let mut tracker = Tracker::open(MemoryStore::new());
        let id = tracker.create(form("Vercel", "DX Engineer")).unwrap();
        assert_eq!(tracker.jobs()[0].id, id);
        assert_eq!(tracker.jobs().len(), 3);
        assert_eq!(persisted(&tracker), tracker.jobs());
    }

    #[test]
    fn invalid_form_leaves_state_and_storage_untouched() {
        let mut tracker = Tracker::open(MemoryStore::new());
        let err = tracker.create(form("", "Engineer")).unwrap_err();
        assert!(matches!(err, TrackError::Validation { field: "company", .. }));
        assert_eq!(tracker.jobs().len(), 2);
        assert_eq!(tracker.store().backend().get(JOBS_KEY).unwrap(), None);

        assert!(tracker.update("1", form("Apple", " ")).is_err());
        assert_eq!(tracker.find("1").unwrap().role, "Product Designer");
    }

    #[test]
    fn set_status_scenario() {
        let mut tracker = Tracker::open(MemoryStore::new());
        assert!(tracker.set_status("1", StageId::Offer).unwrap());
        assert_eq!(tracker.find("1").unwrap().status, StageId::Offer);

        let summary = summarize(tracker.jobs());
        assert_eq!(summary.count(StageId::Interview), 0);
        assert_eq!(summary.count(StageId::Offer), 1);
        assert_eq!(summary.count(StageId::Applied), 1);
        assert_eq!(persisted(&tracker)[0].status, StageId::Offer);
    }

    #[test]
    fn delete_scenario_persists_one_record() {
        let mut tracker = Tracker::open(MemoryStore::new());
        assert!(tracker.delete("2").unwrap());
        let ids: Vec<&str> = tracker.jobs().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
        assert_eq!(persisted(&tracker).len(), 1);
    }

    #[test]
    fn update_preserves_id_and_length() {
        let mut tracker = Tracker::open(MemoryStore::new());
        let mut edit = form("Linear", "Staff Frontend Engineer");
        edit.status = StageId::Interview;
        assert!(tracker.update("2", edit.clone()).unwrap());
        assert_eq!(tracker.jobs().len(), 2);
        assert_eq!(tracker.find("2"), Some(&edit.into_record("2".to_string())));
    }

    #[test]
    fn missing_ids_report_not_found_and_change_nothing() {
        let mut tracker = Tracker::open(MemoryStore::new());
        assert!(!tracker.delete("nope").unwrap());
        assert!(!tracker.set_status("nope", StageId::Offer).unwrap());
        assert!(!tracker.update("nope", form("A", "B")).unwrap());
        assert_eq!(tracker.jobs(), seed().as_slice());
    }

    #[test]
    fn create_then_delete_restores_size() {
        let mut tracker = Tracker::open(MemoryStore::new());
        let before = tracker.jobs().len();
        let id = tracker.create(form("Notion", "PM")).unwrap();
        assert!(tracker.delete(&id).unwrap());
        assert_eq!(tracker.jobs().len(), before);
    }

    #[test]
    fn state_survives_reopen() {
        let mut tracker = Tracker::open(MemoryStore::new());
        tracker.set_status("2", StageId::Rejected).unwrap();
        tracker.toggle_theme().unwrap();
        let backend = tracker.store().backend().clone();

        let reopened = Tracker::open(backend);
        assert_eq!(reopened.find("2").unwrap().status, StageId::Rejected);
        assert_eq!(reopened.theme(), Theme::Dark);
        assert_eq!(
            reopened.store().backend().get(THEME_KEY).unwrap().as_deref(),
            Some("dark")
        );
    }
}
