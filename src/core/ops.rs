//! Pure mutations over the job collection. Each takes the current
//! collection and returns the next one; unknown ids leave it unchanged.

use rand_core::{OsRng, RngCore};

use crate::core::form::JobForm;
use crate::core::job::JobRecord;
use crate::core::stage::StageId;

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Prepends a record built from `form` under `id`.
pub fn create(jobs: &[JobRecord], form: JobForm, id: String) -> Vec<JobRecord> {
    let mut next = Vec::with_capacity(jobs.len() + 1);
    next.push(form.into_record(id));
    next.extend_from_slice(jobs);
    next
}

pub fn update(jobs: &[JobRecord], id: &str, form: &JobForm) -> Vec<JobRecord> {
    jobs.iter()
        .map(|job| {
            if job.id == id {
                form.clone().into_record(job.id.clone())
            } else {
                job.clone()
            }
        })
        .collect()
}

pub fn set_status(jobs: &[JobRecord], id: &str, status: StageId) -> Vec<JobRecord> {
    jobs.iter()
        .map(|job| {
            if job.id == id {
                JobRecord {
                    status,
                    ..job.clone()
                }
            } else {
                job.clone()
            }
        })
        .collect()
}

pub fn delete(jobs: &[JobRecord], id: &str) -> Vec<JobRecord> {
    jobs.iter().filter(|job| job.id != id).cloned().collect()
}

/// Random 9-character base-36 id not already present in `jobs`.
pub fn new_id(jobs: &[JobRecord]) -> String {
    loop {
        let candidate = random_id();
        if !jobs.iter().any(|job| job.id == candidate) {
            return candidate;
        }
    }
}

fn random_id() -> String {
    let mut bytes = [0_u8; ID_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ID_ALPHABET[(*b as usize) % ID_ALPHABET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::seed;

    fn form(company: &str, role: &str) -> JobForm {
        JobForm {
            company: company.to_string(),
            role: role.to_string(),
            applied_date: "2024-01-15".to_string(),
            ..JobForm::default()
        }
    }

    fn ids(jobs: &[JobRecord]) -> Vec<&str> {
        jobs.iter().map(|job| job.id.as_str()).collect()
    }

    #[test]
    fn create_prepends_without_touching_source() {
        let jobs = seed();
        let next = create(&jobs, form("Stripe", "Backend Engineer"), "abc".to_string());
        assert_eq!(ids(&next), vec!["abc", "1", "2"]);
        assert_eq!(next[0].company, "Stripe");
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn create_then_delete_restores_size() {
        let jobs = seed();
        let id = new_id(&jobs);
        let created = create(&jobs, form("Figma", "Designer"), id.clone());
        let removed = delete(&created, &id);
        assert_eq!(removed.len(), jobs.len());
        assert_eq!(removed, jobs);
    }

    #[test]
    fn update_keeps_id_and_length() {
        let jobs = seed();
        let mut edit = form("Apple Inc.", "Staff Designer");
        edit.status = StageId::Offer;
        edit.notes = "Negotiate".to_string();
        let next = update(&jobs, "1", &edit);
        assert_eq!(next.len(), jobs.len());
        assert_eq!(next[0], edit.clone().into_record("1".to_string()));
        assert_eq!(next[1], jobs[1]);
    }

    #[test]
    fn set_status_changes_only_the_target() {
        let next = set_status(&seed(), "1", StageId::Offer);
        assert_eq!(next[0].status, StageId::Offer);
        assert_eq!(next[0].company, "Apple");
        assert_eq!(next[1].status, StageId::Applied);
    }

    #[test]
    fn delete_removes_matching_record() {
        let next = delete(&seed(), "2");
        assert_eq!(ids(&next), vec!["1"]);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let jobs = seed();
        assert_eq!(delete(&jobs, "missing"), jobs);
        assert_eq!(update(&jobs, "missing", &form("X", "Y")), jobs);
        assert_eq!(set_status(&jobs, "missing", StageId::Offer), jobs);
    }

    #[test]
    fn generated_ids_are_base36_and_unique() {
        let jobs = seed();
        let id = new_id(&jobs);
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert!(jobs.iter().all(|job| job.id != id));
    }
}
