//! Filtered and sorted projections of the collection for display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::error::TrackError;
use crate::core::job::JobRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Company,
    Role,
    Location,
    Salary,
    Status,
    AppliedDate,
    Url,
    Notes,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Company,
        SortKey::Role,
        SortKey::Location,
        SortKey::Salary,
        SortKey::Status,
        SortKey::AppliedDate,
        SortKey::Url,
        SortKey::Notes,
    ];

    /// Field name as it appears in the persisted JSON.
    pub fn name(self) -> &'static str {
        match self {
            SortKey::Company => "company",
            SortKey::Role => "role",
            SortKey::Location => "location",
            SortKey::Salary => "salary",
            SortKey::Status => "status",
            SortKey::AppliedDate => "appliedDate",
            SortKey::Url => "url",
            SortKey::Notes => "notes",
        }
    }

    /// String form of the field used for comparison.
    pub fn value(self, job: &JobRecord) -> &str {
        match self {
            SortKey::Company => &job.company,
            SortKey::Role => &job.role,
            SortKey::Location => &job.location,
            SortKey::Salary => &job.salary,
            SortKey::Status => job.status.id(),
            SortKey::AppliedDate => &job.applied_date,
            SortKey::Url => &job.url,
            SortKey::Notes => &job.notes,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = TrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(&normalized))
            .or(match normalized.as_str() {
                "date" => Some(SortKey::AppliedDate),
                "stage" => Some(SortKey::Status),
                _ => None,
            })
            .ok_or_else(|| TrackError::InvalidCommand {
                message: format!("unknown sort key '{}'", value.trim()),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Same key flips the direction; a new key starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            Self::by(key, self.direction.flipped())
        } else {
            Self::by(key, SortDirection::Asc)
        }
    }
}

pub fn matches_query(job: &JobRecord, query: &str) -> bool {
    contains_needle(job, &query.to_lowercase())
}

pub fn filter_jobs<'a>(jobs: &'a [JobRecord], query: &str) -> Vec<&'a JobRecord> {
    let needle = query.to_lowercase();
    jobs.iter().filter(|job| contains_needle(job, &needle)).collect()
}

fn contains_needle(job: &JobRecord, needle: &str) -> bool {
    job.company.to_lowercase().contains(needle) || job.role.to_lowercase().contains(needle)
}

/// Stable sort: ties keep their incoming order.
pub fn sort_jobs(jobs: &mut [&JobRecord], spec: SortSpec) {
    let Some(key) = spec.key else {
        return;
    };
    jobs.sort_by(|a, b| {
        let ordering = compare_text(key.value(a), key.value(b));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn derive_view<'a>(jobs: &'a [JobRecord], query: &str, spec: SortSpec) -> Vec<&'a JobRecord> {
    let mut view = filter_jobs(jobs, query);
    sort_jobs(&mut view, spec);
    view
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::seed;
    use crate::core::stage::StageId;

    fn job(id: &str, company: &str, role: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            company: company.to_string(),
            role: role.to_string(),
            location: String::new(),
            salary: String::new(),
            status: StageId::Applied,
            applied_date: "2024-01-01".to_string(),
            url: String::new(),
            notes: String::new(),
        }
    }

    fn ids(view: &[&JobRecord]) -> Vec<String> {
        view.iter().map(|job| job.id.clone()).collect()
    }

    #[test]
    fn query_matches_company_or_role_case_insensitively() {
        let jobs = seed();
        assert_eq!(ids(&filter_jobs(&jobs, "lin")), vec!["2"]);
        assert_eq!(ids(&filter_jobs(&jobs, "DESIGNER")), vec!["1"]);
        assert_eq!(ids(&filter_jobs(&jobs, "")), vec!["1", "2"]);
        assert!(filter_jobs(&jobs, "remote").is_empty());
    }

    #[test]
    fn filter_keeps_exactly_the_matching_records() {
        let jobs = vec![
            job("a", "Acme", "Engineer"),
            job("b", "Globex", "Acme Liaison"),
            job("c", "Initech", "Analyst"),
            job("d", "acme labs", "Intern"),
        ];
        for query in ["acme", "an", "x", "", "ENG"] {
            let view = filter_jobs(&jobs, query);
            let expected: Vec<String> = jobs
                .iter()
                .filter(|j| matches_query(j, query))
                .map(|j| j.id.clone())
                .collect();
            assert_eq!(ids(&view), expected, "query {query:?}");
        }
        assert_eq!(ids(&filter_jobs(&jobs, "acme")), vec!["a", "b", "d"]);
    }

    #[test]
    fn sorts_by_company_both_directions() {
        let jobs = seed();
        let asc = derive_view(&jobs, "", SortSpec::by(SortKey::Company, SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["1", "2"]);
        let desc = derive_view(&jobs, "", SortSpec::by(SortKey::Company, SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["2", "1"]);
    }

    #[test]
    fn sort_ignores_case_and_keeps_ties_stable() {
        let jobs = vec![
            job("1", "beta", "x"),
            job("2", "Alpha", "x"),
            job("3", "ALPHA", "x"),
            job("4", "", "x"),
        ];
        let view = derive_view(&jobs, "", SortSpec::by(SortKey::Company, SortDirection::Asc));
        assert_eq!(ids(&view), vec!["4", "2", "3", "1"]);
        let view = derive_view(&jobs, "", SortSpec::by(SortKey::Company, SortDirection::Desc));
        assert_eq!(ids(&view), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let jobs = vec![
            job("1", "Umbrella", "Chemist"),
            job("2", "acme", "Engineer"),
            job("3", "Hooli", "Engineer"),
            job("4", "Acme", "Analyst"),
        ];
        for key in SortKey::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let spec = SortSpec::by(key, direction);
                let mut once = derive_view(&jobs, "", spec);
                let snapshot = ids(&once);
                sort_jobs(&mut once, spec);
                assert_eq!(ids(&once), snapshot);
            }
        }
    }

    #[test]
    fn status_sorts_by_stage_id_text() {
        let jobs = seed();
        let view = derive_view(&jobs, "", SortSpec::by(SortKey::Status, SortDirection::Asc));
        assert_eq!(ids(&view), vec!["2", "1"]);
    }

    #[test]
    fn no_sort_key_preserves_collection_order() {
        let jobs = seed();
        let view = derive_view(&jobs, "", SortSpec::default());
        assert_eq!(ids(&view), vec!["1", "2"]);
    }

    #[test]
    fn toggling_flips_same_key_and_resets_on_new_key() {
        let spec = SortSpec::default().toggled(SortKey::Company);
        assert_eq!(spec, SortSpec::by(SortKey::Company, SortDirection::Asc));
        let spec = spec.toggled(SortKey::Company);
        assert_eq!(spec.direction, SortDirection::Desc);
        let spec = spec.toggled(SortKey::Company);
        assert_eq!(spec.direction, SortDirection::Asc);
        let spec = spec.toggled(SortKey::Company).toggled(SortKey::Salary);
        assert_eq!(spec, SortSpec::by(SortKey::Salary, SortDirection::Asc));
    }

    #[test]
    fn parses_sort_keys_in_several_spellings() {
        assert_eq!("appliedDate".parse::<SortKey>().unwrap(), SortKey::AppliedDate);
        assert_eq!("applied-date".parse::<SortKey>().unwrap(), SortKey::AppliedDate);
        assert_eq!("applied_date".parse::<SortKey>().unwrap(), SortKey::AppliedDate);
        assert_eq!("date".parse::<SortKey>().unwrap(), SortKey::AppliedDate);
        assert_eq!("Company".parse::<SortKey>().unwrap(), SortKey::Company);
        assert!("id".parse::<SortKey>().is_err());
    }
}
