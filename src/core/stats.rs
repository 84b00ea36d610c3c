use crate::core::job::JobRecord;
use crate::core::stage::StageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCount {
    pub stage: StageId,
    pub count: usize,
}

impl StageCount {
    /// Share of `total`, guarded so an empty collection draws empty bars.
    pub fn ratio(&self, total: usize) -> f64 {
        self.count as f64 / total.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub counts: Vec<StageCount>,
    pub total: usize,
}

impl PipelineSummary {
    pub fn count(&self, stage: StageId) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// Per-stage counts in column order.
pub fn stage_counts<'a, I>(jobs: I) -> Vec<StageCount>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let mut counts = [0_usize; StageId::ALL.len()];
    for job in jobs {
        counts[job.status.index()] += 1;
    }
    StageId::ALL
        .into_iter()
        .map(|stage| StageCount {
            stage,
            count: counts[stage.index()],
        })
        .collect()
}

pub fn summarize(jobs: &[JobRecord]) -> PipelineSummary {
    PipelineSummary {
        counts: stage_counts(jobs),
        total: jobs.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::seed;
    use crate::core::ops;
    use crate::core::view::filter_jobs;

    #[test]
    fn counts_follow_stage_order() {
        let summary = summarize(&seed());
        let stages: Vec<StageId> = summary.counts.iter().map(|c| c.stage).collect();
        assert_eq!(stages, StageId::ALL.to_vec());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.count(StageId::Interview), 1);
        assert_eq!(summary.count(StageId::Applied), 1);
        assert_eq!(summary.count(StageId::Offer), 0);
    }

    #[test]
    fn status_change_moves_the_count() {
        let jobs = ops::set_status(&seed(), "1", StageId::Offer);
        let summary = summarize(&jobs);
        assert_eq!(summary.count(StageId::Interview), 0);
        assert_eq!(summary.count(StageId::Offer), 1);
        assert_eq!(summary.count(StageId::Applied), 1);
    }

    #[test]
    fn counts_a_filtered_view() {
        let jobs = seed();
        let counts = stage_counts(filter_jobs(&jobs, "linear"));
        assert_eq!(counts[StageId::Applied.index()].count, 1);
        assert_eq!(counts[StageId::Interview.index()].count, 0);
    }

    #[test]
    fn ratio_uses_at_least_one_as_denominator() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.counts.iter().all(|c| c.ratio(summary.total) == 0.0));

        let summary = summarize(&seed());
        let applied = summary.counts[StageId::Applied.index()];
        assert!((applied.ratio(summary.total) - 0.5).abs() < f64::EPSILON);
    }
}
