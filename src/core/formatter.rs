use crate::core::job::JobRecord;
use crate::core::stage::StageId;
use crate::core::stats::{stage_counts, PipelineSummary};
use crate::core::view::{SortDirection, SortKey, SortSpec};

const ID_WIDTH: usize = 9;
const COMPANY_WIDTH: usize = 18;
const ROLE_WIDTH: usize = 24;
const STAGE_WIDTH: usize = 12;
const SALARY_WIDTH: usize = 10;
const DATE_WIDTH: usize = 10;
const URL_WIDTH: usize = 28;

pub fn format_table(view: &[&JobRecord], sort: SortSpec) -> Vec<String> {
    let header = format!(
        "{} {} {} {} {} {} {}",
        fit("ID", ID_WIDTH),
        fit(&column_title("Company", SortKey::Company, sort), COMPANY_WIDTH),
        fit(&column_title("Role", SortKey::Role, sort), ROLE_WIDTH),
        fit(&column_title("Stage", SortKey::Status, sort), STAGE_WIDTH),
        fit(&column_title("Salary", SortKey::Salary, sort), SALARY_WIDTH),
        fit(&column_title("Date", SortKey::AppliedDate, sort), DATE_WIDTH),
        column_title("Job Site", SortKey::Url, sort),
    );
    let mut lines = vec![header.trim_end().to_string()];
    if view.is_empty() {
        lines.push("(no matching applications)".to_string());
        return lines;
    }
    for job in view {
        let row = format!(
            "{} {} {} {} {} {} {}",
            fit(&job.id, ID_WIDTH),
            fit(&job.company, COMPANY_WIDTH),
            fit(&job.role, ROLE_WIDTH),
            fit(job.status.label(), STAGE_WIDTH),
            fit(or_dash(&job.salary), SALARY_WIDTH),
            fit(&job.applied_date, DATE_WIDTH),
            truncate(or_dash(&job.url), URL_WIDTH),
        );
        lines.push(row.trim_end().to_string());
    }
    lines
}

/// Kanban columns one after another, headers counting the cards shown.
pub fn format_board(view: &[&JobRecord]) -> Vec<String> {
    let counts = stage_counts(view.iter().copied());
    let mut lines = Vec::new();
    for entry in counts {
        lines.push(format!("{} ({})", entry.stage.label().to_uppercase(), entry.count));
        for job in view.iter().filter(|job| job.status == entry.stage) {
            lines.push(format!("  [{}] {} - {}", job.id, job.company, job.role));
        }
    }
    lines
}

pub fn format_stats(summary: &PipelineSummary, bar_width: usize) -> Vec<String> {
    let mut lines = vec!["Application Pipeline".to_string()];
    for entry in &summary.counts {
        lines.push(format!(
            "{} {} {:>3}",
            fit(entry.stage.label(), STAGE_WIDTH),
            render_bar(entry.ratio(summary.total), bar_width),
            entry.count
        ));
    }
    lines.push(format!("Total Opportunities: {}", summary.total));
    lines
}

pub fn format_record(job: &JobRecord) -> Vec<String> {
    vec![
        format!("{} at {}", job.role, job.company),
        format!("  id       : {}", job.id),
        format!("  stage    : {}", job.status.label()),
        format!("  location : {}", or_dash(&job.location)),
        format!("  salary   : {}", or_dash(&job.salary)),
        format!("  applied  : {}", or_dash(&job.applied_date)),
        format!("  url      : {}", or_dash(&job.url)),
        format!("  notes    : {}", or_dash(&job.notes)),
    ]
}

pub fn format_stage_list() -> String {
    StageId::ALL
        .iter()
        .map(|stage| format!("{} ({})", stage.id(), stage.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_bar(ratio: f64, width: usize) -> String {
    let width = width.max(1);
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for idx in 0..width {
        bar.push(if idx < filled { '#' } else { ' ' });
    }
    bar.push(']');
    bar
}

pub fn sort_marker(sort: SortSpec, key: SortKey) -> &'static str {
    match (sort.key == Some(key), sort.direction) {
        (false, _) => "",
        (true, SortDirection::Asc) => " ^",
        (true, SortDirection::Desc) => " v",
    }
}

fn column_title(title: &str, key: SortKey, sort: SortSpec) -> String {
    format!("{title}{}", sort_marker(sort, key))
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Pads or cuts `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let pad = width.saturating_sub(cut.chars().count());
    format!("{cut}{}", " ".repeat(pad))
}

pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::job::seed;
    use crate::core::stats::summarize;
    use crate::core::view::derive_view;

    #[test]
    fn table_marks_active_sort_column() {
        let jobs = seed();
        let sort = SortSpec::by(SortKey::Company, SortDirection::Desc);
        let view = derive_view(&jobs, "", sort);
        let lines = format_table(&view, sort);
        assert!(lines[0].contains("Company v"));
        assert!(lines[1].starts_with("2 "));
        assert!(lines[1].contains("Linear"));
        assert!(lines[2].contains("Interviewing"));
    }

    #[test]
    fn empty_table_says_so() {
        let lines = format_table(&[], SortSpec::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "(no matching applications)");
    }

    #[test]
    fn board_lists_every_column_with_counts() {
        let jobs = seed();
        let view = derive_view(&jobs, "lin", SortSpec::default());
        let lines = format_board(&view);
        assert_eq!(lines[0], "WISHLIST (0)");
        assert_eq!(lines[1], "APPLIED (1)");
        assert_eq!(lines[2], "  [2] Linear - Frontend Engineer");
        assert_eq!(lines[3], "INTERVIEWING (0)");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn stats_draw_proportional_bars() {
        let lines = format_stats(&summarize(&seed()), 10);
        assert_eq!(lines[0], "Application Pipeline");
        assert!(lines[2].contains("[#####     ]"));
        assert!(lines[1].contains("[          ]"));
        assert_eq!(lines.last().unwrap(), "Total Opportunities: 2");
    }

    #[test]
    fn fit_pads_and_truncates_by_chars() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc~");
        assert_eq!(fit("héllo", 5), "héllo");
    }

    #[test]
    fn bar_handles_bounds() {
        assert_eq!(render_bar(0.0, 4), "[    ]");
        assert_eq!(render_bar(1.0, 4), "[####]");
        assert_eq!(render_bar(2.0, 4), "[####]");
    }
}
