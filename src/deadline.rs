//! Deadline classification and calendar math.
//!
//! Pure functions mapping a task's due date and today's date into a signed
//! day delta, a human label and an urgency bucket, plus the calendar-grid
//! arithmetic shared by the dashboard, the alerts panel and the task list.
//! Both sides of every comparison are plain [`NaiveDate`] values, so
//! midnight normalisation is structural and off-by-one bugs across midnight
//! or timezone boundaries cannot occur here.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::fields::{format_task_kind, TaskStatus};
use crate::task::Task;

/// Signed whole-day difference between a due date and today.
///
/// Negative means overdue, zero means due today.
pub fn day_delta(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Human label for a day delta. The exact strings are load-bearing: the
/// alerts panel, the task list and the CLI all print them.
pub fn urgency_label(delta: i64) -> String {
    if delta < 0 {
        format!("{} days overdue", -delta)
    } else if delta == 0 {
        "due today".to_string()
    } else if delta == 1 {
        "due tomorrow".to_string()
    } else {
        format!("due in {} days", delta)
    }
}

/// Display classification of a task relative to today.
///
/// Buckets are mutually exclusive and evaluated in declaration order:
/// a manually assigned `late` status always wins over date math, even for
/// a due date far in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBucket {
    Urgent,
    Upcoming,
    WithinDeadline,
    None,
}

/// Classify a task into an urgency bucket.
pub fn urgency_bucket(task: &Task, today: NaiveDate) -> UrgencyBucket {
    if task.status == TaskStatus::Late {
        return UrgencyBucket::Urgent;
    }
    if task.status == TaskStatus::Done {
        return UrgencyBucket::None;
    }
    let delta = day_delta(task.due, today);
    if (0..=2).contains(&delta) {
        UrgencyBucket::Upcoming
    } else if delta > 2 && delta <= 7 {
        UrgencyBucket::WithinDeadline
    } else {
        UrgencyBucket::None
    }
}

/// Grouping key for a calendar day: "YYYY-MM-DD".
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// All tasks due on the given date, in store order.
pub fn tasks_for_day(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.due == date).collect()
}

/// One-line summary for a day's tasks: total count plus a per-kind
/// breakdown in first-seen order, each pluralised with a trailing "s" when
/// its count exceeds one. Returns `None` for an empty day.
///
/// Example: `[Feed, Feed, Carrossel]` becomes
/// "3 demandas — 2 feeds, 1 carrossel".
pub fn day_summary(day_tasks: &[&Task]) -> Option<String> {
    if day_tasks.is_empty() {
        return None;
    }
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for task in day_tasks {
        let label = format_task_kind(task.kind);
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    let breakdown = counts
        .iter()
        .map(|(label, n)| {
            format!(
                "{} {}{}",
                n,
                label.to_lowercase(),
                if *n > 1 { "s" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let total = day_tasks.len();
    Some(format!(
        "{} demanda{} — {}",
        total,
        if total > 1 { "s" } else { "" },
        breakdown
    ))
}

/// The three alert groups rendered on the dashboard.
#[derive(Debug, Default)]
pub struct AlertGroups<'a> {
    /// Every task whose status is `late`, regardless of date.
    pub urgent: Vec<&'a Task>,
    /// Due within 0..=2 days, capped at three entries.
    pub upcoming: Vec<&'a Task>,
    /// Due within 3..=7 days, capped at three entries.
    pub within_deadline: Vec<&'a Task>,
}

/// Split tasks into the alert groups via [`urgency_bucket`].
pub fn alert_groups(tasks: &[Task], today: NaiveDate) -> AlertGroups<'_> {
    let mut groups = AlertGroups::default();
    for task in tasks {
        match urgency_bucket(task, today) {
            UrgencyBucket::Urgent => groups.urgent.push(task),
            UrgencyBucket::Upcoming => {
                if groups.upcoming.len() < 3 {
                    groups.upcoming.push(task);
                }
            }
            UrgencyBucket::WithinDeadline => {
                if groups.within_deadline.len() < 3 {
                    groups.within_deadline.push(task);
                }
            }
            UrgencyBucket::None => {}
        }
    }
    groups
}

/// Tasks due strictly after today and within the next `days` days, capped
/// at five. Late-flagged tasks are always excluded; done tasks only when
/// `include_done` is false.
pub fn upcoming_within(tasks: &[Task], today: NaiveDate, days: i64, include_done: bool) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| {
            let delta = day_delta(t.due, today);
            delta > 0
                && delta <= days
                && t.status != TaskStatus::Late
                && (include_done || t.status != TaskStatus::Done)
        })
        .take(5)
        .collect()
}

/// Number of days in a calendar month, via the first-of-next-month minus
/// one day trick. Integer arithmetic only.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = next_month(year, month);
    let first_of_next =
        NaiveDate::from_ymd_opt(ny, nm, 1).expect("first of month is always valid");
    (first_of_next - Duration::days(1)).day()
}

/// Advance by exactly one calendar month, wrapping the year.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Go back exactly one calendar month, wrapping the year.
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Monday of the ISO week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(back)
}

/// A month laid out on a Sunday-first grid, as the calendar view renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Blank cells before day 1: the weekday of the first of the month,
    /// Sunday-indexed.
    pub leading_blanks: usize,
    pub days: u32,
}

impl MonthGrid {
    /// Lay out a month. Returns `None` for an out-of-range month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(MonthGrid {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday() as usize,
            days: days_in_month(year, month),
        })
    }

    /// The full cell sequence: leading blanks as `None`, then each day
    /// number.
    pub fn cells(&self) -> Vec<Option<u32>> {
        let mut cells = vec![None; self.leading_blanks];
        cells.extend((1..=self.days).map(Some));
        cells
    }

    /// The date of a day number inside this month.
    pub fn date_of(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Number of grid rows needed to show the whole month.
    pub fn rows(&self) -> usize {
        (self.leading_blanks + self.days as usize).div_ceil(7)
    }
}

/// Abbreviated pt-BR weekday headers, Sunday first, as the month view shows.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const MONTHS_PT_SHORT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Calendar heading, e.g. "Outubro 2025".
pub fn month_title(year: i32, month: u32) -> String {
    let name = MONTHS_PT[(month as usize - 1).min(11)];
    let mut chars = name.chars();
    let capitalised = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("{} {}", capitalised, year)
}

/// Short pt-BR date, e.g. "22 out 2025".
pub fn format_date_short(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_PT_SHORT[(date.month0()) as usize],
        date.year()
    )
}

/// Long pt-BR date without year, e.g. "22 de outubro".
pub fn format_date_long(date: NaiveDate) -> String {
    format!("{:02} de {}", date.day(), MONTHS_PT[date.month0() as usize])
}

/// True for Saturday and Sunday; the calendar dims weekend cells.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, TaskKind, TaskStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(due: NaiveDate, kind: TaskKind, status: TaskStatus) -> Task {
        Task {
            id: "T-900".to_string(),
            title: "t".to_string(),
            client: "c".to_string(),
            due,
            kind,
            status,
            priority: Priority::Normal,
            notes: None,
        }
    }

    #[test]
    fn test_day_delta_and_labels() {
        let today = date(2025, 10, 22);
        assert_eq!(day_delta(today, today), 0);
        assert_eq!(urgency_label(0), "due today");
        assert_eq!(day_delta(date(2025, 10, 23), today), 1);
        assert_eq!(urgency_label(1), "due tomorrow");
        assert_eq!(day_delta(date(2025, 10, 19), today), -3);
        assert_eq!(urgency_label(-3), "3 days overdue");
        assert_eq!(urgency_label(5), "due in 5 days");
    }

    #[test]
    fn test_delta_across_month_boundary() {
        assert_eq!(day_delta(date(2025, 11, 1), date(2025, 10, 31)), 1);
        assert_eq!(day_delta(date(2026, 1, 1), date(2025, 12, 31)), 1);
    }

    #[test]
    fn test_late_status_beats_future_date() {
        let today = date(2025, 10, 22);
        let t = task(date(2026, 3, 1), TaskKind::Feed, TaskStatus::Late);
        assert_eq!(urgency_bucket(&t, today), UrgencyBucket::Urgent);
    }

    #[test]
    fn test_bucket_windows() {
        let today = date(2025, 10, 22);
        let producing = |d| task(d, TaskKind::Feed, TaskStatus::Producing);
        assert_eq!(urgency_bucket(&producing(today), today), UrgencyBucket::Upcoming);
        assert_eq!(
            urgency_bucket(&producing(date(2025, 10, 24)), today),
            UrgencyBucket::Upcoming
        );
        assert_eq!(
            urgency_bucket(&producing(date(2025, 10, 25)), today),
            UrgencyBucket::WithinDeadline
        );
        assert_eq!(
            urgency_bucket(&producing(date(2025, 10, 29)), today),
            UrgencyBucket::WithinDeadline
        );
        assert_eq!(
            urgency_bucket(&producing(date(2025, 10, 30)), today),
            UrgencyBucket::None
        );
        // Done tasks never alert, even when due today.
        let done = task(today, TaskKind::Feed, TaskStatus::Done);
        assert_eq!(urgency_bucket(&done, today), UrgencyBucket::None);
        // Overdue-but-not-flagged tasks fall through to None: the bucket
        // trusts the stored status, not the date.
        assert_eq!(
            urgency_bucket(&producing(date(2025, 10, 1)), today),
            UrgencyBucket::None
        );
    }

    #[test]
    fn test_day_summary_breakdown() {
        let d = date(2025, 10, 22);
        let tasks = vec![
            task(d, TaskKind::Feed, TaskStatus::Producing),
            task(d, TaskKind::Feed, TaskStatus::Awaiting),
            task(d, TaskKind::Carousel, TaskStatus::Producing),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        assert_eq!(
            day_summary(&refs).unwrap(),
            "3 demandas — 2 feeds, 1 carrossel"
        );
    }

    #[test]
    fn test_day_summary_singular_and_empty() {
        let d = date(2025, 10, 22);
        let tasks = vec![task(d, TaskKind::Stories, TaskStatus::Producing)];
        let refs: Vec<&Task> = tasks.iter().collect();
        assert_eq!(day_summary(&refs).unwrap(), "1 demanda — 1 stories");
        assert_eq!(day_summary(&[]), None);
    }

    #[test]
    fn test_month_grid_october_2025() {
        // October 2025 starts on a Wednesday and has 31 days.
        let grid = MonthGrid::new(2025, 10).unwrap();
        assert_eq!(grid.leading_blanks, 3);
        assert_eq!(grid.days, 31);
        let cells = grid.cells();
        assert_eq!(cells.len(), 34);
        assert_eq!(cells[..3], [None, None, None]);
        assert_eq!(cells[3], Some(1));
        assert_eq!(cells[33], Some(31));
    }

    #[test]
    fn test_days_in_month_edge_cases() {
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_month_navigation_wraps_year() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(prev_month(2026, 1), (2025, 12));
        assert_eq!(next_month(2025, 6), (2025, 7));
    }

    #[test]
    fn test_monday_of_week() {
        // 2025-10-22 is a Wednesday.
        assert_eq!(monday_of_week(date(2025, 10, 22)), date(2025, 10, 20));
        assert_eq!(monday_of_week(date(2025, 10, 20)), date(2025, 10, 20));
        assert_eq!(monday_of_week(date(2025, 10, 26)), date(2025, 10, 20));
    }

    #[test]
    fn test_alert_groups_caps() {
        let today = date(2025, 10, 22);
        let mut tasks = Vec::new();
        for i in 0..5 {
            tasks.push(task(today + Duration::days(i % 3), TaskKind::Feed, TaskStatus::Producing));
        }
        tasks.push(task(date(2026, 1, 1), TaskKind::Feed, TaskStatus::Late));
        let groups = alert_groups(&tasks, today);
        assert_eq!(groups.urgent.len(), 1);
        assert_eq!(groups.upcoming.len(), 3);
    }

    #[test]
    fn test_upcoming_excludes_today_and_late() {
        let today = date(2025, 10, 22);
        let tasks = vec![
            task(today, TaskKind::Feed, TaskStatus::Producing),
            task(date(2025, 10, 23), TaskKind::Feed, TaskStatus::Producing),
            task(date(2025, 10, 24), TaskKind::Feed, TaskStatus::Late),
            task(date(2025, 10, 25), TaskKind::Feed, TaskStatus::Done),
        ];
        let up = upcoming_within(&tasks, today, 7, false);
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].due, date(2025, 10, 23));
        let with_done = upcoming_within(&tasks, today, 7, true);
        assert_eq!(with_done.len(), 2);
    }

    #[test]
    fn test_date_key_format() {
        assert_eq!(date_key(date(2025, 3, 5)), "2025-03-05");
    }

    #[test]
    fn test_pt_br_formatting() {
        assert_eq!(month_title(2025, 10), "Outubro 2025");
        assert_eq!(format_date_short(date(2025, 10, 22)), "22 out 2025");
        assert_eq!(format_date_long(date(2025, 3, 5)), "05 de março");
    }
}
