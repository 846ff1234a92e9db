// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Aggregates derived from the cached task collection.
//!
//! Nothing here is cached: every figure is recomputed from the tasks handed
//! in, against the calendar day handed in.
use chrono::{Days, NaiveDate};
use common::{Priority, Task};

/// Rounded percentage of `part` in `whole`, 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // Integer form of round(part / whole * 100), halves rounded up.
    ((part * 200 + whole) / (2 * whole)) as u32
}

/// Pending task due strictly before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.is_pending() && task.due_date.is_some_and(|due| due < today)
}

/// Pending task due on `today`.
pub fn is_due_today(task: &Task, today: NaiveDate) -> bool {
    task.is_pending() && task.due_date == Some(today)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    /// Complete and not in the trash.
    pub completed: usize,
    /// Neither complete nor in the trash.
    pub pending: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub high_priority: usize,
    pub in_trash: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };

        for task in tasks {
            if task.is_deleted {
                stats.in_trash += 1;
                continue;
            }
            if task.is_complete {
                stats.completed += 1;
                continue;
            }
            stats.pending += 1;
            if is_overdue(task, today) {
                stats.overdue += 1;
            }
            if is_due_today(task, today) {
                stats.due_today += 1;
            }
            if task.priority == Priority::High {
                stats.high_priority += 1;
            }
        }

        stats
    }

    pub fn completion_rate(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

/// Label bucket of a task's due date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBucket {
    Overdue,
    Today,
    Tomorrow,
    Later(NaiveDate),
}

impl DueBucket {
    pub fn of(task: &Task, today: NaiveDate) -> Option<Self> {
        let due = task.due_date?;
        let tomorrow = today.checked_add_days(Days::new(1));
        Some(if due < today {
            DueBucket::Overdue
        } else if due == today {
            DueBucket::Today
        } else if Some(due) == tomorrow {
            DueBucket::Tomorrow
        } else {
            DueBucket::Later(due)
        })
    }

    pub fn label(&self) -> String {
        match self {
            DueBucket::Overdue => "Overdue".to_string(),
            DueBucket::Today => "Today".to_string(),
            DueBucket::Tomorrow => "Tomorrow".to_string(),
            DueBucket::Later(date) => date.format("%b %-d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 9).unwrap()
    }

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            project_id: None,
            is_complete: false,
            is_deleted: false,
            created_at: Utc::now(),
            completed_at: None,
            updated_at: None,
            project: None,
        }
    }

    #[test]
    fn test_scenario_today_yesterday_done() {
        let yesterday = today().pred_opt().unwrap();
        let tasks = vec![
            Task {
                due_date: Some(today()),
                ..task("a")
            },
            Task {
                due_date: Some(yesterday),
                ..task("b")
            },
            Task {
                is_complete: true,
                ..task("c")
            },
        ];

        let stats = TaskStats::compute(&tasks, today());

        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.in_trash, 0);
    }

    #[test]
    fn test_every_task_counted_once() {
        let tasks = vec![
            task("a"),
            Task {
                is_complete: true,
                ..task("b")
            },
            Task {
                is_deleted: true,
                ..task("c")
            },
            Task {
                is_complete: true,
                is_deleted: true,
                ..task("d")
            },
        ];

        let stats = TaskStats::compute(&tasks, today());

        assert_eq!(stats.pending + stats.completed + stats.in_trash, stats.total);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_trash, 2);
    }

    #[test]
    fn test_deleted_tasks_not_overdue_or_due_today() {
        let yesterday = today().pred_opt().unwrap();
        let tasks = vec![
            Task {
                due_date: Some(yesterday),
                is_deleted: true,
                priority: Priority::High,
                ..task("a")
            },
            Task {
                due_date: Some(today()),
                is_deleted: true,
                ..task("b")
            },
        ];

        let stats = TaskStats::compute(&tasks, today());

        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 0);
        assert_eq!(stats.high_priority, 0);
        assert_eq!(stats.in_trash, 2);
    }

    #[test]
    fn test_high_priority_counts_pending_only() {
        let tasks = vec![
            Task {
                priority: Priority::High,
                ..task("a")
            },
            Task {
                priority: Priority::High,
                is_complete: true,
                ..task("b")
            },
        ];
        assert_eq!(TaskStats::compute(&tasks, today()).high_priority, 1);
    }

    #[test]
    fn test_tomorrow_is_neither_overdue_nor_today() {
        let tasks = vec![Task {
            due_date: today().succ_opt(),
            ..task("a")
        }];
        let stats = TaskStats::compute(&tasks, today());
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 0);
        assert_eq!(stats.pending, 1);
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(TaskStats::default().completion_rate(), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(4, 4), 100);
    }

    #[test]
    fn test_due_buckets() {
        let at = |due: Option<NaiveDate>| {
            DueBucket::of(
                &Task {
                    due_date: due,
                    ..task("a")
                },
                today(),
            )
        };
        let later = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();

        assert_eq!(at(None), None);
        assert_eq!(at(today().pred_opt()), Some(DueBucket::Overdue));
        assert_eq!(at(Some(today())), Some(DueBucket::Today));
        assert_eq!(at(today().succ_opt()), Some(DueBucket::Tomorrow));
        assert_eq!(at(Some(later)), Some(DueBucket::Later(later)));
        assert_eq!(DueBucket::Later(later).label(), "Jul 20");
    }
}
