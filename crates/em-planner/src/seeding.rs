//! First-pass date placement for a newly created session.

use chrono::NaiveDate;

use crate::model::ExamSession;
use crate::rebalance::WINDOW_SCAN_LIMIT;

/// Spread a brand-new session's modules evenly across the days before its
/// exam, ignoring every other session.
///
/// Runs once at creation time so the plan has sensible dates to show before
/// the first full [`rebalance()`](crate::rebalance::rebalance) supersedes it.
/// Nothing is locked yet, so every module is placed; there is no exam-day
/// exclusion and
/// no capacity check because no other session is considered. Uses the same
/// proportional slot formula as the rebalancing pass.
pub fn seed_dates(mut session: ExamSession, today: NaiveDate) -> ExamSession {
    let mut modules = std::mem::take(&mut session.material.study_plan);
    modules.sort_by_key(|m| m.day);

    let mut window = Vec::new();
    let mut cursor = today;
    let mut steps = 0;
    while cursor < session.exam_date && steps < WINDOW_SCAN_LIMIT {
        window.push(cursor);
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
        steps += 1;
    }

    let count = modules.len();
    if count > 0 && !window.is_empty() {
        for (index, module) in modules.iter_mut().enumerate() {
            let slot = ((index * window.len()) / count).min(window.len() - 1);
            module.assigned_date = Some(window[slot]);
            module.is_manually_placed = false;
        }
    }

    session.material.study_plan = modules;
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DepthLevel, ExamType, Priority, StudyMaterial, StudyModule,
    };
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn module(uid: &str, day: i32) -> StudyModule {
        StudyModule {
            uid: uid.to_string(),
            day,
            topics: vec![format!("Argomento {day}")],
            tasks: vec!["[TEORIA] Studio - 2h".to_string()],
            priority: Priority::Medium,
            assigned_date: None,
            completed_tasks: vec![false],
            is_manually_placed: false,
        }
    }

    fn session(exam_date: NaiveDate, modules: Vec<StudyModule>) -> ExamSession {
        ExamSession {
            id: Uuid::new_v4(),
            faculty: "Ingegneria".to_string(),
            course: "Analisi".to_string(),
            exam_type: ExamType::Written,
            depth: DepthLevel::Medium,
            exam_date,
            is_passed: false,
            day_offs: vec![],
            color_index: 0,
            content: String::new(),
            past_exams_content: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            last_update_date: None,
            material: StudyMaterial {
                study_plan: modules,
                ..StudyMaterial::default()
            },
        }
    }

    #[test]
    fn modules_spread_evenly_across_the_window() {
        // Nine days before the exam, three modules: slots 0, 3 and 6.
        let s = session(
            date(10),
            vec![module("m1", 1), module("m2", 2), module("m3", 3)],
        );
        let out = seed_dates(s, date(1));

        let dates: Vec<_> = out
            .material
            .study_plan
            .iter()
            .map(|m| m.assigned_date.unwrap())
            .collect();
        assert_eq!(dates, vec![date(1), date(4), date(7)]);
    }

    #[test]
    fn placement_follows_authoring_order() {
        let s = session(date(10), vec![module("later", 7), module("earlier", 2)]);
        let out = seed_dates(s, date(1));

        let plan = &out.material.study_plan;
        assert_eq!(plan[0].uid, "earlier");
        assert!(plan[0].assigned_date.unwrap() < plan[1].assigned_date.unwrap());
    }

    #[test]
    fn more_modules_than_days_stack_up() {
        let s = session(
            date(3),
            (1..=5).map(|i| module(&format!("m{i}"), i)).collect(),
        );
        let out = seed_dates(s, date(1));

        for m in &out.material.study_plan {
            let d = m.assigned_date.unwrap();
            assert!(d == date(1) || d == date(2));
        }
    }

    #[test]
    fn exam_in_the_past_leaves_plan_untouched() {
        let s = session(date(1), vec![module("m1", 1)]);
        let out = seed_dates(s, date(5));
        assert_eq!(out.material.study_plan[0].assigned_date, None);
    }

    #[test]
    fn empty_plan_is_a_no_op() {
        let s = session(date(10), vec![]);
        let out = seed_dates(s, date(1));
        assert!(out.material.study_plan.is_empty());
    }
}
