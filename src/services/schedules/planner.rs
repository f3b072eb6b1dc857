//! 周课表排课器
//!
//! 纯函数，不访问存储。网格为 `days_per_week × periods_per_day`，
//! 班级、教师、教室在同一格内各最多一节课。随机数由调用方传入，
//! 相同输入与种子得到相同结果。
//!
//! 对每门科目先选定教师（优先可任教该科目的教师）和教室，再逐节在班级的
//! 空闲格中随机挑选教师与教室也空闲的一格；找不到时记为未排课时，不回溯。

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::models::curricula::entities::CurriculumSubject;
use crate::models::schedules::{entities::NewScheduleRow, responses::UnscheduledSession};
use crate::utils::dates::{format_date, weekday_number};

/// 网格中的一格（星期与节次都从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub weekday: u32,
    pub period: u32,
}

#[derive(Debug, Clone)]
pub struct ClassPlan {
    pub class_id: i64,
    pub subjects: Vec<CurriculumSubject>,
}

#[derive(Debug, Clone)]
pub struct TeacherOption {
    pub teacher_id: i64,
    pub subject_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PlannerInput {
    pub days_per_week: u32,
    pub periods_per_day: u32,
    pub classes: Vec<ClassPlan>,
    pub teachers: Vec<TeacherOption>,
    pub classroom_ids: Vec<i64>,
    /// 其他班级已占用的教师格
    pub busy_teachers: HashSet<(i64, Cell)>,
    /// 其他班级已占用的教室格
    pub busy_classrooms: HashSet<(i64, Cell)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedSession {
    pub cell: Cell,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub classroom_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ClassTemplate {
    pub class_id: i64,
    pub sessions: Vec<PlacedSession>,
    pub free_cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default)]
pub struct WeeklyPlan {
    pub classes: Vec<ClassTemplate>,
    pub unscheduled: Vec<UnscheduledSession>,
}

impl WeeklyPlan {
    pub fn placed_sessions(&self) -> usize {
        self.classes.iter().map(|c| c.sessions.len()).sum()
    }

    pub fn free_slots(&self) -> usize {
        self.classes.iter().map(|c| c.free_cells.len()).sum()
    }
}

fn grid(days_per_week: u32, periods_per_day: u32) -> Vec<Cell> {
    (1..=days_per_week)
        .flat_map(|weekday| (1..=periods_per_day).map(move |period| Cell { weekday, period }))
        .collect()
}

/// 生成每个班级一周的课表模板
pub fn plan_week<R: Rng + ?Sized>(input: &PlannerInput, rng: &mut R) -> WeeklyPlan {
    let cells = grid(input.days_per_week, input.periods_per_day);
    let mut busy_class: HashSet<(i64, Cell)> = HashSet::new();
    let mut busy_teacher = input.busy_teachers.clone();
    let mut busy_classroom = input.busy_classrooms.clone();

    let mut plan = WeeklyPlan::default();

    for class in &input.classes {
        let mut template = ClassTemplate {
            class_id: class.class_id,
            ..Default::default()
        };

        for line in &class.subjects {
            let wanted = line.sessions_per_week.max(0);
            if wanted == 0 {
                continue;
            }

            let qualified: Vec<i64> = input
                .teachers
                .iter()
                .filter(|t| t.subject_ids.contains(&line.subject_id))
                .map(|t| t.teacher_id)
                .collect();
            let any: Vec<i64> = input.teachers.iter().map(|t| t.teacher_id).collect();
            let pool = if qualified.is_empty() { &any } else { &qualified };

            let Some(&teacher_id) = pool.choose(rng) else {
                plan.unscheduled.push(UnscheduledSession {
                    class_id: class.class_id,
                    subject_id: line.subject_id,
                    missing_sessions: wanted,
                    reason: "no teacher available".to_string(),
                });
                continue;
            };
            let Some(&classroom_id) = input.classroom_ids.choose(rng) else {
                plan.unscheduled.push(UnscheduledSession {
                    class_id: class.class_id,
                    subject_id: line.subject_id,
                    missing_sessions: wanted,
                    reason: "no classroom available".to_string(),
                });
                continue;
            };

            let mut missing = 0;
            for _ in 0..wanted {
                let mut candidates: Vec<Cell> = cells
                    .iter()
                    .copied()
                    .filter(|cell| !busy_class.contains(&(class.class_id, *cell)))
                    .collect();
                candidates.shuffle(rng);

                let slot = candidates.into_iter().find(|cell| {
                    !busy_teacher.contains(&(teacher_id, *cell))
                        && !busy_classroom.contains(&(classroom_id, *cell))
                });

                match slot {
                    Some(cell) => {
                        busy_class.insert((class.class_id, cell));
                        busy_teacher.insert((teacher_id, cell));
                        busy_classroom.insert((classroom_id, cell));
                        template.sessions.push(PlacedSession {
                            cell,
                            subject_id: line.subject_id,
                            teacher_id,
                            classroom_id,
                        });
                    }
                    None => missing += 1,
                }
            }

            if missing > 0 {
                plan.unscheduled.push(UnscheduledSession {
                    class_id: class.class_id,
                    subject_id: line.subject_id,
                    missing_sessions: missing,
                    reason: format!(
                        "no free slot for teacher {teacher_id} and classroom {classroom_id}"
                    ),
                });
            }
        }

        template.sessions.sort_by_key(|s| s.cell);
        template.free_cells = cells
            .iter()
            .copied()
            .filter(|cell| !busy_class.contains(&(class.class_id, *cell)))
            .collect();
        plan.classes.push(template);
    }

    plan
}

/// 把周模板展开到学期内的每一个上课日
pub fn expand_over_semester(
    plan: &WeeklyPlan,
    semester_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    days_per_week: u32,
) -> Vec<NewScheduleRow> {
    // 按星期索引，便于逐日展开
    let mut by_weekday: BTreeMap<u32, Vec<NewScheduleRow>> = BTreeMap::new();
    for template in &plan.classes {
        for session in &template.sessions {
            by_weekday
                .entry(session.cell.weekday)
                .or_default()
                .push(NewScheduleRow {
                    semester_id,
                    class_id: template.class_id,
                    subject_id: Some(session.subject_id),
                    teacher_id: Some(session.teacher_id),
                    classroom_id: Some(session.classroom_id),
                    schedule_date: String::new(),
                    weekday: session.cell.weekday as i32,
                    period: session.cell.period as i32,
                    is_free_time: false,
                    note: None,
                });
        }
        for cell in &template.free_cells {
            by_weekday
                .entry(cell.weekday)
                .or_default()
                .push(NewScheduleRow {
                    semester_id,
                    class_id: template.class_id,
                    subject_id: None,
                    teacher_id: None,
                    classroom_id: None,
                    schedule_date: String::new(),
                    weekday: cell.weekday as i32,
                    period: cell.period as i32,
                    is_free_time: true,
                    note: None,
                });
        }
    }

    let mut rows = Vec::new();
    let mut date = start;
    while date <= end {
        let weekday = weekday_number(date) as u32;
        if weekday <= days_per_week
            && let Some(day_rows) = by_weekday.get(&weekday)
        {
            let schedule_date = format_date(date);
            rows.extend(day_rows.iter().cloned().map(|mut row| {
                row.schedule_date = schedule_date.clone();
                row
            }));
        }
        date += Duration::days(1);
    }
    rows
}

/// 学期覆盖的周数（按周一对齐）
pub fn week_count(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return 0;
    }
    let (first_monday, _) = crate::utils::dates::week_bounds(start);
    let (last_monday, _) = crate::utils::dates::week_bounds(end);
    ((last_monday - first_monday).num_days() / 7 + 1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dates::parse_date;
    use rand::{SeedableRng, rngs::StdRng};

    fn line(subject_id: i64, sessions_per_week: i32) -> CurriculumSubject {
        CurriculumSubject {
            subject_id,
            sessions_per_week,
        }
    }

    fn teacher(teacher_id: i64, subject_ids: &[i64]) -> TeacherOption {
        TeacherOption {
            teacher_id,
            subject_ids: subject_ids.to_vec(),
        }
    }

    fn input() -> PlannerInput {
        PlannerInput {
            days_per_week: 5,
            periods_per_day: 4,
            classes: vec![
                ClassPlan {
                    class_id: 1,
                    subjects: vec![line(10, 5), line(11, 4)],
                },
                ClassPlan {
                    class_id: 2,
                    subjects: vec![line(10, 5), line(11, 4)],
                },
            ],
            teachers: vec![teacher(100, &[10]), teacher(101, &[11])],
            classroom_ids: vec![500, 501],
            ..Default::default()
        }
    }

    fn assert_no_double_booking(plan: &WeeklyPlan) {
        let mut teachers = HashSet::new();
        let mut rooms = HashSet::new();
        for class in &plan.classes {
            let mut cells = HashSet::new();
            for session in &class.sessions {
                assert!(cells.insert(session.cell), "class double booked");
                assert!(
                    teachers.insert((session.teacher_id, session.cell)),
                    "teacher double booked"
                );
                assert!(
                    rooms.insert((session.classroom_id, session.cell)),
                    "classroom double booked"
                );
            }
            for cell in &class.free_cells {
                assert!(cells.insert(*cell), "free cell overlaps a session");
            }
            assert_eq!(cells.len(), 20);
        }
    }

    #[test]
    fn test_plan_respects_all_three_dimensions() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = plan_week(&input(), &mut rng);

        assert_no_double_booking(&plan);
        assert!(plan.unscheduled.is_empty());
        assert_eq!(plan.placed_sessions(), 18);
        assert_eq!(plan.free_slots(), 40 - 18);
    }

    #[test]
    fn test_same_seed_gives_same_plan() {
        let first = plan_week(&input(), &mut StdRng::seed_from_u64(42));
        let second = plan_week(&input(), &mut StdRng::seed_from_u64(42));
        for (a, b) in first.classes.iter().zip(&second.classes) {
            assert_eq!(a.sessions, b.sessions);
        }
    }

    #[test]
    fn test_qualified_teacher_is_preferred() {
        let plan = plan_week(&input(), &mut StdRng::seed_from_u64(3));
        for class in &plan.classes {
            for session in &class.sessions {
                let expected = if session.subject_id == 10 { 100 } else { 101 };
                assert_eq!(session.teacher_id, expected);
            }
        }
    }

    #[test]
    fn test_falls_back_to_any_teacher() {
        let mut input = input();
        input.classes = vec![ClassPlan {
            class_id: 1,
            subjects: vec![line(99, 2)],
        }];
        let plan = plan_week(&input, &mut StdRng::seed_from_u64(1));
        assert_eq!(plan.placed_sessions(), 2);
        assert!(plan.unscheduled.is_empty());
    }

    #[test]
    fn test_missing_resources_are_reported() {
        let mut no_teachers = input();
        no_teachers.teachers.clear();
        let plan = plan_week(&no_teachers, &mut StdRng::seed_from_u64(1));
        assert_eq!(plan.placed_sessions(), 0);
        assert_eq!(plan.unscheduled.len(), 4);
        assert!(plan.unscheduled.iter().all(|u| u.reason == "no teacher available"));
        assert_eq!(plan.free_slots(), 40);

        let mut no_rooms = input();
        no_rooms.classroom_ids.clear();
        let plan = plan_week(&no_rooms, &mut StdRng::seed_from_u64(1));
        assert!(plan.unscheduled.iter().all(|u| u.reason == "no classroom available"));
    }

    #[test]
    fn test_overloaded_teacher_leaves_sessions_unscheduled() {
        // 一位教师、一间教室，两个班各要 15 节，网格只有 20 格
        let input = PlannerInput {
            days_per_week: 5,
            periods_per_day: 4,
            classes: vec![
                ClassPlan {
                    class_id: 1,
                    subjects: vec![line(10, 15)],
                },
                ClassPlan {
                    class_id: 2,
                    subjects: vec![line(10, 15)],
                },
            ],
            teachers: vec![teacher(100, &[10])],
            classroom_ids: vec![500],
            ..Default::default()
        };
        let plan = plan_week(&input, &mut StdRng::seed_from_u64(9));

        assert_no_double_booking(&plan);
        assert_eq!(plan.placed_sessions(), 20);
        let missing: i32 = plan.unscheduled.iter().map(|u| u.missing_sessions).sum();
        assert_eq!(missing, 10);
    }

    #[test]
    fn test_existing_bookings_are_avoided() {
        let mut input = input();
        input.classes.truncate(1);
        let blocked = Cell {
            weekday: 1,
            period: 1,
        };
        input.busy_teachers.insert((100, blocked));
        input.busy_teachers.insert((101, blocked));

        let plan = plan_week(&input, &mut StdRng::seed_from_u64(5));
        assert!(plan.classes[0].sessions.iter().all(|s| s.cell != blocked));
        assert!(plan.classes[0].free_cells.contains(&blocked));
    }

    #[test]
    fn test_expansion_covers_teaching_days_only() {
        let plan = plan_week(&input(), &mut StdRng::seed_from_u64(11));
        // 2026-09-07 周一 至 2026-09-20 周日，共两周
        let start = parse_date("2026-09-07").unwrap();
        let end = parse_date("2026-09-20").unwrap();
        let rows = expand_over_semester(&plan, 1, start, end, 5);

        assert_eq!(rows.len(), 2 * 2 * 20);
        assert!(rows.iter().all(|r| (1..=5).contains(&r.weekday)));
        assert_eq!(rows.iter().filter(|r| !r.is_free_time).count(), 2 * 18);
        assert!(
            rows.iter()
                .filter(|r| r.is_free_time)
                .all(|r| r.subject_id.is_none() && r.teacher_id.is_none())
        );
        assert_eq!(week_count(start, end), 2);
    }

    #[test]
    fn test_week_count_partial_weeks() {
        let thursday = parse_date("2026-09-10").unwrap();
        let next_tuesday = parse_date("2026-09-15").unwrap();
        assert_eq!(week_count(thursday, next_tuesday), 2);
        assert_eq!(week_count(next_tuesday, thursday), 0);
    }
}
