// ==========================================
// 额外勤务排班系统 - 冲突检测器 (Conflict Detector)
// ==========================================
// 职责: 批量扫描,找出额外勤务与常务值班的同日重叠,
//       以及同日同时出现在两个勤务中的警员
// 红线: 只读纯函数,输出确定有序,可随时重跑; 只报告,不修正
// ==========================================

use crate::domain::conflict::Conflict;
use crate::domain::roster::OrdinaryRoster;
use crate::domain::schedule::{CombinedSchedules, MonthKey};
use crate::domain::types::Operation;

// ==========================================
// ConflictDetector - 纯函数工具类
// ==========================================
pub struct ConflictDetector;

impl ConflictDetector {
    /// 扫描整月,生成有序冲突清单
    ///
    /// # 规则
    /// - 逐日 1..=当月天数: 查当日常务值班队; 对每个勤务的每个占岗警员,
    ///   若其在值班队名单中,生成一条常务值班重叠冲突
    /// - 与常务值班无关地: 警员同日出现在两个勤务中时,
    ///   额外生成一条跨勤务重复冲突 (每警员每日一条)
    /// - 同一警员若两个勤务的占岗都与值班重叠,产生两条重叠冲突
    /// - 轮换表或排班缺某日数据,该日视为无冲突,不报错
    ///
    /// # 排序 (确定性输出)
    /// 日升序 -> 勤务名升序 (PMF < TRANSITO) -> 同日跨勤务重复最后,
    /// 重复记录按警员名升序
    ///
    /// # 参数
    /// - combined: 同月两勤务排班快照
    /// - roster: 当月常务值班轮换表
    /// - month: 排班周期 (决定扫描的日范围)
    pub fn detect(
        combined: &CombinedSchedules,
        roster: &OrdinaryRoster,
        month: MonthKey,
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        for day in 1..=month.days() {
            // ===== 常务值班重叠 =====
            if let Some(duty_team) = roster.team_on_duty(day) {
                for operation in Operation::ALL {
                    let schedule = combined.get(operation);
                    // 同勤务同日同警员只报一次 (容忍外部装载的脏数据)
                    let mut reported: Vec<&str> = Vec::new();
                    for officer in schedule.assigned_in_day(day) {
                        if reported.contains(&officer) {
                            continue;
                        }
                        reported.push(officer);
                        if roster.is_member(duty_team, officer) {
                            conflicts.push(Conflict::overlap(day, officer, duty_team, operation));
                        }
                    }
                }
            }

            // ===== 跨勤务同日重复 (与常务值班无关) =====
            let transito_names = combined.transito.assigned_in_day(day);
            let mut duplicated: Vec<&str> = combined
                .pmf
                .assigned_in_day(day)
                .into_iter()
                .filter(|name| transito_names.contains(name))
                .collect();
            duplicated.sort_unstable();
            duplicated.dedup();
            for officer in duplicated {
                conflicts.push(Conflict::duplicated(day, officer));
            }
        }

        conflicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conflict::ConflictKind;
    use crate::domain::types::Team;

    fn april() -> MonthKey {
        MonthKey::new(2025, 4)
    }

    /// TEAM_B 在 4..=9 日值班, OLIMAR 为 TEAM_B 成员
    fn roster_with_team_b_on_duty() -> OrdinaryRoster {
        let mut roster = OrdinaryRoster::new(april());
        for day in 4..=9 {
            roster.set_duty(day, Team::TeamB);
        }
        roster.set_members(
            Team::TeamB,
            vec!["OLIMAR".to_string(), "BARROS".to_string()],
        );
        roster.set_members(Team::TeamA, vec!["MUNIZ".to_string()]);
        roster
    }

    // ==========================================
    // 测试 1: 常务值班重叠
    // ==========================================

    #[test]
    fn test_olimar_on_duty_day_yields_exactly_one_conflict() {
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        combined.pmf.day_slots_mut(7)[0] = Some("OLIMAR".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0],
            Conflict::overlap(7, "OLIMAR", Team::TeamB, Operation::Pmf)
        );
    }

    #[test]
    fn test_assignment_outside_duty_window_is_clean() {
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        // 第 10 日 TEAM_B 不值班
        combined.pmf.day_slots_mut(10)[0] = Some("OLIMAR".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_non_member_on_duty_day_is_clean() {
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        // MUNIZ 属 TEAM_A, 第 7 日值班队是 TEAM_B
        combined.pmf.day_slots_mut(7)[0] = Some("MUNIZ".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_administrative_officer_never_conflicts() {
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        // 行政人员不在任何队名单中
        combined.pmf.day_slots_mut(7)[0] = Some("ADMIN SOUZA".to_string());
        combined.transito.day_slots_mut(7)[0] = Some("ADMIN SOUZA".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        // 同日双勤务仍构成跨勤务重复,但不构成值班重叠
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::DuplicatedAcrossOperations);
    }

    // ==========================================
    // 测试 2: 跨勤务同日重复
    // ==========================================

    #[test]
    fn test_both_operations_on_duty_day_yield_two_overlaps_and_one_duplicate() {
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        combined.pmf.day_slots_mut(7)[1] = Some("OLIMAR".to_string());
        combined.transito.day_slots_mut(7)[0] = Some("OLIMAR".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert_eq!(conflicts.len(), 3);
        assert_eq!(
            conflicts[0],
            Conflict::overlap(7, "OLIMAR", Team::TeamB, Operation::Pmf)
        );
        assert_eq!(
            conflicts[1],
            Conflict::overlap(7, "OLIMAR", Team::TeamB, Operation::Transito)
        );
        assert_eq!(conflicts[2], Conflict::duplicated(7, "OLIMAR"));
    }

    #[test]
    fn test_duplicate_detected_without_any_roster_data() {
        // 轮换表为空: 值班重叠无从谈起,跨勤务重复照常检出
        let roster = OrdinaryRoster::new(april());
        let mut combined = CombinedSchedules::new(april());
        combined.pmf.day_slots_mut(12)[2] = Some("SILVA".to_string());
        combined.transito.day_slots_mut(12)[1] = Some("SILVA".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert_eq!(conflicts, vec![Conflict::duplicated(12, "SILVA")]);
    }

    #[test]
    fn test_duplicates_sorted_by_officer_name() {
        let roster = OrdinaryRoster::new(april());
        let mut combined = CombinedSchedules::new(april());
        combined.pmf.day_slots_mut(3)[0] = Some("ZILDA".to_string());
        combined.pmf.day_slots_mut(3)[1] = Some("ABREU".to_string());
        combined.transito.day_slots_mut(3)[0] = Some("ZILDA".to_string());
        combined.transito.day_slots_mut(3)[1] = Some("ABREU".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].officer, "ABREU");
        assert_eq!(conflicts[1].officer, "ZILDA");
    }

    // ==========================================
    // 测试 3: 排序与确定性
    // ==========================================

    #[test]
    fn test_output_ordered_by_day_then_operation() {
        let mut roster = OrdinaryRoster::new(april());
        roster.set_duty(2, Team::TeamA);
        roster.set_duty(5, Team::TeamA);
        roster.set_members(Team::TeamA, vec!["MUNIZ".to_string(), "SILVA".to_string()]);

        let mut combined = CombinedSchedules::new(april());
        // 故意乱序写入
        combined.transito.day_slots_mut(5)[0] = Some("MUNIZ".to_string());
        combined.pmf.day_slots_mut(5)[0] = Some("SILVA".to_string());
        combined.transito.day_slots_mut(2)[0] = Some("MUNIZ".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        let order: Vec<(u32, Option<Operation>)> =
            conflicts.iter().map(|c| (c.day, c.operation)).collect();
        assert_eq!(
            order,
            vec![
                (2, Some(Operation::Transito)),
                (5, Some(Operation::Pmf)),
                (5, Some(Operation::Transito)),
            ]
        );
    }

    #[test]
    fn test_detection_is_deterministic() {
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        combined.pmf.day_slots_mut(4)[0] = Some("OLIMAR".to_string());
        combined.pmf.day_slots_mut(7)[1] = Some("BARROS".to_string());
        combined.transito.day_slots_mut(7)[0] = Some("BARROS".to_string());

        let first = ConflictDetector::detect(&combined, &roster, april());
        let second = ConflictDetector::detect(&combined, &roster, april());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_inputs_produce_empty_report() {
        let conflicts = ConflictDetector::detect(
            &CombinedSchedules::new(april()),
            &OrdinaryRoster::new(april()),
            april(),
        );
        assert!(conflicts.is_empty());
    }

    // ==========================================
    // 测试 4: 脏数据容忍
    // ==========================================

    #[test]
    fn test_illegal_double_slot_reported_once() {
        // 外部装载的数据可能违反同日同勤务唯一性; 检测器每勤务每日只报一次
        let roster = roster_with_team_b_on_duty();
        let mut combined = CombinedSchedules::new(april());
        combined.pmf.day_slots_mut(7)[0] = Some("OLIMAR".to_string());
        combined.pmf.day_slots_mut(7)[2] = Some("OLIMAR".to_string());

        let conflicts = ConflictDetector::detect(&combined, &roster, april());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::OrdinaryDutyOverlap);
    }
}
