// ==========================================
// 额外勤务排班系统 - 指派校验器 (Assignment Validator)
// ==========================================
// 职责: 任何岗位变更落入排班数据前的唯一闸口
// 红线: 纯函数 (当前状态, 请求) -> (新状态 | 拒绝), 无 I/O, 无日志
// 红线: 拒绝时返回的错误即全部输出,输入状态不被触碰
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::schedule::CombinedSchedules;
use crate::domain::types::Operation;
use crate::engine::cap::CapAccountant;
use crate::engine::error::{AssignError, AssignResult};

// ==========================================
// AssignRequest - 单次岗位变更请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub operation: Operation,    // 目标勤务
    pub day: u32,                // 目标日 (1..=当月天数)
    pub slot_index: usize,       // 岗位序号 (0..勤务岗位数)
    pub officer: Option<String>, // Some = 指派该警员; None = 清空岗位
}

// ==========================================
// AssignmentValidator - 纯函数工具类
// ==========================================
pub struct AssignmentValidator;

impl AssignmentValidator {
    /// 校验并执行单次岗位变更
    ///
    /// # 规则 (按序检查,先触发者先拒绝)
    /// 1. 日期超出当月范围 -> InvalidDay
    /// 2. 岗位序号超出勤务岗位数 -> InvalidSlotIndex
    /// 3. officer 为 None (清空): 必定成功; 清空从未创建的日为无操作成功
    /// 4. 警员不在名册 -> UnknownOfficer
    /// 5. 警员已占用同日同勤务的另一岗位 -> DuplicateInDay
    ///    (重复指派其已占用的同一岗位为幂等成功,不消耗名额)
    /// 6. 以 exclude = (勤务, 日) 核算当前占用,达到上限 -> CapExceeded
    /// 7. 全部通过 -> 提交,返回新状态
    ///
    /// # 参数
    /// - state: 当前排班快照 (本勤务工作态 + 另一勤务最近快照)
    /// - known_officers: 名册警员名单 (来自外部协作层)
    /// - cap: 月度名额上限
    /// - request: 变更请求
    ///
    /// # 返回
    /// - Ok(新状态): 携带本次变更的完整快照,输入保持不变
    /// - Err(拒绝原因): 输入状态未发生任何变化
    pub fn try_assign(
        state: &CombinedSchedules,
        known_officers: &[String],
        cap: u32,
        request: &AssignRequest,
    ) -> AssignResult<CombinedSchedules> {
        let month = state.month;
        if !month.contains_day(request.day) {
            return Err(AssignError::InvalidDay {
                day: request.day,
                month: month.to_string(),
                days_in_month: month.days(),
            });
        }

        let slot_count = request.operation.slot_count();
        if request.slot_index >= slot_count {
            return Err(AssignError::InvalidSlotIndex {
                operation: request.operation.to_string(),
                slot_index: request.slot_index,
                slot_count,
            });
        }

        let officer = match &request.officer {
            None => {
                // 清空岗位必定成功; 未创建的日无需生成空条目
                let mut next = state.clone();
                let schedule = next.get_mut(request.operation);
                if schedule.days.contains_key(&request.day) {
                    schedule.day_slots_mut(request.day)[request.slot_index] = None;
                }
                return Ok(next);
            }
            Some(name) => name.as_str(),
        };

        if !known_officers.iter().any(|n| n == officer) {
            return Err(AssignError::UnknownOfficer(officer.to_string()));
        }

        let schedule = state.get(request.operation);
        if let Some(existing_slot) = schedule.officer_slot_in_day(request.day, officer) {
            if existing_slot != request.slot_index {
                return Err(AssignError::DuplicateInDay {
                    officer: officer.to_string(),
                    day: request.day,
                    existing_slot,
                });
            }
            // 幂等: 重复指派已占用的同一岗位
            return Ok(state.clone());
        }

        // 原位编辑: 正在改的 (勤务, 日) 不计入当前占用
        let count = CapAccountant::count_assignments(
            state,
            officer,
            Some((request.operation, request.day)),
        );
        if count >= cap {
            return Err(AssignError::CapExceeded {
                officer: officer.to_string(),
                count,
                cap,
            });
        }

        let mut next = state.clone();
        next.get_mut(request.operation).day_slots_mut(request.day)[request.slot_index] =
            Some(officer.to_string());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::MonthKey;

    const CAP: u32 = CapAccountant::DEFAULT_MONTHLY_CAP;

    fn roster() -> Vec<String> {
        vec![
            "MUNIZ".to_string(),
            "OLIMAR".to_string(),
            "SILVA".to_string(),
        ]
    }

    fn empty_april() -> CombinedSchedules {
        CombinedSchedules::new(MonthKey::new(2025, 4))
    }

    fn assign(operation: Operation, day: u32, slot_index: usize, officer: &str) -> AssignRequest {
        AssignRequest {
            operation,
            day,
            slot_index,
            officer: Some(officer.to_string()),
        }
    }

    fn clear(operation: Operation, day: u32, slot_index: usize) -> AssignRequest {
        AssignRequest {
            operation,
            day,
            slot_index,
            officer: None,
        }
    }

    // ==========================================
    // 测试 1: 日期与岗位序号校验
    // ==========================================

    #[test]
    fn test_reject_day_zero() {
        let state = empty_april();
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 0, 0, "MUNIZ"),
        );
        assert!(matches!(result, Err(AssignError::InvalidDay { day: 0, .. })));
    }

    #[test]
    fn test_reject_day_beyond_month_end() {
        // 2025 年 4 月只有 30 天
        let state = empty_april();
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 31, 0, "MUNIZ"),
        );
        assert!(matches!(
            result,
            Err(AssignError::InvalidDay {
                day: 31,
                days_in_month: 30,
                ..
            })
        ));
    }

    #[test]
    fn test_leap_february_day_29_is_valid() {
        let state = CombinedSchedules::new(MonthKey::new(2024, 2));
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 29, 0, "MUNIZ"),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_non_leap_february_day_29_rejected() {
        let state = CombinedSchedules::new(MonthKey::new(2025, 2));
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 29, 0, "MUNIZ"),
        );
        assert!(matches!(result, Err(AssignError::InvalidDay { .. })));
    }

    #[test]
    fn test_reject_slot_index_out_of_range() {
        let state = empty_april();

        // PMF 有 3 个岗位, 序号 3 越界
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 5, 3, "MUNIZ"),
        );
        assert!(matches!(
            result,
            Err(AssignError::InvalidSlotIndex { slot_index: 3, slot_count: 3, .. })
        ));

        // TRANSITO 有 2 个岗位, 序号 2 越界
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Transito, 5, 2, "MUNIZ"),
        );
        assert!(matches!(
            result,
            Err(AssignError::InvalidSlotIndex { slot_index: 2, slot_count: 2, .. })
        ));
    }

    // ==========================================
    // 测试 2: 清空岗位
    // ==========================================

    #[test]
    fn test_clear_assigned_slot() {
        let mut state = empty_april();
        state.pmf.day_slots_mut(5)[1] = Some("MUNIZ".to_string());

        let next =
            AssignmentValidator::try_assign(&state, &roster(), CAP, &clear(Operation::Pmf, 5, 1))
                .unwrap();
        assert_eq!(next.pmf.slot(5, 1), None);
        // 日条目保留,仅岗位置空
        assert!(next.pmf.days.contains_key(&5));
    }

    #[test]
    fn test_clear_unassigned_slot_is_noop_success() {
        let state = empty_april();

        let next =
            AssignmentValidator::try_assign(&state, &roster(), CAP, &clear(Operation::Pmf, 5, 0))
                .unwrap();
        // 从未创建的日不会因清空而生成条目
        assert_eq!(next, state);
    }

    #[test]
    fn test_clear_ignores_roster_and_cap() {
        // 名册为空、上限为 0 也不妨碍清空
        let mut state = empty_april();
        state.transito.day_slots_mut(8)[0] = Some("MUNIZ".to_string());

        let next =
            AssignmentValidator::try_assign(&state, &[], 0, &clear(Operation::Transito, 8, 0))
                .unwrap();
        assert_eq!(next.transito.slot(8, 0), None);
    }

    // ==========================================
    // 测试 3: 名册校验
    // ==========================================

    #[test]
    fn test_reject_unknown_officer() {
        let state = empty_april();
        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 5, 0, "DESCONHECIDO"),
        );
        assert_eq!(
            result,
            Err(AssignError::UnknownOfficer("DESCONHECIDO".to_string()))
        );
    }

    // ==========================================
    // 测试 4: 同日重复
    // ==========================================

    #[test]
    fn test_reject_duplicate_in_same_day_different_slot() {
        let mut state = empty_april();
        state.pmf.day_slots_mut(5)[0] = Some("MUNIZ".to_string());

        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 5, 2, "MUNIZ"),
        );
        assert_eq!(
            result,
            Err(AssignError::DuplicateInDay {
                officer: "MUNIZ".to_string(),
                day: 5,
                existing_slot: 0,
            })
        );
    }

    #[test]
    fn test_reassign_same_slot_is_idempotent() {
        let mut state = empty_april();
        state.pmf.day_slots_mut(5)[0] = Some("MUNIZ".to_string());

        let next = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 5, 0, "MUNIZ"),
        )
        .unwrap();
        assert_eq!(next, state);
        assert_eq!(CapAccountant::count_assignments(&next, "MUNIZ", None), 1);
    }

    #[test]
    fn test_same_day_other_operation_is_allowed_by_validator() {
        // 跨勤务同日重复不在写入时拦截,由冲突检测负责呈现
        let mut state = empty_april();
        state.pmf.day_slots_mut(5)[0] = Some("MUNIZ".to_string());

        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Transito, 5, 0, "MUNIZ"),
        );
        assert!(result.is_ok());
    }

    // ==========================================
    // 测试 5: 月度名额
    // ==========================================

    fn fill_twelve(state: &mut CombinedSchedules, officer: &str) {
        // PMF 1..=10 日 + TRANSITO 11..=12 日, 共 12 个岗位
        for day in 1..=10 {
            state.pmf.day_slots_mut(day)[0] = Some(officer.to_string());
        }
        for day in 11..=12 {
            state.transito.day_slots_mut(day)[0] = Some(officer.to_string());
        }
    }

    #[test]
    fn test_thirteenth_assignment_rejected() {
        let mut state = empty_april();
        fill_twelve(&mut state, "MUNIZ");

        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 15, 0, "MUNIZ"),
        );
        assert_eq!(
            result,
            Err(AssignError::CapExceeded {
                officer: "MUNIZ".to_string(),
                count: 12,
                cap: CAP,
            })
        );
    }

    #[test]
    fn test_twelfth_assignment_accepted() {
        let mut state = empty_april();
        // 11 个占用,第 12 个应当放行
        for day in 1..=11 {
            state.pmf.day_slots_mut(day)[0] = Some("MUNIZ".to_string());
        }

        let next = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Transito, 12, 0, "MUNIZ"),
        )
        .unwrap();
        assert_eq!(CapAccountant::count_assignments(&next, "MUNIZ", None), 12);
    }

    #[test]
    fn test_moving_within_full_day_does_not_trip_cap() {
        // 名额已满,但把警员移到已占用日的另一岗位属于原位编辑:
        // 该 (勤务, 日) 被排除后占用为 11, 先清空原岗位再指派新岗位可成功
        let mut state = empty_april();
        fill_twelve(&mut state, "MUNIZ");

        let cleared =
            AssignmentValidator::try_assign(&state, &roster(), CAP, &clear(Operation::Pmf, 10, 0))
                .unwrap();
        let next = AssignmentValidator::try_assign(
            &cleared,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 10, 2, "MUNIZ"),
        )
        .unwrap();
        assert_eq!(next.pmf.slot(10, 2), Some("MUNIZ"));
        assert_eq!(CapAccountant::count_assignments(&next, "MUNIZ", None), 12);
    }

    #[test]
    fn test_custom_cap_is_honored() {
        let mut state = empty_april();
        state.pmf.day_slots_mut(1)[0] = Some("MUNIZ".to_string());
        state.pmf.day_slots_mut(2)[0] = Some("MUNIZ".to_string());

        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            2,
            &assign(Operation::Pmf, 3, 0, "MUNIZ"),
        );
        assert!(matches!(
            result,
            Err(AssignError::CapExceeded { count: 2, cap: 2, .. })
        ));
    }

    // ==========================================
    // 测试 6: 拒绝不改变输入状态
    // ==========================================

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut state = empty_april();
        fill_twelve(&mut state, "MUNIZ");
        let before = state.clone();

        let result = AssignmentValidator::try_assign(
            &state,
            &roster(),
            CAP,
            &assign(Operation::Pmf, 15, 0, "MUNIZ"),
        );
        assert!(result.is_err());
        assert_eq!(state, before);
        // 目标岗位保持空置
        assert_eq!(state.pmf.slot(15, 0), None);
    }
}
