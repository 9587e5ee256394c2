// ==========================================
// 额外勤务排班系统 - 名额核算 (Cap Accountant)
// ==========================================
// 职责: 统计警员在一个月内跨两个勤务占用的岗位总数
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::schedule::CombinedSchedules;
use crate::domain::types::Operation;

// ==========================================
// CapAccountant - 纯函数工具类
// ==========================================
pub struct CapAccountant;

impl CapAccountant {
    /// 默认月度名额上限 (可经配置覆盖)
    pub const DEFAULT_MONTHLY_CAP: u32 = 12;

    /// 统计警员本月占用的岗位总数 (跨两个勤务)
    ///
    /// # 规则
    /// - 遍历两个勤务所有已创建的日条目,警员每占一个岗位计 1
    /// - 同一警员跨多日的占用全部累计,单次调用内不重复计数
    /// - `exclude = Some((勤务, 日))` 时跳过该勤务该日的全部岗位,
    ///   用于原位编辑: 正在改的那一日不应计入当前占用
    /// - 缺失数据按零占用处理,本函数不产生错误
    ///
    /// # 参数
    /// - combined: 同月两勤务排班快照
    /// - officer: 警员展示名
    /// - exclude: 要排除的 (勤务, 日),无则为 None
    ///
    /// # 返回
    /// 非负的占用岗位数
    pub fn count_assignments(
        combined: &CombinedSchedules,
        officer: &str,
        exclude: Option<(Operation, u32)>,
    ) -> u32 {
        let mut count: u32 = 0;
        for operation in Operation::ALL {
            let schedule = combined.get(operation);
            for (day, slots) in &schedule.days {
                if let Some((excluded_operation, excluded_day)) = exclude {
                    if operation == excluded_operation && *day == excluded_day {
                        continue;
                    }
                }
                count += slots
                    .iter()
                    .filter(|slot| slot.as_deref() == Some(officer))
                    .count() as u32;
            }
        }
        count
    }

    /// 警员本月剩余名额 (相对给定上限,下限为 0)
    pub fn remaining(combined: &CombinedSchedules, officer: &str, cap: u32) -> u32 {
        cap.saturating_sub(Self::count_assignments(combined, officer, None))
    }
}
