// ==========================================
// 额外勤务排班系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 所有拒绝均为局部可恢复,被拒绝的变更不落入排班数据
// ==========================================

use thiserror::Error;

/// 指派校验错误类型
///
/// 每个变体对应一条校验规则; 任何一条触发都使本次变更被整体拒绝,
/// 排班数据保持原样。上层负责把拒绝原因呈现给操作员,引擎不记日志、不重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("警员 {officer} 在第 {day} 日已占用第 {existing_slot} 号岗位,同日同勤务不可重复指派")]
    DuplicateInDay {
        officer: String,
        day: u32,
        existing_slot: usize,
    },

    #[error("警员 {officer} 本月名额已满 ({count}/{cap}),无法继续指派")]
    CapExceeded {
        officer: String,
        count: u32,
        cap: u32,
    },

    #[error("未知警员: {0}")]
    UnknownOfficer(String),

    #[error("无效日期: 第 {day} 日不在 {month} 的有效范围 (1..={days_in_month}) 内")]
    InvalidDay {
        day: u32,
        month: String,
        days_in_month: u32,
    },

    #[error("无效岗位序号: {slot_index} 超出勤务 {operation} 的岗位范围 (0..{slot_count})")]
    InvalidSlotIndex {
        operation: String,
        slot_index: usize,
        slot_count: usize,
    },
}

/// 引擎层 Result 类型别名
pub type AssignResult<T> = Result<T, AssignError>;
