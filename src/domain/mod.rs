// ==========================================
// 额外勤务排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod conflict;
pub mod officer;
pub mod roster;
pub mod schedule;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use conflict::{Conflict, ConflictKind};
pub use officer::Officer;
pub use roster::OrdinaryRoster;
pub use schedule::{CombinedSchedules, MonthKey, MonthlySchedule};
pub use types::{Operation, Team};
