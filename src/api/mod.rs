// ==========================================
// 额外勤务排班系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供外部协作层 (编辑器/CLI) 调用
// ==========================================

pub mod error;
pub mod report_api;
pub mod roster_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use report_api::{CapUsageEntry, CapUsageReport, ConflictReport, ReportApi};
pub use roster_api::{AssignOutcome, OfficerUsage, RosterApi};
