// ==========================================
// 额外勤务排班系统 - 引擎层
// ==========================================
// 职责: 实现排班业务规则 (名额核算、指派校验、冲突检测)
// 红线: Engine 不拼 SQL, 不做 I/O, 不记业务日志;
//       所有拒绝必须携带可呈现的原因
// ==========================================

pub mod assign;
pub mod cap;
pub mod conflict;
pub mod error;
pub mod events;
pub mod session;

// 重导出核心引擎
pub use assign::{AssignRequest, AssignmentValidator};
pub use cap::CapAccountant;
pub use conflict::ConflictDetector;
pub use error::{AssignError, AssignResult};
pub use events::{
    NoOpEventPublisher, OptionalEventPublisher, RosterEvent, RosterEventPublisher,
    RosterEventType,
};
pub use session::EditSession;
