// ==========================================
// 额外勤务排班系统 - 配置层
// ==========================================
// 职责: 排班系统配置管理（名额上限、扫描间隔、导入开关）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod roster_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use roster_config_trait::RosterConfigReader;
