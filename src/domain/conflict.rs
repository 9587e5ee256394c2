// ==========================================
// 额外勤务排班系统 - 冲突记录领域模型
// ==========================================
// 冲突为派生数据: 每次检测重新生成,从不落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::types::{Operation, Team};

// ==========================================
// ConflictKind - 冲突类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    OrdinaryDutyOverlap,       // 额外勤务与当日常务值班重叠
    DuplicatedAcrossOperations, // 同日同时出现在两个勤务中
}

impl ConflictKind {
    /// 转换为数据库/报表字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ConflictKind::OrdinaryDutyOverlap => "ORDINARY_DUTY_OVERLAP",
            ConflictKind::DuplicatedAcrossOperations => "DUPLICATED_ACROSS_OPERATIONS",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Conflict - 冲突记录
// ==========================================
// 字段约定:
// - OrdinaryDutyOverlap: team = 当日值班队, operation = 警员所在勤务
// - DuplicatedAcrossOperations: team/operation 均为 None (跨勤务,不归属单一勤务)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub day: u32,                      // 冲突日
    pub officer: String,               // 警员展示名
    pub kind: ConflictKind,            // 冲突类别
    pub team: Option<Team>,            // 当日值班队
    pub operation: Option<Operation>,  // 警员所在勤务
}

impl Conflict {
    /// 常务值班重叠冲突
    pub fn overlap(day: u32, officer: impl Into<String>, team: Team, operation: Operation) -> Self {
        Self {
            day,
            officer: officer.into(),
            kind: ConflictKind::OrdinaryDutyOverlap,
            team: Some(team),
            operation: Some(operation),
        }
    }

    /// 跨勤务同日重复冲突
    pub fn duplicated(day: u32, officer: impl Into<String>) -> Self {
        Self {
            day,
            officer: officer.into(),
            kind: ConflictKind::DuplicatedAcrossOperations,
            team: None,
            operation: None,
        }
    }
}
