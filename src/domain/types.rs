// ==========================================
// 额外勤务排班系统 - 领域类型定义
// ==========================================
// 两个固定的额外勤务 (Operation) 与三个常务轮换队 (Team)
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 额外勤务 (Operation)
// ==========================================
// 红线: 勤务集合固定为两个,每个勤务每日岗位数固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Pmf,      // PMF 勤务,每日 3 个岗位
    Transito, // TRANSITO 勤务,每日 2 个岗位
}

impl Operation {
    /// 全部勤务,按报告输出顺序 (勤务名升序: PMF < TRANSITO)
    pub const ALL: [Operation; 2] = [Operation::Pmf, Operation::Transito];

    /// 每日岗位数
    pub fn slot_count(&self) -> usize {
        match self {
            Operation::Pmf => 3,
            Operation::Transito => 2,
        }
    }

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PMF" => Some(Operation::Pmf),
            "TRANSITO" => Some(Operation::Transito),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Operation::Pmf => "PMF",
            Operation::Transito => "TRANSITO",
        }
    }

    /// 同月另一个勤务
    pub fn other(&self) -> Operation {
        match self {
            Operation::Pmf => Operation::Transito,
            Operation::Transito => Operation::Pmf,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 常务轮换队 (Team)
// ==========================================
// 只有三个队参与冲突检查; 行政人员无队属,不参与冲突检查
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    TeamA,
    TeamB,
    TeamC,
}

impl Team {
    /// 全部轮换队,按名称升序
    pub const ALL: [Team; 3] = [Team::TeamA, Team::TeamB, Team::TeamC];

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TEAM_A" => Some(Team::TeamA),
            "TEAM_B" => Some(Team::TeamB),
            "TEAM_C" => Some(Team::TeamC),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Team::TeamA => "TEAM_A",
            Team::TeamB => "TEAM_B",
            Team::TeamC => "TEAM_C",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
