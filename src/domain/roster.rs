// ==========================================
// 额外勤务排班系统 - 常务值班轮换表领域模型
// ==========================================
// 外部人事系统按月下发的静态数据:
// - 日 -> 当日值班队
// - 队 -> 队内警员名单
// 本核心只读,不创建,不销毁
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::schedule::MonthKey;
use crate::domain::types::Team;

// ==========================================
// OrdinaryRoster - 月度常务值班轮换表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinaryRoster {
    pub month: MonthKey,                     // 所属月份
    pub duty_days: BTreeMap<u32, Team>,      // 日 -> 当日值班队
    pub members: BTreeMap<Team, Vec<String>>, // 队 -> 队内警员名单
}

impl OrdinaryRoster {
    /// 创建空轮换表
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            duty_days: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    /// 某日的常务值班队 (轮换表缺该日时返回 None)
    pub fn team_on_duty(&self, day: u32) -> Option<Team> {
        self.duty_days.get(&day).copied()
    }

    /// 警员是否为某队成员
    pub fn is_member(&self, team: Team, officer: &str) -> bool {
        self.members
            .get(&team)
            .map(|names| names.iter().any(|n| n == officer))
            .unwrap_or(false)
    }

    /// 警员的队属 (不在任何队名单中返回 None, 即行政人员)
    pub fn team_of(&self, officer: &str) -> Option<Team> {
        Team::ALL
            .iter()
            .copied()
            .find(|team| self.is_member(*team, officer))
    }

    /// 设置某日值班队
    pub fn set_duty(&mut self, day: u32, team: Team) {
        self.duty_days.insert(day, team);
    }

    /// 设置某队名单 (整体替换)
    pub fn set_members(&mut self, team: Team, names: Vec<String>) {
        self.members.insert(team, names);
    }

    /// 轮换表是否为空 (无值班日且无名单)
    pub fn is_empty(&self) -> bool {
        self.duty_days.is_empty() && self.members.is_empty()
    }
}
