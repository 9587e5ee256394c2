// ==========================================
// 额外勤务排班系统 - 月度排班领域模型
// ==========================================
// MonthKey: (年, 月) 排班周期标识
// MonthlySchedule: 单勤务的 日 -> 岗位列表 映射 (日条目惰性创建)
// CombinedSchedules: 同月两个勤务的排班快照
// ==========================================
// 红线: 提交路径 (校验器) 是排班数据的唯一合法写入口,
//       其余代码只读; 本文件不做规则校验
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::types::Operation;

// ==========================================
// MonthKey - 排班周期 (年月)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,  // 公历年
    pub month: u32, // 月份 1..=12
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// 月份是否有效 (1..=12 且年份可构成日历日期)
    pub fn is_valid(&self) -> bool {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).is_some()
    }

    /// 本月天数 (闰年按日历计算; 无效月份返回 0)
    pub fn days(&self) -> u32 {
        let first = match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(d) => d,
            None => return 0,
        };
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match next {
            Some(n) => n.signed_duration_since(first).num_days() as u32,
            None => 0,
        }
    }

    /// 日期是否落在本月有效范围内
    pub fn contains_day(&self, day: u32) -> bool {
        day >= 1 && day <= self.days()
    }

    /// 数据库存储键 ("YYYY-MM")
    pub fn to_db_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// MonthlySchedule - 单勤务月度排班
// ==========================================
// 每日为定长岗位列表 (长度 = 勤务岗位数), None = 空岗
// 日条目在首次写入时惰性创建; 整月未排的日不出现在映射中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySchedule {
    pub operation: Operation,                    // 所属勤务
    pub month: MonthKey,                         // 排班周期
    pub days: BTreeMap<u32, Vec<Option<String>>>, // 日 -> 岗位列表 (日升序)
}

impl MonthlySchedule {
    /// 创建空排班
    pub fn new(operation: Operation, month: MonthKey) -> Self {
        Self {
            operation,
            month,
            days: BTreeMap::new(),
        }
    }

    /// 读取某日岗位列表 (未创建的日返回 None)
    pub fn day_slots(&self, day: u32) -> Option<&[Option<String>]> {
        self.days.get(&day).map(|slots| slots.as_slice())
    }

    /// 读取某日某岗位上的警员
    pub fn slot(&self, day: u32, slot_index: usize) -> Option<&str> {
        self.days
            .get(&day)
            .and_then(|slots| slots.get(slot_index))
            .and_then(|slot| slot.as_deref())
    }

    /// 可变访问某日岗位列表,不存在则按勤务岗位数创建空列表
    ///
    /// # 说明
    /// 惰性创建是排班数据的生命周期规则: 从未写入过的日不占存储。
    pub fn day_slots_mut(&mut self, day: u32) -> &mut Vec<Option<String>> {
        let slot_count = self.operation.slot_count();
        self.days
            .entry(day)
            .or_insert_with(|| vec![None; slot_count])
    }

    /// 某警员在某日占用的岗位序号 (未占用返回 None)
    pub fn officer_slot_in_day(&self, day: u32, officer: &str) -> Option<usize> {
        self.days.get(&day).and_then(|slots| {
            slots
                .iter()
                .position(|slot| slot.as_deref() == Some(officer))
        })
    }

    /// 某日占用岗位的警员列表 (按岗位序号顺序,跳过空岗)
    pub fn assigned_in_day(&self, day: u32) -> Vec<&str> {
        self.days
            .get(&day)
            .map(|slots| slots.iter().filter_map(|s| s.as_deref()).collect())
            .unwrap_or_default()
    }

    /// 某警员在整月占用的岗位总数
    pub fn occurrences_of(&self, officer: &str) -> u32 {
        self.days
            .values()
            .flat_map(|slots| slots.iter())
            .filter(|slot| slot.as_deref() == Some(officer))
            .count() as u32
    }

    /// 整月占用岗位总数
    pub fn total_assigned(&self) -> u32 {
        self.days
            .values()
            .flat_map(|slots| slots.iter())
            .filter(|slot| slot.is_some())
            .count() as u32
    }
}

// ==========================================
// CombinedSchedules - 同月两勤务排班快照
// ==========================================
// 名额核算与冲突检测的输入单位: 两个勤务必须放在一起看
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSchedules {
    pub month: MonthKey,
    pub pmf: MonthlySchedule,
    pub transito: MonthlySchedule,
}

impl CombinedSchedules {
    /// 创建同月两勤务的空快照
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            pmf: MonthlySchedule::new(Operation::Pmf, month),
            transito: MonthlySchedule::new(Operation::Transito, month),
        }
    }

    /// 按勤务取排班
    pub fn get(&self, operation: Operation) -> &MonthlySchedule {
        match operation {
            Operation::Pmf => &self.pmf,
            Operation::Transito => &self.transito,
        }
    }

    /// 按勤务取可变排班
    pub fn get_mut(&mut self, operation: Operation) -> &mut MonthlySchedule {
        match operation {
            Operation::Pmf => &mut self.pmf,
            Operation::Transito => &mut self.transito,
        }
    }

    /// 整体替换某勤务的排班 (用于装载外部快照)
    pub fn replace(&mut self, schedule: MonthlySchedule) {
        match schedule.operation {
            Operation::Pmf => self.pmf = schedule,
            Operation::Transito => self.transito = schedule,
        }
    }
}
