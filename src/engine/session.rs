// ==========================================
// 额外勤务排班系统 - 编辑会话 (Edit Session)
// ==========================================
// 职责: 单写者编辑模型的载体
// - 每个会话持有一个勤务的内存工作副本
// - 另一勤务只保留最近一次取回的快照 (用于名额核算)
// - 落库由外部协作层完成,后写覆盖先写,核心不设锁
// ==========================================
// 红线: 会话内所有变更必须经过指派校验器
// ==========================================

use crate::domain::schedule::{CombinedSchedules, MonthKey, MonthlySchedule};
use crate::domain::types::Operation;
use crate::engine::assign::{AssignRequest, AssignmentValidator};
use crate::engine::cap::CapAccountant;
use crate::engine::error::AssignResult;

// ==========================================
// EditSession - 单勤务编辑会话
// ==========================================
#[derive(Debug, Clone)]
pub struct EditSession {
    session_id: String,        // 会话ID (UUID)
    operation: Operation,      // 正在编辑的勤务
    state: CombinedSchedules,  // 工作副本 + 另一勤务快照
    known_officers: Vec<String>, // 名册快照
    cap: u32,                  // 月度名额上限
    dirty: bool,               // 自创建以来是否发生过实际变更
}

impl EditSession {
    /// 打开编辑会话
    ///
    /// # 参数
    /// - operation: 要编辑的勤务
    /// - state: 同月两勤务快照 (编辑基线)
    /// - known_officers: 名册警员名单
    /// - cap: 月度名额上限
    pub fn new(
        operation: Operation,
        state: CombinedSchedules,
        known_officers: Vec<String>,
        cap: u32,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            operation,
            state,
            known_officers,
            cap,
            dirty: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn month(&self) -> MonthKey {
        self.state.month
    }

    /// 自创建以来是否发生过实际变更 (无操作成功不计)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 当前工作态 (本勤务工作副本 + 另一勤务快照)
    pub fn combined(&self) -> &CombinedSchedules {
        &self.state
    }

    /// 本勤务的工作副本
    pub fn schedule(&self) -> &MonthlySchedule {
        self.state.get(self.operation)
    }

    /// 会话内单次岗位变更 (经指派校验器)
    ///
    /// 成功时工作副本前进到新状态; 拒绝时工作副本保持原样。
    pub fn try_assign(
        &mut self,
        day: u32,
        slot_index: usize,
        officer: Option<String>,
    ) -> AssignResult<()> {
        let request = AssignRequest {
            operation: self.operation,
            day,
            slot_index,
            officer,
        };
        let next =
            AssignmentValidator::try_assign(&self.state, &self.known_officers, self.cap, &request)?;
        if next != self.state {
            self.dirty = true;
        }
        self.state = next;
        Ok(())
    }

    /// 当前工作态下某警员的月度占用
    pub fn count_for(&self, officer: &str) -> u32 {
        CapAccountant::count_assignments(&self.state, officer, None)
    }

    /// 当前工作态下某警员的剩余名额
    pub fn remaining_for(&self, officer: &str) -> u32 {
        CapAccountant::remaining(&self.state, officer, self.cap)
    }

    /// 刷新另一勤务的快照 (外部重新取回后调用)
    ///
    /// 传入本勤务的排班会被忽略: 工作副本只能经 try_assign 变更。
    pub fn refresh_other(&mut self, schedule: MonthlySchedule) {
        if schedule.operation != self.operation {
            self.state.replace(schedule);
        }
    }

    /// 结束会话,交出本勤务工作副本供落库
    pub fn into_schedule(self) -> MonthlySchedule {
        let operation = self.operation;
        match operation {
            Operation::Pmf => self.state.pmf,
            Operation::Transito => self.state.transito,
        }
    }
}
