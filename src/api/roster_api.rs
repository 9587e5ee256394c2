// ==========================================
// 额外勤务排班系统 - 排班管理 API
// ==========================================
// 职责: 排班装载、岗位指派、整月落库、编辑会话管理
// 红线: 所有写路径必须过指派校验器; 所有落库必须记操作日志
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::error::{validate_month, validate_officer_name, ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::officer::Officer;
use crate::domain::schedule::{CombinedSchedules, MonthKey, MonthlySchedule};
use crate::domain::types::Operation;
use crate::engine::assign::{AssignRequest, AssignmentValidator};
use crate::engine::cap::CapAccountant;
use crate::engine::events::{
    OptionalEventPublisher, RosterEvent, RosterEventPublisher, RosterEventType,
};
use crate::engine::session::EditSession;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::officer_repo::OfficerRepository;
use crate::repository::schedule_repo::ScheduleRepository;

// ==========================================
// 响应结构
// ==========================================

/// 单次指派结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignOutcome {
    pub operation: String,
    pub month_key: String,
    pub day: u32,
    pub slot_index: usize,
    /// 变更后该岗位的占用者 (清空时为 None)
    pub officer: Option<String>,
    /// 变更后该警员的月度占用 (清空时为 None)
    pub used_after: Option<u32>,
}

/// 警员月度占用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerUsage {
    pub officer: String,
    pub month_key: String,
    pub used: u32,
    pub cap: u32,
    pub remaining: u32,
}

// ==========================================
// RosterApi - 排班管理 API
// ==========================================

/// 排班管理API
///
/// 职责：
/// 1. 排班装载（单勤务、双勤务合并视图）
/// 2. 岗位指派/清空（一次性写路径，经指派校验器）
/// 3. 编辑会话（打开、提交）
/// 4. 名册查询与名额占用查询
pub struct RosterApi {
    schedule_repo: Arc<ScheduleRepository>,
    officer_repo: Arc<OfficerRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config_manager: Arc<ConfigManager>,
    // 事件发布器（依赖倒置：外部协作层可注入刷新通知）
    event_publisher: OptionalEventPublisher,
}

impl RosterApi {
    /// 创建新的RosterApi实例
    pub fn new(
        schedule_repo: Arc<ScheduleRepository>,
        officer_repo: Arc<OfficerRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config_manager: Arc<ConfigManager>,
        event_publisher: Option<Arc<dyn RosterEventPublisher>>,
    ) -> Self {
        let event_publisher = match event_publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p),
            None => OptionalEventPublisher::none(),
        };

        Self {
            schedule_repo,
            officer_repo,
            action_log_repo,
            config_manager,
            event_publisher,
        }
    }

    /// 当前生效的月度名额上限 (配置缺失时回落默认值)
    fn monthly_cap(&self) -> ApiResult<u32> {
        self.config_manager
            .get_monthly_cap()
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))
    }

    // ==========================================
    // 装载
    // ==========================================

    /// 装载单勤务月度排班 (不存在时返回空骨架)
    ///
    /// # 参数
    /// - operation: 勤务
    /// - year/month: 排班周期
    pub fn fetch_schedule(
        &self,
        operation: Operation,
        year: i32,
        month: u32,
    ) -> ApiResult<MonthlySchedule> {
        let key = validate_month(year, month)?;
        let schedule = self.schedule_repo.fetch_or_empty(operation, key)?;
        Ok(schedule)
    }

    /// 装载同月两勤务合并视图 (名额核算与冲突检测的输入)
    pub fn fetch_combined(&self, year: i32, month: u32) -> ApiResult<CombinedSchedules> {
        let key = validate_month(year, month)?;
        let combined = self.schedule_repo.fetch_combined(key)?;
        Ok(combined)
    }

    /// 列出有排班数据的周期
    pub fn list_months(&self) -> ApiResult<Vec<MonthKey>> {
        Ok(self.schedule_repo.list_months()?)
    }

    // ==========================================
    // 名册
    // ==========================================

    /// 警员名册 (按展示顺序)
    pub fn list_officers(&self) -> ApiResult<Vec<Officer>> {
        Ok(self.officer_repo.list_all()?)
    }

    /// 名册警员名单 (指派校验器的已知名单)
    pub fn list_officer_names(&self) -> ApiResult<Vec<String>> {
        Ok(self.officer_repo.list_names()?)
    }

    // ==========================================
    // 写路径
    // ==========================================

    /// 一次性岗位变更: 装载 → 校验 → 落库
    ///
    /// officer 为 Some 表示指派、None 表示清空。
    /// 全部闸口 (无效坐标/名册外/同日重复/名额超限) 在落库前判定,
    /// 任一拒绝则数据库保持原样。
    ///
    /// # 参数
    /// - operation: 勤务
    /// - year/month/day/slot_index: 岗位坐标
    /// - officer: 目标警员 (None = 清空)
    /// - operator: 操作人
    pub fn try_assign(
        &self,
        operation: Operation,
        year: i32,
        month: u32,
        day: u32,
        slot_index: usize,
        officer: Option<String>,
        operator: &str,
    ) -> ApiResult<AssignOutcome> {
        let key = validate_month(year, month)?;
        let officer = match officer {
            Some(name) => Some(validate_officer_name(&name)?),
            None => None,
        };

        tracing::info!(
            "岗位变更请求: operation={}, month={}, day={}, slot={}, officer={:?}",
            operation,
            key,
            day,
            slot_index,
            officer
        );

        let combined = self.schedule_repo.fetch_combined(key)?;
        let known_officers = self.officer_repo.list_names()?;
        let cap = self.monthly_cap()?;

        let request = AssignRequest {
            operation,
            day,
            slot_index,
            officer: officer.clone(),
        };
        let next = AssignmentValidator::try_assign(&combined, &known_officers, cap, &request)?;

        let used_after = officer
            .as_ref()
            .map(|name| CapAccountant::count_assignments(&next, name, None));

        // 无操作成功 (清空空岗/重复指派同岗) 不落库、不记日志
        if next != combined {
            // 校验通过,只落变更勤务
            self.schedule_repo.upsert_schedule(next.get(operation))?;

            // 操作日志 (尽力而为)
            let action_type = if officer.is_some() {
                ActionType::Assign
            } else {
                ActionType::Clear
            };
            let mut log = ActionLog::new(action_type, operator)
                .with_location(operation.to_db_str(), &key.to_db_key())
                .with_slot(day, slot_index as u32);
            if let Some(name) = &officer {
                log = log.with_officer(name.clone());
            }
            if let Err(e) = self.action_log_repo.insert(&log) {
                tracing::warn!("记录操作日志失败: {}", e);
            }

            // 刷新事件 (尽力而为)
            let event = RosterEvent::slot_scope(
                key.to_db_key(),
                RosterEventType::SlotChanged,
                Some("roster_api".to_string()),
                operation.to_db_str().to_string(),
                day,
            );
            if let Err(e) = self.event_publisher.publish(event) {
                tracing::warn!("发布刷新事件失败: {}", e);
            }
        }

        Ok(AssignOutcome {
            operation: operation.to_db_str().to_string(),
            month_key: key.to_db_key(),
            day,
            slot_index,
            officer,
            used_after,
        })
    }

    /// 整月排班落库 (外部编辑器装载-编辑-保存流程的保存步)
    ///
    /// 落库语义为整月替换,后写覆盖先写。
    pub fn persist_schedule(
        &self,
        schedule: &MonthlySchedule,
        operator: &str,
    ) -> ApiResult<()> {
        let key = schedule.month;
        if !key.is_valid() {
            return Err(ApiError::InvalidInput(format!("无效月份: {}", key)));
        }

        self.schedule_repo.upsert_schedule(schedule)?;
        tracing::info!(
            "整月排班落库: operation={}, month={}, assigned={}",
            schedule.operation,
            key,
            schedule.total_assigned()
        );

        let log = ActionLog::new(ActionType::PersistSchedule, operator)
            .with_location(schedule.operation.to_db_str(), &key.to_db_key())
            .with_payload(&json!({
                "assigned": schedule.total_assigned(),
            }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            tracing::warn!("记录操作日志失败: {}", e);
        }

        let event = RosterEvent::month_scope(
            key.to_db_key(),
            RosterEventType::SchedulePersisted,
            Some("roster_api".to_string()),
        );
        if let Err(e) = self.event_publisher.publish(event) {
            tracing::warn!("发布刷新事件失败: {}", e);
        }

        Ok(())
    }

    // ==========================================
    // 编辑会话
    // ==========================================

    /// 打开编辑会话 (装载同月双勤务快照 + 名册 + 名额上限)
    ///
    /// 会话内的逐岗变更在内存中进行,提交前数据库不变。
    pub fn open_session(
        &self,
        operation: Operation,
        year: i32,
        month: u32,
    ) -> ApiResult<EditSession> {
        let key = validate_month(year, month)?;
        let combined = self.schedule_repo.fetch_combined(key)?;
        let known_officers = self.officer_repo.list_names()?;
        let cap = self.monthly_cap()?;

        let session = EditSession::new(operation, combined, known_officers, cap);
        tracing::info!(
            "编辑会话打开: session_id={}, operation={}, month={}",
            session.session_id(),
            operation,
            key
        );
        Ok(session)
    }

    /// 提交编辑会话 (工作副本整月落库)
    ///
    /// 未发生实际变更的会话不产生写入。
    pub fn commit_session(&self, session: EditSession, operator: &str) -> ApiResult<()> {
        let session_id = session.session_id().to_string();
        let operation = session.operation();
        let key = session.month();

        if !session.is_dirty() {
            tracing::info!("编辑会话无变更,跳过落库: session_id={}", session_id);
            return Ok(());
        }

        let schedule = session.into_schedule();
        self.schedule_repo.upsert_schedule(&schedule)?;
        tracing::info!(
            "编辑会话提交: session_id={}, operation={}, month={}",
            session_id,
            operation,
            key
        );

        let log = ActionLog::new(ActionType::PersistSchedule, operator)
            .with_location(operation.to_db_str(), &key.to_db_key())
            .with_payload(&json!({
                "session_id": session_id,
                "assigned": schedule.total_assigned(),
            }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            tracing::warn!("记录操作日志失败: {}", e);
        }

        let event = RosterEvent::month_scope(
            key.to_db_key(),
            RosterEventType::SchedulePersisted,
            Some("roster_api".to_string()),
        );
        if let Err(e) = self.event_publisher.publish(event) {
            tracing::warn!("发布刷新事件失败: {}", e);
        }

        Ok(())
    }

    // ==========================================
    // 名额占用
    // ==========================================

    /// 某警员当月跨两勤务的名额占用 (无数据按 0 计)
    pub fn count_assignments(
        &self,
        officer: &str,
        year: i32,
        month: u32,
    ) -> ApiResult<OfficerUsage> {
        let key = validate_month(year, month)?;
        let officer = validate_officer_name(officer)?;

        let combined = self.schedule_repo.fetch_combined(key)?;
        let cap = self.monthly_cap()?;
        let used = CapAccountant::count_assignments(&combined, &officer, None);

        Ok(OfficerUsage {
            officer,
            month_key: key.to_db_key(),
            used,
            cap,
            remaining: cap.saturating_sub(used),
        })
    }
}
