// ==========================================
// 额外勤务排班系统 - 报表 API
// ==========================================
// 职责: 冲突检测报表、名额占用报表 (只读)
// 红线: 报表只读,不产生任何写入与操作日志
// ==========================================

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::error::{validate_month, ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::conflict::Conflict;
use crate::engine::cap::CapAccountant;
use crate::engine::conflict::ConflictDetector;
use crate::repository::officer_repo::OfficerRepository;
use crate::repository::ordinary_roster_repo::OrdinaryRosterRepository;
use crate::repository::schedule_repo::ScheduleRepository;

// ==========================================
// 响应结构
// ==========================================

/// 冲突检测报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictReport {
    pub month_key: String,
    pub generated_at: NaiveDateTime,
    pub total: usize,
    /// 确定性排序: 日升序 → 勤务名升序 → 跨勤务重复按警员名升序
    pub conflicts: Vec<Conflict>,
}

/// 单警员名额占用行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapUsageEntry {
    pub officer: String,
    /// 常务勤务组 (行政岗为 None)
    pub team: Option<String>,
    pub used: u32,
    pub remaining: u32,
    /// 外部装载的数据可能超额,核算只报告不回滚
    pub over_cap: bool,
}

/// 名额占用报表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapUsageReport {
    pub month_key: String,
    pub generated_at: NaiveDateTime,
    pub cap: u32,
    /// 按占用降序、警员名升序; 零占用警员不列出
    pub entries: Vec<CapUsageEntry>,
}

// ==========================================
// ReportApi - 报表 API
// ==========================================

/// 报表API
///
/// 职责：
/// 1. 常务冲突检测报表（值班重叠 + 跨勤务重复）
/// 2. 名额占用报表（跨两勤务合并核算）
pub struct ReportApi {
    schedule_repo: Arc<ScheduleRepository>,
    roster_repo: Arc<OrdinaryRosterRepository>,
    officer_repo: Arc<OfficerRepository>,
    config_manager: Arc<ConfigManager>,
}

impl ReportApi {
    /// 创建新的ReportApi实例
    pub fn new(
        schedule_repo: Arc<ScheduleRepository>,
        roster_repo: Arc<OrdinaryRosterRepository>,
        officer_repo: Arc<OfficerRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            schedule_repo,
            roster_repo,
            officer_repo,
            config_manager,
        }
    }

    /// 当月冲突检测报表
    ///
    /// 数据输入: 已落库的双勤务排班 + 常务轮换表。
    /// 任一缺失按空数据处理 (空排班/空轮换表必然零冲突)。
    pub fn detect_conflicts(&self, year: i32, month: u32) -> ApiResult<ConflictReport> {
        let key = validate_month(year, month)?;

        let combined = self.schedule_repo.fetch_combined(key)?;
        let roster = self.roster_repo.fetch_or_empty(key)?;

        let conflicts = ConflictDetector::detect(&combined, &roster, key);
        tracing::info!(
            "冲突检测完成: month={}, conflicts={}",
            key,
            conflicts.len()
        );

        Ok(ConflictReport {
            month_key: key.to_db_key(),
            generated_at: chrono::Local::now().naive_local(),
            total: conflicts.len(),
            conflicts,
        })
    }

    /// 当月名额占用报表
    ///
    /// 只列出有占用的警员,按占用降序、同占用按警员名升序。
    /// 排班中出现但名册外的名字也会列出 (team 为 None)。
    pub fn cap_usage(&self, year: i32, month: u32) -> ApiResult<CapUsageReport> {
        let key = validate_month(year, month)?;

        let combined = self.schedule_repo.fetch_combined(key)?;
        let cap = self
            .config_manager
            .get_monthly_cap()
            .map_err(|e| ApiError::InternalError(format!("配置读取失败: {}", e)))?;

        // 名册内警员 + 排班中出现的名册外名字
        let officers = self.officer_repo.list_all()?;
        let mut names: Vec<String> = officers.iter().map(|o| o.name.clone()).collect();
        for operation in crate::domain::types::Operation::ALL {
            let schedule = combined.get(operation);
            for day in 1..=key.days() {
                if let Some(slots) = schedule.day_slots(day) {
                    for name in slots.iter().flatten() {
                        if !names.iter().any(|n| n == name) {
                            names.push(name.clone());
                        }
                    }
                }
            }
        }

        let mut entries: Vec<CapUsageEntry> = names
            .into_iter()
            .filter_map(|name| {
                let used = CapAccountant::count_assignments(&combined, &name, None);
                if used == 0 {
                    return None;
                }
                let team = officers
                    .iter()
                    .find(|o| o.name == name)
                    .and_then(|o| o.team)
                    .map(|t| t.to_db_str().to_string());
                Some(CapUsageEntry {
                    officer: name,
                    team,
                    used,
                    remaining: cap.saturating_sub(used),
                    over_cap: used > cap,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.used.cmp(&a.used).then_with(|| a.officer.cmp(&b.officer)));

        Ok(CapUsageReport {
            month_key: key.to_db_key(),
            generated_at: chrono::Local::now().naive_local(),
            cap,
            entries,
        })
    }
}
