// ==========================================
// 额外勤务排班系统 - 名册/轮换表导入器
// ==========================================
// 职责: 整合导入流程,从文件到数据库
// 流程: 解析 → 字段映射 → 行级校验 → 落库 → 记录日志
// 红线: 行级脏数据跳过并记入汇总,不中断整个导入
// ==========================================

use crate::config::{config_keys, RosterConfigReader};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::officer::Officer;
use crate::domain::roster::OrdinaryRoster;
use crate::domain::schedule::MonthKey;
use crate::domain::types::Team;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::officer_repo::OfficerRepository;
use crate::repository::ordinary_roster_repo::OrdinaryRosterRepository;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ===== 警员名册表头 =====
const COL_NAME: &str = "NAME";
const COL_TEAM: &str = "TEAM";
const COL_ORDER: &str = "ORDER";

// ===== 轮换表表头 =====
const COL_DAY: &str = "DAY";
const COL_MEMBERS: &str = "MEMBERS";

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

/// 行级错误 (该行被跳过或部分忽略,导入继续)
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl ImportSummary {
    fn new(batch_id: String) -> Self {
        Self {
            batch_id,
            total_rows: 0,
            imported: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }

    fn record_error(&mut self, row: usize, message: impl Into<String>) {
        self.errors.push(RowError {
            row,
            message: message.into(),
        });
    }
}

// ==========================================
// 勤务组别名解析
// ==========================================
/// 解析轮换表/名册中的勤务组写法
///
/// 接受标准名 (TEAM_A)、单字母 (A) 与口语名 (ALFA/BRAVO/CHARLIE)。
pub fn parse_team_alias(raw: &str) -> Option<Team> {
    let normalized = raw.trim().to_uppercase();
    match normalized.as_str() {
        "TEAM_A" | "A" | "ALFA" | "EQUIPE A" => Some(Team::TeamA),
        "TEAM_B" | "B" | "BRAVO" | "EQUIPE B" => Some(Team::TeamB),
        "TEAM_C" | "C" | "CHARLIE" | "EQUIPE C" => Some(Team::TeamC),
        _ => None,
    }
}

// ==========================================
// RosterImporter - 名册/轮换表导入器
// ==========================================
pub struct RosterImporter<C>
where
    C: RosterConfigReader,
{
    // 数据访问层
    officer_repo: Arc<OfficerRepository>,
    roster_repo: Arc<OrdinaryRosterRepository>,
    action_log_repo: Arc<ActionLogRepository>,

    // 配置读取器
    config: C,

    // 文件解析器 (按扩展名分发)
    parser: UniversalFileParser,
}

impl<C> RosterImporter<C>
where
    C: RosterConfigReader,
{
    /// 创建新的 RosterImporter 实例
    ///
    /// # 参数
    /// - officer_repo: 警员名册仓储
    /// - roster_repo: 常务轮换表仓储
    /// - action_log_repo: 操作日志仓储
    /// - config: 配置读取器
    pub fn new(
        officer_repo: Arc<OfficerRepository>,
        roster_repo: Arc<OrdinaryRosterRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: C,
    ) -> Self {
        Self {
            officer_repo,
            roster_repo,
            action_log_repo,
            config,
            parser: UniversalFileParser,
        }
    }

    /// 从文件导入警员名册 (.csv/.xlsx)
    ///
    /// 表头: NAME (必需), TEAM (可空=行政岗), ORDER (可空=0)
    ///
    /// # 参数
    /// - file_path: 名册文件路径
    /// - operator: 操作人 (写入操作日志)
    ///
    /// # 返回
    /// - Ok(ImportSummary): 逐行结果汇总
    /// - Err: 文件级失败 (不存在、格式不支持、缺少必需列)
    #[instrument(skip(self, file_path), fields(batch_id))]
    pub async fn import_officers<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        operator: &str,
    ) -> ImportResult<ImportSummary> {
        let batch_id = Uuid::new_v4().to_string();
        let file_path_str = file_path.as_ref().display().to_string();
        info!(batch_id = %batch_id, file_path = %file_path_str, "开始导入警员名册");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw_rows = self
            .parser
            .parse(file_path.as_ref())
            .map_err(|e| match e.downcast::<ImportError>() {
                Ok(import_err) => *import_err,
                Err(other) => ImportError::FileReadError(other.to_string()),
            })?;

        let mut summary = ImportSummary::new(batch_id.clone());
        summary.total_rows = raw_rows.len();
        info!(total_rows = summary.total_rows, "文件解析完成");

        // 必需列检查 (空文件直接返回空汇总)
        if !raw_rows.is_empty() && !raw_rows.iter().any(|r| r.contains_key(COL_NAME)) {
            return Err(ImportError::MissingColumn {
                column: COL_NAME.to_string(),
            });
        }

        // === 步骤 2: 逐行映射并落库 ===
        debug!("步骤 2: 逐行映射并落库");
        for (idx, row) in raw_rows.into_iter().enumerate() {
            let row_number = idx + 1;

            let name = row.get(COL_NAME).map(|s| s.trim()).unwrap_or("");
            if name.is_empty() {
                warn!(row_number = row_number, "NAME 为空,跳过该行");
                summary.record_error(row_number, "NAME 为空");
                summary.skipped += 1;
                continue;
            }

            let team_raw = row.get(COL_TEAM).map(|s| s.trim()).unwrap_or("");
            let team = if team_raw.is_empty() {
                None // 行政岗: 不参与常务轮换
            } else {
                match parse_team_alias(team_raw) {
                    Some(team) => Some(team),
                    None => {
                        warn!(row_number = row_number, value = %team_raw, "无法识别的勤务组,跳过该行");
                        summary.record_error(
                            row_number,
                            format!("无法识别的勤务组: {}", team_raw),
                        );
                        summary.skipped += 1;
                        continue;
                    }
                }
            };

            let order_raw = row.get(COL_ORDER).map(|s| s.trim()).unwrap_or("");
            let display_order = if order_raw.is_empty() {
                0
            } else {
                match order_raw.parse::<i32>() {
                    Ok(order) => order,
                    Err(_) => {
                        warn!(row_number = row_number, value = %order_raw, "ORDER 不是整数,跳过该行");
                        summary
                            .record_error(row_number, format!("ORDER 不是整数: {}", order_raw));
                        summary.skipped += 1;
                        continue;
                    }
                }
            };

            let officer = Officer::new(name, team, display_order);
            self.officer_repo.upsert(&officer)?;
            summary.imported += 1;
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "警员名册导入完成"
        );

        // === 步骤 3: 记录操作日志 (尽力而为) ===
        let log = ActionLog::new(ActionType::ImportOfficers, operator).with_payload(&json!({
            "batch_id": batch_id,
            "file": file_path_str,
            "total_rows": summary.total_rows,
            "imported": summary.imported,
            "skipped": summary.skipped,
        }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(summary)
    }

    /// 从文件导入常务值班轮换表 (.csv/.xlsx)
    ///
    /// 表头: DAY (必需), TEAM (必需), MEMBERS (可选,分号分隔的补充成员)
    ///
    /// 各勤务组成员默认取自警员名册; MEMBERS 列可补充名册外安排,
    /// 是否接受名册外的名字由 roster_import_strict_officers 决定。
    ///
    /// # 参数
    /// - file_path: 轮换表文件路径
    /// - month: 目标排班周期
    /// - operator: 操作人 (写入操作日志)
    #[instrument(skip(self, file_path), fields(batch_id))]
    pub async fn import_ordinary_roster<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        month: MonthKey,
        operator: &str,
    ) -> ImportResult<ImportSummary> {
        let batch_id = Uuid::new_v4().to_string();
        let file_path_str = file_path.as_ref().display().to_string();
        info!(batch_id = %batch_id, file_path = %file_path_str, month = %month.to_db_key(), "开始导入常务轮换表");

        if !month.is_valid() {
            return Err(ImportError::InvalidMonth(format!(
                "{}-{}",
                month.year, month.month
            )));
        }

        // === 步骤 1: 读取配置与名册基线 ===
        debug!("步骤 1: 读取配置与名册基线");
        let strict = self
            .config
            .get_roster_import_strict_officers()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: config_keys::ROSTER_IMPORT_STRICT_OFFICERS.to_string(),
                message: e.to_string(),
            })?;

        let master = self.officer_repo.list_all()?;
        let master_names: BTreeSet<String> = master.iter().map(|o| o.name.clone()).collect();
        let mut team_members: BTreeMap<Team, BTreeSet<String>> = BTreeMap::new();
        for officer in &master {
            if let Some(team) = officer.team {
                team_members
                    .entry(team)
                    .or_default()
                    .insert(officer.name.clone());
            }
        }

        // === 步骤 2: 解析文件 ===
        debug!("步骤 2: 解析文件");
        let raw_rows = self
            .parser
            .parse(file_path.as_ref())
            .map_err(|e| match e.downcast::<ImportError>() {
                Ok(import_err) => *import_err,
                Err(other) => ImportError::FileReadError(other.to_string()),
            })?;

        let mut summary = ImportSummary::new(batch_id.clone());
        summary.total_rows = raw_rows.len();
        info!(total_rows = summary.total_rows, "文件解析完成");

        if !raw_rows.is_empty() {
            for column in [COL_DAY, COL_TEAM] {
                if !raw_rows.iter().any(|r| r.contains_key(column)) {
                    return Err(ImportError::MissingColumn {
                        column: column.to_string(),
                    });
                }
            }
        }

        // === 步骤 3: 逐行映射 ===
        debug!("步骤 3: 逐行映射");
        let mut roster = OrdinaryRoster::new(month);
        for (idx, row) in raw_rows.into_iter().enumerate() {
            let row_number = idx + 1;

            let day_raw = row.get(COL_DAY).map(|s| s.trim()).unwrap_or("");
            let day = match day_raw.parse::<u32>() {
                Ok(day) if month.contains_day(day) => day,
                Ok(day) => {
                    warn!(row_number = row_number, day = day, "日号不在月内,跳过该行");
                    summary.record_error(row_number, format!("日号不在月内: {}", day));
                    summary.skipped += 1;
                    continue;
                }
                Err(_) => {
                    warn!(row_number = row_number, value = %day_raw, "DAY 不是整数,跳过该行");
                    summary.record_error(row_number, format!("DAY 不是整数: {}", day_raw));
                    summary.skipped += 1;
                    continue;
                }
            };

            let team_raw = row.get(COL_TEAM).map(|s| s.trim()).unwrap_or("");
            let team = match parse_team_alias(team_raw) {
                Some(team) => team,
                None => {
                    warn!(row_number = row_number, value = %team_raw, "无法识别的勤务组,跳过该行");
                    summary.record_error(row_number, format!("无法识别的勤务组: {}", team_raw));
                    summary.skipped += 1;
                    continue;
                }
            };

            roster.set_duty(day, team);
            summary.imported += 1;

            // MEMBERS 列: 补充该组成员 (名册外按严格开关处理)
            if let Some(members_raw) = row.get(COL_MEMBERS) {
                for name in members_raw.split(';').map(|s| s.trim()).filter(|s| !s.is_empty()) {
                    if strict && !master_names.contains(name) {
                        warn!(row_number = row_number, officer = %name, "警员不在名册中,忽略该成员");
                        summary.record_error(row_number, format!("警员不在名册中: {}", name));
                        continue;
                    }
                    team_members.entry(team).or_default().insert(name.to_string());
                }
            }
        }

        // === 步骤 4: 合成成员表并落库 ===
        debug!("步骤 4: 合成成员表并落库");
        for team in Team::ALL {
            if let Some(names) = team_members.get(&team) {
                roster.set_members(team, names.iter().cloned().collect());
            }
        }
        self.roster_repo.upsert_roster(&roster)?;

        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "常务轮换表导入完成"
        );

        // === 步骤 5: 记录操作日志 (尽力而为) ===
        let log = ActionLog::new(ActionType::ImportRoster, operator)
            .with_month_key(&month.to_db_key())
            .with_payload(&json!({
                "batch_id": batch_id,
                "file": file_path_str,
                "total_rows": summary.total_rows,
                "imported": summary.imported,
                "skipped": summary.skipped,
            }));
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        Ok(summary)
    }
}
