// ==========================================
// 额外勤务排班系统 - 操作日志领域模型
// ==========================================
// 红线: API 层所有写入必须记录; 引擎层从不写日志
// 用途: 审计追踪
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    // ===== 主键 =====
    pub action_id: String,         // 日志ID (UUID)
    pub action_type: String,       // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,  // 操作时间戳
    pub actor: String,             // 操作人

    // ===== 操作定位 =====
    pub operation: Option<String>, // 勤务 ("PMF"/"TRANSITO"), 非排班操作为 None
    pub month_key: Option<String>, // 排班周期 ("YYYY-MM")
    pub day: Option<u32>,          // 日
    pub slot_index: Option<u32>,   // 岗位序号

    // ===== 操作负载 =====
    pub officer: Option<String>,   // 涉及警员
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,    // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Assign,          // 指派岗位
    Clear,           // 清空岗位
    PersistSchedule, // 整月排班落库
    ImportOfficers,  // 导入警员名册
    ImportRoster,    // 导入常务轮换表
    ConfigUpdate,    // 配置更新
}

impl ActionType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Assign => "Assign",
            ActionType::Clear => "Clear",
            ActionType::PersistSchedule => "PersistSchedule",
            ActionType::ImportOfficers => "ImportOfficers",
            ActionType::ImportRoster => "ImportRoster",
            ActionType::ConfigUpdate => "ConfigUpdate",
        }
    }

    /// 从字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Assign" => Some(ActionType::Assign),
            "Clear" => Some(ActionType::Clear),
            "PersistSchedule" => Some(ActionType::PersistSchedule),
            "ImportOfficers" => Some(ActionType::ImportOfficers),
            "ImportRoster" => Some(ActionType::ImportRoster),
            "ConfigUpdate" => Some(ActionType::ConfigUpdate),
            _ => None,
        }
    }
}

impl ActionLog {
    /// 创建新的操作日志
    ///
    /// # 参数
    /// - `action_type`: 操作类型
    /// - `actor`: 操作人
    pub fn new(action_type: ActionType, actor: impl Into<String>) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.into(),
            operation: None,
            month_key: None,
            day: None,
            slot_index: None,
            officer: None,
            payload_json: None,
            detail: None,
        }
    }

    /// 设置排班定位 (勤务 + 周期)
    pub fn with_location(mut self, operation: &str, month_key: &str) -> Self {
        self.operation = Some(operation.to_string());
        self.month_key = Some(month_key.to_string());
        self
    }

    /// 仅设置排班周期 (导入/整月落库等无单一勤务的操作)
    pub fn with_month_key(mut self, month_key: &str) -> Self {
        self.month_key = Some(month_key.to_string());
        self
    }

    /// 设置日与岗位
    pub fn with_slot(mut self, day: u32, slot_index: u32) -> Self {
        self.day = Some(day);
        self.slot_index = Some(slot_index);
        self
    }

    /// 设置涉及警员
    pub fn with_officer(mut self, officer: impl Into<String>) -> Self {
        self.officer = Some(officer.into());
        self
    }

    /// 设置操作负载 (转换为JSON)
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Self {
        self.payload_json = serde_json::to_value(payload).ok();
        self
    }

    /// 设置详细描述
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
