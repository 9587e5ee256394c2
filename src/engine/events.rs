// ==========================================
// 额外勤务排班系统 - 引擎层事件发布
// ==========================================
// 职责: 定义排班事件发布 trait，实现依赖倒置
// 说明: Engine 层定义 trait，外部协作层实现适配器
// 优势: Engine 不依赖任何下游,核心计算保持纯净
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 排班事件类型
// ==========================================

/// 排班事件触发类型
///
/// Engine 层定义的事件类型，用于通知下游系统
/// (报表刷新、界面提示等由订阅方自行决定)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterEventType {
    /// 岗位指派变更
    SlotChanged,
    /// 整月排班落库
    SchedulePersisted,
    /// 警员名册变更
    OfficerRosterChanged,
    /// 常务轮换表变更
    OrdinaryRosterChanged,
    /// 手动触发
    ManualTrigger,
}

impl RosterEventType {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &str {
        match self {
            RosterEventType::SlotChanged => "SlotChanged",
            RosterEventType::SchedulePersisted => "SchedulePersisted",
            RosterEventType::OfficerRosterChanged => "OfficerRosterChanged",
            RosterEventType::OrdinaryRosterChanged => "OrdinaryRosterChanged",
            RosterEventType::ManualTrigger => "ManualTrigger",
        }
    }
}

/// 排班事件
///
/// Engine 层发布的事件，标注勤务与排班周期的影响范围
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEvent {
    /// 排班周期 ("YYYY-MM")
    pub month_key: String,
    /// 事件类型
    pub event_type: RosterEventType,
    /// 事件来源描述
    pub source: Option<String>,
    /// 受影响的勤务（None 表示全部/与勤务无关）
    pub operation: Option<String>,
    /// 受影响的日（None 表示整月）
    pub day: Option<u32>,
}

impl RosterEvent {
    /// 创建整月范围事件
    pub fn month_scope(
        month_key: String,
        event_type: RosterEventType,
        source: Option<String>,
    ) -> Self {
        Self {
            month_key,
            event_type,
            source,
            operation: None,
            day: None,
        }
    }

    /// 创建单日单勤务事件
    pub fn slot_scope(
        month_key: String,
        event_type: RosterEventType,
        source: Option<String>,
        operation: String,
        day: u32,
    ) -> Self {
        Self {
            month_key,
            event_type,
            source,
            operation: Some(operation),
            day: Some(day),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 排班事件发布者 Trait
///
/// Engine 层定义，外部协作层实现
/// 通过 trait 实现依赖倒置，核心不知道订阅方的存在
pub trait RosterEventPublisher: Send + Sync {
    /// 发布排班事件
    ///
    /// # 参数
    /// - `event`: 排班事件
    ///
    /// # 返回
    /// - `Ok(task_id)`: 任务 ID（如果订阅方支持）或空字符串
    /// - `Err`: 发布失败
    fn publish(&self, event: RosterEvent) -> Result<String, Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
///
/// 用于不需要事件发布的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl RosterEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: RosterEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - month_key={}, event_type={}",
            event.month_key,
            event.event_type.as_str()
        );
        Ok(String::new())
    }
}

/// 可选的事件发布者包装
///
/// 简化 Option<Arc<dyn RosterEventPublisher>> 的使用
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn RosterEventPublisher>>,
}

impl OptionalEventPublisher {
    /// 创建带发布者的实例
    pub fn with_publisher(publisher: Arc<dyn RosterEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    /// 创建空实例（不发布事件）
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 发布事件（如果有发布者）
    pub fn publish(&self, event: RosterEvent) -> Result<String, Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(publisher) => publisher.publish(event),
            None => {
                tracing::debug!(
                    "OptionalEventPublisher: 未配置发布者，跳过事件 - month_key={}, event_type={}",
                    event.month_key,
                    event.event_type.as_str()
                );
                Ok(String::new())
            }
        }
    }

    /// 检查是否配置了发布者
    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}
