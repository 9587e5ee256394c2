// ==========================================
// 额外勤务排班系统 - 警员领域模型
// ==========================================
// 警员以展示名唯一标识 (含警衔前缀)
// 队属为三个轮换队之一; 行政人员无队属
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::Team;

// ==========================================
// Officer - 警员
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officer {
    // ===== 主键 =====
    pub name: String,              // 展示名 (唯一,含警衔前缀,如 "SGT MUNIZ")

    // ===== 队属 =====
    pub team: Option<Team>,        // 常务轮换队; None = 行政人员,不参与轮换

    // ===== 展示 =====
    pub display_order: i32,        // 选择列表中的显示顺序
}

impl Officer {
    /// 创建新警员
    pub fn new(name: impl Into<String>, team: Option<Team>, display_order: i32) -> Self {
        Self {
            name: name.into(),
            team,
            display_order,
        }
    }

    /// 是否行政人员 (无轮换队属,不参与常务值班冲突检查)
    pub fn is_administrative(&self) -> bool {
        self.team.is_none()
    }
}
