// ==========================================
// 额外勤务排班系统 - 排班配置读取 Trait
// ==========================================
// 职责: 定义排班与导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// RosterConfigReader Trait
// ==========================================
// 用途: 排班/导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait RosterConfigReader: Send + Sync {
    /// 获取月度名额上限
    ///
    /// # 返回
    /// - u32: 单个警员每月跨两个勤务可占用的岗位总数上限
    ///
    /// # 默认值
    /// - 12
    ///
    /// # 用途
    /// - 指派校验器的名额闸口 (CapExceeded)
    async fn get_monthly_cap(&self) -> Result<u32, Box<dyn Error>>;

    /// 获取冲突周期扫描间隔（秒）
    ///
    /// # 返回
    /// - u64: 协作层定时重跑冲突检测的建议间隔
    ///
    /// # 默认值
    /// - 300
    ///
    /// # 说明
    /// - 核心本身不起定时器; 该值仅供外部协作层参考
    async fn get_conflict_scan_interval_secs(&self) -> Result<u64, Box<dyn Error>>;

    /// 获取轮换表导入是否启用严格警员校验
    ///
    /// # 返回
    /// - true: 轮换表中出现名册外的警员名时拒绝该行
    /// - false: 容忍名册外的警员名,按原样写入
    ///
    /// # 默认值
    /// - true
    async fn get_roster_import_strict_officers(&self) -> Result<bool, Box<dyn Error>>;
}
