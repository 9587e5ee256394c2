// ==========================================
// 额外勤务排班系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换底层错误为用户友好的错误消息
// 红线: 指派闸口拒绝必须携带显式原因 (可解释性)
// ==========================================

use crate::engine::error::AssignError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 排班闸口拒绝
    // ==========================================
    /// 指派校验器拒绝 (重复/超额/名册外/无效坐标)
    #[error("指派被拒绝: {0}")]
    AssignmentRejected(#[from] AssignError),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 数据库错误
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ValidationError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ValidationError(format!("外键约束违反: {}", msg))
            }

            // 数据质量错误
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::SerializationError(err) => {
                ApiError::InternalError(format!("载荷序列化失败: {}", err))
            }

            // 通用错误
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 输入校验辅助函数
// ==========================================

/// 校验排班周期输入
///
/// 返回:
/// - Ok(MonthKey) 月份合法 (1..=12, 年份在支持范围内)
/// - Err(ApiError::InvalidInput) 否则
pub fn validate_month(year: i32, month: u32) -> ApiResult<crate::domain::schedule::MonthKey> {
    let key = crate::domain::schedule::MonthKey::new(year, month);
    if !key.is_valid() {
        return Err(ApiError::InvalidInput(format!(
            "无效月份: {}-{}",
            year, month
        )));
    }
    Ok(key)
}

/// 校验警员姓名输入 (去除首尾空白,拒绝空串)
pub fn validate_officer_name(name: &str) -> ApiResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("警员姓名不能为空".to_string()));
    }
    Ok(trimmed.to_string())
}
