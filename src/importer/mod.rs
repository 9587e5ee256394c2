// ==========================================
// 额外勤务排班系统 - 导入层
// ==========================================
// 职责: 外部名册/轮换表文件导入,生成内部数据
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod roster_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, FileParser, RawRow, UniversalFileParser, XlsxParser};
pub use roster_importer::{parse_team_alias, ImportSummary, RosterImporter, RowError};
