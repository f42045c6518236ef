// ==========================================
// 工作室空间分配系统 - 配置层
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 9. 配置项全集
// ==========================================
// 职责: 系统配置管理,内置缺省值 + JSON 覆写
// ==========================================

pub mod settings;

// 重导出配置类型
pub use settings::{AllocationSettings, AppSettings, ConfigError, FinanceSettings};
