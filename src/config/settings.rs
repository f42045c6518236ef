// ==========================================
// 工作室空间分配系统 - 系统配置
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 9. 配置项全集
// ==========================================
// 职责: 缓冲比例/缺省种子/经费费率的集中管理
// 存储: JSON 配置文件,缺省值内置
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

// ==========================================
// 配置错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    FileReadError(String),

    #[error("配置解析失败: {0}")]
    ParseError(String),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::FileReadError(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

// ==========================================
// AllocationSettings - 分配参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    /// 楼层缓冲比例: total_capacity = round(base × (1 + ratio))
    pub floor_buffer_ratio: f64,

    /// 缺省洗牌种子("换一换"在此基础上递进)
    pub default_seed: u32,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            floor_buffer_ratio: 0.15,
            default_seed: 17,
        }
    }
}

// ==========================================
// FinanceSettings - 经费费率
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceSettings {
    // ===== 角色基准薪酬 =====
    pub faculty_compensation: f64,
    pub grader_compensation: f64,

    // ===== ERE 费率 =====
    pub faculty_ere_rate: f64,
    pub ta_fa_ere_rate: f64,
    pub grader_ere_rate: f64,

    // ===== 统一附加费率 =====
    pub risk_rate: f64,          // 1.1%
    pub tech_fee_rate: f64,      // 2.5%
    pub admin_service_rate: f64, // 8.5%
}

impl Default for FinanceSettings {
    fn default() -> Self {
        Self {
            faculty_compensation: 85_000.0,
            grader_compensation: 18_000.0,
            faculty_ere_rate: 0.306,
            ta_fa_ere_rate: 0.11,
            grader_ere_rate: 0.019,
            risk_rate: 0.011,
            tech_fee_rate: 0.025,
            admin_service_rate: 0.085,
        }
    }
}

// ==========================================
// AppSettings - 顶层配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub allocation: AllocationSettings,
    pub finance: FinanceSettings,
}

impl AppSettings {
    /// 从 JSON 文件加载配置;缺失字段回落到内置缺省值
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: AppSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// 配置文件存在则加载,否则使用缺省配置
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load_from_path(path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.allocation.floor_buffer_ratio < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "allocation.floor_buffer_ratio".to_string(),
                message: "must be >= 0".to_string(),
            });
        }
        Ok(())
    }
}
