// ==========================================
// 工作室空间分配系统 - 项目与工作室领域模型
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 2. 工作室生成
// ==========================================

use crate::domain::types::StudioId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ProgramInput - 项目(生源)输入
// ==========================================
// size 为非负学生人数;只在生成器的私有副本中被消耗
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramInput {
    pub id: String,
    pub label: String,
    pub size: i64,
}

// ==========================================
// Studio - 工作室
// ==========================================
// 生成器一次性产出,之后不可变;放置引擎只读消费
// size = programs 各项人数之和
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Studio {
    pub id: StudioId,
    pub size: i64,
    pub programs: BTreeMap<String, i64>,
}

// ==========================================
// StudioSummary - 生成结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioSummary {
    pub studios: Vec<Studio>,
    pub total_students: i64,
    pub total_studios: usize,
    pub remainder: i64,
}

impl StudioSummary {
    /// 空结果（无学生或无效容量时返回,不报错）
    pub fn empty() -> Self {
        Self {
            studios: Vec::new(),
            total_students: 0,
            total_studios: 0,
            remainder: 0,
        }
    }
}
