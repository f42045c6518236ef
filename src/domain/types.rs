// ==========================================
// 工作室空间分配系统 - 领域类型定义
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 0.1 标识符口径
// 红线: 复合标识符只构造,不解析
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RoomId - 房间标识符
// ==========================================
// 来源: 空间台账 ROOM 列,或合并空间的 combined_id
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// FloorId - 楼层标识符
// ==========================================
// 复合键: building + "__" + floor_label
// 红线: 构造后视为不透明字符串,任何地方不得反向拆分
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(String);

impl FloorId {
    /// 由楼栋与楼层标签构造复合键（唯一构造入口）
    pub fn from_parts(building: &str, floor_label: &str) -> Self {
        Self(format!("{}__{}", building, floor_label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// StudioId - 工作室标识符
// ==========================================
// 格式: S-001, S-002, ... 生成器内单调递增
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudioId(String);

impl StudioId {
    /// 按序号构造,三位补零（超出三位自然扩展）
    pub fn sequential(counter: u32) -> Self {
        Self(format!("S-{:03}", counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 放置策略 (Placement Strategy)
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 4.2 三级策略
// 固定优先级: Strict → Next → Dynamic,先成功先得
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementStrategy {
    Strict,  // 仅使用房间基础容量
    Next,    // 使用已授予的动态容量
    Dynamic, // 允许向楼层缓冲申请新的超额容量
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementStrategy::Strict => write!(f, "STRICT"),
            PlacementStrategy::Next => write!(f, "NEXT"),
            PlacementStrategy::Dynamic => write!(f, "DYNAMIC"),
        }
    }
}
