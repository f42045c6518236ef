// ==========================================
// 工作室空间分配系统 - 分配结果领域模型
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 5. 结果装配
// 红线: 字段名与形状即下游契约,导出/报表逐字依赖
// ==========================================

use crate::domain::program::Studio;
use crate::domain::types::{FloorId, RoomId, StudioId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// AllocationOptions - 放置选项
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOptions {
    /// 洗牌种子,缺省时引擎使用固定常量 17
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_seed: Option<u32>,
}

// ==========================================
// RoomAssignment - 单房间分配明细
// ==========================================
// 只为至少分到一个工作室的房间产出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub room_id: RoomId,
    pub room_name: String,
    pub building: String,
    pub floor: String,
    pub base_capacity: i64,
    pub dynamic_capacity: i64,
    pub extra_capacity_used: i64,
    pub studios: Vec<Studio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_rooms: Option<Vec<RoomId>>,
}

// ==========================================
// FloorAllocationState - 楼层缓冲终态快照
// ==========================================
// 每个楼层都会出现,无论是否发生超额借用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorAllocationState {
    pub floor_id: FloorId,
    pub building: String,
    pub floor_label: String,
    pub total_capacity: i64,
    pub base_capacity: i64,
    pub extra_capacity_allowed: i64,
    pub extra_capacity_used: i64,
    pub remaining_buffer: i64,
}

// ==========================================
// AllocationResult - 单次分配完整输出
// ==========================================
// 产出后不可变;每个工作室要么恰好落在一个房间,
// 要么进入 unassigned_studios 且映射为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub assignments: Vec<RoomAssignment>,
    pub floor_states: Vec<FloorAllocationState>,
    pub unassigned_studios: Vec<Studio>,
    pub studio_to_room: BTreeMap<StudioId, Option<RoomId>>,
    pub diagnostics: Vec<String>,
}

impl AllocationResult {
    /// 已成功放置的工作室数量
    pub fn assigned_count(&self) -> usize {
        self.assignments
            .iter()
            .map(|assignment| assignment.studios.len())
            .sum()
    }
}
