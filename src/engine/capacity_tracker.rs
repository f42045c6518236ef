// ==========================================
// 工作室空间分配系统 - 楼层缓冲跟踪器
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 3. 楼层缓冲
// 红线: 每次分配运行必须新建跟踪器,禁止跨运行复用
// ==========================================
// 职责: 按楼层记账超额容量预算 (allowed / used)
// 纯构造,不含放置逻辑;used 只增不减
// ==========================================

use crate::domain::allocation::FloorAllocationState;
use crate::domain::space::Floor;
use crate::domain::types::FloorId;
use std::collections::HashMap;

// ==========================================
// FloorBudget - 单楼层预算条目
// ==========================================
#[derive(Debug, Clone)]
pub struct FloorBudget {
    pub floor: Floor,
    pub extra_capacity_allowed: i64,
    pub extra_capacity_used: i64,
}

impl FloorBudget {
    /// 剩余可借用的缓冲容量
    pub fn remaining_buffer(&self) -> i64 {
        (self.extra_capacity_allowed - self.extra_capacity_used).max(0)
    }

    /// 是否还能借出 incremental 的超额容量
    pub fn can_grant(&self, incremental: i64) -> bool {
        self.extra_capacity_allowed - self.extra_capacity_used >= incremental
    }
}

// ==========================================
// FloorCapacityTracker - 楼层缓冲跟踪器
// ==========================================
// 按 FloorId 索引;保留楼层输入顺序用于确定性快照
#[derive(Debug, Clone)]
pub struct FloorCapacityTracker {
    entries: HashMap<FloorId, FloorBudget>,
    order: Vec<FloorId>,
}

impl FloorCapacityTracker {
    /// 由楼层列表构造全新跟踪器
    ///
    /// extra_capacity_allowed = max(total_capacity − base_capacity, 0),
    /// used 从 0 起步
    pub fn build(floors: &[Floor]) -> Self {
        let mut entries = HashMap::with_capacity(floors.len());
        let mut order = Vec::with_capacity(floors.len());

        for floor in floors {
            let extra_capacity_allowed = (floor.total_capacity - floor.base_capacity).max(0);
            let budget = FloorBudget {
                floor: floor.clone(),
                extra_capacity_allowed,
                extra_capacity_used: 0,
            };
            if entries.insert(floor.id.clone(), budget).is_none() {
                order.push(floor.id.clone());
            }
        }

        Self { entries, order }
    }

    pub fn get(&self, floor_id: &FloorId) -> Option<&FloorBudget> {
        self.entries.get(floor_id)
    }

    pub fn get_mut(&mut self, floor_id: &FloorId) -> Option<&mut FloorBudget> {
        self.entries.get_mut(floor_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按输入顺序产出各楼层终态快照
    pub fn states(&self) -> Vec<FloorAllocationState> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|budget| FloorAllocationState {
                floor_id: budget.floor.id.clone(),
                building: budget.floor.building.clone(),
                floor_label: budget.floor.floor.clone(),
                total_capacity: budget.floor.total_capacity,
                base_capacity: budget.floor.base_capacity,
                extra_capacity_allowed: budget.extra_capacity_allowed,
                extra_capacity_used: budget.extra_capacity_used,
                remaining_buffer: budget.remaining_buffer(),
            })
            .collect()
    }
}
