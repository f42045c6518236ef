// ==========================================
// 工作室空间分配系统 - 房间放置引擎
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 4. 放置算法
// 红线: 楼层缓冲约束先于任何放置;容量拒绝是正常分支,
//       所有失败必须输出 reason 到 diagnostics
// ==========================================
// 职责: 工作室 → 房间的贪心装箱
// 算法: 种子化洗牌 + 大件优先 + 三级策略(严格/既授/动态),
//       同策略内最紧余量优先,减少碎片
// ==========================================

use crate::domain::allocation::{AllocationOptions, AllocationResult, RoomAssignment};
use crate::domain::program::Studio;
use crate::domain::space::{Floor, Room};
use crate::domain::types::{PlacementStrategy, RoomId, StudioId};
use crate::engine::capacity_tracker::FloorCapacityTracker;
use crate::engine::shuffle::shuffle_with_seed;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// 缺省洗牌种子;"换一换" 在此基础上 +1 递进
pub const DEFAULT_SHUFFLE_SEED: u32 = 17;

// ==========================================
// RoomState - 运行期房间记账
// ==========================================
// 每次运行为每个参与房间新建,运行结束即丢弃
#[derive(Debug, Clone)]
struct RoomState {
    room: Room,
    used_capacity: i64,
    dynamic_capacity: i64,
    extra_used: i64,
    studios: Vec<Studio>,
}

impl RoomState {
    fn new(room: Room) -> Self {
        let dynamic_capacity = room.base_capacity;
        Self {
            room,
            used_capacity: 0,
            dynamic_capacity,
            extra_used: 0,
            studios: Vec::new(),
        }
    }

    /// 严格余量 = base − used;策略内排序与 strict 判定共用
    fn strict_remaining(&self) -> i64 {
        self.room.base_capacity - self.used_capacity
    }

    fn matches(&self, strategy: PlacementStrategy, studio: &Studio) -> bool {
        match strategy {
            PlacementStrategy::Strict => self.strict_remaining() >= studio.size,
            PlacementStrategy::Next => self.dynamic_capacity - self.used_capacity >= studio.size,
            PlacementStrategy::Dynamic => true,
        }
    }
}

// ==========================================
// RoomPlacementEngine - 房间放置引擎
// ==========================================
pub struct RoomPlacementEngine {
    // 无状态引擎,不需要注入依赖
}

impl RoomPlacementEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 将工作室放置进房间
    ///
    /// 流程:
    /// 1) 过滤未勾选房间;无房间或无楼层时短路返回全未分配
    /// 2) 种子化洗牌房间顺序(缺省种子 17)
    /// 3) 工作室按人数降序(稳定排序)逐个尝试
    /// 4) 三级策略依次尝试,每级取最紧余量候选;全败则记为未分配
    #[instrument(skip(self, rooms, floors, studios), fields(
        room_count = rooms.len(),
        floor_count = floors.len(),
        studio_count = studios.len(),
        shuffle_seed = options.shuffle_seed.unwrap_or(DEFAULT_SHUFFLE_SEED)
    ))]
    pub fn place(
        &self,
        rooms: &[Room],
        floors: &[Floor],
        studios: &[Studio],
        options: &AllocationOptions,
    ) -> AllocationResult {
        let mut diagnostics: Vec<String> = Vec::new();

        let included_rooms: Vec<Room> = rooms
            .iter()
            .filter(|room| room.included)
            .cloned()
            .collect();

        if included_rooms.is_empty() || floors.is_empty() {
            // 结构性短路: 不构建跟踪器,全部工作室未分配
            return AllocationResult {
                assignments: Vec::new(),
                floor_states: Vec::new(),
                unassigned_studios: studios.to_vec(),
                studio_to_room: studios
                    .iter()
                    .map(|studio| (studio.id.clone(), None))
                    .collect(),
                diagnostics: vec!["No room or floor data available.".to_string()],
            };
        }

        // 每次运行新建跟踪器,避免跨运行容量污染
        let mut tracker = FloorCapacityTracker::build(floors);

        let seed = options.shuffle_seed.unwrap_or(DEFAULT_SHUFFLE_SEED);
        let mut room_states: Vec<RoomState> = shuffle_with_seed(&included_rooms, seed)
            .into_iter()
            .map(RoomState::new)
            .collect();

        // 大件优先;稳定排序保持同尺寸工作室的生成次序
        let mut ordered_studios: Vec<Studio> = studios.to_vec();
        ordered_studios.sort_by(|a, b| b.size.cmp(&a.size));

        let mut studio_to_room: BTreeMap<StudioId, Option<RoomId>> = BTreeMap::new();
        let mut unassigned: Vec<Studio> = Vec::new();

        for studio in ordered_studios {
            let placed_room = self.try_place(&mut room_states, &mut tracker, &studio, &mut diagnostics);

            match placed_room {
                Some(room_id) => {
                    debug!(studio_id = %studio.id, room_id = %room_id, "studio placed");
                    studio_to_room.insert(studio.id.clone(), Some(room_id));
                }
                None => {
                    diagnostics.push(format!(
                        "Unable to place {} (size {}). Marked as unassignable.",
                        studio.id, studio.size
                    ));
                    studio_to_room.insert(studio.id.clone(), None);
                    unassigned.push(studio);
                }
            }
        }

        let assignments: Vec<RoomAssignment> = room_states
            .into_iter()
            .filter(|state| !state.studios.is_empty())
            .map(|state| RoomAssignment {
                room_id: state.room.id.clone(),
                room_name: state.room.name.clone(),
                building: state.room.building.clone(),
                floor: state.room.floor.clone(),
                base_capacity: state.room.base_capacity,
                dynamic_capacity: state.room.base_capacity + state.extra_used,
                extra_capacity_used: state.extra_used,
                studios: state.studios,
                member_rooms: state.room.combined_members,
            })
            .collect();

        AllocationResult {
            assignments,
            floor_states: tracker.states(),
            unassigned_studios: unassigned,
            studio_to_room,
            diagnostics,
        }
    }

    // ==========================================
    // 策略搜索
    // ==========================================

    /// 按固定优先级尝试三级策略,返回成功放置的房间 ID
    ///
    /// 每级策略只尝试该级最优(最紧余量)候选;该候选被楼层
    /// 缓冲拒绝时直接升级到下一策略,而不是同级换房间
    fn try_place(
        &self,
        room_states: &mut [RoomState],
        tracker: &mut FloorCapacityTracker,
        studio: &Studio,
        diagnostics: &mut Vec<String>,
    ) -> Option<RoomId> {
        for strategy in [
            PlacementStrategy::Strict,
            PlacementStrategy::Next,
            PlacementStrategy::Dynamic,
        ] {
            let Some(index) = Self::find_room_by_strategy(room_states, studio, strategy) else {
                continue;
            };

            if Self::assign_studio(&mut room_states[index], studio, tracker, diagnostics) {
                return Some(room_states[index].room.id.clone());
            }
        }

        None
    }

    /// 同策略内候选排序: 严格余量升序,取第一个(最紧者)
    ///
    /// 并列时保留洗牌产生的相对顺序
    fn find_room_by_strategy(
        room_states: &[RoomState],
        studio: &Studio,
        strategy: PlacementStrategy,
    ) -> Option<usize> {
        let mut best: Option<usize> = None;

        for (index, state) in room_states.iter().enumerate() {
            if !state.matches(strategy, studio) {
                continue;
            }
            match best {
                None => best = Some(index),
                Some(current)
                    if state.strict_remaining() < room_states[current].strict_remaining() =>
                {
                    best = Some(index)
                }
                _ => {}
            }
        }

        best
    }

    /// 放置尝试: 计算需新借的楼层超额,预算足够才落位
    ///
    /// incremental_extra 只计新增部分 —— 该房间此前已获批的
    /// 超额不再重复从楼层扣除
    fn assign_studio(
        room_state: &mut RoomState,
        studio: &Studio,
        tracker: &mut FloorCapacityTracker,
        diagnostics: &mut Vec<String>,
    ) -> bool {
        let floor_id = room_state.room.floor_id();
        let Some(floor_budget) = tracker.get_mut(&floor_id) else {
            // 数据一致性缺陷: 房间引用了不存在的楼层;跳过该房间,不终止运行
            diagnostics.push(format!("Floor context missing for {}.", room_state.room.name));
            return false;
        };

        let projected_usage = room_state.used_capacity + studio.size;
        let extra_needed = (projected_usage - room_state.room.base_capacity).max(0);
        let incremental_extra = (extra_needed - room_state.extra_used).max(0);

        if !floor_budget.can_grant(incremental_extra) {
            diagnostics.push(format!("No floor buffer left for {}.", room_state.room.name));
            return false;
        }

        floor_budget.extra_capacity_used += incremental_extra;
        room_state.extra_used += incremental_extra;
        room_state.dynamic_capacity = room_state.room.base_capacity + room_state.extra_used;
        room_state.used_capacity = projected_usage;
        room_state.studios.push(studio.clone());

        true
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for RoomPlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}
