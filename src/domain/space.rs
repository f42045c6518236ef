// ==========================================
// 工作室空间分配系统 - 空间领域模型
// ==========================================
// 依据: Space_Data_Mapping_v0.1.md - 空间台账与合并空间
// 用途: 房间/楼层实体,房间勾选状态管理
// ==========================================

use crate::domain::types::{FloorId, RoomId};
use serde::{Deserialize, Serialize};

fn default_included() -> bool {
    true
}

// ==========================================
// MemberRoom - 合并空间成员房间
// ==========================================
// 用途: Zone 内单个物理房间的勾选与容量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRoom {
    pub id: RoomId,
    pub name: String,
    pub capacity: i64,
    #[serde(default = "default_included")]
    pub included: bool,
}

// ==========================================
// Room - 放置目标
// ==========================================
// 可为普通房间,或聚合多个成员房间的 Zone
// 红线: 分配运行期间只读,勾选操作只在运行之间发生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub building: String,
    pub floor: String,
    pub name: String,

    // ===== 容量 =====
    pub base_capacity: i64, // Zone 的有效基础容量 = 已勾选成员容量之和
    pub area: f64,          // 无面积数据时以容量代理

    // ===== 合并空间 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_members: Option<Vec<RoomId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_rooms: Option<Vec<MemberRoom>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    // ===== 勾选状态 =====
    #[serde(default = "default_included")]
    pub included: bool,
}

impl Room {
    /// 房间所属楼层的复合键
    pub fn floor_id(&self) -> FloorId {
        FloorId::from_parts(&self.building, &self.floor)
    }

    /// 是否为合并空间 (Zone)
    pub fn is_zone(&self) -> bool {
        self.member_rooms.is_some()
    }
}

// ==========================================
// Floor - 楼层聚合
// ==========================================
// 聚合同一 building+floor 下全部房间
// total_capacity = round(base_capacity × (1 + buffer_ratio))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    pub building: String,
    pub floor: String,
    pub total_area: f64,
    pub total_capacity: i64,
    pub base_capacity: i64,
}

// ==========================================
// SpaceDataset - 空间数据集
// ==========================================
// 导入层产物: 最终房间列表(含 Zone) + 楼层汇总
// 勾选操作在此落地,分配引擎只消费快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceDataset {
    pub rooms: Vec<Room>,
    pub floors: Vec<Floor>,
}

impl SpaceDataset {
    /// 勾选/取消整间房间(或整个 Zone)
    pub fn toggle_room(&mut self, room_id: &RoomId, included: bool) {
        if let Some(room) = self.rooms.iter_mut().find(|room| &room.id == room_id) {
            room.included = included;
        }
    }

    /// 勾选/取消 Zone 内单个成员房间
    ///
    /// 重新计算 Zone 的有效基础容量 = 已勾选成员容量之和;
    /// 所有成员都被取消时,整个 Zone 退出本轮分配
    pub fn toggle_member_room(&mut self, zone_id: &RoomId, member_id: &RoomId, included: bool) {
        let Some(zone) = self.rooms.iter_mut().find(|room| &room.id == zone_id) else {
            return;
        };
        let Some(members) = zone.member_rooms.as_mut() else {
            return;
        };

        if let Some(member) = members.iter_mut().find(|member| &member.id == member_id) {
            member.included = included;
        }

        let included_capacity: i64 = members
            .iter()
            .filter(|member| member.included)
            .map(|member| member.capacity)
            .sum();
        let any_included = members.iter().any(|member| member.included);

        zone.base_capacity = included_capacity;
        zone.included = any_included;
    }

    /// 当前参与分配的房间数
    pub fn included_room_count(&self) -> usize {
        self.rooms.iter().filter(|room| room.included).count()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn make_zone() -> Room {
        Room {
            id: RoomId::new("Z1"),
            building: "BAC".to_string(),
            floor: "L2".to_string(),
            name: "Zone Z1".to_string(),
            base_capacity: 50,
            area: 50.0,
            combined_members: Some(vec![RoomId::new("R201"), RoomId::new("R202")]),
            member_rooms: Some(vec![
                MemberRoom {
                    id: RoomId::new("R201"),
                    name: "Room R201".to_string(),
                    capacity: 30,
                    included: true,
                },
                MemberRoom {
                    id: RoomId::new("R202"),
                    name: "Room R202".to_string(),
                    capacity: 20,
                    included: true,
                },
            ]),
            mode: None,
            included: true,
        }
    }

    #[test]
    fn test_toggle_member_recomputes_zone_capacity() {
        let mut dataset = SpaceDataset {
            rooms: vec![make_zone()],
            floors: vec![],
        };

        dataset.toggle_member_room(&RoomId::new("Z1"), &RoomId::new("R202"), false);

        let zone = &dataset.rooms[0];
        assert_eq!(zone.base_capacity, 30);
        assert!(zone.included);
    }

    #[test]
    fn test_all_members_excluded_deactivates_zone() {
        let mut dataset = SpaceDataset {
            rooms: vec![make_zone()],
            floors: vec![],
        };

        dataset.toggle_member_room(&RoomId::new("Z1"), &RoomId::new("R201"), false);
        dataset.toggle_member_room(&RoomId::new("Z1"), &RoomId::new("R202"), false);

        let zone = &dataset.rooms[0];
        assert_eq!(zone.base_capacity, 0);
        assert!(!zone.included);
        assert_eq!(dataset.included_room_count(), 0);
    }

    #[test]
    fn test_toggle_room_roundtrip() {
        let mut dataset = SpaceDataset {
            rooms: vec![make_zone()],
            floors: vec![],
        };

        dataset.toggle_room(&RoomId::new("Z1"), false);
        assert!(!dataset.rooms[0].included);

        dataset.toggle_room(&RoomId::new("Z1"), true);
        assert!(dataset.rooms[0].included);
    }
}
