// ==========================================
// 工作室空间分配系统 - 空间数据导入引擎
// ==========================================
// 依据: Space_Data_Mapping_v0.1.md - 空间台账字段映射
// ==========================================
// 职责: CSV 导入 + 行归一化 + 合并空间组装 + 楼层汇总
// 红线: 不含 UI 逻辑;行级数据问题按跳过处理,不中断导入
// ==========================================

use crate::config::AllocationSettings;
use crate::domain::space::{Floor, MemberRoom, Room, SpaceDataset};
use crate::domain::types::{FloorId, RoomId};
use crate::importer::error::ImportError;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// 原始行结构
// ==========================================

/// 空间台账行 (space_division.csv)
///
/// BUILDING/LEVEL 为合并单元格导出口径: 空值沿用上一非空行
#[derive(Debug, Clone, Deserialize)]
struct SpaceDivisionRow {
    #[serde(rename = "BUILDING", default)]
    building: Option<String>,
    #[serde(rename = "LEVEL", default)]
    level: Option<String>,
    #[serde(rename = "STUDIO", default)]
    studio: Option<String>,
    #[serde(rename = "ROOM", default)]
    room: Option<String>,
    #[serde(rename = "ASTRA OCCUPANCY", default)]
    occupancy: Option<String>,
}

/// 合并空间行 (combined_spaces.csv)
#[derive(Debug, Clone, Deserialize)]
struct CombinedSpaceRow {
    #[serde(default)]
    combined_id: Option<String>,
    #[serde(default)]
    members: Option<String>,
    #[serde(default)]
    capacity_override: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

// ==========================================
// SpaceImporter - 空间数据导入引擎
// ==========================================
pub struct SpaceImporter {
    floor_buffer_ratio: f64,
}

impl SpaceImporter {
    pub fn new(settings: &AllocationSettings) -> Self {
        Self {
            floor_buffer_ratio: settings.floor_buffer_ratio,
        }
    }

    /// 显式指定缓冲比例(测试与工具场景)
    pub fn with_buffer_ratio(floor_buffer_ratio: f64) -> Self {
        Self { floor_buffer_ratio }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 从两份 CSV 文件装配空间数据集(主入口)
    ///
    /// # 流程
    /// 1. 解析空间台账 → 归一化为普通房间
    /// 2. 解析合并空间 → 组装 Zone,吸收成员房间
    /// 3. 未被吸收的普通房间与 Zone 共同构成最终房间表
    /// 4. 按楼层汇总容量,套缓冲比例得到 total_capacity
    #[instrument(skip(self), fields(
        space_path = %space_path.display(),
        combined_path = %combined_path.display()
    ))]
    pub fn load_dataset(
        &self,
        space_path: &Path,
        combined_path: &Path,
    ) -> Result<SpaceDataset, ImportError> {
        for path in [space_path, combined_path] {
            if !path.exists() {
                return Err(ImportError::FileNotFound(path.display().to_string()));
            }
        }

        let space_csv = std::fs::read_to_string(space_path)?;
        let combined_csv = std::fs::read_to_string(combined_path)?;
        self.dataset_from_csv(&space_csv, &combined_csv)
    }

    /// 从内存中的 CSV 文本装配数据集
    pub fn dataset_from_csv(
        &self,
        space_csv: &str,
        combined_csv: &str,
    ) -> Result<SpaceDataset, ImportError> {
        let space_rows = Self::parse_rows::<SpaceDivisionRow>(space_csv)?;
        let combined_rows = Self::parse_rows::<CombinedSpaceRow>(combined_csv)?;

        let raw_rooms = Self::normalize_space_rows(space_rows);
        let (mut rooms, consumed) = Self::build_zones(&raw_rooms, combined_rows);

        // 未被 Zone 吸收的普通房间保留
        for room in &raw_rooms {
            if !consumed.contains(&room.id) {
                rooms.push(room.clone());
            }
        }

        let floors = self.summarize_floors(&rooms);

        info!(
            room_count = rooms.len(),
            floor_count = floors.len(),
            "space dataset assembled"
        );

        Ok(SpaceDataset { rooms, floors })
    }

    // ==========================================
    // 解析与归一化
    // ==========================================

    fn parse_rows<T: for<'de> Deserialize<'de>>(csv_text: &str) -> Result<Vec<T>, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.deserialize() {
            rows.push(result?);
        }
        Ok(rows)
    }

    /// 空间台账行 → 普通房间
    ///
    /// - BUILDING/LEVEL 空值沿用上一非空行
    /// - 无 ROOM 或无正容量的行跳过
    /// - 无面积数据,以容量作为面积代理
    fn normalize_space_rows(rows: Vec<SpaceDivisionRow>) -> Vec<Room> {
        let mut current_building = String::new();
        let mut current_level = String::new();
        let mut rooms = Vec::new();

        for row in rows {
            if let Some(building) = non_blank(row.building.as_deref()) {
                current_building = building;
            }
            if let Some(level) = non_blank(row.level.as_deref()) {
                current_level = level;
            }

            let Some(room_id) = non_blank(row.room.as_deref()) else {
                continue;
            };

            let base_capacity = parse_capacity(row.occupancy.as_deref().unwrap_or(""));
            if base_capacity <= 0 {
                debug!(room_id, "row skipped: no usable occupancy");
                continue;
            }

            let name = build_room_name(row.studio.as_deref(), &room_id);

            rooms.push(Room {
                id: RoomId::new(room_id),
                building: current_building.clone(),
                floor: current_level.clone(),
                name,
                base_capacity,
                area: base_capacity as f64,
                combined_members: None,
                member_rooms: None,
                mode: None,
                included: true,
            });
        }

        rooms
    }

    /// 合并空间行 → Zone,并记录被吸收的成员房间
    fn build_zones(
        raw_rooms: &[Room],
        combined_rows: Vec<CombinedSpaceRow>,
    ) -> (Vec<Room>, HashSet<RoomId>) {
        let room_map: HashMap<&RoomId, &Room> =
            raw_rooms.iter().map(|room| (&room.id, room)).collect();

        let mut consumed: HashSet<RoomId> = HashSet::new();
        let mut zones: Vec<Room> = Vec::new();

        for record in combined_rows {
            let Some(combined_id) = non_blank(record.combined_id.as_deref()) else {
                continue;
            };

            let member_ids: Vec<RoomId> = record
                .members
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(RoomId::new)
                .collect();

            if member_ids.is_empty() {
                continue;
            }

            let member_rooms: Vec<&Room> = member_ids
                .iter()
                .filter_map(|id| room_map.get(id).copied())
                .collect();

            if member_rooms.is_empty() {
                warn!(combined_id, "zone skipped: no resolvable member rooms");
                continue;
            }

            for room in &member_rooms {
                consumed.insert(room.id.clone());
            }

            let capacity_override =
                parse_capacity(record.capacity_override.as_deref().unwrap_or(""));
            let base_capacity = if capacity_override > 0 {
                capacity_override
            } else {
                member_rooms.iter().map(|room| room.base_capacity).sum()
            };
            let area: f64 = member_rooms.iter().map(|room| room.area).sum();

            // Zone 的楼栋/楼层取第一个成员
            let reference = member_rooms[0];

            let member_details: Vec<MemberRoom> = member_rooms
                .iter()
                .map(|room| MemberRoom {
                    id: room.id.clone(),
                    name: room.name.clone(),
                    capacity: room.base_capacity,
                    included: true,
                })
                .collect();

            zones.push(Room {
                id: RoomId::new(combined_id.clone()),
                building: reference.building.clone(),
                floor: reference.floor.clone(),
                name: format!("Zone {}", combined_id),
                base_capacity,
                area,
                combined_members: Some(member_ids),
                member_rooms: Some(member_details),
                mode: non_blank(record.mode.as_deref()),
                included: true,
            });
        }

        (zones, consumed)
    }

    /// 按 building+floor 聚合房间,套缓冲比例
    fn summarize_floors(&self, rooms: &[Room]) -> Vec<Floor> {
        let mut floor_map: HashMap<FloorId, Floor> = HashMap::new();
        let mut order: Vec<FloorId> = Vec::new();

        for room in rooms {
            let floor_id = room.floor_id();
            let entry = floor_map.entry(floor_id.clone()).or_insert_with(|| {
                order.push(floor_id.clone());
                Floor {
                    id: floor_id,
                    building: room.building.clone(),
                    floor: room.floor.clone(),
                    total_area: 0.0,
                    total_capacity: 0,
                    base_capacity: 0,
                }
            });

            entry.total_area += room.area;
            entry.base_capacity += room.base_capacity;
            entry.total_capacity =
                (entry.base_capacity as f64 * (1.0 + self.floor_buffer_ratio)).round() as i64;
        }

        order
            .into_iter()
            .filter_map(|id| floor_map.remove(&id))
            .collect()
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 去除首尾空白,空串归一为 None
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// 宽松数值解析: 剥离非数字字符后按 f64 解析,失败得 0
fn parse_capacity(value: &str) -> i64 {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed as i64,
        _ => 0,
    }
}

/// 房间显示名: STUDIO 非空且非 "-" 时为 "{studio} ({id})",否则 "Room {id}"
fn build_room_name(studio: Option<&str>, room_id: &str) -> String {
    let cleaned = studio
        .unwrap_or("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if !cleaned.is_empty() && cleaned != "-" {
        format!("{} ({})", cleaned, room_id)
    } else {
        format!("Room {}", room_id)
    }
}
