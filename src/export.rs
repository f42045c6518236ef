// ==========================================
// 工作室空间分配系统 - 分配结果导出
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 8. 导出口径
// 红线: 列名与分节格式即下游契约,不得随重构漂移
// ==========================================
// 职责: AllocationResult → CSV (字符串或文件)
// 零分配也要产出表头;有未分配工作室时追加独立小节
// ==========================================

use crate::domain::allocation::AllocationResult;
use std::path::Path;
use thiserror::Error;
use tracing::info;

// ==========================================
// 导出错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写出失败: {0}")]
    CsvWriteError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileWriteError(err.to_string())
    }
}

// 表头;顺序与下游表格渲染一致
const HEADER: [&str; 8] = [
    "Room ID",
    "Room Name",
    "Building",
    "Floor",
    "Base Capacity",
    "Dynamic Capacity",
    "Extra Capacity Used",
    "Assigned Studios",
];

/// 渲染分配结果为 CSV 文本
pub fn render_allocation_csv(result: &AllocationResult) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(HEADER)?;

    for assignment in &result.assignments {
        let studio_list = assignment
            .studios
            .iter()
            .map(|studio| format!("{} ({})", studio.id, studio.size))
            .collect::<Vec<_>>()
            .join(" | ");

        writer.write_record([
            assignment.room_id.as_str(),
            assignment.room_name.as_str(),
            assignment.building.as_str(),
            assignment.floor.as_str(),
            &assignment.base_capacity.to_string(),
            &assignment.dynamic_capacity.to_string(),
            &assignment.extra_capacity_used.to_string(),
            &studio_list,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::CsvWriteError(err.to_string()))?;
    let mut content =
        String::from_utf8(bytes).map_err(|err| ExportError::CsvWriteError(err.to_string()))?;

    if !result.unassigned_studios.is_empty() {
        // 空行分节,与历史导出格式一致;小节内固定两列 id,size
        content.push('\n');
        content.push_str("Unassigned Studios\n");
        for studio in &result.unassigned_studios {
            content.push_str(&format!("{},{}\n", studio.id, studio.size));
        }
    }

    Ok(content)
}

/// 渲染并写出到文件
pub fn write_allocation_csv(result: &AllocationResult, path: &Path) -> Result<(), ExportError> {
    let content = render_allocation_csv(result)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), "allocation csv written");
    Ok(())
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::RoomAssignment;
    use crate::domain::program::Studio;
    use crate::domain::types::{RoomId, StudioId};
    use std::collections::BTreeMap;

    fn make_studio(counter: u32, size: i64) -> Studio {
        let mut programs = BTreeMap::new();
        programs.insert("A".to_string(), size);
        Studio {
            id: StudioId::sequential(counter),
            size,
            programs,
        }
    }

    fn empty_result() -> AllocationResult {
        AllocationResult {
            assignments: Vec::new(),
            floor_states: Vec::new(),
            unassigned_studios: Vec::new(),
            studio_to_room: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_header_emitted_even_when_empty() {
        let csv = render_allocation_csv(&empty_result()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Room ID,Room Name,Building,Floor,Base Capacity,Dynamic Capacity,Extra Capacity Used,Assigned Studios"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_unassigned_section_without_assignments() {
        // 零分配 + 非零未分配: 表头与 Unassigned 小节都要出现
        let mut result = empty_result();
        result.unassigned_studios = vec![make_studio(1, 25), make_studio(2, 18)];
        result
            .studio_to_room
            .insert(StudioId::sequential(1), None);
        result
            .studio_to_room
            .insert(StudioId::sequential(2), None);

        let csv = render_allocation_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert!(lines[0].starts_with("Room ID,"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Unassigned Studios");
        assert_eq!(lines[3], "S-001,25");
        assert_eq!(lines[4], "S-002,18");
    }

    #[test]
    fn test_assignment_row_rendering() {
        let mut result = empty_result();
        result.assignments = vec![RoomAssignment {
            room_id: RoomId::new("R1"),
            room_name: "Design Studio (R1)".to_string(),
            building: "BAC".to_string(),
            floor: "L1".to_string(),
            base_capacity: 20,
            dynamic_capacity: 23,
            extra_capacity_used: 3,
            studios: vec![make_studio(1, 15), make_studio(2, 8)],
            member_rooms: None,
        }];

        let csv = render_allocation_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[1],
            "R1,Design Studio (R1),BAC,L1,20,23,3,S-001 (15) | S-002 (8)"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut result = empty_result();
        result.assignments = vec![RoomAssignment {
            room_id: RoomId::new("R1"),
            room_name: "Studio, annex".to_string(),
            building: "BAC".to_string(),
            floor: "L1".to_string(),
            base_capacity: 10,
            dynamic_capacity: 10,
            extra_capacity_used: 0,
            studios: vec![make_studio(1, 10)],
            member_rooms: None,
        }];

        let csv = render_allocation_csv(&result).unwrap();
        assert!(csv.contains("\"Studio, annex\""));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocation-export.csv");

        write_allocation_csv(&empty_result(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Room ID,"));
    }
}
