// ==========================================
// 放置引擎集成测试
// ==========================================
// 目标: 通过公开 API 验证房间放置 + 楼层缓冲的组合行为

use studio_space_aps::domain::types::{FloorId, RoomId, StudioId};
use studio_space_aps::engine::RoomPlacementEngine;
use studio_space_aps::{AllocationOptions, AllocationResult, Floor, Room, Studio};

fn room(id: &str, building: &str, floor: &str, base_capacity: i64) -> Room {
    Room {
        id: RoomId::new(id),
        building: building.to_string(),
        floor: floor.to_string(),
        name: format!("Room {}", id),
        base_capacity,
        area: base_capacity as f64,
        combined_members: None,
        member_rooms: None,
        mode: None,
        included: true,
    }
}

fn floor(building: &str, label: &str, base: i64, total: i64) -> Floor {
    Floor {
        id: FloorId::from_parts(building, label),
        building: building.to_string(),
        floor: label.to_string(),
        total_area: base as f64,
        total_capacity: total,
        base_capacity: base,
    }
}

fn studio(index: u32, size: i64) -> Studio {
    Studio {
        id: StudioId::sequential(index),
        size,
        programs: [("ARCH".to_string(), size)].into_iter().collect(),
    }
}

/// 每个工作室要么恰好出现在一个房间,要么在 unassigned 中
fn assert_partition(result: &AllocationResult, studios: &[Studio]) {
    for s in studios {
        let placed = result
            .assignments
            .iter()
            .flat_map(|a| &a.studios)
            .filter(|placed| placed.id == s.id)
            .count();
        let unassigned = result
            .unassigned_studios
            .iter()
            .filter(|u| u.id == s.id)
            .count();
        assert_eq!(placed + unassigned, 1, "studio {} 必须恰好出现一次", s.id);

        let mapping = result.studio_to_room.get(&s.id).expect("映射完整");
        assert_eq!(mapping.is_some(), placed == 1);
    }
}

#[test]
fn test_empty_inputs_short_circuit() {
    let engine = RoomPlacementEngine::new();
    let studios = vec![studio(1, 10)];

    let result = engine.place(&[], &[], &studios, &AllocationOptions::default());

    assert!(result.assignments.is_empty());
    assert_eq!(result.unassigned_studios, studios);
    assert_eq!(
        result.diagnostics,
        vec!["No room or floor data available.".to_string()]
    );
}

#[test]
fn test_excluded_rooms_are_invisible() {
    let engine = RoomPlacementEngine::new();
    let mut excluded = room("R1", "BAC", "L1", 40);
    excluded.included = false;
    let rooms = vec![excluded, room("R2", "BAC", "L1", 12)];
    let floors = vec![floor("BAC", "L1", 52, 59)];
    let studios = vec![studio(1, 12)];

    let result = engine.place(&rooms, &floors, &studios, &AllocationOptions::default());

    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].room_id, RoomId::new("R2"));
}

#[test]
fn test_capacity_invariants_hold_across_seeds() {
    let engine = RoomPlacementEngine::new();
    let rooms = vec![
        room("R1", "BAC", "L1", 18),
        room("R2", "BAC", "L1", 14),
        room("R3", "BAC", "L2", 22),
        room("R4", "WST", "L1", 10),
    ];
    let floors = vec![
        floor("BAC", "L1", 32, 37),
        floor("BAC", "L2", 22, 25),
        floor("WST", "L1", 10, 12),
    ];
    let studios: Vec<Studio> = [16, 14, 12, 10, 8]
        .iter()
        .enumerate()
        .map(|(i, size)| studio(i as u32 + 1, *size))
        .collect();

    for seed in 17..40 {
        let result = engine.place(
            &rooms,
            &floors,
            &studios,
            &AllocationOptions {
                shuffle_seed: Some(seed),
            },
        );

        assert_partition(&result, &studios);

        // 房间不得超过 dynamic(含已借额度)
        for assignment in &result.assignments {
            let used: i64 = assignment.studios.iter().map(|s| s.size).sum();
            assert!(
                used <= assignment.base_capacity + assignment.extra_capacity_used,
                "seed={} room={} used={} 超出可用容量",
                seed,
                assignment.room_id,
                used
            );
        }

        // 楼层缓冲不得透支
        for state in &result.floor_states {
            assert!(state.extra_capacity_used <= state.extra_capacity_allowed);
            assert_eq!(
                state.remaining_buffer,
                state.extra_capacity_allowed - state.extra_capacity_used
            );
        }

        // 楼层借用总量 = 各房间借用之和
        let room_extra: i64 = result
            .assignments
            .iter()
            .map(|a| a.extra_capacity_used)
            .sum();
        let floor_extra: i64 = result
            .floor_states
            .iter()
            .map(|s| s.extra_capacity_used)
            .sum();
        assert_eq!(room_extra, floor_extra, "seed={}", seed);
    }
}

#[test]
fn test_same_seed_is_deterministic() {
    let engine = RoomPlacementEngine::new();
    let rooms = vec![
        room("R1", "BAC", "L1", 20),
        room("R2", "BAC", "L1", 20),
        room("R3", "BAC", "L1", 20),
    ];
    let floors = vec![floor("BAC", "L1", 60, 69)];
    let studios: Vec<Studio> = (1..=3).map(|i| studio(i, 18)).collect();
    let options = AllocationOptions {
        shuffle_seed: Some(21),
    };

    let first = engine.place(&rooms, &floors, &studios, &options);
    let second = engine.place(&rooms, &floors, &studios, &options);

    assert_eq!(first, second);
}

#[test]
fn test_oversized_studio_marked_unassignable() {
    let engine = RoomPlacementEngine::new();
    let rooms = vec![room("R1", "BAC", "L1", 10)];
    let floors = vec![floor("BAC", "L1", 10, 12)];
    let studios = vec![studio(1, 30)];

    let result = engine.place(&rooms, &floors, &studios, &AllocationOptions::default());

    assert!(result.assignments.is_empty());
    assert_eq!(result.unassigned_studios.len(), 1);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d == "Unable to place S-001 (size 30). Marked as unassignable."));
}

#[test]
fn test_floor_buffer_shared_between_rooms() {
    let engine = RoomPlacementEngine::new();
    // 两个房间共享同一层仅 4 人的缓冲
    let rooms = vec![room("R1", "BAC", "L1", 10), room("R2", "BAC", "L1", 10)];
    let floors = vec![floor("BAC", "L1", 20, 24)];
    let studios = vec![studio(1, 13), studio(2, 13)];

    let result = engine.place(&rooms, &floors, &studios, &AllocationOptions::default());

    // 第一个超额 3 人可借,第二个只剩 1 人缓冲,放不下
    assert_eq!(result.assigned_count(), 1);
    assert_eq!(result.unassigned_studios.len(), 1);
    let state = &result.floor_states[0];
    assert_eq!(state.extra_capacity_used, 3);
    assert_eq!(state.remaining_buffer, 1);
}
