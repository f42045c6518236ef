// ==========================================
// 工作室空间分配系统 - 分配编排器
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 6. 编排与"换一换"
// ==========================================
// 职责: 组合生成/放置/经费三个引擎为一次完整分配
// 会话状态: 只保留最近提交的 payload 与当前种子,
// 供 rotate() 以 seed+1 重跑;无任何其他跨运行状态
// ==========================================

use crate::config::AppSettings;
use crate::domain::allocation::{AllocationOptions, AllocationResult};
use crate::domain::finance::FinanceInputs;
use crate::domain::program::{ProgramInput, StudioSummary};
use crate::domain::space::{Floor, Room};
use crate::domain::finance::{FinanceSummary, StaffCounts};
use crate::engine::finance::FinanceEngine;
use crate::engine::placement::RoomPlacementEngine;
use crate::engine::studio_generator::{StudioGenerator, StudioOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// AllocationPayload - 一次分配的完整请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPayload {
    pub programs: Vec<ProgramInput>,
    pub studio_cap: i64,
    pub allow_mixing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_students_override: Option<i64>,
    pub semesters_per_year: i64,
    pub ta_compensation: f64,
    pub staff_counts: StaffCounts,
}

// ==========================================
// AllocationRun - 一次分配的产出
// ==========================================
// run_id / generated_at 是运行元数据,不进入 AllocationResult,
// 保证相同输入+种子的放置结果逐字段一致
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRun {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub seed: u32,
    pub studio_summary: StudioSummary,
    pub finance: FinanceSummary,
    pub allocation: Option<AllocationResult>,
}

// ==========================================
// AllocationOrchestrator - 分配编排器
// ==========================================
// 显式会话对象: 调用方持有它,而不是依赖模块级全局状态
pub struct AllocationOrchestrator {
    generator: StudioGenerator,
    placement: RoomPlacementEngine,
    finance: FinanceEngine,
    seed: u32,
    last_payload: Option<AllocationPayload>,
}

impl AllocationOrchestrator {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            generator: StudioGenerator::new(),
            placement: RoomPlacementEngine::new(),
            finance: FinanceEngine::new(settings.finance.clone()),
            seed: settings.allocation.default_seed,
            last_payload: None,
        }
    }

    /// 当前种子(rotate 会推进它)
    pub fn current_seed(&self) -> u32 {
        self.seed
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次完整分配
    ///
    /// 每次调用都从 payload.programs 全新生成工作室 ——
    /// 工作室从不跨运行缓存;"换一换"的代价就是完整重算
    ///
    /// override_seed 只影响本次运行,不持久化;种子推进
    /// 只发生在 rotate()
    #[instrument(skip(self, rooms, floors, payload), fields(
        program_count = payload.programs.len(),
        studio_cap = payload.studio_cap,
        allow_mixing = payload.allow_mixing
    ))]
    pub fn run(
        &mut self,
        rooms: &[Room],
        floors: &[Floor],
        payload: AllocationPayload,
        override_seed: Option<u32>,
    ) -> AllocationRun {
        let effective_seed = override_seed.unwrap_or(self.seed);

        let studio_summary = self.generator.generate(
            &payload.programs,
            &StudioOptions {
                allow_mixing: payload.allow_mixing,
                studio_cap: payload.studio_cap,
            },
        );

        let finance = self.finance.build_summary(
            &studio_summary,
            &FinanceInputs {
                total_students_override: payload.total_students_override,
                studio_cap: payload.studio_cap,
                semesters_per_year: payload.semesters_per_year,
                ta_compensation: payload.ta_compensation,
                staff_counts: payload.staff_counts,
            },
        );

        let allocation = if studio_summary.studios.is_empty() {
            None
        } else {
            Some(self.placement.place(
                rooms,
                floors,
                &studio_summary.studios,
                &AllocationOptions {
                    shuffle_seed: Some(effective_seed),
                },
            ))
        };

        self.last_payload = Some(payload);

        let run = AllocationRun {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            seed: effective_seed,
            studio_summary,
            finance,
            allocation,
        };

        info!(
            run_id = %run.run_id,
            seed = run.seed,
            total_studios = run.studio_summary.total_studios,
            unassigned = run
                .allocation
                .as_ref()
                .map(|a| a.unassigned_studios.len())
                .unwrap_or(0),
            "allocation run finished"
        );

        run
    }

    /// "换一换": 用上次 payload 与 seed+1 重新分配
    ///
    /// 没有历史 payload 时为无操作,返回 None;
    /// 新种子持久化为当前种子,连续 rotate 持续推进
    pub fn rotate(&mut self, rooms: &[Room], floors: &[Floor]) -> Option<AllocationRun> {
        let payload = self.last_payload.clone()?;
        self.seed += 1;
        let seed = self.seed;
        Some(self.run(rooms, floors, payload, Some(seed)))
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{FloorId, RoomId};

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn make_room(id: &str, base_capacity: i64) -> Room {
        Room {
            id: RoomId::new(id),
            building: "BAC".to_string(),
            floor: "L1".to_string(),
            name: format!("Room {}", id),
            base_capacity,
            area: base_capacity as f64,
            combined_members: None,
            member_rooms: None,
            mode: None,
            included: true,
        }
    }

    fn make_floor(base: i64, total: i64) -> Floor {
        Floor {
            id: FloorId::from_parts("BAC", "L1"),
            building: "BAC".to_string(),
            floor: "L1".to_string(),
            total_area: base as f64,
            total_capacity: total,
            base_capacity: base,
        }
    }

    fn make_payload(sizes: &[i64]) -> AllocationPayload {
        AllocationPayload {
            programs: sizes
                .iter()
                .enumerate()
                .map(|(index, size)| ProgramInput {
                    id: format!("p{}", index + 1),
                    label: format!("P{}", index + 1),
                    size: *size,
                })
                .collect(),
            studio_cap: 20,
            allow_mixing: false,
            total_students_override: None,
            semesters_per_year: 2,
            ta_compensation: 12_000.0,
            staff_counts: StaffCounts {
                faculty: 1,
                ta_fa: 2,
                grader: 1,
            },
        }
    }

    fn test_orchestrator() -> AllocationOrchestrator {
        AllocationOrchestrator::new(&AppSettings::default())
    }

    // ==========================================
    // 行为测试
    // ==========================================

    #[test]
    fn test_run_produces_full_output() {
        let mut orchestrator = test_orchestrator();
        let rooms = vec![make_room("R1", 25), make_room("R2", 25)];
        let floors = vec![make_floor(50, 58)];

        let run = orchestrator.run(&rooms, &floors, make_payload(&[40]), None);

        assert_eq!(run.seed, 17);
        assert_eq!(run.studio_summary.total_studios, 2);
        assert!(!run.run_id.is_empty());
        let allocation = run.allocation.expect("allocation present");
        assert!(allocation.unassigned_studios.is_empty());
        assert_eq!(run.finance.auto_total_students, 40);
    }

    #[test]
    fn test_no_studios_skips_placement() {
        let mut orchestrator = test_orchestrator();
        let rooms = vec![make_room("R1", 25)];
        let floors = vec![make_floor(25, 29)];

        let run = orchestrator.run(&rooms, &floors, make_payload(&[0]), None);

        assert!(run.allocation.is_none());
        assert_eq!(run.studio_summary.total_studios, 0);
        // 经费汇总仍然产出
        assert_eq!(run.finance.number_of_studios, 0);
    }

    #[test]
    fn test_rotate_without_payload_is_noop() {
        let mut orchestrator = test_orchestrator();
        let rooms = vec![make_room("R1", 25)];
        let floors = vec![make_floor(25, 29)];

        assert!(orchestrator.rotate(&rooms, &floors).is_none());
        assert_eq!(orchestrator.current_seed(), 17);
    }

    #[test]
    fn test_rotate_advances_seed_and_reuses_payload() {
        let mut orchestrator = test_orchestrator();
        let rooms: Vec<Room> = (1..=4)
            .map(|i| make_room(&format!("R{}", i), 20))
            .collect();
        let floors = vec![make_floor(80, 92)];

        let first = orchestrator.run(&rooms, &floors, make_payload(&[35, 25]), None);
        assert_eq!(first.seed, 17);

        let second = orchestrator.rotate(&rooms, &floors).expect("payload stored");
        assert_eq!(second.seed, 18);
        assert_eq!(orchestrator.current_seed(), 18);

        let third = orchestrator.rotate(&rooms, &floors).expect("payload stored");
        assert_eq!(third.seed, 19);

        // 工作室每次重新生成,内容一致
        assert_eq!(first.studio_summary, second.studio_summary);
        assert_eq!(second.studio_summary, third.studio_summary);
    }

    #[test]
    fn test_same_seed_reruns_are_identical() {
        let mut orchestrator = test_orchestrator();
        let rooms: Vec<Room> = (1..=4)
            .map(|i| make_room(&format!("R{}", i), 20))
            .collect();
        let floors = vec![make_floor(80, 92)];

        let first = orchestrator.run(&rooms, &floors, make_payload(&[35, 25]), Some(33));
        let second = orchestrator.run(&rooms, &floors, make_payload(&[35, 25]), Some(33));

        assert_eq!(first.allocation, second.allocation);
    }

    #[test]
    fn test_override_seed_not_persisted() {
        let mut orchestrator = test_orchestrator();
        let rooms = vec![make_room("R1", 25)];
        let floors = vec![make_floor(25, 29)];

        let run = orchestrator.run(&rooms, &floors, make_payload(&[10]), Some(99));
        assert_eq!(run.seed, 99);
        assert_eq!(orchestrator.current_seed(), 17);

        // rotate 从持久种子推进,而不是 override
        let rotated = orchestrator.rotate(&rooms, &floors).unwrap();
        assert_eq!(rotated.seed, 18);
    }
}
