// ==========================================
// 工作室空间分配系统 - 引擎层
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 1.2 模块拆分
// ==========================================
// 职责: 实现分配业务规则,不做 I/O
// 红线: 所有放置失败必须输出 reason 到 diagnostics
// ==========================================

pub mod capacity_tracker;
pub mod finance;
pub mod orchestrator;
pub mod placement;
pub mod shuffle;
pub mod studio_generator;

// 重导出核心引擎
pub use capacity_tracker::{FloorBudget, FloorCapacityTracker};
pub use finance::FinanceEngine;
pub use orchestrator::{AllocationOrchestrator, AllocationPayload, AllocationRun};
pub use placement::{RoomPlacementEngine, DEFAULT_SHUFFLE_SEED};
pub use shuffle::{shuffle_with_seed, SeededLcg};
pub use studio_generator::{StudioGenerator, StudioOptions};
