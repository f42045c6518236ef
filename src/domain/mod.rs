// ==========================================
// 工作室空间分配系统 - 领域层
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 1. 数据模型
// ==========================================
// 职责: 实体与值类型定义,不含业务规则
// ==========================================

pub mod allocation;
pub mod finance;
pub mod program;
pub mod space;
pub mod types;

// 重导出领域实体
pub use allocation::{AllocationOptions, AllocationResult, FloorAllocationState, RoomAssignment};
pub use finance::{CompensationBreakdown, FinanceInputs, FinanceSummary, StaffCounts};
pub use program::{ProgramInput, Studio, StudioSummary};
pub use space::{Floor, MemberRoom, Room, SpaceDataset};
