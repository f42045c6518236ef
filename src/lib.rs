// ==========================================
// 工作室空间分配系统 - 核心库
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 系统总览
// 技术栈: Rust + CSV 数据源
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 分配结果 CSV
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FloorId, PlacementStrategy, RoomId, StudioId};

// 领域实体
pub use domain::{
    AllocationOptions, AllocationResult, CompensationBreakdown, FinanceInputs, FinanceSummary,
    Floor, FloorAllocationState, MemberRoom, ProgramInput, Room, RoomAssignment, SpaceDataset,
    StaffCounts, Studio, StudioSummary,
};

// 引擎
pub use engine::{
    AllocationOrchestrator, AllocationPayload, AllocationRun, FinanceEngine, FloorCapacityTracker,
    RoomPlacementEngine, StudioGenerator, StudioOptions,
};

// 导入
pub use importer::SpaceImporter;

// 配置
pub use config::{AllocationSettings, AppSettings, FinanceSettings};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工作室空间分配系统";

// ==========================================
// 预编译检查
// ==========================================
