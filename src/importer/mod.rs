// ==========================================
// 工作室空间分配系统 - 导入层
// ==========================================
// 依据: Space_Data_Mapping_v0.1.md
// ==========================================
// 职责: 外部 CSV 数据 → 领域空间数据集
// 红线: 导入在分配运行开始前完成,核心算法不观察流式输入
// ==========================================

pub mod error;
pub mod space_importer;

// 重导出
pub use error::ImportError;
pub use space_importer::SpaceImporter;
