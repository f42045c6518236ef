// ==========================================
// 工作室空间分配系统 - 经费领域模型
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 7. 人员经费估算
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// StaffCounts - 各角色人数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCounts {
    pub faculty: i64,
    pub ta_fa: i64,
    pub grader: i64,
}

// ==========================================
// FinanceInputs - 经费估算输入
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceInputs {
    /// 人工覆写的学生总数;None 时使用生成结果的 total_students
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_students_override: Option<i64>,
    pub studio_cap: i64,
    pub semesters_per_year: i64,
    pub ta_compensation: f64,
    pub staff_counts: StaffCounts,
}

// ==========================================
// CompensationBreakdown - 单角色成本行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationBreakdown {
    pub role: String,
    pub compensation: f64,
    pub ere: f64,
    pub risk: f64,
    pub tech_fee: f64,
    pub admin_charge: f64,
    pub total_cost: f64,
}

// ==========================================
// FinanceSummary - 经费估算汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub auto_total_students: i64,
    pub effective_total_students: i64,
    pub number_of_studios: i64,
    pub suggested_ta_count: i64,
    pub staff_counts: StaffCounts,
    pub cost_per_semester: f64,
    pub cost_per_year: f64,
    pub total_annual_cost: f64,
    pub breakdown: Vec<CompensationBreakdown>,
}
