// ==========================================
// 工作室空间分配系统 - 人员经费估算引擎
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 7. 人员经费估算
// ==========================================
// 职责: 由生成结果与人员配置计算成本分解
// 纯算术,无 I/O;费率通过配置层注入
// ==========================================

use crate::config::FinanceSettings;
use crate::domain::finance::{CompensationBreakdown, FinanceInputs, FinanceSummary, StaffCounts};
use crate::domain::program::StudioSummary;
use tracing::instrument;

// 角色成本行的静态口径
struct RoleConfig {
    role: &'static str,
    count: fn(&StaffCounts) -> i64,
    // None 表示使用 ta_compensation × semesters_per_year
    fixed_compensation: Option<fn(&FinanceSettings) -> f64>,
    ere_rate: fn(&FinanceSettings) -> f64,
}

const COMPENSATION_MATRIX: [RoleConfig; 3] = [
    RoleConfig {
        role: "Faculty",
        count: |counts| counts.faculty,
        fixed_compensation: Some(|settings| settings.faculty_compensation),
        ere_rate: |settings| settings.faculty_ere_rate,
    },
    RoleConfig {
        role: "FA / TA",
        count: |counts| counts.ta_fa,
        fixed_compensation: None,
        ere_rate: |settings| settings.ta_fa_ere_rate,
    },
    RoleConfig {
        role: "Grader",
        count: |counts| counts.grader,
        fixed_compensation: Some(|settings| settings.grader_compensation),
        ere_rate: |settings| settings.grader_ere_rate,
    },
];

// ==========================================
// FinanceEngine - 经费估算引擎
// ==========================================
pub struct FinanceEngine {
    settings: FinanceSettings,
}

impl FinanceEngine {
    pub fn new(settings: FinanceSettings) -> Self {
        Self { settings }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 构建经费估算汇总
    ///
    /// - effective_total_students: 覆写值优先,否则取生成结果
    /// - number_of_studios = ceil(effective / studio_cap),cap ≤ 0 时为 0
    /// - 年度/学期成本沿用 FA/TA 行口径
    #[instrument(skip(self, studio_summary, inputs))]
    pub fn build_summary(
        &self,
        studio_summary: &StudioSummary,
        inputs: &FinanceInputs,
    ) -> FinanceSummary {
        let auto_total_students = studio_summary.total_students;
        let effective_total_students = inputs
            .total_students_override
            .unwrap_or(auto_total_students);

        let number_of_studios = if inputs.studio_cap > 0 {
            div_ceil(effective_total_students.max(0), inputs.studio_cap)
        } else {
            0
        };
        let suggested_ta_count = number_of_studios;

        let breakdown = self.build_breakdown(inputs);

        let total_annual_cost: f64 = breakdown.iter().map(|row| row.total_cost).sum();

        // 年度/学期成本只看 FA/TA 行(历史口径)
        let ta_fa_row = breakdown.iter().find(|row| row.role.starts_with("FA / TA"));
        let cost_per_year = ta_fa_row.map(|row| row.total_cost).unwrap_or(0.0);
        let cost_per_semester = ta_fa_row
            .map(|row| row.total_cost / inputs.semesters_per_year as f64)
            .unwrap_or(0.0);

        FinanceSummary {
            auto_total_students,
            effective_total_students,
            number_of_studios,
            suggested_ta_count,
            staff_counts: inputs.staff_counts,
            cost_per_semester,
            cost_per_year,
            total_annual_cost,
            breakdown,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 按角色矩阵逐行计算成本分解
    fn build_breakdown(&self, inputs: &FinanceInputs) -> Vec<CompensationBreakdown> {
        COMPENSATION_MATRIX
            .iter()
            .map(|entry| {
                let count = (entry.count)(&inputs.staff_counts);
                let base_compensation = match entry.fixed_compensation {
                    Some(fixed) => fixed(&self.settings),
                    None => inputs.ta_compensation * inputs.semesters_per_year as f64,
                };

                let compensation = base_compensation * count as f64;
                let ere = compensation * (entry.ere_rate)(&self.settings);
                let risk = compensation * self.settings.risk_rate;
                let tech_fee = compensation * self.settings.tech_fee_rate;
                let subtotal = compensation + ere + risk + tech_fee;
                let admin_charge = subtotal * self.settings.admin_service_rate;
                let total_cost = subtotal + admin_charge;

                CompensationBreakdown {
                    role: format!("{} (x{})", entry.role, count),
                    compensation,
                    ere,
                    risk,
                    tech_fee,
                    admin_charge,
                    total_cost,
                }
            })
            .collect()
    }
}

/// 非负整数向上取整除法
fn div_ceil(dividend: i64, divisor: i64) -> i64 {
    (dividend + divisor - 1) / divisor
}
