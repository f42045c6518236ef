// ==========================================
// 工作室空间分配系统 - 工作室生成引擎
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 2. 工作室生成
// 红线: 不修改调用方的 programs,只消耗私有副本
// ==========================================
// 职责: 项目人数 + 混班策略 → 定长工作室列表
// 输出: StudioSummary (studios / total_students / remainder)
// ==========================================

use crate::domain::program::{ProgramInput, Studio, StudioSummary};
use crate::domain::types::StudioId;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// ==========================================
// StudioOptions - 生成选项
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct StudioOptions {
    pub allow_mixing: bool,
    pub studio_cap: i64,
}

// ==========================================
// StudioGenerator - 工作室生成引擎
// ==========================================
pub struct StudioGenerator {
    // 无状态引擎,不需要注入依赖
}

// 生成过程中的剩余人数记账(私有副本)
struct RemainingProgram {
    label: String,
    size: i64,
}

impl StudioGenerator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 由项目人数生成工作室
    ///
    /// 规则:
    /// 1) 过滤非正人数项目;total_students 在消耗前统计
    /// 2) 非混班: 每个项目独立按 min(studio_cap, remaining) 切分至耗尽
    /// 3) 混班: share = clamp(floor(cap/项目数), 1, cap),每轮取
    ///    possible = min_i floor(remaining_i/share);possible 为 0 则
    ///    share 递减重试,share 减到 0 时终止;否则产出 possible 个
    ///    工作室,每个从每个项目同时取走 share 人
    /// 4) 工作室 ID 全程单调递增 (S-001, S-002, ...)
    /// 5) remainder = 各项目未消耗人数之和,两种模式都要计算
    #[instrument(skip(self, programs), fields(
        program_count = programs.len(),
        allow_mixing = options.allow_mixing,
        studio_cap = options.studio_cap
    ))]
    pub fn generate(&self, programs: &[ProgramInput], options: &StudioOptions) -> StudioSummary {
        let mut remaining: Vec<RemainingProgram> = programs
            .iter()
            .filter(|program| program.size > 0)
            .map(|program| RemainingProgram {
                label: program.label.clone(),
                size: program.size,
            })
            .collect();

        let total_students: i64 = remaining.iter().map(|program| program.size).sum();

        if total_students == 0 || options.studio_cap <= 0 {
            return StudioSummary::empty();
        }

        let mut studios: Vec<Studio> = Vec::new();
        let mut counter: u32 = 1;

        if options.allow_mixing {
            self.generate_mixed(&mut remaining, options.studio_cap, &mut studios, &mut counter);
        } else {
            self.generate_unmixed(&mut remaining, options.studio_cap, &mut studios, &mut counter);
        }

        let remainder: i64 = remaining.iter().map(|program| program.size).sum();

        debug!(
            total_students,
            total_studios = studios.len(),
            remainder,
            "studio generation finished"
        );

        StudioSummary {
            total_students,
            total_studios: studios.len(),
            remainder,
            studios,
        }
    }

    // ==========================================
    // 模式实现
    // ==========================================

    /// 混班模式: 每轮所有项目等量出人,保证同轮工作室构成完全一致
    fn generate_mixed(
        &self,
        remaining: &mut [RemainingProgram],
        studio_cap: i64,
        studios: &mut Vec<Studio>,
        counter: &mut u32,
    ) {
        let program_count = remaining.len() as i64;
        let mut share = (studio_cap / program_count).clamp(1, studio_cap);

        while share > 0 {
            let possible_studios = remaining
                .iter()
                .map(|program| program.size / share)
                .min()
                .unwrap_or(0);

            if possible_studios == 0 {
                // 最小项目出不满一份,缩小份额重试;share 归零即终止
                share -= 1;
                continue;
            }

            for _ in 0..possible_studios {
                let mut distribution = BTreeMap::new();
                for program in remaining.iter_mut() {
                    program.size -= share;
                    distribution.insert(program.label.clone(), share);
                }

                studios.push(Studio {
                    id: StudioId::sequential(*counter),
                    size: share * program_count,
                    programs: distribution,
                });
                *counter += 1;
            }
        }
    }

    /// 非混班模式: 项目之间互不影响,逐项目线性切分
    fn generate_unmixed(
        &self,
        remaining: &mut [RemainingProgram],
        studio_cap: i64,
        studios: &mut Vec<Studio>,
        counter: &mut u32,
    ) {
        for program in remaining.iter_mut() {
            while program.size > 0 {
                let size = studio_cap.min(program.size);
                let mut distribution = BTreeMap::new();
                distribution.insert(program.label.clone(), size);

                studios.push(Studio {
                    id: StudioId::sequential(*counter),
                    size,
                    programs: distribution,
                });
                program.size -= size;
                *counter += 1;
            }
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for StudioGenerator {
    fn default() -> Self {
        Self::new()
    }
}
