// ==========================================
// 工作室空间分配系统 - 可复现洗牌
// ==========================================
// 依据: Allocation_Engine_Specs_v0.2.md - 4.1 种子化房间顺序
// 红线: LCG 常量与取索引方式固定,跨平台逐位一致
// ==========================================
// 职责: "换一换" 功能的基础 —— 相同种子必须产出
// 完全相同的房间顺序,种子+1 产出另一个确定性顺序
// ==========================================

// LCG 常量 (Numerical Recipes)
const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

// ==========================================
// SeededLcg - 线性同余发生器
// ==========================================
// 递推: seed' = (a·seed + c) mod 2^32
#[derive(Debug, Clone)]
pub struct SeededLcg {
    state: u32,
}

impl SeededLcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// 推进一步并返回新状态
    pub fn next(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// 取 [0, bound) 内的索引: floor(state/2^32 × bound)
    pub fn next_index(&mut self, bound: usize) -> usize {
        let draw = self.next() as u64;
        ((draw * bound as u64) >> 32) as usize
    }
}

/// 种子化 Fisher–Yates 洗牌
///
/// 不修改输入,返回洗牌后的副本;第 i 步的交换索引为
/// floor(seed'/2^32 × (i+1)),与历史实现逐位一致
pub fn shuffle_with_seed<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut list: Vec<T> = items.to_vec();
    let mut rng = SeededLcg::new(seed);

    for i in (1..list.len()).rev() {
        let j = rng.next_index(i + 1);
        list.swap(i, j);
    }

    list
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_first_step_from_default_seed() {
        // (1664525 × 17 + 1013904223) mod 2^32 = 1042201148
        let mut rng = SeededLcg::new(17);
        assert_eq!(rng.next(), 1_042_201_148);
    }

    #[test]
    fn test_lcg_wraps_mod_2_pow_32() {
        let mut rng = SeededLcg::new(u32::MAX);
        // 溢出时按 2^32 回绕,不 panic
        let first = rng.next();
        let second = rng.next();
        assert_ne!(first, second);
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let items: Vec<i32> = (0..32).collect();
        let a = shuffle_with_seed(&items, 17);
        let b = shuffle_with_seed(&items, 17);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let items: Vec<i32> = (0..100).collect();
        let mut shuffled = shuffle_with_seed(&items, 99);
        shuffled.sort_unstable();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn test_shuffle_handles_trivial_inputs() {
        let empty: Vec<i32> = Vec::new();
        assert!(shuffle_with_seed(&empty, 17).is_empty());
        assert_eq!(shuffle_with_seed(&[7], 17), vec![7]);
    }

    #[test]
    fn test_adjacent_seeds_may_differ() {
        let items: Vec<i32> = (0..32).collect();
        let a = shuffle_with_seed(&items, 17);
        let b = shuffle_with_seed(&items, 18);
        // 并非契约,仅确认种子确实进入了洗牌
        assert_ne!(a, b);
    }
}
