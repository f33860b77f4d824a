use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 随机源抽象：返回 [1, upper] 的均匀随机整数。
/// 生产用 [`ThreadRngSource`]；测试注入 [`SeededSource`] 固定种子复现抽取序列。
pub trait RandomSource: Send {
    fn next_in(&mut self, upper: i64) -> i64;
}

pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_in(&mut self, upper: i64) -> i64 {
        rand::thread_rng().gen_range(1..=upper)
    }
}

pub struct SeededSource(StdRng);

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededSource {
    fn next_in(&mut self, upper: i64) -> i64 {
        self.0.gen_range(1..=upper)
    }
}

/// 参与者（已按构造顺序排定，抽取时按此顺序累计权重）
#[derive(Debug, Clone)]
pub struct DrawEntry {
    pub user_id: i64,
    pub checkin_days: i32,
    pub weight: i64,
    pub is_full_attendance: bool,
}

/// 奖项（调用方保证按 prize_rank 升序、同名次按入库顺序排列）
#[derive(Debug, Clone)]
pub struct DrawPrize {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub prize_rank: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnWinner {
    pub user_id: i64,
    pub prize_name: String,
    pub prize_description: Option<String>,
    pub prize_rank: i32,
}

/// 带权不放回抽取。
///
/// 逐奖项（名次升序）逐名额抽取：每个名额先过滤出 weight>0 且未中奖的池子，
/// 取 [1, 总权重] 的随机数沿池子累计权重命中一人，中奖者从后续所有池子移除。
/// 池子一旦抽空整场立即结束，后续奖项不再发放；改成逐奖项跳过会改变
/// 中奖分布，调整前先和业务确认（见 DESIGN.md）。
pub fn draw_winners(
    entries: &[DrawEntry],
    prizes: &[DrawPrize],
    rng: &mut dyn RandomSource,
) -> Vec<DrawnWinner> {
    let mut winners: Vec<DrawnWinner> = Vec::new();

    'prizes: for prize in prizes {
        for _ in 0..prize.quantity.max(0) {
            let pool: Vec<&DrawEntry> = entries
                .iter()
                .filter(|e| e.weight > 0 && !winners.iter().any(|w| w.user_id == e.user_id))
                .collect();

            if pool.is_empty() {
                break 'prizes;
            }

            let total: i64 = pool.iter().map(|e| e.weight).sum();
            if total <= 0 {
                break 'prizes;
            }

            let pick = rng.next_in(total);
            let mut cumulative = 0i64;
            for e in &pool {
                cumulative += e.weight;
                if pick <= cumulative {
                    winners.push(DrawnWinner {
                        user_id: e.user_id,
                        prize_name: prize.name.clone(),
                        prize_description: prize.description.clone(),
                        prize_rank: prize.prize_rank,
                    });
                    break;
                }
            }
        }
    }

    winners
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user_id: i64, weight: i64) -> DrawEntry {
        DrawEntry {
            user_id,
            checkin_days: weight as i32,
            weight,
            is_full_attendance: false,
        }
    }

    fn prize(name: &str, quantity: i32, rank: i32) -> DrawPrize {
        DrawPrize {
            name: name.to_string(),
            description: None,
            quantity,
            prize_rank: rank,
        }
    }

    #[test]
    fn test_seeded_draw_is_deterministic() {
        let entries = vec![entry(1, 5), entry(2, 3), entry(3, 7)];
        let prizes = vec![prize("一等奖", 1, 1), prize("二等奖", 2, 2)];

        let a = draw_winners(&entries, &prizes, &mut SeededSource::new(42));
        let b = draw_winners(&entries, &prizes, &mut SeededSource::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_duplicate_winners() {
        let entries: Vec<DrawEntry> = (1..=5).map(|i| entry(i, i)).collect();
        let prizes = vec![prize("A", 3, 1), prize("B", 3, 2)];

        for seed in 0..50 {
            let winners = draw_winners(&entries, &prizes, &mut SeededSource::new(seed));
            let mut ids: Vec<i64> = winners.iter().map(|w| w.user_id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), winners.len(), "duplicate winner with seed {seed}");
        }
    }

    #[test]
    fn test_conservation_bound() {
        // 中奖数 <= min(名额总数, 有效参与人数)
        let entries = vec![entry(1, 4), entry(2, 2), entry(3, 0)];
        let prizes = vec![prize("A", 2, 1), prize("B", 5, 2)];

        for seed in 0..50 {
            let winners = draw_winners(&entries, &prizes, &mut SeededSource::new(seed));
            assert!(winners.len() <= 2);
        }
    }

    #[test]
    fn test_exhaustion_stops_whole_draw() {
        // {A:5, B:3}，奖项 [(rank1,qty1), (rank2,qty5)]：
        // rank1 用掉一人，rank2 最多发 1 个名额后池子抽空，立即整场结束
        let entries = vec![entry(1, 5), entry(2, 3)];
        let prizes = vec![prize("头奖", 1, 1), prize("安慰奖", 5, 2)];

        for seed in 0..50 {
            let winners = draw_winners(&entries, &prizes, &mut SeededSource::new(seed));
            assert_eq!(winners.len(), 2);
            assert_eq!(winners[0].prize_rank, 1);
            assert_eq!(winners[1].prize_rank, 2);
            assert_ne!(winners[0].user_id, winners[1].user_id);
        }
    }

    #[test]
    fn test_zero_weight_excluded() {
        let entries = vec![entry(1, 0), entry(2, 3)];
        let prizes = vec![prize("A", 2, 1)];

        let winners = draw_winners(&entries, &prizes, &mut SeededSource::new(7));
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].user_id, 2);
    }

    #[test]
    fn test_empty_pool_yields_no_winners() {
        let entries = vec![entry(1, 0)];
        let prizes = vec![prize("A", 1, 1)];
        assert!(draw_winners(&entries, &prizes, &mut SeededSource::new(1)).is_empty());

        let prizes2 = vec![prize("A", 1, 1)];
        assert!(draw_winners(&[], &prizes2, &mut SeededSource::new(1)).is_empty());
    }

    #[test]
    fn test_output_follows_rank_order() {
        let entries: Vec<DrawEntry> = (1..=10).map(|i| entry(i, 2)).collect();
        let prizes = vec![prize("一等奖", 1, 1), prize("二等奖", 2, 2), prize("三等奖", 3, 3)];

        let winners = draw_winners(&entries, &prizes, &mut SeededSource::new(99));
        let ranks: Vec<i32> = winners.iter().map(|w| w.prize_rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
        assert_eq!(winners.len(), 6);
    }

    #[test]
    fn test_single_entry_wins_first_prize() {
        let entries = vec![entry(9, 14)];
        let prizes = vec![prize("头奖", 1, 1), prize("安慰奖", 3, 2)];

        let winners = draw_winners(&entries, &prizes, &mut SeededSource::new(3));
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].user_id, 9);
        assert_eq!(winners[0].prize_name, "头奖");
    }
}
