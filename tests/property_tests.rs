//! Property tests for the chain aggregation and block-list paging.

use chain_dashboard::core::pagination::Pagination;
use chain_dashboard::core::stats::{ChainStatistics, RECENT_BLOCKS};
use chain_dashboard::models::{Block, Transaction};
use chain_dashboard::utils::format::shorten_id;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn chain(timestamps: &[i64], tx_counts: &[usize]) -> Vec<Block> {
    timestamps
        .iter()
        .zip(tx_counts.iter().cycle())
        .enumerate()
        .map(|(i, (ts, txs))| Block {
            index: i as u64,
            hash: format!("h{}", i),
            previous_hash: if i == 0 { "0".into() } else { format!("h{}", i - 1) },
            nonce: i as u64 * 17,
            timestamp: *ts,
            data: (0..*txs)
                .map(|n| Transaction {
                    id: format!("{}-{}", i, n),
                    sender: "s".into(),
                    receiver: "r".into(),
                    amount: 1.0 + n as f64,
                    timestamp: *ts - n as i64,
                })
                .collect(),
        })
        .collect()
}

proptest! {
    /// Average block time is the mean of strictly positive consecutive deltas.
    #[test]
    fn prop_avg_block_time_uses_positive_deltas(
        timestamps in prop::collection::vec(1_600_000_000i64..1_700_000_000i64, 1..60)
    ) {
        let blocks = chain(&timestamps, &[0]);
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let stats = ChainStatistics::compute(&blocks, blocks.last(), &now).unwrap();

        let deltas: Vec<i64> = timestamps.windows(2).map(|w| w[1] - w[0]).filter(|d| *d > 0).collect();
        let expected = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().sum::<i64>() as f64 / deltas.len() as f64
        };

        prop_assert_eq!(stats.block_intervals, deltas.len());
        prop_assert!((stats.avg_block_time - expected).abs() < 1e-6);
    }

    /// Input order does not matter: blocks are folded by index.
    #[test]
    fn prop_compute_ignores_input_order(
        timestamps in prop::collection::vec(0i64..10_000, 2..40),
        tx_counts in prop::collection::vec(0usize..6, 1..10)
    ) {
        let blocks = chain(&timestamps, &tx_counts);
        let mut reversed = blocks.clone();
        reversed.reverse();
        let now = Utc.timestamp_opt(20_000, 0).unwrap();

        let forward = ChainStatistics::compute(&blocks, None, &now).unwrap();
        let backward = ChainStatistics::compute(&reversed, None, &now).unwrap();
        prop_assert_eq!(forward, backward);
    }

    /// Min/max transaction counts bound the average; series stay capped.
    #[test]
    fn prop_tx_count_bounds(
        timestamps in prop::collection::vec(0i64..10_000, 1..50),
        tx_counts in prop::collection::vec(0usize..8, 1..10)
    ) {
        let blocks = chain(&timestamps, &tx_counts);
        let now = Utc.timestamp_opt(20_000, 0).unwrap();
        let stats = ChainStatistics::compute(&blocks, None, &now).unwrap();

        let min = stats.min_txs_in_block.unwrap() as f64;
        prop_assert!(min <= stats.avg_txs_per_block + 1e-9);
        prop_assert!(stats.avg_txs_per_block <= stats.max_txs_in_block as f64 + 1e-9);
        prop_assert!(stats.txs_per_block.len() <= RECENT_BLOCKS);
        prop_assert!(stats.first_tx_delays.len() <= RECENT_BLOCKS);
        prop_assert_eq!(stats.blocks_per_day.len(), 7);
    }

    /// Clamped pages are always reachable and `next` never leaves the range.
    #[test]
    fn prop_pagination_stays_in_range(
        total in 0u64..5_000,
        size in 1u64..100,
        requested in 0u64..1_000
    ) {
        let pagination = Pagination::new(requested, size, total).clamped();
        let pages = pagination.total_pages();

        if pages == 0 {
            prop_assert_eq!(pagination.page, 0);
            prop_assert!(!pagination.has_next());
        } else {
            prop_assert!(pagination.page < pages);
            if let Some(next) = pagination.next() {
                prop_assert!(next < pages);
            }
            prop_assert_eq!(pagination.has_next(), pagination.page + 1 < pages);
        }
    }

    /// The numbered window never panics and stays inside the valid pages,
    /// whatever page was requested.
    #[test]
    fn prop_window_stays_in_range(
        total in 0u64..5_000,
        size in 1u64..100,
        requested in 0u64..1_000,
        max_pages in 1u64..10
    ) {
        let pagination = Pagination::new(requested, size, total);
        match pagination.window(max_pages) {
            None => prop_assert_eq!(pagination.total_pages(), 0),
            Some(range) => {
                prop_assert!(*range.end() < pagination.total_pages());
                prop_assert!(range.end() - range.start() < max_pages);
            }
        }
    }

    /// Short identifiers pass through; long ones keep their head and tail.
    #[test]
    fn prop_shorten_id_keeps_edges(id in "[a-z0-9]{0,64}", start in 1usize..10, end in 1usize..10) {
        let shortened = shorten_id(&id, start, end);
        if id.len() <= start + end {
            prop_assert_eq!(shortened, id);
        } else {
            prop_assert!(shortened.starts_with(&id[..start]));
            prop_assert!(shortened.ends_with(&id[id.len() - end..]));
            prop_assert_eq!(shortened.len(), start + end + 3);
        }
    }
}
