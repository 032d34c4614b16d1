use crate::models::Block;
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use std::collections::HashMap;

/// Blocks covered by the per-block chart series.
pub const RECENT_BLOCKS: usize = 20;
/// Trailing days covered by the per-day series.
pub const DAILY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

/// Summary of the whole chain as seen by one statistics render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStatistics {
    pub total_blocks: usize,
    pub total_transactions: u64,
    pub total_amount: f64,
    pub block_intervals: usize,
    pub avg_block_time: f64,
    pub avg_txs_per_block: f64,
    pub avg_nonce: f64,
    pub avg_transaction_amount: f64,
    pub min_txs_in_block: Option<usize>,
    pub max_txs_in_block: usize,
    pub delay_blocks: usize,
    pub avg_first_tx_delay: f64,
    pub min_first_tx_delay: Option<i64>,
    pub max_first_tx_delay: Option<i64>,
    pub time_since_last_block: f64,
    pub txs_per_block: Vec<SeriesPoint>,
    pub first_tx_delays: Vec<SeriesPoint>,
    pub blocks_per_day: Vec<SeriesPoint>,
    pub txs_per_day: Vec<SeriesPoint>,
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl ChainStatistics {
    /// Folds the chain into summary metrics. Day buckets use the timezone
    /// of `now`. Returns `None` for an empty chain.
    pub fn compute<Tz: TimeZone>(blocks: &[Block], latest: Option<&Block>, now: &DateTime<Tz>) -> Option<Self> {
        if blocks.is_empty() {
            return None;
        }

        let mut ordered: Vec<&Block> = blocks.iter().collect();
        ordered.sort_by_key(|block| block.index);

        let total_blocks = ordered.len();
        let recent_from = total_blocks.saturating_sub(RECENT_BLOCKS);
        let tz = now.timezone();

        let mut total_transactions = 0u64;
        let mut total_nonce = 0u128;
        let mut total_amount = 0.0;
        let mut interval_sum = 0i64;
        let mut block_intervals = 0usize;
        let mut min_txs: Option<usize> = None;
        let mut max_txs = 0usize;
        let mut delay_sum = 0i64;
        let mut delay_blocks = 0usize;
        let mut min_delay: Option<i64> = None;
        let mut max_delay: Option<i64> = None;
        let mut txs_per_block = Vec::new();
        let mut first_tx_delays = Vec::new();
        let mut blocks_by_day: HashMap<NaiveDate, u64> = HashMap::new();
        let mut txs_by_day: HashMap<NaiveDate, u64> = HashMap::new();

        for (i, block) in ordered.iter().enumerate() {
            let tx_count = block.data.len();
            total_transactions += tx_count as u64;
            total_nonce += block.nonce as u128;
            total_amount += block.data.iter().map(|tx| tx.amount).sum::<f64>();

            min_txs = Some(min_txs.map_or(tx_count, |min| min.min(tx_count)));
            max_txs = max_txs.max(tx_count);

            let label = format!("Bloque {}", block.index);
            if i >= recent_from {
                txs_per_block.push(SeriesPoint::new(label.clone(), tx_count as f64));
            }

            if let Some(first) = block.first_transaction_timestamp() {
                let delay = block.timestamp - first;
                if delay >= 0 {
                    delay_sum += delay;
                    delay_blocks += 1;
                    min_delay = Some(min_delay.map_or(delay, |min| min.min(delay)));
                    max_delay = Some(max_delay.map_or(delay, |max| max.max(delay)));
                    if i >= recent_from {
                        first_tx_delays.push(SeriesPoint::new(label, delay as f64));
                    }
                }
            }

            if let Some(day) = tz.timestamp_opt(block.timestamp, 0).single().map(|dt| dt.date_naive()) {
                *blocks_by_day.entry(day).or_default() += 1;
                *txs_by_day.entry(day).or_default() += tx_count as u64;
            }

            if i > 0 {
                let interval = block.timestamp - ordered[i - 1].timestamp;
                if interval > 0 {
                    interval_sum += interval;
                    block_intervals += 1;
                }
            }
        }

        let today = now.date_naive();
        let mut blocks_per_day = Vec::with_capacity(DAILY_WINDOW_DAYS as usize);
        let mut txs_per_day = Vec::with_capacity(DAILY_WINDOW_DAYS as usize);
        for offset in (0..DAILY_WINDOW_DAYS).rev() {
            let day = today - Duration::days(offset);
            let label = day.format("%d/%m").to_string();
            blocks_per_day.push(SeriesPoint::new(label.clone(), *blocks_by_day.get(&day).unwrap_or(&0) as f64));
            txs_per_day.push(SeriesPoint::new(label, *txs_by_day.get(&day).unwrap_or(&0) as f64));
        }

        let time_since_last_block = latest
            .map(|block| (now.timestamp() - block.timestamp) as f64)
            .unwrap_or(0.0);

        Some(Self {
            total_blocks,
            total_transactions,
            total_amount,
            block_intervals,
            avg_block_time: mean(interval_sum as f64, block_intervals),
            avg_txs_per_block: mean(total_transactions as f64, total_blocks),
            avg_nonce: mean(total_nonce as f64, total_blocks),
            avg_transaction_amount: mean(total_amount, total_transactions as usize),
            min_txs_in_block: min_txs,
            max_txs_in_block: max_txs,
            delay_blocks,
            avg_first_tx_delay: mean(delay_sum as f64, delay_blocks),
            min_first_tx_delay: min_delay,
            max_first_tx_delay: max_delay,
            time_since_last_block,
            txs_per_block,
            first_tx_delays,
            blocks_per_day,
            txs_per_day,
        })
    }
}
