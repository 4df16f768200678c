use crate::models::Entry;
use chrono::{DateTime, Local, NaiveTime, TimeZone, Timelike};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const TOP_WORDS: usize = 5;
const TREND_DAYS: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
    pub by_word: BTreeMap<String, u64>,
    pub by_date: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: String,
    pub count: u64,
}

/// Counters plus the two chart views the page renders.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub stats: Stats,
    pub top_words: Vec<WordCount>,
    pub trend: Vec<DateCount>,
}

pub fn aggregate_now(entries: &[Entry]) -> Stats {
    aggregate(entries, &Local::now())
}

/// Windows start at midnight of `now`'s day in `now`'s timezone; the week
/// and month windows reach back 7 and 30 days from there.
pub fn aggregate<Tz: TimeZone>(entries: &[Entry], now: &DateTime<Tz>) -> Stats {
    let today_start = local_midnight_millis(now);
    let week_start = today_start - 7 * DAY_MS;
    let month_start = today_start - 30 * DAY_MS;

    let mut stats = Stats {
        total: entries.len() as u64,
        ..Stats::default()
    };

    for entry in entries {
        if entry.timestamp >= today_start {
            stats.today += 1;
        }
        if entry.timestamp >= week_start {
            stats.this_week += 1;
        }
        if entry.timestamp >= month_start {
            stats.this_month += 1;
        }
        *stats.by_word.entry(entry.word.clone()).or_default() += 1;
        *stats.by_date.entry(entry.date.clone()).or_default() += 1;
    }

    stats
}

/// Start of `now`'s calendar day, resolved through the timezone so a DST
/// shift earlier in the day does not move it. Only when midnight itself is
/// skipped by a transition does it fall back to subtracting the wall-clock
/// time elapsed today.
fn local_midnight_millis<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    if let Some(start) = now.timezone().from_local_datetime(&midnight).earliest() {
        return start.timestamp_millis();
    }
    let local = now.naive_local().time();
    let since_midnight = i64::from(local.num_seconds_from_midnight()) * 1000
        + i64::from(local.nanosecond() / 1_000_000);
    now.timestamp_millis() - since_midnight
}

/// Most frequent words; ties keep the order words first appear in the log.
pub fn top_words(entries: &[Entry], limit: usize) -> Vec<WordCount> {
    let mut counts: Vec<WordCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        match index.get(entry.word.as_str()) {
            Some(&position) => counts[position].count += 1,
            None => {
                index.insert(&entry.word, counts.len());
                counts.push(WordCount {
                    word: entry.word.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// The last `days` dates that have entries, oldest first. Days without
/// entries are skipped rather than zero-filled.
pub fn recent_trend(stats: &Stats, days: usize) -> Vec<DateCount> {
    let skip = stats.by_date.len().saturating_sub(days);
    stats
        .by_date
        .iter()
        .skip(skip)
        .map(|(date, count)| DateCount {
            date: date.clone(),
            count: *count,
        })
        .collect()
}

pub fn summarize_now(entries: &[Entry]) -> Summary {
    summarize(entries, &Local::now())
}

pub fn summarize<Tz: TimeZone>(entries: &[Entry], now: &DateTime<Tz>) -> Summary {
    let stats = aggregate(entries, now);
    Summary {
        top_words: top_words(entries, TOP_WORDS),
        trend: recent_trend(&stats, TREND_DAYS),
        stats,
    }
}
