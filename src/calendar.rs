use chrono::{Datelike, NaiveDate};

/// (year, month) of a date.
pub type MonthKey = (i32, u32);

pub fn month_key(date: NaiveDate) -> MonthKey {
    (date.year(), date.month())
}

/// Whole calendar months from `from` to `to`, or 0 when `to` is not later.
pub fn months_between(from: MonthKey, to: MonthKey) -> usize {
    let from = from.0 as i64 * 12 + from.1 as i64;
    let to = to.0 as i64 * 12 + to.1 as i64;
    (to - from).max(0) as usize
}

/// Contiguous run of dated items that fall in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    pub key: MonthKey,
    pub first_index: usize,
    pub last_index: usize,
}

/// Splits date-ascending items into calendar-month spans. Months with no items
/// simply do not appear.
pub fn month_spans_with<T, F>(items: &[T], date_of: F) -> Vec<MonthSpan>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut spans: Vec<MonthSpan> = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let key = month_key(date_of(item));
        match spans.last_mut() {
            Some(span) if span.key == key => span.last_index = index,
            _ => spans.push(MonthSpan {
                key,
                first_index: index,
                last_index: index,
            }),
        }
    }

    spans
}

/// Indices of decision days: the first trading day of each month in the series.
pub fn decision_day_indices<T, F>(items: &[T], date_of: F) -> Vec<usize>
where
    F: Fn(&T) -> NaiveDate,
{
    month_spans_with(items, date_of)
        .into_iter()
        .map(|span| span.first_index)
        .collect()
}

/// Indices of the last trading day of each month in the series.
pub fn month_end_indices<T, F>(items: &[T], date_of: F) -> Vec<usize>
where
    F: Fn(&T) -> NaiveDate,
{
    month_spans_with(items, date_of)
        .into_iter()
        .map(|span| span.last_index)
        .collect()
}

/// Number of calendar months with at least one trading day. Matches the number
/// of decision days seen by the monthly strategies.
pub fn month_count<T, F>(items: &[T], date_of: F) -> usize
where
    F: Fn(&T) -> NaiveDate,
{
    month_spans_with(items, date_of).len()
}
