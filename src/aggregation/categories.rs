use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Label used for items without a category name.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Item count of one category and its share of all items, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Counts category names, largest first. Ties keep the order in which the
/// categories were first seen.
pub fn count_by_category<'a, I>(names: I) -> Vec<CategoryStat>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for name in names {
        let label = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNCATEGORIZED,
        };
        match index.get(label) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                index.insert(label.to_string(), order.len());
                order.push((label.to_string(), 1));
            }
        }
        total += 1;
    }

    let mut stats: Vec<CategoryStat> = order
        .into_iter()
        .map(|(category, count)| CategoryStat {
            category,
            count,
            percentage: if total > 0 {
                count as f64 * 100.0 / total as f64
            } else {
                0.0
            },
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
