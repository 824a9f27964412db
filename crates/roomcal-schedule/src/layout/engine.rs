use std::cmp::Ordering;
use std::collections::HashMap;

use super::{EventLayout, LayoutInterval};

/// ## Summary
/// Assigns a column to every interval, keyed by id.
///
/// Intervals are ordered by start, then longer first, then id, so longer
/// bookings claim the lower columns and the result does not depend on input
/// order. Clusters are the connected components of the half-open
/// intersection graph; overlap is not transitive, so A-B and B-C put A, B
/// and C in one cluster even when A and C are disjoint. Inside a cluster each
/// interval takes the lowest column whose occupants are all disjoint from it,
/// and every member reports the cluster's final column count.
///
/// Ids are expected to be unique; a repeated id keeps the last placement.
#[must_use]
pub fn layout<T: LayoutInterval>(events: &[T]) -> HashMap<String, EventLayout> {
    let mut order: Vec<&T> = events.iter().collect();
    order.sort_by(|a, b| placement_order(*a, *b));

    let mut placements = HashMap::with_capacity(order.len());
    let clusters = clusters(&order);
    for cluster in &clusters {
        place_cluster(cluster, &mut placements);
    }

    tracing::trace!(
        events = events.len(),
        clusters = clusters.len(),
        "Computed day layout"
    );

    placements
}

fn placement_order<T: LayoutInterval + ?Sized>(a: &T, b: &T) -> Ordering {
    a.start()
        .cmp(&b.start())
        .then_with(|| (b.end() - b.start()).cmp(&(a.end() - a.start())))
        .then_with(|| a.id().cmp(b.id()))
}

/// Connected components, each kept in placement order.
fn clusters<'a, T: LayoutInterval>(sorted: &[&'a T]) -> Vec<Vec<&'a T>> {
    let mut sets = DisjointSet::new(sorted.len());

    for (i, a) in sorted.iter().enumerate() {
        for (j, b) in sorted.iter().enumerate().skip(i + 1) {
            // Sorted by start: nothing further right can reach back into `a`.
            if b.start() >= a.end() {
                break;
            }
            if a.intersects(*b) {
                sets.union(i, j);
            }
        }
    }

    let mut index_of_root: HashMap<usize, usize> = HashMap::new();
    let mut out: Vec<Vec<&'a T>> = Vec::new();
    for (i, item) in sorted.iter().enumerate() {
        let root = sets.find(i);
        let idx = *index_of_root.entry(root).or_insert_with(|| {
            out.push(Vec::new());
            out.len() - 1
        });
        out[idx].push(*item);
    }
    out
}

fn place_cluster<T: LayoutInterval>(cluster: &[&T], placements: &mut HashMap<String, EventLayout>) {
    let mut columns: Vec<Vec<&T>> = Vec::new();
    let mut assigned: Vec<(&T, usize)> = Vec::with_capacity(cluster.len());

    for &item in cluster {
        let free = columns
            .iter()
            .position(|occupants| occupants.iter().all(|other| !other.intersects(item)));
        let column = free.unwrap_or_else(|| {
            columns.push(Vec::new());
            columns.len() - 1
        });
        columns[column].push(item);
        assigned.push((item, column));
    }

    let total_columns = to_u32(columns.len());
    for (item, column) in assigned {
        placements.insert(
            item.id().to_string(),
            EventLayout {
                column: to_u32(column),
                total_columns,
            },
        );
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Union-find over cluster member indices.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::layout::LayoutItem;

    fn item(id: &str, start: &str, end: &str) -> LayoutItem {
        let parse = |s: &str| {
            NaiveDateTime::parse_from_str(&format!("2024-01-01T{s}"), "%Y-%m-%dT%H:%M").expect("valid time")
        };
        LayoutItem::new(id, parse(start), parse(end))
    }

    fn placed(column: u32, total_columns: u32) -> EventLayout {
        EventLayout { column, total_columns }
    }

    #[test]
    fn test_empty() {
        assert!(layout::<LayoutItem>(&[]).is_empty());
    }

    #[test]
    fn test_singletons_are_full_width() {
        let out = layout(&[item("a", "09:00", "10:00"), item("b", "10:00", "11:00")]);
        assert_eq!(out["a"], EventLayout::FULL_WIDTH);
        assert_eq!(out["b"], EventLayout::FULL_WIDTH);
    }

    #[test]
    fn test_longer_event_takes_first_column() {
        let out = layout(&[item("short", "09:00", "09:30"), item("long", "09:00", "12:00")]);
        assert_eq!(out["long"], placed(0, 2));
        assert_eq!(out["short"], placed(1, 2));
    }

    #[test]
    fn test_chain_shares_one_group() {
        // a-b and b-c overlap, a and c do not.
        let out = layout(&[
            item("a", "09:00", "10:00"),
            item("b", "09:30", "10:30"),
            item("c", "10:00", "11:00"),
        ]);

        assert_eq!(out["a"], placed(0, 2));
        assert_eq!(out["b"], placed(1, 2));
        assert_eq!(out["c"], placed(0, 2));
    }

    #[test]
    fn test_column_reuse_after_gap() {
        let out = layout(&[
            item("long", "09:00", "13:00"),
            item("x", "09:00", "10:00"),
            item("y", "10:00", "11:00"),
            item("z", "10:30", "11:30"),
        ]);

        assert_eq!(out["long"], placed(0, 3));
        assert_eq!(out["x"], placed(1, 3));
        assert_eq!(out["y"], placed(1, 3));
        assert_eq!(out["z"], placed(2, 3));
    }

    #[test]
    fn test_independent_groups() {
        let out = layout(&[
            item("a", "08:00", "09:00"),
            item("b", "08:30", "09:30"),
            item("c", "14:00", "15:00"),
        ]);

        assert_eq!(out["a"].total_columns, 2);
        assert_eq!(out["b"].total_columns, 2);
        assert_eq!(out["c"], EventLayout::FULL_WIDTH);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![
            item("a", "09:00", "10:00"),
            item("b", "09:00", "10:00"),
            item("c", "09:15", "09:45"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(layout(&forward), layout(&backward));
    }

    #[test]
    fn test_disjoint_set_merges() {
        let mut sets = DisjointSet::new(4);
        sets.union(0, 1);
        sets.union(2, 3);
        assert_ne!(sets.find(0), sets.find(2));
        sets.union(1, 3);
        assert_eq!(sets.find(0), sets.find(2));
    }
}
