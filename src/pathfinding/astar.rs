//! A* pathfinding over the hex grid
//!
//! Uniform step cost of 1 and the cube-distance heuristic, which is
//! admissible and consistent on this grid, so any path found within the
//! iteration budget is a shortest one.
//!
//! Results are step lists rather than coordinates so a caller can replay
//! them against its own (possibly drifting) agent position.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::walkable::Walkability;
use crate::config::pathfinding as path_config;
use crate::hex::{HexCoordinate, HexDirection};

/// How the open set orders nodes with equal f-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First discovered wins; a node keeps the rank of its first push
    /// when its g-score later improves
    #[default]
    InsertionOrder,
    /// Smallest coordinate (x, then y) wins
    Lexicographic,
}

/// Hex step distance used as the A* heuristic
#[inline]
pub fn heuristic(a: HexCoordinate, b: HexCoordinate) -> i32 {
    a.distance(b)
}

/// A* entry for the priority queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    coord: HexCoordinate,
    g_score: i32,
    f_score: i32,
    rank: (i64, i64),
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (lowest f, then lowest rank)
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-call search state; dropped when the search returns
struct SearchContext {
    goal: HexCoordinate,
    tie_break: TieBreak,
    open_set: BinaryHeap<OpenEntry>,
    g_score: HashMap<HexCoordinate, i32>,
    came_from: HashMap<HexCoordinate, HexCoordinate>,
    closed_set: HashSet<HexCoordinate>,
    /// Discovery order per coordinate (insertion-order ties)
    first_seen: HashMap<HexCoordinate, i64>,
    pushed: i64,
}

impl SearchContext {
    fn new(start: HexCoordinate, goal: HexCoordinate, tie_break: TieBreak) -> Self {
        let mut context = Self {
            goal,
            tie_break,
            open_set: BinaryHeap::new(),
            g_score: HashMap::new(),
            came_from: HashMap::new(),
            closed_set: HashSet::new(),
            first_seen: HashMap::new(),
            pushed: 0,
        };
        context.g_score.insert(start, 0);
        context.push(start, 0);
        context
    }

    fn push(&mut self, coord: HexCoordinate, g_score: i32) {
        let rank = match self.tie_break {
            TieBreak::InsertionOrder => {
                let order = *self.first_seen.entry(coord).or_insert(self.pushed);
                (order, 0)
            }
            TieBreak::Lexicographic => (i64::from(coord.x), i64::from(coord.y)),
        };
        self.pushed += 1;
        self.open_set.push(OpenEntry {
            coord,
            g_score,
            f_score: g_score + heuristic(coord, self.goal),
            rank,
        });
    }

    /// Lowest-f live entry, skipping closed nodes and superseded duplicates
    fn pop(&mut self) -> Option<OpenEntry> {
        while let Some(entry) = self.open_set.pop() {
            if self.closed_set.contains(&entry.coord) {
                continue;
            }
            if self.g_score.get(&entry.coord).is_some_and(|&best| entry.g_score > best) {
                continue;
            }
            return Some(entry);
        }
        None
    }

    fn relax(&mut self, from: HexCoordinate, neighbor: HexCoordinate, tentative_g: i32) {
        let known = self.g_score.get(&neighbor).copied().unwrap_or(i32::MAX);
        if tentative_g < known {
            self.came_from.insert(neighbor, from);
            self.g_score.insert(neighbor, tentative_g);
            self.push(neighbor, tentative_g);
        }
    }

    /// Walk came_from back from the goal; start-to-goal order, both inclusive
    fn reconstruct(&self) -> Vec<HexCoordinate> {
        let mut current = self.goal;
        let mut path = vec![current];
        while let Some(&prev) = self.came_from.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Hex A* pathfinder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexPathfinder {
    /// Node expansions allowed per search
    pub max_iterations: usize,
    pub tie_break: TieBreak,
}

impl Default for HexPathfinder {
    fn default() -> Self {
        Self {
            max_iterations: path_config::MAX_ITERATIONS,
            tie_break: TieBreak::default(),
        }
    }
}

impl HexPathfinder {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Steps from `start` to `goal`.
    ///
    /// Empty when `start == goal`, when the goal is unreachable, or when the
    /// iteration budget runs out first; callers cannot tell these apart.
    pub fn find_path<W>(
        &self,
        start: HexCoordinate,
        goal: HexCoordinate,
        walkable: &W,
    ) -> Vec<HexDirection>
    where
        W: Walkability + ?Sized,
    {
        match self.find_coordinate_path(start, goal, walkable) {
            Some(path) => directions_from_path(&path),
            None => Vec::new(),
        }
    }

    /// Coordinates from `start` to `goal`, both inclusive
    pub fn find_coordinate_path<W>(
        &self,
        start: HexCoordinate,
        goal: HexCoordinate,
        walkable: &W,
    ) -> Option<Vec<HexCoordinate>>
    where
        W: Walkability + ?Sized,
    {
        if !start.is_representable() || !goal.is_representable() {
            debug_log!("find_path: {:?} -> {:?} is out of range", start, goal);
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        // An unwalkable goal can never be expanded into
        if !walkable.is_walkable(goal) {
            debug_log!("find_path: goal {:?} is not walkable", goal);
            return None;
        }

        let mut context = SearchContext::new(start, goal, self.tie_break);

        for _ in 0..self.max_iterations {
            let Some(current) = context.pop() else {
                let explored = context.closed_set.len();
                tracing::trace!(?start, ?goal, explored, "open set exhausted");
                return None;
            };

            if current.coord == goal {
                let path = context.reconstruct();
                debug_log!(
                    "find_path: {:?} -> {:?} in {} steps ({} nodes closed)",
                    start,
                    goal,
                    path.len() - 1,
                    context.closed_set.len()
                );
                return Some(path);
            }

            context.closed_set.insert(current.coord);

            for neighbor in current.coord.neighbors() {
                if context.closed_set.contains(&neighbor)
                    || !neighbor.is_representable()
                    || !walkable.is_walkable(neighbor)
                {
                    continue;
                }
                context.relax(current.coord, neighbor, current.g_score + 1);
            }
        }

        tracing::trace!(?start, ?goal, budget = self.max_iterations, "iteration budget exhausted");
        None
    }
}

/// A* search with the default tie-break
pub fn find_path<W>(
    start: HexCoordinate,
    goal: HexCoordinate,
    walkable: &W,
    max_iterations: usize,
) -> Vec<HexDirection>
where
    W: Walkability + ?Sized,
{
    HexPathfinder::new(max_iterations).find_path(start, goal, walkable)
}

/// Convert consecutive coordinates into unit steps
pub fn directions_from_path(path: &[HexCoordinate]) -> Vec<HexDirection> {
    path.windows(2)
        .filter_map(|pair| HexDirection::from_delta(pair[1] - pair[0]))
        .collect()
}

/// Replay steps from `start`; returns every visited coordinate, start included
pub fn apply_steps(start: HexCoordinate, steps: &[HexDirection]) -> Vec<HexCoordinate> {
    let mut visited = Vec::with_capacity(steps.len() + 1);
    let mut position = start;
    visited.push(position);
    for step in steps {
        position = position.neighbor(*step);
        visited.push(position);
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::VecDeque;

    fn open_grid(coord: HexCoordinate) -> bool {
        coord.x.abs() <= 8 && coord.y.abs() <= 8
    }

    /// Breadth-first step count inside the +/-8 square
    fn bfs_distance(start: HexCoordinate, goal: HexCoordinate) -> Option<i32> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0)]);
        while let Some((coord, dist)) = queue.pop_front() {
            if coord == goal {
                return Some(dist);
            }
            for neighbor in coord.neighbors() {
                if open_grid(neighbor) && seen.insert(neighbor) {
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }
        None
    }

    #[test]
    fn test_two_steps_east() {
        let walkable = |c: HexCoordinate| c.x.abs() <= 2 && c.y.abs() <= 2;
        let steps = find_path(HexCoordinate::new(0, 0), HexCoordinate::new(2, 0), &walkable, 300);
        assert_eq!(steps, vec![HexDirection::East, HexDirection::East]);
    }

    #[test]
    fn test_out_of_range_endpoints_are_empty() {
        let everywhere = |_: HexCoordinate| true;
        let far = HexCoordinate::new(i32::MAX, i32::MAX);
        assert!(find_path(HexCoordinate::ORIGIN, far, &everywhere, 10).is_empty());
        assert!(find_path(far, HexCoordinate::ORIGIN, &everywhere, 10).is_empty());
        assert!(find_path(far, far, &everywhere, 10).is_empty());
        let below = HexCoordinate::new(i32::MIN, 0);
        let pathfinder = HexPathfinder::default();
        let path = pathfinder.find_coordinate_path(below, HexCoordinate::ORIGIN, &everywhere);
        assert_eq!(path, None);
    }

    #[test]
    fn test_search_stays_inside_the_grid() {
        let edge = HexCoordinate::new(HexCoordinate::MAX_EXTENT, 0);
        let goal = HexCoordinate::new(HexCoordinate::MAX_EXTENT - 3, 0);
        let steps = find_path(edge, goal, &|_: HexCoordinate| true, 100);
        assert_eq!(steps, vec![HexDirection::West; 3]);
    }

    #[test]
    fn test_improved_node_keeps_first_rank() {
        let goal = HexCoordinate::new(10, 0);
        let first = HexCoordinate::new(5, 0);
        let second = HexCoordinate::new(6, 0);

        let mut context = SearchContext::new(HexCoordinate::ORIGIN, goal, TieBreak::InsertionOrder);
        context.relax(HexCoordinate::ORIGIN, first, 3);
        context.relax(HexCoordinate::ORIGIN, second, 3);
        // Both now at f = 7; `first` was discovered earlier and must win
        context.relax(HexCoordinate::ORIGIN, first, 2);

        assert_eq!(context.pop().map(|entry| entry.coord), Some(first));
        assert_eq!(context.pop().map(|entry| entry.coord), Some(second));
    }

    #[test]
    fn test_start_equals_goal_is_empty() {
        let steps = find_path(HexCoordinate::new(3, 3), HexCoordinate::new(3, 3), &open_grid, 300);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_unwalkable_goal_is_empty() {
        let goal = HexCoordinate::new(5, 5);
        let walkable = move |c: HexCoordinate| c != goal;
        assert!(find_path(HexCoordinate::ORIGIN, goal, &walkable, 1000).is_empty());
    }

    #[test]
    fn test_walled_in_goal_is_empty() {
        let goal = HexCoordinate::new(3, -1);
        let walls: HashSet<_> = goal.neighbors().into_iter().collect();
        let walkable = |c: HexCoordinate| open_grid(c) && !walls.contains(&c);
        assert!(find_path(HexCoordinate::ORIGIN, goal, &walkable, 1000).is_empty());
    }

    #[test]
    fn test_budget_exhaustion_is_empty() {
        let goal = HexCoordinate::new(8, 0);
        assert!(find_path(HexCoordinate::new(-8, 0), goal, &open_grid, 3).is_empty());
        assert_eq!(find_path(HexCoordinate::new(-8, 0), goal, &open_grid, 1000).len(), 16);
    }

    #[test]
    fn test_heuristic_matches_bfs() {
        for x in -3..=3 {
            for y in -3..=3 {
                let a = HexCoordinate::new(x, y);
                for b in [(0, 0), (2, -3), (-1, 3)].map(HexCoordinate::from) {
                    assert_eq!(Some(heuristic(a, b)), bfs_distance(a, b), "{a:?} -> {b:?}");
                }
            }
        }
    }

    #[rstest]
    #[case(HexCoordinate::new(0, 0), HexCoordinate::new(4, -4))]
    #[case(HexCoordinate::new(-3, 2), HexCoordinate::new(3, 3))]
    #[case(HexCoordinate::new(5, -5), HexCoordinate::new(-5, 5))]
    #[case(HexCoordinate::new(0, 6), HexCoordinate::new(0, -6))]
    fn test_obstacle_free_paths_are_optimal(
        #[case] start: HexCoordinate,
        #[case] goal: HexCoordinate,
    ) {
        for tie_break in [TieBreak::InsertionOrder, TieBreak::Lexicographic] {
            let pathfinder = HexPathfinder::new(2000).with_tie_break(tie_break);
            let steps = pathfinder.find_path(start, goal, &open_grid);
            assert_eq!(steps.len() as i32, heuristic(start, goal));
            assert_eq!(apply_steps(start, &steps).last(), Some(&goal));
        }
    }

    #[test]
    fn test_path_around_wall_is_valid_and_shortest() {
        // Vertical wall at x = 0 with a single gap at y = 4
        let walkable = |c: HexCoordinate| open_grid(c) && (c.x != 0 || c.y == 4);
        let start = HexCoordinate::new(-3, 0);
        let goal = HexCoordinate::new(3, 0);

        let steps = find_path(start, goal, &walkable, 2000);
        assert!(!steps.is_empty());

        let visited = apply_steps(start, &steps);
        assert_eq!(visited.last(), Some(&goal));
        for pair in visited.windows(2) {
            assert_eq!(pair[0].distance(pair[1]), 1);
        }
        assert!(visited.iter().skip(1).all(|c| walkable(*c)));
        assert!(visited.contains(&HexCoordinate::new(0, 4)));

        // BFS over the same oracle for the true shortest length
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        let mut shortest = None;
        while let Some((coord, dist)) = queue.pop_front() {
            if coord == goal {
                shortest = Some(dist);
                break;
            }
            for n in coord.neighbors() {
                if walkable(n) && seen.insert(n) {
                    queue.push_back((n, dist + 1));
                }
            }
        }
        assert_eq!(Some(steps.len()), shortest);
    }

    #[test]
    fn test_lexicographic_tie_break_is_reproducible() {
        let pathfinder = HexPathfinder::new(1000).with_tie_break(TieBreak::Lexicographic);
        let goal = HexCoordinate::new(3, 3);
        let first = pathfinder.find_path(HexCoordinate::ORIGIN, goal, &open_grid);
        let second = pathfinder.find_path(HexCoordinate::ORIGIN, goal, &open_grid);
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }

    #[test]
    fn test_directions_from_path_skips_nothing_on_valid_paths() {
        let path = [
            HexCoordinate::new(0, 0),
            HexCoordinate::new(1, -1),
            HexCoordinate::new(1, 0),
            HexCoordinate::new(0, 1),
        ];
        assert_eq!(
            directions_from_path(&path),
            vec![HexDirection::NorthEast, HexDirection::South, HexDirection::SouthWest]
        );
    }
}
