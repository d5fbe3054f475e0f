use rand::Rng;

use super::walkable::Walkability;
use crate::hex::HexCoordinate;

/// Pick a random walkable tile whose hex distance from `start` lies in
/// `[min_distance, max_distance]`.
///
/// Searches ring by ring, so the cost is bounded by the ring sizes. Returns
/// `None` when no candidate is walkable.
pub fn find_random_destination<W, R>(
    start: HexCoordinate,
    min_distance: i32,
    max_distance: i32,
    walkable: &W,
    rng: &mut R,
) -> Option<HexCoordinate>
where
    W: Walkability + ?Sized,
    R: Rng,
{
    let min_distance = min_distance.max(1);
    if max_distance < min_distance {
        return None;
    }

    let mut checked_count = 0usize;
    let mut valid_destinations = Vec::new();
    for distance in min_distance..=max_distance {
        for candidate in start.ring(distance) {
            checked_count += 1;
            if walkable.is_walkable(candidate) {
                valid_destinations.push(candidate);
            }
        }
    }

    debug_log!(
        "find_random_destination: start={:?}, range={}-{}, checked={}, valid={}",
        start,
        min_distance,
        max_distance,
        checked_count,
        valid_destinations.len()
    );

    if valid_destinations.is_empty() {
        return None;
    }
    let index = rng.random_range(0..valid_destinations.len());
    Some(valid_destinations[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_destination_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = HexCoordinate::new(2, -1);
        let open = |_: HexCoordinate| true;
        for _ in 0..50 {
            let destination = find_random_destination(start, 2, 4, &open, &mut rng)
                .expect("open field always has destinations");
            let distance = start.distance(destination);
            assert!((2..=4).contains(&distance));
        }
    }

    #[test]
    fn test_destination_respects_walkability() {
        let mut rng = StdRng::seed_from_u64(11);
        let only = HexCoordinate::new(0, 3);
        let walkable = move |c: HexCoordinate| c == only;
        assert_eq!(
            find_random_destination(HexCoordinate::ORIGIN, 1, 5, &walkable, &mut rng),
            Some(only)
        );
    }

    #[test]
    fn test_no_destination() {
        let mut rng = StdRng::seed_from_u64(3);
        let blocked = |_c: HexCoordinate| false;
        assert_eq!(find_random_destination(HexCoordinate::ORIGIN, 1, 3, &blocked, &mut rng), None);
        let open = |_: HexCoordinate| true;
        assert_eq!(find_random_destination(HexCoordinate::ORIGIN, 4, 2, &open, &mut rng), None);
    }
}
