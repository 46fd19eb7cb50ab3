use crate::geometry::Point;
use crate::snapshot::{Coin, Player};

/// First strict minimum by distance, so ties keep input order.
fn closest<'a, T>(
    from: Point,
    items: impl IntoIterator<Item = &'a T>,
    pos: impl Fn(&T) -> Point,
) -> Option<&'a T>
where
    T: 'a,
{
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let dist = from.distance(pos(item));
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((item, dist));
        }
    }
    best.map(|(item, _)| item)
}

pub fn nearest_coin(self_pos: Point, coins: &[Coin]) -> Option<&Coin> {
    closest(self_pos, coins, |coin| coin.pos)
}

pub fn nearest_enemy<'a>(
    self_pos: Point,
    players: &'a [Player],
    self_name: &str,
) -> Option<&'a Player> {
    closest(
        self_pos,
        players.iter().filter(|player| player.name != self_name),
        |player| player.pos,
    )
}

pub fn find_self(players: &[Player], self_name: &str) -> Option<Point> {
    players
        .iter()
        .find(|player| player.name == self_name)
        .map(|player| player.pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, x: f64, y: f64) -> Coin {
        Coin::new(id, Point::new(x, y))
    }

    #[test]
    fn nearest_coin_picks_minimum_distance() {
        let coins = vec![coin("far", 10.0, 10.0), coin("near", 5.0, 5.0)];
        let picked = nearest_coin(Point::new(50.0, 50.0), &coins).map(|c| c.id.as_str());
        assert_eq!(picked, Some("near"));
    }

    #[test]
    fn nearest_coin_tie_keeps_first() {
        let coins = vec![
            coin("east", 60.0, 50.0),
            coin("west", 40.0, 50.0),
            coin("north", 50.0, 60.0),
        ];
        let picked = nearest_coin(Point::new(50.0, 50.0), &coins).map(|c| c.id.as_str());
        assert_eq!(picked, Some("east"));
    }

    #[test]
    fn no_coins_no_target() {
        assert!(nearest_coin(Point::new(1.0, 1.0), &[]).is_none());
    }

    #[test]
    fn nearest_enemy_skips_self() {
        let players = vec![
            Player::new("me", Point::new(0.0, 0.0)),
            Player::new("b", Point::new(30.0, 0.0)),
            Player::new("c", Point::new(0.0, 20.0)),
        ];
        let picked = nearest_enemy(Point::new(0.0, 0.0), &players, "me").map(|p| p.name.as_str());
        assert_eq!(picked, Some("c"));
    }

    #[test]
    fn only_self_means_no_enemy() {
        let players = vec![Player::new("A", Point::new(0.0, 0.0))];
        assert!(nearest_enemy(Point::new(0.0, 0.0), &players, "A").is_none());
    }

    #[test]
    fn find_self_returns_first_match() {
        let players = vec![
            Player::new("x", Point::new(1.0, 1.0)),
            Player::new("me", Point::new(2.0, 2.0)),
            Player::new("me", Point::new(3.0, 3.0)),
        ];
        assert_eq!(find_self(&players, "me"), Some(Point::new(2.0, 2.0)));
        assert_eq!(find_self(&players, "ghost"), None);
    }
}
