use crate::config::{MoveEmission, TacticsConfig};
use crate::dodge::DodgeState;
use crate::error::TacticsError;
use crate::geometry::Point;
use crate::intent::{Intent, SaveRecord};
use crate::rng::SeededRng;
use crate::selectors::{find_self, nearest_coin, nearest_enemy};
use crate::snapshot::{GameSnapshot, MapBounds};
use crate::stall::StallDetector;
use crate::walls::{infer_wall, WallMemory};
use crate::waypoint::WaypointGenerator;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Callbacks the session layer drives. One instance plays one session.
pub trait ArenaBot {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    /// Identity the session layer lists this agent under.
    fn self_name(&self) -> &str;
    fn reset(&mut self, seed: u32);
    fn on_start(&mut self, bounds: MapBounds);
    fn on_tick(&mut self, snapshot: &GameSnapshot) -> Vec<Intent>;
    fn on_end(&mut self) -> Vec<Intent>;
    /// Applies a save blob handed back by the server on reconnect.
    fn restore(&mut self, _record: SaveRecord) {}
    /// Game-result reporting: coins credited to this agent by the server.
    fn record_coins(&mut self, _collected: u32) {}
    fn telemetry(&self) -> BotTelemetry {
        BotTelemetry::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BotTelemetry {
    pub ticks: u64,
    pub self_missing_ticks: u64,
    pub stalls: u64,
    pub walls_inferred: u64,
    pub dodges_started: u64,
    pub dodges_completed: u64,
    pub waypoint_failures: u64,
}

/// Memory the agent carries from tick to tick within one session.
#[derive(Clone, Debug)]
pub struct BotRuntimeState {
    pub stall: StallDetector,
    pub weapon_ready: bool,
    pub dodge: DodgeState,
    pub coin_tally: u32,
    pub walls: WallMemory,
}

impl BotRuntimeState {
    pub fn new(bounds: MapBounds, stall_epsilon: f64) -> Self {
        Self {
            stall: StallDetector::new(stall_epsilon),
            weapon_ready: false,
            dodge: DodgeState::Idle,
            coin_tally: 0,
            walls: WallMemory::new(bounds),
        }
    }

    pub fn last_position(&self) -> Option<Point> {
        self.stall.last_position()
    }
}

/// Per-tick composer: weapon setup, coin chasing, enemy engagement and wall
/// dodging merged into one ordered intent list.
pub struct TacticalBot {
    config: TacticsConfig,
    bounds: MapBounds,
    state: BotRuntimeState,
    waypoints: WaypointGenerator,
    telemetry: BotTelemetry,
}

impl TacticalBot {
    pub fn new(config: TacticsConfig, seed: u32) -> Self {
        let bounds = MapBounds::default();
        Self {
            state: BotRuntimeState::new(bounds, config.stall_epsilon),
            waypoints: WaypointGenerator::new(config.waypoint_policy(), SeededRng::new(seed)),
            telemetry: BotTelemetry::default(),
            bounds,
            config,
        }
    }

    pub fn state(&self) -> &BotRuntimeState {
        &self.state
    }

    /// Runs stall detection for this tick. Returns `true` when the agent should
    /// hold position because no escape waypoint could be found.
    fn observe_position(&mut self, pos: Point) -> bool {
        if !self.state.stall.observe(pos) {
            return false;
        }
        self.telemetry.stalls += 1;

        let Some(wall) = infer_wall(pos, self.config.wall_grid()) else {
            debug!(x = pos.x, y = pos.y, "stalled away from any grid line");
            return false;
        };
        if self.state.walls.add(wall) {
            self.telemetry.walls_inferred += 1;
            info!(?wall, known = self.state.walls.len(), "inferred wall");
        }

        match self.waypoints.generate(pos, &self.state.walls) {
            Ok(target) => {
                self.state.dodge.begin(target);
                self.telemetry.dodges_started += 1;
                info!(x = target.x, y = target.y, "dodging toward waypoint");
                false
            }
            Err(err) => {
                self.telemetry.waypoint_failures += 1;
                warn!(%err, "holding position");
                true
            }
        }
    }
}

impl ArenaBot for TacticalBot {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn self_name(&self) -> &str {
        &self.config.self_name
    }

    fn reset(&mut self, seed: u32) {
        self.state = BotRuntimeState::new(self.bounds, self.config.stall_epsilon);
        self.waypoints =
            WaypointGenerator::new(self.config.waypoint_policy(), SeededRng::new(seed));
        self.telemetry = BotTelemetry::default();
    }

    fn on_start(&mut self, bounds: MapBounds) {
        self.bounds = bounds;
        self.state.walls = WallMemory::new(bounds);
    }

    #[tracing::instrument(level = "debug", skip_all, fields(tick = snapshot.tick))]
    fn on_tick(&mut self, snapshot: &GameSnapshot) -> Vec<Intent> {
        self.telemetry.ticks += 1;
        let mut intents = Vec::new();

        if !self.state.weapon_ready {
            debug!(weapon_id = self.config.weapon.id(), "selecting weapon");
            intents.push(Intent::SelectWeapon {
                weapon: self.config.weapon,
            });
            self.state.weapon_ready = true;
        }

        let Some(self_pos) = find_self(&snapshot.players, &self.config.self_name) else {
            self.telemetry.self_missing_ticks += 1;
            let err = TacticsError::SelfNotFound {
                name: self.config.self_name.clone(),
            };
            warn!(%err, "skipping tactics this tick");
            return intents;
        };

        let mut planned = Vec::new();
        if let Some(coin) = nearest_coin(self_pos, &snapshot.coins) {
            planned.push(Intent::MoveTo { target: coin.pos });
        }
        if self.config.engage_enemies {
            if let Some(enemy) =
                nearest_enemy(self_pos, &snapshot.players, &self.config.self_name)
            {
                if self.config.weapon.is_ranged() {
                    planned.push(Intent::AttackAt { target: enemy.pos });
                }
                planned.push(Intent::MoveTo { target: enemy.pos });
            }
        }

        // Only a target set on an earlier tick can complete here.
        if self.state.dodge.settle(self_pos, self.config.dodge_tolerance) {
            self.telemetry.dodges_completed += 1;
            info!(x = self_pos.x, y = self_pos.y, "dodge complete");
        }
        let hold_position = self.observe_position(self_pos);

        if let Some(target) = self.state.dodge.target() {
            planned.push(Intent::MoveTo { target });
        }

        intents.extend(resolve_moves(planned, self.config.move_emission, hold_position));
        intents
    }

    fn on_end(&mut self) -> Vec<Intent> {
        let record = SaveRecord {
            coin_tally: self.state.coin_tally,
        };
        match record.encode() {
            Ok(bytes) => vec![Intent::Persist { bytes }],
            Err(err) => {
                warn!(%err, "dropping end-of-game save");
                Vec::new()
            }
        }
    }

    fn restore(&mut self, record: SaveRecord) {
        self.state.coin_tally = record.coin_tally;
    }

    fn record_coins(&mut self, collected: u32) {
        self.state.coin_tally = self.state.coin_tally.saturating_add(collected);
    }

    fn telemetry(&self) -> BotTelemetry {
        self.telemetry
    }
}

/// Later movement decisions outrank earlier ones. `Single` keeps only the
/// winner; `All` keeps the sequence and leaves the choice to the consumer.
fn resolve_moves(
    planned: Vec<Intent>,
    emission: MoveEmission,
    hold_position: bool,
) -> Vec<Intent> {
    if hold_position {
        return planned.into_iter().filter(|intent| !intent.is_move()).collect();
    }
    match emission {
        MoveEmission::All => planned,
        MoveEmission::Single => {
            let last_move = planned.iter().rposition(Intent::is_move);
            planned
                .into_iter()
                .enumerate()
                .filter(|(idx, intent)| !intent.is_move() || Some(*idx) == last_move)
                .map(|(_, intent)| intent)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WallSegment;
    use crate::intent::Weapon;
    use crate::snapshot::{Coin, Player};

    const ME: &str = "me";

    fn config() -> TacticsConfig {
        TacticsConfig {
            self_name: ME.to_string(),
            ..TacticsConfig::default()
        }
    }

    fn snapshot(
        tick: u64,
        me: Option<Point>,
        others: &[(&str, Point)],
        coins: &[Point],
    ) -> GameSnapshot {
        let mut players = Vec::new();
        if let Some(pos) = me {
            players.push(Player::new(ME, pos));
        }
        for (name, pos) in others {
            players.push(Player::new(*name, *pos));
        }
        GameSnapshot {
            tick,
            players,
            coins: coins
                .iter()
                .enumerate()
                .map(|(idx, pos)| Coin::new(format!("c{idx}"), *pos))
                .collect(),
        }
    }

    fn moves(intents: &[Intent]) -> Vec<Point> {
        intents.iter().filter_map(Intent::move_target).collect()
    }

    #[test]
    fn weapon_is_selected_once_even_when_self_is_missing() {
        let mut bot = TacticalBot::new(config(), 1);
        let first = bot.on_tick(&snapshot(0, None, &[], &[]));
        assert_eq!(
            first,
            vec![Intent::SelectWeapon {
                weapon: Weapon::Cannon
            }]
        );
        let second = bot.on_tick(&snapshot(1, None, &[], &[]));
        assert!(second.is_empty());
        assert_eq!(bot.telemetry().self_missing_ticks, 2);
        assert_eq!(bot.state().last_position(), None);
    }

    #[test]
    fn enemy_engagement_overrides_coin_move() {
        let mut bot = TacticalBot::new(config(), 1);
        let enemy = Point::new(70.0, 70.0);
        let coin = Point::new(52.0, 52.0);
        let me = Some(Point::new(50.0, 50.0));
        let intents = bot.on_tick(&snapshot(0, me, &[("x", enemy)], &[coin]));
        assert_eq!(
            intents,
            vec![
                Intent::SelectWeapon {
                    weapon: Weapon::Cannon
                },
                Intent::AttackAt { target: enemy },
                Intent::MoveTo { target: enemy },
            ]
        );
    }

    #[test]
    fn all_emission_keeps_every_move_in_priority_order() {
        let mut bot = TacticalBot::new(
            TacticsConfig {
                move_emission: MoveEmission::All,
                ..config()
            },
            1,
        );
        let enemy = Point::new(70.0, 70.0);
        let coin = Point::new(52.0, 52.0);
        let me = Some(Point::new(50.0, 50.0));
        let intents = bot.on_tick(&snapshot(0, me, &[("x", enemy)], &[coin]));
        assert_eq!(
            intents,
            vec![
                Intent::SelectWeapon {
                    weapon: Weapon::Cannon
                },
                Intent::MoveTo { target: coin },
                Intent::AttackAt { target: enemy },
                Intent::MoveTo { target: enemy },
            ]
        );
    }

    #[test]
    fn stall_near_grid_line_starts_dodge_that_wins_movement() {
        let mut bot = TacticalBot::new(config(), 42);
        let pos = Point::new(49.5, 60.3);
        let coin = Point::new(80.0, 65.0);
        bot.on_tick(&snapshot(0, Some(pos), &[], &[coin]));
        let intents = bot.on_tick(&snapshot(1, Some(pos), &[], &[coin]));

        assert!(bot
            .state()
            .walls
            .contains(&WallSegment::vertical(50.0, 60.0, 70.0)));
        let target = bot.state().dodge.target().expect("dodging after stall");
        assert_eq!(moves(&intents), vec![target]);
        assert!(!bot.state().walls.any_crosses(pos, target));
    }

    #[test]
    fn dodge_started_this_tick_survives_a_waypoint_inside_tolerance() {
        // Every candidate lies within 0.71 of the stall point, inside the
        // default arrival tolerance.
        let mut bot = TacticalBot::new(
            TacticsConfig {
                waypoint_delta: 0.5,
                ..config()
            },
            1_331_338_725,
        );
        assert_eq!(bot.config.dodge_tolerance, 1.0);
        let pos = Point::new(49.5, 60.3);
        let coin = Point::new(80.0, 65.0);
        bot.on_tick(&snapshot(0, Some(pos), &[], &[coin]));
        let intents = bot.on_tick(&snapshot(1, Some(pos), &[], &[coin]));

        let target = bot.state().dodge.target().expect("dodging after stall");
        assert!(pos.distance(target) <= 1.0);
        assert_eq!(moves(&intents), vec![target]);
        assert_eq!(bot.telemetry().dodges_completed, 0);

        // Arrival is judged on the next tick.
        let next = bot.on_tick(&snapshot(2, Some(target), &[], &[coin]));
        assert!(!bot.state().dodge.is_dodging());
        assert_eq!(bot.telemetry().dodges_completed, 1);
        assert_eq!(moves(&next), vec![coin]);
    }

    #[test]
    fn all_emission_puts_dodge_move_last() {
        let mut bot = TacticalBot::new(
            TacticsConfig {
                move_emission: MoveEmission::All,
                ..config()
            },
            9,
        );
        let pos = Point::new(49.5, 60.3);
        let coin = Point::new(80.0, 65.0);
        let enemy = Point::new(30.0, 30.0);
        let first = bot.on_tick(&snapshot(0, Some(pos), &[("x", enemy)], &[coin]));
        assert_eq!(
            first[0],
            Intent::SelectWeapon {
                weapon: Weapon::Cannon
            }
        );
        let intents = bot.on_tick(&snapshot(1, Some(pos), &[("x", enemy)], &[coin]));

        let target = bot.state().dodge.target().expect("dodging after stall");
        assert_eq!(
            intents,
            vec![
                Intent::MoveTo { target: coin },
                Intent::AttackAt { target: enemy },
                Intent::MoveTo { target: enemy },
                Intent::MoveTo { target },
            ]
        );
    }

    #[test]
    fn blade_never_attacks_but_still_closes_distance() {
        let mut bot = TacticalBot::new(
            TacticsConfig {
                weapon: Weapon::Blade,
                ..config()
            },
            1,
        );
        let enemy = Point::new(20.0, 20.0);
        let me = Some(Point::new(25.0, 25.0));
        let intents = bot.on_tick(&snapshot(0, me, &[("x", enemy)], &[]));
        assert!(!intents
            .iter()
            .any(|intent| matches!(intent, Intent::AttackAt { .. })));
        assert_eq!(moves(&intents), vec![enemy]);
    }

    #[test]
    fn unescapable_stall_holds_position() {
        let mut bot = TacticalBot::new(
            TacticsConfig {
                waypoint_attempts: 8,
                waypoint_shrink_rounds: 0,
                ..config()
            },
            5,
        );
        // Exactly on a grid corner: the inferred wall spans a single point that
        // every candidate path touches.
        let pos = Point::new(50.0, 60.0);
        let coin = Point::new(10.0, 10.0);
        bot.on_tick(&snapshot(0, Some(pos), &[], &[coin]));
        let intents = bot.on_tick(&snapshot(1, Some(pos), &[], &[coin]));
        assert!(moves(&intents).is_empty());
        assert!(!bot.state().dodge.is_dodging());
        assert_eq!(bot.telemetry().waypoint_failures, 1);
        assert!(bot
            .state()
            .walls
            .contains(&WallSegment::vertical(50.0, 60.0, 60.0)));
    }

    #[test]
    fn on_start_reseeds_boundaries_for_map() {
        let mut bot = TacticalBot::new(config(), 1);
        bot.on_start(MapBounds::new(60.0, 40.0));
        assert!(bot
            .state()
            .walls
            .contains(&WallSegment::vertical(60.0, 0.0, 40.0)));
        assert_eq!(bot.state().walls.len(), 4);
    }

    #[test]
    fn restore_and_record_feed_the_save_blob() {
        let mut bot = TacticalBot::new(config(), 1);
        bot.restore(SaveRecord { coin_tally: 3 });
        bot.record_coins(2);
        let end = bot.on_end();
        assert_eq!(
            end,
            vec![Intent::Persist {
                bytes: br#"{"coinTally":5}"#.to_vec()
            }]
        );
    }
}
