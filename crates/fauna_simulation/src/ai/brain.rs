//! Animal FSM step — ядро поведения
//!
//! Один вызов `AnimalBrain::step` = один тик симуляции:
//! 1. Первый тик после активации → вход в Idle
//! 2. Длительность состояния истекла → exit rule (Idle → Graze/Wander, остальные → Idle)
//! 3. Не во Flee и `should_flee()` → Flee (глобальное правило, для любого состояния)
//! 4. Тело текущего состояния: повороты + motion intent через Locomotion
//!
//! Деградация вместо ошибок:
//! - нет stats → стоим в Idle
//! - нет sensors → не видим угрозу, не двигаемся (повороты остаются)
//! - нет locomotion → нет позы, значит ни бегства, ни движения; таймеры идут

use bevy::prelude::*;
use rand::Rng;

use super::components::{AnimalBrain, AnimalState, AnimalStateKind, StateTransition, TransitionCause};
use super::species::{FleeCheck, SpeciesBehavior};
use crate::components::AnimalStats;
use crate::physics::Locomotion;
use crate::sensors::{is_cliff_ahead, is_obstacle_ahead, SensorConfig, SightTarget, WorldQuery};

/// Wander длится U[2, 4] секунд
pub const WANDER_DURATION: (f32, f32) = (2.0, 4.0);

/// Graze длится U[2, 5] секунд
pub const GRAZE_DURATION: (f32, f32) = (2.0, 5.0);

/// Wander: yaw bias применяется с половинной силой
pub const WANDER_YAW_DAMPING: f32 = 0.5;

/// Flee: away-вектор короче этого (в квадрате) = вырожденная геометрия, не крутимся
pub const MIN_FLEE_AWAY_SQUARED: f32 = 0.001;

/// Всё, что FSM читает из мира в этот тик
pub struct TickContext<'a> {
    pub stats: Option<&'a AnimalStats>,
    /// Фильтры уже должны исключать собственное тело агента
    pub sensors: Option<&'a SensorConfig>,
    pub species: &'a dyn SpeciesBehavior,
    /// Резолвнутая угроза (None если ссылки нет или она протухла)
    pub threat: Option<SightTarget>,
    pub world: &'a dyn WorldQuery,
}

/// U[min, max]; вырожденный/перевёрнутый диапазон → min
fn draw_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Вход в состояние: все per-state параметры тянутся заново
pub fn enter_state<R: Rng + ?Sized>(
    kind: AnimalStateKind,
    stats: &AnimalStats,
    species: &dyn SpeciesBehavior,
    rng: &mut R,
) -> AnimalState {
    match kind {
        AnimalStateKind::Idle => AnimalState::Idle {
            remaining: draw_range(rng, stats.min_idle_time, stats.max_idle_time),
        },
        AnimalStateKind::Wander => {
            let duration = draw_range(rng, WANDER_DURATION.0, WANDER_DURATION.1);
            let range = species.wander_yaw_range_deg().abs();
            AnimalState::Wander {
                elapsed: 0.0,
                duration,
                yaw_bias_deg: draw_range(rng, -range, range),
            }
        }
        AnimalStateKind::Graze => AnimalState::Graze {
            elapsed: 0.0,
            duration: draw_range(rng, GRAZE_DURATION.0, GRAZE_DURATION.1),
        },
        AnimalStateKind::Flee => AnimalState::Flee {
            elapsed: 0.0,
            duration: draw_range(rng, stats.flee_duration_range.0, stats.flee_duration_range.1),
        },
    }
}

/// Куда идём, когда длительность состояния истекла
pub fn next_after_expiry<R: Rng + ?Sized>(current: AnimalStateKind, stats: &AnimalStats, rng: &mut R) -> AnimalStateKind {
    match current {
        AnimalStateKind::Idle => {
            if rng.gen::<f32>() < stats.graze_chance {
                AnimalStateKind::Graze
            } else {
                AnimalStateKind::Wander
            }
        }
        AnimalStateKind::Wander | AnimalStateKind::Graze | AnimalStateKind::Flee => AnimalStateKind::Idle,
    }
}

/// Обрыв или препятствие по курсу. None = нечем проверить (нет sensors)
fn path_blocked(ctx: &TickContext<'_>, body: &dyn Locomotion) -> Option<bool> {
    let sensors = ctx.sensors?;
    let position = body.position();
    let forward = body.forward();
    let eye = sensors.eye_origin(position, body.rotation());

    let cliff = is_cliff_ahead(
        position,
        forward,
        &sensors.ground_filter,
        sensors.cliff_probe_forward,
        sensors.cliff_drop_distance,
        ctx.world,
    );
    let obstacle = is_obstacle_ahead(
        eye,
        forward,
        &sensors.obstacle_filter,
        sensors.obstacle_probe_distance,
        ctx.world,
    );

    Some(cliff || obstacle)
}

impl AnimalBrain {
    /// Один тик FSM. Возвращает переходы, случившиеся за тик (0..=2)
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        ctx: &TickContext<'_>,
        mut body: Option<&mut dyn Locomotion>,
        rng: &mut R,
        delta: f32,
    ) -> Vec<StateTransition> {
        let mut transitions = Vec::new();

        let Some(stats) = ctx.stats else {
            if self.kind() != AnimalStateKind::Idle {
                transitions.push(StateTransition {
                    from: self.kind(),
                    to: AnimalStateKind::Idle,
                    cause: TransitionCause::MissingStats,
                });
            }
            // Статы вернутся → Activated заново вытянет длительность Idle
            self.reset();
            return transitions;
        };

        if !self.activated {
            self.activated = true;
            transitions.push(self.enter(AnimalStateKind::Idle, TransitionCause::Activated, ctx, stats, rng));
        } else if self.state.is_expired() {
            let next = next_after_expiry(self.kind(), stats, rng);
            transitions.push(self.enter(next, TransitionCause::Expired, ctx, stats, rng));
        }

        if self.kind() != AnimalStateKind::Flee && self.should_flee(ctx, stats, body.as_deref()) {
            transitions.push(self.enter(AnimalStateKind::Flee, TransitionCause::ThreatSighted, ctx, stats, rng));
        }

        if let Some(body) = body.as_deref_mut() {
            self.run_state(ctx, stats, body, rng, delta);
        }
        self.state.advance(delta);

        transitions
    }

    fn enter<R: Rng + ?Sized>(
        &mut self,
        kind: AnimalStateKind,
        cause: TransitionCause,
        ctx: &TickContext<'_>,
        stats: &AnimalStats,
        rng: &mut R,
    ) -> StateTransition {
        let from = self.kind();
        self.state = enter_state(kind, stats, ctx.species, rng);
        StateTransition { from, to: kind, cause }
    }

    fn should_flee(&self, ctx: &TickContext<'_>, stats: &AnimalStats, body: Option<&dyn Locomotion>) -> bool {
        let Some(body) = body else {
            return false;
        };

        let check = FleeCheck {
            stats: Some(stats),
            sensors: ctx.sensors,
            threat: ctx.threat,
            world: ctx.world,
            position: body.position(),
            rotation: body.rotation(),
        };
        ctx.species.should_flee(&check)
    }

    fn run_state<R: Rng + ?Sized>(
        &self,
        ctx: &TickContext<'_>,
        stats: &AnimalStats,
        body: &mut dyn Locomotion,
        rng: &mut R,
        delta: f32,
    ) {
        match self.state {
            AnimalState::Idle { .. } => {}

            AnimalState::Wander { yaw_bias_deg, .. } => {
                let blocked = path_blocked(ctx, body);

                // Обрыв/препятствие → резкий разворот, иначе плавный дрейф
                if blocked == Some(true) {
                    body.rotate(ctx.species.obstacle_avoid_yaw_deg() * delta);
                } else {
                    body.rotate(yaw_bias_deg * delta * WANDER_YAW_DAMPING);
                }

                if blocked == Some(false) {
                    let forward = body.forward();
                    body.move_forward(forward, stats.walk_speed);
                }
            }

            AnimalState::Graze { .. } => {
                let jitter = ctx.species.graze_yaw_jitter_deg().abs();
                body.rotate(draw_range(rng, -jitter, jitter) * delta);
            }

            AnimalState::Flee { .. } => {
                if let Some(threat) = ctx.threat {
                    let mut away = body.position() - threat.position;
                    away.y = 0.0;

                    if away.length_squared() > MIN_FLEE_AWAY_SQUARED {
                        let facing_away = Transform::IDENTITY.looking_to(away, Vec3::Y).rotation;
                        body.rotate_toward(facing_away, stats.turn_speed_deg_per_sec * delta);
                    }
                }

                if path_blocked(ctx, body) == Some(false) {
                    let forward = body.forward();
                    body.move_forward(forward, stats.run_speed * ctx.species.flee_speed_multiplier());
                }
            }
        }
    }
}
