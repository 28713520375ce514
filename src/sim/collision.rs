//! Collision detection and response for axis-aligned boxes
//!
//! Detection is a strict AABB overlap. Response depends on what the
//! character ran into, so targets are a tagged enum and every pairing has
//! exactly one arm in `resolve`.

use super::character::Character;
use super::rect::Rect;
use super::state::{Enemy, Platform};
use crate::consts::*;

/// Something the character can collide with this tick
#[derive(Debug)]
pub enum Target<'a> {
    Enemy(&'a mut Enemy),
    Platform(&'a Platform),
}

/// Outcome of resolving one character/target pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No overlap, dead enemy, or a platform approached from below/the side
    Ignored,
    /// Character came down on the enemy and defeated it
    Stomp,
    /// Character touched a live enemy any other way
    Damage {
        /// False when the hit landed during invulnerability
        lost_life: bool,
    },
    /// Character came to rest on top of a platform
    Landed,
}

/// Strict overlap test; boxes that only share an edge do not overlap
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Detect and resolve a single pair, mutating both sides as needed
///
/// Score and death counting are left to the caller, keyed off the result.
pub fn resolve(character: &mut Character, target: Target<'_>) -> Resolution {
    match target {
        Target::Enemy(enemy) => {
            if !enemy.alive || !overlaps(&character.rect(), &enemy.rect()) {
                return Resolution::Ignored;
            }
            resolve_enemy(character, enemy)
        }
        Target::Platform(platform) => resolve_platform(character, platform),
    }
}

/// Stomp if falling with the character's top above the enemy's top,
/// otherwise the character takes the hit
fn resolve_enemy(character: &mut Character, enemy: &mut Enemy) -> Resolution {
    let body = &mut character.body;
    if body.vel.y > 0.0 && body.pos.y < enemy.body.pos.y {
        enemy.alive = false;
        body.vel.y = JUMP_FORCE / 2.0;
        Resolution::Stomp
    } else {
        Resolution::Damage {
            lost_life: character.take_damage(),
        }
    }
}

/// One-way landing test: overlapping, falling, and with the feet inside the
/// tolerance band above the surface
pub fn lands_on(character: &Character, platform: &Platform) -> bool {
    let body = &character.body;
    overlaps(&character.rect(), &platform.rect())
        && body.vel.y > 0.0
        && body.pos.y < platform.y
        && body.pos.y + body.size.y > platform.y - LANDING_TOLERANCE
}

/// Index of the platform the character lands on this tick, if any
///
/// Every platform is tested against the same character position; when
/// several qualify the last one in `platforms` wins.
pub fn landing_platform(character: &Character, platforms: &[Platform]) -> Option<usize> {
    platforms.iter().rposition(|p| lands_on(character, p))
}

fn resolve_platform(character: &mut Character, platform: &Platform) -> Resolution {
    if !lands_on(character, platform) {
        return Resolution::Ignored;
    }
    character.body.pos.y = platform.y - character.body.size.y;
    character.body.vel.y = 0.0;
    character.on_ground = true;
    Resolution::Landed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(1, x, y, 1.0)
    }

    #[test]
    fn test_overlap_interior() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(-10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(overlaps(&outer, &inner));
        assert!(overlaps(&inner, &outer));
    }

    #[test]
    fn test_stomp() {
        let mut character = Character::new(100.0, 100.0);
        character.body.vel.y = 5.0;
        let mut enemy = enemy_at(105.0, 110.0);

        let result = resolve(&mut character, Target::Enemy(&mut enemy));
        assert_eq!(result, Resolution::Stomp);
        assert!(!enemy.alive);
        assert_eq!(character.body.vel.y, JUMP_FORCE / 2.0);
        assert_eq!(character.lives, STARTING_LIVES);
    }

    #[test]
    fn test_rising_contact_damages() {
        let mut character = Character::new(100.0, 110.0);
        character.body.vel.y = -5.0;
        let mut enemy = enemy_at(105.0, 110.0);

        let result = resolve(&mut character, Target::Enemy(&mut enemy));
        assert_eq!(result, Resolution::Damage { lost_life: true });
        assert!(enemy.alive);
        assert_eq!(character.lives, STARTING_LIVES - 1);
        assert!(character.invulnerable());

        // Still touching next tick: no extra life lost
        let result = resolve(&mut character, Target::Enemy(&mut enemy));
        assert_eq!(result, Resolution::Damage { lost_life: false });
        assert_eq!(character.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_falling_but_below_enemy_top_damages() {
        // Side hit while falling: character top is not above the enemy top
        let mut character = Character::new(100.0, 120.0);
        character.body.vel.y = 3.0;
        let mut enemy = enemy_at(120.0, 110.0);

        let result = resolve(&mut character, Target::Enemy(&mut enemy));
        assert_eq!(result, Resolution::Damage { lost_life: true });
        assert!(enemy.alive);
    }

    #[test]
    fn test_dead_enemy_is_ignored() {
        let mut character = Character::new(100.0, 110.0);
        let mut enemy = enemy_at(105.0, 110.0);
        enemy.alive = false;

        let result = resolve(&mut character, Target::Enemy(&mut enemy));
        assert_eq!(result, Resolution::Ignored);
        assert_eq!(character.lives, STARTING_LIVES);
    }

    #[test]
    fn test_no_overlap_is_ignored() {
        let mut character = Character::new(0.0, 0.0);
        let mut enemy = enemy_at(300.0, 300.0);
        assert_eq!(
            resolve(&mut character, Target::Enemy(&mut enemy)),
            Resolution::Ignored
        );
    }

    #[test]
    fn test_platform_landing() {
        let platform = Platform::new(300.0, 450.0, 200.0);
        // Feet 5 units into the platform
        let mut character = Character::new(350.0, 450.0 - CHARACTER_HEIGHT + 5.0);
        character.body.vel.y = 3.0;

        let result = resolve(&mut character, Target::Platform(&platform));
        assert_eq!(result, Resolution::Landed);
        assert_eq!(character.rect().bottom(), platform.y);
        assert_eq!(character.body.vel.y, 0.0);
        assert!(character.on_ground);
    }

    #[test]
    fn test_platform_ignored_when_rising() {
        let platform = Platform::new(300.0, 450.0, 200.0);
        let mut character = Character::new(350.0, 450.0 - CHARACTER_HEIGHT + 5.0);
        character.body.vel.y = -3.0;

        let result = resolve(&mut character, Target::Platform(&platform));
        assert_eq!(result, Resolution::Ignored);
        assert!(!character.on_ground);
    }

    #[test]
    fn test_landing_platform_prefers_last_match() {
        let platforms = [
            Platform::new(300.0, 450.0, 200.0),
            Platform::new(0.0, 100.0, 50.0),
            Platform::new(300.0, 445.0, 200.0),
        ];
        let mut character = Character::new(350.0, 419.5);
        character.body.vel.y = 3.5;
        assert_eq!(landing_platform(&character, &platforms), Some(2));

        character.body.vel.y = -1.0;
        assert_eq!(landing_platform(&character, &platforms), None);
    }

    #[test]
    fn test_platform_ignored_from_below() {
        // Head inside the platform from underneath
        let platform = Platform::new(300.0, 450.0, 200.0);
        let mut character = Character::new(350.0, 460.0);
        character.body.vel.y = 2.0;

        let result = resolve(&mut character, Target::Platform(&platform));
        assert_eq!(result, Resolution::Ignored);
        assert_eq!(character.body.pos.y, 460.0);
    }
}
