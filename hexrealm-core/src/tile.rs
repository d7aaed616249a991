//! Terrain kinds

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// RGB display color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color with three independently random channels, used for player identification
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen(), rng.gen(), rng.gen())
    }
}

/// Named terrain kind.
///
/// Immutable once built. [`TileType::OCEAN`] is the only non-land kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileType {
    pub name: &'static str,
    pub color: Color,
    /// Render height of the tile column
    pub height: f32,
    /// Energy spent to enter a hex of this kind (always positive)
    pub cost: i32,
    land: bool,
}

impl TileType {
    pub const OCEAN: TileType = TileType {
        name: "Ocean",
        color: Color::BLUE,
        height: 0.1,
        cost: 2,
        land: false,
    };

    pub const PLAINS: TileType = TileType {
        name: "Plains",
        color: Color::GREEN,
        height: 0.2,
        cost: 5,
        land: true,
    };

    /// Define an additional land kind
    pub fn land(
        name: &'static str,
        color: Color,
        height: f32,
        cost: i32,
    ) -> Result<Self, GameError> {
        if cost <= 0 {
            return Err(GameError::InvalidTileCost { name, cost });
        }
        Ok(Self {
            name,
            color,
            height,
            cost,
            land: true,
        })
    }

    pub fn is_land(&self) -> bool {
        self.land
    }

    /// Single-character glyph for text rendering
    pub fn glyph(&self) -> char {
        if !self.land {
            '~'
        } else {
            self.name
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('#')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        assert!(!TileType::OCEAN.is_land());
        assert!(TileType::PLAINS.is_land());
        assert_eq!(TileType::OCEAN.cost, 2);
        assert_eq!(TileType::PLAINS.cost, 5);
    }

    #[test]
    fn test_custom_land_rejects_free_movement() {
        let err = TileType::land("Marsh", Color::WHITE, 0.15, 0).unwrap_err();
        assert!(matches!(err, GameError::InvalidTileCost { cost: 0, .. }));

        let hills = TileType::land("Hills", Color::WHITE, 0.4, 7).unwrap();
        assert!(hills.is_land());
        assert_eq!(hills.glyph(), 'H');
    }

    #[test]
    fn test_random_color_channels_are_independent() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        let colors: Vec<Color> = (0..64).map(|_| Color::random(&mut rng)).collect();

        // channels take mid-range values and are not tied to each other
        assert!(colors.iter().any(|c| (64..192).contains(&c.g)));
        assert!(colors.iter().any(|c| c.r != c.g || c.g != c.b));
        let mut again = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        assert_eq!(Color::random(&mut again), colors[0]);
    }
}
