/// Tile edge length in pixels. 64×64 `f64` values = 32 KB per tile.
pub const TILE_SIZE: u32 = 64;

/// A rectangular block of pixels rendered as one unit of parallel work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Pixel x of the top-left corner.
    pub x: u32,
    /// Pixel y of the top-left corner.
    pub y: u32,
    /// Width in pixels (narrower along the right edge).
    pub width: u32,
    /// Height in pixels (shorter along the bottom edge).
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Cover a `width × height` image with non-overlapping tiles, row-major.
pub fn build_tile_grid(width: u32, height: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut y = 0;
    while y < height {
        let th = TILE_SIZE.min(height - y);
        let mut x = 0;
        while x < width {
            let tw = TILE_SIZE.min(width - x);
            tiles.push(Tile {
                x,
                y,
                width: tw,
                height: th,
            });
            x += tw;
        }
        y += th;
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_every_pixel_once() {
        let (w, h) = (200u32, 150u32);
        let tiles = build_tile_grid(w, h);
        let mut covered = vec![0u8; (w * h) as usize];
        for tile in &tiles {
            assert!(tile.width <= TILE_SIZE && tile.height <= TILE_SIZE);
            for py in tile.y..tile.y + tile.height {
                for px in tile.x..tile.x + tile.width {
                    covered[(py * w + px) as usize] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn edge_tiles_are_clipped() {
        let tiles = build_tile_grid(70, 65);
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[1], Tile { x: 64, y: 0, width: 6, height: 64 });
        assert_eq!(tiles[3], Tile { x: 64, y: 64, width: 6, height: 1 });
    }

    #[test]
    fn empty_image_has_no_tiles() {
        assert!(build_tile_grid(0, 10).is_empty());
        assert!(build_tile_grid(10, 0).is_empty());
    }
}
