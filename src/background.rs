//! Two screen-wide tiles leapfrogging each other for an endless scroll.

#[derive(Debug, Clone)]
pub struct ScrollingBackground {
    /// Left edges of the two tiles.
    pub tiles: [f64; 2],
    pub tile_width: f64,
    speed: f64,
}

impl ScrollingBackground {
    pub fn new(screen_width: f64, speed: f64) -> Self {
        Self {
            tiles: [0.0, screen_width],
            tile_width: screen_width,
            speed,
        }
    }

    pub fn step(&mut self, dt: f64) {
        for x in &mut self.tiles {
            *x -= self.speed * dt;
        }
        self.wrap();
    }

    fn wrap(&mut self) {
        let w = self.tile_width;
        if w <= 0.0 {
            return;
        }
        // Drop whole two-tile laps first so a huge dt needs at most two hops.
        let period = 2.0 * w;
        let lead = self.tiles[0].min(self.tiles[1]);
        if lead + w <= 0.0 {
            let laps = ((-lead - w) / period).floor();
            for x in &mut self.tiles {
                *x += laps * period;
            }
        }
        for _ in 0..2 {
            let (lead, other) = if self.tiles[0] <= self.tiles[1] { (0, 1) } else { (1, 0) };
            if self.tiles[lead] + w > 0.0 {
                break;
            }
            self.tiles[lead] = self.tiles[other] + w;
        }
    }

    /// Horizontal extent covered by the tiles, as `(left, right)`.
    pub fn coverage(&self) -> (f64, f64) {
        let left = self.tiles[0].min(self.tiles[1]);
        let right = self.tiles[0].max(self.tiles[1]) + self.tile_width;
        (left, right)
    }
}
