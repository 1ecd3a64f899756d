//! Draws a read-only [`Game`] into a [`PixelBuf`] plus text labels.

use crate::game::{Game, GameState};
use crate::geometry::Rect;
use crate::pixel::{Label, PixelBuf, Rgb, SHADOW, WHITE, draw_number};
use std::f64::consts::TAU;

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const CLOUD: Rgb = Rgb(235, 245, 250);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const STICK_DARK: Rgb = Rgb(92, 58, 28);
const STICK_MID: Rgb = Rgb(140, 92, 45);
const STICK_LIGHT: Rgb = Rgb(176, 124, 66);
const STICK_HI: Rgb = Rgb(205, 160, 98);
const KNOT: Rgb = Rgb(70, 42, 20);
const FUR: Rgb = Rgb(150, 95, 45);
const FUR_DARK: Rgb = Rgb(115, 70, 30);
const FACE: Rgb = Rgb(240, 200, 150);
const EYE: Rgb = Rgb(25, 20, 15);
const BAND: Rgb = Rgb(245, 200, 40);
const MOUTH: Rgb = Rgb(200, 80, 60);
const PANEL: Rgb = Rgb(210, 185, 110);
const PANEL_IN: Rgb = Rgb(220, 195, 120);
const BUTTON: Rgb = Rgb(235, 125, 20);
const BUTTON_HI: Rgb = Rgb(250, 165, 60);
const BEST: Rgb = Rgb(245, 200, 66);

/// Maps world units (y up) onto a pixel grid (y down), stretched to fill it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pw: usize,
    pub ph: usize,
    pub world_w: f64,
    pub world_h: f64,
}

/// Pixel-space rectangle, `x0..x1` by `y0..y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PxRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PxRect {
    pub fn w(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn h(&self) -> i32 {
        self.y1 - self.y0
    }
}

impl Viewport {
    pub fn new(pw: usize, ph: usize, world_w: f64, world_h: f64) -> Self {
        Self {
            pw,
            ph,
            world_w,
            world_h,
        }
    }

    fn sx(&self) -> f64 {
        self.pw as f64 / self.world_w
    }

    fn sy(&self) -> f64 {
        self.ph as f64 / self.world_h
    }

    pub fn px_x(&self, x: f64) -> i32 {
        (x * self.sx()).round() as i32
    }

    pub fn px_y(&self, y: f64) -> i32 {
        (self.ph as f64 - y * self.sy()).round() as i32
    }

    pub fn rect(&self, r: &Rect) -> PxRect {
        PxRect {
            x0: self.px_x(r.x),
            y0: self.px_y(r.top()),
            x1: self.px_x(r.right()),
            y1: self.px_y(r.y),
        }
    }

    /// World point at the centre of a terminal cell.
    pub fn cell_to_world(&self, col: u16, row: u16) -> (f64, f64) {
        let px = col as f64 + 0.5;
        let py = row as f64 * 2.0 + 1.0;
        (px / self.sx(), self.world_h - py / self.sy())
    }

    /// Terminal cell holding a world point.
    pub fn world_to_cell(&self, x: f64, y: f64) -> (u16, u16) {
        let px = (x * self.sx()).floor().max(0.0);
        let py = (self.ph as f64 - y * self.sy()).floor().max(0.0);
        (px as u16, (py / 2.0) as u16)
    }
}

/// Draw the whole frame. Returns the text to overlay.
pub fn draw(game: &Game, buf: &mut PixelBuf) -> Vec<Label> {
    let vp = Viewport::new(
        buf.width(),
        buf.height(),
        game.screen_width(),
        game.screen_height(),
    );
    let mut labels = Vec::new();

    draw_background(game, &vp, buf);
    draw_sticks(game, &vp, buf);
    draw_monkey(&vp.rect(&game.player.rect()), buf);

    match game.state {
        GameState::Running => {
            draw_number(buf, vp.pw as i32 / 2, 3, game.score, digit_scale(&vp), WHITE);
        }
        GameState::Ready => {
            let (_, row) = vp.world_to_cell(0.0, game.screen_height() * 0.75);
            labels.push(centered(&vp, row, "FLAPPY WUKONG", BEST, None));
            if let Some(button) = game.button_rect() {
                draw_button(&vp, &button, "Start", buf, &mut labels);
            }
        }
        GameState::GameOver => {
            buf.dim();
            draw_game_over(game, &vp, buf, &mut labels);
        }
    }

    labels.push(Label {
        col: 1,
        row: 0,
        text: format!("Score: {}", game.score),
        fg: WHITE,
        bg: None,
    });
    labels
}

fn digit_scale(vp: &Viewport) -> i32 {
    (vp.ph as i32 / 48).max(1)
}

fn centered(vp: &Viewport, row: u16, text: &str, fg: Rgb, bg: Option<Rgb>) -> Label {
    let len = text.chars().count();
    let col = vp.pw.saturating_sub(len) / 2;
    Label {
        col: col as u16,
        row,
        text: text.to_string(),
        fg,
        bg,
    }
}

// ── Background ──────────────────────────────────────────────────────────────

fn draw_background(game: &Game, vp: &Viewport, buf: &mut PixelBuf) {
    let tile_w = game.background.tile_width;
    let ground_y = vp.px_y(game.screen_height() * 0.04);
    for &tile_x in &game.background.tiles {
        let r = vp.rect(&Rect::new(tile_x, 0.0, tile_w, game.screen_height()));
        draw_tile(buf, r, ground_y);
    }
}

/// One background tile. The pattern repeats a whole number of times across
/// the tile so neighbouring tiles join without a seam.
fn draw_tile(buf: &mut PixelBuf, r: PxRect, ground_y: i32) {
    let w = r.w().max(1) as f64;
    let h = r.h().max(1);
    let scale = h as f64 / 48.0;
    for col in 0..r.w() {
        let x = r.x0 + col;
        if x < 0 || x >= buf.width() as i32 {
            continue;
        }
        let u = col as f64 / w;
        let far = ground_y - (((u * TAU * 2.0).sin() * 5.0 + (u * TAU * 5.0).sin() * 2.0 + 9.0) * scale) as i32;
        let near = ground_y - (((u * TAU * 3.0 + 1.0).sin() * 3.0 + (u * TAU * 7.0).sin() + 4.0) * scale) as i32;
        let cloud_mid = r.y0 + (h as f64 * 0.22) as i32;
        let cloud_half = ((u * TAU * 3.0).sin() * 2.5 * scale) as i32;
        for y in r.y0..r.y1 {
            let c = if y >= ground_y {
                let stripe = (col / 3 + (y - ground_y)) % 2 == 0;
                if y == ground_y && stripe { GRASS_LIGHT } else { GRASS }
            } else if y >= near {
                HILL_NEAR
            } else if y >= far {
                HILL_FAR
            } else if cloud_half > 0 && (y - cloud_mid).abs() < cloud_half {
                CLOUD
            } else {
                let t = ((y - r.y0) * 256 / h).clamp(0, 256) as u16;
                Rgb::lerp(SKY_TOP, SKY_BOT, t)
            };
            buf.set(x, y, c);
        }
    }
}

// ── Sticks ──────────────────────────────────────────────────────────────────

fn stick_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return STICK_MID;
    }
    let t = (x * 256 / (total_w - 1)) as u16;
    match t {
        0..64 => Rgb::lerp(STICK_DARK, STICK_MID, t * 4),
        64..100 => Rgb::lerp(STICK_MID, STICK_HI, (t - 64) * 7),
        100..160 => Rgb::lerp(STICK_HI, STICK_LIGHT, (t - 100) * 4),
        _ => Rgb::lerp(STICK_LIGHT, STICK_DARK, (t - 160) * 3),
    }
}

fn draw_sticks(game: &Game, vp: &Viewport, buf: &mut PixelBuf) {
    let top = vp.rect(&game.obstacle.top_rect());
    let bottom = vp.rect(&game.obstacle.bottom_rect());
    let knot_every = (vp.ph as i32 / 8).max(3);
    // Knots count from the gap end so they don't crawl as the stick recycles.
    draw_stick(buf, top, |y| (top.y1 - 1 - y) % knot_every == knot_every - 1);
    draw_stick(buf, bottom, |y| (y - bottom.y0) % knot_every == knot_every - 1);

    // Caps at the gap ends.
    let cap_h = (vp.ph as i32 / 60).max(1);
    let extra = (top.w() / 6).max(1);
    buf.fill_rect(top.x0 - extra, top.y1 - cap_h, top.w() + extra * 2, cap_h, KNOT);
    buf.fill_rect(bottom.x0 - extra, bottom.y0, bottom.w() + extra * 2, cap_h, KNOT);
}

fn draw_stick(buf: &mut PixelBuf, r: PxRect, is_knot: impl Fn(i32) -> bool) {
    for y in r.y0..r.y1 {
        let knot = is_knot(y);
        for dx in 0..r.w() {
            let c = if knot { KNOT } else { stick_shade(dx, r.w()) };
            buf.set(r.x0 + dx, y, c);
        }
    }
}

// ── Monkey ──────────────────────────────────────────────────────────────────

fn draw_monkey(r: &PxRect, buf: &mut PixelBuf) {
    let w = r.w().max(1) as f64;
    let h = r.h().max(1) as f64;
    for dy in 0..r.h().max(1) {
        for dx in 0..r.w().max(1) {
            // Normalised to [-1, 1] with v pointing up.
            let u = (dx as f64 + 0.5) / w * 2.0 - 1.0;
            let v = 1.0 - (dy as f64 + 0.5) / h * 2.0;
            if let Some(c) = monkey_pixel(u, v) {
                buf.set(r.x0 + dx, r.y0 + dy, c);
            }
        }
    }
}

fn inside(u: f64, v: f64, cu: f64, cv: f64, ru: f64, rv: f64) -> bool {
    let a = (u - cu) / ru;
    let b = (v - cv) / rv;
    a * a + b * b <= 1.0
}

/// Colour of the monkey sprite at a normalised point, `None` for transparent.
fn monkey_pixel(u: f64, v: f64) -> Option<Rgb> {
    let eye = inside(u, v, -0.25, 0.05, 0.12, 0.16) || inside(u, v, 0.3, 0.05, 0.12, 0.16);
    let head = inside(u, v, 0.0, 0.0, 0.78, 0.85);
    let face = inside(u, v, 0.05, -0.15, 0.55, 0.5) || inside(u, v, -0.25, 0.1, 0.28, 0.3)
        || inside(u, v, 0.3, 0.1, 0.28, 0.3);
    let ear = inside(u, v, -0.85, 0.1, 0.2, 0.25) || inside(u, v, 0.85, 0.1, 0.2, 0.25);

    if head && eye {
        Some(EYE)
    } else if head && (0.38..0.55).contains(&v) {
        Some(BAND)
    } else if head && face && (-0.55..-0.4).contains(&v) && u.abs() < 0.25 {
        Some(MOUTH)
    } else if head && face {
        Some(FACE)
    } else if head {
        Some(if v > 0.6 { FUR_DARK } else { FUR })
    } else if ear {
        Some(FACE)
    } else {
        None
    }
}

// ── Overlays ────────────────────────────────────────────────────────────────

fn draw_button(
    vp: &Viewport,
    button: &Rect,
    text: &str,
    buf: &mut PixelBuf,
    labels: &mut Vec<Label>,
) {
    let r = vp.rect(button);
    buf.fill_rect(r.x0 + 1, r.y0 + 1, r.w(), r.h(), SHADOW);
    buf.fill_rect(r.x0, r.y0, r.w(), r.h(), BUTTON);
    buf.fill_rect(r.x0, r.y0, r.w(), 1, BUTTON_HI);
    let (col, row) = vp.world_to_cell(button.x + button.w / 2.0, button.y + button.h / 2.0);
    labels.push(Label {
        col: col.saturating_sub(text.len() as u16 / 2),
        row,
        text: text.to_string(),
        fg: WHITE,
        bg: Some(BUTTON),
    });
}

fn draw_game_over(game: &Game, vp: &Viewport, buf: &mut PixelBuf, labels: &mut Vec<Label>) {
    let w = game.screen_width();
    let h = game.screen_height();
    let panel = Rect::new((w - 300.0) / 2.0, h * 0.5, 300.0, h * 0.3);
    let r = vp.rect(&panel);
    buf.fill_rect(r.x0 - 1, r.y0 - 1, r.w() + 2, r.h() + 2, SHADOW);
    buf.fill_rect(r.x0, r.y0, r.w(), r.h(), PANEL);
    buf.fill_rect(r.x0 + 1, r.y0 + 1, r.w() - 2, r.h() - 2, PANEL_IN);

    let (_, title_row) = vp.world_to_cell(0.0, panel.top() - panel.h * 0.15);
    labels.push(centered(vp, title_row, "GAME OVER", WHITE, Some(PANEL_IN)));

    let scale = digit_scale(vp);
    let mid = r.x0 + r.w() / 2;
    let score_y = r.y0 + r.h() * 2 / 5;
    draw_number(buf, mid, score_y, game.score, scale, WHITE);
    draw_number(buf, mid, score_y + 7 * scale, game.best, scale, BEST);

    if let Some(button) = game.button_rect() {
        draw_button(vp, &button, "Replay", buf, labels);
    }
}
