use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute, terminal,
};
use flappy_wukong::audio::Audio;
use flappy_wukong::pixel::PixelBuf;
use flappy_wukong::scene::{self, Viewport};
use flappy_wukong::{Config, Game, GameEvent, Variant};
use log::info;
use std::fs::File;
use std::io::{self, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

// ── Logging ─────────────────────────────────────────────────────────────────

/// The screen belongs to the game, so log lines go to a file or nowhere.
fn init_logging(path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    let Ok(file) = File::create(path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

// ── Frame loop ──────────────────────────────────────────────────────────────

enum Input {
    Tap,
    Button,
    Click(u16, u16),
    Resize(u16, u16),
    Quit,
}

fn read_input() -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    while event::poll(Duration::ZERO)? {
        let input = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
                KeyCode::Char(' ') | KeyCode::Up => Input::Tap,
                KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('s') => Input::Button,
                _ => continue,
            },
            Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                Input::Click(m.column, m.row)
            }
            Event::Resize(c, r) => Input::Resize(c, r),
            _ => continue,
        };
        inputs.push(input);
    }
    Ok(inputs)
}

fn run(out: &mut impl Write, mut config: Config) -> Result<()> {
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    if config.variant == Variant::Mobile {
        config.fit_fullscreen(buf.width(), buf.height());
    }

    let frame_dur = Duration::from_secs_f64(config.tick_interval());
    let max_dt = config.max_frame_dt;
    let mut audio = Audio::open(&config.audio);
    let mut game = Game::new(config);
    audio.start_music();

    let mut last_tick = Instant::now();
    loop {
        let frame_start = Instant::now();

        let mut events: Vec<GameEvent> = Vec::new();
        for input in read_input()? {
            match input {
                Input::Quit => {
                    info!("quit at score {}", game.score);
                    audio.stop_music();
                    return Ok(());
                }
                Input::Tap => events.extend(game.tap()),
                Input::Button => events.extend(game.press_button()),
                Input::Click(col, row) => {
                    let vp = Viewport::new(
                        buf.width(),
                        buf.height(),
                        game.screen_width(),
                        game.screen_height(),
                    );
                    let (x, y) = vp.cell_to_world(col, row);
                    match game.button_rect() {
                        Some(button) if button.contains(x, y) => {
                            events.extend(game.press_button())
                        }
                        _ => events.extend(game.tap()),
                    }
                }
                Input::Resize(c, r) => {
                    buf.resize(c as usize, r as usize * 2);
                    if game.config.variant == Variant::Mobile {
                        game.refit(buf.width(), buf.height());
                    }
                }
            }
        }

        let dt = last_tick.elapsed().as_secs_f64().min(max_dt);
        last_tick = Instant::now();
        events.extend(game.tick(dt));

        for event in &events {
            audio.handle(event);
        }

        let labels = scene::draw(&game, &mut buf);
        buf.render(out, &labels)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config_path = Config::locate();
    let config = Config::load(config_path.as_deref())?;
    init_logging(config.log_file.as_deref());
    match &config_path {
        Some(path) => info!("config loaded from {}", path.display()),
        None => info!("no config file, using defaults"),
    }
    let config = config.validated();

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = run(&mut out, config);

    let restored = restore(&mut out);
    result?;
    restored.context("failed to restore terminal")
}

fn restore(out: &mut io::Stdout) -> io::Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()
}
