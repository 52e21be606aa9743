use anyhow::Context;
use macroquad::prelude::*;
use plane_editor::{Editor, EditorConfig};

const SETTINGS_FILE: &str = "editor.json";

fn settings() -> anyhow::Result<EditorConfig> {
    if std::path::Path::new(SETTINGS_FILE).exists() {
        EditorConfig::load(SETTINGS_FILE).with_context(|| format!("Loading {}", SETTINGS_FILE))
    } else {
        Ok(EditorConfig::default())
    }
}

fn window_conf() -> Conf {
    let cfg = settings().unwrap_or_default();
    Conf {
        window_title: "RP map editor".into(),
        window_width: cfg.window_width as i32,
        window_height: cfg.window_height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = settings().expect("Failed to read settings");
    let mut editor = Editor::new(&cfg).expect("Invalid settings");
    let tile_px = cfg.tile_px as f32;
    let tile_count = cfg.tile_count();

    let frame_secs = 1.0 / cfg.fps.max(1) as f32;
    let mut drag_start: Option<Vec2> = None;

    loop {
        let mouse = Vec2::from(mouse_position());

        if is_mouse_button_pressed(MouseButton::Left) {
            drag_start = Some(mouse);
        }
        if is_mouse_button_released(MouseButton::Left) {
            if let Some(start) = drag_start.take() {
                editor.commit_segment(start, mouse);
            }
        }
        if is_key_pressed(KeyCode::W) {
            if let Err(e) = editor.save() {
                log::error!("save failed: {}", e);
            }
        }
        if is_key_pressed(KeyCode::L) {
            if let Err(e) = editor.load() {
                log::error!("load failed: {}", e);
            }
        }

        clear_background(BLACK);

        for y in 0..tile_count {
            for x in 0..tile_count {
                draw_rectangle_lines(x as f32 * tile_px, y as f32 * tile_px, tile_px, tile_px, 1.0, GRAY);
            }
        }
        for r in editor.highlights() {
            draw_rectangle(r.x, r.y, r.w, r.h, GRAY);
        }
        for s in editor.segments() {
            draw_line(s.start.x, s.start.y, s.end.x, s.end.y, 1.0, WHITE);
        }
        if let Some(start) = drag_start {
            draw_line(start.x, start.y, mouse.x, mouse.y, 1.0, WHITE);
        }

        let spare = frame_secs - get_frame_time();
        if spare > 0.0 {
            std::thread::sleep(std::time::Duration::from_secs_f32(spare));
        }
        next_frame().await;
    }
}
