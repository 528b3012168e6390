//! Rasterising cards with tiny-skia and the font8x8 bitmap font.

use super::layout::{wrap_text, GridLayout, CARD_HEIGHT, CARD_WIDTH};
use crate::agent::{Agent, Scope};
use crate::error::{CrewError, Result};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use std::collections::HashMap;
use tiny_skia::{
    Color, FillRule, FilterQuality, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect,
    Transform,
};

const GLYPH: f32 = 8.0;
const CORNER: f32 = 18.0;
const AVATAR_RADIUS: f32 = 90.0;
const TAGLINE_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

const CANVAS: Rgb = Rgb(0xF4, 0xF1, 0xEA);
const INK: Rgb = Rgb(0x22, 0x22, 0x2A);
const MUTED: Rgb = Rgb(0x5A, 0x5A, 0x66);
const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
const DEFAULT_TINT: Rgb = Rgb(0x8C, 0x9E, 0xB5);
const BADGE: Rgb = Rgb(0xD9, 0x7A, 0x2B);

/// Accent colour for an agent's `color` tag; named colours or `#rrggbb`.
fn tint_for(tag: Option<&str>) -> Rgb {
    let Some(tag) = tag.map(|t| t.trim().to_ascii_lowercase()) else {
        return DEFAULT_TINT;
    };
    match tag.as_str() {
        "red" => Rgb(0xE0, 0x5A, 0x5A),
        "orange" => Rgb(0xEE, 0x8E, 0x3C),
        "yellow" => Rgb(0xE8, 0xC5, 0x3A),
        "green" => Rgb(0x5B, 0xB0, 0x6A),
        "cyan" => Rgb(0x3F, 0xB8, 0xC4),
        "blue" => Rgb(0x4A, 0x7F, 0xD8),
        "purple" => Rgb(0x8E, 0x63, 0xD2),
        "pink" => Rgb(0xE0, 0x6F, 0xB0),
        "gray" | "grey" => Rgb(0x9A, 0x9A, 0xA4),
        hex => parse_hex(hex).unwrap_or(DEFAULT_TINT),
    }
}

fn parse_hex(raw: &str) -> Option<Rgb> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Rgb(byte(0)?, byte(2)?, byte(4)?))
}

/// Blend `c` toward white by `amount` (0 = unchanged, 1 = white).
fn lighten(c: Rgb, amount: f32) -> Rgb {
    let mix = |v: u8| (v as f32 + (255.0 - v as f32) * amount).round() as u8;
    Rgb(mix(c.0), mix(c.1), mix(c.2))
}

fn paint(c: Rgb, alpha: u8) -> Paint<'static> {
    let mut p = Paint::default();
    p.set_color_rgba8(c.0, c.1, c.2, alpha);
    p.anti_alias = true;
    p
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    let r = r.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Glyph-safe copy of `text`; the bitmap font has no ellipsis.
fn printable(text: &str) -> String {
    text.replace('…', "...")
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

pub(crate) fn text_width(text: &str, scale: f32) -> f32 {
    printable(text).chars().count() as f32 * GLYPH * scale
}

/// Cut `text` to fit `max_width`, marking the cut with `...`.
fn fit(text: &str, max_width: f32, scale: f32) -> String {
    if text_width(text, scale) <= max_width {
        return text.to_string();
    }
    let room = ((max_width / (GLYPH * scale)) as usize).saturating_sub(3);
    let mut cut: String = text.chars().take(room).collect();
    cut.push_str("...");
    cut
}

fn draw_text(pixmap: &mut Pixmap, text: &str, x: f32, y: f32, scale: f32, color: Rgb) {
    let p = paint(color, 255);
    for (i, c) in printable(text).chars().enumerate() {
        let gx = x + i as f32 * GLYPH * scale;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..8u8 {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                if let Some(rect) = Rect::from_xywh(
                    gx + col as f32 * scale,
                    y + row as f32 * scale,
                    scale,
                    scale,
                ) {
                    pixmap.fill_rect(rect, &p, Transform::identity(), None);
                }
            }
        }
    }
}

fn draw_text_centered(pixmap: &mut Pixmap, text: &str, cx: f32, y: f32, scale: f32, color: Rgb) {
    let x = cx - text_width(text, scale) / 2.0;
    draw_text(pixmap, text, x, y, scale, color);
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

fn fill(pixmap: &mut Pixmap, path: Option<Path>, color: Rgb, alpha: u8) {
    if let Some(path) = path {
        pixmap.fill_path(&path, &paint(color, alpha), FillRule::Winding, Transform::identity(), None);
    }
}

fn draw_avatar(pixmap: &mut Pixmap, agent: &Agent, avatar: Option<&Pixmap>, cx: f32, cy: f32, tint: Rgb) {
    let circle = PathBuilder::from_circle(cx, cy, AVATAR_RADIUS);

    if let (Some(image), Some(circle)) = (avatar, circle.as_ref()) {
        if let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) {
            mask.fill_path(circle, FillRule::Winding, true, Transform::identity());
            let diameter = AVATAR_RADIUS * 2.0;
            let sx = diameter / image.width() as f32;
            let sy = diameter / image.height() as f32;
            let transform = Transform::from_scale(sx, sy)
                .post_translate(cx - AVATAR_RADIUS, cy - AVATAR_RADIUS);
            fill(pixmap, Some(circle.clone()), WHITE, 255);
            pixmap.draw_pixmap(
                0,
                0,
                image.as_ref(),
                &PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..PixmapPaint::default()
                },
                transform,
                Some(&mask),
            );
            return;
        }
    }

    fill(pixmap, circle, lighten(tint, 0.35), 255);
    let initial = agent
        .display_name()
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".into());
    let scale = 8.0;
    draw_text_centered(pixmap, &initial, cx, cy - GLYPH * scale / 2.0, scale, WHITE);
}

fn draw_card(pixmap: &mut Pixmap, agent: &Agent, avatar: Option<&Pixmap>, x: f32, y: f32) {
    let w = CARD_WIDTH as f32;
    let h = CARD_HEIGHT as f32;
    let cx = x + w / 2.0;
    let tint = tint_for(agent.color.as_deref());

    // Shadow, body, and the lanyard notch.
    fill(pixmap, rounded_rect(x + 4.0, y + 6.0, w, h, CORNER), INK, 40);
    fill(pixmap, rounded_rect(x, y, w, h, CORNER), lighten(tint, 0.75), 255);
    fill(pixmap, rounded_rect(x + CORNER, y, w - 2.0 * CORNER, 6.0, 3.0), tint, 255);
    fill(pixmap, rounded_rect(cx - 22.0, y + 18.0, 44.0, 10.0, 5.0), CANVAS, 255);

    // Name pill.
    let name = fit(agent.display_name(), w - 48.0, 2.0);
    let pill_w = text_width(&name, 2.0) + 24.0;
    fill(pixmap, rounded_rect(cx - pill_w / 2.0, y + 40.0, pill_w, 32.0, 16.0), INK, 255);
    draw_text_centered(pixmap, &name, cx, y + 48.0, 2.0, WHITE);

    if agent.scope() == Scope::Project {
        let label = "PROJECT";
        let bw = text_width(label, 1.0) + 12.0;
        fill(pixmap, rounded_rect(x + w - bw - 12.0, y + 16.0, bw, 16.0, 8.0), BADGE, 255);
        draw_text(pixmap, label, x + w - bw - 6.0, y + 20.0, 1.0, WHITE);
    }

    draw_avatar(pixmap, agent, avatar, cx, y + 180.0, tint);

    // Identifier and tagline.
    let title = fit(&agent.name, w - 32.0, 2.0);
    draw_text_centered(pixmap, &title, cx, y + 290.0, 2.0, INK);

    let tagline = agent
        .persona
        .as_ref()
        .map(|p| p.tagline.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(agent.description.as_str());
    let lines = wrap_text(tagline, w - 40.0, |s| text_width(s, 2.0));
    for (i, line) in lines.iter().take(TAGLINE_LINES).enumerate() {
        let line = if i + 1 == TAGLINE_LINES && lines.len() > TAGLINE_LINES {
            fit(&format!("{line}..."), w - 40.0, 2.0)
        } else {
            fit(line, w - 40.0, 2.0)
        };
        draw_text_centered(pixmap, &line, cx, y + 326.0 + i as f32 * 22.0, 2.0, MUTED);
    }
}

/// Render every agent onto one sheet and encode it as PNG. `avatars` is
/// keyed by agent identifier; agents without an image get a placeholder.
pub fn render_cards(agents: &[Agent], avatars: &HashMap<String, Pixmap>) -> Result<Vec<u8>> {
    let grid = GridLayout::new(agents.len());
    let mut pixmap = Pixmap::new(grid.width, grid.height).ok_or_else(|| {
        CrewError::Render(format!("cannot allocate a {}x{} canvas", grid.width, grid.height))
    })?;
    pixmap.fill(Color::from_rgba8(CANVAS.0, CANVAS.1, CANVAS.2, 255));

    for (i, agent) in agents.iter().enumerate() {
        let (x, y) = grid.card_origin(i);
        draw_card(&mut pixmap, agent, avatars.get(&agent.name), x, y);
    }

    tracing::debug!(cards = agents.len(), width = grid.width, height = grid.height, "rendered card sheet");
    pixmap.encode_png().map_err(|e| CrewError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSource;
    use std::path::Path;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn agent(name: &str, scope: Scope, color: &str) -> Agent {
        Agent::from_markdown(
            Path::new(&format!("{name}.md")),
            &format!("---\ndescription: A rather long description that needs wrapping across several lines of the card.\ncolor: {color}\n---\n"),
            AgentSource::Agent { scope },
        )
    }

    #[test]
    fn colour_tags() {
        assert_eq!(tint_for(Some("Blue")), Rgb(0x4A, 0x7F, 0xD8));
        assert_eq!(tint_for(Some("#102030")), Rgb(0x10, 0x20, 0x30));
        assert_eq!(tint_for(Some("#zz")), DEFAULT_TINT);
        assert_eq!(tint_for(None), DEFAULT_TINT);
    }

    #[test]
    fn fit_truncates_long_text() {
        assert_eq!(fit("short", 100.0, 1.0), "short");
        let cut = fit("a-very-long-identifier", 80.0, 1.0);
        assert_eq!(cut, "a-very-...");
        assert!(text_width(&cut, 1.0) <= 80.0);
    }

    #[test]
    fn renders_png_with_grid_dimensions() {
        let agents = vec![
            agent("reviewer", Scope::Project, "blue"),
            agent("tester", Scope::User, "#44aa88"),
            agent("écrivain", Scope::User, "nope"),
        ];
        let mut avatars = HashMap::new();
        let mut face = Pixmap::new(256, 256).unwrap();
        face.fill(Color::from_rgba8(200, 100, 50, 255));
        avatars.insert("reviewer".to_string(), face);

        let png = render_cards(&agents, &avatars).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);

        let decoded = Pixmap::decode_png(&png).unwrap();
        let grid = GridLayout::new(3);
        assert_eq!((decoded.width(), decoded.height()), (grid.width, grid.height));
    }

    #[test]
    fn renders_empty_sheet() {
        let png = render_cards(&[], &HashMap::new()).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }
}
