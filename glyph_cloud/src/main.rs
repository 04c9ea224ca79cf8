//! glyph_menu — interactive ASCII preview of sampled glyph clouds.

use std::io::{self, Write};

use glyph_cloud::{sample_text, silhouette, DEFAULT_FONT_PX};

const GRID_W: usize = 72;
const GRID_H: usize = 22;
// World extents matched to the raster mapping (1024×512 ÷ 10, centered).
const WORLD_W: f32 = 102.4;
const WORLD_H: f32 = 51.2;

fn main() {
    println!();
    println!("  glyph_menu — text → silhouette point cloud preview");
    println!();

    loop {
        let text = read_line("  Text (empty to quit): ");
        let text = text.trim();
        if text.is_empty() {
            break;
        }

        let font_px: u32 = read_line("  Font height px (default 60): ")
            .trim()
            .parse()
            .unwrap_or(DEFAULT_FONT_PX);
        let count: usize = read_line("  Sample count (default 400): ")
            .trim()
            .parse()
            .unwrap_or(400);

        let sil = silhouette(text, font_px);
        let cloud = sample_text(text, count, font_px);
        println!();
        if sil.is_empty() {
            println!("  (empty silhouette — {} samples fall back to the origin)", count);
        } else {
            render_grid(&cloud);
            println!();
            println!(
                "  silhouette: {} grid cells   samples: {} (with replacement + jitter)",
                sil.len(),
                cloud.len()
            );
        }
        println!();
    }
}

fn render_grid(points: &[glam::Vec3]) {
    let mut grid = vec![b' '; GRID_W * GRID_H];
    for p in points {
        let col = ((p.x / WORLD_W + 0.5) * (GRID_W - 1) as f32).round();
        let row = ((0.5 - p.y / WORLD_H) * (GRID_H - 1) as f32).round();
        if col >= 0.0 && row >= 0.0 && (col as usize) < GRID_W && (row as usize) < GRID_H {
            grid[row as usize * GRID_W + col as usize] = b'*';
        }
    }
    for row in 0..GRID_H {
        let line: String = grid[row * GRID_W..(row + 1) * GRID_W]
            .iter()
            .map(|&b| b as char)
            .collect();
        println!("  |{}|", line);
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
