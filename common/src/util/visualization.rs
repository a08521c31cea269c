use crate::db::route::{CROSSING, Grid};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

const PALETTE: [Rgb<u8>; 8] = [
    Rgb([0, 110, 255]),
    Rgb([255, 20, 80]),
    Rgb([0, 255, 100]),
    Rgb([255, 215, 0]),
    Rgb([180, 50, 255]),
    Rgb([0, 240, 255]),
    Rgb([255, 130, 30]),
    Rgb([130, 255, 30]),
];

pub fn draw_channel(grid: &Grid, filename: &str, cell_size: u32, margin: u32) {
    if grid.is_empty() || grid[0].is_empty() {
        return;
    }
    let cell = cell_size.max(4);
    let rows = grid.len() as u32;
    let cols = grid[0].len() as u32;

    let width = cols * cell + 2 * margin;
    let height = rows * cell + 2 * margin;
    let mut img = RgbImage::from_pixel(width, height, Rgb([20, 20, 20]));

    for (r, row) in grid.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let x = margin + c as u32 * cell;
            let y = margin + r as u32 * cell;

            if value == CROSSING {
                let white = Rgb([255, 255, 255]);
                draw_line_segment_mut(
                    &mut img,
                    (x as f32, y as f32),
                    ((x + cell) as f32, (y + cell) as f32),
                    white,
                );
                draw_line_segment_mut(
                    &mut img,
                    ((x + cell) as f32, y as f32),
                    (x as f32, (y + cell) as f32),
                    white,
                );
            } else {
                let label: usize = value.parse().unwrap_or(0);
                let color = PALETTE[label % PALETTE.len()];
                let pad = cell / 4;
                let rect = ImageRect::at((x + pad) as i32, (y + pad) as i32)
                    .of_size(cell - 2 * pad, cell - 2 * pad);
                draw_filled_rect_mut(&mut img, rect, color);
            }
        }
    }

    let _ = img.save(Path::new(filename));
}
