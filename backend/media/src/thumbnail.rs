use anyhow::{Context, Result};

const RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Render image bytes as an ASCII thumbnail of at most `max_width` x
/// `max_height` cells. Dark pixels map to dense glyphs, as on a paper receipt.
pub fn ascii_preview(bytes: &[u8], max_width: u16, max_height: u16) -> Result<Vec<String>> {
    let image = image::load_from_memory(bytes).context("Failed to decode image for preview")?;
    let gray = image.to_luma8();
    let (img_width, img_height) = (gray.width(), gray.height());
    if img_width == 0 || img_height == 0 || max_width == 0 || max_height == 0 {
        return Ok(Vec::new());
    }

    // Terminal cells are roughly twice as tall as they are wide.
    let width = (max_width as u32).min(img_width).max(1);
    let height = ((width * img_height) / (img_width * 2))
        .clamp(1, (max_height as u32).min(img_height).max(1));

    let mut lines = Vec::with_capacity(height as usize);
    for row in 0..height {
        let mut line = String::with_capacity(width as usize);
        for col in 0..width {
            let x = (col * img_width / width).min(img_width - 1);
            let y = (row * img_height / height).min(img_height - 1);
            let brightness = gray.get_pixel(x, y)[0] as usize;
            let idx = (255 - brightness) * (RAMP.len() - 1) / 255;
            line.push(RAMP[idx]);
        }
        lines.push(line);
    }
    Ok(lines)
}
