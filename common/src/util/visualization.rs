use crate::db::core::{DesignDB, NetClass};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

const TILE: i32 = 8;

fn net_color(class: NetClass) -> Rgb<u8> {
    match class {
        NetClass::ClockTree => Rgb([255, 0, 255]),
        NetClass::Control => Rgb([170, 0, 0]),
        NetClass::Operand => Rgb([0, 255, 0]),
        NetClass::Result => Rgb([0, 204, 204]),
    }
}

/// Dumps the current layout to a PNG: component footprints (red when
/// colliding), routed wires along their cell paths, and pin dots. Debug
/// artifact only; failures to save are logged and swallowed.
pub fn draw_layout(db: &DesignDB, grid_width: i32, grid_height: i32, filename: &str) {
    let w = (grid_width * TILE) as u32;
    let h = (grid_height * TILE) as u32;
    let mut img = RgbImage::from_pixel(w, h, Rgb([20, 20, 40]));

    let center_px = |x: i32, y: i32| ((x * TILE + TILE / 2) as f32, (y * TILE + TILE / 2) as f32);

    for (_, comp) in db.iter_components() {
        let bounds = comp.bounds();
        let rect = ImageRect::at(bounds.x * TILE, bounds.y * TILE)
            .of_size((bounds.width * TILE) as u32, (bounds.height * TILE) as u32);
        let fill = if comp.collision {
            Rgb([200, 40, 40])
        } else {
            Rgb([230, 230, 230])
        };
        draw_filled_rect_mut(&mut img, rect, fill);
        draw_hollow_rect_mut(&mut img, rect, Rgb([0, 0, 0]));
    }

    for (_, link) in db.iter_links() {
        let Some(path) = &link.path else { continue };
        let color = net_color(link.class);
        for pair in path.windows(2) {
            draw_line_segment_mut(
                &mut img,
                center_px(pair[0].x, pair[0].y),
                center_px(pair[1].x, pair[1].y),
                color,
            );
        }
    }

    let pin_color = Rgb([255, 255, 255]);
    for (_, comp) in db.iter_components() {
        for &pin in &comp.pins {
            if let Some(pos) = db.pin_position(pin) {
                let rect = ImageRect::at(pos.x * TILE + TILE / 2 - 1, pos.y * TILE + TILE / 2 - 1)
                    .of_size(3, 3);
                draw_filled_rect_mut(&mut img, rect, pin_color);
            }
        }
    }

    if let Err(e) = img.save(Path::new(filename)) {
        log::warn!("could not save layout image '{}': {}", filename, e);
    }
}
