#![no_main]

use bdock_core::geometry::Rect;
use bdock_web::drop_target::nearest_edge;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<(u16, u16)>, i32)| {
    let (blocks, y) = input;
    let rects: Vec<Rect> = blocks
        .iter()
        .take(64)
        .map(|&(top, height)| Rect::new(0.0, f64::from(top), 100.0, f64::from(height)))
        .collect();
    let y = f64::from(y);

    match nearest_edge(&rects, y) {
        None => assert!(rects.is_empty()),
        Some((position, before)) => {
            assert!(position < rects.len());
            let rect = rects[position];
            assert_eq!(before, rect.distance_to_top(y) < rect.distance_to_bottom(y));
        }
    }
});
