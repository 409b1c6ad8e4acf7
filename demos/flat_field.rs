//! Flat-field correction sketch: combine a light frame with a gain map.
//!
//! Demonstrates the dual-sided combine and zero-copy buffer handoff an
//! acquisition driver would use per frame.

use ndstream::combine;
use ndstream::Stream;

fn main() {
    // 4x4 light frame from the "sensor"
    let mut light = Stream::new();
    light.add_dim(4).unwrap();
    light.add_dim(4).unwrap();
    let sensor_frame: Vec<f64> = (0..16).map(|i| 100.0 + i as f64).collect();
    light.set_input_buffer(sensor_frame).unwrap();

    // Per-pixel gain map (vignetting correction)
    let mut gain = light.duplicate();
    for (i, v) in gain.input_mut().iter_mut().enumerate() {
        *v = if i % 5 == 0 { 0.9 } else { 1.0 };
    }

    let written = combine::mul(&mut light, &mut gain);
    println!("combined {} pixel pairs", written);

    // Hand the corrected frame back, the way a driver reclaims its buffer
    light.swap_buffers();
    let corrected = light.take_input_buffer();
    for row in corrected.chunks(4) {
        let cells: Vec<String> = row.iter().map(|v| format!("{:6.1}", v)).collect();
        println!("{}", cells.join(" "));
    }
}
