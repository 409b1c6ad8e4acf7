//! Crop a region of interest out of a simulated sensor frame.
//!
//! Builds an 8x8 gradient image, selects a 4x4 window and prints both.

use ndstream::{Region, Stream};

fn main() {
    // Describe an 8x8 frame
    let mut frame = Stream::new();
    frame.add_dim(8).unwrap();
    frame.add_dim(8).unwrap();

    // Fill the input buffer with a diagonal gradient
    for y in 0..8 {
        for x in 0..8 {
            frame.input_mut()[x + 8 * y] = (x + y) as f64;
        }
    }

    // Select the 4x4 center window
    frame.set_roi(0, Region { start: 2, len: 4 }).unwrap();
    frame.set_roi(1, Region { start: 2, len: 4 }).unwrap();
    let window = frame.crop().unwrap();

    println!("source {}x{}:", 8, 8);
    for y in 0..8 {
        let row: Vec<String> = (0..8)
            .map(|x| format!("{:4.0}", frame.input()[x + 8 * y]))
            .collect();
        println!("{}", row.join(" "));
    }

    println!("\ncropped {:?}:", window.sizes());
    for y in 0..4 {
        let row: Vec<String> = (0..4)
            .map(|x| format!("{:4.0}", window.input()[x + 4 * y]))
            .collect();
        println!("{}", row.join(" "));
    }
}
