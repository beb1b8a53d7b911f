//! Demonstrates a failing property, its shrunk counterexample, and replaying it.

use bramble::*;

/// Vectors shrink by dropping one element at a time, front first.
fn shrinkable_vec(values: Vec<u8>) -> Shrinkable<Vec<u8>> {
    let source = values.clone();
    Shrinkable::with_shrinks(values, move || {
        let source = source.clone();
        (0..source.len()).map(move |skip| {
            let mut smaller = source.clone();
            smaller.remove(skip);
            shrinkable_vec(smaller)
        })
    })
}

fn main() {
    let prop = property(
        |random: &mut Random| {
            let length = random.next_int(0, 12) as usize;
            shrinkable_vec((0..length).map(|_| random.next_int(0, 255) as u8).collect())
        },
        |values: &Vec<u8>| values.iter().map(|&v| v as u32).sum::<u32>() < 600,
    );

    let config = Config::default().with_seed(2024).verbose();
    match check(&prop, &config) {
        Ok(details) => {
            println!("{details}");

            if let Some(path) = &details.counterexample_path {
                match check(&prop, &config.clone().with_path(path)) {
                    Ok(replayed) => println!("\nReplayed {path}: {:?}", replayed.counterexample),
                    Err(error) => println!("\nReplay failed: {error}"),
                }
            }
        }
        Err(error) => println!("Run aborted: {error}"),
    }
}
