//! Sample Rust file for testing

mod util;

fn main() {
    println!("Hello from sample project! {}", util::answer());
}
