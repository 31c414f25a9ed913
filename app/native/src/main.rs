//! Pigment - render a categorised colour palette into desktop application themes.

fn main() {
    if let Err(err) = pigment_lib::cli::run() {
        eprintln!("pigment: {err}");
        std::process::exit(1);
    }
}
