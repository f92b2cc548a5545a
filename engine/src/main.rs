use tabula_engine::core::TabulaApp;

fn main() {
    if let Err(e) = TabulaApp::run() {
        eprintln!("\nError: {}\n", e);
        std::process::exit(1);
    }
}
