fn main() {
    if let Err(err) = tagview::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
