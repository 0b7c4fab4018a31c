fn main() {
    if let Err(err) = snippet_arsenal_lib::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
