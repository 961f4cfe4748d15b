fn main() {
    if let Err(err) = capgrid::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
