fn main() {
    if let Err(e) = pp_cli::run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
