fn main() {
    if let Err(e) = forgestate::cli::run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
