fn main() {
    if let Err(err) = tidy_scrape::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
