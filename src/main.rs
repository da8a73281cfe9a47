fn main() {
    trace_filter::init_logging();
    if let Err(err) = trace_filter::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
