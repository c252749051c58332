use std::process;

fn main() {
    if let Err(e) = odq_cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
