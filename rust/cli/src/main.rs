use std::io;

fn main() {
    fairdeal_cli::logging::init_logging();
    let code = fairdeal_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
