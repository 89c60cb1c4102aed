use std::process;

fn main() {
    process::exit(dosh::cli::run());
}
