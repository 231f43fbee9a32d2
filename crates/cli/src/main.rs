use std::process::ExitCode;

fn main() -> ExitCode {
    haberdash_cli::run()
}
