use std::process::ExitCode;

fn main() -> ExitCode {
    regimen_cli::run()
}
