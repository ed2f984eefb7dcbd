use std::process::ExitCode;

fn main() -> ExitCode {
    manifestgen_lib::run()
}
